//! Type-safe catalog vocabulary
//!
//! The six template categories are fixed, so they are an enum rather than
//! strings. Declaration order is the display and installation order.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Template category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Agents,
    Commands,
    Hooks,
    Mcps,
    Skills,
    Settings,
}

impl Category {
    /// All categories in installation order.
    pub fn all() -> impl Iterator<Item = Category> {
        Category::iter()
    }

    /// Flag name the installer expects (`--agent`, `--mcp`, ...).
    pub fn singular(&self) -> &'static str {
        match self {
            Self::Agents => "agent",
            Self::Commands => "command",
            Self::Hooks => "hook",
            Self::Mcps => "mcp",
            Self::Skills => "skill",
            Self::Settings => "setting",
        }
    }

    /// Plural directory/key name (`agents`, `mcps`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agents => "agents",
            Self::Commands => "commands",
            Self::Hooks => "hooks",
            Self::Mcps => "mcps",
            Self::Skills => "skills",
            Self::Settings => "settings",
        }
    }
}

/// Installer flag for a free-form category name.
///
/// Known categories map through [`Category::singular`]; anything else loses
/// its trailing `s` characters so `widgets` still installs as `--widget`.
pub fn installer_flag(category: &str) -> String {
    match category.parse::<Category>() {
        Ok(cat) => cat.singular().to_string(),
        Err(_) => category.trim_end_matches('s').to_string(),
    }
}

/// Output format for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[derive(Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Commands,
    Json,
}
