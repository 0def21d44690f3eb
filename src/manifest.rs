//! Template-set manifest
//!
//! The manifest is a YAML file mapping set names to set definitions:
//!
//! ```yaml
//! sets:
//!   base:
//!     description: Shared tooling
//!     agents: [development-tools/code-reviewer]
//!   frontend:
//!     description: Frontend work
//!     extends: [base]
//!     commands: [git/feature]
//! ```
//!
//! Every field of a set is optional and `null` lists read as empty. Set
//! order in the file is kept; `list-sets` shows sets in that order.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{AitmplError, Result};
use crate::types::Category;

/// One named set: a description, parent sets, and per-category item lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extends: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agents: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub commands: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hooks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mcps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: Vec<String>,
}

impl SetDefinition {
    /// The set's own items for a category, not including parents.
    pub fn items(&self, category: Category) -> &[String] {
        match category {
            Category::Agents => &self.agents,
            Category::Commands => &self.commands,
            Category::Hooks => &self.hooks,
            Category::Mcps => &self.mcps,
            Category::Skills => &self.skills,
            Category::Settings => &self.settings,
        }
    }

    /// Mutable access for building definitions in code.
    pub fn items_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Agents => &mut self.agents,
            Category::Commands => &mut self.commands,
            Category::Hooks => &mut self.hooks,
            Category::Mcps => &mut self.mcps,
            Category::Skills => &mut self.skills,
            Category::Settings => &mut self.settings,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Default, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    sets: Option<IndexMap<String, Option<SetDefinition>>>,
}

/// All set definitions from one manifest, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    sets: IndexMap<String, SetDefinition>,
}

impl Catalog {
    /// Load the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AitmplError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), sets = catalog.len(), "loaded template sets");
        Ok(catalog)
    }

    /// Parse manifest YAML. An empty document is an empty catalog.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: Option<ManifestFile> = serde_yaml::from_str(content)?;
        let sets = file
            .and_then(|f| f.sets)
            .unwrap_or_default()
            .into_iter()
            .map(|(name, def)| (name, def.unwrap_or_default()))
            .collect();
        Ok(Self { sets })
    }

    /// Build a catalog directly from definitions.
    pub fn from_sets<I>(sets: I) -> Self
    where
        I: IntoIterator<Item = (String, SetDefinition)>,
    {
        Self {
            sets: sets.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SetDefinition> {
        self.sets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Look up a set the user asked for by name.
    ///
    /// Unlike [`Catalog::get`], a miss is an error carrying the names the
    /// user could have meant.
    pub fn require(&self, name: &str) -> Result<&SetDefinition> {
        self.sets.get(name).ok_or_else(|| AitmplError::SetNotFound {
            name: name.to_string(),
            available: self.names().map(str::to_string).collect(),
        })
    }

    /// Set names in manifest order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SetDefinition)> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
