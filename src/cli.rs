use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::OutputFormat;

/// aitmpl - Template manager for the claude-code-templates catalog
#[derive(Parser, Debug)]
#[command(name = "aitmpl")]
#[command(about = "Index, search, and install Claude Code templates and template sets")]
#[command(version)]
pub struct Cli {
    /// Settings file (JSON) overriding default paths and the installer command
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Dry-run mode: show what would be done without writing or installing.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync the template index from the upstream repository
    Sync {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Search templates by keyword or tag
    Search {
        /// Search keywords (each searched separately)
        query: Vec<String>,
        /// Search by tags (composite tags expand)
        #[arg(short, long, num_args = 1..)]
        tags: Option<Vec<String>>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Index file path
        #[arg(short, long)]
        index: Option<PathBuf>,
    },
    /// Install a template set
    Install {
        /// Set name to install
        set_name: String,
        /// Template sets file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Installer command (default: npx claude-code-templates@latest)
        #[arg(long)]
        installer: Option<String>,
    },
    /// Show the resolved contents of a template set
    ShowSet {
        /// Set name
        set_name: String,
        /// Template sets file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// List available template sets
    ListSets {
        /// Template sets file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// List available search tags
    ListTags,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
