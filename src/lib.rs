//! aitmpl library
//!
//! Indexing, search, and set installation for the claude-code-templates
//! catalog. The resolvers in [`logic`] are the core; everything else loads
//! their inputs or presents their output.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod installer;
pub mod logic;
pub mod manifest;
pub mod output;
pub mod search;
pub mod sync;
pub mod tags;
pub mod types;

// Re-export main types for convenience
pub use config::Settings;
pub use error::{AitmplError, Result};
pub use index::{CatalogIndex, TemplateEntry};
pub use installer::{CommandInstaller, InstallCommand, InstallReport, Installer};
pub use manifest::{Catalog, SetDefinition};
pub use search::SearchResult;
pub use sync::{GitFetcher, RepoFetcher};
pub use tags::TagTable;
pub use types::{Category, OutputFormat};

// Resolvers
pub use logic::set_resolver::{ResolvedSet, resolve_set};
pub use logic::tag_resolver::resolve_tags;
