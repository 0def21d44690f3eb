//! Catalog index
//!
//! `sync` scans the upstream repository into this structure and saves it as
//! JSON; keyword search reads it back.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "updated_at": "2026-01-01T12:00:00.000000+09:00",
//!   "source": "https://github.com/davila7/claude-code-templates",
//!   "method": "git-clone",
//!   "categories": {
//!     "agents": { "security": [ { "name": "security-auditor", "file": "security-auditor.md", "size": 2048 } ] }
//!   },
//!   "summary": { "agents": { "categories": 1, "templates": 1 } }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{AitmplError, Result};

pub const INDEX_VERSION: &str = "1.0";
pub const INDEX_METHOD: &str = "git-clone";

/// Subcategory holding templates that sit directly in a category folder.
pub const ROOT_SUBCATEGORY: &str = "root";

/// One template file found during sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Install name relative to its subcategory (`code-reviewer`, `pdf/extract`)
    pub name: String,
    /// File path relative to the subcategory folder
    pub file: String,
    /// File size in bytes
    #[serde(default)]
    pub size: u64,
}

/// Templates of one category, keyed by subcategory.
pub type SubcategoryMap = BTreeMap<String, Vec<TemplateEntry>>;

/// Per-category counts written alongside the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub categories: usize,
    pub templates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogIndex {
    pub version: String,
    pub updated_at: String,
    pub source: String,
    pub method: String,
    #[serde(default)]
    pub categories: IndexMap<String, SubcategoryMap>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub summary: IndexMap<String, CategorySummary>,
}

impl CatalogIndex {
    /// Empty index stamped with the current local time.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            version: INDEX_VERSION.to_string(),
            updated_at: chrono::Local::now().to_rfc3339(),
            source: source.into(),
            method: INDEX_METHOD.to_string(),
            categories: IndexMap::new(),
            summary: IndexMap::new(),
        }
    }

    /// Load an index written by `sync`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AitmplError::IndexNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let index: Self = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            categories = index.categories.len(),
            "loaded catalog index"
        );
        Ok(index)
    }

    /// Refresh `summary`, then write pretty JSON, creating parent directories.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.summary = self.compute_summary();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        tracing::info!(path = %path.display(), "catalog index saved");
        Ok(())
    }

    pub fn compute_summary(&self) -> IndexMap<String, CategorySummary> {
        self.categories
            .iter()
            .map(|(category, subcats)| {
                let summary = CategorySummary {
                    categories: subcats.len(),
                    templates: subcats.values().map(Vec::len).sum(),
                };
                (category.clone(), summary)
            })
            .collect()
    }

    /// Template count across all categories.
    pub fn total_templates(&self) -> usize {
        self.categories
            .values()
            .flat_map(|subcats| subcats.values())
            .map(Vec::len)
            .sum()
    }
}
