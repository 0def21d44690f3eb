//! Template search, by keyword over the index or by tag.

use serde::Serialize;

use crate::index::{CatalogIndex, ROOT_SUBCATEGORY};
use crate::logic::tag_resolver::resolve_tags;
use crate::tags::TagTable;
use crate::types::installer_flag;

/// One search hit.
///
/// Keyword hits carry the subcategory and name from the index; tag hits are
/// derived from a path alone and only know its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub path: String,
    pub install_cmd: String,
}

impl SearchResult {
    /// Label for the table's Template column.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path)
    }
}

/// Case-insensitive substring match on template name or subcategory.
pub fn search_templates(
    query: &str,
    index: &CatalogIndex,
    installer_command: &str,
) -> Vec<SearchResult> {
    let query = query.to_lowercase();
    let mut results = Vec::new();

    for (category, subcats) in &index.categories {
        let flag = installer_flag(category);
        for (subcat, templates) in subcats {
            let subcat_matches = subcat.to_lowercase().contains(&query);
            for template in templates {
                if !subcat_matches && !template.name.to_lowercase().contains(&query) {
                    continue;
                }
                let item = if subcat == ROOT_SUBCATEGORY {
                    template.name.clone()
                } else {
                    format!("{}/{}", subcat, template.name)
                };
                results.push(SearchResult {
                    category: Some(category.clone()),
                    subcategory: Some(subcat.clone()),
                    name: Some(template.name.clone()),
                    path: format!("{}/{}/{}", category, subcat, template.name),
                    install_cmd: format!("{} --{} {}", installer_command, flag, item),
                });
            }
        }
    }

    tracing::debug!(query = %query, hits = results.len(), "keyword search");
    results
}

/// Resolve tags to paths and turn each `category/rest` path into a hit.
///
/// Paths without a `/` cannot be installed and are dropped.
pub fn search_by_tags<S: AsRef<str>>(
    tags: &[S],
    table: &TagTable,
    installer_command: &str,
) -> Vec<SearchResult> {
    resolve_tags(table, tags)
        .into_iter()
        .filter_map(|path| {
            let (category, rest) = path.split_once('/')?;
            let install_cmd = format!(
                "{} --{} {}",
                installer_command,
                installer_flag(category),
                rest
            );
            Some(SearchResult {
                category: Some(category.to_string()),
                subcategory: None,
                name: None,
                install_cmd,
                path,
            })
        })
        .collect()
}
