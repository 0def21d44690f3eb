//! Index synchronization
//!
//! Builds a [`CatalogIndex`] from a shallow clone of the template
//! repository. A shallow `git clone` is used instead of the GitHub API, so
//! there are no rate limits and no token to manage.
//!
//! # Layout scanned
//!
//! ```text
//! <clone>/<components_path>/<category>/
//!     root-template.md              -> subcategory "root"
//!     <subcategory>/
//!         template.md               -> name "template"
//!         settings.json             -> name "settings"
//!         my-skill/SKILL.md         -> name "my-skill"
//!         bundle/part.md            -> name "bundle/part"
//! ```

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::Settings;
use crate::error::{AitmplError, Result};
use crate::index::{CatalogIndex, ROOT_SUBCATEGORY, SubcategoryMap, TemplateEntry};
use crate::types::Category;

const TEMPLATE_EXTENSIONS: &[&str] = &["md", "json"];
const SKILL_FILE: &str = "SKILL.md";

/// Something that can place a copy of the template repository at `dest`.
pub trait RepoFetcher {
    fn fetch(&self, dest: &Path) -> Result<()>;
}

/// Fetches with `git clone --depth 1`.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    pub url: String,
}

impl GitFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl RepoFetcher for GitFetcher {
    fn fetch(&self, dest: &Path) -> Result<()> {
        tracing::info!(url = %self.url, "cloning repository (shallow)");

        let output = Command::new("git")
            .args(["clone", "--depth", "1", &self.url])
            .arg(dest)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => AitmplError::GitNotFound,
                _ => AitmplError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AitmplError::CloneFailed(format!(
                "exit code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr
            )));
        }

        tracing::info!("clone complete");
        Ok(())
    }
}

/// Fetch the repository into a temporary directory and index it.
///
/// The temporary clone is removed when this returns, whether or not the
/// scan succeeded. A failed fetch is an error; no empty index is produced.
pub fn build_index(fetcher: &dyn RepoFetcher, settings: &Settings) -> Result<CatalogIndex> {
    let temp = tempfile::Builder::new().prefix("aitmpl_").tempdir()?;
    fetcher.fetch(temp.path())?;

    let mut index = CatalogIndex::new(settings.source_url.clone());
    for category in Category::all() {
        tracing::info!(%category, "scanning");
        let subcats = scan_category(temp.path(), &settings.components_path, category)?;
        index.categories.insert(category.to_string(), subcats);
    }

    tracing::debug!(path = %temp.path().display(), "removing temporary clone");
    Ok(index)
}

/// Collect the templates of one category from a checked-out repository.
pub fn scan_category(
    base: &Path,
    components_path: &Path,
    category: Category,
) -> Result<SubcategoryMap> {
    let mut items = SubcategoryMap::new();
    let category_path = base.join(components_path).join(category.as_str());

    if !category_path.is_dir() {
        tracing::debug!(path = %category_path.display(), "category directory missing");
        return Ok(items);
    }

    for entry in sorted_entries(&category_path)? {
        let path = entry.as_path();
        if path.is_dir() {
            let templates = scan_subcategory(path)?;
            if !templates.is_empty() {
                items.insert(file_name(path), templates);
            }
        } else if is_template_file(path) {
            items
                .entry(ROOT_SUBCATEGORY.to_string())
                .or_default()
                .push(template_entry(path, file_stem(path), file_name(path))?);
        }
    }

    Ok(items)
}

fn scan_subcategory(dir: &Path) -> Result<Vec<TemplateEntry>> {
    let mut templates = Vec::new();

    for entry in sorted_entries(dir)? {
        let path = entry.as_path();
        if path.is_file() {
            if is_template_file(path) {
                templates.push(template_entry(path, file_stem(path), file_name(path))?);
            }
        } else if path.is_dir() {
            let folder = file_name(path);
            let skill_file = path.join(SKILL_FILE);
            if skill_file.is_file() {
                templates.push(template_entry(
                    &skill_file,
                    folder.clone(),
                    format!("{}/{}", folder, SKILL_FILE),
                )?);
            } else {
                for nested in sorted_entries(path)? {
                    let nested = nested.as_path();
                    if nested.is_file() && is_template_file(nested) {
                        templates.push(template_entry(
                            nested,
                            format!("{}/{}", folder, file_stem(nested)),
                            format!("{}/{}", folder, file_name(nested)),
                        )?);
                    }
                }
            }
        }
    }

    Ok(templates)
}

fn sorted_entries(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

fn is_template_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext))
}

fn template_entry(path: &Path, name: String, file: String) -> Result<TemplateEntry> {
    let size = fs::metadata(path)?.len();
    Ok(TemplateEntry { name, file, size })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
