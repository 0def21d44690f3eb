//! Text rendering for command output.
//!
//! Every function returns a `String` so the command layer decides where it
//! goes and tests can compare it directly.

use std::fmt::Write;

use crate::error::{AitmplError, Result};
use crate::index::CatalogIndex;
use crate::installer::InstallCommand;
use crate::logic::set_resolver::{ResolvedSet, resolve_set};
use crate::manifest::{Catalog, SetDefinition};
use crate::search::SearchResult;
use crate::tags::TagTable;
use crate::types::OutputFormat;

const TEMPLATE_COLUMN: usize = 55;
const CATEGORY_COLUMN: usize = 15;
const RULE_WIDTH: usize = 75;
const SET_NAME_COLUMN: usize = 20;
const TAG_COLUMN: usize = 15;
const TAG_PREVIEW: usize = 2;

/// Render search hits in the requested format.
pub fn render_results(results: &[SearchResult], format: OutputFormat) -> Result<String> {
    if results.is_empty() {
        return Ok("No results found.\n".to_string());
    }

    let mut out = String::new();
    match format {
        OutputFormat::Commands => {
            for r in results {
                let _ = writeln!(out, "{}", r.install_cmd);
            }
        }
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(results)?;
            out.push('\n');
        }
        OutputFormat::Table => {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{:<tw$} {:<cw$}",
                "Template",
                "Category",
                tw = TEMPLATE_COLUMN,
                cw = CATEGORY_COLUMN
            );
            let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
            for r in results {
                let _ = writeln!(
                    out,
                    "{:<tw$} {:<cw$}",
                    r.label(),
                    r.category.as_deref().unwrap_or(""),
                    tw = TEMPLATE_COLUMN,
                    cw = CATEGORY_COLUMN
                );
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "Total: {} templates", results.len());
        }
    }
    Ok(out)
}

/// Usage tags with a short preview, then composite tags in full.
pub fn render_tag_list(table: &TagTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n[Available Tags]\n");

    let _ = writeln!(out, "Usage Tags:");
    for (tag, items) in table.usage_tags() {
        let mut preview = items
            .iter()
            .take(TAG_PREVIEW)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if items.len() > TAG_PREVIEW {
            let _ = write!(preview, " (+{} more)", items.len() - TAG_PREVIEW);
        }
        let _ = writeln!(out, "  {:<w$} -> {}", tag, preview, w = TAG_COLUMN);
    }

    let _ = writeln!(out, "\nProject Type Tags (composite):");
    for (tag, items) in table.composite_tags() {
        let _ = writeln!(out, "  {:<w$} -> {}", tag, items.join(", "), w = TAG_COLUMN);
    }
    out
}

/// Every set with its resolved template count and parents.
pub fn render_set_list(catalog: &Catalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n[Available Template Sets]\n");

    for (name, def) in catalog.iter() {
        let total = resolve_set(catalog, name).total();
        let _ = writeln!(out, "  {:<w$} ({} templates)", name, total, w = SET_NAME_COLUMN);
        if !def.extends.is_empty() {
            let _ = writeln!(out, "    extends: {}", def.extends.join(", "));
        }
        let _ = writeln!(out);
    }
    out
}

/// Resolved contents of one set, grouped by category.
pub fn render_set_details(name: &str, def: &SetDefinition, resolved: &ResolvedSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n[Set: {}]", name);
    let _ = writeln!(out, "   {}\n", def.description);

    for (category, items) in resolved.iter() {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}:", category);
        for item in items {
            let _ = writeln!(out, "  - {}", item);
        }
        let _ = writeln!(out);
    }
    out
}

/// Header and item list shown before installing (or instead of it).
pub fn render_install_plan(
    name: &str,
    def: &SetDefinition,
    plan: &[InstallCommand],
    installer_command: &str,
    dry_run: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n[Installing template set: {}]", name);
    let _ = writeln!(out, "   {}\n", def.description);

    if plan.is_empty() {
        let _ = writeln!(out, "No templates to install.");
        return out;
    }

    let _ = writeln!(out, "Templates to install ({}):", plan.len());
    for command in plan {
        let _ = writeln!(out, "  - {}", command);
    }

    if dry_run {
        let _ = writeln!(out, "\n[DRY RUN] Commands that would be executed:");
        for command in plan {
            let _ = writeln!(out, "  {}", command.display_with(installer_command));
        }
    }
    out
}

/// Closing line of an install run.
pub fn render_install_summary(succeeded: usize, failed: usize) -> String {
    format!(
        "\n[Installation complete!]\n   Success: {}, Failed: {}\n",
        succeeded, failed
    )
}

/// Per-category counts after `sync` saved the index.
pub fn render_sync_summary(index: &CatalogIndex, saved_to: &std::path::Path) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nIndex saved to {}", saved_to.display());
    let _ = writeln!(out, "Total categories: {}", index.categories.len());
    for (category, summary) in &index.summary {
        let _ = writeln!(
            out,
            "  - {}: {} subcategories, {} templates",
            category, summary.categories, summary.templates
        );
    }
    out
}

/// What `main` prints to stderr when a command fails.
///
/// An unknown set also lists the sets the manifest does define.
pub fn render_error(err: &anyhow::Error) -> String {
    let unknown_set = err
        .downcast_ref::<AitmplError>()
        .and_then(|e| e.available_sets().map(|available| (e, available)));
    match unknown_set {
        Some((e, available)) => {
            format!("Error: {}\nAvailable sets: {}\n", e, available.join(", "))
        }
        None => format!("✗ {:#}\n", err),
    }
}
