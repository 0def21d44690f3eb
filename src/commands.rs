//! Subcommand handlers.
//!
//! Handlers write user-facing text to `out` and return an exit code;
//! anything that aborts a command comes back as an error for `main` to
//! report. The git fetcher and installer are passed in so tests can swap
//! them out.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::cli::Commands;
use crate::config::Settings;
use crate::error::AitmplError;
use crate::index::CatalogIndex;
use crate::installer::{
    CommandInstaller, InstallOutcome, InstallRecord, Installer, plan_install, run_install_plan,
};
use crate::logic::set_resolver::resolve_set;
use crate::manifest::Catalog;
use crate::output;
use crate::search::{search_by_tags, search_templates};
use crate::sync::{GitFetcher, RepoFetcher, build_index};
use crate::tags::TagTable;
use crate::types::OutputFormat;

/// Run a parsed subcommand with the real fetcher and installer.
pub fn dispatch(
    command: Commands,
    settings: &Settings,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    match command {
        Commands::Sync { output } => {
            let fetcher = GitFetcher::new(settings.repo_url.clone());
            let path = output.unwrap_or_else(|| settings.index_path.clone());
            cmd_sync(settings, &fetcher, &path, dry_run, out)
        }
        Commands::Search {
            query,
            tags,
            format,
            index,
        } => {
            let index_path = index.unwrap_or_else(|| settings.index_path.clone());
            let request = SearchRequest {
                query,
                tags: tags.unwrap_or_default(),
                format,
                index_path,
            };
            cmd_search(settings, &TagTable::builtin(), &request, out)
        }
        Commands::Install {
            set_name,
            file,
            installer,
        } => {
            let mut settings = settings.clone();
            if let Some(installer) = installer {
                settings.installer_command = installer;
            }
            let sets_path = sets_path(&settings, file);
            // A dry run never launches the installer, so its command is not parsed.
            let runner = if dry_run {
                None
            } else {
                Some(CommandInstaller::from_settings(&settings)?)
            };
            let runner = runner.as_ref().map(|r| r as &dyn Installer);
            cmd_install(&settings, runner, &sets_path, &set_name, out)
        }
        Commands::ShowSet { set_name, file } => {
            cmd_show_set(&sets_path(settings, file), &set_name, out)
        }
        Commands::ListSets { file } => cmd_list_sets(&sets_path(settings, file), out),
        Commands::ListTags => cmd_list_tags(&TagTable::builtin(), out),
    }
}

fn sets_path(settings: &Settings, file: Option<PathBuf>) -> PathBuf {
    file.unwrap_or_else(|| settings.sets_path.clone())
}

/// Clone, scan, and either print (dry run) or save the index.
pub fn cmd_sync(
    settings: &Settings,
    fetcher: &dyn RepoFetcher,
    index_path: &Path,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let mut index = build_index(fetcher, settings).context("Failed to build template index")?;

    if dry_run {
        index.summary = index.compute_summary();
        writeln!(out, "{}", serde_json::to_string_pretty(&index)?)?;
        return Ok(ExitCode::SUCCESS);
    }

    index.save(index_path)?;
    write!(out, "{}", output::render_sync_summary(&index, index_path))?;
    Ok(ExitCode::SUCCESS)
}

/// Arguments of the `search` subcommand.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: Vec<String>,
    pub tags: Vec<String>,
    pub format: OutputFormat,
    pub index_path: PathBuf,
}

/// Tag search wins over keywords; keyword search needs the index.
pub fn cmd_search(
    settings: &Settings,
    table: &TagTable,
    request: &SearchRequest,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let installer = settings.installer_command.as_str();

    if !request.tags.is_empty() {
        let results = search_by_tags(&request.tags, table, installer);
        write!(out, "{}", output::render_results(&results, request.format)?)?;
        return Ok(ExitCode::SUCCESS);
    }

    if request.query.is_empty() {
        return Err(AitmplError::usage("Provide either --tags or a search query").into());
    }

    let index = CatalogIndex::load(&request.index_path)?;
    let multiple = request.query.len() > 1;
    for query in &request.query {
        let results = search_templates(query, &index, installer);
        if multiple {
            writeln!(out, "\n=== Results for '{}' ===", query)?;
        }
        write!(out, "{}", output::render_results(&results, request.format)?)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolve a set and install each item.
///
/// Without an installer this is a dry run: the plan and the commands it
/// would run are printed and nothing is executed.
pub fn cmd_install(
    settings: &Settings,
    installer: Option<&dyn Installer>,
    sets_path: &Path,
    set_name: &str,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let catalog = Catalog::load(sets_path)?;
    let def = catalog.require(set_name)?;

    let resolved = resolve_set(&catalog, set_name);
    let plan = plan_install(&resolved);
    let installer_command = settings.installer_command.as_str();
    let dry_run = installer.is_none();

    write!(
        out,
        "{}",
        output::render_install_plan(set_name, def, &plan, installer_command, dry_run)
    )?;

    let Some(installer) = installer.filter(|_| !plan.is_empty()) else {
        return Ok(ExitCode::SUCCESS);
    };

    writeln!(out, "\n>> Installing...")?;
    let mut progress_visible = true;
    let report = run_install_plan(installer, &plan, |record| {
        if !progress_visible {
            return;
        }
        if let Err(e) = write_install_record(out, record, installer_command) {
            tracing::warn!(error = %e, "cannot write install progress, continuing without it");
            progress_visible = false;
        }
    });

    write!(
        out,
        "{}",
        output::render_install_summary(report.succeeded(), report.failed())
    )?;

    if report.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn write_install_record(
    out: &mut dyn Write,
    record: &InstallRecord,
    installer_command: &str,
) -> io::Result<()> {
    writeln!(out, "\n> {}", record.command.display_with(installer_command))?;
    match &record.outcome {
        InstallOutcome::Installed { stdout } => {
            if !stdout.trim().is_empty() {
                writeln!(out, "{}", stdout.trim_end())?;
            }
        }
        InstallOutcome::Failed(reason) => writeln!(out, "  [FAILED] {}", reason)?,
    }
    Ok(())
}

pub fn cmd_show_set(sets_path: &Path, set_name: &str, out: &mut dyn Write) -> Result<ExitCode> {
    let catalog = Catalog::load(sets_path)?;
    let def = catalog.require(set_name)?;
    let resolved = resolve_set(&catalog, set_name);
    write!(out, "{}", output::render_set_details(set_name, def, &resolved))?;
    Ok(ExitCode::SUCCESS)
}

pub fn cmd_list_sets(sets_path: &Path, out: &mut dyn Write) -> Result<ExitCode> {
    let catalog = Catalog::load(sets_path)?;
    write!(out, "{}", output::render_set_list(&catalog))?;
    Ok(ExitCode::SUCCESS)
}

pub fn cmd_list_tags(table: &TagTable, out: &mut dyn Write) -> Result<ExitCode> {
    write!(out, "{}", output::render_tag_list(table))?;
    Ok(ExitCode::SUCCESS)
}
