//! Command integration tests for aitmpl
//!
//! Covers the `sync`, `search` and `list-tags` handlers with a fixture
//! repository standing in for the git clone, and checks that command-line
//! flags take precedence over settings when dispatching parsed arguments.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use aitmpl::cli::Cli;
use clap::Parser;
use aitmpl::commands::{SearchRequest, cmd_list_tags, cmd_search, cmd_sync, dispatch};
use aitmpl::config::Settings;
use aitmpl::error::{AitmplError, Result};
use aitmpl::index::CatalogIndex;
use aitmpl::sync::RepoFetcher;
use aitmpl::tags::TagTable;
use aitmpl::types::OutputFormat;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Lays out a small copy of the template repository.
struct FixtureRepo;

impl RepoFetcher for FixtureRepo {
    fn fetch(&self, dest: &Path) -> Result<()> {
        let components = dest.join("cli-tool/components");
        write(&components.join("agents/development-tools/debugger.md"), "# debugger");
        write(&components.join("agents/development-tools/code-reviewer.md"), "# reviewer");
        write(&components.join("agents/security/security-auditor.md"), "# auditor");
        write(&components.join("mcps/devtools/docker-mcp.json"), "{}");
        write(&components.join("skills/document/pdf/SKILL.md"), "# pdf");
        write(&components.join("settings/statusline.json"), "{}");
        Ok(())
    }
}

struct OfflineRepo;

impl RepoFetcher for OfflineRepo {
    fn fetch(&self, _dest: &Path) -> Result<()> {
        Err(AitmplError::CloneFailed("could not resolve host".into()))
    }
}

fn output_of(
    run: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<ExitCode>,
) -> (ExitCode, String) {
    let mut out = Vec::new();
    let code = run(&mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

fn synced_index(dir: &Path) -> PathBuf {
    let path = dir.join(".claude/aitmpl-index.json");
    let mut out = Vec::new();
    cmd_sync(&Settings::default(), &FixtureRepo, &path, false, &mut out).unwrap();
    path
}

fn request(query: &[&str], tags: &[&str], format: OutputFormat, index: &Path) -> SearchRequest {
    SearchRequest {
        query: query.iter().map(|s| s.to_string()).collect(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
        format,
        index_path: index.to_path_buf(),
    }
}

// =============================================================================
// sync
// =============================================================================

#[test]
fn test_sync_writes_index_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/index.json");

    let (code, out) =
        output_of(|out| cmd_sync(&Settings::default(), &FixtureRepo, &path, false, out));

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(out.contains("Index saved to"));
    assert!(out.contains("Total categories: 6"));
    assert!(out.contains("  - agents: 2 subcategories, 3 templates"));

    let index = CatalogIndex::load(&path).unwrap();
    assert_eq!(index.total_templates(), 6);
    assert_eq!(index.summary["settings"].templates, 1);
    assert_eq!(index.categories["skills"]["document"][0].file, "pdf/SKILL.md");
}

#[test]
fn test_sync_dry_run_prints_json_without_saving() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");

    let (code, out) =
        output_of(|out| cmd_sync(&Settings::default(), &FixtureRepo, &path, true, out));

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(!path.exists());
    let printed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(printed["method"], "git-clone");
    assert_eq!(printed["summary"]["mcps"]["templates"], 1);
}

#[test]
fn test_sync_clone_failure_leaves_no_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    let mut out = Vec::new();

    let result = cmd_sync(&Settings::default(), &OfflineRepo, &path, false, &mut out);

    assert!(result.is_err());
    assert!(!path.exists());
}

// =============================================================================
// search
// =============================================================================

#[test]
fn test_keyword_search_table() {
    let dir = tempfile::tempdir().unwrap();
    let index = synced_index(dir.path());

    let (code, out) = output_of(|out| {
        cmd_search(
            &Settings::default(),
            &TagTable::builtin(),
            &request(&["debug"], &[], OutputFormat::Table, &index),
            out,
        )
    });

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(out.contains("debugger"));
    assert!(out.contains("Total: 1 templates"));
}

#[test]
fn test_keyword_search_commands_format() {
    let dir = tempfile::tempdir().unwrap();
    let index = synced_index(dir.path());

    let (_, out) = output_of(|out| {
        cmd_search(
            &Settings::default(),
            &TagTable::builtin(),
            &request(&["statusline", "docker"], &[], OutputFormat::Commands, &index),
            out,
        )
    });

    assert!(out.contains("=== Results for 'statusline' ==="));
    assert!(out.contains("npx claude-code-templates@latest --setting statusline\n"));
    assert!(out.contains("=== Results for 'docker' ==="));
    assert!(out.contains("npx claude-code-templates@latest --mcp devtools/docker-mcp\n"));
}

#[test]
fn test_keyword_search_no_results() {
    let dir = tempfile::tempdir().unwrap();
    let index = synced_index(dir.path());

    let (_, out) = output_of(|out| {
        cmd_search(
            &Settings::default(),
            &TagTable::builtin(),
            &request(&["kubernetes"], &[], OutputFormat::Table, &index),
            out,
        )
    });

    assert_eq!(out, "No results found.\n");
}

#[test]
fn test_tag_search_ignores_index_and_expands_composites() {
    let table = TagTable::from_entries([
        ("web", vec!["lint", "agents/frontend/ui-designer"]),
        ("lint", vec!["hooks/quality/eslint", "web"]),
    ]);
    let missing = Path::new("does/not/exist.json");

    let (code, out) = output_of(|out| {
        cmd_search(
            &Settings::default(),
            &table,
            &request(&[], &["WEB"], OutputFormat::Json, missing),
            out,
        )
    });

    assert_eq!(code, ExitCode::SUCCESS);
    let hits: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
    let paths: Vec<&str> = hits.iter().map(|h| h["path"].as_str().unwrap()).collect();
    assert_eq!(paths, vec!["agents/frontend/ui-designer", "hooks/quality/eslint"]);
    assert_eq!(
        hits[1]["install_cmd"],
        "npx claude-code-templates@latest --hook quality/eslint"
    );
}

#[test]
fn test_search_without_query_or_tags_is_usage_error() {
    let mut out = Vec::new();
    let result = cmd_search(
        &Settings::default(),
        &TagTable::builtin(),
        &request(&[], &[], OutputFormat::Table, Path::new("index.json")),
        &mut out,
    );

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AitmplError>(),
        Some(AitmplError::Usage(_))
    ));
}

#[test]
fn test_keyword_search_without_index_suggests_sync() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let result = cmd_search(
        &Settings::default(),
        &TagTable::builtin(),
        &request(&["debug"], &[], OutputFormat::Table, &dir.path().join("missing.json")),
        &mut out,
    );

    let err = result.unwrap_err();
    assert!(err.to_string().contains("aitmpl sync"));
}

// =============================================================================
// list-tags
// =============================================================================

#[test]
fn test_list_tags_shows_usage_and_composite_sections() {
    let (code, out) = output_of(|out| cmd_list_tags(&TagTable::builtin(), out));

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(out.contains("Usage Tags:"));
    assert!(out.contains("Project Type Tags (composite):"));
    assert!(out.contains("fullstack"));
    assert!(out.contains("(+1 more)"));
}

// =============================================================================
// dispatch: flags over settings
// =============================================================================

const SETS_YAML: &str = r#"
sets:
  frontend:
    description: Frontend stack
    agents:
      - development-team/frontend-developer
"#;

/// Settings whose manifest and index paths do not exist.
fn settings_pointing_nowhere(dir: &Path) -> Settings {
    Settings {
        index_path: dir.join("missing-index.json"),
        sets_path: dir.join("missing-sets.yaml"),
        ..Settings::default()
    }
}

fn run_cli(args: &[&str], settings: &Settings) -> (anyhow::Result<ExitCode>, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let result = dispatch(cli.command.unwrap(), settings, cli.dry_run, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn write_sets(dir: &Path) -> String {
    let path = dir.join("sets.yaml");
    fs::write(&path, SETS_YAML).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_install_flags_override_settings() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_pointing_nowhere(dir.path());
    let sets = write_sets(dir.path());

    let (result, out) = run_cli(
        &[
            "aitmpl",
            "install",
            "frontend",
            "--dry-run",
            "-f",
            sets.as_str(),
            "--installer",
            "echo tpl",
        ],
        &settings,
    );

    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert!(out.contains("echo tpl --agent development-team/frontend-developer"));
    assert!(!out.contains("npx claude-code-templates@latest"));
}

#[test]
fn test_install_without_file_flag_uses_settings_path() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_pointing_nowhere(dir.path());

    let (result, _) = run_cli(&["aitmpl", "install", "frontend", "--dry-run"], &settings);

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AitmplError>(),
        Some(AitmplError::ManifestNotFound { path }) if path == &settings.sets_path
    ));
}

#[test]
fn test_dry_run_does_not_parse_installer_command() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_pointing_nowhere(dir.path());
    let sets = write_sets(dir.path());

    let (result, out) = run_cli(
        &["aitmpl", "install", "frontend", "--dry-run", "-f", sets.as_str(), "--installer", ""],
        &settings,
    );

    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert!(out.contains("[DRY RUN]"));
    assert!(out.contains("--agent development-team/frontend-developer"));
}

#[test]
fn test_real_install_rejects_empty_installer_command() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_pointing_nowhere(dir.path());
    let sets = write_sets(dir.path());

    let (result, out) = run_cli(
        &["aitmpl", "install", "frontend", "-f", sets.as_str(), "--installer", ""],
        &settings,
    );

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AitmplError>(),
        Some(AitmplError::Config(_))
    ));
    assert!(out.is_empty());
}

#[test]
fn test_search_index_flag_overrides_settings() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_pointing_nowhere(dir.path());
    let index = synced_index(dir.path());
    let index = index.to_str().unwrap();

    let (result, out) = run_cli(
        &["aitmpl", "search", "debug", "-i", index, "-f", "commands"],
        &settings,
    );

    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert_eq!(
        out,
        "npx claude-code-templates@latest --agent development-tools/debugger\n"
    );

    let (result, _) = run_cli(&["aitmpl", "search", "debug"], &settings);
    assert!(matches!(
        result.unwrap_err().downcast_ref::<AitmplError>(),
        Some(AitmplError::IndexNotFound { .. })
    ));
}

#[test]
fn test_list_sets_file_flag_overrides_settings() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_pointing_nowhere(dir.path());
    let sets = write_sets(dir.path());

    let (result, out) = run_cli(&["aitmpl", "list-sets", "-f", sets.as_str()], &settings);

    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert!(out.contains("frontend"));
}
