//! Tool settings: file locations, catalog source, and installer command.
//!
//! Every field has a default, so a settings file only needs the keys it
//! overrides. Command-line flags override both.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AitmplError;

pub const DEFAULT_INDEX_PATH: &str = ".claude/aitmpl-index.json";
pub const DEFAULT_SETS_PATH: &str = ".claude/template-sets.yaml";
pub const DEFAULT_INSTALLER: &str = "npx claude-code-templates@latest";
pub const DEFAULT_REPO_URL: &str = "https://github.com/davila7/claude-code-templates.git";
pub const DEFAULT_SOURCE_URL: &str = "https://github.com/davila7/claude-code-templates";
pub const DEFAULT_COMPONENTS_PATH: &str = "cli-tool/components";

/// Settings that can be saved/loaded as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where `sync` writes and `search` reads the catalog index
    pub index_path: PathBuf,
    /// Template-set manifest
    pub sets_path: PathBuf,
    /// Installer invocation prefix; `--<category> <item>` is appended
    pub installer_command: String,
    /// Repository cloned by `sync`
    pub repo_url: String,
    /// Recorded as `source` in the index
    pub source_url: String,
    /// Directory inside the clone holding the category folders
    pub components_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
            sets_path: PathBuf::from(DEFAULT_SETS_PATH),
            installer_command: DEFAULT_INSTALLER.to_string(),
            repo_url: DEFAULT_REPO_URL.to_string(),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            components_path: PathBuf::from(DEFAULT_COMPONENTS_PATH),
        }
    }
}

impl Settings {
    /// Defaults, or the given settings file when one is passed.
    pub fn resolve(config: Option<&Path>) -> Result<Self> {
        match config {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path.as_ref()))?;

        let settings: Self =
            serde_json::from_str(&content).context("Failed to parse settings JSON")?;

        tracing::debug!(path = %path.as_ref().display(), "loaded settings");
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize settings to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write settings to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Split the installer command into program and leading arguments.
    pub fn installer_argv(&self) -> crate::error::Result<(String, Vec<String>)> {
        let mut words = shell_words::split(&self.installer_command).map_err(|e| {
            AitmplError::config(format!(
                "invalid installer command {:?}: {}",
                self.installer_command, e
            ))
        })?;

        if words.is_empty() {
            return Err(AitmplError::config("installer command is empty"));
        }
        let program = words.remove(0);
        Ok((program, words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.index_path, PathBuf::from(".claude/aitmpl-index.json"));
        assert_eq!(settings.sets_path, PathBuf::from(".claude/template-sets.yaml"));
        assert_eq!(settings.installer_command, "npx claude-code-templates@latest");
    }

    #[test]
    fn test_resolve_without_file_is_default() {
        let settings = Settings::resolve(None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aitmpl.json");
        fs::write(&path, r#"{ "installer_command": "echo install" }"#).unwrap();

        let settings = Settings::load_from_file(&path).unwrap();
        assert_eq!(settings.installer_command, "echo install");
        assert_eq!(settings.sets_path, PathBuf::from(DEFAULT_SETS_PATH));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aitmpl.json");
        let settings = Settings {
            index_path: PathBuf::from("custom/index.json"),
            ..Settings::default()
        };
        settings.save_to_file(&path).unwrap();

        let loaded = Settings::load_from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::resolve(Some(&dir.path().join("absent.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_installer_argv() {
        let settings = Settings::default();
        let (program, args) = settings.installer_argv().unwrap();
        assert_eq!(program, "npx");
        assert_eq!(args, vec!["claude-code-templates@latest"]);
    }

    #[test]
    fn test_installer_argv_quoted() {
        let settings = Settings {
            installer_command: "'/opt/my tools/install' --yes".to_string(),
            ..Settings::default()
        };
        let (program, args) = settings.installer_argv().unwrap();
        assert_eq!(program, "/opt/my tools/install");
        assert_eq!(args, vec!["--yes"]);
    }

    #[test]
    fn test_installer_argv_empty() {
        let settings = Settings {
            installer_command: "   ".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.installer_argv(),
            Err(AitmplError::Config(_))
        ));
    }
}
