//! Error handling module for aitmpl
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Resolution itself never fails; these errors come from the layers around it
//! (manifest and index files, git, the installer command).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for aitmpl
#[derive(Error, Debug)]
pub enum AitmplError {
    /// IO errors (file operations, process spawning)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors (index, settings)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse errors (template-set manifest)
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Template-set manifest does not exist
    #[error("{} not found", path.display())]
    ManifestNotFound { path: PathBuf },

    /// Catalog index does not exist
    #[error("Index file not found at {}. Run `aitmpl sync` first to create the index.", path.display())]
    IndexNotFound { path: PathBuf },

    /// Requested set is not defined in the manifest
    #[error("Set '{name}' not found")]
    SetNotFound { name: String, available: Vec<String> },

    /// `git` binary is not on PATH
    #[error("Git not found. Please install git.")]
    GitNotFound,

    /// `git clone` exited unsuccessfully
    #[error("Git clone failed: {0}")]
    CloneFailed(String),

    /// Settings errors (bad installer command, unreadable config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Installer could not be launched
    #[error("Installer error: {0}")]
    Installer(String),

    /// Command-line usage errors not caught by clap
    #[error("Usage error: {0}")]
    Usage(String),
}

/// Result type alias for aitmpl operations
pub type Result<T> = std::result::Result<T, AitmplError>;

impl AitmplError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an installer error
    pub fn installer(msg: impl Into<String>) -> Self {
        Self::Installer(msg.into())
    }

    /// Create a usage error
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Sets the user can choose from, when this is a `SetNotFound`.
    pub fn available_sets(&self) -> Option<&[String]> {
        match self {
            Self::SetNotFound { available, .. } => Some(available),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AitmplError::config("installer command is empty");
        assert_eq!(
            err.to_string(),
            "Configuration error: installer command is empty"
        );

        let err = AitmplError::ManifestNotFound {
            path: PathBuf::from(".claude/template-sets.yaml"),
        };
        assert_eq!(err.to_string(), ".claude/template-sets.yaml not found");
    }

    #[test]
    fn test_index_not_found_mentions_sync() {
        let err = AitmplError::IndexNotFound {
            path: PathBuf::from("idx.json"),
        };
        let msg = err.to_string();
        assert!(msg.contains("idx.json"));
        assert!(msg.contains("sync"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AitmplError = io_err.into();
        assert!(matches!(err, AitmplError::Io(_)));
    }

    #[test]
    fn test_available_sets() {
        let err = AitmplError::SetNotFound {
            name: "nope".to_string(),
            available: vec!["base".to_string(), "frontend".to_string()],
        };
        assert_eq!(err.to_string(), "Set 'nope' not found");
        assert_eq!(err.available_sets().unwrap(), ["base", "frontend"]);

        assert!(AitmplError::GitNotFound.available_sets().is_none());
    }
}
