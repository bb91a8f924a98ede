//! Error and warning types for component installs
//!
//! Fatal conditions are [`InstallError`] values and abort the step they occur in.
//! Recoverable conditions are [`InstallWarning`] values, collected into reports
//! and echoed to the user without changing the exit status.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal installer errors
#[derive(Debug, Error)]
pub enum InstallError {
    /// The component descriptor does not exist at the resolved location
    #[error("Manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// The descriptor exists but is not a usable manifest
    #[error("Malformed manifest at {}: {message}", path.display())]
    ManifestMalformed { path: PathBuf, message: String },

    /// The package manager exited unsuccessfully (or could not be started)
    #[error("Dependency install failed: `{command}` ({})", describe_exit(*code))]
    DependencyInstallFailed { command: String, code: Option<i32> },

    /// The entry point the source patcher needs is not present
    #[error("Entry point not found: {}", path.display())]
    EntryPointMissing { path: PathBuf },

    /// The component is not part of this registry
    #[error("Component '{name}' not found. Available components: {}", available.join(", "))]
    UnknownComponent {
        name: String,
        available: Vec<String>,
    },

    /// A pinned version range could not be parsed
    #[error("Invalid version range '{range}' for '{package}': {message}")]
    InvalidVersionRange {
        package: String,
        range: String,
        message: String,
    },

    /// Installer configuration could not be loaded
    #[error("Invalid configuration at {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}

/// Result alias for installer operations
pub type Result<T> = std::result::Result<T, InstallError>;

/// Recoverable conditions accumulated during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallWarning {
    /// A file mapping lacks its source or target path (index is 0-based)
    MissingMappingFields { index: usize },

    /// A mapped source file is absent from the component package
    SourceMissing { path: PathBuf },

    /// A mapping's path climbs out of the directory it is relative to
    PathEscapesRoot { index: usize, path: String },
}

impl fmt::Display for InstallWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallWarning::MissingMappingFields { index } => {
                write!(f, "Skipping file #{} - missing path or target", index + 1)
            }
            InstallWarning::SourceMissing { path } => {
                write!(f, "Source file not found: {}", path.display())
            }
            InstallWarning::PathEscapesRoot { index, path } => {
                write!(
                    f,
                    "Skipping file #{} - '{}' points outside the project",
                    index + 1,
                    path
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_failure_mentions_command_and_code() {
        let err = InstallError::DependencyInstallFailed {
            command: "npm install three@^0.158.0".to_string(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("npm install three@^0.158.0"));
        assert!(msg.contains("exit code 1"));
    }

    #[test]
    fn test_unknown_component_lists_available() {
        let err = InstallError::UnknownComponent {
            name: "nope".to_string(),
            available: vec!["split-display".to_string(), "workos-authkit".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Component 'nope' not found. Available components: split-display, workos-authkit"
        );
    }

    #[test]
    fn test_warning_display_is_one_based() {
        let warning = InstallWarning::MissingMappingFields { index: 0 };
        assert_eq!(warning.to_string(), "Skipping file #1 - missing path or target");
    }
}
