//! Package manager detection for the target project

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;

/// Supported JavaScript package managers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

/// Lockfiles in order of precedence
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
    ("package-lock.json", PackageManager::Npm),
];

impl PackageManager {
    /// Detect the project's package manager from its lockfile, defaulting to npm
    pub fn detect(project_root: &Path) -> Self {
        for (lockfile, manager) in LOCKFILES {
            if project_root.join(lockfile).is_file() {
                return *manager;
            }
        }
        PackageManager::Npm
    }

    /// Binary name
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Subcommand that adds packages to the project
    pub fn add_verb(&self) -> &'static str {
        match self {
            PackageManager::Npm => "install",
            PackageManager::Pnpm | PackageManager::Yarn | PackageManager::Bun => "add",
        }
    }

    /// The shell-level command line for installing `specs`
    pub fn command_line(&self, specs: &[String]) -> String {
        format!("{} {} {}", self.program(), self.add_verb(), specs.join(" "))
    }

    /// Check whether the binary is available
    pub fn check(&self) -> PackageManagerInfo {
        let output = Command::new(self.program()).arg("--version").output();

        match output {
            Ok(out) if out.status.success() => {
                let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
                PackageManagerInfo {
                    manager: *self,
                    version: Some(version),
                    available: true,
                }
            }
            _ => PackageManagerInfo {
                manager: *self,
                version: None,
                available: false,
            },
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            "bun" => Ok(PackageManager::Bun),
            other => Err(format!(
                "Unknown package manager '{}' (expected npm, pnpm, yarn or bun)",
                other
            )),
        }
    }
}

/// Package manager probe result
#[derive(Debug, Clone)]
pub struct PackageManagerInfo {
    pub manager: PackageManager,
    pub version: Option<String>,
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_defaults_to_npm() {
        let dir = TempDir::new().unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Npm);
    }

    #[test]
    fn test_detect_from_lockfile() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("yarn.lock"), "").unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Yarn);

        std::fs::write(dir.path().join("pnpm-lock.yaml"), "").unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Pnpm);
    }

    #[test]
    fn test_command_line_uses_single_batched_call() {
        let specs = vec!["three@^0.158.0".to_string(), "clsx@*".to_string()];
        assert_eq!(
            PackageManager::Npm.command_line(&specs),
            "npm install three@^0.158.0 clsx@*"
        );
        assert_eq!(
            PackageManager::Pnpm.command_line(&specs),
            "pnpm add three@^0.158.0 clsx@*"
        );
    }

    #[test]
    fn test_parse_package_manager() {
        assert_eq!("Bun".parse::<PackageManager>(), Ok(PackageManager::Bun));
        assert!("pip".parse::<PackageManager>().is_err());
    }
}
