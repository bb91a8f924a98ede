//! Dependency resolution and installation
//!
//! This module provides:
//! - The version table mapping dependency names to install ranges
//! - Package manager detection (npm, pnpm, yarn, bun)
//! - The package manager runner behind the `PackageInstaller` trait

pub mod package_manager;
pub mod runner;
pub mod versions;

use crate::error::Result;

pub use package_manager::{PackageManager, PackageManagerInfo};
pub use runner::{CommandInstaller, PackageInstaller};
pub use versions::VersionTable;

/// Install a component's dependencies in one batched invocation.
///
/// Returns the specifiers that were installed, or `None` when there was nothing
/// to install (in which case the package manager is not invoked at all).
pub async fn resolve_dependencies<I: PackageInstaller>(
    names: &[String],
    table: &VersionTable,
    installer: &I,
) -> Result<Option<Vec<String>>> {
    let specs = table.specs_for(names);
    if specs.is_empty() {
        tracing::debug!("no dependencies to install");
        return Ok(None);
    }

    installer.install(&specs).await?;
    Ok(Some(specs))
}

#[cfg(test)]
mod tests {
    use super::runner::testing::RecordingInstaller;
    use super::*;
    use crate::error::InstallError;

    #[tokio::test]
    async fn test_empty_dependencies_skip_invocation() {
        let installer = RecordingInstaller::default();
        let installed = resolve_dependencies(&[], &VersionTable::builtin(), &installer)
            .await
            .unwrap();

        assert!(installed.is_none());
        assert!(installer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dependencies_install_in_one_call() {
        let installer = RecordingInstaller::default();
        let names = vec![
            "three".to_string(),
            "@react-three/fiber".to_string(),
            "@react-three/drei".to_string(),
        ];
        let installed = resolve_dependencies(&names, &VersionTable::builtin(), &installer)
            .await
            .unwrap();

        let expected = vec![
            "three@^0.158.0".to_string(),
            "@react-three/fiber@^8.15.12".to_string(),
            "@react-three/drei@^9.92.7".to_string(),
        ];
        assert_eq!(installed, Some(expected.clone()));
        assert_eq!(installer.calls(), vec![expected]);
    }

    #[tokio::test]
    async fn test_install_failure_is_surfaced() {
        let installer = RecordingInstaller::failing();
        let err = resolve_dependencies(&["three".to_string()], &VersionTable::builtin(), &installer)
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::DependencyInstallFailed { .. }));
        assert_eq!(installer.calls().len(), 1);
    }
}
