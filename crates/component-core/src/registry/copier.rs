//! Component file materialization
//!
//! Copies every mapped file from the component package into the target project,
//! in manifest order. Targets are overwritten unconditionally, so re-running an
//! install produces byte-identical files.
//!
//! Mapped paths never leave their root: a leading `/` (or drive prefix) is
//! dropped, and a mapping containing `..` is skipped with a warning.
//!
//! Materialization is not transactional: if writing one file fails, files that
//! were already written stay in place and the error is returned.

use crate::error::{InstallWarning, Result};
use crate::registry::manifest::{ComponentKind, LoadedManifest};
use anyhow::Context;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// A file written into the target project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    /// Target path as written in the manifest
    pub target: String,
    /// Absolute location that was written
    pub path: PathBuf,
    pub kind: ComponentKind,
}

/// Outcome of materializing one manifest
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub copied: Vec<CopiedFile>,
    pub warnings: Vec<InstallWarning>,
}

impl InstallReport {
    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

/// Copy the manifest's files into `project_root`
pub async fn materialize(loaded: &LoadedManifest, project_root: &Path) -> Result<InstallReport> {
    let manifest = &loaded.manifest;
    let mut report = InstallReport::default();

    for (index, mapping) in manifest.files.iter().enumerate() {
        if !mapping.is_complete() {
            tracing::debug!(component = %manifest.name, index, "file mapping is missing path or target");
            report
                .warnings
                .push(InstallWarning::MissingMappingFields { index });
            continue;
        }

        let (source_path, target_path) = match (
            join_within(&loaded.package_root, &mapping.source_path),
            join_within(project_root, &mapping.target_path),
        ) {
            (Some(source), Some(target)) => (source, target),
            (source, _) => {
                let path = match source {
                    Some(_) => &mapping.target_path,
                    None => &mapping.source_path,
                };
                tracing::debug!(component = %manifest.name, index, "mapping path escapes its root: {}", path);
                report.warnings.push(InstallWarning::PathEscapesRoot {
                    index,
                    path: path.clone(),
                });
                continue;
            }
        };

        // Ensure parent directories exist
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        if !is_file(&source_path).await {
            tracing::debug!(component = %manifest.name, "source file not found: {}", source_path.display());
            report
                .warnings
                .push(InstallWarning::SourceMissing { path: source_path });
            continue;
        }

        fs::copy(&source_path, &target_path).await.with_context(|| {
            format!(
                "Failed to copy {} to {}",
                source_path.display(),
                target_path.display()
            )
        })?;
        tracing::debug!(component = %manifest.name, "copied {}", mapping.target_path);

        report.copied.push(CopiedFile {
            target: mapping.target_path.clone(),
            path: target_path,
            kind: mapping.kind_or(&manifest.kind),
        });
    }

    Ok(report)
}

/// Join a manifest path onto `root`, treating it as relative even when it
/// starts with `/`. `None` when a `..` segment would climb out or nothing
/// below `root` is named.
fn join_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut joined = root.to_path_buf();
    let mut named = false;
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => {
                joined.push(part);
                named = true;
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => return None,
        }
    }
    named.then_some(joined)
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::manifest::{ComponentManifest, FileMapping};
    use tempfile::TempDir;

    fn mapping(source: &str, target: &str) -> FileMapping {
        FileMapping {
            source_path: source.to_string(),
            target_path: target.to_string(),
            kind: None,
        }
    }

    fn loaded(package_root: &Path, files: Vec<FileMapping>) -> LoadedManifest {
        LoadedManifest {
            manifest: ComponentManifest {
                name: "split-display".to_string(),
                description: String::new(),
                kind: ComponentKind::Component,
                dependencies: vec!["three".to_string()],
                registry_dependencies: vec![],
                files,
            },
            package_root: package_root.to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_copies_into_nested_target() {
        let package = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        std::fs::write(package.path().join("split-display.tsx"), "export {}\n").unwrap();

        let manifest = loaded(
            package.path(),
            vec![mapping("split-display.tsx", "components/split-display.tsx")],
        );
        let report = materialize(&manifest, project.path()).await.unwrap();

        assert_eq!(report.copied_count(), 1);
        assert_eq!(report.warning_count(), 0);
        let written =
            std::fs::read_to_string(project.path().join("components/split-display.tsx")).unwrap();
        assert_eq!(written, "export {}\n");
    }

    #[tokio::test]
    async fn test_materialize_twice_is_byte_identical() {
        let package = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let bytes: Vec<u8> = (0u8..=255).collect();
        std::fs::write(package.path().join("blob.bin"), &bytes).unwrap();
        std::fs::write(package.path().join("a.tsx"), "a").unwrap();

        let manifest = loaded(
            package.path(),
            vec![mapping("blob.bin", "public/blob.bin"), mapping("a.tsx", "a.tsx")],
        );

        materialize(&manifest, project.path()).await.unwrap();
        let first = std::fs::read(project.path().join("public/blob.bin")).unwrap();
        materialize(&manifest, project.path()).await.unwrap();
        let second = std::fs::read(project.path().join("public/blob.bin")).unwrap();

        assert_eq!(first, bytes);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_overwrites_existing_target() {
        let package = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        std::fs::write(package.path().join("a.tsx"), "new").unwrap();
        std::fs::write(project.path().join("a.tsx"), "old local edits").unwrap();

        let manifest = loaded(package.path(), vec![mapping("a.tsx", "a.tsx")]);
        materialize(&manifest, project.path()).await.unwrap();

        assert_eq!(std::fs::read_to_string(project.path().join("a.tsx")).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_incomplete_mappings_warn_without_failing() {
        let package = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        std::fs::write(package.path().join("ok.tsx"), "ok").unwrap();

        let manifest = loaded(
            package.path(),
            vec![
                mapping("", "components/a.tsx"),
                mapping("b.tsx", ""),
                mapping("ok.tsx", "components/ok.tsx"),
            ],
        );
        let report = materialize(&manifest, project.path()).await.unwrap();

        assert_eq!(report.copied_count(), 1);
        assert_eq!(
            report.warnings,
            vec![
                InstallWarning::MissingMappingFields { index: 0 },
                InstallWarning::MissingMappingFields { index: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_source_is_a_warning() {
        let package = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        std::fs::write(package.path().join("present.tsx"), "p").unwrap();

        let manifest = loaded(
            package.path(),
            vec![
                mapping("absent.tsx", "components/absent.tsx"),
                mapping("present.tsx", "components/present.tsx"),
            ],
        );
        let report = materialize(&manifest, project.path()).await.unwrap();

        assert_eq!(report.copied_count(), 1);
        assert_eq!(
            report.warnings,
            vec![InstallWarning::SourceMissing {
                path: package.path().join("absent.tsx")
            }]
        );
        assert!(!project.path().join("components/absent.tsx").exists());
        assert!(project.path().join("components/present.tsx").exists());
    }

    #[tokio::test]
    async fn test_absolute_target_stays_inside_project() {
        let package = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        std::fs::write(package.path().join("a.tsx"), "a").unwrap();

        let outside = elsewhere.path().join("escaped.tsx");
        let target = outside.to_string_lossy().to_string();
        let manifest = loaded(package.path(), vec![mapping("a.tsx", &target)]);
        let report = materialize(&manifest, project.path()).await.unwrap();

        assert_eq!(report.copied_count(), 1);
        assert!(!outside.exists());
        assert!(report.copied[0].path.starts_with(project.path()));
        assert!(report.copied[0].path.is_file());
    }

    #[tokio::test]
    async fn test_parent_segments_are_skipped_with_warning() {
        let root = TempDir::new().unwrap();
        let package = root.path().join("package");
        let project = root.path().join("project");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(package.join("a.tsx"), "a").unwrap();
        std::fs::write(root.path().join("secret.txt"), "s").unwrap();

        let manifest = loaded(
            &package,
            vec![
                mapping("a.tsx", "../escaped.tsx"),
                mapping("../secret.txt", "components/secret.txt"),
                mapping("a.tsx", "components/./a.tsx"),
                mapping("a.tsx", "/"),
            ],
        );
        let report = materialize(&manifest, &project).await.unwrap();

        assert_eq!(report.copied_count(), 1);
        assert_eq!(
            report.warnings,
            vec![
                InstallWarning::PathEscapesRoot {
                    index: 0,
                    path: "../escaped.tsx".to_string()
                },
                InstallWarning::PathEscapesRoot {
                    index: 1,
                    path: "../secret.txt".to_string()
                },
                InstallWarning::PathEscapesRoot {
                    index: 3,
                    path: "/".to_string()
                },
            ]
        );
        assert!(!root.path().join("escaped.tsx").exists());
        assert!(!project.join("components/secret.txt").exists());
        assert!(project.join("components/a.tsx").is_file());
    }

    #[tokio::test]
    async fn test_empty_files_reports_nothing() {
        let package = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        let report = materialize(&loaded(package.path(), vec![]), project.path())
            .await
            .unwrap();

        assert_eq!(report.copied_count(), 0);
        assert_eq!(report.warning_count(), 0);
    }
}
