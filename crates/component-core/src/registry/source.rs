//! Component package locations
//!
//! A component package is a directory holding `index.json` plus the files it
//! maps. Packages come either from a local registry directory (for development)
//! or from `node_modules` after the package manager has fetched them.

use super::manifest::{ComponentManifest, MANIFEST_FILE};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where component packages are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentSource {
    /// A directory of `<name>/index.json` packages
    Local(PathBuf),
    /// Packages installed under `<project>/node_modules/<scope>/<name>`
    NodeModules { project_root: PathBuf, scope: String },
}

impl ComponentSource {
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }

    pub fn node_modules(project_root: &Path, scope: &str) -> Self {
        Self::NodeModules {
            project_root: project_root.to_path_buf(),
            scope: scope.to_string(),
        }
    }

    /// Package root for a component name
    pub fn package_root(&self, name: &str) -> PathBuf {
        match self {
            ComponentSource::Local(dir) => dir.join(name),
            ComponentSource::NodeModules {
                project_root,
                scope,
            } => project_root.join("node_modules").join(scope).join(name),
        }
    }

    /// Package specifier the package manager must fetch before the package root
    /// exists (`None` for local sources)
    pub fn package_spec(&self, name: &str) -> Option<String> {
        match self {
            ComponentSource::Local(_) => None,
            ComponentSource::NodeModules { scope, .. } => Some(format!("{}/{}", scope, name)),
        }
    }
}

/// A package found on disk by [`discover_packages`]
#[derive(Debug, Clone)]
pub struct DiscoveredPackage {
    pub package_root: PathBuf,
    pub manifest: ComponentManifest,
}

/// Scan a local registry directory for component packages, sorted by name.
///
/// Packages whose `index.json` cannot be parsed are skipped with a log line;
/// listing never fails because of one bad package.
pub fn discover_packages(registry_dir: &Path) -> Vec<DiscoveredPackage> {
    let mut packages: Vec<DiscoveredPackage> = WalkDir::new(registry_dir)
        .min_depth(2)
        .max_depth(3)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE)
        .filter_map(|entry| {
            let path = entry.path();
            let content = std::fs::read_to_string(path).ok()?;
            match ComponentManifest::from_json(&content, path) {
                Ok(manifest) => Some(DiscoveredPackage {
                    package_root: path.parent()?.to_path_buf(),
                    manifest,
                }),
                Err(e) => {
                    tracing::debug!("skipping package: {}", e);
                    None
                }
            }
        })
        .collect();

    packages.sort_by(|a, b| a.manifest.name.cmp(&b.manifest.name));
    packages
}
