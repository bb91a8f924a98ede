//! Installer configuration
//!
//! Settings come from, in increasing precedence: built-in defaults, an optional
//! `scad.yaml` in the target project, environment variables named by the
//! product, and CLI flags (applied by the caller).

use crate::deps::{PackageManager, VersionTable};
use crate::error::{InstallError, Result};
use crate::product::ProductConfig;
use crate::registry::ComponentSource;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file looked up at the target project root
pub const CONFIG_FILE: &str = "scad.yaml";

/// Per-project installer settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallerConfig {
    /// Package manager to use instead of lockfile detection
    #[serde(default)]
    pub package_manager: Option<PackageManager>,

    /// Version pins added to (or replacing) the built-in table
    #[serde(default)]
    pub versions: BTreeMap<String, String>,

    /// Range for dependencies without a pin
    #[serde(default)]
    pub default_range: Option<String>,

    /// Local registry directory to read component packages from
    #[serde(default)]
    pub registry_dir: Option<PathBuf>,
}

impl InstallerConfig {
    /// Load `scad.yaml` from the project root, or defaults when there is none.
    /// A relative `registry_dir` is resolved against the project root.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let mut config: InstallerConfig =
            serde_yaml::from_str(&content).map_err(|e| InstallError::Config {
                path: path.clone(),
                message: e.to_string(),
            })?;
        if let Some(dir) = config.registry_dir.take() {
            config.registry_dir = Some(project_root.join(dir));
        }
        tracing::debug!("loaded installer config from {}", path.display());
        Ok(config)
    }

    /// Apply the product's environment overrides
    pub fn apply_env<C: ProductConfig>(&mut self, product: &C) -> Result<()> {
        self.apply_overrides(product, |name| std::env::var(name).ok())
    }

    fn apply_overrides<C, F>(&mut self, product: &C, lookup: F) -> Result<()>
    where
        C: ProductConfig,
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(product.package_manager_env()) {
            let manager = value.parse::<PackageManager>().map_err(|message| {
                InstallError::Config {
                    path: PathBuf::from(format!("${}", product.package_manager_env())),
                    message,
                }
            })?;
            self.package_manager = Some(manager);
        }
        if let Some(dir) = lookup(product.registry_dir_env()).filter(|d| !d.is_empty()) {
            self.registry_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// Built-in pins overlaid with configured ones, validated
    pub fn version_table(&self) -> Result<VersionTable> {
        let mut table = VersionTable::builtin();
        for (name, range) in &self.versions {
            table.pin(name.as_str(), range.as_str());
        }
        if let Some(range) = &self.default_range {
            table.set_default_range(range.as_str());
        }
        table.validate()?;
        Ok(table)
    }

    /// Configured package manager, else the one the project's lockfile implies
    pub fn package_manager(&self, project_root: &Path) -> PackageManager {
        self.package_manager
            .unwrap_or_else(|| PackageManager::detect(project_root))
    }

    /// Local registry when configured, else the project's `node_modules`
    pub fn source(&self, project_root: &Path, scope: &str) -> ComponentSource {
        match &self.registry_dir {
            Some(dir) => ComponentSource::local(dir.clone()),
            None => ComponentSource::node_modules(project_root, scope),
        }
    }
}
