//! Component manifest types and parsing

use crate::error::{InstallError, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the descriptor at the root of every component package
pub const MANIFEST_FILE: &str = "index.json";

/// Registry item categories
///
/// Types outside the known set are kept verbatim as [`ComponentKind::Other`];
/// the kind is informational and never changes how a file is installed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ComponentKind {
    #[default]
    Component,
    Ui,
    Block,
    Page,
    Lib,
    Hook,
    File,
    Style,
    Theme,
    Other(String),
}

const KNOWN_KINDS: &[(&str, ComponentKind)] = &[
    ("registry:component", ComponentKind::Component),
    ("registry:ui", ComponentKind::Ui),
    ("registry:block", ComponentKind::Block),
    ("registry:page", ComponentKind::Page),
    ("registry:lib", ComponentKind::Lib),
    ("registry:hook", ComponentKind::Hook),
    ("registry:file", ComponentKind::File),
    ("registry:style", ComponentKind::Style),
    ("registry:theme", ComponentKind::Theme),
];

impl ComponentKind {
    pub fn as_str(&self) -> &str {
        match self {
            ComponentKind::Other(kind) => kind,
            known => KNOWN_KINDS
                .iter()
                .find(|(_, kind)| kind == known)
                .map(|(name, _)| *name)
                .unwrap_or_default(),
        }
    }
}

impl From<String> for ComponentKind {
    fn from(value: String) -> Self {
        KNOWN_KINDS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, kind)| kind.clone())
            .unwrap_or(ComponentKind::Other(value))
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file contributed by a component
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileMapping {
    /// Path relative to the component package root
    #[serde(default, rename = "path", deserialize_with = "null_as_empty")]
    pub source_path: String,

    /// Path relative to the consumer project root
    #[serde(default, rename = "target", deserialize_with = "null_as_empty")]
    pub target_path: String,

    /// Overrides the owning manifest's kind when present
    #[serde(default, rename = "type")]
    pub kind: Option<ComponentKind>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl FileMapping {
    /// Both paths are present
    pub fn is_complete(&self) -> bool {
        !self.source_path.trim().is_empty() && !self.target_path.trim().is_empty()
    }

    /// The mapping's kind, falling back to the owning manifest's kind
    pub fn kind_or(&self, manifest_kind: &ComponentKind) -> ComponentKind {
        self.kind.as_ref().unwrap_or(manifest_kind).clone()
    }
}

/// Component descriptor (`<package>/index.json`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentManifest {
    /// Unique name across the registry
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, rename = "type")]
    pub kind: ComponentKind,

    /// Package-level runtime dependencies
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Other components that should be installed first (declared only)
    #[serde(default)]
    pub registry_dependencies: Vec<String>,

    /// Files to materialize, in install order
    pub files: Vec<FileMapping>,
}

impl ComponentManifest {
    /// Parse a manifest from JSON text; `origin` is only used for error messages
    pub fn from_json(content: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| InstallError::ManifestMalformed {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// A manifest together with the package root its source paths are relative to
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub manifest: ComponentManifest,
    pub package_root: PathBuf,
}

/// Load `index.json` from a component package root
pub fn load_manifest(package_root: &Path) -> Result<LoadedManifest> {
    let manifest_path = package_root.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(InstallError::ManifestNotFound {
            path: manifest_path,
        });
    }

    let content = std::fs::read_to_string(&manifest_path)?;
    let manifest = ComponentManifest::from_json(&content, &manifest_path)?;
    tracing::debug!(
        name = %manifest.name,
        files = manifest.files.len(),
        "loaded manifest from {}",
        manifest_path.display()
    );

    Ok(LoadedManifest {
        manifest,
        package_root: package_root.to_path_buf(),
    })
}
