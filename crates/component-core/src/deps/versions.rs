//! Version pins for component dependencies

use crate::error::{InstallError, Result};
use semver::VersionReq;
use std::collections::BTreeMap;

/// Range used for dependencies that have no pin
pub const DEFAULT_RANGE: &str = "*";

/// Known-good ranges for dependencies the bundled components use
const BUILTIN_PINS: &[(&str, &str)] = &[
    ("three", "^0.158.0"),
    ("@react-three/fiber", "^8.15.12"),
    ("@react-three/drei", "^9.92.7"),
    ("@workos-inc/authkit-nextjs", "^2.10.0"),
];

/// Maps dependency names to install ranges, with a fallback for unknown names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTable {
    pins: BTreeMap<String, String>,
    default_range: String,
}

impl Default for VersionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl VersionTable {
    /// An empty table with the given fallback range
    pub fn new(default_range: impl Into<String>) -> Self {
        Self {
            pins: BTreeMap::new(),
            default_range: default_range.into(),
        }
    }

    /// The pins shipped with the installer
    pub fn builtin() -> Self {
        let mut table = Self::new(DEFAULT_RANGE);
        for (name, range) in BUILTIN_PINS {
            table.pin(*name, *range);
        }
        table
    }

    /// Add or replace a pin
    pub fn pin(&mut self, name: impl Into<String>, range: impl Into<String>) -> &mut Self {
        self.pins.insert(name.into(), range.into());
        self
    }

    pub fn set_default_range(&mut self, range: impl Into<String>) {
        self.default_range = range.into();
    }

    pub fn default_range(&self) -> &str {
        &self.default_range
    }

    /// The range a dependency installs with
    pub fn range_for(&self, name: &str) -> &str {
        self.pins
            .get(name)
            .map(String::as_str)
            .unwrap_or(&self.default_range)
    }

    /// Install specifier (`name@range`); names that already carry a version are kept
    pub fn spec_for(&self, name: &str) -> String {
        if has_version(name) {
            return name.to_string();
        }
        format!("{}@{}", name, self.range_for(name))
    }

    /// Specifiers for a dependency list, first occurrence wins on duplicates
    pub fn specs_for(&self, names: &[String]) -> Vec<String> {
        let mut specs: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let spec = self.spec_for(name);
            if !specs.contains(&spec) {
                specs.push(spec);
            }
        }
        specs
    }

    /// Check every range (and the fallback) parses as a semver requirement
    pub fn validate(&self) -> Result<()> {
        let entries = self
            .pins
            .iter()
            .map(|(name, range)| (name.as_str(), range.as_str()))
            .chain(std::iter::once(("<default>", self.default_range.as_str())));

        for (package, range) in entries {
            VersionReq::parse(range).map_err(|e| InstallError::InvalidVersionRange {
                package: package.to_string(),
                range: range.to_string(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// `three@1`, `@scope/pkg@2` carry a version; `@scope/pkg` does not
fn has_version(name: &str) -> bool {
    let unscoped = name.strip_prefix('@').unwrap_or(name);
    unscoped.contains('@')
}
