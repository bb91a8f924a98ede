//! Router-specific file scaffolding

use super::{RouterKind, TargetProject};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// A file written relative to the project's base directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: &'static str,
    pub contents: &'static str,
}

/// Files to write for each router kind.
///
/// `pages` is a reduced set: when the integration needs the app router, the
/// pages variant only carries placeholders and `pages_notice` explains why.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldSet {
    pub app: Vec<ScaffoldFile>,
    pub pages: Vec<ScaffoldFile>,
    pub pages_notice: Option<&'static str>,
}

/// Files written by [`scaffold`]
#[derive(Debug, Clone, Default)]
pub struct ScaffoldReport {
    pub router: Option<RouterKind>,
    pub written: Vec<PathBuf>,
    /// Set when the scaffold degraded to the reduced pages-router variant
    pub notice: Option<&'static str>,
}

/// Write the variant matching the detected router; existing files are overwritten
pub fn scaffold(project: &TargetProject, set: &ScaffoldSet) -> Result<ScaffoldReport> {
    let router = project.router();
    let (files, notice) = match router {
        RouterKind::App => (&set.app, None),
        RouterKind::Pages => (&set.pages, set.pages_notice),
    };
    if let Some(notice) = notice {
        tracing::debug!("{}", notice);
    }

    let mut report = ScaffoldReport {
        router: Some(router),
        written: Vec::with_capacity(files.len()),
        notice,
    };

    for file in files {
        let dest = project.base_dir().join(file.path);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&dest, file.contents)
            .with_context(|| format!("Failed to write file: {}", dest.display()))?;
        tracing::debug!("scaffolded {}", dest.display());
        report.written.push(dest);
    }

    Ok(report)
}
