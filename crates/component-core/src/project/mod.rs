//! Target project inspection and scaffolding
//!
//! The target project is the consumer's directory. It is inspected once per run
//! (base directory, router kind) and only written inside paths named by
//! manifests, scaffolds and the env file.

pub mod env_file;
pub mod scaffold;

use std::fmt;
use std::path::{Path, PathBuf};

pub use env_file::{merge_env_file, EnvMerge, EnvVar};
pub use scaffold::{scaffold, ScaffoldFile, ScaffoldReport, ScaffoldSet};

/// Routing convention of a Next.js project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterKind {
    App,
    Pages,
}

impl fmt::Display for RouterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterKind::App => f.write_str("app"),
            RouterKind::Pages => f.write_str("pages"),
        }
    }
}

/// `src/` when it is a directory, otherwise the project root
pub fn detect_base_dir(project_root: &Path) -> PathBuf {
    let src = project_root.join("src");
    if src.is_dir() {
        src
    } else {
        project_root.to_path_buf()
    }
}

/// `app` wins when both `app/` and `pages/` exist, and is the default when neither does
pub fn detect_router(base_dir: &Path) -> RouterKind {
    if base_dir.join("app").is_dir() {
        RouterKind::App
    } else if base_dir.join("pages").is_dir() {
        RouterKind::Pages
    } else {
        RouterKind::App
    }
}

/// The consumer project, as detected at the start of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetProject {
    root: PathBuf,
    base_dir: PathBuf,
    router: RouterKind,
}

impl TargetProject {
    /// Inspect the project once; the result does not change for the rest of the run
    pub fn detect(root: &Path) -> Self {
        let base_dir = detect_base_dir(root);
        let router = detect_router(&base_dir);
        tracing::debug!(
            base_dir = %base_dir.display(),
            %router,
            "detected target project layout"
        );
        Self {
            root: root.to_path_buf(),
            base_dir,
            router,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn router(&self) -> RouterKind {
        self.router
    }

    /// Base directory relative to the root, `.` when they are the same
    pub fn base_dir_display(&self) -> String {
        match self.base_dir.strip_prefix(&self.root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
            _ => ".".to_string(),
        }
    }

    /// The root layout entry point (`<base>/app/layout.tsx`)
    pub fn layout_path(&self) -> PathBuf {
        self.base_dir.join("app").join("layout.tsx")
    }

    pub fn env_file_path(&self) -> PathBuf {
        self.root.join(".env.local")
    }
}
