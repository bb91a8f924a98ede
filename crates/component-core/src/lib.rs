//! Component Core - Shared library for component registry CLIs
//!
//! This library installs prebuilt UI components into an existing web project.
//! A component is a package carrying an `index.json` manifest; installing it
//! copies the mapped files into the project, installs the npm dependencies the
//! manifest declares, and optionally applies a provider integration (scaffolded
//! files, `.env.local` entries, a root layout patch).
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Manifest loading, file copying, dependency
//!   installs, project detection, source patching
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and `Installer`
//!   pipeline for custom UIs
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based output (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use component_core::{CommandInstaller, InstallerConfig, Installer, TargetProject};
//!
//! let project = TargetProject::detect(&root);
//! let config = InstallerConfig::load(&root)?;
//! let installer = Installer::new(
//!     &MyConfig,
//!     &project,
//!     config.source(&root, MyConfig.npm_scope()),
//!     config.version_table()?,
//!     CommandInstaller::new(config.package_manager(&root), &root),
//! );
//! let installed = installer.install_component("split-display").await?;
//! ```

pub mod config;
pub mod deps;
pub mod error;
pub mod install;
pub mod integrations;
pub mod patch;
pub mod product;
pub mod project;
pub mod registry;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::InstallerConfig;
pub use deps::{CommandInstaller, PackageInstaller, PackageManager, VersionTable};
pub use error::{InstallError, InstallWarning, Result};
pub use install::{ComponentInstall, Installer};
pub use integrations::{apply_integration, Integration, IntegrationReport};
pub use patch::{Anchor, AnchorPatcher, PatchOutcome, ProviderWrap};
pub use product::ProductConfig;
pub use project::{RouterKind, TargetProject};
pub use registry::{load_manifest, materialize, ComponentManifest, ComponentSource};

#[cfg(feature = "tui")]
pub use tui::{run_init, run_install, InitArgs, InstallArgs};
