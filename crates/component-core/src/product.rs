//! Product configuration trait for CLI binaries
//!
//! Each registry binary implements this trait to define its identity, the
//! components it offers, and which of them carry a provider integration.

use crate::integrations::Integration;
use crate::project::TargetProject;

/// Configuration trait for component registry products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// npm scope component packages are published under (e.g. `@nareshkosal`)
    fn npm_scope(&self) -> &'static str;

    /// Components this registry offers
    fn components(&self) -> &'static [&'static str];

    /// Integration applied after the component's files and dependencies
    fn integration(&self, _component: &str) -> Option<Integration> {
        None
    }

    /// Environment variable pointing at a local registry directory
    fn registry_dir_env(&self) -> &'static str;

    /// Environment variable overriding the package manager
    fn package_manager_env(&self) -> &'static str;

    /// Instructions shown after a component is installed
    fn next_steps(&self, component: &str, project: &TargetProject) -> Vec<String>;

    /// Whether `component` is part of this registry
    fn offers(&self, component: &str) -> bool {
        self.components().contains(&component)
    }
}
