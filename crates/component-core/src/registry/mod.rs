//! Component registry: manifests, package sources, file materialization
//!
//! This module provides:
//! - Manifest types (ComponentManifest, FileMapping)
//! - Package locations (local registry directory or node_modules)
//! - Copying mapped files into a target project
//! - Listing the components a product offers

pub mod copier;
pub mod manifest;
pub mod source;

use crate::product::ProductConfig;
use colored::Colorize;
use std::path::Path;

pub use copier::{materialize, CopiedFile, InstallReport};
pub use manifest::{load_manifest, ComponentKind, ComponentManifest, FileMapping, LoadedManifest};
pub use source::{discover_packages, ComponentSource, DiscoveredPackage};

/// Print the components a product offers, plus any packages found in a local
/// registry directory
pub fn list_components<C: ProductConfig>(config: &C, registry_dir: Option<&Path>) {
    println!();
    println!(
        "{}",
        format!("{} components:", config.display_name()).cyan().bold()
    );
    println!();

    let discovered = registry_dir.map(discover_packages).unwrap_or_default();

    for name in config.components() {
        let description = discovered
            .iter()
            .find(|p| p.manifest.name == *name)
            .map(|p| p.manifest.description.as_str())
            .unwrap_or("");
        if description.is_empty() {
            println!("  {} {}", "•".blue(), name);
        } else {
            println!("  {} {} {}", "•".blue(), name, format!("- {}", description).dimmed());
        }
    }

    let extra: Vec<_> = discovered
        .iter()
        .filter(|p| !config.components().contains(&p.manifest.name.as_str()))
        .collect();
    if !extra.is_empty() {
        println!();
        println!("{}", "Also found in the local registry:".dimmed());
        for package in extra {
            println!(
                "  {} {} {}",
                "•".yellow(),
                package.manifest.name,
                package.package_root.display().to_string().dimmed()
            );
        }
    }

    println!();
    println!(
        "Install with: {}",
        format!("{} install <component-name>", config.name()).green()
    );
    println!();
}
