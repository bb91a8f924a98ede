//! scad-components - Install Kosal registry components into a project

use anyhow::Result;
use clap::{Parser, Subcommand};
use component_core::integrations;
use component_core::tui::{InitArgs, InstallArgs};
use component_core::{Integration, InstallerConfig, PackageManager, ProductConfig, TargetProject};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Kosal product configuration
#[derive(Clone)]
pub struct KosalConfig;

impl ProductConfig for KosalConfig {
    fn name(&self) -> &'static str {
        "scad-components"
    }

    fn display_name(&self) -> &'static str {
        "Kosal Components"
    }

    fn npm_scope(&self) -> &'static str {
        "@nareshkosal"
    }

    fn components(&self) -> &'static [&'static str] {
        &["split-display", "workos-authkit", "workos-init-script"]
    }

    fn integration(&self, component: &str) -> Option<Integration> {
        match component {
            "workos-authkit" | "workos-init-script" => Some(integrations::authkit()),
            _ => None,
        }
    }

    fn registry_dir_env(&self) -> &'static str {
        "SCAD_REGISTRY_DIR"
    }

    fn package_manager_env(&self) -> &'static str {
        "SCAD_PACKAGE_MANAGER"
    }

    fn next_steps(&self, component: &str, project: &TargetProject) -> Vec<String> {
        let mut steps = Vec::new();

        if self.integration(component).is_some() {
            steps.push("Fill in the WORKOS_* values in .env.local".to_string());
            if project.router() == component_core::RouterKind::Pages {
                steps.push(
                    "Port the callback in pages/api/auth/workos-callback.ts or move to the App Router"
                        .to_string(),
                );
            }
        } else {
            steps.push(format!("Import {} in your code", component));
        }

        steps.push("Run your development server to test".to_string());
        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "scad-components")]
#[command(about = "CLI for installing Kosal registry components into a project")]
#[command(version)]
pub struct Args {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install one or more components
    Install(CliInstallArgs),
    /// List available components
    List(ListArgs),
    /// Set up WorkOS AuthKit without installing a component
    Init(CliInitArgs),
}

#[derive(Parser, Debug)]
pub struct CliInstallArgs {
    /// Component names
    pub components: Vec<String>,

    /// Project directory to install into
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Local directory to read component packages from instead of node_modules (for development use)
    #[arg(long = "registry-dir")]
    pub registry_dir: Option<PathBuf>,

    /// Package manager to use (npm, pnpm, yarn, bun)
    #[arg(long = "package-manager")]
    pub package_manager: Option<PackageManager>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliInstallArgs> for InstallArgs {
    fn from(args: CliInstallArgs) -> Self {
        InstallArgs {
            components: args.components,
            directory: args.directory,
            registry_dir: args.registry_dir,
            package_manager: args.package_manager,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Local directory containing component packages
    #[arg(long = "registry-dir")]
    pub registry_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CliInitArgs {
    /// Project directory to set up
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Package manager to use (npm, pnpm, yarn, bun)
    #[arg(long = "package-manager")]
    pub package_manager: Option<PackageManager>,

    /// Skip installing @workos-inc/authkit-nextjs
    #[arg(long = "skip-install")]
    pub skip_install: bool,
}

impl From<CliInitArgs> for InitArgs {
    fn from(args: CliInitArgs) -> Self {
        InitArgs {
            integration: "workos-authkit".to_string(),
            directory: args.directory,
            package_manager: args.package_manager,
            skip_install: args.skip_install,
        }
    }
}

/// Log level is `debug` with `--debug`, else `RUST_LOG`, else `warn` so that
/// tracing output does not interleave with the prompts
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("component_core=debug,scad_components=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn list(config: &KosalConfig, args: ListArgs) -> Result<()> {
    let root = std::env::current_dir()?;
    let mut settings = InstallerConfig::load(&root)?;
    settings.apply_env(config)?;
    let registry_dir = args.registry_dir.or(settings.registry_dir);

    component_core::registry::list_components(config, registry_dir.as_deref());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.debug);
    tracing::debug!("scad-components starting with args: {:?}", args);

    let config = KosalConfig;

    let result = match args.command {
        Some(Command::Install(install_args)) => {
            component_core::run_install(&config, install_args.into()).await
        }
        Some(Command::Init(init_args)) => component_core::run_init(&config, init_args.into()).await,
        Some(Command::List(list_args)) => list(&config, list_args),
        None => {
            // No subcommand provided, default to interactive install
            component_core::run_install(&config, InstallArgs::default()).await
        }
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
