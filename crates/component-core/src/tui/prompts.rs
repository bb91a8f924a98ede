//! Charm-style CLI prompts using cliclack

use crate::config::InstallerConfig;
use crate::deps::{CommandInstaller, PackageManager};
use crate::install::{ComponentInstall, Installer};
use crate::integrations::{IntegrationReport, PatchStep};
use crate::patch::{BackupState, PatchOutcome};
use crate::product::ProductConfig;
use crate::project::{EnvMerge, TargetProject};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// CLI arguments for the install command
#[derive(Debug, Clone, Default)]
pub struct InstallArgs {
    /// Components to install; prompted for when empty
    pub components: Vec<String>,

    /// Target project directory (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Local registry directory to read component packages from
    pub registry_dir: Option<PathBuf>,

    /// Package manager override
    pub package_manager: Option<PackageManager>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// CLI arguments for the init command
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    /// Integration to apply
    pub integration: String,

    /// Target project directory (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Package manager override
    pub package_manager: Option<PackageManager>,

    /// Do not install the packages the integration's files import
    pub skip_install: bool,
}

/// Install components into the target project
pub async fn run_install<C: ProductConfig>(config: &C, args: InstallArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Inspect the target project
    let root = resolve_directory(args.directory.as_deref())?;
    let project = detect_project(&root)?;

    // Step 2: Settings: scad.yaml, then env, then flags
    let mut settings = InstallerConfig::load(&root)?;
    settings.apply_env(config)?;
    if args.registry_dir.is_some() {
        settings.registry_dir = args.registry_dir.clone();
    }
    if args.package_manager.is_some() {
        settings.package_manager = args.package_manager;
    }

    let source = settings.source(&root, config.npm_scope());
    if let Some(dir) = &settings.registry_dir {
        cliclack::log::info(format!("Using local registry at {}", dir.display()))?;
    }

    // Step 3: Pick components
    let components = select_components(config, &args)?;

    // Step 4: Package manager
    let manager = settings.package_manager(&root);
    check_package_manager(manager)?;

    let installer = Installer::new(
        config,
        &project,
        source,
        settings.version_table()?,
        CommandInstaller::new(manager, &root),
    );

    // Step 5: Install each component
    let results = installer.install_all(&components).await;

    let mut installed = Vec::new();
    let mut failed = Vec::new();
    for (name, result) in results {
        match result {
            Ok(install) => {
                report_component(&project, &install)?;
                installed.push(name);
            }
            Err(e) => {
                cliclack::log::error(format!("{}: {}", name, e))?;
                failed.push(name);
            }
        }
    }

    // Step 6: Summary and next steps
    if !failed.is_empty() {
        if !installed.is_empty() {
            cliclack::log::info(format!("Installed: {}", installed.join(", ")))?;
        }
        cliclack::outro_cancel(format!("Failed: {}", failed.join(", ")))?;
        anyhow::bail!(
            "{} of {} component(s) failed to install",
            failed.len(),
            components.len()
        );
    }

    print_next_steps(config, &installed, &project)?;
    Ok(())
}

/// Apply a provider integration without installing a component
pub async fn run_init<C: ProductConfig>(config: &C, args: InitArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    let Some(integration) = config.integration(&args.integration) else {
        anyhow::bail!("No integration named '{}'", args.integration);
    };

    let root = resolve_directory(args.directory.as_deref())?;
    let project = detect_project(&root)?;

    let mut settings = InstallerConfig::load(&root)?;
    settings.apply_env(config)?;
    if args.package_manager.is_some() {
        settings.package_manager = args.package_manager;
    }

    let manager = settings.package_manager(&root);
    if !args.skip_install {
        check_package_manager(manager)?;
    }

    let installer = Installer::new(
        config,
        &project,
        settings.source(&root, config.npm_scope()),
        settings.version_table()?,
        CommandInstaller::new(manager, &root),
    );

    let (dependencies, report) = installer.init(&integration, !args.skip_install).await?;
    match dependencies {
        Some(specs) => cliclack::log::success(format!("Installed {}", specs.join(" ")))?,
        None if args.skip_install => cliclack::log::info("Skipping dependency install")?,
        None => {}
    }
    report_integration(&project, &report)?;

    print_next_steps(config, &[integration.name.to_string()], &project)?;
    Ok(())
}

fn resolve_directory(directory: Option<&Path>) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = match directory {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };

    if !path.is_dir() {
        anyhow::bail!("Project directory does not exist: {}", path.display());
    }

    Ok(path)
}

fn detect_project(root: &Path) -> Result<TargetProject> {
    let project = TargetProject::detect(root);
    cliclack::log::info(format!(
        "Project: {} (base dir: {}, {} router)",
        root.display(),
        project.base_dir_display(),
        project.router()
    ))?;
    Ok(project)
}

fn select_components<C: ProductConfig>(config: &C, args: &InstallArgs) -> Result<Vec<String>> {
    if !args.components.is_empty() {
        return Ok(args.components.clone());
    }

    if args.yes {
        anyhow::bail!(
            "No components specified. Available components: {}",
            config.components().join(", ")
        );
    }

    let mut multi = cliclack::multiselect("Select components to install");
    for name in config.components() {
        multi = multi.item(name.to_string(), *name, "");
    }
    let selected: Vec<String> = multi.required(true).interact()?;

    Ok(selected)
}

fn check_package_manager(manager: PackageManager) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking package manager...");

    let info = manager.check();
    if info.available {
        spinner.stop(format!(
            "Package manager: {} ({})",
            info.manager,
            info.version.as_deref().unwrap_or("unknown")
        ));
    } else {
        spinner.stop(format!("Package manager: {} (not installed)", info.manager));
        cliclack::log::warning(format!(
            "{} was not found on PATH; dependency installs will fail",
            info.manager
        ))?;
    }

    Ok(())
}

fn relative(project: &TargetProject, path: &Path) -> String {
    path.strip_prefix(project.root())
        .unwrap_or(path)
        .display()
        .to_string()
}

fn report_component(project: &TargetProject, install: &ComponentInstall) -> Result<()> {
    let manifest = &install.manifest;

    let mut lines = vec![format!(
        "Installed {} ({}, {} file(s))",
        manifest.name,
        manifest.kind,
        install.files.copied_count()
    )];
    for file in &install.files.copied {
        lines.push(format!("  + {}", file.target));
    }
    cliclack::log::success(lines.join("\n"))?;

    for warning in &install.files.warnings {
        cliclack::log::warning(warning.to_string())?;
    }

    if !manifest.registry_dependencies.is_empty() {
        cliclack::log::info(format!(
            "{} also uses: {}",
            manifest.name,
            manifest.registry_dependencies.join(", ")
        ))?;
    }

    if let Some(specs) = &install.dependencies {
        cliclack::log::success(format!("Installed {}", specs.join(" ")))?;
    }

    if let Some(report) = &install.integration {
        report_integration(project, report)?;
    }

    Ok(())
}

fn report_integration(project: &TargetProject, report: &IntegrationReport) -> Result<()> {
    if let Some(notice) = report.scaffold.notice {
        cliclack::log::warning(notice)?;
    }

    if !report.scaffold.written.is_empty() {
        let mut lines = vec![format!("Scaffolded {} file(s)", report.scaffold.written.len())];
        for path in &report.scaffold.written {
            lines.push(format!("  + {}", relative(project, path)));
        }
        cliclack::log::success(lines.join("\n"))?;
    }

    let env_file = relative(project, &project.env_file_path());
    match &report.env {
        EnvMerge::Created => cliclack::log::success(format!("Created {}", env_file))?,
        EnvMerge::Updated(keys) => {
            cliclack::log::success(format!("Added {} to {}", keys.join(", "), env_file))?
        }
        EnvMerge::Unchanged => {
            cliclack::log::info(format!("{} already has the required variables", env_file))?
        }
    }

    let layout = relative(project, &project.layout_path());
    match &report.patch {
        PatchStep::Skipped => {}
        PatchStep::Done(PatchOutcome::Applied {
            backup_created,
            steps,
            caveats,
        }) => {
            let mut lines = vec![format!("Updated {}", layout)];
            lines.extend(steps.iter().map(|s| format!("  {}", s)));
            if *backup_created {
                lines.push(format!("  backup saved to {}.bak", layout));
            }
            cliclack::log::success(lines.join("\n"))?;
            for caveat in caveats {
                cliclack::log::warning(format!("{}: {}", layout, caveat))?;
            }
        }
        PatchStep::Done(PatchOutcome::AlreadyApplied { backup }) => {
            cliclack::log::info(format!("{} is already set up", layout))?;
            if *backup == BackupState::Absent {
                cliclack::log::warning(format!(
                    "No backup of the original {} exists",
                    layout
                ))?;
            }
        }
        PatchStep::Failed(e) => {
            cliclack::log::warning(format!(
                "Could not update {} automatically ({}). Wrap {{children}} with the provider manually.",
                layout, e
            ))?;
        }
    }

    Ok(())
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    components: &[String],
    project: &TargetProject,
) -> Result<()> {
    let mut steps: Vec<String> = Vec::new();
    for step in components.iter().flat_map(|c| config.next_steps(c, project)) {
        if !steps.contains(&step) {
            steps.push(step);
        }
    }

    if !steps.is_empty() {
        println!();
        println!("  Next steps");
        println!();

        for (i, step) in steps.iter().enumerate() {
            println!("  {}.  {}", i + 1, step);
        }
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
