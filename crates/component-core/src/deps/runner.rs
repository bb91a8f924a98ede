//! Package manager invocation
//!
//! Installs are a single batched call of the project's package manager. The
//! installer blocks until the process exits and imposes no timeout of its own;
//! the exit status is the only success signal.

use super::package_manager::PackageManager;
use crate::error::{InstallError, Result};
use colored::Colorize;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// Something that can add packages to the target project
pub trait PackageInstaller {
    /// Install every specifier in one invocation
    fn install(&self, specs: &[String]) -> impl Future<Output = Result<()>>;
}

/// Runs the real package manager inside the project directory
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    manager: PackageManager,
    program: String,
    /// Arguments placed before the specifiers
    args: Vec<String>,
    project_root: PathBuf,
}

impl CommandInstaller {
    pub fn new(manager: PackageManager, project_root: &Path) -> Self {
        Self::with_program(
            manager,
            manager.program(),
            [manager.add_verb()],
            project_root,
        )
    }

    /// Run `program args.. specs..` instead of the manager's own binary
    pub fn with_program<I, S>(
        manager: PackageManager,
        program: impl Into<String>,
        args: I,
        project_root: &Path,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            manager,
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            project_root: project_root.to_path_buf(),
        }
    }
}

impl PackageInstaller for CommandInstaller {
    async fn install(&self, specs: &[String]) -> Result<()> {
        let command_line = self.manager.command_line(specs);
        println!();
        println!("{} {}", "Running:".dimmed(), command_line.yellow());
        println!();
        tracing::info!(cwd = %self.project_root.display(), "{}", command_line);

        let failed = |code: Option<i32>| InstallError::DependencyInstallFailed {
            command: command_line.clone(),
            code,
        };

        let mut child = TokioCommand::new(&self.program)
            .args(&self.args)
            .args(specs)
            .current_dir(&self.project_root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                tracing::debug!("failed to start {}: {}", self.program, e);
                failed(None)
            })?;

        if let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) {
            let mut stdout_reader = BufReader::new(stdout).lines();
            let mut stderr_reader = BufReader::new(stderr).lines();
            let mut stdout_done = false;
            let mut stderr_done = false;

            while !(stdout_done && stderr_done) {
                tokio::select! {
                    line = stdout_reader.next_line(), if !stdout_done => {
                        match line {
                            Ok(Some(line)) => println!("  {}", line),
                            Ok(None) => stdout_done = true,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stdout:".red(), e);
                                stdout_done = true;
                            }
                        }
                    }
                    line = stderr_reader.next_line(), if !stderr_done => {
                        match line {
                            Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                            Ok(None) => stderr_done = true,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stderr:".red(), e);
                                stderr_done = true;
                            }
                        }
                    }
                }
            }
        }

        let status = child.wait().await.map_err(|e| {
            tracing::debug!("failed to wait for {}: {}", self.program, e);
            failed(None)
        })?;
        println!();

        if status.success() {
            Ok(())
        } else {
            Err(failed(status.code()))
        }
    }
}
