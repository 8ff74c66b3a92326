//! Launching external applications and the system file manager

use crate::config::AppAssociation;
use crate::domain::mark_complete;
use crate::error::{QueueError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::info;

/// Boundary to the outside processes the browser starts
pub trait Launcher {
    /// Starts `program` with `file` as its argument, without waiting for it
    fn launch(&mut self, program: &str, file: &Path) -> Result<()>;

    /// Shows `dir` in a file manager, using `command` when one is configured
    fn open_file_manager(&mut self, command: Option<&str>, dir: &Path) -> Result<()>;
}

/// Runs programs through the platform shell so configured entries may be
/// plain names on `PATH`, absolute paths or short command lines
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellLauncher;

impl ShellLauncher {
    pub fn new() -> Self {
        Self
    }
}

/// Builds `<program> "<path>"` for the platform shell. The path is passed as a
/// separate argument on Unix so it is never re-parsed by the shell.
pub fn shell_command(program: &str, path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(program).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(format!("{} \"$1\"", program))
            .arg("print-queue")
            .arg(path);
        cmd
    }
}

/// The configured file-manager command for `dir`, or `None` when the system
/// default should be used
pub fn file_manager_command(command: Option<&str>, dir: &Path) -> Option<Command> {
    command
        .map(str::trim)
        .filter(|command| !command.is_empty())
        .map(|command| shell_command(command, dir))
}

fn spawn_detached(mut cmd: Command, program: &str) -> Result<()> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| QueueError::LaunchError {
            program: program.to_string(),
            source,
        })?;
    Ok(())
}

impl Launcher for ShellLauncher {
    fn launch(&mut self, program: &str, file: &Path) -> Result<()> {
        info!(program, file = %file.display(), "launching application");
        spawn_detached(shell_command(program, file), program)
    }

    fn open_file_manager(&mut self, command: Option<&str>, dir: &Path) -> Result<()> {
        match (command, file_manager_command(command, dir)) {
            (Some(command), Some(cmd)) => {
                info!(command, dir = %dir.display(), "opening file manager");
                spawn_detached(cmd, command)
            }
            _ => {
                info!(dir = %dir.display(), "opening directory with system default");
                open::that_detached(dir).map_err(|source| QueueError::LaunchError {
                    program: "system file manager".to_string(),
                    source,
                })
            }
        }
    }
}

/// Launches `app` on `file`, then marks the file complete.
/// A failed launch leaves the file unmarked.
pub fn run_application(
    launcher: &mut dyn Launcher,
    app: &AppAssociation,
    file: &Path,
) -> Result<PathBuf> {
    launcher.launch(&app.executable, file)?;
    Ok(mark_complete(file)?)
}
