use crate::app::models::DECOMPILER_SCRIPT;
use std::process::{Command, Stdio};

/// Checks whether the decompiler entry point can be run.
///
/// Both checks spawn a process and block until it exits. There is no
/// timeout: a script that hangs on `--help` hangs the caller.
pub trait AvailabilityProbe {
    /// Runs the bare executable name, relying on the search path.
    fn is_available_on_system_path(&self) -> bool;

    /// Runs the executable at an explicit, user-supplied location.
    fn is_available_at_path(&self, path: &str) -> bool;
}

/// Probe that runs `<script> --help` through the host shell.
#[derive(Debug, Clone)]
pub struct ShellProbe {
    executable: String,
}

impl Default for ShellProbe {
    fn default() -> Self {
        Self::with_executable(DECOMPILER_SCRIPT)
    }
}

impl ShellProbe {
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn system_path_command(&self) -> String {
        wrap_for_platform(format!("{} --help", self.executable))
    }

    pub fn specified_path_command(path: &str) -> String {
        wrap_for_platform(format!("{} --help", quote(path)))
    }
}

impl AvailabilityProbe for ShellProbe {
    fn is_available_on_system_path(&self) -> bool {
        run_succeeds(&self.system_path_command())
    }

    fn is_available_at_path(&self, path: &str) -> bool {
        run_succeeds(&Self::specified_path_command(path))
    }
}

fn wrap_for_platform(cmd: String) -> String {
    if cfg!(windows) {
        format!("sh {}", cmd)
    } else {
        cmd
    }
}

/// Single-quotes `path` so embedded spaces survive the shell.
fn quote(path: &str) -> String {
    if cfg!(windows) {
        format!("'{}'", path)
    } else {
        format!("'{}'", path.replace('\'', r"'\''"))
    }
}

fn shell(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(cmd);
        command
    } else {
        let mut command = Command::new("sh");
        command.arg("-c").arg(cmd);
        command
    }
}

fn run_succeeds(cmd: &str) -> bool {
    log::debug!("Probing: {}", cmd);
    let status = shell(cmd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) => {
            log::debug!("Probe exited with {}", status);
            status.success()
        }
        Err(err) => {
            log::debug!("Probe could not start: {}", err);
            false
        }
    }
}
