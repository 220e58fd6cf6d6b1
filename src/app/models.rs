use std::fmt;
use std::path::{Path, PathBuf};

/// Entry point of the RetDec decompilation toolchain.
pub const DECOMPILER_SCRIPT: &str = "retdec-decompiler.sh";

/// Name of the plugin settings file inside the per-user config directory.
pub const SETTINGS_FILE_NAME: &str = "retdec-config.json";

/// Process-wide plugin state, created once by the host and handed to every
/// component that needs it.
#[derive(Debug, Clone)]
pub struct PluginSettings {
    decompiler_script_path: String,
    resolved_command: Option<ResolvedCommand>,
    settings_file: PathBuf,
    use_threads: bool,
}

impl PluginSettings {
    pub fn new(settings_file: PathBuf) -> Self {
        Self {
            decompiler_script_path: String::new(),
            resolved_command: None,
            settings_file,
            use_threads: false,
        }
    }

    /// Places the settings file inside the host's per-user config directory.
    pub fn in_config_dir(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILE_NAME))
    }

    /// Empty when the user has never configured an explicit path.
    pub fn decompiler_script_path(&self) -> &str {
        &self.decompiler_script_path
    }

    pub fn set_decompiler_script_path(&mut self, path: impl Into<String>) {
        self.decompiler_script_path = path.into();
    }

    pub fn resolved_command(&self) -> Option<&ResolvedCommand> {
        self.resolved_command.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_command.is_some()
    }

    pub(crate) fn mark_resolved(&mut self, command: ResolvedCommand) {
        self.resolved_command = Some(command);
    }

    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    pub fn use_threads(&self) -> bool {
        self.use_threads
    }

    pub fn set_use_threads(&mut self, use_threads: bool) {
        self.use_threads = use_threads;
    }
}

/// The invocation the rest of the plugin should run to decompile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCommand {
    /// Script found at a user-configured location.
    SpecifiedPath(String),
    /// Script found through the process search path.
    SystemPath,
}

impl ResolvedCommand {
    pub fn command_line(&self) -> String {
        let program = match self {
            ResolvedCommand::SpecifiedPath(path) => path.as_str(),
            ResolvedCommand::SystemPath => DECOMPILER_SCRIPT,
        };
        if cfg!(windows) {
            // Windows cannot run shell scripts natively.
            format!("sh {}", program)
        } else {
            program.to_string()
        }
    }
}

impl fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}
