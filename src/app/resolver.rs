use crate::app::actions::{open_settings, SettingsOutcome};
use crate::app::config::ConfigStore;
use crate::app::models::{PluginSettings, ResolvedCommand};
use crate::app::probe::AvailabilityProbe;
use crate::app::prompt::SettingsPrompt;
use thiserror::Error;

pub const NOT_CONFIGURED_MESSAGE: &str = "Decompilation is not properly configured.
Either retdec-decompiler.sh must be in system PATH,
or path to retdec-decompiler.sh must be provided in configuration menu.";

/// The user dismissed the settings form before a working decompiler was
/// found.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("decompilation configuration was cancelled")]
pub struct Cancelled;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    ProbingSpecified,
    ProbingSystem,
    Prompting,
}

/// Finds a runnable decompiler, asking the user for a path until one works
/// or they give up.
pub struct ConfigurationResolver<P> {
    probe: P,
    store: ConfigStore,
}

impl<P: AvailabilityProbe> ConfigurationResolver<P> {
    pub fn new(probe: P, store: ConfigStore) -> Self {
        Self { probe, store }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Tries the configured path, then the search path, then the settings
    /// form. Each round through the form needs fresh user input, so the loop
    /// only ends on success or cancellation.
    pub fn resolve(
        &self,
        settings: &mut PluginSettings,
        prompt: &mut dyn SettingsPrompt,
    ) -> Result<ResolvedCommand, Cancelled> {
        let mut step = Step::ProbingSpecified;
        loop {
            step = match step {
                Step::ProbingSpecified => {
                    let path = settings.decompiler_script_path();
                    if !path.is_empty() && self.probe.is_available_at_path(path) {
                        log::info!(
                            "retdec-decompiler.sh at {} -> using local decompilation",
                            path
                        );
                        let command = ResolvedCommand::SpecifiedPath(path.to_string());
                        settings.mark_resolved(command.clone());
                        return Ok(command);
                    }
                    Step::ProbingSystem
                }
                Step::ProbingSystem => {
                    if self.probe.is_available_on_system_path() {
                        log::info!("retdec-decompiler.sh in system PATH -> using local decompilation");
                        settings.mark_resolved(ResolvedCommand::SystemPath);
                        return Ok(ResolvedCommand::SystemPath);
                    }
                    Step::Prompting
                }
                Step::Prompting => {
                    log::warn!("{}", NOT_CONFIGURED_MESSAGE.replace('\n', " "));
                    prompt.notify(NOT_CONFIGURED_MESSAGE);
                    match open_settings(settings, &self.store, prompt) {
                        SettingsOutcome::Cancelled => {
                            log::info!("Decompilation configuration cancelled");
                            return Err(Cancelled);
                        }
                        SettingsOutcome::Saved => Step::ProbingSpecified,
                    }
                }
            };
        }
    }
}
