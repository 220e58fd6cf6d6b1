// Declare modules
pub mod actions;
pub mod cli;
pub mod config;
pub mod models;
pub mod probe;
pub mod prompt;
pub mod resolver;

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;

use self::actions::{
    add_configuration_menu_option, open_settings, MenuRegistry, SettingsOutcome,
    OPTIONS_ACTION_NAME,
};
use self::cli::Cli;
use self::config::ConfigStore;
use self::models::PluginSettings;
use self::probe::ShellProbe;
use self::prompt::TerminalPrompt;
use self::resolver::ConfigurationResolver;

/// Per-user directory the plugin keeps its settings in.
pub fn user_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine user config directory")?;
    Ok(base.join("retdec"))
}

/// Builds the plugin state and either opens the settings form or resolves
/// the decompiler command.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Build plugin state
    let mut settings = match args.settings_file {
        Some(file) => PluginSettings::new(file),
        None => PluginSettings::in_config_dir(&user_config_dir()?),
    };
    settings.set_use_threads(args.threads);

    let store = if args.strict_config {
        ConfigStore::strict()
    } else {
        ConfigStore::default()
    };
    if !store.load_into(&mut settings) {
        log::debug!(
            "No usable settings at {}",
            settings.settings_file().display()
        );
    }

    // 3. Register the options action. Failure is already reported and does
    //    not stop resolution.
    let mut menu = MenuRegistry::new();
    let _ = add_configuration_menu_option(&mut menu);

    let stdin = io::stdin();
    let mut prompt = TerminalPrompt::new(stdin.lock(), io::stderr());

    // 4. Dispatch
    if args.configure {
        let action = menu
            .action(OPTIONS_ACTION_NAME)
            .context("Options action is not registered")?;
        log::debug!("Running action '{}'", action.label);
        if open_settings(&mut settings, &store, &mut prompt) == SettingsOutcome::Cancelled {
            log::info!("Settings left unchanged");
        }
        return Ok(());
    }

    let resolver = ConfigurationResolver::new(ShellProbe::default(), store);
    match resolver.resolve(&mut settings, &mut prompt) {
        Ok(command) => {
            log::debug!("Threaded decompilation: {}", settings.use_threads());
            println!("{}", command);
        }
        Err(cancelled) => log::warn!("{}", cancelled),
    }

    Ok(())
}
