//! Host-facing entry points: the "plugin options" menu action and the
//! settings form flow it triggers.

use crate::app::config::ConfigStore;
use crate::app::models::PluginSettings;
use crate::app::prompt::{PromptOutcome, SettingsPrompt};
use std::collections::HashSet;
use thiserror::Error;

pub const OPTIONS_ACTION_NAME: &str = "retdec:ShowOptions";
pub const OPTIONS_ACTION_LABEL: &str = "RetDec plugin options...";
pub const OPTIONS_MENU_PATH: &str = "Options/SourcePaths";
pub const MENU_SEPARATOR: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDesc {
    pub name: String,
    pub label: String,
}

/// The slice of the host API used to expose plugin actions.
pub trait ActionHost {
    fn register_action(&mut self, desc: ActionDesc) -> bool;
    fn attach_to_menu(&mut self, menu_path: &str, action: &str) -> bool;
}

#[derive(Debug, Error)]
#[error("failed to register the plugin options menu item")]
pub struct RegistrationError;

/// What happened to the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOutcome {
    Saved,
    Cancelled,
}

/// Shows the settings form and, unless the user cancels, stores the new
/// path both in memory and on disk.
pub fn open_settings(
    settings: &mut PluginSettings,
    store: &ConfigStore,
    prompt: &mut dyn SettingsPrompt,
) -> SettingsOutcome {
    match prompt.ask_path(settings.decompiler_script_path()) {
        PromptOutcome::Cancelled => SettingsOutcome::Cancelled,
        PromptOutcome::Path(path) => {
            settings.set_decompiler_script_path(path);
            store.save(settings);
            SettingsOutcome::Saved
        }
    }
}

/// Registers the options action and puts it, followed by a separator, into
/// the host's options menu.
pub fn add_configuration_menu_option(host: &mut dyn ActionHost) -> Result<(), RegistrationError> {
    let desc = ActionDesc {
        name: OPTIONS_ACTION_NAME.to_string(),
        label: OPTIONS_ACTION_LABEL.to_string(),
    };

    let ok = host.register_action(desc)
        && host.attach_to_menu(OPTIONS_MENU_PATH, OPTIONS_ACTION_NAME)
        && host.attach_to_menu(OPTIONS_MENU_PATH, MENU_SEPARATOR);
    if !ok {
        log::error!("Failed to register Options menu item for RetDec plugin!");
        return Err(RegistrationError);
    }
    Ok(())
}

/// In-process action table used when no external host provides one.
#[derive(Debug, Default)]
pub struct MenuRegistry {
    actions: Vec<ActionDesc>,
    names: HashSet<String>,
    menus: Vec<(String, String)>,
}

impl MenuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(&self, name: &str) -> Option<&ActionDesc> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// Entries attached under `menu_path`, in attachment order.
    pub fn menu_entries(&self, menu_path: &str) -> Vec<&str> {
        self.menus
            .iter()
            .filter(|(menu, _)| menu == menu_path)
            .map(|(_, entry)| entry.as_str())
            .collect()
    }
}

impl ActionHost for MenuRegistry {
    fn register_action(&mut self, desc: ActionDesc) -> bool {
        if !self.names.insert(desc.name.clone()) {
            return false;
        }
        self.actions.push(desc);
        true
    }

    fn attach_to_menu(&mut self, menu_path: &str, action: &str) -> bool {
        if action != MENU_SEPARATOR && !self.names.contains(action) {
            return false;
        }
        self.menus.push((menu_path.to_string(), action.to_string()));
        true
    }
}
