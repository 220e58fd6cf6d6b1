use crate::app::models::PluginSettings;
use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// The single key this plugin owns in the settings document.
pub const DECOMPILE_SH_PATH_KEY: &str = "decompileShPath";

/// Why a settings document could not be read.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("settings file does not exist")]
    Absent,
    #[error("failed to read settings file: {0}")]
    Unreadable(#[source] io::Error),
    #[error("failed to parse settings file: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("settings file does not contain a JSON object")]
    NotAnObject,
}

/// On-disk document. Keys this plugin does not know about are carried in
/// `extra` so a rewrite keeps them.
#[derive(Serialize, Deserialize, Debug, Default)]
struct ConfigDocument {
    #[serde(
        rename = "decompileShPath",
        default,
        deserialize_with = "lenient_string"
    )]
    decompile_sh_path: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Reads and writes the plugin settings file.
#[derive(Debug, Clone, Copy)]
pub struct ConfigStore {
    silent: bool,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self { silent: true }
    }
}

impl ConfigStore {
    /// A store that reports malformed documents at warn level instead of
    /// swallowing them.
    pub fn strict() -> Self {
        Self { silent: false }
    }

    /// Reads the configured decompiler script path from `file`.
    pub fn load(&self, file: &Path) -> Result<String, LoadError> {
        read_document(file).map(|doc| doc.decompile_sh_path)
    }

    /// Loads the stored path into `settings`. Returns `false` (and leaves the
    /// path empty) when the document is missing or unusable.
    pub fn load_into(&self, settings: &mut PluginSettings) -> bool {
        match self.load(settings.settings_file()) {
            Ok(path) => {
                settings.set_decompiler_script_path(path);
                true
            }
            Err(err) => {
                match &err {
                    LoadError::Absent => {}
                    LoadError::Malformed(_) | LoadError::NotAnObject if !self.silent => {
                        log::warn!(
                            "Ignoring settings at {}: {}",
                            settings.settings_file().display(),
                            err
                        );
                    }
                    _ => log::debug!(
                        "Ignoring settings at {}: {}",
                        settings.settings_file().display(),
                        err
                    ),
                }
                settings.set_decompiler_script_path(String::new());
                false
            }
        }
    }

    /// Writes the current decompiler script path, keeping any other keys the
    /// existing document holds. Failures are logged and dropped.
    pub fn save(&self, settings: &PluginSettings) {
        let file = settings.settings_file();
        let mut doc = match read_document(file) {
            Ok(doc) => doc,
            Err(err) => {
                log::debug!("Rewriting settings from scratch: {}", err);
                ConfigDocument::default()
            }
        };
        doc.decompile_sh_path = settings.decompiler_script_path().to_string();

        if let Err(err) = write_document(file, &doc) {
            log::debug!("Failed to save settings to {}: {:#}", file.display(), err);
        }
    }
}

fn read_document(file: &Path) -> Result<ConfigDocument, LoadError> {
    let content = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(LoadError::Absent),
        Err(err) => return Err(LoadError::Unreadable(err)),
    };

    let root: Value = serde_json::from_str(&content).map_err(LoadError::Malformed)?;
    if !root.is_object() {
        return Err(LoadError::NotAnObject);
    }
    serde_json::from_value(root).map_err(LoadError::Malformed)
}

fn write_document(file: &Path, doc: &ConfigDocument) -> anyhow::Result<()> {
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut json = serde_json::to_string_pretty(doc).context("Failed to serialize settings")?;
    json.push('\n');
    fs::write(file, json).with_context(|| format!("Failed to write {}", file.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn settings_in(dir: &Path) -> PluginSettings {
        PluginSettings::in_config_dir(dir)
    }

    #[test]
    fn save_then_load_returns_same_path() {
        let temp = tempdir().unwrap();
        let store = ConfigStore::default();
        let mut settings = settings_in(temp.path());
        settings.set_decompiler_script_path("/opt/retdec/bin/retdec-decompiler.sh");
        store.save(&settings);

        let mut reloaded = settings_in(temp.path());
        assert!(store.load_into(&mut reloaded));
        assert_eq!(
            reloaded.decompiler_script_path(),
            "/opt/retdec/bin/retdec-decompiler.sh"
        );
    }

    #[test]
    fn missing_file_is_absent_and_empty() {
        let temp = tempdir().unwrap();
        let store = ConfigStore::default();
        let mut settings = settings_in(temp.path());

        assert!(matches!(
            store.load(settings.settings_file()),
            Err(LoadError::Absent)
        ));
        assert!(!store.load_into(&mut settings));
        assert_eq!(settings.decompiler_script_path(), "");
    }

    #[test]
    fn malformed_and_non_object_documents_are_distinguished() {
        let temp = tempdir().unwrap();
        let store = ConfigStore::default();
        let file = temp.path().join("broken.json");

        fs::write(&file, "{ not json").unwrap();
        assert!(matches!(store.load(&file), Err(LoadError::Malformed(_))));

        fs::write(&file, "[1, 2, 3]").unwrap();
        assert!(matches!(store.load(&file), Err(LoadError::NotAnObject)));

        let mut settings = PluginSettings::new(file);
        settings.set_decompiler_script_path("stale");
        assert!(!ConfigStore::strict().load_into(&mut settings));
        assert_eq!(settings.decompiler_script_path(), "");
    }

    #[test]
    fn absent_key_defaults_to_empty() {
        let temp = tempdir().unwrap();
        let file = temp.path().join(crate::app::models::SETTINGS_FILE_NAME);
        fs::write(&file, r#"{"theme": "dark"}"#).unwrap();

        let mut settings = PluginSettings::new(file);
        assert!(ConfigStore::default().load_into(&mut settings));
        assert_eq!(settings.decompiler_script_path(), "");
    }

    #[test]
    fn non_string_value_reads_as_empty() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("cfg.json");
        fs::write(&file, r#"{"decompileShPath": 42}"#).unwrap();

        assert_eq!(ConfigStore::default().load(&file).unwrap(), "");
    }

    #[test]
    fn save_keeps_unknown_keys() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("cfg.json");
        fs::write(
            &file,
            r#"{"decompileShPath": "old.sh", "futureOption": {"level": 3}, "recent": ["a", "b"]}"#,
        )
        .unwrap();

        let mut settings = PluginSettings::new(file.clone());
        settings.set_decompiler_script_path("/new/retdec-decompiler.sh");
        ConfigStore::default().save(&settings);

        let root: Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(root[DECOMPILE_SH_PATH_KEY], "/new/retdec-decompiler.sh");
        assert_eq!(root["futureOption"]["level"], 3);
        assert_eq!(root["recent"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn save_replaces_malformed_document() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("cfg.json");
        fs::write(&file, "garbage").unwrap();

        let mut settings = PluginSettings::new(file.clone());
        settings.set_decompiler_script_path("x.sh");
        ConfigStore::default().save(&settings);

        assert_eq!(ConfigStore::default().load(&file).unwrap(), "x.sh");
    }

    #[test]
    fn save_creates_missing_config_dir() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("nested").join("retdec");
        let mut settings = settings_in(&dir);
        settings.set_decompiler_script_path("a b/retdec-decompiler.sh");
        ConfigStore::default().save(&settings);

        assert_eq!(
            ConfigStore::default().load(settings.settings_file()).unwrap(),
            "a b/retdec-decompiler.sh"
        );
    }

    #[test]
    fn save_failure_is_silent() {
        let temp = tempdir().unwrap();
        // A directory in place of the file makes the write fail.
        let file = temp.path().join("cfg.json");
        fs::create_dir(&file).unwrap();

        let mut settings = PluginSettings::new(file.clone());
        settings.set_decompiler_script_path("x.sh");
        ConfigStore::default().save(&settings);

        assert!(file.is_dir());
    }
}
