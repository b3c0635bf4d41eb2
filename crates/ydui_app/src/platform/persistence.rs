use std::path::Path;

use serde::{Deserialize, Serialize};
use ydui_core::{Language, Settings, SettingsSnapshot};
use ydui_engine::AtomicFileWriter;
use ydui_logging::{ydui_error, ydui_info, ydui_warn};

const STATE_FILENAME: &str = ".ydui_state.ron";

/// On-disk settings bundle. Every field is optional so files written by
/// older versions still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct PersistedState {
    language: String,
    logs_collapsed: bool,
    quality: String,
    proxy: String,
    cookie_text: String,
    custom_args: String,
    use_aria2: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self::from(&SettingsSnapshot::default())
    }
}

impl From<&SettingsSnapshot> for PersistedState {
    fn from(snapshot: &SettingsSnapshot) -> Self {
        let settings = &snapshot.settings;
        Self {
            language: snapshot.language.code().to_string(),
            logs_collapsed: snapshot.logs_collapsed,
            quality: settings.quality.clone(),
            proxy: settings.proxy.clone(),
            cookie_text: settings.cookie_text.clone(),
            custom_args: settings.custom_args.clone(),
            use_aria2: settings.use_aria2,
        }
    }
}

impl From<PersistedState> for SettingsSnapshot {
    fn from(state: PersistedState) -> Self {
        SettingsSnapshot {
            settings: Settings {
                quality: state.quality,
                custom_args: state.custom_args,
                proxy: state.proxy,
                cookie_text: state.cookie_text,
                use_aria2: state.use_aria2,
            },
            language: Language::from_code(&state.language).unwrap_or_default(),
            logs_collapsed: state.logs_collapsed,
        }
    }
}

/// Loads saved settings; a missing or unreadable file yields defaults.
pub(crate) fn load_settings(state_dir: &Path) -> SettingsSnapshot {
    let writer = AtomicFileWriter::new(state_dir);
    let content = match writer.read(STATE_FILENAME) {
        Ok(Some(text)) => text,
        Ok(None) => return SettingsSnapshot::default(),
        Err(err) => {
            ydui_warn!(
                "Failed to read settings from {}: {}",
                writer.path_of(STATE_FILENAME).display(),
                err
            );
            return SettingsSnapshot::default();
        }
    };

    match ron::from_str::<PersistedState>(&content) {
        Ok(state) => {
            ydui_info!("Loaded settings from {}", writer.path_of(STATE_FILENAME).display());
            state.into()
        }
        Err(err) => {
            ydui_warn!("Failed to parse settings file: {}", err);
            SettingsSnapshot::default()
        }
    }
}

pub(crate) fn save_settings(state_dir: &Path, snapshot: &SettingsSnapshot) {
    let state = PersistedState::from(snapshot);
    let content = match ron::ser::to_string_pretty(&state, ron::ser::PrettyConfig::new()) {
        Ok(text) => text,
        Err(err) => {
            ydui_error!("Failed to serialize settings: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(state_dir);
    if let Err(err) = writer.write(STATE_FILENAME, &content) {
        ydui_error!(
            "Failed to write settings to {}: {}",
            state_dir.display(),
            err
        );
    }
}
