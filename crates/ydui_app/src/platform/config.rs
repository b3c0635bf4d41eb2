//! Application configuration read from the command line and environment.

use std::path::PathBuf;

use ydui_engine::EngineSettings;

use super::logging::LogDestination;

pub const SERVER_VAR: &str = "YDUI_SERVER";
pub const STATE_DIR_VAR: &str = "YDUI_STATE_DIR";
pub const LOG_VAR: &str = "YDUI_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server: String,
    pub state_dir: PathBuf,
    pub log_destination: LogDestination,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_sources(std::env::args().skip(1), |name| std::env::var(name).ok())
    }

    /// The first argument wins over `YDUI_SERVER`; blank values count as unset.
    pub fn from_sources(
        mut args: impl Iterator<Item = String>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_blank = |value: String| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        let server = args
            .next()
            .and_then(non_blank)
            .or_else(|| var(SERVER_VAR).and_then(non_blank))
            .unwrap_or_else(|| EngineSettings::default().base_url);
        let state_dir = var(STATE_DIR_VAR)
            .and_then(non_blank)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_destination = var(LOG_VAR)
            .and_then(|name| LogDestination::from_name(&name))
            .unwrap_or(LogDestination::File);

        Self {
            server,
            state_dir,
            log_destination,
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            base_url: self.server.clone(),
            ..EngineSettings::default()
        }
    }
}
