//! Logger setup for the ydui binary.
//!
//! Logs go to `./ydui.log` unless `YDUI_LOG` asks for the terminal as well
//! or instead. The terminal logger writes to stderr so stdout stays with the
//! panel.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./ydui.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    File,
    Terminal,
    Both,
}

impl LogDestination {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "file" => Some(LogDestination::File),
            "terminal" => Some(LogDestination::Terminal),
            "both" => Some(LogDestination::Both),
            _ => None,
        }
    }
}

pub fn initialize(destination: LogDestination) {
    let level = LevelFilter::Info;
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        if let Some(file_logger) = create_file_logger(Path::new(LOG_FILE), level, config) {
            loggers.push(file_logger);
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: could not create log file {}: {}", path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_names_are_case_insensitive() {
        assert_eq!(LogDestination::from_name("FILE"), Some(LogDestination::File));
        assert_eq!(
            LogDestination::from_name(" terminal "),
            Some(LogDestination::Terminal)
        );
        assert_eq!(LogDestination::from_name("both"), Some(LogDestination::Both));
        assert_eq!(LogDestination::from_name("stdout"), None);
    }
}
