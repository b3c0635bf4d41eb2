#![deny(missing_docs)]
//! Shared logging utilities for the ydui workspace.
//!
//! This crate provides the `ydui_*` logging macros used by the engine and the
//! terminal front end, and a minimal test initializer for the global logger.
//! The macros route through the re-exported `log` facade so callers do not
//! need their own `log` dependency.

#[doc(hidden)]
pub use log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! ydui_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! ydui_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! ydui_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! ydui_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! ydui_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Shortens a job id for log lines, keeping the first eight characters.
///
/// Job ids are UUIDs issued by the backend; the prefix is enough to tell
/// concurrent poll loops apart in a log file.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::short_id;

    #[test]
    fn short_id_keeps_prefix() {
        assert_eq!(
            short_id("3f2a9c1e-7b44-4c1a-9d2e-0a1b2c3d4e5f"),
            "3f2a9c1e"
        );
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id(""), "");
    }
}
