use std::time::Duration;

/// Cells in a rendered progress bar.
pub const BAR_WIDTH: usize = 24;
/// Log lines shown under an expanded log pane.
pub const LOG_TAIL_LINES: usize = 12;
/// Render coalescing interval.
pub const TICK_INTERVAL: Duration = Duration::from_millis(150);
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const LOG_TIME_FORMAT: &str = "%H:%M:%S";
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
