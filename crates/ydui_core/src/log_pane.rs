use std::collections::VecDeque;

/// Upper bound on retained log lines; the oldest lines are dropped first.
pub const MAX_LOG_LINES: usize = 2000;

/// Shared, append-only log pane fed by every poll loop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogPane {
    lines: VecDeque<String>,
    collapsed: bool,
}

impl LogPane {
    /// Appends `text`, one pane line per input line, each prefixed with
    /// `[timestamp]`. Blank lines are skipped.
    pub fn append(&mut self, timestamp: &str, text: &str) {
        for line in text.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
            if self.lines.len() == MAX_LOG_LINES {
                self.lines.pop_front();
            }
            self.lines.push_back(format!("[{timestamp}] {line}"));
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Full pane contents, newline-terminated, as copied to the clipboard.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }
}

/// Portion of a cumulative log not yet shown.
///
/// The backend reports a job's whole transcript on every poll. When the
/// incoming text extends the previously seen text at a line boundary only the
/// new lines are returned; identical text yields `None`; anything else is
/// treated as fresh output.
pub(crate) fn unseen_log<'a>(previous: Option<&str>, incoming: &'a str) -> Option<&'a str> {
    let Some(previous) = previous.filter(|p| !p.is_empty()) else {
        return Some(incoming);
    };
    if incoming == previous {
        return None;
    }
    match incoming.strip_prefix(previous) {
        Some(rest) if rest.starts_with('\n') => {
            let rest = rest.trim_start_matches('\n');
            (!rest.is_empty()).then_some(rest)
        }
        _ => Some(incoming),
    }
}
