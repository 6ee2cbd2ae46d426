//! Activity log.
//!
//! A single append-only sink for every message the dashboard produces.
//! There are no levels and no retention limit.

use chrono::{DateTime, Local};

/// One line in the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// When the line was appended
    pub at: DateTime<Local>,
    /// Message text (may span several lines)
    pub message: String,
}

impl LogLine {
    /// Short wall-clock stamp for display.
    pub fn stamp(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}

/// Append-only activity log.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    lines: Vec<LogLine>,
}

impl ActivityLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "playdeck::activity", "{message}");
        self.lines.push(LogLine { at: Local::now(), message });
    }

    /// All lines, oldest first.
    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Lines appended at or after `cursor`.
    ///
    /// Callers keep `len()` as the cursor for the next call.
    pub fn since(&self, cursor: usize) -> &[LogLine] {
        self.lines.get(cursor..).unwrap_or_default()
    }

    /// Most recent line.
    pub fn last(&self) -> Option<&LogLine> {
        self.lines.last()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of display rows the log occupies (multi-line messages count once per line).
    pub fn row_count(&self) -> usize {
        self.lines.iter().map(|l| l.message.lines().count().max(1)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_since() {
        let mut log = ActivityLog::new();
        log.push("first");
        let cursor = log.len();
        log.push("second");
        log.push("third");

        let fresh: Vec<_> = log.since(cursor).iter().map(|l| l.message.as_str()).collect();
        assert_eq!(fresh, vec!["second", "third"]);
        assert!(log.since(log.len()).is_empty());
        assert!(log.since(100).is_empty());
    }

    #[test]
    fn test_row_count_counts_multiline() {
        let mut log = ActivityLog::new();
        log.push("one");
        log.push("two\nthree\nfour");
        log.push("");
        assert_eq!(log.row_count(), 5);
    }

    #[test]
    fn test_last() {
        let mut log = ActivityLog::new();
        assert!(log.last().is_none());
        log.push("hello");
        assert_eq!(log.last().map(|l| l.message.as_str()), Some("hello"));
    }
}
