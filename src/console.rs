//! In-app log sink shown under the canvas.
//!
//! Entries are mirrored to the `log` facade so that headless runs and `RUST_LOG`
//! users see the same messages.

use std::collections::VecDeque;

pub const CONSOLE_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_log_level(self) -> log::Level {
        match self {
            Self::Info => log::Level::Info,
            Self::Warn => log::Level::Warn,
            Self::Error => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Append-only, most recent last, oldest entries dropped past capacity.
#[derive(Debug)]
pub struct Console {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for Console {
    fn default() -> Self {
        Self::with_capacity(CONSOLE_CAPACITY)
    }
}

impl Console {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(CONSOLE_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        log::log!(level.as_log_level(), "{message}");
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry { level, message });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_entries_past_capacity() {
        let mut console = Console::with_capacity(2);
        console.info("a");
        console.warn("b");
        console.error("c");

        let messages: Vec<_> = console.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["b", "c"]);
        assert_eq!(console.last().map(|e| e.level), Some(LogLevel::Error));
    }

    #[test]
    fn entries_keep_insertion_order_with_latest_last() {
        let mut console = Console::default();
        for i in 0..5 {
            console.info(format!("step {i}"));
        }
        let messages: Vec<_> = console.entries().map(|e| e.message.clone()).collect();
        assert_eq!(messages, ["step 0", "step 1", "step 2", "step 3", "step 4"]);
        assert_eq!(console.last().map(|e| e.message.as_str()), Some("step 4"));
    }
}
