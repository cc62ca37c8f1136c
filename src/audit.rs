//! # Audit Log
//!
//! A bounded, newest-first record of what the orchestrator did, meant for
//! display to the user. It is independent of `tracing`: diagnostics go to the
//! subscriber, while this log is part of the published state.
//!
//! The log is a fixed-capacity ring. Appending writes one slot and moves the
//! head backwards, so inserting at the front and evicting the oldest entry are
//! both O(1). Entries are never removed individually; [`AuditLog::clear`]
//! empties the whole log.

use std::fmt::{Display, Formatter};
use std::time::{Duration, SystemTime};

use crate::config::LOG_CAPACITY;

/// Source tag for lifecycle events.
pub const SOURCE_SYSTEM: &str = "SYSTEM";
/// Source tag for configuration changes.
pub const SOURCE_CONFIG: &str = "CONFIG";
/// Source tag for input selection.
pub const SOURCE_FILE: &str = "FILE";
/// Source tag for encrypt and decrypt runs.
pub const SOURCE_CRYPTO: &str = "CRYPTO";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl LogLevel {
    #[inline]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One immutable log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    timestamp: SystemTime,
    level: LogLevel,
    message: String,
    source: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self { timestamp: SystemTime::now(), level, message: message.into(), source: None }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    #[must_use]
    pub fn with_source(self, source: &str) -> Self {
        Self { source: Some(source.to_owned()), ..self }
    }

    #[inline]
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Age of the entry relative to `now`: `Just now`, `<n>s ago`, `<n>m ago`
    /// or `<n>h ago`.
    pub fn formatted_time_at(&self, now: SystemTime) -> String {
        let age = now.duration_since(self.timestamp).unwrap_or(Duration::ZERO).as_secs();
        let (minutes, hours) = (age / 60, age / 3600);

        if hours > 0 {
            format!("{hours}h ago")
        } else if minutes > 0 {
            format!("{minutes}m ago")
        } else if age > 10 {
            format!("{age}s ago")
        } else {
            "Just now".to_owned()
        }
    }

    pub fn formatted_time(&self) -> String {
        self.formatted_time_at(SystemTime::now())
    }
}

/// Fixed-capacity, newest-first ring of [`LogEntry`] values.
#[derive(Debug, Clone)]
pub struct AuditLog {
    slots: Vec<Option<LogEntry>>,
    /// Slot of the newest entry.
    head: usize,
    len: usize,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    /// A log holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: vec![None; capacity.max(1)], head: 0, len: 0 }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `entry` at the front, evicting the oldest entry when full.
    pub fn append(&mut self, entry: LogEntry) {
        let capacity = self.capacity();
        self.head = (self.head + capacity - 1) % capacity;
        self.slots[self.head] = Some(entry);
        self.len = (self.len + 1).min(capacity);
    }

    /// Entry `index` positions from the newest.
    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        if index >= self.len {
            return None;
        }
        self.slots[(self.head + index) % self.capacity()].as_ref()
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        (0..self.len).filter_map(move |index| self.get(index))
    }

    /// Empties the log and records that it was cleared.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
        self.append(LogEntry::info("Log console cleared").with_source(SOURCE_SYSTEM));
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}
