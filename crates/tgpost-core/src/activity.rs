//! Bounded activity feeds.
//!
//! The run log reports generation activity, the ops log reports
//! administrative actions. Both are volatile and newest-first.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// Capacity of the generation (run) log.
pub const RUN_LOG_CAPACITY: usize = 6;
/// Capacity of the administrative (ops) log.
pub const OPS_LOG_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub message: String,
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
    pub severity: Severity,
}

/// A head-inserted log that drops its oldest entries past `capacity`.
///
/// A capacity of zero is raised to one so the newest entry is always kept.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    capacity: usize,
    entries: VecDeque<LogEntry>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn run_log() -> Self {
        Self::new(RUN_LOG_CAPACITY)
    }

    pub fn ops_log() -> Self {
        Self::new(OPS_LOG_CAPACITY)
    }

    pub fn append(&mut self, message: impl Into<String>, severity: Severity) -> &LogEntry {
        let entry = LogEntry {
            id: Uuid::new_v4().to_string(),
            message: message.into(),
            time: Local::now().format("%H:%M:%S").to_string(),
            severity,
        };
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    pub fn info(&mut self, message: impl Into<String>) -> &LogEntry {
        self.append(message, Severity::Info)
    }

    pub fn success(&mut self, message: impl Into<String>) -> &LogEntry {
        self.append(message, Severity::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> &LogEntry {
        self.append(message, Severity::Error)
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
