//! Bounded, append-only record of observed interactions.
//!
//! The log is purely observational. Nothing in the controller waits on it and
//! a push can never fail.

use std::{collections::VecDeque, fmt, str::FromStr};

use chrono::{DateTime, Local};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CAPACITY: usize = 50;

const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";

/// Position of an entry in the log's own sequence. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogEntryId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: LogEntryId,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayOrder {
    Chronological,
    #[default]
    NewestFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown activity log order '{0}'")]
pub struct UnknownDisplayOrder(pub String);

impl FromStr for DisplayOrder {
    type Err = UnknownDisplayOrder;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "chronological" | "oldest_first" => Ok(Self::Chronological),
            "newest_first" => Ok(Self::NewestFirst),
            _ => Err(UnknownDisplayOrder(raw.trim().to_string())),
        }
    }
}

impl fmt::Display for DisplayOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Chronological => "chronological",
            Self::NewestFirst => "newest_first",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_id: u64,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ActivityLog {
    /// A zero capacity is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 0,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) -> LogEntryId {
        self.push_at(message, Local::now())
    }

    pub fn push_at(&mut self, message: impl Into<String>, at: DateTime<Local>) -> LogEntryId {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }

        let id = LogEntryId(self.next_id);
        self.next_id += 1;
        self.entries.push_back(LogEntry {
            id,
            message: message.into(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        });
        id
    }

    pub fn entries(&self, order: DisplayOrder) -> Vec<&LogEntry> {
        match order {
            DisplayOrder::Chronological => self.entries.iter().collect(),
            DisplayOrder::NewestFirst => self.entries.iter().rev().collect(),
        }
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of entries ever pushed, including evicted ones.
    pub fn total_pushed(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
#[path = "tests/activity_log_tests.rs"]
mod tests;
