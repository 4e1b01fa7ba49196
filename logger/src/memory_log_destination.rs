use std::sync::Mutex;

use crate::log_contracts::{LogDestination, LogEntry};

/// Keeps entries in memory so embedding processes and tests can inspect them.
#[derive(Default)]
pub struct MemoryLogDestination {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of entries whose message contains `needle`.
    pub fn count_matching(&self, needle: &str) -> usize {
        self.entries()
            .iter()
            .filter(|entry| entry.message.contains(needle))
            .count()
    }
}

impl LogDestination for MemoryLogDestination {
    fn write_log(&self, entry: &LogEntry) {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push(entry.clone());
    }
}
