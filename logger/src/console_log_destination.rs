use std::io::{self, Write};

use crate::log_contracts::{LogDestination, LogEntry};

/// Human-readable lines on stderr, leaving stdout to the embedding process.
pub struct ConsoleLogDestination;

impl ConsoleLogDestination {
    pub fn new() -> Self {
        ConsoleLogDestination
    }

    pub fn format_entry(entry: &LogEntry) -> String {
        match &entry.context {
            Some(context) => format!(
                "{} [{}] {} ({})",
                entry.timestamp, entry.level, entry.message, context
            ),
            None => format!("{} [{}] {}", entry.timestamp, entry.level, entry.message),
        }
    }
}

impl Default for ConsoleLogDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl LogDestination for ConsoleLogDestination {
    fn write_log(&self, entry: &LogEntry) {
        let line = Self::format_entry(entry);
        let _ = writeln!(io::stderr().lock(), "{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogLevel;

    #[test]
    fn formats_context_after_message() {
        let entry = LogEntry {
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            level: LogLevel::Info,
            message: "Plugin loaded".to_string(),
            context: Some("module=/plugins/hello.so".to_string()),
        };
        assert_eq!(
            ConsoleLogDestination::format_entry(&entry),
            "2024-01-01T00:00:00+00:00 [INFO] Plugin loaded (module=/plugins/hello.so)"
        );
    }
}
