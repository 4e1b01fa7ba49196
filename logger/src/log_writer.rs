use std::cell::RefCell;
use std::sync::Arc;

use chrono::Utc;

use crate::log_contracts::{LogDestination, LogEntry, LogLevel, Logger};

thread_local! {
    static MDC_CONTEXT: RefCell<Option<String>> = RefCell::new(None);
}

/// Filters by threshold and forwards entries to a destination.
///
/// Each entry carries the calling thread's context string (if one was set
/// with [`LogWriter::set_context`]), so concurrent callers can be told apart.
pub struct LogWriter {
    threshold: LogLevel,
    destination: Arc<dyn LogDestination>,
}

impl LogWriter {
    pub fn new(threshold: LogLevel, destination: Arc<dyn LogDestination>) -> Self {
        Self { threshold, destination }
    }

    pub fn set_context(context: String) {
        MDC_CONTEXT.with(|ctx| *ctx.borrow_mut() = Some(context));
    }

    pub fn clear_context() {
        MDC_CONTEXT.with(|ctx| *ctx.borrow_mut() = None);
    }

    fn get_context() -> Option<String> {
        MDC_CONTEXT.with(|ctx| ctx.borrow().clone())
    }

    fn build_entry(&self, level: LogLevel, message: &str) -> LogEntry {
        LogEntry {
            timestamp: Utc::now().to_rfc3339(),
            level,
            message: message.to_string(),
            context: Self::get_context(),
        }
    }
}

impl Logger for LogWriter {
    fn log(&self, level: LogLevel, message: &str) {
        if level < self.threshold {
            return;
        }
        let entry = self.build_entry(level, message);
        self.destination.write_log(&entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryLogDestination;

    #[test]
    fn drops_entries_below_threshold() {
        let memory = Arc::new(MemoryLogDestination::new());
        let writer = LogWriter::new(LogLevel::Warn, memory.clone());

        writer.info("ignored");
        writer.warn("kept");
        writer.error("also kept");

        let messages: Vec<String> = memory.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["kept", "also kept"]);
    }

    #[test]
    fn attaches_thread_context() {
        let memory = Arc::new(MemoryLogDestination::new());
        let writer = LogWriter::new(LogLevel::Trace, memory.clone());

        LogWriter::set_context("module=/tmp/a.so".to_string());
        writer.debug("with context");
        LogWriter::clear_context();
        writer.debug("without context");

        let entries = memory.entries();
        assert_eq!(entries[0].context.as_deref(), Some("module=/tmp/a.so"));
        assert!(entries[1].context.is_none());
    }
}
