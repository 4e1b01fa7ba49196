pub mod console_log_destination;
pub mod file_log_destination;
pub mod memory_log_destination;
pub mod logger_loader;
pub mod log_writer;
pub mod log_contracts;
pub mod log_config;

pub use console_log_destination::ConsoleLogDestination;
pub use file_log_destination::FileLogDestination;
pub use memory_log_destination::MemoryLogDestination;
pub use logger_loader::{LoggerLoader, LogError};
pub use log_writer::LogWriter;
pub use log_contracts::{LogDestination, LogEntry, LogLevel, Logger};
pub use log_config::{LoggingConfig, LogTarget};
