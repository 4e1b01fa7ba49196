use serde::Deserialize;

use crate::log_contracts::LogLevel;

/// Where log entries are written. In-memory capture is not selectable here;
/// build it with `LoggerLoader::with_destination` so the caller keeps a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    Console,
    File,
}

/// The `[logging]` section of the host configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(rename = "type", default)]
    pub target: LogTarget,

    #[serde(default = "default_threshold")]
    pub threshold: LogLevel,

    /// Required when `type = "file"`.
    #[serde(default)]
    pub file_path: Option<String>,

    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

fn default_threshold() -> LogLevel {
    LogLevel::Info
}

fn default_max_file_size_mb() -> u64 {
    10
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            target: LogTarget::Console,
            threshold: default_threshold(),
            file_path: None,
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}
