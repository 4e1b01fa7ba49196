use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::console_log_destination::ConsoleLogDestination;
use crate::file_log_destination::FileLogDestination;
use crate::log_config::{LogTarget, LoggingConfig};
use crate::log_contracts::{LogDestination, Logger};
use crate::LogWriter;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("logging type \"file\" requires file_path")]
    MissingFilePath,

    #[error("unable to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct LoggerLoader;

impl LoggerLoader {
    pub fn load(config: &LoggingConfig) -> Result<Arc<dyn Logger>, LogError> {
        let log_dest: Arc<dyn LogDestination> = match config.target {
            LogTarget::Console => Arc::new(ConsoleLogDestination::new()),
            LogTarget::File => {
                let path = PathBuf::from(config.file_path.as_ref().ok_or(LogError::MissingFilePath)?);
                let max_size = config.max_file_size_mb.saturating_mul(1024 * 1024);
                let destination = FileLogDestination::new(path.clone(), max_size)
                    .map_err(|source| LogError::OpenFile { path, source })?;
                Arc::new(destination)
            }
        };

        Ok(Arc::new(LogWriter::new(config.threshold, log_dest)))
    }

    /// Builds a logger around an existing destination, e.g. a shared
    /// `MemoryLogDestination` that the caller wants to read back later.
    pub fn with_destination(config: &LoggingConfig, destination: Arc<dyn LogDestination>) -> Arc<dyn Logger> {
        Arc::new(LogWriter::new(config.threshold, destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_log_destination::MemoryLogDestination;

    #[test]
    fn file_target_without_path_is_rejected() {
        let config = LoggingConfig {
            target: LogTarget::File,
            ..LoggingConfig::default()
        };
        assert!(matches!(LoggerLoader::load(&config), Err(LogError::MissingFilePath)));
    }

    #[test]
    fn file_target_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.log");
        let config = LoggingConfig {
            target: LogTarget::File,
            file_path: Some(path.to_string_lossy().into_owned()),
            ..LoggingConfig::default()
        };

        let logger = LoggerLoader::load(&config).unwrap();
        logger.info("hello file");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("hello file"));
    }

    #[test]
    fn shared_destination_receives_entries() {
        let memory = Arc::new(MemoryLogDestination::new());
        let logger = LoggerLoader::with_destination(&LoggingConfig::default(), memory.clone());

        logger.debug("below default threshold");
        logger.info("Plugin loaded successfully");

        assert_eq!(memory.entries().len(), 1);
        assert_eq!(memory.count_matching("loaded"), 1);
    }
}
