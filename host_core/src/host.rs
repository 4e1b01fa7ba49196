use std::path::Path;
use std::sync::Arc;

use logger::{LogError, LogWriter, Logger, LoggerLoader};
use plugin_core::ENTRY_SYMBOL;

use crate::config::HostConfig;
use crate::diagnostics::{self, DiagnosticsSnapshot};
use crate::error::{HostError, LoadError};
use crate::invocation::{invoke, InvocationResult};
use crate::module_handle::ModuleHandle;
use crate::module_table::ModuleTable;
use crate::plugin_loader::PluginLoader;
use crate::signature::StringFn;
use crate::symbol_binder::bind;

/// Clears the thread's log context when a call finishes, however it finishes.
struct LogContext;

impl LogContext {
    fn enter(path: &Path) -> Self {
        LogWriter::set_context(format!("module={}", path.display()));
        LogContext
    }
}

impl Drop for LogContext {
    fn drop(&mut self) {
        LogWriter::clear_context();
    }
}

/// Composition root: one module table, one logger, one configured
/// parallelism. The C-ABI layer keeps a single process-wide `Host`; tests
/// build as many isolated ones as they like.
pub struct Host {
    loader: PluginLoader,
    logger: Arc<dyn Logger>,
    parallelism: usize,
}

impl Host {
    pub fn new(config: &HostConfig, logger: Arc<dyn Logger>) -> Self {
        Self::with_table(config, logger, Arc::new(ModuleTable::new()))
    }

    pub fn with_table(config: &HostConfig, logger: Arc<dyn Logger>, table: Arc<ModuleTable>) -> Self {
        Self {
            loader: PluginLoader::new(table, Arc::clone(&logger)),
            logger,
            parallelism: config.parallelism(),
        }
    }

    /// Builds the logger described by `config.logging` as well.
    pub fn from_config(config: &HostConfig) -> Result<Self, LogError> {
        let logger = LoggerLoader::load(&config.logging)?;
        Ok(Self::new(config, logger))
    }

    pub fn table(&self) -> &Arc<ModuleTable> {
        self.loader.table()
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Arc<ModuleHandle>, LoadError> {
        self.loader.load(path)
    }

    /// Binds and calls the module's `Hello` entry point.
    pub fn call_entry(&self, module: &Arc<ModuleHandle>) -> InvocationResult {
        let symbol = bind::<StringFn>(module, ENTRY_SYMBOL)?;
        self.logger.debug(&format!("Bound {} as {}", symbol.name(), symbol.signature()));
        invoke(&symbol)
    }

    /// Full sequence behind `LoadAndCallPlugin`: load (or reuse) the module
    /// at `path`, bind its entry point, call it.
    ///
    /// Every outcome is logged with the module path as context; the caller
    /// only needs the `Result`.
    pub fn load_and_call<P: AsRef<Path>>(&self, path: P) -> InvocationResult {
        let path = path.as_ref();
        let _context = LogContext::enter(path);

        self.logger.info(&format!("Attempting to load plugin: {}", path.display()));

        let outcome = self
            .load(path)
            .map_err(HostError::from)
            .and_then(|module| self.call_entry(&module));

        match &outcome {
            Ok(value) => {
                self.logger.info(&format!("Plugin {}() returned: {}", ENTRY_SYMBOL, value));
            }
            Err(HostError::Load(e)) => {
                self.logger.error(&format!("Failed to load plugin: {}", e));
            }
            Err(HostError::Bind(e)) => {
                self.logger.error(&format!("Failed to bind {}: {}", ENTRY_SYMBOL, e));
            }
            Err(e) => {
                self.logger.error(&format!("Plugin call failed: {}", e));
            }
        }

        outcome
    }

    pub fn runtime_info(&self) -> DiagnosticsSnapshot {
        diagnostics::snapshot(self.parallelism)
    }
}
