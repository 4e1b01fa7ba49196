use std::fs;
use std::path::Path;
use std::sync::Arc;

use logger::Logger;

use crate::error::LoadError;
use crate::module_handle::ModuleHandle;
use crate::module_table::ModuleTable;

/// Opens modules by path, going through a [`ModuleTable`] so each distinct
/// file is loaded and initialized at most once.
pub struct PluginLoader {
    table: Arc<ModuleTable>,
    logger: Arc<dyn Logger>,
}

impl PluginLoader {
    pub fn new(table: Arc<ModuleTable>, logger: Arc<dyn Logger>) -> Self {
        Self { table, logger }
    }

    pub fn table(&self) -> &Arc<ModuleTable> {
        &self.table
    }

    /// Loads the module at `path`, or returns the handle already cached for it.
    ///
    /// Paths are canonicalized first, so `./plugins/a.so` and an absolute
    /// path to the same file share one entry. Failures are not cached: a
    /// later call tries again.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Arc<ModuleHandle>, LoadError> {
        let requested = path.as_ref();
        if requested.as_os_str().is_empty() || requested.to_string_lossy().trim().is_empty() {
            return Err(LoadError::EmptyPath);
        }

        let key = fs::canonicalize(requested).map_err(|source| LoadError::NotFound {
            path: requested.display().to_string(),
            source,
        })?;

        let (handle, fresh) = self.table.get_or_try_insert_with(key, |normalized| {
            self.logger.debug(&format!("Opening module {}", normalized.display()));
            ModuleHandle::open(normalized)
        })?;

        if fresh {
            let mut exports: Vec<&str> = handle.export_names().collect();
            exports.sort_unstable();
            self.logger.info(&format!(
                "Module loaded: {} (exports: {})",
                handle.path().display(),
                exports.join(", ")
            ));
        } else {
            self.logger.debug(&format!("Module reused from table: {}", handle.path().display()));
        }

        Ok(handle)
    }
}
