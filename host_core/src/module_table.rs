use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::module_handle::ModuleHandle;

/// Registry of every module loaded through it, keyed by normalized path.
///
/// Entries are never removed: modules cannot be unloaded once their
/// initialization has run. A table is an ordinary value so each test (or
/// each embedding) can own an isolated one.
#[derive(Default)]
pub struct ModuleTable {
    modules: Mutex<HashMap<PathBuf, Arc<ModuleHandle>>>,
    loads: AtomicUsize,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the map half-written:
    // inserts happen in one step after a successful open.
    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<ModuleHandle>>> {
        match self.modules.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn get(&self, path: &Path) -> Option<Arc<ModuleHandle>> {
        self.lock().get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().keys().cloned().collect()
    }

    /// How many times `open` actually ran and succeeded.
    pub fn loads_performed(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Returns the handle cached under `key`, or runs `open` and caches its result.
    ///
    /// The lock is held across the lookup, the open and the insert, so
    /// concurrent callers asking for the same path see exactly one `open`.
    /// A failed `open` leaves the table untouched. The returned flag is
    /// `true` when this call performed the load.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: PathBuf,
        open: impl FnOnce(&Path) -> Result<ModuleHandle, E>,
    ) -> Result<(Arc<ModuleHandle>, bool), E> {
        let mut modules = self.lock();

        if let Some(handle) = modules.get(&key) {
            return Ok((Arc::clone(handle), false));
        }

        let handle = Arc::new(open(&key)?);
        modules.insert(key, Arc::clone(&handle));
        self.loads.fetch_add(1, Ordering::SeqCst);

        Ok((handle, true))
    }
}
