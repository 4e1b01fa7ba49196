use std::collections::HashMap;
use std::ffi::{c_void, CStr};
use std::fmt;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use plugin_core::{DeclarationFn, Export, ModuleDeclaration, ValueType, ABI_VERSION, DECLARATION_SYMBOL};

use crate::error::LoadError;
use crate::signature::Signature;

/// A loaded and verified module.
///
/// Owns the underlying library for as long as the handle lives; the module
/// table keeps handles until it is dropped, so in practice a module stays
/// mapped for the rest of the process.
pub struct ModuleHandle {
    path: PathBuf,
    exports: HashMap<String, Signature>,
    free_string: unsafe extern "C" fn(*mut c_char),
    library: Library,
}

impl ModuleHandle {
    /// Opens `path`, checks its declaration against this host's ABI and
    /// build identity, then runs the module's `on_load` hook.
    ///
    /// `path` is expected to be already normalized; callers go through
    /// [`PluginLoader`](crate::PluginLoader), which also guarantees the hook
    /// runs once per path.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        // Mapping the library runs its static initializers
        let library = unsafe { Library::new(path) }.map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let declaration_ptr = {
            let declare: Symbol<DeclarationFn> =
                unsafe { library.get(DECLARATION_SYMBOL) }.map_err(|source| LoadError::NotAPlugin {
                    path: path.to_path_buf(),
                    source,
                })?;
            unsafe { declare() }
        };
        if declaration_ptr.is_null() {
            return Err(LoadError::MalformedDeclaration {
                path: path.to_path_buf(),
                reason: "plugin_declaration returned null".to_string(),
            });
        }
        // Points into the library's static data, valid while `library` is alive
        let declaration = unsafe { &*declaration_ptr };

        verify_identity(path, declaration)?;
        let exports = unsafe { read_exports(path, declaration)? };
        let free_string = declaration.free_string;

        if let Some(on_load) = declaration.on_load {
            on_load();
        }

        Ok(Self {
            path: path.to_path_buf(),
            exports,
            free_string,
            library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared shape of export `name`, if the module lists it.
    pub fn declared_signature(&self, name: &str) -> Option<&Signature> {
        self.exports.get(name)
    }

    pub fn export_names(&self) -> impl Iterator<Item = &str> {
        self.exports.keys().map(String::as_str)
    }

    /// Raw address of `name` from the library's dynamic symbol table.
    pub(crate) fn symbol_address(&self, name: &str) -> Result<*mut c_void, libloading::Error> {
        let symbol: Symbol<*mut c_void> = unsafe { self.library.get(name.as_bytes())? };
        Ok(*symbol)
    }

    /// Hands a `Str` return value back to the module that allocated it.
    ///
    /// # Safety
    /// `value` must have been returned by a `Str` export of this module and
    /// not released before.
    pub(crate) unsafe fn release_string(&self, value: *mut c_char) {
        (self.free_string)(value);
    }
}

impl fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("path", &self.path)
            .field("exports", &self.exports)
            .finish()
    }
}

/// Rejects modules compiled against a different `plugin_core` layout,
/// crate version, compiler or target.
pub fn verify_identity(path: &Path, declaration: &ModuleDeclaration) -> Result<(), LoadError> {
    if declaration.abi_version != ABI_VERSION {
        return Err(LoadError::AbiMismatch {
            path: path.to_path_buf(),
            expected: ABI_VERSION,
            found: declaration.abi_version,
        });
    }

    if declaration.build_id.is_null() {
        return Err(LoadError::MalformedDeclaration {
            path: path.to_path_buf(),
            reason: "build_id is null".to_string(),
        });
    }

    let found = unsafe { CStr::from_ptr(declaration.build_id) }.to_string_lossy();
    let expected = plugin_core::build_id();
    if found != expected {
        return Err(LoadError::BuildMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            found: found.into_owned(),
        });
    }

    Ok(())
}

/// Copies the declared export table into owned signatures.
///
/// # Safety
/// `declaration` must come from a module whose identity has been verified,
/// so its pointers follow the `plugin_core` layout.
unsafe fn read_exports(
    path: &Path,
    declaration: &ModuleDeclaration,
) -> Result<HashMap<String, Signature>, LoadError> {
    let malformed = |reason: String| LoadError::MalformedDeclaration {
        path: path.to_path_buf(),
        reason,
    };

    if declaration.export_count == 0 {
        return Ok(HashMap::new());
    }
    if declaration.exports.is_null() {
        return Err(malformed("export table is null".to_string()));
    }

    let table: &[Export] = std::slice::from_raw_parts(declaration.exports, declaration.export_count);
    let mut exports = HashMap::with_capacity(table.len());

    for (index, export) in table.iter().enumerate() {
        if export.name.is_null() {
            return Err(malformed(format!("export #{} has no name", index)));
        }
        let name = CStr::from_ptr(export.name)
            .to_str()
            .map_err(|_| malformed(format!("export #{} name is not UTF-8", index)))?
            .to_string();

        let raw_params: &[u32] = if export.param_count == 0 {
            &[]
        } else if export.params.is_null() {
            return Err(malformed(format!("export {} has a null parameter list", name)));
        } else {
            std::slice::from_raw_parts(export.params, export.param_count)
        };

        let params = raw_params
            .iter()
            .map(|raw| ValueType::from_raw(*raw))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| malformed(format!("export {} has an unknown parameter type", name)))?;
        let returns = ValueType::from_raw(export.returns)
            .ok_or_else(|| malformed(format!("export {} has an unknown return type", name)))?;

        if exports.insert(name.clone(), Signature { params, returns }).is_some() {
            return Err(malformed(format!("export {} is declared twice", name)));
        }
    }

    Ok(exports)
}
