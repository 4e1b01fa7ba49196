use std::os::raw::c_char;

use crate::ValueType;

/// Bumped whenever the layout of [`ModuleDeclaration`] or [`Export`] changes.
pub const ABI_VERSION: u32 = 1;

/// Symbol every module exports; resolves to a [`DeclarationFn`].
pub const DECLARATION_SYMBOL: &[u8] = b"plugin_declaration\0";

/// The zero-argument, string-returning function the host calls by default.
pub const ENTRY_SYMBOL: &str = "Hello";

/// Identity of the `plugin_core` build a module was compiled against,
/// NUL-terminated so it can be handed across the boundary as-is.
///
/// Host and module must agree on it byte for byte: the same crate version,
/// the same compiler and the same target.
pub const BUILD_ID: &str = concat!(
    "plugin_core ",
    env!("CARGO_PKG_VERSION"),
    "; ",
    env!("PLUGIN_CORE_RUSTC_VERSION"),
    "; ",
    env!("PLUGIN_CORE_TARGET"),
    "\0"
);

/// [`BUILD_ID`] without the trailing NUL.
pub fn build_id() -> &'static str {
    BUILD_ID.trim_end_matches('\0')
}

/// Signature of the exported `plugin_declaration` function.
pub type DeclarationFn = unsafe extern "C" fn() -> *const ModuleDeclaration;

/// Describes one exported function: its name and calling shape.
///
/// Parameter and return kinds are stored as raw [`ValueType`] discriminants.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Export {
    /// NUL-terminated symbol name, identical to the `#[no_mangle]` name.
    pub name: *const c_char,
    pub params: *const u32,
    pub param_count: usize,
    pub returns: u32,
}

impl Export {
    /// `name` must end with a NUL byte; [`declare_module!`](crate::declare_module)
    /// takes care of that.
    pub const fn new(name: &'static str, params: &'static [u32], returns: ValueType) -> Self {
        Self {
            name: name.as_ptr().cast(),
            params: params.as_ptr(),
            param_count: params.len(),
            returns: returns as u32,
        }
    }
}

/// Everything the host needs to know about a module before it trusts any
/// of its symbols.
#[repr(C)]
pub struct ModuleDeclaration {
    pub abi_version: u32,

    /// NUL-terminated [`BUILD_ID`] of the module's `plugin_core`.
    pub build_id: *const c_char,

    /// Runs once, after the host has verified the declaration and before
    /// any export is bound.
    pub on_load: Option<extern "C" fn()>,

    /// Releases strings returned from `Str` exports. The module allocated
    /// them, so the module frees them.
    pub free_string: unsafe extern "C" fn(value: *mut c_char),

    pub exports: *const Export,
    pub export_count: usize,
}

// Declarations are immutable statics whose pointers only reference other
// statics in the same module.
unsafe impl Sync for ModuleDeclaration {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn build_id_is_nul_terminated_once() {
        assert!(BUILD_ID.ends_with('\0'));
        assert!(!build_id().contains('\0'));
        assert!(build_id().starts_with("plugin_core "));
    }

    #[test]
    fn export_points_at_static_data() {
        const PARAMS: &[u32] = &[ValueType::I32 as u32, ValueType::Bool as u32];
        let export = Export::new("Check\0", PARAMS, ValueType::Str);

        let name = unsafe { CStr::from_ptr(export.name) };
        assert_eq!(name.to_str().unwrap(), "Check");
        assert_eq!(export.param_count, 2);
        let params = unsafe { std::slice::from_raw_parts(export.params, export.param_count) };
        assert_eq!(params, PARAMS);
        assert_eq!(export.returns, ValueType::Str as u32);
    }
}
