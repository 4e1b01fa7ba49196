//! Types shared between the plugin host and the modules it loads.
//!
//! A module is a `cdylib` that calls [`declare_module!`] once. The macro
//! exports a `plugin_declaration` symbol describing the module's ABI
//! version, build identity and the signature of every function it exports,
//! which is what lets the host check a symbol's shape before calling it.

pub mod value_type;
pub mod plugin;
pub mod helper_functions;
pub mod plugin_macros;

pub use value_type::ValueType;
pub use plugin::{build_id, DeclarationFn, Export, ModuleDeclaration, ABI_VERSION, BUILD_ID, DECLARATION_SYMBOL, ENTRY_SYMBOL};
pub use helper_functions::{free_plugin_string, into_plugin_string};
