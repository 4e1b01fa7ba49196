//! Loads plugin modules at runtime, verifies their exports and calls them.
//!
//! The pieces compose bottom-up: a [`ModuleTable`] caches loaded modules,
//! the [`PluginLoader`] fills it, [`bind`] checks an export against a
//! compile-time signature, [`invoke`] calls it, and [`Host`] ties the
//! sequence together for the C-ABI surface.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod invocation;
pub mod module_handle;
pub mod module_table;
pub mod plugin_loader;
pub mod plugin_utils;
pub mod signature;
pub mod symbol_binder;

pub use config::{HostConfig, HostSettings};
pub use diagnostics::DiagnosticsSnapshot;
pub use error::{BindError, ConfigError, HostError, LoadError};
pub use host::Host;
pub use invocation::{invoke, InvocationResult};
pub use module_handle::ModuleHandle;
pub use module_table::ModuleTable;
pub use plugin_loader::PluginLoader;
pub use signature::{ExpectedSignature, Signature, StringFn};
pub use symbol_binder::{bind, SymbolReference};
