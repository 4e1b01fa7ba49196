use std::path::PathBuf;

use thiserror::Error;

/// Why a module could not be opened or registered.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("module path is empty")]
    EmptyPath,

    #[error("module not found at {path}: {source}")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open module {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("{path} is not a plugin module (no plugin_declaration export): {source}")]
    NotAPlugin {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("{path} speaks plugin ABI v{found}, host expects v{expected}")]
    AbiMismatch {
        path: PathBuf,
        expected: u32,
        found: u32,
    },

    #[error("{path} was built against \"{found}\", host is \"{expected}\"")]
    BuildMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("{path} has a malformed declaration: {reason}")]
    MalformedDeclaration { path: PathBuf, reason: String },
}

/// Why an export could not be handed out as a callable.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("symbol {name} not found in {module}: {source}")]
    SymbolNotFound {
        name: String,
        module: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("symbol {name} in {module} is exported but not declared, its signature cannot be verified")]
    Undeclared { name: String, module: PathBuf },

    #[error("symbol {name} in {module} has signature {found}, expected {expected}")]
    SignatureMismatch {
        name: String,
        module: PathBuf,
        expected: String,
        found: String,
    },
}

/// Any failure along the load, bind, invoke sequence.
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error("{symbol} returned a null string")]
    NullReturn { symbol: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("[host] parallelism must be at least 1")]
    ZeroParallelism,
}
