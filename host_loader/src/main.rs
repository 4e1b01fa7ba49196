//! Drives the `host_ffi` library the way a foreign process would: through
//! `dlopen` and the three C entry points, never through Rust APIs.

use std::ffi::{CStr, CString, NulError};
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use host_core::plugin_utils::resolve_module_filename;
use libloading::{Library, Symbol};
use tokio::task::JoinSet;

type LoadAndCallFn = unsafe extern "C" fn(*const c_char) -> c_int;
type GetRuntimeInfoFn = unsafe extern "C" fn() -> *mut c_char;
type FreeRuntimeInfoFn = unsafe extern "C" fn(*mut c_char);

#[derive(Debug, Parser)]
#[command(name = "host_loader", about = "Load a plugin through the host_ffi C interface")]
struct Args {
    /// Plugin module to load and call
    plugin: PathBuf,

    /// host_ffi shared library; defaults to the one next to this executable
    #[arg(long)]
    library: Option<PathBuf>,

    /// How many callers invoke LoadAndCallPlugin at the same time
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    callers: u16,
}

/// Entry points copied out of the library; `_library` keeps them mapped.
#[derive(Clone)]
struct HostApi {
    load_and_call: LoadAndCallFn,
    get_runtime_info: GetRuntimeInfoFn,
    free_runtime_info: FreeRuntimeInfoFn,
    _library: Arc<Library>,
}

impl HostApi {
    fn open(path: &Path) -> Result<Self, libloading::Error> {
        let library = unsafe { Library::new(path)? };

        let (load_and_call, get_runtime_info, free_runtime_info) = unsafe {
            let load: Symbol<LoadAndCallFn> = library.get(b"LoadAndCallPlugin")?;
            let info: Symbol<GetRuntimeInfoFn> = library.get(b"GetRuntimeInfo")?;
            let free: Symbol<FreeRuntimeInfoFn> = library.get(b"FreeRuntimeInfo")?;
            (*load, *info, *free)
        };

        Ok(Self {
            load_and_call,
            get_runtime_info,
            free_runtime_info,
            _library: Arc::new(library),
        })
    }

    fn runtime_info(&self) -> Option<String> {
        let raw = unsafe { (self.get_runtime_info)() };
        if raw.is_null() {
            return None;
        }
        let info = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
        unsafe { (self.free_runtime_info)(raw) };
        Some(info)
    }

    fn load_and_call(&self, plugin: &CString) -> c_int {
        unsafe { (self.load_and_call)(plugin.as_ptr()) }
    }
}

#[cfg(unix)]
fn c_path(path: &Path) -> Result<CString, NulError> {
    use std::os::unix::ffi::OsStrExt;

    CString::new(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn c_path(path: &Path) -> Result<CString, NulError> {
    CString::new(path.to_string_lossy().into_owned())
}

fn default_library() -> PathBuf {
    let file_name = resolve_module_filename("host_ffi");
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file_name)))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

async fn run_callers(api: HostApi, plugin: CString, callers: u16) -> Vec<c_int> {
    let plugin = Arc::new(plugin);
    let mut tasks = JoinSet::new();

    for _ in 0..callers {
        let api = api.clone();
        let plugin = Arc::clone(&plugin);
        tasks.spawn_blocking(move || api.load_and_call(&plugin));
    }

    let mut statuses = Vec::with_capacity(callers as usize);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(status) => statuses.push(status),
            Err(e) => {
                eprintln!("✗ Caller task failed: {}", e);
                statuses.push(1);
            }
        }
    }
    statuses
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    println!("=== Loader: Starting ===");

    let library = args.library.unwrap_or_else(default_library);
    println!("Loading host library: {}", library.display());

    let api = match HostApi::open(&library) {
        Ok(api) => {
            println!("✓ Host library loaded");
            api
        }
        Err(e) => {
            eprintln!("✗ Failed to load host library: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match api.runtime_info() {
        Some(info) => println!("Host runtime info: {}", info),
        None => eprintln!("✗ GetRuntimeInfo returned null"),
    }

    let plugin = match c_path(&args.plugin) {
        Ok(plugin) => plugin,
        Err(e) => {
            eprintln!("✗ Plugin path contains a NUL byte: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Calling LoadAndCallPlugin for {} from {} caller(s)",
        args.plugin.display(),
        args.callers
    );

    let statuses = tokio::select! {
        statuses = run_callers(api.clone(), plugin, args.callers) => statuses,
        _ = tokio::signal::ctrl_c() => {
            // Blocking callers cannot be interrupted; leave them to the OS
            println!("Received Ctrl+C, shutting down...");
            return ExitCode::FAILURE;
        }
    };

    if let Some(info) = api.runtime_info() {
        println!("Host runtime info: {}", info);
    }

    let failures = statuses.iter().filter(|status| **status != 0).count();
    if failures == 0 {
        println!("✓ Plugin loading and execution successful!");
        println!("=== Loader: Success! ===");
        ExitCode::SUCCESS
    } else {
        eprintln!("✗ {} of {} call(s) failed", failures, statuses.len());
        println!("=== Loader: Failed ===");
        ExitCode::FAILURE
    }
}
