//! C-callable surface of the plugin host.
//!
//! Build as a `cdylib` and call from any language with a C FFI; the
//! matching declarations are in `include/plugin_host.h`. All three entry
//! points share one process-wide [`Host`], configured on first use from
//! `host_config.toml` (or the file named by `PLUGIN_HOST_CONFIG`).

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::PathBuf;
use std::ptr;
use std::sync::Arc;

use host_core::{Host, HostConfig};
use logger::{ConsoleLogDestination, LoggerLoader};
use once_cell::sync::Lazy;

pub const STATUS_OK: c_int = 0;
pub const STATUS_FAILED: c_int = 1;

static HOST: Lazy<Host> = Lazy::new(build_host);

fn build_host() -> Host {
    let config = HostConfig::from_env().unwrap_or_else(|e| {
        eprintln!("[host_ffi] {}; using default configuration", e);
        HostConfig::default()
    });

    match Host::from_config(&config) {
        Ok(host) => host,
        Err(e) => {
            eprintln!("[host_ffi] {}; logging to console instead", e);
            let console = Arc::new(ConsoleLogDestination::new());
            let logger = LoggerLoader::with_destination(&config.logging, console);
            Host::new(&config, logger)
        }
    }
}

/// The host behind the C entry points, for Rust callers linking the rlib.
pub fn host() -> &'static Host {
    &HOST
}

#[cfg(unix)]
fn path_from_c(raw: &CStr) -> Option<PathBuf> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    Some(PathBuf::from(OsStr::from_bytes(raw.to_bytes())))
}

#[cfg(not(unix))]
fn path_from_c(raw: &CStr) -> Option<PathBuf> {
    raw.to_str().ok().map(PathBuf::from)
}

/// Loads the module at `plugin_path`, binds its `Hello` export and calls it.
///
/// Returns [`STATUS_OK`] on success and [`STATUS_FAILED`] on any failure
/// to load, bind or call; the reason is logged by the host. The module
/// itself is not sandboxed: a crash inside it ends the process.
///
/// # Safety
/// `plugin_path` must be null or point to a NUL-terminated string that
/// stays valid for the duration of the call. It is copied, never retained.
#[no_mangle]
pub unsafe extern "C" fn LoadAndCallPlugin(plugin_path: *const c_char) -> c_int {
    let host = host();

    if plugin_path.is_null() {
        host.logger().error("LoadAndCallPlugin called with a null path");
        return STATUS_FAILED;
    }

    let raw = CStr::from_ptr(plugin_path);
    let Some(path) = path_from_c(raw) else {
        host.logger().error(&format!(
            "LoadAndCallPlugin path is not valid UTF-8: {}",
            raw.to_string_lossy()
        ));
        return STATUS_FAILED;
    };

    match host.load_and_call(&path) {
        Ok(_) => STATUS_OK,
        Err(_) => STATUS_FAILED,
    }
}

/// Describes the host runtime, e.g. `Rust host: 4 threads, parallelism=8`.
///
/// The returned string is owned by the caller and must be released with
/// [`FreeRuntimeInfo`]. Null is returned only if the text cannot be
/// represented as a C string.
#[no_mangle]
pub extern "C" fn GetRuntimeInfo() -> *mut c_char {
    let info = host().runtime_info().to_string();
    match CString::new(info) {
        Ok(info) => info.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Releases a string returned by [`GetRuntimeInfo`]. Null is ignored.
///
/// # Safety
/// `info` must be null or a pointer obtained from `GetRuntimeInfo` that has
/// not been released yet.
#[no_mangle]
pub unsafe extern "C" fn FreeRuntimeInfo(info: *mut c_char) {
    if info.is_null() {
        return;
    }
    drop(CString::from_raw(info));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime_info() -> String {
        let raw = GetRuntimeInfo();
        assert!(!raw.is_null());
        let info = unsafe { CStr::from_ptr(raw) }.to_str().unwrap().to_owned();
        unsafe { FreeRuntimeInfo(raw) };
        info
    }

    #[test]
    fn null_path_fails() {
        assert_eq!(unsafe { LoadAndCallPlugin(ptr::null()) }, STATUS_FAILED);
    }

    #[test]
    fn missing_module_fails_without_registering() {
        let path = CString::new("./plugins/missing.mod").unwrap();

        assert_eq!(unsafe { LoadAndCallPlugin(path.as_ptr()) }, STATUS_FAILED);
        assert!(!host().table().paths().iter().any(|p| p.ends_with("missing.mod")));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_missing_path_fails() {
        let path = CString::new(vec![b'.', b'/', 0xff, 0xfe, b'.', b's', b'o']).unwrap();
        assert_eq!(unsafe { LoadAndCallPlugin(path.as_ptr()) }, STATUS_FAILED);
    }

    #[test]
    fn runtime_info_reports_threads_and_parallelism() {
        let info = runtime_info();

        let (kind, rest) = info.split_once(": ").unwrap();
        assert_eq!(kind, "Rust host");
        let (threads, parallelism) = rest.split_once(" threads, parallelism=").unwrap();
        let threads: usize = threads.parse().unwrap();
        let parallelism: usize = parallelism.parse().unwrap();
        assert!(threads >= 1);
        assert!(parallelism >= 1);
    }

    #[test]
    fn runtime_info_does_not_touch_the_module_table() {
        let entries_before = host().table().len();
        let loads_before = host().table().loads_performed();
        for _ in 0..10 {
            runtime_info();
        }
        assert_eq!(host().table().len(), entries_before);
        assert_eq!(host().table().loads_performed(), loads_before);
    }

    #[test]
    fn freeing_null_is_a_no_op() {
        unsafe { FreeRuntimeInfo(ptr::null_mut()) };
    }
}
