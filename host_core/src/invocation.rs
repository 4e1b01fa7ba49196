use std::ffi::CStr;

use crate::error::HostError;
use crate::signature::StringFn;
use crate::symbol_binder::SymbolReference;

/// Outcome of one load, bind and call attempt.
pub type InvocationResult = Result<String, HostError>;

/// Calls a bound zero-argument string export and copies its result.
///
/// This is an untrusted call: the module's code runs on the caller's thread
/// with no sandbox, timeout or fault isolation. A crash inside it takes the
/// process down, and a hang blocks the caller indefinitely.
///
/// The returned buffer belongs to the module, so it is copied into an owned
/// `String` (invalid UTF-8 is replaced) and handed back to the module's
/// `free_string` before this returns.
pub fn invoke(symbol: &SymbolReference<StringFn>) -> InvocationResult {
    let func = symbol.func();
    let raw = unsafe { func() };

    if raw.is_null() {
        return Err(HostError::NullReturn {
            symbol: symbol.name().to_string(),
        });
    }

    let value = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
    unsafe { symbol.module().release_string(raw) };

    Ok(value)
}
