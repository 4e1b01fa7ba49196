use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Moves `value` onto the module's heap for a `Str` return.
///
/// Returns null if `value` contains an interior NUL byte.
pub fn into_plugin_string(value: &str) -> *mut c_char {
    match CString::new(value) {
        Ok(c_string) => c_string.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Releases a string produced by [`into_plugin_string`].
///
/// Every module compiles its own copy of this function, which is what makes
/// the free happen on the allocator that produced the string.
///
/// # Safety
/// `value` must be null or a pointer returned by `into_plugin_string` in the
/// same module that has not been released yet.
pub unsafe extern "C" fn free_plugin_string(value: *mut c_char) {
    if value.is_null() {
        return;
    }
    drop(CString::from_raw(value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn string_survives_the_round_trip() {
        let raw = into_plugin_string("Hello from plugin_core");
        assert!(!raw.is_null());
        let copied = unsafe { CStr::from_ptr(raw) }.to_str().unwrap().to_owned();
        unsafe { free_plugin_string(raw) };
        assert_eq!(copied, "Hello from plugin_core");
    }

    #[test]
    fn interior_nul_yields_null() {
        assert!(into_plugin_string("bad\0string").is_null());
    }

    #[test]
    fn freeing_null_is_a_no_op() {
        unsafe { free_plugin_string(ptr::null_mut()) };
    }
}
