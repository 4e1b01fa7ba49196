//! A shared library that exports `Hello` but carries no module declaration.

use std::os::raw::c_char;

use plugin_core::into_plugin_string;

#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn Hello() -> *mut c_char {
    into_plugin_string("Hello from plugin_bare!")
}
