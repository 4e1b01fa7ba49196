//! A valid module that does not provide the `Hello` entry point.

use std::os::raw::c_char;

use plugin_core::{declare_module, into_plugin_string};

#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn Goodbye() -> *mut c_char {
    into_plugin_string("Goodbye from plugin_silent!")
}

declare_module! {
    on_load: None,
    exports: {
        Goodbye() -> Str,
    }
}
