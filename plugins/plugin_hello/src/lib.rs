//! Minimal module satisfying the host's entry contract.

use std::os::raw::c_char;
use std::sync::atomic::{AtomicI32, Ordering};

use plugin_core::{declare_module, into_plugin_string};

pub const GREETING: &str = "Hello from plugin_hello!";

static LOAD_COUNT: AtomicI32 = AtomicI32::new(0);

#[ctor::ctor]
fn on_map() {
    println!("[plugin_hello] >>> MAPPED");
}

extern "C" fn on_load() {
    let count = LOAD_COUNT.fetch_add(1, Ordering::SeqCst) + 1;
    println!("[plugin_hello] on_load #{}", count);
}

#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn Hello() -> *mut c_char {
    println!("[plugin_hello] Hello function called!");
    into_plugin_string(GREETING)
}

/// How many times the host has run `on_load`; anything but 1 is a host bug.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn LoadCount() -> i32 {
    LOAD_COUNT.load(Ordering::SeqCst)
}

declare_module! {
    on_load: Some(on_load),
    exports: {
        Hello() -> Str,
        LoadCount() -> I32,
    }
}
