//! Exports `Hello` with the wrong shape, plus a symbol it never declares.
//!
//! `CallCount` lets tests prove the host refused to call either of them.

use std::sync::atomic::{AtomicI32, Ordering};

use plugin_core::declare_module;

static CALLS: AtomicI32 = AtomicI32::new(0);

#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn Hello(times: i32) -> i32 {
    CALLS.fetch_add(1, Ordering::SeqCst);
    times * 2
}

#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn Rogue() -> i32 {
    CALLS.fetch_add(1, Ordering::SeqCst);
    -1
}

#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn CallCount() -> i32 {
    CALLS.load(Ordering::SeqCst)
}

declare_module! {
    on_load: None,
    exports: {
        Hello(I32) -> I32,
        CallCount() -> I32,
    }
}
