mod common;

use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;

use common::{fixture_copy, memory_host, GREETING};
use host_core::{bind, HostError, LoadError};

type CountFn = unsafe extern "C" fn() -> i32;

fn load_count(host: &host_core::Host, path: &std::path::Path) -> i32 {
    let module = host.load(path).unwrap();
    let count = bind::<CountFn>(&module, "LoadCount").unwrap();
    unsafe { (count.func())() }
}

#[test]
fn hello_module_returns_its_greeting() {
    let (_dir, path) = fixture_copy("plugin_hello");
    let (host, memory) = memory_host(2);

    let value = host.load_and_call(&path).unwrap();

    assert_eq!(value, GREETING);
    assert_eq!(host.table().len(), 1);
    assert_eq!(memory.count_matching(&format!("Plugin Hello() returned: {}", GREETING)), 1);
}

#[test]
fn second_load_reuses_the_cached_handle() {
    let (_dir, path) = fixture_copy("plugin_hello");
    let (host, memory) = memory_host(2);

    let first = host.load(&path).unwrap();
    let second = host.load(&path).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(host.table().loads_performed(), 1);
    assert_eq!(memory.count_matching("Module loaded"), 1);
    assert_eq!(load_count(&host, &path), 1);
}

#[test]
fn equivalent_paths_share_one_entry() {
    let (dir, path) = fixture_copy("plugin_hello");
    let (host, _) = memory_host(2);
    let dotted = dir.path().join(".").join(path.file_name().unwrap());

    let direct = host.load(&path).unwrap();
    let via_dot = host.load(&dotted).unwrap();

    assert!(Arc::ptr_eq(&direct, &via_dot));
    assert_eq!(host.table().len(), 1);
}

#[test]
fn repeated_calls_initialize_once() {
    let (_dir, path) = fixture_copy("plugin_hello");
    let (host, _) = memory_host(2);

    for _ in 0..5 {
        assert_eq!(host.load_and_call(&path).unwrap(), GREETING);
    }

    assert_eq!(host.table().loads_performed(), 1);
    assert_eq!(load_count(&host, &path), 1);
}

#[test]
fn concurrent_callers_initialize_once() {
    const CALLERS: usize = 8;
    let (_dir, path) = fixture_copy("plugin_hello");
    let (host, _) = memory_host(CALLERS);
    let host = Arc::new(host);
    let barrier = Arc::new(Barrier::new(CALLERS));

    let callers: Vec<_> = (0..CALLERS)
        .map(|_| {
            let host = Arc::clone(&host);
            let barrier = Arc::clone(&barrier);
            let path = path.clone();
            thread::spawn(move || {
                barrier.wait();
                host.load_and_call(&path)
            })
        })
        .collect();

    for caller in callers {
        assert_eq!(caller.join().unwrap().unwrap(), GREETING);
    }
    assert_eq!(host.table().loads_performed(), 1);
    assert_eq!(host.table().len(), 1);
    assert_eq!(load_count(&host, &path), 1);
}

#[test]
fn missing_module_leaves_table_empty() {
    let (host, _) = memory_host(2);

    let err = host.load_and_call("./plugins/missing.mod").unwrap_err();

    assert!(matches!(err, HostError::Load(LoadError::NotFound { .. })));
    assert!(host.table().is_empty());
}

#[test]
fn failed_load_can_be_retried() {
    let (_dir, built) = fixture_copy("plugin_hello");
    let target_dir = tempfile::tempdir().unwrap();
    let path = target_dir.path().join(built.file_name().unwrap());
    let (host, _) = memory_host(2);

    assert!(host.load_and_call(&path).is_err());
    assert!(host.table().is_empty());

    fs::copy(&built, &path).unwrap();
    assert_eq!(host.load_and_call(&path).unwrap(), GREETING);
    assert_eq!(host.table().len(), 1);
}

#[test]
fn library_without_declaration_is_not_a_plugin() {
    let (_dir, path) = fixture_copy("plugin_bare");
    let (host, memory) = memory_host(2);

    let err = host.load_and_call(&path).unwrap_err();

    assert!(matches!(err, HostError::Load(LoadError::NotAPlugin { .. })), "got {err}");
    assert!(host.table().is_empty());
    assert_eq!(host.table().loads_performed(), 0);
    assert_eq!(memory.count_matching("returned"), 0);
}
