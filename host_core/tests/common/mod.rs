//! Builds the fixture plugins once per test binary and hands out isolated copies.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use host_core::plugin_utils::{resolve_module_filename, resolve_module_path};
use host_core::{Host, HostConfig, HostSettings};
use logger::{LogLevel, LogWriter, Logger, MemoryLogDestination};
use once_cell::sync::Lazy;
use tempfile::TempDir;

pub const GREETING: &str = "Hello from plugin_hello!";

const FIXTURES: &[&str] = &["plugin_hello", "plugin_silent", "plugin_mismatch", "plugin_bare"];

// Separate target dir: the outer `cargo test` still holds the lock on the main one.
static FIXTURE_DIR: Lazy<PathBuf> = Lazy::new(|| {
    let workspace = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crate lives inside the workspace");
    let target_dir = workspace.join("target").join("fixtures");

    let mut command = Command::new(env!("CARGO"));
    command.current_dir(workspace).args(["build", "--quiet"]);
    for fixture in FIXTURES {
        command.args(["-p", fixture]);
    }
    command.arg("--target-dir").arg(&target_dir);

    let status = command.status().expect("failed to run cargo for fixture plugins");
    assert!(status.success(), "building fixture plugins failed");

    target_dir.join("debug")
});

/// Copies fixture `name` into a fresh directory.
///
/// Every copy is a distinct file, so the dynamic loader maps it separately
/// and its statics (load and call counters) start from zero.
pub fn fixture_copy(name: &str) -> (TempDir, PathBuf) {
    let built = resolve_module_path(&*FIXTURE_DIR, name);
    let dir = tempfile::tempdir().expect("tempdir");
    let copy = dir.path().join(resolve_module_filename(name));
    fs::copy(&built, &copy).unwrap_or_else(|e| panic!("copying {}: {}", built.display(), e));
    (dir, copy)
}

pub fn memory_host(parallelism: usize) -> (Host, Arc<MemoryLogDestination>) {
    let memory = Arc::new(MemoryLogDestination::new());
    let logger: Arc<dyn Logger> = Arc::new(LogWriter::new(LogLevel::Trace, memory.clone()));
    let config = HostConfig {
        host: HostSettings {
            parallelism: Some(parallelism),
        },
        ..HostConfig::default()
    };
    (Host::new(&config, logger), memory)
}
