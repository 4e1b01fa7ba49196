use std::fmt;

/// Label for this host's runtime in rendered snapshots.
pub const RUNTIME_KIND: &str = "Rust host";

/// Point-in-time view of the host's concurrency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub runtime_kind: &'static str,
    /// OS threads alive in the process when the snapshot was taken.
    pub live_threads: usize,
    pub parallelism: usize,
}

impl fmt::Display for DiagnosticsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} threads, parallelism={}",
            self.runtime_kind, self.live_threads, self.parallelism
        )
    }
}

/// Reads the live thread count. Purely observational.
pub fn snapshot(parallelism: usize) -> DiagnosticsSnapshot {
    DiagnosticsSnapshot {
        runtime_kind: RUNTIME_KIND,
        live_threads: live_threads().unwrap_or(1),
        parallelism: parallelism.max(1),
    }
}

#[cfg(target_os = "linux")]
fn live_threads() -> Option<usize> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_thread_count(&status)
}

// No cheap portable source; the caller's own thread is the one we know is alive.
#[cfg(not(target_os = "linux"))]
fn live_threads() -> Option<usize> {
    None
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_thread_count(status: &str) -> Option<usize> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("Threads:"))
        .and_then(|count| count.trim().parse().ok())
}
