use std::env;
use std::process::Command;

// Bakes the compiler identity into the crate so a host can refuse modules
// built by a different toolchain or for a different target.
fn main() {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());

    let version = Command::new(&rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|stdout| stdout.trim().to_string())
        .unwrap_or_else(|| {
            println!("cargo:warning=could not query {} --version", rustc);
            "rustc unknown".to_string()
        });

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_string());

    println!("cargo:rustc-env=PLUGIN_CORE_RUSTC_VERSION={}", version);
    println!("cargo:rustc-env=PLUGIN_CORE_TARGET={}", target);
    println!("cargo:rerun-if-env-changed=RUSTC");
    println!("cargo:rerun-if-changed=build.rs");
}
