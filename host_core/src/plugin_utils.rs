use std::path::{Path, PathBuf};

/// Platform file name for a module crate, e.g. `libfoo.so`, `libfoo.dylib` or `foo.dll`.
pub fn resolve_module_filename(name: &str) -> String {
    format!(
        "{}{}{}",
        std::env::consts::DLL_PREFIX,
        name,
        std::env::consts::DLL_SUFFIX
    )
}

/// Joins `folder` with the platform file name for `name`.
pub fn resolve_module_path<P: AsRef<Path>>(folder: P, name: &str) -> PathBuf {
    folder.as_ref().join(resolve_module_filename(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_uses_lib_prefix_and_so_suffix() {
        assert_eq!(resolve_module_filename("plugin_hello"), "libplugin_hello.so");
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn macos_uses_dylib() {
        assert_eq!(resolve_module_filename("plugin_hello"), "libplugin_hello.dylib");
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn windows_uses_dll_without_prefix() {
        assert_eq!(resolve_module_filename("plugin_hello"), "plugin_hello.dll");
    }

    #[test]
    fn joins_folder_and_file_name() {
        let path = resolve_module_path("target/debug", "plugin_hello");
        assert!(path.starts_with("target/debug"));
        assert!(path.to_string_lossy().contains("plugin_hello"));
    }
}
