//! Loader for `module-info.json` installation paths
//!
//! Each installed file under `<out>/target/product/<device>/` is reduced to
//! its device-relative path, with the library directory folded to `${LIB}`
//! so 32-bit and 64-bit placements collapse onto one entry.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Placeholder for the `lib` / `lib64` directory
pub const LIB_PLACEHOLDER: &str = "${LIB}";

/// Normalized installation paths, e.g. `/system/${LIB}/libc.so`
pub type InstallPaths = BTreeSet<String>;

/// The part of a module-info record this tool reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleRecord {
    /// Absolute paths of the installed files
    pub installed: Vec<String>,
}

/// Load and normalize every installed path from a module-info file
pub fn load_install_paths<P: AsRef<Path>>(path: P) -> Result<InstallPaths> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let modules: BTreeMap<String, ModuleRecord> =
        serde_json::from_reader(BufReader::new(file))?;

    let paths = collect_install_paths(&modules);
    tracing::debug!(
        path = %path.display(),
        modules = modules.len(),
        install_paths = paths.len(),
        "loaded module info"
    );
    Ok(paths)
}

/// Parse module-info JSON from a string (useful for testing)
pub fn parse_module_info(content: &str) -> Result<InstallPaths> {
    let modules: BTreeMap<String, ModuleRecord> = serde_json::from_str(content)?;
    Ok(collect_install_paths(&modules))
}

fn collect_install_paths(modules: &BTreeMap<String, ModuleRecord>) -> InstallPaths {
    let mut result = InstallPaths::new();

    for (name, module) in modules {
        for installed in &module.installed {
            match normalize_install_path(installed) {
                Some(normalized) => {
                    result.insert(normalized);
                }
                None => {
                    tracing::trace!(module = %name, path = %installed, "skipping path outside product dir");
                }
            }
        }
    }

    result
}

/// Normalize one installed path.
///
/// Returns `None` unless the path contains a
/// `<sep>target<sep>product<sep><device><sep>` sequence. Either `/` or `\`
/// counts as a separator; when the sequence occurs more than once the last
/// occurrence is used.
pub fn normalize_install_path(path: &str) -> Option<String> {
    let parts: Vec<&str> = path.split(['/', '\\']).collect();

    // parts[i] == "target" needs a separator in front (i >= 1) and at least
    // one component after the device directory (i + 3 < len).
    let start = (1..parts.len().saturating_sub(3))
        .rev()
        .find(|&i| parts[i] == "target" && parts[i + 1] == "product" && !parts[i + 2].is_empty())?;

    let mut rest: Vec<&str> = parts[start + 3..].to_vec();

    // Only directories are folded, never the file name itself.
    let dir_count = rest.len().saturating_sub(1);
    if let Some(lib_dir) = rest[..dir_count]
        .iter_mut()
        .find(|c| **c == "lib" || **c == "lib64")
    {
        *lib_dir = LIB_PLACEHOLDER;
    }

    Some(format!("/{}", rest.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lib64() {
        assert_eq!(
            normalize_install_path("out/target/product/generic/system/lib64/libc.so").as_deref(),
            Some("/system/${LIB}/libc.so")
        );
    }

    #[test]
    fn test_normalize_lib32_and_subdir() {
        assert_eq!(
            normalize_install_path("/b/out/target/product/walleye/system/lib/vndk-sp/libcutils.so")
                .as_deref(),
            Some("/system/${LIB}/vndk-sp/libcutils.so")
        );
    }

    #[test]
    fn test_normalize_backslash_separators() {
        assert_eq!(
            normalize_install_path("C:\\out\\target\\product\\generic\\vendor\\lib64\\libfoo.so")
                .as_deref(),
            Some("/vendor/${LIB}/libfoo.so")
        );
    }

    #[test]
    fn test_normalize_only_first_lib_dir() {
        assert_eq!(
            normalize_install_path("out/target/product/generic/system/lib64/lib/libx.so").as_deref(),
            Some("/system/${LIB}/lib/libx.so")
        );
    }

    #[test]
    fn test_normalize_file_named_lib_untouched() {
        assert_eq!(
            normalize_install_path("out/target/product/generic/system/bin/lib").as_deref(),
            Some("/system/bin/lib")
        );
    }

    #[test]
    fn test_normalize_uses_last_product_dir() {
        assert_eq!(
            normalize_install_path("/x/target/product/a/y/target/product/b/system/lib/libc.so")
                .as_deref(),
            Some("/system/${LIB}/libc.so")
        );
    }

    #[test]
    fn test_normalize_rejects_non_product_paths() {
        assert_eq!(normalize_install_path("out/host/linux-x86/lib64/libc++.so"), None);
        assert_eq!(normalize_install_path("target/product/generic/system/lib/libc.so"), None);
        assert_eq!(normalize_install_path("out/target/product/generic"), None);
        assert_eq!(normalize_install_path("out/target/product//system/libc.so"), None);
    }

    #[test]
    fn test_parse_module_info() {
        let json = r#"{
            "libc": {
                "class": ["SHARED_LIBRARIES"],
                "installed": [
                    "out/target/product/generic/system/lib/libc.so",
                    "out/target/product/generic/system/lib64/libc.so"
                ]
            },
            "libc_host": {
                "installed": ["out/host/linux-x86/lib64/libc.so"]
            },
            "libz": {
                "installed": ["out/target/product/generic/system/lib64/vndk/libz.so"]
            }
        }"#;
        let paths = parse_module_info(json).unwrap();

        let expected: InstallPaths = ["/system/${LIB}/libc.so", "/system/${LIB}/vndk/libz.so"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn test_parse_module_info_malformed() {
        assert!(matches!(parse_module_info("{ not json"), Err(Error::Json(_))));
        assert!(matches!(
            parse_module_info(r#"{"libc": {"path": []}}"#),
            Err(Error::Json(_))
        ));
    }
}
