//! Builds the plugin crates the integration tests load.
#![allow(dead_code)] // Each test binary uses a different subset

use std::collections::HashMap;
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Mutex, OnceLock};

/// Directory of this crate.
pub fn crate_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Root of the workspace.
pub fn workspace_dir() -> PathBuf {
    crate_dir().join("..").join("..")
}

fn build_cache() -> &'static Mutex<HashMap<PathBuf, Result<PathBuf, String>>> {
    static CACHE: OnceLock<Mutex<HashMap<PathBuf, Result<PathBuf, String>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Compiles the cdylib crate at `manifest_dir` and returns the path of the
/// library named `lib_name`.
///
/// Each crate is built at most once per test binary. Builds go to a target
/// directory of their own so they do not wait on the outer `cargo test`.
pub fn build_cdylib(manifest_dir: &Path, lib_name: &str) -> Result<PathBuf, String> {
    let mut cache = build_cache().lock().map_err(|e| e.to_string())?;
    cache
        .entry(manifest_dir.to_path_buf())
        .or_insert_with(|| compile(manifest_dir, lib_name))
        .clone()
}

fn compile(manifest_dir: &Path, lib_name: &str) -> Result<PathBuf, String> {
    let cargo = std::env::var_os("CARGO").unwrap_or_else(|| OsString::from("cargo"));
    let target_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("pluma-test-plugins");
    let manifest = manifest_dir.join("Cargo.toml");

    let output = Command::new(cargo)
        .arg("build")
        .arg("--manifest-path")
        .arg(&manifest)
        .arg("--target-dir")
        .arg(&target_dir)
        .output()
        .map_err(|e| format!("Failed to execute cargo build for {}: {}", manifest.display(), e))?;

    if !output.status.success() {
        return Err(format!(
            "Failed to compile test plugin {}: cargo build exited with status {:?}.\nStderr:\n{}",
            manifest.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let library = target_dir
        .join("debug")
        .join(format!("{}{}{}", DLL_PREFIX, lib_name, DLL_SUFFIX));
    if !library.is_file() {
        return Err(format!("Compiled plugin library not found at {}", library.display()));
    }
    Ok(library)
}

/// Path of the built MathOps plugin.
pub fn math_ops_library() -> PathBuf {
    build_cdylib(&workspace_dir().join("plugins").join("math-ops"), "MathOps")
        .expect("Failed to build the MathOps plugin")
}

/// Path of a built failing FFI fixture from `tests/test_plugins/failing_ffi`.
pub fn failing_fixture(lib_name: &str) -> PathBuf {
    let dir = crate_dir()
        .join("tests")
        .join("test_plugins")
        .join("failing_ffi")
        .join(lib_name);
    build_cdylib(&dir, lib_name)
        .unwrap_or_else(|e| panic!("Failed to build fixture {}: {}", lib_name, e))
}
