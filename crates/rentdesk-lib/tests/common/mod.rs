//! Shared helpers for rentdesk-lib integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Directory holding the sample CSV exports used by tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Temporary data directory seeded with the given files from `docs/fixtures`.
#[allow(dead_code)]
pub fn data_dir_with(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp data dir");
    for name in files {
        copy_fixture(name, dir.path());
    }
    dir
}

fn copy_fixture(name: &str, target: &Path) {
    fs::copy(fixtures_dir().join(name), target.join(name))
        .unwrap_or_else(|err| panic!("copy fixture {name}: {err}"));
}
