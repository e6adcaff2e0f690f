//! Data file resolution and load provenance.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "RENTDESK_DATA_DIR";

/// File name of the store sheet export inside the data directory.
pub const STORES_FILENAME: &str = "stores.csv";

/// File name of the order sheet export inside the data directory.
pub const ORDERS_FILENAME: &str = "orders.csv";

/// Directory checked relative to the working directory.
const LOCAL_DATA_DIR: &str = "data";

/// Locations of the two tabular data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub stores: PathBuf,
    pub orders: PathBuf,
}

impl DataSources {
    /// Both data files inside `dir`, using the standard file names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            stores: dir.join(STORES_FILENAME),
            orders: dir.join(ORDERS_FILENAME),
        }
    }

    /// Resolve the data directory and return the file locations in it.
    ///
    /// The resolution order is:
    /// 1. Explicit `target` argument when provided.
    /// 2. `RENTDESK_DATA_DIR` environment variable.
    /// 3. `./data` when that directory exists.
    /// 4. Platform-specific project data directory when it exists.
    ///
    /// When nothing exists `./data` is returned; the loader then falls back to
    /// the built-in fixtures.
    pub fn resolve(target: Option<&Path>) -> Self {
        if let Some(explicit) = target {
            debug!(path = %explicit.display(), "using explicit data directory");
            return Self::in_dir(explicit);
        }

        if let Some(env_path) = env::var_os(DATA_DIR_ENV) {
            debug!(path = ?env_path, "using data directory from environment");
            return Self::in_dir(PathBuf::from(env_path));
        }

        let local = PathBuf::from(LOCAL_DATA_DIR);
        if local.is_dir() {
            return Self::in_dir(local);
        }

        if let Ok(platform) = default_data_dir() {
            if platform.is_dir() {
                debug!(path = %platform.display(), "using platform data directory");
                return Self::in_dir(platform);
            }
        }

        Self::in_dir(local)
    }
}

/// Platform-specific data directory (e.g. `~/.local/share/rentdesk`).
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "rentdesk", "rentdesk").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Why a dataset was served from the built-in fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FallbackReason {
    /// No data file exists at the resolved path.
    Missing,
    /// The file exists but could not be read as a table.
    Unreadable(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Missing => f.write_str("data file missing"),
            FallbackReason::Unreadable(message) => write!(f, "data file unreadable: {message}"),
        }
    }
}

/// Where a loaded dataset came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DatasetSource {
    File { path: PathBuf },
    Fixture { path: PathBuf, reason: FallbackReason },
}

impl DatasetSource {
    pub fn is_fixture(&self) -> bool {
        matches!(self, DatasetSource::Fixture { .. })
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::File { path } => write!(f, "{}", path.display()),
            DatasetSource::Fixture { path, reason } => {
                write!(f, "built-in fixtures ({} at {})", reason, path.display())
            }
        }
    }
}

/// Outcome of loading one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetReport {
    pub source: DatasetSource,
    /// Number of records now held in memory.
    pub records: usize,
    /// Numeric cells that failed to parse and were replaced with zero.
    pub defaulted_fields: usize,
}

/// Outcome of loading both datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub stores: DatasetReport,
    pub orders: DatasetReport,
}

impl LoadReport {
    /// True when at least one dataset is served from fixtures.
    pub fn used_fixtures(&self) -> bool {
        self.stores.source.is_fixture() || self.orders.source.is_fixture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_uses_standard_file_names() {
        let sources = DataSources::in_dir("/srv/rentdesk");
        assert_eq!(sources.stores, PathBuf::from("/srv/rentdesk/stores.csv"));
        assert_eq!(sources.orders, PathBuf::from("/srv/rentdesk/orders.csv"));
    }

    #[test]
    fn explicit_target_wins() {
        let sources = DataSources::resolve(Some(Path::new("/tmp/explicit")));
        assert_eq!(sources, DataSources::in_dir("/tmp/explicit"));
    }

    #[test]
    fn fallback_reason_display() {
        assert_eq!(FallbackReason::Missing.to_string(), "data file missing");
        let unreadable = FallbackReason::Unreadable("bad header".to_string());
        assert!(unreadable.to_string().contains("bad header"));
    }

    #[test]
    fn dataset_source_serializes_with_tag() {
        let source = DatasetSource::Fixture {
            path: PathBuf::from("data/stores.csv"),
            reason: FallbackReason::Missing,
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["source"], "fixture");
        assert_eq!(json["reason"]["kind"], "missing");
    }
}
