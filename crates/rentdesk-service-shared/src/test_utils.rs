//! Test utilities for handler testing.
//!
//! Provides an [`AppState`] loaded from the CSV fixtures under `docs/fixtures`.

use std::path::PathBuf;
use std::sync::OnceLock;

use rentdesk_lib::DataSources;

use crate::state::AppState;

/// Directory holding `stores.csv` and `orders.csv` test data.
pub const TEST_FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../docs/fixtures");

static TEST_STATE: OnceLock<AppState> = OnceLock::new();

/// Shared test state loaded once from the fixture CSVs.
pub fn test_state() -> AppState {
    TEST_STATE
        .get_or_init(|| AppState::load(&DataSources::in_dir(fixture_dir())))
        .clone()
}

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(TEST_FIXTURE_DIR)
}

/// Known values in the fixture CSVs.
pub mod fixture_data {
    /// Phone with two orders.
    pub const PHONE_TWO_ORDERS: &str = "17796025359";

    /// Phone with a single paused order.
    pub const PHONE_ONE_ORDER: &str = "17798762697";

    /// Well-formed phone with no orders.
    pub const PHONE_NO_ORDERS: &str = "13900000000";

    /// Coordinate on the Bund in Shanghai.
    pub const BUND: (f64, f64) = (31.24, 121.49);
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}
