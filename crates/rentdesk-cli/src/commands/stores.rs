use std::io::Write;

use anyhow::Result;
use rentdesk_lib::validation::{validate_coordinates, validate_limit};

use crate::output::write_stores;
use crate::GlobalOptions;

/// Rank stores by distance from (`latitude`, `longitude`).
pub fn handle_stores<W: Write>(
    global: &GlobalOptions,
    latitude: f64,
    longitude: f64,
    limit: Option<i64>,
    out: &mut W,
) -> Result<()> {
    validate_coordinates(latitude, longitude)?;
    let limit = validate_limit(limit)?;

    let datastore = global.load_datastore();
    let stores = datastore.stores_by_location(latitude, longitude, limit);
    tracing::info!(found = stores.len(), limit, "nearby stores lookup completed");

    write_stores(out, global.format, (latitude, longitude), limit, &stores)?;
    Ok(())
}
