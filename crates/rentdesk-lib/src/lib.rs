//! rentdesk library entry points.
//!
//! This crate loads the store and order spreadsheets into memory, falls back
//! to a built-in fixture dataset when a file cannot be read, and answers the
//! two lookup queries the front ends expose: orders by phone number and
//! nearest stores to a coordinate. Higher-level consumers (CLI, MCP server,
//! HTTP service) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod dataset;
pub mod datastore;
pub mod error;
pub mod fixtures;
pub mod geo;
pub mod loader;
pub mod model;
pub mod validation;

pub use dataset::{
    default_data_dir, DataSources, DatasetReport, DatasetSource, FallbackReason, LoadReport,
};
pub use datastore::Datastore;
pub use error::{Error, Result};
pub use geo::{haversine_km, GeoPoint, EARTH_RADIUS_KM};
pub use model::{payment_method_label, Order, RankedStore, Store};
pub use validation::{ValidationError, DEFAULT_STORE_LIMIT, MAX_STORE_LIMIT};
