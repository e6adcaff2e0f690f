//! Data check: where each dataset came from, what it holds, and whether the
//! two lookups return anything useful against it.

use std::collections::HashSet;
use std::io::Write;

use anyhow::{bail, Result};
use serde::Serialize;

use rentdesk_lib::{DatasetReport, DatasetSource, Datastore, Order, Store};

use crate::output::{store_line, write_check};
use crate::GlobalOptions;

/// Phones queried by the sample order lookups.
pub const SAMPLE_PHONES: [&str; 3] = ["17798762697", "17796499753", "17796025359"];
/// Origin of the sample nearby lookup (Beijing Houhai).
pub const SAMPLE_ORIGIN: (f64, f64) = (39.946613, 116.370503);
pub const SAMPLE_LIMIT: usize = 3;

const FIRST_RECORDS: usize = 3;
const FIRST_PHONES: usize = 10;

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub source: DatasetSource,
    pub records: usize,
    pub defaulted_fields: usize,
    pub first_records: Vec<String>,
}

impl DatasetSummary {
    fn new(report: &DatasetReport, first_records: Vec<String>) -> Self {
        Self {
            source: report.source.clone(),
            records: report.records,
            defaulted_fields: report.defaulted_fields,
            first_records,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PhoneSample {
    pub phone: String,
    pub orders: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub stores: DatasetSummary,
    pub orders: DatasetSummary,
    pub distinct_phones: usize,
    pub first_phones: Vec<String>,
    pub phone_samples: Vec<PhoneSample>,
    pub nearby_origin: (f64, f64),
    pub nearby_sample: Vec<String>,
    pub problems: Vec<String>,
}

impl CheckReport {
    /// True when strict mode should reject the data.
    pub fn has_failures(&self) -> bool {
        self.stores.source.is_fixture()
            || self.orders.source.is_fixture()
            || !self.problems.is_empty()
    }
}

fn store_summary(store: &Store) -> String {
    format!("{} - {} - {}", store.name, store.status, store.phone)
}

fn order_summary(order: &Order) -> String {
    format!("{} - {} - {}", order.order_id, order.phone, order.status)
}

/// Distinct non-empty phones in first-seen order.
fn distinct_phones(orders: &[Order]) -> Vec<String> {
    let mut seen = HashSet::new();
    orders
        .iter()
        .filter(|order| !order.phone.is_empty())
        .filter(|order| seen.insert(order.phone.as_str()))
        .map(|order| order.phone.clone())
        .collect()
}

fn count_missing<T>(records: &[T], field: fn(&T) -> bool) -> usize {
    records.iter().filter(|record| field(*record)).count()
}

/// Records with an empty required field, one entry per field.
fn required_field_problems(datastore: &Datastore) -> Vec<String> {
    let store_checks: [(&str, fn(&Store) -> bool); 4] = [
        ("网点名称", |s| s.name.is_empty()),
        ("状态", |s| s.status.is_empty()),
        ("经纬度", |s| s.latitude == 0.0 && s.longitude == 0.0),
        ("联系电话", |s| s.phone.is_empty()),
    ];
    let order_checks: [(&str, fn(&Order) -> bool); 4] = [
        ("订单号", |o| o.order_id.is_empty()),
        ("手机号", |o| o.phone.is_empty()),
        ("租借位置", |o| o.location.is_empty()),
        ("租借状态", |o| o.status.is_empty()),
    ];

    let mut problems = Vec::new();
    for (field, missing) in store_checks {
        let count = count_missing(datastore.stores(), missing);
        if count > 0 {
            problems.push(format!("stores: {count} records missing {field}"));
        }
    }
    for (field, missing) in order_checks {
        let count = count_missing(datastore.orders(), missing);
        if count > 0 {
            problems.push(format!("orders: {count} records missing {field}"));
        }
    }
    problems
}

/// Build the check report for a loaded datastore.
pub fn build_report(datastore: &Datastore) -> CheckReport {
    let report = datastore.report();
    let phones = distinct_phones(datastore.orders());

    let phone_samples = SAMPLE_PHONES
        .iter()
        .map(|phone| PhoneSample {
            phone: phone.to_string(),
            orders: datastore
                .orders_by_phone(phone)
                .into_iter()
                .map(|order| format!("{} - {} - {}", order.order_id, order.location, order.status))
                .collect(),
        })
        .collect();

    let (latitude, longitude) = SAMPLE_ORIGIN;
    let nearby_sample = datastore
        .stores_by_location(latitude, longitude, SAMPLE_LIMIT)
        .iter()
        .map(store_line)
        .collect();

    CheckReport {
        stores: DatasetSummary::new(
            &report.stores,
            datastore.stores().iter().take(FIRST_RECORDS).map(store_summary).collect(),
        ),
        orders: DatasetSummary::new(
            &report.orders,
            datastore.orders().iter().take(FIRST_RECORDS).map(order_summary).collect(),
        ),
        distinct_phones: phones.len(),
        first_phones: phones.into_iter().take(FIRST_PHONES).collect(),
        phone_samples,
        nearby_origin: SAMPLE_ORIGIN,
        nearby_sample,
        problems: required_field_problems(datastore),
    }
}

/// Print the data check. In strict mode fixture fallback or missing
/// required fields make the command fail after the report is written.
pub fn handle_check<W: Write>(global: &GlobalOptions, strict: bool, out: &mut W) -> Result<()> {
    let datastore = global.load_datastore();
    let report = build_report(&datastore);
    write_check(out, global.format, &report)?;

    if strict && report.has_failures() {
        bail!(
            "data check failed: fixtures in use = {}, {} problems",
            datastore.report().used_fixtures(),
            report.problems.len()
        );
    }
    Ok(())
}
