//! Tabular record loading.
//!
//! The store and order sheets are exported as CSV with their original Chinese
//! header row. Columns are matched by exact header text; string cells are
//! copied verbatim and numeric cells are read from their leading number, so
//! unit suffixes such as `分钟` or `元` are ignored. Cells without a leading
//! number become zero. Rows are never dropped.
//!
//! [`load_stores`] and [`load_orders`] never fail: a missing or unreadable file
//! is replaced by the built-in fixtures and the substitution is recorded in the
//! returned [`DatasetReport`].

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::dataset::{DatasetReport, DatasetSource, FallbackReason};
use crate::error::{Error, Result};
use crate::fixtures::{sample_orders, sample_stores};
use crate::model::{Order, Store};

/// Header text of the store sheet columns.
pub mod store_columns {
    pub const NAME: &str = "网点名称";
    pub const STATUS: &str = "状态";
    pub const COORDINATES: &str = "经纬度";
    pub const PROVINCE: &str = "省份";
    pub const CITY: &str = "城市";
    pub const DISTRICT: &str = "区/县";
    pub const ADDRESS: &str = "详细地址";
    pub const LONGITUDE: &str = "经度";
    pub const LATITUDE: &str = "纬度";
    pub const TYPE: &str = "门店类型";
    pub const OPEN_DATE: &str = "开业时间";
    pub const BUSINESS_HOURS: &str = "营业时间";
    pub const RATING: &str = "评分";
    pub const PHONE: &str = "联系电话";

    pub const ALL: [&str; 14] = [
        NAME,
        STATUS,
        COORDINATES,
        PROVINCE,
        CITY,
        DISTRICT,
        ADDRESS,
        LONGITUDE,
        LATITUDE,
        TYPE,
        OPEN_DATE,
        BUSINESS_HOURS,
        RATING,
        PHONE,
    ];
}

/// Header text of the order sheet columns.
pub mod order_columns {
    pub const ORDER_ID: &str = "订单号";
    pub const USER_ID: &str = "用户id";
    pub const PHONE: &str = "手机号";
    pub const DEVICE_ID: &str = "设备id";
    pub const LOCATION: &str = "租借位置";
    pub const START_TIME: &str = "租借开始时间";
    pub const RETURN_TIME: &str = "退还时间";
    pub const DURATION: &str = "持续时间/分钟";
    pub const RETURN_STORE: &str = "归还网点";
    pub const COST: &str = "计费";
    pub const STATUS: &str = "租借状态";
    pub const PAYMENT_METHOD: &str = "支付方式";

    pub const ALL: [&str; 12] = [
        ORDER_ID,
        USER_ID,
        PHONE,
        DEVICE_ID,
        LOCATION,
        START_TIME,
        RETURN_TIME,
        DURATION,
        RETURN_STORE,
        COST,
        STATUS,
        PAYMENT_METHOD,
    ];
}

/// Records parsed from one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSheet<T> {
    pub records: Vec<T>,
    /// Numeric cells replaced with zero because they did not parse.
    pub defaulted_fields: usize,
}

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("float prefix pattern is a valid regex")
});

static INTEGER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+").expect("integer prefix pattern is a valid regex"));

/// Parse the leading number of a floating point cell, so `"3.2元"` reads as 3.2.
/// Cells without a numeric prefix and non-finite values yield `None`.
pub fn parse_float(cell: &str) -> Option<f64> {
    let prefix = FLOAT_PREFIX.find(cell.trim_start())?;
    prefix
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse the leading digits of an integer cell, so `"32分钟"` reads as 32 and
/// `"32.9"` as 32. Digit runs too long for `i64` saturate.
pub fn parse_integer(cell: &str) -> Option<i64> {
    let prefix = INTEGER_PREFIX.find(cell.trim_start())?.as_str();
    prefix
        .parse::<i64>()
        .ok()
        .or_else(|| prefix.parse::<f64>().ok().map(|v| v as i64))
}

/// Column positions keyed by header text.
struct HeaderIndex {
    positions: HashMap<&'static str, usize>,
}

impl HeaderIndex {
    fn build(
        dataset: &'static str,
        headers: &StringRecord,
        expected: &[&'static str],
    ) -> Result<Self> {
        let mut positions = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            let header = header.trim_start_matches('\u{feff}');
            if let Some(column) = expected.iter().find(|c| **c == header) {
                positions.entry(*column).or_insert(i);
            }
        }

        if positions.is_empty() {
            return Err(Error::UnrecognisedHeaders {
                dataset,
                found: headers.iter().collect::<Vec<_>>().join(", "),
            });
        }

        Ok(Self { positions })
    }
}

/// Field accessor for one record that counts defaulted numeric cells.
struct RowReader<'a> {
    record: &'a StringRecord,
    headers: &'a HeaderIndex,
    defaulted: usize,
}

impl<'a> RowReader<'a> {
    fn new(record: &'a StringRecord, headers: &'a HeaderIndex) -> Self {
        Self {
            record,
            headers,
            defaulted: 0,
        }
    }

    fn cell(&self, column: &str) -> &'a str {
        self.headers
            .positions
            .get(column)
            .and_then(|&i| self.record.get(i))
            .unwrap_or("")
    }

    fn text(&self, column: &str) -> String {
        self.cell(column).to_string()
    }

    fn float(&mut self, column: &str) -> f64 {
        parse_float(self.cell(column)).unwrap_or_else(|| {
            self.defaulted += 1;
            0.0
        })
    }

    fn integer(&mut self, column: &str) -> i64 {
        parse_integer(self.cell(column)).unwrap_or_else(|| {
            self.defaulted += 1;
            0
        })
    }
}

fn read_sheet<R, T, F>(
    dataset: &'static str,
    reader: R,
    expected: &[&'static str],
    mut map_row: F,
) -> Result<ParsedSheet<T>>
where
    R: Read,
    F: FnMut(&mut RowReader<'_>) -> T,
{
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = HeaderIndex::build(dataset, csv_reader.headers()?, expected)?;

    let mut records = Vec::new();
    let mut defaulted_fields = 0;
    for row in csv_reader.records() {
        let row = row?;
        let mut fields = RowReader::new(&row, &headers);
        records.push(map_row(&mut fields));
        defaulted_fields += fields.defaulted;
    }

    Ok(ParsedSheet {
        records,
        defaulted_fields,
    })
}

/// Parse the store sheet from any reader.
pub fn read_stores<R: Read>(reader: R) -> Result<ParsedSheet<Store>> {
    use store_columns as col;

    read_sheet("store", reader, &col::ALL, |row| Store {
        name: row.text(col::NAME),
        status: row.text(col::STATUS),
        coordinates: row.text(col::COORDINATES),
        province: row.text(col::PROVINCE),
        city: row.text(col::CITY),
        district: row.text(col::DISTRICT),
        address: row.text(col::ADDRESS),
        longitude: row.float(col::LONGITUDE),
        latitude: row.float(col::LATITUDE),
        store_type: row.text(col::TYPE),
        open_date: row.text(col::OPEN_DATE),
        business_hours: row.text(col::BUSINESS_HOURS),
        rating: row.float(col::RATING),
        phone: row.text(col::PHONE),
    })
}

/// Parse the order sheet from any reader.
pub fn read_orders<R: Read>(reader: R) -> Result<ParsedSheet<Order>> {
    use order_columns as col;

    read_sheet("order", reader, &col::ALL, |row| Order {
        order_id: row.text(col::ORDER_ID),
        user_id: row.text(col::USER_ID),
        phone: row.text(col::PHONE),
        device_id: row.text(col::DEVICE_ID),
        location: row.text(col::LOCATION),
        start_time: row.text(col::START_TIME),
        return_time: row.text(col::RETURN_TIME),
        duration: row.integer(col::DURATION),
        return_store: row.text(col::RETURN_STORE),
        cost: row.float(col::COST),
        status: row.text(col::STATUS),
        payment_method: row.text(col::PAYMENT_METHOD),
    })
}

/// Load the store sheet at `path`, falling back to the fixture stores.
pub fn load_stores(path: &Path) -> (Vec<Store>, DatasetReport) {
    load_with_fallback("store", path, |file| read_stores(file), sample_stores)
}

/// Load the order sheet at `path`, falling back to the fixture orders.
pub fn load_orders(path: &Path) -> (Vec<Order>, DatasetReport) {
    load_with_fallback("order", path, |file| read_orders(file), sample_orders)
}

fn load_with_fallback<T>(
    dataset: &'static str,
    path: &Path,
    read: impl FnOnce(File) -> Result<ParsedSheet<T>>,
    fixture: fn() -> Vec<T>,
) -> (Vec<T>, DatasetReport) {
    let outcome = if path.exists() {
        File::open(path)
            .map_err(Error::from)
            .and_then(read)
            .map_err(|err| FallbackReason::Unreadable(err.to_string()))
    } else {
        Err(FallbackReason::Missing)
    };

    match outcome {
        Ok(parsed) => {
            info!(
                dataset,
                path = %path.display(),
                records = parsed.records.len(),
                defaulted_fields = parsed.defaulted_fields,
                "loaded dataset from file"
            );
            let report = DatasetReport {
                source: DatasetSource::File {
                    path: path.to_path_buf(),
                },
                records: parsed.records.len(),
                defaulted_fields: parsed.defaulted_fields,
            };
            (parsed.records, report)
        }
        Err(reason) => {
            warn!(
                dataset,
                path = %path.display(),
                reason = %reason,
                "using built-in fixture data"
            );
            let records = fixture();
            let report = DatasetReport {
                source: DatasetSource::Fixture {
                    path: path.to_path_buf(),
                    reason,
                },
                records: records.len(),
                defaulted_fields: 0,
            };
            (records, report)
        }
    }
}
