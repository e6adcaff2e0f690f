//! Rendering of lookup results for the terminal.
//!
//! Text output is one line per record; JSON output is pretty-printed and
//! carries the full records so it can be piped into other tools.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use rentdesk_lib::{Order, RankedStore};

use crate::commands::check::CheckReport;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct OrdersOutput<'a> {
    phone: &'a str,
    count: usize,
    orders: &'a [&'a Order],
}

#[derive(Debug, Serialize)]
struct StoresOutput<'a> {
    latitude: f64,
    longitude: f64,
    limit: usize,
    count: usize,
    stores: &'a [RankedStore],
}

fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// One-line summary of an order.
pub fn order_line(order: &Order) -> String {
    let mut line = format!(
        "{} | {} | {} | {}分钟 | ¥{:.2} | {}",
        order.order_id,
        or_dash(&order.location),
        or_dash(&order.status),
        order.duration,
        order.cost,
        or_dash(order.payment_method_label()),
    );
    if order.can_stop_billing() {
        line.push_str(" | 可结束计费");
    }
    line
}

/// One-line summary of a ranked store.
pub fn store_line(ranked: &RankedStore) -> String {
    format!(
        "{} | {} | {} | {:.2}km",
        ranked.store.name,
        or_dash(&ranked.store.address),
        or_dash(&ranked.store.status),
        ranked.distance,
    )
}

pub fn write_orders<W: Write>(
    w: &mut W,
    format: OutputFormat,
    phone: &str,
    orders: &[&Order],
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(
            w,
            &OrdersOutput {
                phone,
                count: orders.len(),
                orders,
            },
        ),
        OutputFormat::Text => {
            if orders.is_empty() {
                return writeln!(w, "未找到手机号 {phone} 对应的订单信息。");
            }
            writeln!(w, "找到 {} 个订单 (手机号 {phone})", orders.len())?;
            for (index, order) in orders.iter().enumerate() {
                writeln!(w, "{:>3}. {}", index + 1, order_line(order))?;
            }
            Ok(())
        }
    }
}

pub fn write_stores<W: Write>(
    w: &mut W,
    format: OutputFormat,
    (latitude, longitude): (f64, f64),
    limit: usize,
    stores: &[RankedStore],
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(
            w,
            &StoresOutput {
                latitude,
                longitude,
                limit,
                count: stores.len(),
                stores,
            },
        ),
        OutputFormat::Text => {
            if stores.is_empty() {
                return writeln!(w, "未找到附近的网点。");
            }
            writeln!(
                w,
                "距离 ({latitude}, {longitude}) 最近的 {} 个网点:",
                stores.len()
            )?;
            for (index, ranked) in stores.iter().enumerate() {
                writeln!(w, "{:>3}. {}", index + 1, store_line(ranked))?;
            }
            Ok(())
        }
    }
}

pub fn write_check<W: Write>(
    w: &mut W,
    format: OutputFormat,
    report: &CheckReport,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(w, report);
    }

    for (label, dataset) in [("stores", &report.stores), ("orders", &report.orders)] {
        writeln!(w, "{label}: {} records from {}", dataset.records, dataset.source)?;
        if dataset.defaulted_fields > 0 {
            writeln!(w, "  {} fields defaulted", dataset.defaulted_fields)?;
        }
        for record in &dataset.first_records {
            writeln!(w, "  - {record}")?;
        }
    }

    writeln!(w, "distinct phones: {}", report.distinct_phones)?;
    if !report.first_phones.is_empty() {
        writeln!(w, "  {}", report.first_phones.join(", "))?;
    }

    for sample in &report.phone_samples {
        writeln!(w, "orders for {}: {}", sample.phone, sample.orders.len())?;
        for order in &sample.orders {
            writeln!(w, "  - {order}")?;
        }
    }

    let (latitude, longitude) = report.nearby_origin;
    writeln!(w, "nearest stores to ({latitude}, {longitude}):")?;
    for store in &report.nearby_sample {
        writeln!(w, "  - {store}")?;
    }

    if !report.problems.is_empty() {
        writeln!(w, "problems:")?;
        for problem in &report.problems {
            writeln!(w, "  ! {problem}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentdesk_lib::{DataSources, Datastore};

    fn datastore() -> Datastore {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../docs/fixtures");
        Datastore::load(&DataSources::in_dir(dir))
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_order_line_marks_stoppable_orders() {
        let datastore = datastore();
        let orders = datastore.orders_by_phone("17796025359");
        let line = order_line(orders[0]);
        assert!(line.starts_with("PO202508281731220067 | 北京三里屯太古里-34分店 | 进行中"));
        assert!(line.contains("微信支付"));
        assert!(line.ends_with("可结束计费"));
        assert!(!order_line(orders[1]).contains("可结束计费"));
    }

    #[test]
    fn test_write_orders_empty_text() {
        let out = render(|w| write_orders(w, OutputFormat::Text, "13900000000", &[]));
        assert_eq!(out, "未找到手机号 13900000000 对应的订单信息。\n");
    }

    #[test]
    fn test_write_orders_json_shape() {
        let datastore = datastore();
        let orders = datastore.orders_by_phone("17796025359");
        let out = render(|w| write_orders(w, OutputFormat::Json, "17796025359", &orders));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["orders"][1]["orderId"], "PO202508291022150011");
    }

    #[test]
    fn test_write_stores_text_distance() {
        let datastore = datastore();
        let stores = datastore.stores_by_location(31.24, 121.49, 1);
        let out = render(|w| write_stores(w, OutputFormat::Text, (31.24, 121.49), 1, &stores));
        assert!(out.contains("  1. 上海外滩-150分店 |"));
        assert!(out.trim_end().ends_with("km"));
    }
}
