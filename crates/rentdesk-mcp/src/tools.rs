//! MCP tool implementations for order and store lookups
//!
//! This module defines the two tools exposed by the MCP server:
//! - query_order: Orders placed with a phone number
//! - query_stores: Stores nearest to a coordinate
//!
//! Tools validate their arguments before touching the [`Datastore`] and render
//! results as plain Chinese text blocks. Every successful lookup records its
//! result size in the [`ORDERS_RETURNED`] or [`STORES_RETURNED`] histogram,
//! whichever transport carried the call.

use rentdesk_lib::validation::{validate_coordinates, validate_limit, validate_phone};
use rentdesk_lib::{Datastore, Order, RankedStore, ValidationError};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ToolError;
use crate::types::*;

pub const QUERY_ORDER: &str = "query_order";
pub const QUERY_STORES: &str = "query_stores";

/// Histogram of orders returned per phone lookup.
pub const ORDERS_RETURNED: &str = "rentdesk_orders_returned";
/// Histogram of stores returned per nearby lookup.
pub const STORES_RETURNED: &str = "rentdesk_stores_returned";

/// Names of every tool, in advertised order
pub const TOOL_NAMES: [&str; 2] = [QUERY_ORDER, QUERY_STORES];

/// Descriptors returned by tools/list
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: QUERY_ORDER.to_string(),
            description: "根据手机号查询订单详情".to_string(),
            input_schema: query_order_schema(),
        },
        ToolDescriptor {
            name: QUERY_STORES.to_string(),
            description: "根据经纬度查询附近网点信息".to_string(),
            input_schema: query_stores_schema(),
        },
    ]
}

/// Run the named tool, returning rejections as [`ToolError`].
pub fn try_call_tool(
    datastore: &Datastore,
    name: &str,
    arguments: &Value,
) -> Result<ToolResult, ToolError> {
    match name {
        QUERY_ORDER => {
            QueryOrderTool::parse(arguments).map(|input| QueryOrderTool::execute(datastore, &input))
        }
        QUERY_STORES => QueryStoresTool::parse(arguments)
            .and_then(|input| QueryStoresTool::execute(datastore, &input)),
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

/// Run the named tool. Failures are rendered as an error result, never raised.
pub fn call_tool(datastore: &Datastore, name: &str, arguments: &Value) -> ToolResult {
    match try_call_tool(datastore, name, arguments) {
        Ok(result) => result,
        Err(err) => {
            info!(tool = name, error = %err, "tool call rejected");
            ToolResult::error(err)
        }
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn deserialize_arguments<T: serde::de::DeserializeOwned>(
    arguments: &Value,
) -> Result<T, ToolError> {
    serde_json::from_value(arguments.clone())
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Order lookup tool handler
pub struct QueryOrderTool;

impl QueryOrderTool {
    /// Extract and validate the phone argument.
    pub fn parse(arguments: &Value) -> Result<QueryOrderInput, ToolError> {
        let phone = arguments.get("phone");
        if is_absent(phone) || phone.and_then(Value::as_str) == Some("") {
            return Err(ValidationError::MissingPhone.into());
        }

        let input: QueryOrderInput = deserialize_arguments(arguments)?;
        validate_phone(&input.phone)?;
        Ok(input)
    }

    /// Look up the orders for a validated phone number.
    pub fn execute(datastore: &Datastore, input: &QueryOrderInput) -> ToolResult {
        let orders = datastore.orders_by_phone(&input.phone);
        metrics::histogram!(ORDERS_RETURNED).record(orders.len() as f64);
        debug!(matches = orders.len(), "query_order");

        if orders.is_empty() {
            return ToolResult::success(format!("未找到手机号 {} 对应的订单信息。", input.phone));
        }

        let blocks: Vec<String> = orders
            .iter()
            .enumerate()
            .map(|(i, order)| render_block("订单", i + 1, &order_fields(order)))
            .collect();

        ToolResult::success(format!(
            "找到 {} 个订单：\n\n{}",
            orders.len(),
            blocks.join("\n\n")
        ))
    }
}

/// Nearby store lookup tool handler
pub struct QueryStoresTool;

impl QueryStoresTool {
    /// Extract the coordinate arguments and check their presence and type.
    pub fn parse(arguments: &Value) -> Result<QueryStoresInput, ToolError> {
        if is_absent(arguments.get("latitude")) || is_absent(arguments.get("longitude")) {
            return Err(ValidationError::MissingCoordinates.into());
        }
        deserialize_arguments(arguments)
    }

    /// Validate ranges and rank stores around the requested point.
    pub fn execute(
        datastore: &Datastore,
        input: &QueryStoresInput,
    ) -> Result<ToolResult, ToolError> {
        validate_coordinates(input.latitude, input.longitude)?;
        let limit = validate_limit(input.limit)?;

        let stores = datastore.stores_by_location(input.latitude, input.longitude, limit);
        metrics::histogram!(STORES_RETURNED).record(stores.len() as f64);
        debug!(returned = stores.len(), limit, "query_stores");

        if stores.is_empty() {
            return Ok(ToolResult::success(format!(
                "在坐标 ({}, {}) 附近未找到任何网点。",
                input.latitude, input.longitude
            )));
        }

        let blocks: Vec<String> = stores
            .iter()
            .enumerate()
            .map(|(i, ranked)| render_block("网点", i + 1, &store_fields(ranked)))
            .collect();

        Ok(ToolResult::success(format!(
            "找到 {} 个附近网点：\n\n{}",
            stores.len(),
            blocks.join("\n\n")
        )))
    }
}

fn order_fields(order: &Order) -> Vec<(&'static str, String)> {
    let duration = if order.duration != 0 {
        format!("{}分钟", order.duration)
    } else {
        "未计算".to_string()
    };
    let cost = if order.cost != 0.0 {
        format!("¥{}", order.cost)
    } else {
        "未计费".to_string()
    };

    vec![
        ("手机号", order.phone.clone()),
        ("订单号", order.order_id.clone()),
        ("租借位置", order.location.clone()),
        ("租借状态", order.status.clone()),
        (
            "是否允许停止计费",
            if order.can_stop_billing() { "是" } else { "否" }.to_string(),
        ),
        ("设备ID", order.device_id.clone()),
        ("租借开始时间", order.start_time.clone()),
        ("持续时间", duration),
        ("计费", cost),
        ("支付方式", order.payment_method_label().to_string()),
    ]
}

fn store_fields(ranked: &RankedStore) -> Vec<(&'static str, String)> {
    let store = &ranked.store;
    vec![
        ("网点名称", store.name.clone()),
        ("状态", store.status.clone()),
        ("经纬度", format!("{},{}", store.longitude, store.latitude)),
        ("详细地址", store.address.clone()),
        ("距离", format!("{:.2}公里", ranked.distance)),
        ("营业时间", store.business_hours.clone()),
        ("评分", store.rating.to_string()),
        ("联系电话", store.phone.clone()),
        ("门店类型", store.store_type.clone()),
    ]
}

fn render_block(label: &str, index: usize, fields: &[(&'static str, String)]) -> String {
    let mut block = format!("{label} {index}:");
    for (key, value) in fields {
        block.push_str(&format!("\n  {key}: {value}"));
    }
    block
}
