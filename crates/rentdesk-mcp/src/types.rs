//! Type definitions for MCP tool inputs, outputs and the JSON-RPC envelope
//!
//! Tool input types derive [`JsonSchema`]; the advertised schemas are
//! generated from them and then tightened with the bounds the tools enforce.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use rentdesk_lib::validation::PHONE_PATTERN;
use rentdesk_lib::{DEFAULT_STORE_LIMIT, MAX_STORE_LIMIT};

// ============================================================================
// TOOL INPUTS
// ============================================================================

/// Input for the query_order tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryOrderInput {
    /// 用户手机号
    pub phone: String,
}

/// Input for the query_stores tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryStoresInput {
    /// 纬度
    pub latitude: f64,

    /// 经度
    pub longitude: f64,

    /// 返回网点数量限制
    #[serde(default)]
    pub limit: Option<i64>,
}

// ============================================================================
// TOOL OUTPUTS
// ============================================================================

/// One content block of a tool result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Result of a tools/call invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: None,
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![ToolContent::text(format!("错误: {message}"))],
            is_error: Some(true),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Concatenated text of all content blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Entry in the tools/list response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

// ============================================================================
// SCHEMAS
// ============================================================================

/// Input schema advertised for query_order
pub fn query_order_schema() -> Value {
    let mut schema = schema_value::<QueryOrderInput>();
    patch_property(&mut schema, "phone", json!({ "pattern": PHONE_PATTERN }));
    schema
}

/// Input schema advertised for query_stores
pub fn query_stores_schema() -> Value {
    let mut schema = schema_value::<QueryStoresInput>();
    patch_property(
        &mut schema,
        "latitude",
        json!({ "type": "number", "minimum": -90, "maximum": 90 }),
    );
    patch_property(
        &mut schema,
        "longitude",
        json!({ "type": "number", "minimum": -180, "maximum": 180 }),
    );
    patch_property(
        &mut schema,
        "limit",
        json!({
            "type": "integer",
            "minimum": 1,
            "maximum": MAX_STORE_LIMIT,
            "default": DEFAULT_STORE_LIMIT,
        }),
    );
    schema
}

fn schema_value<T: JsonSchema>() -> Value {
    let mut value = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| json!({}));
    if let Some(object) = value.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
        object.entry("type").or_insert_with(|| json!("object"));
    }
    value
}

fn patch_property(schema: &mut Value, name: &str, patch: Value) {
    let Some(properties) = schema
        .as_object_mut()
        .map(|o| o.entry("properties").or_insert_with(|| json!({})))
        .and_then(Value::as_object_mut)
    else {
        return;
    };

    let property = properties
        .entry(name.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if let (Some(target), Value::Object(patch)) = (property.as_object_mut(), patch) {
        // Numeric bounds replace the generated format/nullable hints.
        target.remove("format");
        target.extend(patch);
    }
}

// ============================================================================
// JSON-RPC ENVELOPE
// ============================================================================

/// Incoming JSON-RPC request or notification
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,

    /// Absent for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outgoing JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl JsonRpcResponse {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, error: &crate::Error) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error.to_value()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_order_schema_requires_phone_with_pattern() {
        let schema = query_order_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["phone"]["type"], "string");
        assert_eq!(schema["properties"]["phone"]["pattern"], PHONE_PATTERN);
        assert_eq!(schema["properties"]["phone"]["description"], "用户手机号");
        assert_eq!(schema["required"], json!(["phone"]));
        assert!(schema.get("$schema").is_none());
    }

    #[test]
    fn test_query_stores_schema_bounds() {
        let schema = query_stores_schema();
        let props = &schema["properties"];
        assert_eq!(props["latitude"]["minimum"], -90);
        assert_eq!(props["latitude"]["maximum"], 90);
        assert_eq!(props["longitude"]["minimum"], -180);
        assert_eq!(props["longitude"]["maximum"], 180);
        assert_eq!(props["limit"]["type"], "integer");
        assert_eq!(props["limit"]["minimum"], 1);
        assert_eq!(props["limit"]["maximum"], 50);
        assert_eq!(props["limit"]["default"], 10);

        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("latitude")));
        assert!(required.contains(&json!("longitude")));
        assert!(!required.contains(&json!("limit")));
    }

    #[test]
    fn test_tool_result_error_shape() {
        let result = ToolResult::error("手机号格式不正确");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "错误: 手机号格式不正确");
    }

    #[test]
    fn test_tool_result_success_omits_is_error() {
        let value = serde_json::to_value(ToolResult::success("ok")).unwrap();
        assert!(value.get("isError").is_none());
    }

    #[test]
    fn test_request_without_id_is_notification() {
        let request: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
                .unwrap();
        assert!(request.is_notification());
    }
}
