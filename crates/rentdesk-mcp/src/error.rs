//! Error types for the MCP server.
//!
//! Two layers of failure exist. [`Error`] is a protocol-level JSON-RPC error
//! object (unknown method, bad params). [`ToolError`] is raised while running
//! a tool; it is rendered into the tool result with `isError: true` rather
//! than failing the JSON-RPC call.

use rentdesk_lib::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Result type for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC 2.0 error object
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[error("{message}")]
pub struct Error {
    /// JSON-RPC error code (e.g., -32601)
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// Additional error detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Error {
    /// Create a new error with a code and message
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach detail information
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn parse_error(reason: impl Into<String>) -> Self {
        Self::new(PARSE_ERROR, "Parse error").with_data(reason.into())
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, "Invalid Request").with_data(reason.into())
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Unknown method: {method}"))
    }

    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, "Invalid params").with_data(reason.into())
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, "Internal error").with_data(reason.into())
    }

    /// Error object as it appears in a JSON-RPC response
    pub fn to_value(&self) -> Value {
        match &self.data {
            Some(data) => json!({"code": self.code, "message": self.message, "data": data}),
            None => json!({"code": self.code, "message": self.message}),
        }
    }
}

/// Failure while executing a tool
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ToolError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("未知工具: {0}")]
    UnknownTool(String),

    #[error("参数格式错误: {0}")]
    InvalidArguments(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(METHOD_NOT_FOUND, "nope");
        assert_eq!(err.code, -32601);
        assert_eq!(err.message, "nope");
        assert!(err.data.is_none());
    }

    #[test]
    fn test_method_not_found_names_method() {
        let err = Error::method_not_found("tools/explode");
        assert_eq!(err.code, METHOD_NOT_FOUND);
        assert!(err.message.contains("tools/explode"));
    }

    #[test]
    fn test_error_value_includes_data() {
        let value = Error::invalid_params("Missing tool name").to_value();
        assert_eq!(value["code"], -32602);
        assert_eq!(value["message"], "Invalid params");
        assert_eq!(value["data"], "Missing tool name");
    }

    #[test]
    fn test_error_value_omits_missing_data() {
        let value = Error::new(INTERNAL_ERROR, "boom").to_value();
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_tool_error_messages() {
        assert_eq!(
            ToolError::UnknownTool("delete_order".into()).to_string(),
            "未知工具: delete_order"
        );
        assert_eq!(
            ToolError::from(ValidationError::InvalidPhone).to_string(),
            "手机号格式不正确"
        );
    }
}
