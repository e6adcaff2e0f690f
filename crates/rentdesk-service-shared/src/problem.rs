//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Every REST failure is one of a small set of [`ProblemKind`]s; the kind
//! fixes the type URI, title and status, the occurrence adds the detail,
//! request ID and an optional machine-readable code.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use std::fmt;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use rentdesk_lib::ValidationError;
use rentdesk_mcp::ToolError;

pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";
pub const PROBLEM_UNKNOWN_TOOL: &str = "/problems/unknown-tool";
pub const PROBLEM_NOT_FOUND: &str = "/problems/not-found";
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// The problem types this service emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    InvalidRequest,
    UnknownTool,
    NotFound,
    Internal,
}

impl ProblemKind {
    pub fn type_uri(self) -> &'static str {
        match self {
            ProblemKind::InvalidRequest => PROBLEM_INVALID_REQUEST,
            ProblemKind::UnknownTool => PROBLEM_UNKNOWN_TOOL,
            ProblemKind::NotFound => PROBLEM_NOT_FOUND,
            ProblemKind::Internal => PROBLEM_INTERNAL_ERROR,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ProblemKind::InvalidRequest => "Invalid Request",
            ProblemKind::UnknownTool => "Unknown Tool",
            ProblemKind::NotFound => "Not Found",
            ProblemKind::Internal => "Internal Error",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ProblemKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ProblemKind::UnknownTool | ProblemKind::NotFound => StatusCode::NOT_FOUND,
            ProblemKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// RFC 9457 Problem Details body.
///
/// ```
/// use rentdesk_service_shared::{ProblemDetails, ProblemKind};
///
/// let problem = ProblemDetails::new(ProblemKind::InvalidRequest, "手机号格式不正确", "req-1")
///     .with_code("INVALID_PHONE");
/// assert_eq!(problem.status, 400);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Request ID of the failing request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Stable error code, e.g. `INVALID_PHONE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub content_type: String,
}

impl ProblemDetails {
    pub fn new(
        kind: ProblemKind,
        detail: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            type_uri: kind.type_uri().to_string(),
            title: kind.title().to_string(),
            status: kind.status().as_u16(),
            detail: Some(detail.into()),
            instance: Some(request_id.into()),
            code: None,
            content_type: PROBLEM_CONTENT_TYPE.to_string(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(ProblemKind::InvalidRequest, detail, request_id)
    }

    pub fn unknown_tool(name: &str, request_id: impl Into<String>) -> Self {
        Self::new(ProblemKind::UnknownTool, format!("未知工具: {name}"), request_id)
    }

    pub fn not_found(path: &str, request_id: impl Into<String>) -> Self {
        Self::new(ProblemKind::NotFound, format!("路径 {path} 不存在"), request_id)
    }

    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(ProblemKind::Internal, detail, request_id)
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {detail}", self.title),
            None => f.write_str(&self.title),
        }
    }
}

impl std::error::Error for ProblemDetails {}

/// Serve any serializable problem body with the problem's status and the
/// `application/problem+json` content type.
pub fn problem_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_CONTENT_TYPE));
    response
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        problem_response(self.status_code(), &self)
    }
}

/// Convert a request validation failure to a 400 problem.
pub fn from_validation_error(error: &ValidationError, request_id: &str) -> ProblemDetails {
    ProblemDetails::bad_request(error.to_string(), request_id).with_code(error.code())
}

/// Convert a tool failure to a problem.
pub fn from_tool_error(error: &ToolError, request_id: &str) -> ProblemDetails {
    match error {
        ToolError::Validation(validation) => from_validation_error(validation, request_id),
        ToolError::UnknownTool(name) => ProblemDetails::unknown_tool(name, request_id),
        ToolError::InvalidArguments(_) => ProblemDetails::bad_request(error.to_string(), request_id)
            .with_code("INVALID_ARGUMENTS"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_fixes_type_title_status() {
        let problem = ProblemDetails::new(ProblemKind::UnknownTool, "x", "req-0");
        assert_eq!(problem.type_uri, PROBLEM_UNKNOWN_TOOL);
        assert_eq!(problem.title, "Unknown Tool");
        assert_eq!(problem.status, 404);
        assert_eq!(problem.content_type, PROBLEM_CONTENT_TYPE);
    }

    #[test]
    fn test_bad_request_carries_request_id() {
        let problem = ProblemDetails::bad_request("Invalid JSON", "req-123");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.instance.as_deref(), Some("req-123"));
        assert_eq!(problem.to_string(), "Invalid Request: Invalid JSON");
    }

    #[test]
    fn test_serialized_field_names() {
        let problem = ProblemDetails::bad_request("Test error", "req-test").with_code("X");
        let value = serde_json::to_value(&problem).unwrap();

        assert_eq!(value["type"], "/problems/invalid-request");
        assert_eq!(value["status"], 400);
        assert_eq!(value["instance"], "req-test");
        assert_eq!(value["code"], "X");
        assert!(value.get("type_uri").is_none());
    }

    #[test]
    fn test_code_omitted_when_unset() {
        let value = serde_json::to_value(ProblemDetails::not_found("/x", "req-4")).unwrap();
        assert!(value.get("code").is_none());
        assert_eq!(value["detail"], "路径 /x 不存在");
    }

    #[test]
    fn test_from_validation_error() {
        let problem = from_validation_error(&ValidationError::LatitudeOutOfRange, "req-1");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.detail.as_deref(), Some("纬度必须在-90到90之间"));
        assert_eq!(problem.code.as_deref(), Some("LATITUDE_OUT_OF_RANGE"));
    }

    #[test]
    fn test_from_tool_error_unknown_tool() {
        let problem = from_tool_error(&ToolError::UnknownTool("drop_table".into()), "req-2");
        assert_eq!(problem.type_uri, PROBLEM_UNKNOWN_TOOL);
        assert_eq!(problem.status, 404);
        assert_eq!(problem.detail.as_deref(), Some("未知工具: drop_table"));
    }

    #[test]
    fn test_into_response_sets_problem_content_type() {
        let response = ProblemDetails::internal_error("boom", "req-3").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONTENT_TYPE], PROBLEM_CONTENT_TYPE);
    }
}
