//! JSON-RPC over HTTP.
//!
//! `/mcp` accepts any envelope the dispatcher understands. The fixed-method
//! endpoints (`/mcp/initialize`, `/tools/list`, `/tools/call`) take a loose
//! body: `id` defaults to 1 and `tools/call` accepts its arguments either
//! under `params` or at the top level.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use tracing::debug;

use rentdesk_mcp::error::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};
use rentdesk_mcp::{Error, JsonRpcRequest, JsonRpcResponse};
use rentdesk_service_shared::{record_tool_call, AppState};

/// HTTP status for a JSON-RPC response body.
fn status_for(response: &JsonRpcResponse) -> StatusCode {
    let code = response
        .error
        .as_ref()
        .and_then(|e| e.get("code"))
        .and_then(Value::as_i64);

    match code {
        None => StatusCode::OK,
        Some(c) if c == i64::from(PARSE_ERROR) => StatusCode::BAD_REQUEST,
        Some(c) if c == i64::from(INVALID_REQUEST) => StatusCode::BAD_REQUEST,
        Some(c) if c == i64::from(INVALID_PARAMS) => StatusCode::BAD_REQUEST,
        Some(c) if c == i64::from(METHOD_NOT_FOUND) => StatusCode::NOT_FOUND,
        Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond(response: Option<JsonRpcResponse>) -> Response {
    match response {
        Some(response) => (status_for(&response), Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Parse a request body. An empty body is treated as `{}`.
fn parse_body(body: &Bytes) -> Result<Value, Box<Response>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body).map_err(|err| {
        let response = JsonRpcResponse::error(Value::Null, &Error::parse_error(err.to_string()));
        Box::new(respond(Some(response)))
    })
}

fn id_or_default(body: &Value) -> Value {
    match body.get("id") {
        None | Some(Value::Null) => json!(1),
        Some(id) => id.clone(),
    }
}

fn record_if_tool_call(method: &str, params: Option<&Value>, response: &JsonRpcResponse) {
    if method != "tools/call" {
        return;
    }
    let Some(name) = params.and_then(|p| p.get("name")).and_then(Value::as_str) else {
        return;
    };
    let is_error = response.is_error()
        || response
            .result
            .as_ref()
            .and_then(|r| r.get("isError"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
    record_tool_call(name, is_error, "http");
}

fn dispatch_fixed(
    state: &AppState,
    method: &str,
    body: Bytes,
    params: impl FnOnce(&Value) -> Option<Value>,
) -> Response {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(response) => return *response,
    };

    let params = params(&body);
    let request = JsonRpcRequest::new(id_or_default(&body), method, params.clone());
    let response = state.mcp().handle_request(request);
    if let Some(response) = &response {
        record_if_tool_call(method, params.as_ref(), response);
    }
    respond(response)
}

/// Handle POST /mcp/initialize.
pub async fn initialize(State(state): State<AppState>, body: Bytes) -> Response {
    dispatch_fixed(&state, "initialize", body, |body| body.get("params").cloned())
}

/// Handle POST /tools/list.
pub async fn tools_list(State(state): State<AppState>, body: Bytes) -> Response {
    dispatch_fixed(&state, "tools/list", body, |_| None)
}

/// Handle POST /tools/call.
pub async fn tools_call(State(state): State<AppState>, body: Bytes) -> Response {
    dispatch_fixed(&state, "tools/call", body, |body| {
        if let Some(params) = body.get("params").filter(|p| p.is_object()) {
            return Some(params.clone());
        }
        let mut params = Map::new();
        for key in ["name", "arguments"] {
            if let Some(value) = body.get(key) {
                params.insert(key.to_string(), value.clone());
            }
        }
        Some(Value::Object(params))
    })
}

/// Handle POST /mcp with a full JSON-RPC envelope.
pub async fn mcp(State(state): State<AppState>, body: Bytes) -> Response {
    let message = match parse_body(&body) {
        Ok(message) => message,
        Err(response) => return *response,
    };

    let method = message
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let params = message.get("params").cloned();
    debug!(method = %method, "json-rpc over http");

    let response = state.mcp().handle_value(message);
    if let Some(response) = &response {
        record_if_tool_call(&method, params.as_ref(), response);
    }
    respond(response)
}
