//! rentdesk HTTP service.
//!
//! Serves the order and store lookups over HTTP in three shapes: JSON-RPC
//! envelopes for MCP clients, direct tool invocation, and a typed REST API.
//!
//! # Endpoints
//!
//! - `GET /` - Server description
//! - `GET /health`, `GET /health/live`, `GET /health/ready` - Health and probes
//! - `GET /metrics` - Prometheus exposition (when enabled)
//! - `GET /sse` - MCP announcement event stream with heartbeats
//! - `POST /mcp`, `POST /mcp/initialize`, `POST /tools/list`, `POST /tools/call` - JSON-RPC
//! - `POST /query_order`, `POST /query_stores` - Direct tool invocation
//! - `POST /api/v1/orders/by-phone`, `POST /api/v1/stores/nearby` - REST lookups
//!
//! # Configuration
//!
//! - `RENTDESK_DATA_DIR` - Directory holding `stores.csv` and `orders.csv`
//! - `SERVICE_HOST`, `SERVICE_PORT` - Bind address (default `0.0.0.0:3000`)
//! - `SSE_HEARTBEAT_SECS` - Heartbeat interval (default 30)
//! - `LOG_FORMAT`, `RUST_LOG`, `SERVICE_NAME` - Logging
//! - `METRICS_ENABLED`, `METRICS_PATH` - Metrics endpoint

pub mod config;
mod jsonrpc;
mod rest;
mod sse;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use rentdesk_mcp::tools::TOOL_NAMES;
use rentdesk_service_shared::{
    extract_or_generate_request_id, health_live, health_ready, health_summary, metrics_handler,
    problem_response, AppState, MetricsLayer, ProblemDetails,
};

pub use config::ServiceConfig;

/// Endpoints advertised by `/` and the 404 fallback.
pub const ENDPOINTS: [&str; 14] = [
    "GET /",
    "GET /health",
    "GET /health/live",
    "GET /health/ready",
    "GET /metrics",
    "GET /sse",
    "POST /mcp",
    "POST /mcp/initialize",
    "POST /tools/list",
    "POST /tools/call",
    "POST /query_order",
    "POST /query_stores",
    "POST /api/v1/orders/by-phone",
    "POST /api/v1/stores/nearby",
];

/// Build the service router.
pub fn router(state: AppState, config: &ServiceConfig) -> Router {
    let heartbeat = config.heartbeat;

    let mut app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_summary))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .route(
            "/sse",
            get(move |State(state): State<AppState>| sse::events(state, heartbeat)),
        )
        .route("/mcp", post(jsonrpc::mcp))
        .route("/mcp/initialize", post(jsonrpc::initialize))
        .route("/tools/list", post(jsonrpc::tools_list))
        .route("/tools/call", post(jsonrpc::tools_call))
        .route("/query_order", post(rest::query_order))
        .route("/query_stores", post(rest::query_stores))
        .route("/api/v1/orders/by-phone", post(rest::orders_by_phone))
        .route("/api/v1/stores/nearby", post(rest::nearby_stores));

    if config.metrics.enabled {
        app = app.route(&config.metrics.path, get(metrics_handler));
    }

    app.fallback(not_found)
        .layer(MetricsLayer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handle GET / with a description of the server.
async fn root(State(state): State<AppState>) -> Json<Value> {
    let datastore = state.datastore();
    Json(json!({
        "name": "rentdesk",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "订单查询和网点查询 MCP 服务",
        "protocol": "mcp",
        "capabilities": {"tools": true, "sse": true},
        "endpoints": ENDPOINTS,
        "tools": TOOL_NAMES,
        "sse_events": ["connected", "mcp-info", "tools-available", "heartbeat"],
        "data": {
            "stores": datastore.stores().len(),
            "orders": datastore.orders().len(),
            "fixtures": datastore.report().used_fixtures(),
        },
    }))
}

#[derive(Debug, Serialize)]
struct NotFound {
    #[serde(flatten)]
    problem: ProblemDetails,
    available_endpoints: &'static [&'static str],
}

async fn not_found(uri: Uri, headers: HeaderMap) -> Response {
    let request_id = extract_or_generate_request_id(&headers);
    let body = NotFound {
        problem: ProblemDetails::not_found(uri.path(), request_id.as_str()),
        available_endpoints: &ENDPOINTS,
    };
    problem_response(StatusCode::NOT_FOUND, &body)
}
