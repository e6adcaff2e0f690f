//! Shared infrastructure for the rentdesk HTTP service.
//!
//! - [`AppState`]: Pre-loaded datastore and MCP dispatcher shared by all handlers
//! - `health`: Summary, liveness and readiness handlers
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`ServiceResponse`]: Wrapper for successful responses with content type
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request ID propagation and metrics middleware
//! - Request types with validation for the REST endpoints
//!
//! # Architecture
//!
//! Handlers stay thin; lookups live in `rentdesk-lib` and tool rendering in
//! `rentdesk-mcp`. This crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate parameters                                      │
//! │  - Call rentdesk-lib / rentdesk-mcp                         │
//! │  - Format response                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides a fixture-backed state for handler
//! testing. Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::{health_live, health_ready, health_summary, HealthStatus, HealthSummary};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_orders_returned, record_stores_returned,
    record_tool_call, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER};
pub use problem::{
    from_tool_error, from_validation_error, problem_response, ProblemDetails, ProblemKind,
    PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST, PROBLEM_NOT_FOUND, PROBLEM_UNKNOWN_TOOL,
};
pub use request::{NearbyStoresRequest, OrdersByPhoneRequest, Validate};
pub use response::{NearbyStoresResponse, OrdersByPhoneResponse, ServiceResponse};
pub use state::AppState;
