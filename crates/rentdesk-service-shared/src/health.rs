//! Health check handlers.
//!
//! Provides `/health` (summary with dataset counts and uptime) plus the
//! `/health/live` and `/health/ready` probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Number of stores loaded (for readiness check).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stores_loaded: Option<usize>,

    /// Number of orders loaded (for readiness check).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders_loaded: Option<usize>,

    /// Whether any dataset is served from the built-in fixtures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures_in_use: Option<bool>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            stores_loaded: None,
            orders_loaded: None,
            fixtures_in_use: None,
        }
    }

    /// Create a ready status with dataset information.
    pub fn ready(
        service: &str,
        version: &str,
        stores: usize,
        orders: usize,
        fixtures: bool,
    ) -> Self {
        Self {
            status: "ok".to_string(),
            stores_loaded: Some(stores),
            orders_loaded: Some(orders),
            fixtures_in_use: Some(fixtures),
            ..Self::alive(service, version)
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            ..Self::alive(service, version)
        }
    }
}

/// Dataset counts reported by `/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCounts {
    pub data_manager: String,
    pub stores: usize,
    pub orders: usize,
}

/// Response body of `/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSummary {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub services: ServiceCounts,
    /// Seconds since the service started.
    pub uptime: f64,
}

/// Summary health handler.
///
/// ```text
/// GET /health
/// {"status":"healthy","timestamp":"...","version":"0.1.0","services":{"dataManager":"ready","stores":6,"orders":5},"uptime":12.5}
/// ```
pub async fn health_summary(State(state): State<AppState>) -> Json<HealthSummary> {
    let datastore = state.datastore();
    Json(HealthSummary {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services: ServiceCounts {
            data_manager: "ready".to_string(),
            stores: datastore.stores().len(),
            orders: datastore.orders().len(),
        },
        uptime: state.uptime().as_secs_f64(),
    })
}

/// Liveness probe handler.
///
/// Returns 200 OK if the service is running. This is a simple check that does
/// not depend on the loaded data.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 503 when either the store or the order collection is empty.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let datastore = state.datastore();
    let stores = datastore.stores().len();
    let orders = datastore.orders().len();

    if stores == 0 || orders == 0 {
        let reason = if stores == 0 {
            "no stores loaded"
        } else {
            "no orders loaded"
        };
        let status = HealthStatus::not_ready(service, version, reason);
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let fixtures = datastore.report().used_fixtures();
    let status = HealthStatus::ready(service, version, stores, orders, fixtures);
    (StatusCode::OK, Json(status)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentdesk_lib::Datastore;

    #[test]
    fn test_health_status_alive() {
        let status = HealthStatus::alive("test-service", "1.0.0");
        assert_eq!(status.status, "ok");
        assert_eq!(status.service, "test-service");
        assert!(status.stores_loaded.is_none());
        assert!(status.orders_loaded.is_none());
    }

    #[test]
    fn test_health_status_ready() {
        let status = HealthStatus::ready("test-service", "1.0.0", 6, 5, true);
        assert_eq!(status.stores_loaded, Some(6));
        assert_eq!(status.orders_loaded, Some(5));
        assert_eq!(status.fixtures_in_use, Some(true));
    }

    #[test]
    fn test_health_status_not_ready() {
        let status = HealthStatus::not_ready("test-service", "1.0.0", "no stores loaded");
        assert!(status.status.starts_with("not_ready:"));
        assert!(status.status.contains("no stores"));
    }

    #[test]
    fn test_health_status_serialization_skips_counts() {
        let json = serde_json::to_string(&HealthStatus::alive("rentdesk", "0.1.0")).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(!json.contains("stores_loaded"));
    }

    #[tokio::test]
    async fn test_health_summary_counts() {
        let state = AppState::from_datastore(Datastore::from_fixtures());
        let Json(summary) = health_summary(State(state)).await;
        assert_eq!(summary.status, "healthy");
        assert_eq!(summary.services.stores, 6);
        assert_eq!(summary.services.orders, 5);
        assert!(summary.uptime >= 0.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["services"]["dataManager"], "ready");
    }

    #[tokio::test]
    async fn test_health_ready_unavailable_without_orders() {
        let store = rentdesk_lib::fixtures::sample_stores();
        let state = AppState::from_datastore(Datastore::from_parts(store, Vec::new()));
        let response = health_ready(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_ready_ok_with_fixtures() {
        let state = AppState::from_datastore(Datastore::from_fixtures());
        let response = health_ready(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
