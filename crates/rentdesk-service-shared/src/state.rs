//! Application state for the HTTP service.
//!
//! This module provides the shared state structure that axum handlers use to
//! access the loaded datastore and the MCP dispatcher.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rentdesk_lib::{DataSources, Datastore};
use rentdesk_mcp::McpServerState;

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor. The datastore is fully loaded before
/// the state exists and is never mutated afterwards.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use rentdesk_lib::DataSources;
/// use rentdesk_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let stores = state.datastore().stores();
///     // ... use stores
/// }
///
/// let state = AppState::load(&DataSources::resolve(None));
/// let app = Router::new()
///     .route("/stores", get(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    mcp: McpServerState,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Load application state from the resolved data files.
    ///
    /// Never fails: datasets that cannot be read are replaced by the built-in
    /// fixtures and reported as such.
    pub fn load(sources: &DataSources) -> Self {
        tracing::info!(
            stores = %sources.stores.display(),
            orders = %sources.orders.display(),
            "loading datasets"
        );
        let datastore = Datastore::load(sources);
        Self::from_datastore(datastore)
    }

    /// Create application state from a pre-loaded datastore.
    ///
    /// This is useful for testing.
    pub fn from_datastore(datastore: Datastore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                mcp: McpServerState::new(Arc::new(datastore)),
                started: Instant::now(),
                started_at: Utc::now(),
            }),
        }
    }

    /// Access the loaded datastore.
    pub fn datastore(&self) -> &Datastore {
        self.inner.mcp.datastore()
    }

    /// Access the JSON-RPC dispatcher.
    pub fn mcp(&self) -> &McpServerState {
        &self.inner.mcp
    }

    /// Time since the state was created.
    pub fn uptime(&self) -> Duration {
        self.inner.started.elapsed()
    }

    /// Wall-clock time the state was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.inner.started_at
    }

    /// True when both collections hold at least one record.
    pub fn is_ready(&self) -> bool {
        let datastore = self.datastore();
        !datastore.stores().is_empty() && !datastore.orders().is_empty()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let datastore = self.datastore();
        f.debug_struct("AppState")
            .field("store_count", &datastore.stores().len())
            .field("order_count", &datastore.orders().len())
            .field("fixtures", &datastore.report().used_fixtures())
            .finish()
    }
}
