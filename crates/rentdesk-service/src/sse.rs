//! Server-sent event stream announcing the MCP server.
//!
//! A client receives `connected`, `mcp-info` and `tools-available` once, then
//! a `heartbeat` event on every tick until it disconnects.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, Sse};
use futures::stream::{self, Stream, StreamExt};
use serde_json::{json, Value};
use tokio::time::{interval_at, Instant};

use rentdesk_mcp::server::{PROTOCOL_VERSION, SERVER_NAME};
use rentdesk_mcp::tools::TOOL_NAMES;
use rentdesk_service_shared::AppState;

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Events sent as soon as a client connects.
pub fn greeting_events() -> Vec<(&'static str, Value)> {
    vec![
        (
            "connected",
            json!({"status": "connected", "timestamp": now(), "server": SERVER_NAME}),
        ),
        (
            "mcp-info",
            json!({
                "protocol": "mcp",
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": true},
                "server": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            }),
        ),
        (
            "tools-available",
            json!({"tools": TOOL_NAMES, "count": TOOL_NAMES.len()}),
        ),
    ]
}

pub fn heartbeat_event(state: &AppState) -> (&'static str, Value) {
    (
        "heartbeat",
        json!({
            "timestamp": now(),
            "status": "alive",
            "uptime": state.uptime().as_secs_f64(),
        }),
    )
}

fn to_event((name, data): (&'static str, Value)) -> Result<Event, Infallible> {
    Ok(Event::default().event(name).data(data.to_string()))
}

/// Handle GET /sse.
pub async fn events(
    state: AppState,
    heartbeat: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::info!("sse client connected");

    let ticks = interval_at(Instant::now() + heartbeat, heartbeat);
    let heartbeats = stream::unfold((ticks, state), |(mut ticks, state)| async move {
        ticks.tick().await;
        let event = heartbeat_event(&state);
        Some((event, (ticks, state)))
    });

    Sse::new(stream::iter(greeting_events()).chain(heartbeats).map(to_event))
}
