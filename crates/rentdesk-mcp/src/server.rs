//! MCP server state and JSON-RPC method dispatch
//!
//! [`McpServerState`] owns a shared handle to the loaded [`Datastore`] and
//! answers JSON-RPC requests independent of transport. The stdio loop and the
//! HTTP service both route requests through [`McpServerState::handle_request`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rentdesk_lib::{Datastore, LoadReport};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::resources::{DatasetInfoResource, DATASET_INFO_URI};
use crate::tools::{call_tool, tool_descriptors};
use crate::types::{JsonRpcRequest, JsonRpcResponse};
use crate::Error;

/// Protocol revision announced during initialize
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name announced during initialize
pub const SERVER_NAME: &str = "rentdesk";

/// Main server state holding all runtime resources
///
/// Cheap to clone; the datastore is shared behind an [`Arc`] and never
/// mutated after load.
#[derive(Debug, Clone)]
pub struct McpServerState {
    datastore: Arc<Datastore>,

    /// Server initialization timestamp for metadata
    pub initialized_at: DateTime<Utc>,
}

/// Metadata about the loaded dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetInfo {
    pub store_count: usize,
    pub order_count: usize,
    pub load_report: LoadReport,
    pub loaded_at: String,
}

/// Descriptor for MCP resources exposed by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

impl McpServerState {
    /// Create server state around an already loaded datastore.
    pub fn new(datastore: Arc<Datastore>) -> Self {
        let report = datastore.report();
        info!(
            stores = datastore.stores().len(),
            orders = datastore.orders().len(),
            fixtures = report.used_fixtures(),
            "MCP server state ready"
        );

        Self {
            datastore,
            initialized_at: Utc::now(),
        }
    }

    pub fn datastore(&self) -> &Datastore {
        &self.datastore
    }

    /// Get dataset metadata for the rentdesk://dataset/info resource
    pub fn dataset_info(&self) -> DatasetInfo {
        DatasetInfo {
            store_count: self.datastore.stores().len(),
            order_count: self.datastore.orders().len(),
            load_report: self.datastore.report().clone(),
            loaded_at: self.initialized_at.to_rfc3339(),
        }
    }

    /// List MCP resources exposed by this server
    pub fn resources(&self) -> Vec<ResourceDescriptor> {
        vec![ResourceDescriptor {
            uri: DATASET_INFO_URI.to_string(),
            name: "Dataset Info".to_string(),
            description: "Store and order counts and where each dataset was loaded from"
                .to_string(),
            mime_type: "application/json".to_string(),
        }]
    }

    /// Result payload of the initialize method
    pub fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
            "capabilities": {"tools": {}, "resources": {}}
        })
    }

    /// Dispatch one request. Notifications produce no response.
    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "dispatching request");

        let outcome = self.dispatch(&request.method, request.params.as_ref());

        let id = match request.id {
            Some(id) => id,
            None => {
                if let Err(err) = outcome {
                    debug!(method = %request.method, error = %err, "notification failed");
                }
                return None;
            }
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::result(id, result),
            Err(err) => JsonRpcResponse::error(id, &err),
        })
    }

    /// Dispatch a raw JSON message, validating the envelope first.
    pub fn handle_value(&self, message: Value) -> Option<JsonRpcResponse> {
        let id = message.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) => self.handle_request(request),
            Err(err) => {
                warn!(error = %err, "invalid JSON-RPC request");
                Some(JsonRpcResponse::error(
                    id.unwrap_or(Value::Null),
                    &Error::invalid_request(err.to_string()),
                ))
            }
        }
    }

    fn dispatch(&self, method: &str, params: Option<&Value>) -> crate::Result<Value> {
        match method {
            "initialize" => Ok(self.initialize_result()),
            "ping" => Ok(json!({})),
            "notifications/initialized" | "initialized" => Ok(Value::Null),
            "tools/list" => Ok(json!({ "tools": tool_descriptors() })),
            "tools/call" => self.call_tool(params),
            "resources/list" => Ok(json!({ "resources": self.resources() })),
            "resources/read" => self.read_resource(params),
            other => Err(Error::method_not_found(other)),
        }
    }

    fn call_tool(&self, params: Option<&Value>) -> crate::Result<Value> {
        let name = params
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::invalid_params("Missing tool name"))?;
        let arguments = params
            .and_then(|p| p.get("arguments"))
            .cloned()
            .unwrap_or_else(|| json!({}));

        let result = call_tool(&self.datastore, name, &arguments);
        serde_json::to_value(result).map_err(|e| Error::internal(e.to_string()))
    }

    fn read_resource(&self, params: Option<&Value>) -> crate::Result<Value> {
        let uri = params
            .and_then(|p| p.get("uri"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_params("Missing resource uri"))?;

        let text = match uri {
            DATASET_INFO_URI => DatasetInfoResource::read(self)?,
            other => {
                return Err(Error::invalid_params(format!("Unknown resource: {other}")));
            }
        };

        Ok(json!({
            "contents": [{"uri": uri, "mimeType": "application/json", "text": text}]
        }))
    }
}
