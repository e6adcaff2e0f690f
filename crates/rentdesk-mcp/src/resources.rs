//! MCP resource implementations
//!
//! One resource is exposed:
//! - rentdesk://dataset/info: store/order counts and load provenance

use crate::server::McpServerState;
use crate::Result;

pub const DATASET_INFO_URI: &str = "rentdesk://dataset/info";

/// Dataset information resource
pub struct DatasetInfoResource;

impl DatasetInfoResource {
    /// Handle a dataset info resource read
    pub fn read(state: &McpServerState) -> Result<String> {
        let info = state.dataset_info();
        serde_json::to_string(&info).map_err(|e| crate::Error::internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentdesk_lib::Datastore;
    use std::sync::Arc;

    #[test]
    fn test_dataset_info_resource() {
        let state = McpServerState::new(Arc::new(Datastore::from_fixtures()));
        let json = DatasetInfoResource::read(&state).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["store_count"], 6);
        assert_eq!(value["order_count"], 5);
        assert_eq!(value["load_report"]["stores"]["source"]["source"], "fixture");
        assert!(value["loaded_at"].is_string());
    }
}
