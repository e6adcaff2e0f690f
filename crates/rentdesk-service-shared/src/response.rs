//! Response bodies for the REST endpoints.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use rentdesk_lib::{Order, RankedStore};

/// Wrapper for successful responses with content type metadata.
///
/// Mirrors the `content_type` member carried by `ProblemDetails`.
///
/// # Example
///
/// ```
/// use rentdesk_service_shared::{OrdersByPhoneResponse, ServiceResponse};
///
/// let body = OrdersByPhoneResponse::new("17798762697", Vec::new());
/// let response = ServiceResponse::new(body);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Orders placed with one phone number, in file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersByPhoneResponse {
    pub phone: String,
    pub count: usize,
    pub orders: Vec<Order>,
}

impl OrdersByPhoneResponse {
    pub fn new(phone: impl Into<String>, orders: Vec<Order>) -> Self {
        Self {
            phone: phone.into(),
            count: orders.len(),
            orders,
        }
    }
}

/// Stores nearest to a coordinate, closest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyStoresResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub limit: usize,
    pub count: usize,
    pub stores: Vec<RankedStore>,
}

impl NearbyStoresResponse {
    pub fn new(latitude: f64, longitude: f64, limit: usize, stores: Vec<RankedStore>) -> Self {
        Self {
            latitude,
            longitude,
            limit,
            count: stores.len(),
            stores,
        }
    }
}
