//! Request types and validation for the REST endpoints.

use serde::{Deserialize, Serialize};

use rentdesk_lib::validation::{validate_coordinates, validate_limit, validate_phone};
use rentdesk_lib::{ValidationError, DEFAULT_STORE_LIMIT};

use crate::problem::from_validation_error;
use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`. Boxed to keep the `Err` variant small.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

fn reject(error: ValidationError, request_id: &str) -> Box<ProblemDetails> {
    Box::new(from_validation_error(&error, request_id))
}

/// Request for the orders placed with a phone number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersByPhoneRequest {
    /// Eleven-digit mainland mobile number.
    #[serde(default)]
    pub phone: String,
}

impl Validate for OrdersByPhoneRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        validate_phone(&self.phone).map_err(|e| reject(e, request_id))
    }
}

/// Request for the stores nearest to a coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyStoresRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Number of stores to return, 1 to 50 (default 10).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl NearbyStoresRequest {
    /// Limit to apply once the request has passed validation.
    pub fn effective_limit(&self) -> usize {
        validate_limit(self.limit).unwrap_or(DEFAULT_STORE_LIMIT)
    }
}

impl Validate for NearbyStoresRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return Err(reject(ValidationError::MissingCoordinates, request_id));
        };
        validate_coordinates(latitude, longitude).map_err(|e| reject(e, request_id))?;
        validate_limit(self.limit).map_err(|e| reject(e, request_id))?;
        Ok(())
    }
}
