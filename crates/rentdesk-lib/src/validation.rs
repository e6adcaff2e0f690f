//! Request validation shared by the front ends.
//!
//! [`crate::Datastore`] never validates its inputs; adapters call these checks
//! before querying so a rejected request never reaches the engine.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Mainland China mobile number: 11 digits starting with 13-19.
pub const PHONE_PATTERN: &str = r"^1[3-9]\d{9}$";

/// Stores returned when a request does not name a limit.
pub const DEFAULT_STORE_LIMIT: usize = 10;

/// Largest accepted store limit.
pub const MAX_STORE_LIMIT: usize = 50;

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"));

/// A rejected request. Display strings are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("手机号参数不能为空")]
    MissingPhone,

    #[error("手机号格式不正确")]
    InvalidPhone,

    #[error("经纬度参数不能为空")]
    MissingCoordinates,

    #[error("纬度必须在-90到90之间")]
    LatitudeOutOfRange,

    #[error("经度必须在-180到180之间")]
    LongitudeOutOfRange,

    #[error("返回数量必须在1到{max}之间")]
    LimitOutOfRange { max: usize },
}

impl ValidationError {
    /// Stable machine-readable identifier for structured error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingPhone => "MISSING_PHONE",
            ValidationError::InvalidPhone => "INVALID_PHONE",
            ValidationError::MissingCoordinates => "MISSING_COORDINATES",
            ValidationError::LatitudeOutOfRange => "LATITUDE_OUT_OF_RANGE",
            ValidationError::LongitudeOutOfRange => "LONGITUDE_OUT_OF_RANGE",
            ValidationError::LimitOutOfRange { .. } => "LIMIT_OUT_OF_RANGE",
        }
    }
}

/// True when `phone` matches [`PHONE_PATTERN`].
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Reject an empty or malformed phone number.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() {
        return Err(ValidationError::MissingPhone);
    }
    if !is_valid_phone(phone) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Reject coordinates outside the valid WGS84 ranges. NaN is out of range.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ValidationError::LatitudeOutOfRange);
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ValidationError::LongitudeOutOfRange);
    }
    Ok(())
}

/// Resolve an optional limit, applying the default and the 1..=50 bound.
pub fn validate_limit(limit: Option<i64>) -> Result<usize, ValidationError> {
    match limit {
        None => Ok(DEFAULT_STORE_LIMIT),
        Some(n) if (1..=MAX_STORE_LIMIT as i64).contains(&n) => Ok(n as usize),
        Some(_) => Err(ValidationError::LimitOutOfRange {
            max: MAX_STORE_LIMIT,
        }),
    }
}
