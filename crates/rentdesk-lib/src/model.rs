//! Entity types produced by the loader and returned by queries.
//!
//! Field names serialize in camelCase so JSON consumers see the same shape
//! regardless of which front end answered the request.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// One rental/service location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub name: String,
    pub status: String,
    /// Raw "lon,lat" cell as it appears in the sheet.
    pub coordinates: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(rename = "type")]
    pub store_type: String,
    pub open_date: String,
    pub business_hours: String,
    pub rating: f64,
    pub phone: String,
}

impl Store {
    /// Position of the store used for distance ranking.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// One rental transaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub user_id: String,
    /// Lookup key. Not unique and not validated at load time.
    pub phone: String,
    pub device_id: String,
    pub location: String,
    pub start_time: String,
    /// Empty while the device has not been returned.
    pub return_time: String,
    /// Rental duration in minutes.
    pub duration: i64,
    pub return_store: String,
    pub cost: f64,
    pub status: String,
    pub payment_method: String,
}

impl Order {
    /// Status value of an order that is still being billed.
    pub const STATUS_IN_PROGRESS: &'static str = "进行中";

    /// Whether billing for this order may still be stopped.
    pub fn can_stop_billing(&self) -> bool {
        self.status == Self::STATUS_IN_PROGRESS
    }

    /// Display name for the payment method.
    pub fn payment_method_label(&self) -> &str {
        payment_method_label(&self.payment_method)
    }
}

/// A store paired with its distance from a query point.
///
/// The distance is specific to one query and never stored on [`Store`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStore {
    #[serde(flatten)]
    pub store: Store,
    /// Great-circle distance in kilometres.
    pub distance: f64,
}

/// Map a payment-method code to its display name.
///
/// Unrecognised codes are returned unchanged.
pub fn payment_method_label(code: &str) -> &str {
    match code {
        "wechat_pay" => "微信支付",
        "alipay" => "支付宝",
        "apple_pay" => "Apple Pay",
        "union_pay" => "银联支付",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_labels_cover_known_codes() {
        assert_eq!(payment_method_label("wechat_pay"), "微信支付");
        assert_eq!(payment_method_label("alipay"), "支付宝");
        assert_eq!(payment_method_label("apple_pay"), "Apple Pay");
        assert_eq!(payment_method_label("union_pay"), "银联支付");
    }

    #[test]
    fn payment_label_passes_unknown_codes_through() {
        assert_eq!(payment_method_label("cash"), "cash");
        assert_eq!(payment_method_label(""), "");
    }

    #[test]
    fn only_in_progress_orders_can_stop_billing() {
        let mut order = Order {
            status: "进行中".to_string(),
            ..Order::default()
        };
        assert!(order.can_stop_billing());

        order.status = "已暂停".to_string();
        assert!(!order.can_stop_billing());
    }

    #[test]
    fn store_serializes_type_and_camel_case_fields() {
        let store = Store {
            name: "测试店".to_string(),
            store_type: "直营店".to_string(),
            business_hours: "9:00-22:00".to_string(),
            ..Store::default()
        };
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["type"], "直营店");
        assert_eq!(json["businessHours"], "9:00-22:00");
        assert!(json.get("store_type").is_none());
    }

    #[test]
    fn ranked_store_flattens_store_fields() {
        let ranked = RankedStore {
            store: Store {
                name: "A".to_string(),
                ..Store::default()
            },
            distance: 1.5,
        };
        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["name"], "A");
        assert_eq!(json["distance"], 1.5);
        assert!(json.get("store").is_none());
    }
}
