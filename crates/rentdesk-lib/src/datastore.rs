use tracing::debug;

use crate::dataset::{
    DataSources, DatasetReport, DatasetSource, FallbackReason, LoadReport, ORDERS_FILENAME,
    STORES_FILENAME,
};
use crate::fixtures::{sample_orders, sample_stores};
use crate::geo::GeoPoint;
use crate::loader::{load_orders, load_stores};
use crate::model::{Order, RankedStore, Store};

/// In-memory store and order collections plus how they were loaded.
///
/// Built once, then shared read-only (typically behind an `Arc`). Nothing is
/// mutated after construction.
#[derive(Debug, Clone)]
pub struct Datastore {
    stores: Vec<Store>,
    orders: Vec<Order>,
    report: LoadReport,
}

impl Datastore {
    /// Load both datasets from `sources`.
    ///
    /// Never fails: each dataset independently falls back to the built-in
    /// fixtures when its file is missing or unreadable.
    pub fn load(sources: &DataSources) -> Self {
        let (stores, stores_report) = load_stores(&sources.stores);
        let (orders, orders_report) = load_orders(&sources.orders);

        Self {
            stores,
            orders,
            report: LoadReport {
                stores: stores_report,
                orders: orders_report,
            },
        }
    }

    /// Datastore holding only the built-in fixtures.
    pub fn from_fixtures() -> Self {
        let stores = sample_stores();
        let orders = sample_orders();
        let fixture_report = |records: usize, file: &str| DatasetReport {
            source: DatasetSource::Fixture {
                path: file.into(),
                reason: FallbackReason::Missing,
            },
            records,
            defaulted_fields: 0,
        };
        let report = LoadReport {
            stores: fixture_report(stores.len(), STORES_FILENAME),
            orders: fixture_report(orders.len(), ORDERS_FILENAME),
        };
        Self {
            stores,
            orders,
            report,
        }
    }

    /// Datastore over caller-provided records, reported as in-memory files.
    pub fn from_parts(stores: Vec<Store>, orders: Vec<Order>) -> Self {
        let report = LoadReport {
            stores: DatasetReport {
                source: DatasetSource::File {
                    path: STORES_FILENAME.into(),
                },
                records: stores.len(),
                defaulted_fields: 0,
            },
            orders: DatasetReport {
                source: DatasetSource::File {
                    path: ORDERS_FILENAME.into(),
                },
                records: orders.len(),
                defaulted_fields: 0,
            },
        };
        Self {
            stores,
            orders,
            report,
        }
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Every order whose phone equals `phone` exactly, in load order.
    ///
    /// The input is not validated; anything that matches no order yields an
    /// empty result.
    pub fn orders_by_phone(&self, phone: &str) -> Vec<&Order> {
        let matches: Vec<&Order> = self.orders.iter().filter(|o| o.phone == phone).collect();
        debug!(matches = matches.len(), "orders by phone");
        matches
    }

    /// The `limit` stores closest to (`latitude`, `longitude`), nearest first.
    ///
    /// Stores at equal distance keep their load order.
    pub fn stores_by_location(
        &self,
        latitude: f64,
        longitude: f64,
        limit: usize,
    ) -> Vec<RankedStore> {
        let origin = GeoPoint::new(latitude, longitude);

        let mut ranked: Vec<RankedStore> = self
            .stores
            .iter()
            .map(|store| RankedStore {
                distance: origin.distance_to(&store.position()),
                store: store.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        ranked.truncate(limit);

        debug!(returned = ranked.len(), limit, "stores by location");
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_at(name: &str, latitude: f64, longitude: f64) -> Store {
        Store {
            name: name.to_string(),
            latitude,
            longitude,
            ..Store::default()
        }
    }

    fn order_for(order_id: &str, phone: &str) -> Order {
        Order {
            order_id: order_id.to_string(),
            phone: phone.to_string(),
            ..Order::default()
        }
    }

    #[test]
    fn fixture_phone_finds_paused_order() {
        let store = Datastore::from_fixtures();
        let orders = store.orders_by_phone("17798762697");
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id, "PO202508281731220218");
        assert_eq!(orders[0].status, "已暂停");
    }

    #[test]
    fn unknown_phone_yields_empty() {
        let store = Datastore::from_fixtures();
        assert!(store.orders_by_phone("00000000000").is_empty());
        assert!(store.orders_by_phone("").is_empty());
        assert!(store.orders_by_phone("not a phone").is_empty());
    }

    #[test]
    fn duplicate_phones_return_all_matches_in_load_order() {
        let store = Datastore::from_parts(
            Vec::new(),
            vec![
                order_for("A", "13800000000"),
                order_for("B", "13900000000"),
                order_for("C", "13800000000"),
            ],
        );
        let ids: Vec<_> = store
            .orders_by_phone("13800000000")
            .iter()
            .map(|o| o.order_id.as_str())
            .collect();
        assert_eq!(ids, ["A", "C"]);
    }

    #[test]
    fn nearest_fixture_stores_are_ascending() {
        let store = Datastore::from_fixtures();
        let ranked = store.stores_by_location(39.946613, 116.370503, 3);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|r| r.distance >= 0.0));
        assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(ranked[0].store.name, "北京后海-110分店");
    }

    #[test]
    fn result_size_is_min_of_limit_and_store_count() {
        let store = Datastore::from_fixtures();
        for limit in [0, 1, 5, 6, 7, 50] {
            let ranked = store.stores_by_location(39.9, 116.4, limit);
            assert_eq!(ranked.len(), limit.min(6), "limit {limit}");
        }
    }

    #[test]
    fn equidistant_stores_keep_load_order() {
        let store = Datastore::from_parts(
            vec![
                store_at("far", 10.0, 0.0),
                store_at("east", 0.0, 1.0),
                store_at("west", 0.0, -1.0),
                store_at("north", 1.0, 0.0),
            ],
            Vec::new(),
        );
        let names: Vec<_> = store
            .stores_by_location(0.0, 0.0, 4)
            .into_iter()
            .map(|r| r.store.name)
            .collect();
        assert_eq!(names, ["east", "west", "north", "far"]);
    }

    #[test]
    fn empty_store_collection_yields_empty() {
        let store = Datastore::from_parts(Vec::new(), Vec::new());
        assert!(store.stores_by_location(39.9, 116.4, 10).is_empty());
    }

    #[test]
    fn ranking_does_not_modify_stores() {
        let store = Datastore::from_fixtures();
        let before = store.stores().to_vec();
        let _ = store.stores_by_location(0.0, 0.0, 10);
        assert_eq!(store.stores(), before.as_slice());
    }

    #[test]
    fn fixture_report_marks_both_datasets() {
        let store = Datastore::from_fixtures();
        assert!(store.report().used_fixtures());
        assert_eq!(store.report().stores.records, 6);
        assert_eq!(store.report().orders.records, 5);
    }
}
