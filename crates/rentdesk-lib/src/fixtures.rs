//! Built-in fallback dataset.
//!
//! Served whenever a data file is missing or unreadable so the front ends can
//! always start: six stores around Beijing's Houhai lake and five orders.

use crate::model::{Order, Store};

struct StoreRow {
    name: &'static str,
    coordinates: &'static str,
    address: &'static str,
    longitude: f64,
    latitude: f64,
    open_date: &'static str,
    rating: f64,
    phone: &'static str,
}

const STORE_ROWS: [StoreRow; 6] = [
    StoreRow {
        name: "北京后海-110分店",
        coordinates: "116.370503,39.946613",
        address: "北京市西城区羊房胡同甲23号",
        longitude: 116.3705,
        latitude: 39.94661,
        open_date: "2024/3/1",
        rating: 4.5,
        phone: "15858905939",
    },
    StoreRow {
        name: "北京后海-120分店",
        coordinates: "116.378818,39.944656",
        address: "北京市西城区羊房胡同甲35号",
        longitude: 116.3788,
        latitude: 39.94466,
        open_date: "2018/12/23",
        rating: 4.8,
        phone: "15890785113",
    },
    StoreRow {
        name: "北京后海-125分店",
        coordinates: "116.374374,39.942185",
        address: "北京市西城区羊房胡同甲31号",
        longitude: 116.3744,
        latitude: 39.94219,
        open_date: "2016/8/31",
        rating: 4.7,
        phone: "15828386811",
    },
    StoreRow {
        name: "北京后海-142分店",
        coordinates: "116.38649,39.943933",
        address: "北京市西城区后海北沿50号",
        longitude: 116.3865,
        latitude: 39.94393,
        open_date: "2019/8/4",
        rating: 4.9,
        phone: "15892847917",
    },
    StoreRow {
        name: "北京后海-148分店",
        coordinates: "116.369155,39.940742",
        address: "北京市西城区后海北沿70号",
        longitude: 116.3692,
        latitude: 39.94074,
        open_date: "2020/8/21",
        rating: 4.8,
        phone: "15817929741",
    },
    StoreRow {
        name: "北京后海-154分店",
        coordinates: "116.377185,39.943402",
        address: "北京市西城区德内大街羊房胡同9号",
        longitude: 116.3772,
        latitude: 39.9434,
        open_date: "2018/5/14",
        rating: 3.9,
        phone: "15813203456",
    },
];

struct OrderRow {
    order_id: &'static str,
    user_id: &'static str,
    phone: &'static str,
    device_id: &'static str,
    location: &'static str,
    start_time: &'static str,
    duration: i64,
    cost: f64,
    status: &'static str,
    payment_method: &'static str,
}

const ORDER_ROWS: [OrderRow; 5] = [
    OrderRow {
        order_id: "PO202508281731220218",
        user_id: "U10058",
        phone: "17798762697",
        device_id: "D20219",
        location: "北京后海-166分店",
        start_time: "2025-08-28 20:35:00",
        duration: 32,
        cost: 3.2,
        status: "已暂停",
        payment_method: "wechat_pay",
    },
    OrderRow {
        order_id: "PO202508281731220253",
        user_id: "U10007",
        phone: "17796499753",
        device_id: "D20254",
        location: "深圳华强北店",
        start_time: "2025-08-28 23:20:00",
        duration: 239,
        cost: 23.9,
        status: "已暂停",
        payment_method: "apple_pay",
    },
    OrderRow {
        order_id: "PO202508281731220067",
        user_id: "U10080",
        phone: "17796025359",
        device_id: "D20068",
        location: "北京三里屯太古里-34分店",
        start_time: "2025-08-28 15:28:00",
        duration: 7,
        cost: 0.7,
        status: "进行中",
        payment_method: "wechat_pay",
    },
    OrderRow {
        order_id: "PO202508281731220282",
        user_id: "U10045",
        phone: "17794866582",
        device_id: "D20283",
        location: "上海外滩-150分店",
        start_time: "2025-08-28 21:16:00",
        duration: 128,
        cost: 12.8,
        status: "已暂停",
        payment_method: "alipay",
    },
    OrderRow {
        order_id: "PO202508281731220099",
        user_id: "U10031",
        phone: "17792350608",
        device_id: "D20100",
        location: "上海外滩-171分店",
        start_time: "2025-08-28 22:14:00",
        duration: 157,
        cost: 15.7,
        status: "已暂停",
        payment_method: "alipay",
    },
];

/// The six fallback stores, all in 西城区, 北京.
pub fn sample_stores() -> Vec<Store> {
    STORE_ROWS
        .iter()
        .map(|row| Store {
            name: row.name.to_string(),
            status: "正常".to_string(),
            coordinates: row.coordinates.to_string(),
            province: "北京市".to_string(),
            city: "北京市".to_string(),
            district: "西城区".to_string(),
            address: row.address.to_string(),
            longitude: row.longitude,
            latitude: row.latitude,
            store_type: "直营店".to_string(),
            open_date: row.open_date.to_string(),
            business_hours: "9:00-22:00".to_string(),
            rating: row.rating,
            phone: row.phone.to_string(),
        })
        .collect()
}

/// The five fallback orders; none has been returned yet.
pub fn sample_orders() -> Vec<Order> {
    ORDER_ROWS
        .iter()
        .map(|row| Order {
            order_id: row.order_id.to_string(),
            user_id: row.user_id.to_string(),
            phone: row.phone.to_string(),
            device_id: row.device_id.to_string(),
            location: row.location.to_string(),
            start_time: row.start_time.to_string(),
            return_time: String::new(),
            duration: row.duration,
            return_store: String::new(),
            cost: row.cost,
            status: row.status.to_string(),
            payment_method: row.payment_method.to_string(),
        })
        .collect()
}
