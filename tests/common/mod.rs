#![allow(dead_code)]

use fuel_log::models::FuelLogRecord;

pub fn fill_up(id: u64, date: &str, odometer: u64, amount: f64) -> FuelLogRecord {
    FuelLogRecord {
        id,
        date: date.to_string(),
        vehicle_id: Some(1),
        fuel_type: "Petrol (95)".to_string(),
        odometer,
        amount,
        ..Default::default()
    }
}

pub fn purchase(id: u64, date: &str, price: f64, total_cost: f64, amount: f64) -> FuelLogRecord {
    FuelLogRecord {
        id,
        date: date.to_string(),
        vehicle_id: Some(1),
        fuel_type: "Diesel".to_string(),
        price,
        total_cost,
        amount,
        ..Default::default()
    }
}

pub fn odometer_only(id: u64, date: &str, odometer: u64) -> FuelLogRecord {
    FuelLogRecord {
        id,
        date: date.to_string(),
        vehicle_id: Some(1),
        odometer,
        ..Default::default()
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
