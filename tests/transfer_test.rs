use fuel_log::error::FuelLogError;
use fuel_log::fuel_types::FuelTypes;
use fuel_log::models::FuelLogRecord;
use fuel_log::store::LogBook;
use fuel_log::transfer::{export_csv, export_json, import_csv, import_json};

mod common;
use common::{odometer_only, purchase};

fn sample_book() -> LogBook {
    let mut book = LogBook::new();
    book.add_log(purchase(0, "2024-05-01", 1.899, 75.96, 40.0));
    book.add_log(odometer_only(0, "2024-05-04", 12500));
    book.add_log(FuelLogRecord {
        notes: "receipt says \"pump 4\", paid cash".to_string(),
        ..purchase(0, "2024-05-09", 1.95, 58.5, 30.0)
    });
    book.set_fuel_types(FuelTypes::from_labels(["Diesel", "LPG"]));
    book
}

#[test]
fn test_json_export_shape() {
    let json = export_json(&sample_book()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let logs = value["fuel_logs"].as_array().unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0]["totalCost"], 75.96);
    assert_eq!(logs[0]["fuelType"], "Diesel");
    assert_eq!(logs[1]["odometer"], 12500);
    assert_eq!(value["fuel_types"], serde_json::json!(["Diesel", "LPG"]));
}

#[test]
fn test_json_import_replaces_logs_and_types() {
    let exported = export_json(&sample_book()).unwrap();

    let mut target = LogBook::new();
    target.add_log(purchase(0, "2020-01-01", 1.0, 10.0, 10.0));
    target.add_log(purchase(0, "2020-01-02", 1.0, 10.0, 10.0));

    let count = import_json(&mut target, &exported).unwrap();
    assert_eq!(count, 3);
    assert_eq!(target.log_count(), 3);
    assert!(target.fuel_types().contains("LPG"));

    // Fresh ids continue after the target's own counter
    let ids: Vec<u64> = target.logs().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 4, 5]);
    assert!(target.logs().iter().all(|r| r.date.starts_with("2024-05")));
}

#[test]
fn test_json_import_without_fuel_types_keeps_vocabulary() {
    let mut book = LogBook::new();
    book.fuel_types_mut().add("E85").unwrap();

    let count = import_json(
        &mut book,
        r#"{"fuel_logs":[{"date":"2024-01-01","totalCost":20,"odometer":100}]}"#,
    )
    .unwrap();
    assert_eq!(count, 1);
    assert!(book.fuel_types().contains("E85"));
}

#[test]
fn test_json_import_rejects_bad_documents() {
    let mut book = sample_book();
    for text in ["[]", "not json", r#"{"fuel_logs": 5}"#] {
        let err = import_json(&mut book, text).unwrap_err();
        assert!(matches!(err, FuelLogError::ImportFormat(_)), "{}", text);
    }
    assert_eq!(book.log_count(), 3);
}

#[test]
fn test_csv_round_trip() {
    let csv = export_csv(&sample_book()).unwrap();
    assert!(csv.starts_with("id,date,fuelType,price,totalCost,amount,odometer,notes"));

    let mut target = LogBook::new();
    let count = import_csv(&mut target, &csv).unwrap();
    assert_eq!(count, 3);

    let logs = target.logs();
    assert_eq!(logs[0].price, 1.899);
    assert_eq!(logs[0].total_cost, 75.96);
    assert!(logs[1].is_odometer_only());
    assert_eq!(logs[2].notes, "receipt says \"pump 4\", paid cash");
    assert!(logs.iter().all(|r| r.vehicle_id.is_none()));
}

#[test]
fn test_csv_import_rejects_wrong_header() {
    let mut book = LogBook::new();
    let err = import_csv(&mut book, "date,cost\n2024-01-01,20\n").unwrap_err();
    assert!(matches!(err, FuelLogError::ImportFormat(_)));
}
