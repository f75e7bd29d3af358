//! Analytics behaviour over realistic fill-up histories

use fuel_log::analytics::{AnalyticsOptions, FuelAnalyzer};
use fuel_log::models::FuelLogRecord;

mod common;
use common::{approx, fill_up, odometer_only, purchase};

fn analyze(records: &[FuelLogRecord]) -> fuel_log::AnalyticsReport {
    FuelAnalyzer::new().analyze(records, &AnalyticsOptions::default())
}

#[test]
fn test_empty_input_yields_zero_metrics() {
    let report = analyze(&[]);

    assert_eq!(report.total_spend, 0.0);
    assert_eq!(report.total_volume, 0.0);
    assert_eq!(report.total_distance, 0);
    assert_eq!(report.avg_price, 0.0);
    assert_eq!(report.avg_efficiency, 0.0);
    assert!(report.efficiency_readings.is_empty());
    assert!(report.cost_series.is_empty());
    assert!(!report.efficiency_available());
}

#[test]
fn test_efficiency_scenario() {
    let records = vec![
        fill_up(1, "2024-01-01", 10000, 40.0),
        fill_up(2, "2024-01-02", 10500, 0.0),
        fill_up(3, "2024-01-03", 10900, 35.0),
    ];
    let report = analyze(&records);

    assert_eq!(report.total_distance, 900);
    assert_eq!(report.efficiency_readings.len(), 2);
    assert_eq!(report.efficiency_readings[0].date.to_string(), "2024-01-02");
    assert!(approx(report.efficiency_readings[0].value, 8.0));
    assert_eq!(report.efficiency_readings[1].date.to_string(), "2024-01-03");
    assert!(approx(report.efficiency_readings[1].value, 10.0));
    assert!(approx(report.avg_efficiency, 9.0));
}

#[test]
fn test_input_order_does_not_matter() {
    let records = vec![
        fill_up(3, "2024-01-03", 10900, 35.0),
        fill_up(1, "2024-01-01", 10000, 40.0),
        fill_up(2, "2024-01-02", 10500, 0.0),
    ];
    let report = analyze(&records);
    assert!(approx(report.avg_efficiency, 9.0));
    // The caller's slice is not reordered
    assert_eq!(records[0].id, 3);
}

#[test]
fn test_odometer_only_excluded_from_spend() {
    let records = vec![
        purchase(1, "2024-03-01", 2.0, 40.0, 20.0),
        odometer_only(2, "2024-03-05", 15000),
    ];
    let report = analyze(&records);

    assert_eq!(report.total_spend, 40.0);
    assert_eq!(report.total_volume, 20.0);
    assert_eq!(report.cost_series.len(), 1);
    assert_eq!(report.record_count, 2);
}

#[test]
fn test_odometer_only_participates_in_distance() {
    let records = vec![
        odometer_only(1, "2024-03-01", 15000),
        FuelLogRecord {
            price: 1.8,
            total_cost: 54.0,
            amount: 30.0,
            ..fill_up(2, "2024-03-02", 15000, 30.0)
        },
        odometer_only(3, "2024-03-09", 15600),
    ];
    let report = analyze(&records);

    assert_eq!(report.total_distance, 600);
    assert_eq!(report.efficiency_readings.len(), 1);
    assert!(approx(report.efficiency_readings[0].value, 5.0));
    assert_eq!(report.total_spend, 54.0);
}

#[test]
fn test_average_price_is_volume_weighted() {
    let records = vec![
        purchase(1, "2024-01-01", 2.0, 40.0, 20.0),
        purchase(2, "2024-01-10", 1.5, 60.0, 40.0),
    ];
    let report = analyze(&records);

    let expected = 100.0 / 60.0;
    assert!(approx(report.avg_price, expected));
    // Simple mean of unit prices would be 1.75
    assert!((report.avg_price - 1.75).abs() > 0.05);
    assert!((report.avg_price - 1.667).abs() < 0.001);
}

#[test]
fn test_average_price_ignores_unpriced_records() {
    let records = vec![
        purchase(1, "2024-01-01", 2.0, 40.0, 20.0),
        purchase(2, "2024-01-10", 0.0, 90.0, 30.0),
    ];
    let report = analyze(&records);

    assert!(approx(report.avg_price, 2.0));
    assert_eq!(report.total_spend, 130.0);
}

#[test]
fn test_priced_record_without_volume_has_zero_average() {
    let records = vec![purchase(1, "2024-01-01", 2.0, 40.0, 0.0)];
    let report = analyze(&records);
    assert_eq!(report.avg_price, 0.0);
}

#[test]
fn test_non_monotonic_odometer() {
    let records = vec![
        fill_up(1, "2024-01-01", 10000, 40.0),
        fill_up(2, "2024-01-05", 9000, 0.0),
        fill_up(3, "2024-01-09", 9400, 0.0),
    ];
    let report = analyze(&records);

    // 10000 -> 9000 adds nothing; 9000 -> 9400 measures from the new baseline
    assert_eq!(report.total_distance, 400);
    assert_eq!(report.efficiency_readings.len(), 1);
    assert!(approx(report.efficiency_readings[0].value, 10.0));
}

#[test]
fn test_duplicate_odometer_adds_no_distance() {
    let records = vec![
        fill_up(1, "2024-01-01", 10000, 40.0),
        fill_up(2, "2024-01-02", 10000, 10.0),
        fill_up(3, "2024-01-03", 10200, 0.0),
    ];
    let report = analyze(&records);

    assert_eq!(report.total_distance, 200);
    assert_eq!(report.efficiency_readings.len(), 1);
    assert!(approx(report.efficiency_readings[0].value, 5.0));
}

#[test]
fn test_no_odometer_readings() {
    let records = vec![
        purchase(1, "2024-01-01", 2.0, 40.0, 20.0),
        purchase(2, "2024-01-10", 2.0, 50.0, 25.0),
    ];
    let report = analyze(&records);

    assert_eq!(report.total_distance, 0);
    assert!(report.efficiency_readings.is_empty());
    assert_eq!(report.total_spend, 90.0);
    assert_eq!(report.total_volume, 45.0);
}

#[test]
fn test_distance_without_prior_fill_has_no_reading() {
    let records = vec![
        odometer_only(1, "2024-01-01", 500),
        odometer_only(2, "2024-01-02", 800),
    ];
    let report = analyze(&records);

    assert_eq!(report.total_distance, 300);
    assert!(report.efficiency_readings.is_empty());
    assert_eq!(report.avg_efficiency, 0.0);
}

#[test]
fn test_malformed_date_is_skipped_not_fatal() {
    let mut broken = purchase(2, "", 2.0, 1000.0, 500.0);
    broken.odometer = 99999;
    let records = vec![
        fill_up(1, "2024-01-01", 10000, 40.0),
        broken,
        fill_up(3, "2024-01-03", 10400, 0.0),
    ];
    let report = analyze(&records);

    assert_eq!(report.skipped_records, 1);
    assert_eq!(report.record_count, 2);
    assert_eq!(report.total_distance, 400);
    assert_eq!(report.total_spend, 0.0);
}

#[test]
fn test_same_day_records_ordered_by_odometer() {
    let records = vec![
        fill_up(1, "2024-01-01", 10300, 0.0),
        fill_up(2, "2024-01-01", 10000, 30.0),
    ];
    let report = analyze(&records);

    assert_eq!(report.total_distance, 300);
    assert!(approx(report.avg_efficiency, 10.0));
}

#[test]
fn test_recent_logs_newest_first() {
    let records: Vec<FuelLogRecord> = (1..=7)
        .map(|i| purchase(i, &format!("2024-02-{:02}", i), 2.0, 20.0, 10.0))
        .collect();
    let report = analyze(&records);

    let ids: Vec<u64> = report.recent_logs.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![7, 6, 5, 4, 3]);
}

#[test]
fn test_vehicle_filter_changes_result() {
    let mut second = fill_up(3, "2024-01-02", 50000, 10.0);
    second.vehicle_id = Some(2);
    let records = vec![
        fill_up(1, "2024-01-01", 10000, 40.0),
        fill_up(2, "2024-01-03", 10500, 0.0),
        second,
    ];

    let all = analyze(&records);
    let first_only = FuelAnalyzer::new().analyze(&records, &AnalyticsOptions { vehicle_id: Some(1) });

    assert_eq!(first_only.total_distance, 500);
    assert!(approx(first_only.avg_efficiency, 8.0));
    assert!(!first_only.insufficient_data);
    assert_ne!(all.total_distance, first_only.total_distance);
}

#[test]
fn test_report_json_field_names() {
    let report = analyze(&[fill_up(1, "2024-01-01", 10000, 40.0)]);
    let value = serde_json::to_value(&report).unwrap();

    for key in [
        "totalSpend",
        "totalVolume",
        "totalDistance",
        "avgPrice",
        "avgEfficiency",
        "efficiencyReadings",
    ] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
}
