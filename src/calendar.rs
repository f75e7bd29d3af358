//! Month view indicators.
//!
//! For each day of a month that has records, whether it holds a fill-up, an
//! odometer-only checkpoint, or both.

use crate::date_parser::DateParser;
use crate::models::{DayIndicator, FuelLogRecord};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::warn;

pub fn month_indicators(records: &[FuelLogRecord], year: i32, month: u32) -> BTreeMap<u32, DayIndicator> {
    let mut days: BTreeMap<u32, DayIndicator> = BTreeMap::new();

    for record in records {
        let date = match DateParser::parse_record_date(record.id, &record.date) {
            Ok(date) => date,
            Err(e) => {
                warn!(record_id = record.id, error = %e, "Skipping record in month view");
                continue;
            }
        };
        if date.year() != year || date.month() != month {
            continue;
        }

        let day = days.entry(date.day()).or_default();
        if record.is_odometer_only() {
            day.has_odometer_log = true;
        } else {
            day.has_fuel_log = true;
        }
    }

    days
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, odometer: u64, total_cost: f64) -> FuelLogRecord {
        FuelLogRecord {
            date: date.to_string(),
            odometer,
            total_cost,
            ..Default::default()
        }
    }

    #[test]
    fn test_indicators_by_day() {
        let records = vec![
            record("2024-02-03", 0, 50.0),
            record("2024-02-03", 12000, 0.0),
            record("2024-02-10", 12400, 0.0),
            record("2024-03-01", 0, 20.0),
            record("bad", 0, 20.0),
        ];
        let days = month_indicators(&records, 2024, 2);
        assert_eq!(days.len(), 2);
        assert_eq!(
            days[&3],
            DayIndicator {
                has_fuel_log: true,
                has_odometer_log: true
            }
        );
        assert!(!days[&10].has_fuel_log);
        assert!(days[&10].has_odometer_log);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
    }
}
