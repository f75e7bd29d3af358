//! Fuel Analytics Engine
//!
//! This module turns a collection of stored fuel log records into the metrics
//! shown on the analytics screen: spend and volume totals, distance travelled,
//! volume-weighted average price, and an efficiency series for charting.
//!
//! ## Pipeline
//!
//! 1. **Filtering**: optional pre-filter to one vehicle
//! 2. **Preparation**: parse each record's date; records with a malformed date
//!    are logged and skipped
//! 3. **Ordering**: stable sort by (date, odometer)
//! 4. **Aggregation**: a single left-to-right pass over the sorted view
//! 5. **Trends**: cost series, per-month spend and the most recent logs
//!
//! ## Distance and Efficiency
//!
//! The first record with an odometer reading sets the baseline. Every later
//! reading above the baseline adds its delta to the total distance; if any
//! earlier record carried a fuel volume, the most recent such volume divided
//! by the delta gives an efficiency reading (volume per 100 distance units).
//! Every recorded odometer becomes the new baseline, including readings lower
//! than the current one, so a bad reading never yields a negative distance.
//!
//! ## Usage Example
//!
//! ```rust
//! use fuel_log::analytics::{AnalyticsOptions, FuelAnalyzer};
//! use fuel_log::models::FuelLogRecord;
//!
//! let records: Vec<FuelLogRecord> = Vec::new();
//! let analyzer = FuelAnalyzer::new();
//! let report = analyzer.analyze(&records, &AnalyticsOptions::default());
//! assert_eq!(report.total_spend, 0.0);
//! ```

use crate::config::AnalyticsConfig;
use crate::date_parser::DateParser;
use crate::models::*;
use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct AnalyticsOptions {
    /// Restrict the analysis to one vehicle.
    pub vehicle_id: Option<u64>,
}

pub struct FuelAnalyzer {
    recent_log_count: usize,
    monthly_limit: usize,
}

impl Default for FuelAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FuelAnalyzer {
    pub fn new() -> Self {
        Self::with_config(&AnalyticsConfig::default())
    }

    pub fn with_config(config: &AnalyticsConfig) -> Self {
        Self {
            recent_log_count: config.recent_log_count,
            monthly_limit: config.monthly_limit,
        }
    }

    /// Full analytics report for the given records.
    pub fn analyze(&self, records: &[FuelLogRecord], options: &AnalyticsOptions) -> AnalyticsReport {
        let selected: Vec<&FuelLogRecord> = records
            .iter()
            .filter(|r| options.vehicle_id.map_or(true, |id| r.vehicle_id == Some(id)))
            .collect();

        let (sorted, skipped) = prepare_records(selected);
        let mut report = calculate_metrics(&sorted);

        report.cost_series = cost_series(&sorted);
        report.monthly_spend = monthly_spend(&sorted, self.monthly_limit);
        report.recent_logs = sorted
            .iter()
            .rev()
            .take(self.recent_log_count)
            .map(|d| d.record.clone())
            .collect();
        report.skipped_records = skipped;
        report.insufficient_data = options.vehicle_id.is_some() && sorted.len() < 2;

        debug!(
            records = report.record_count,
            skipped = skipped,
            readings = report.efficiency_readings.len(),
            vehicle_id = ?options.vehicle_id,
            "Analytics computed"
        );

        report
    }
}

/// Parse dates and sort by (date, odometer). Returns the sorted view and the
/// number of records dropped for a malformed date.
pub fn prepare_records<'a, I>(records: I) -> (Vec<DatedRecord<'a>>, usize)
where
    I: IntoIterator<Item = &'a FuelLogRecord>,
{
    let mut skipped = 0;
    let mut dated: Vec<DatedRecord<'a>> = Vec::new();

    for record in records {
        match DateParser::parse_record_date(record.id, &record.date) {
            Ok(date) => dated.push(DatedRecord { date, record }),
            Err(e) => {
                warn!(record_id = record.id, error = %e, "Skipping record with malformed date");
                skipped += 1;
            }
        }
    }

    // sort_by is stable: equal (date, odometer) keep their input order
    dated.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.record.odometer.cmp(&b.record.odometer))
    });

    (dated, skipped)
}

/// Core metrics over records already in (date, odometer) order.
pub fn calculate_metrics(sorted: &[DatedRecord<'_>]) -> AnalyticsReport {
    let mut report = AnalyticsReport {
        record_count: sorted.len(),
        ..Default::default()
    };

    let mut priced_spend = 0.0;
    let mut priced_volume = 0.0;

    let mut baseline: Option<u64> = None;
    let mut last_fill_volume: Option<f64> = None;

    for entry in sorted {
        let record = entry.record;

        if record.kind() == RecordKind::Fuel {
            report.total_spend += record.total_cost;
            report.total_volume += record.amount;
        }

        if record.price > 0.0 {
            priced_spend += record.total_cost;
            priced_volume += record.amount;
        }

        if record.odometer > 0 {
            if let Some(previous) = baseline {
                if record.odometer > previous {
                    let distance = record.odometer - previous;
                    report.total_distance += distance;

                    if let Some(fuel_used) = last_fill_volume {
                        report.efficiency_readings.push(EfficiencyReading {
                            date: entry.date,
                            value: fuel_used / distance as f64 * 100.0,
                        });
                    }
                }
            }
            baseline = Some(record.odometer);
        }

        // Updated after the interval so the lookback only sees earlier records
        if record.amount > 0.0 {
            last_fill_volume = Some(record.amount);
        }
    }

    if priced_volume > 0.0 {
        report.avg_price = priced_spend / priced_volume;
    }

    if !report.efficiency_readings.is_empty() {
        let sum: f64 = report.efficiency_readings.iter().map(|r| r.value).sum();
        report.avg_efficiency = sum / report.efficiency_readings.len() as f64;
    }

    report
}

/// Total cost per fuel record, in sorted order. Odometer-only records are
/// left out so they don't chart as zero-cost fill-ups.
pub fn cost_series(sorted: &[DatedRecord<'_>]) -> Vec<CostPoint> {
    sorted
        .iter()
        .filter(|d| !d.record.is_odometer_only())
        .map(|d| CostPoint {
            date: d.date,
            total_cost: d.record.total_cost,
        })
        .collect()
}

/// Spend and volume per calendar month, oldest first, keeping the most
/// recent `limit` months.
pub fn monthly_spend(sorted: &[DatedRecord<'_>], limit: usize) -> Vec<MonthlySpend> {
    let mut months: BTreeMap<(i32, u32), MonthlySpend> = BTreeMap::new();

    for entry in sorted.iter().filter(|d| !d.record.is_odometer_only()) {
        let key = (entry.date.year(), entry.date.month());
        let month = months.entry(key).or_insert_with(|| MonthlySpend {
            month: format!("{:04}-{:02}", key.0, key.1),
            total_spend: 0.0,
            total_volume: 0.0,
            fill_ups: 0,
        });
        month.total_spend += entry.record.total_cost;
        month.total_volume += entry.record.amount;
        month.fill_ups += 1;
    }

    let mut result: Vec<MonthlySpend> = months.into_values().collect();
    if result.len() > limit {
        let skip_count = result.len() - limit;
        result.drain(..skip_count);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, date: &str, odometer: u64, amount: f64) -> FuelLogRecord {
        FuelLogRecord {
            id,
            date: date.to_string(),
            vehicle_id: Some(1),
            odometer,
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_sorts_by_date_then_odometer() {
        let records = vec![
            record(1, "2024-02-01", 500, 0.0),
            record(2, "2024-01-15", 900, 0.0),
            record(3, "2024-01-15", 100, 0.0),
        ];
        let (sorted, skipped) = prepare_records(&records);
        let ids: Vec<u64> = sorted.iter().map(|d| d.record.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_prepare_skips_malformed_dates() {
        let records = vec![record(1, "2024-02-01", 0, 10.0), record(2, "02/01/2024", 0, 10.0)];
        let (sorted, skipped) = prepare_records(&records);
        assert_eq!(sorted.len(), 1);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_efficiency_uses_fill_before_first_odometer() {
        // A fill-up without odometer still counts as the most recent fill
        let records = vec![
            record(1, "2024-01-01", 0, 30.0),
            record(2, "2024-01-02", 1000, 0.0),
            record(3, "2024-01-03", 1300, 0.0),
        ];
        let (sorted, _) = prepare_records(&records);
        let report = calculate_metrics(&sorted);
        assert_eq!(report.total_distance, 300);
        assert_eq!(report.efficiency_readings.len(), 1);
        assert!((report.efficiency_readings[0].value - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_current_record_volume_not_used_for_its_own_interval() {
        let records = vec![record(1, "2024-01-01", 1000, 0.0), record(2, "2024-01-05", 1400, 40.0)];
        let (sorted, _) = prepare_records(&records);
        let report = calculate_metrics(&sorted);
        assert_eq!(report.total_distance, 400);
        assert!(report.efficiency_readings.is_empty());
        assert_eq!(report.avg_efficiency, 0.0);
    }

    #[test]
    fn test_monthly_spend_limit_keeps_latest() {
        let mut records = Vec::new();
        for (i, month) in ["2024-01-10", "2024-02-10", "2024-03-10"].iter().enumerate() {
            records.push(FuelLogRecord {
                id: i as u64 + 1,
                date: month.to_string(),
                total_cost: 50.0,
                amount: 25.0,
                price: 2.0,
                ..Default::default()
            });
        }
        let (sorted, _) = prepare_records(&records);
        let months = monthly_spend(&sorted, 2);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2024-02");
        assert_eq!(months[1].month, "2024-03");
        assert_eq!(months[1].fill_ups, 1);
    }

    #[test]
    fn test_vehicle_filter() {
        let mut other = record(2, "2024-01-02", 0, 10.0);
        other.vehicle_id = Some(2);
        other.total_cost = 20.0;
        let mut own = record(1, "2024-01-01", 0, 5.0);
        own.total_cost = 9.0;

        let report = FuelAnalyzer::new().analyze(
            &[own, other],
            &AnalyticsOptions { vehicle_id: Some(1) },
        );
        assert_eq!(report.total_spend, 9.0);
        assert_eq!(report.record_count, 1);
        assert!(report.insufficient_data);
    }
}
