//! Core Data Models
//!
//! This module defines the records kept by the fuel log and the structures the
//! analytics pipeline produces from them.
//!
//! ## Data Flow
//!
//! 1. **Stored data**: [`FuelLogRecord`], [`Vehicle`] - what the store persists
//! 2. **Preparation**: [`DatedRecord`] - a record paired with its parsed date
//! 3. **Output**: [`AnalyticsReport`] - summary metrics and chart series
//! 4. **Calendar**: [`DayIndicator`] - per-day flags for the month view
//!
//! Serialized field names follow the export format (`price`, `totalCost`,
//! `amount`, ...), so the same types round-trip through JSON export/import.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_VEHICLE: &str = "Unknown Vehicle";

/// One fill-up or odometer-only observation.
///
/// `price`, `total_cost` and `amount` use zero for "not entered";
/// `odometer` uses zero for "not recorded".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLogRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<u64>,
    #[serde(default)]
    pub fuel_type: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub odometer: u64,
    #[serde(default)]
    pub notes: String,
}

/// How a record participates in the analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Purchase data present (even partially).
    Fuel,
    /// Distance checkpoint only.
    OdometerOnly,
}

impl FuelLogRecord {
    pub fn has_purchase_data(&self) -> bool {
        self.total_cost > 0.0 || self.price > 0.0 || self.amount > 0.0
    }

    pub fn kind(&self) -> RecordKind {
        if self.odometer > 0 && !self.has_purchase_data() {
            RecordKind::OdometerOnly
        } else {
            RecordKind::Fuel
        }
    }

    pub fn is_odometer_only(&self) -> bool {
        self.kind() == RecordKind::OdometerOnly
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
}

impl Vehicle {
    pub fn description(&self) -> String {
        format!("{} {}", self.make, self.model).trim().to_string()
    }
}

/// A record whose date parsed successfully.
#[derive(Debug, Clone, Copy)]
pub struct DatedRecord<'a> {
    pub date: NaiveDate,
    pub record: &'a FuelLogRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyReading {
    pub date: NaiveDate,
    /// Volume per 100 distance units.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostPoint {
    pub date: NaiveDate,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySpend {
    pub month: String,
    pub total_spend: f64,
    pub total_volume: f64,
    pub fill_ups: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_spend: f64,
    pub total_volume: f64,
    pub total_distance: u64,
    pub avg_price: f64,
    /// Zero when no efficiency reading could be produced.
    pub avg_efficiency: f64,
    pub efficiency_readings: Vec<EfficiencyReading>,
    pub cost_series: Vec<CostPoint>,
    pub monthly_spend: Vec<MonthlySpend>,
    pub recent_logs: Vec<FuelLogRecord>,
    pub record_count: usize,
    pub skipped_records: usize,
    pub insufficient_data: bool,
}

impl AnalyticsReport {
    pub fn efficiency_available(&self) -> bool {
        !self.efficiency_readings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayIndicator {
    pub has_fuel_log: bool,
    pub has_odometer_log: bool,
}
