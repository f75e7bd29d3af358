//! Output Formatting and Display Management
//!
//! Renders analytics, day listings, month indicators, vehicles and fuel types
//! either as colored terminal text or as JSON for scripting.
//!
//! ## Key Types
//!
//! - [`DisplayManager`] - all terminal and JSON output goes through it
//!
//! ## JSON Output
//!
//! Analytics in JSON mode:
//! ```json
//! {
//!   "scope": "All Vehicles",
//!   "analytics": {
//!     "totalSpend": 75.0,
//!     "totalVolume": 40.0,
//!     "totalDistance": 900,
//!     "avgPrice": 1.875,
//!     "avgEfficiency": 9.0,
//!     "efficiencyReadings": [{ "date": "2024-01-02", "value": 8.0 }]
//!   }
//! }
//! ```

use crate::config::{OutputConfig, UnitsConfig};
use crate::models::*;
use crate::store::LogBook;
use colored::Colorize;
use std::collections::BTreeMap;

pub struct DisplayManager {
    units: UnitsConfig,
    json_pretty: bool,
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new(UnitsConfig::default(), &OutputConfig::default())
    }
}

impl DisplayManager {
    pub fn new(units: UnitsConfig, output: &OutputConfig) -> Self {
        Self {
            units,
            json_pretty: output.json_pretty,
        }
    }

    pub fn to_json(&self, value: &serde_json::Value) -> String {
        let rendered = if self.json_pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    pub fn money(&self, value: f64) -> String {
        format!("{}{:.2}", self.units.currency_symbol, value)
    }

    pub fn unit_price(&self, value: f64) -> String {
        format!(
            "{}{:.3} / {}",
            self.units.currency_symbol, value, self.units.volume_unit
        )
    }

    pub fn volume(&self, value: f64) -> String {
        format!("{:.2} {}", value, self.units.volume_unit)
    }

    pub fn efficiency(&self, report: &AnalyticsReport) -> String {
        let label = format!("{}/100{}", self.units.volume_unit, self.units.distance_unit);
        if report.efficiency_available() {
            format!("{:.2} {}", report.avg_efficiency, label)
        } else {
            format!("N/A {}", label)
        }
    }

    pub fn display_analytics(&self, report: &AnalyticsReport, scope: &str, json_output: bool) {
        if json_output {
            let output = serde_json::json!({ "scope": scope, "analytics": report });
            println!("{}", self.to_json(&output));
            return;
        }

        println!("\n{}", "=".repeat(60).bright_cyan());
        println!(
            "{}",
            format!("Fuel Analytics - {}", scope).bright_white().bold()
        );
        println!("{}", "=".repeat(60).bright_cyan());

        if report.insufficient_data {
            println!(
                "{} Not enough data for this vehicle. Add at least two fill-ups with odometer readings.",
                "⚠".bright_yellow()
            );
        }
        if report.skipped_records > 0 {
            println!(
                "{} {} record(s) skipped because of an unreadable date",
                "⚠".bright_yellow(),
                report.skipped_records
            );
        }

        println!();
        println!("   Total Spend:    {}", self.money(report.total_spend).bright_green().bold());
        println!("   Avg Price:      {}", self.unit_price(report.avg_price).bright_white());
        println!("   Avg Efficiency: {}", self.efficiency(report).bright_white());
        println!(
            "   Total Distance: {}",
            format!("{} {}", report.total_distance, self.units.distance_unit).bright_white()
        );
        println!("   Total Volume:   {}", self.volume(report.total_volume).bright_white());

        if !report.efficiency_readings.is_empty() {
            println!("\n{} Efficiency by interval:", "⛽".bright_blue());
            for reading in &report.efficiency_readings {
                println!(
                    "   {}: {:.2}",
                    reading.date.to_string().bright_white(),
                    reading.value
                );
            }
        }

        if !report.monthly_spend.is_empty() {
            println!("\n{} Monthly spend:", "📅".bright_blue());
            for month in &report.monthly_spend {
                println!(
                    "   {}: {} ({}, {} fill-ups)",
                    month.month.bright_white().bold(),
                    self.money(month.total_spend).bright_green(),
                    self.volume(month.total_volume),
                    month.fill_ups
                );
            }
        }

        if !report.recent_logs.is_empty() {
            println!("\n{} Recent logs:", "🧾".bright_blue());
            for log in &report.recent_logs {
                println!(
                    "   {}  {:<14} {:>10} {:>10}",
                    log.date,
                    log.fuel_type.bright_cyan(),
                    self.money(log.total_cost),
                    self.volume(log.amount)
                );
            }
        }
        println!();
    }

    pub fn display_day(&self, date: &str, logs: &[FuelLogRecord], book: &LogBook, json_output: bool) {
        if json_output {
            let entries: Vec<serde_json::Value> = logs
                .iter()
                .map(|log| {
                    serde_json::json!({
                        "log": log,
                        "vehicle": book.vehicle_name(log.vehicle_id),
                        "odometerOnly": log.is_odometer_only(),
                    })
                })
                .collect();
            let output = serde_json::json!({ "date": date, "logs": entries });
            println!("{}", self.to_json(&output));
            return;
        }

        println!("\n{} {}", "📅".bright_blue(), date.bright_white().bold());
        if logs.is_empty() {
            println!("   No logs for this day.");
            return;
        }

        for log in logs {
            let vehicle = book.vehicle_name(log.vehicle_id);
            if log.is_odometer_only() {
                println!(
                    "   #{} {} {}",
                    log.id,
                    "Odometer reading".bright_yellow().bold(),
                    format!("({})", vehicle).bright_white()
                );
            } else {
                println!(
                    "   #{} {} {}",
                    log.id,
                    log.fuel_type.bright_cyan().bold(),
                    format!("({})", vehicle).bright_white()
                );
                println!("      Total Cost: {}", self.money(log.total_cost).bright_green());
                if log.amount > 0.0 {
                    println!("      Amount: {}", self.volume(log.amount));
                }
                if log.price > 0.0 {
                    println!("      Price: {}", self.unit_price(log.price));
                }
            }
            if log.odometer > 0 {
                println!("      Odometer: {} {}", log.odometer, self.units.distance_unit);
            }
            if !log.notes.is_empty() {
                println!("      Notes: {}", log.notes.italic());
            }
        }
        println!();
    }

    pub fn display_month(
        &self,
        year: i32,
        month: u32,
        days_in_month: u32,
        indicators: &BTreeMap<u32, DayIndicator>,
        json_output: bool,
    ) {
        if json_output {
            let days: BTreeMap<String, &DayIndicator> = indicators
                .iter()
                .map(|(day, flags)| (format!("{:04}-{:02}-{:02}", year, month, day), flags))
                .collect();
            let output = serde_json::json!({
                "month": format!("{:04}-{:02}", year, month),
                "days": days,
            });
            println!("{}", self.to_json(&output));
            return;
        }

        println!(
            "\n{}",
            format!("{:04}-{:02}", year, month).bright_white().bold()
        );
        for day in 1..=days_in_month {
            let marker = match indicators.get(&day) {
                Some(flags) if flags.has_fuel_log && flags.has_odometer_log => "⛽ 📍".to_string(),
                Some(flags) if flags.has_fuel_log => "⛽".to_string(),
                Some(flags) if flags.has_odometer_log => "📍".to_string(),
                _ => continue,
            };
            println!("   {:>2}  {}", day, marker);
        }
        if indicators.is_empty() {
            println!("   No logs this month.");
        }
        println!();
    }

    pub fn display_vehicles(&self, vehicles: &[Vehicle], json_output: bool) {
        if json_output {
            println!("{}", self.to_json(&serde_json::json!({ "vehicles": vehicles })));
            return;
        }
        if vehicles.is_empty() {
            println!("No vehicles added yet.");
            return;
        }
        for vehicle in vehicles {
            println!(
                "   #{} {} {}",
                vehicle.id,
                vehicle.name.bright_white().bold(),
                vehicle.description().bright_black()
            );
        }
    }

    pub fn display_fuel_types(&self, labels: &[String], json_output: bool) {
        if json_output {
            println!("{}", self.to_json(&serde_json::json!({ "fuel_types": labels })));
            return;
        }
        for label in labels {
            println!("   {}", label.bright_cyan());
        }
    }
}
