//! Fuel Log Library
//!
//! A personal fuel-expense tracker: log fill-ups (cost, volume, unit price,
//! odometer) per day, browse a month view, and derive analytics such as the
//! volume-weighted average price and fuel efficiency.
//!
//! ## Architecture Overview
//!
//! - [`reconcile`] - derives the missing one of price, total cost and volume
//! - [`analytics`] - totals, distance and efficiency series from sorted records
//! - [`calendar`] - per-day indicators for the month view
//! - [`models`] - stored records and report structures
//! - [`store`] - keyed record store with date and vehicle lookups, JSON persistence
//! - [`fuel_types`] - user-managed fuel type vocabulary
//! - [`transfer`] - JSON/CSV export and import
//! - [`display`] - terminal and JSON output
//! - [`config`] - configuration with file and environment overrides
//! - [`logging`] - structured logging setup
//! - [`error`] - domain error types
//!
//! ## Example
//!
//! ```rust
//! use fuel_log::analytics::{AnalyticsOptions, FuelAnalyzer};
//! use fuel_log::models::FuelLogRecord;
//!
//! let records = vec![
//!     FuelLogRecord { id: 1, date: "2024-01-01".into(), odometer: 10000, amount: 40.0, ..Default::default() },
//!     FuelLogRecord { id: 2, date: "2024-01-08".into(), odometer: 10500, ..Default::default() },
//! ];
//! let report = FuelAnalyzer::new().analyze(&records, &AnalyticsOptions::default());
//! assert_eq!(report.total_distance, 500);
//! assert!((report.avg_efficiency - 8.0).abs() < 1e-9);
//! ```

pub mod analytics;
pub mod calendar;
pub mod config;
pub mod date_parser;
pub mod display;
pub mod error;
pub mod fuel_types;
pub mod logging;
pub mod models;
pub mod reconcile;
pub mod store;
pub mod transfer;

pub use analytics::FuelAnalyzer;
pub use error::FuelLogError;
pub use models::*;
