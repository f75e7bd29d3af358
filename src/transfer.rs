//! Export and Import
//!
//! Two interchange formats:
//!
//! - **JSON**: `{ "fuel_logs": [...], "fuel_types": [...] }`, the full backup.
//!   Importing it replaces every fuel log and, when present, the fuel type
//!   vocabulary. Vehicles are not part of the export and are left alone.
//! - **CSV**: header `id,date,fuelType,price,totalCost,amount,odometer,notes`,
//!   one row per record in id order. Text fields (always including notes) are
//!   double-quoted with embedded quotes doubled; numbers are written bare.
//!
//! Imported records always get fresh ids from the store.

use crate::error::{FuelLogError, FuelLogResult};
use crate::fuel_types::FuelTypes;
use crate::models::FuelLogRecord;
use crate::store::LogBook;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const CSV_HEADER: [&str; 8] = [
    "id",
    "date",
    "fuelType",
    "price",
    "totalCost",
    "amount",
    "odometer",
    "notes",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ExportDocument {
    fuel_logs: Vec<FuelLogRecord>,
    fuel_types: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    id: u64,
    date: String,
    #[serde(rename = "fuelType")]
    fuel_type: String,
    price: f64,
    #[serde(rename = "totalCost")]
    total_cost: f64,
    amount: f64,
    odometer: u64,
    notes: String,
}

/// `fuel_log_export_YYYY_MM-DD_HHMM.<ext>`
pub fn export_file_name(format: ExportFormat, now: NaiveDateTime) -> String {
    format!(
        "fuel_log_export_{}.{}",
        now.format("%Y_%m-%d_%H%M"),
        format.extension()
    )
}

pub fn export(book: &LogBook, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => export_json(book),
        ExportFormat::Csv => export_csv(book),
    }
}

pub fn export_json(book: &LogBook) -> Result<String> {
    let doc = ExportDocument {
        fuel_logs: book.logs(),
        fuel_types: book.fuel_types().as_slice().to_vec(),
    };
    serde_json::to_string_pretty(&doc).context("Failed to serialize export")
}

pub fn export_csv(book: &LogBook) -> Result<String> {
    // Header stays bare; every non-numeric field below is quoted
    let mut buffer = CSV_HEADER.join(",").into_bytes();
    buffer.push(b'\n');

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(buffer);

    for record in book.logs() {
        writer.write_record([
            record.id.to_string(),
            record.date,
            record.fuel_type,
            record.price.to_string(),
            record.total_cost.to_string(),
            record.amount.to_string(),
            record.odometer.to_string(),
            record.notes,
        ])?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV export")?;
    String::from_utf8(bytes).context("CSV export is not valid UTF-8")
}

/// Replace all fuel logs (and fuel types, if present) from a JSON backup.
/// Returns the number of imported logs. The book is untouched on error.
pub fn import_json(book: &mut LogBook, text: &str) -> FuelLogResult<usize> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| FuelLogError::ImportFormat(format!("not valid JSON: {}", e)))?;

    let logs_value = value
        .as_object()
        .and_then(|obj| obj.get("fuel_logs"))
        .ok_or_else(|| {
            FuelLogError::ImportFormat(
                "expecting a JSON object with a 'fuel_logs' property".to_string(),
            )
        })?;

    let logs: Vec<FuelLogRecord> = serde_json::from_value(logs_value.clone())
        .map_err(|e| FuelLogError::ImportFormat(format!("invalid fuel_logs: {}", e)))?;

    let fuel_types = match value.get("fuel_types") {
        Some(serde_json::Value::Array(items)) => Some(FuelTypes::from_labels(
            items.iter().filter_map(|v| v.as_str()),
        )),
        _ => None,
    };

    if let Some(types) = fuel_types {
        book.set_fuel_types(types);
    }
    let count = replace_logs(book, logs);
    info!(imported = count, "Imported fuel logs from JSON");
    Ok(count)
}

/// Replace all fuel logs from a CSV export. The CSV format carries no
/// vehicle, so imported rows are unassigned.
pub fn import_csv(book: &mut LogBook, text: &str) -> FuelLogResult<usize> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FuelLogError::ImportFormat(format!("unreadable CSV header: {}", e)))?;
    if headers.iter().collect::<Vec<_>>() != CSV_HEADER {
        return Err(FuelLogError::ImportFormat(format!(
            "unexpected CSV header, expecting {}",
            CSV_HEADER.join(",")
        )));
    }

    let mut logs = Vec::new();
    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| {
            FuelLogError::ImportFormat(format!("invalid CSV row {}: {}", line + 2, e))
        })?;
        logs.push(FuelLogRecord {
            id: row.id,
            date: row.date,
            vehicle_id: None,
            fuel_type: row.fuel_type,
            price: row.price,
            total_cost: row.total_cost,
            amount: row.amount,
            odometer: row.odometer,
            notes: row.notes,
        });
    }

    let count = replace_logs(book, logs);
    info!(imported = count, "Imported fuel logs from CSV");
    Ok(count)
}

fn replace_logs(book: &mut LogBook, logs: Vec<FuelLogRecord>) -> usize {
    book.clear_logs();
    let count = logs.len();
    for record in logs {
        book.add_log(record);
    }
    count
}
