//! Record Store
//!
//! A keyed record store for fuel logs and vehicles with lookups by date and by
//! vehicle. [`LogBook`] holds the collections in memory; [`LogStore`] loads and
//! persists a book as a single JSON document.
//!
//! ## Identifiers
//!
//! Ids are assigned on insert from per-collection counters that only move
//! forward, so a deleted id is never handed out again. The counters are part
//! of the persisted document.
//!
//! ## Save Path
//!
//! [`LogBook::save_log`] is the only way form input becomes a stored record.
//! It runs the field reconciler, the save-time volume derivation and the
//! validation rules before anything is written.

use crate::error::{FuelLogError, FuelLogResult};
use crate::fuel_types::FuelTypes;
use crate::models::{FuelLogRecord, Vehicle, UNKNOWN_VEHICLE};
use crate::reconcile::{self, FuelFields, LastEdited};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const FUEL_LOGS: &str = "fuel_logs";
const VEHICLES: &str = "vehicles";

/// Form input for creating or replacing a fuel log.
#[derive(Debug, Clone, Default)]
pub struct FuelLogDraft {
    pub date: Option<NaiveDate>,
    pub vehicle_id: Option<u64>,
    pub fuel_type: String,
    pub fields: FuelFields,
    pub odometer: u64,
    pub notes: String,
    pub last_edited: Option<LastEdited>,
}

impl FuelLogDraft {
    /// Draft pre-filled from a stored record, for edit-and-resave.
    pub fn from_record(record: &FuelLogRecord) -> Self {
        Self {
            date: crate::date_parser::DateParser::parse(&record.date).ok(),
            vehicle_id: record.vehicle_id,
            fuel_type: record.fuel_type.clone(),
            fields: FuelFields::new(record.price, record.total_cost, record.amount),
            odometer: record.odometer,
            notes: record.notes.clone(),
            last_edited: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogBook {
    fuel_logs: BTreeMap<u64, FuelLogRecord>,
    vehicles: BTreeMap<u64, Vehicle>,
    fuel_types: FuelTypes,
    next_log_id: u64,
    next_vehicle_id: u64,
}

impl LogBook {
    pub fn new() -> Self {
        Self {
            next_log_id: 1,
            next_vehicle_id: 1,
            ..Default::default()
        }
    }

    // ---- fuel logs ----

    pub fn logs(&self) -> Vec<FuelLogRecord> {
        self.fuel_logs.values().cloned().collect()
    }

    pub fn log_count(&self) -> usize {
        self.fuel_logs.len()
    }

    pub fn get_log(&self, id: u64) -> Option<&FuelLogRecord> {
        self.fuel_logs.get(&id)
    }

    /// Insert a new record; any id on the input is replaced.
    pub fn add_log(&mut self, mut record: FuelLogRecord) -> u64 {
        let id = self.next_log_id.max(1);
        self.next_log_id = id + 1;
        record.id = id;
        self.fuel_logs.insert(id, record);
        id
    }

    /// Replace an existing record by id.
    pub fn put_log(&mut self, record: FuelLogRecord) -> FuelLogResult<u64> {
        let id = record.id;
        match self.fuel_logs.get_mut(&id) {
            Some(slot) => {
                *slot = record;
                Ok(id)
            }
            None => Err(FuelLogError::NotFound {
                collection: FUEL_LOGS,
                id,
            }),
        }
    }

    pub fn delete_log(&mut self, id: u64) -> FuelLogResult<FuelLogRecord> {
        self.fuel_logs.remove(&id).ok_or(FuelLogError::NotFound {
            collection: FUEL_LOGS,
            id,
        })
    }

    pub fn clear_logs(&mut self) {
        self.fuel_logs.clear();
    }

    /// Records whose stored date equals `date`.
    pub fn logs_by_date(&self, date: NaiveDate) -> Vec<FuelLogRecord> {
        self.fuel_logs
            .values()
            .filter(|r| crate::date_parser::DateParser::parse(&r.date).ok() == Some(date))
            .cloned()
            .collect()
    }

    pub fn logs_by_vehicle(&self, vehicle_id: u64) -> Vec<FuelLogRecord> {
        self.fuel_logs
            .values()
            .filter(|r| r.vehicle_id == Some(vehicle_id))
            .cloned()
            .collect()
    }

    /// Validate, reconcile and store form input. Creates a record when
    /// `existing_id` is `None`, otherwise replaces that record.
    pub fn save_log(&mut self, draft: FuelLogDraft, existing_id: Option<u64>) -> FuelLogResult<u64> {
        let previous_vehicle = match existing_id {
            Some(id) => {
                let existing = self.get_log(id).ok_or(FuelLogError::NotFound {
                    collection: FUEL_LOGS,
                    id,
                })?;
                existing.vehicle_id
            }
            None => None,
        };

        let date = draft
            .date
            .ok_or_else(|| FuelLogError::validation("a date is required"))?;

        let vehicle_id = draft
            .vehicle_id
            .ok_or_else(|| FuelLogError::validation("please select a vehicle"))?;
        // An orphaned record may keep its deleted vehicle on edit
        if !self.vehicles.contains_key(&vehicle_id) && previous_vehicle != Some(vehicle_id) {
            return Err(FuelLogError::validation(format!("unknown vehicle {}", vehicle_id)));
        }

        let fields = reconcile::reconcile(draft.fields, draft.last_edited);
        let fields = reconcile::finalize_for_save(fields, draft.odometer)?;

        let record = FuelLogRecord {
            id: existing_id.unwrap_or(0),
            date: crate::date_parser::DateParser::format(date),
            vehicle_id: Some(vehicle_id),
            fuel_type: draft.fuel_type.trim().to_string(),
            price: fields.price,
            total_cost: fields.total_cost,
            amount: fields.amount,
            odometer: draft.odometer,
            notes: draft.notes.trim().to_string(),
        };

        let id = match existing_id {
            Some(_) => self.put_log(record)?,
            None => self.add_log(record),
        };
        debug!(log_id = id, vehicle_id = vehicle_id, "Fuel log saved");
        Ok(id)
    }

    // ---- vehicles ----

    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.vehicles.values().cloned().collect()
    }

    pub fn get_vehicle(&self, id: u64) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    pub fn add_vehicle(&mut self, mut vehicle: Vehicle) -> FuelLogResult<u64> {
        normalize_vehicle(&mut vehicle)?;
        let id = self.next_vehicle_id.max(1);
        self.next_vehicle_id = id + 1;
        vehicle.id = id;
        self.vehicles.insert(id, vehicle);
        Ok(id)
    }

    pub fn put_vehicle(&mut self, mut vehicle: Vehicle) -> FuelLogResult<u64> {
        normalize_vehicle(&mut vehicle)?;
        let id = vehicle.id;
        match self.vehicles.get_mut(&id) {
            Some(slot) => {
                *slot = vehicle;
                Ok(id)
            }
            None => Err(FuelLogError::NotFound {
                collection: VEHICLES,
                id,
            }),
        }
    }

    /// Remove a vehicle. Its fuel logs are kept and become orphaned.
    pub fn delete_vehicle(&mut self, id: u64) -> FuelLogResult<Vehicle> {
        let vehicle = self.vehicles.remove(&id).ok_or(FuelLogError::NotFound {
            collection: VEHICLES,
            id,
        })?;
        let orphaned = self
            .fuel_logs
            .values()
            .filter(|r| r.vehicle_id == Some(id))
            .count();
        info!(vehicle_id = id, orphaned_logs = orphaned, "Vehicle deleted");
        Ok(vehicle)
    }

    pub fn vehicle_name(&self, id: Option<u64>) -> &str {
        id.and_then(|id| self.vehicles.get(&id))
            .map(|v| v.name.as_str())
            .unwrap_or(UNKNOWN_VEHICLE)
    }

    // ---- fuel types ----

    pub fn fuel_types(&self) -> &FuelTypes {
        &self.fuel_types
    }

    pub fn fuel_types_mut(&mut self) -> &mut FuelTypes {
        &mut self.fuel_types
    }

    pub fn set_fuel_types(&mut self, fuel_types: FuelTypes) {
        self.fuel_types = fuel_types;
    }
}

fn normalize_vehicle(vehicle: &mut Vehicle) -> FuelLogResult<()> {
    vehicle.name = vehicle.name.trim().to_string();
    vehicle.make = vehicle.make.trim().to_string();
    vehicle.model = vehicle.model.trim().to_string();
    if vehicle.name.is_empty() {
        return Err(FuelLogError::validation("vehicle name is required"));
    }
    Ok(())
}

/// On-disk document.
#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    fuel_logs: Vec<FuelLogRecord>,
    #[serde(default)]
    vehicles: Vec<Vehicle>,
    #[serde(default)]
    fuel_types: FuelTypes,
    #[serde(default)]
    next_log_id: u64,
    #[serde(default)]
    next_vehicle_id: u64,
}

impl From<&LogBook> for StoreDocument {
    fn from(book: &LogBook) -> Self {
        Self {
            fuel_logs: book.fuel_logs.values().cloned().collect(),
            vehicles: book.vehicles.values().cloned().collect(),
            fuel_types: book.fuel_types.clone(),
            next_log_id: book.next_log_id,
            next_vehicle_id: book.next_vehicle_id,
        }
    }
}

impl From<StoreDocument> for LogBook {
    fn from(doc: StoreDocument) -> Self {
        let max_log = doc.fuel_logs.iter().map(|r| r.id).max().unwrap_or(0);
        let max_vehicle = doc.vehicles.iter().map(|v| v.id).max().unwrap_or(0);

        Self {
            next_log_id: doc.next_log_id.max(max_log + 1),
            next_vehicle_id: doc.next_vehicle_id.max(max_vehicle + 1),
            fuel_logs: doc.fuel_logs.into_iter().map(|r| (r.id, r)).collect(),
            vehicles: doc.vehicles.into_iter().map(|v| (v.id, v)).collect(),
            fuel_types: doc.fuel_types,
        }
    }
}

/// JSON file persistence for a [`LogBook`].
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the book. A missing file yields an empty book with the default
    /// fuel types.
    pub async fn load(&self) -> Result<LogBook> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            debug!(path = %self.path.display(), "No data file yet, starting empty");
            return Ok(LogBook::new());
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read data file: {}", self.path.display()))?;
        let doc: StoreDocument = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse data file: {}", self.path.display()))?;

        let book = LogBook::from(doc);
        debug!(
            path = %self.path.display(),
            logs = book.fuel_logs.len(),
            vehicles = book.vehicles.len(),
            "Data file loaded"
        );
        Ok(book)
    }

    /// Write the book, replacing the file atomically.
    pub async fn save(&self, book: &LogBook) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(&StoreDocument::from(book))
            .context("Failed to serialize data file")?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("Failed to write data file: {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace data file: {}", self.path.display()))?;

        Ok(())
    }
}
