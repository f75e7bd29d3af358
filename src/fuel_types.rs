//! User-managed vocabulary of fuel type labels.

use crate::error::{FuelLogError, FuelLogResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FUEL_TYPES: &[&str] = &["Petrol (91)", "Petrol (95)", "Diesel"];

/// Ordered set of labels. Insertion order is kept on disk; [`FuelTypes::sorted`]
/// gives the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuelTypes(Vec<String>);

impl Default for FuelTypes {
    fn default() -> Self {
        Self(DEFAULT_FUEL_TYPES.iter().map(|s| s.to_string()).collect())
    }
}

impl FuelTypes {
    /// Build from labels, dropping blanks and duplicates.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut types = Self(Vec::new());
        for label in labels {
            let _ = types.add(label.as_ref());
        }
        types
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|t| t == label)
    }

    pub fn sorted(&self) -> Vec<String> {
        let mut labels = self.0.clone();
        labels.sort();
        labels
    }

    /// Add a label. Returns `false` when it was already present.
    pub fn add(&mut self, label: &str) -> FuelLogResult<bool> {
        let label = normalize(label)?;
        if self.contains(&label) {
            return Ok(false);
        }
        self.0.push(label);
        Ok(true)
    }

    /// Rename in place. If the new name already exists the old entry is
    /// dropped instead of creating a duplicate.
    pub fn rename(&mut self, old: &str, new: &str) -> FuelLogResult<()> {
        let new = normalize(new)?;
        let Some(index) = self.0.iter().position(|t| t == old) else {
            return Err(FuelLogError::validation(format!("unknown fuel type {:?}", old)));
        };

        if old == new {
            return Ok(());
        }
        if self.contains(&new) {
            self.0.remove(index);
        } else {
            self.0[index] = new;
        }
        Ok(())
    }

    /// Remove a label. Returns `false` when it was not present.
    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != label);
        self.0.len() != before
    }
}

fn normalize(label: &str) -> FuelLogResult<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(FuelLogError::validation("fuel type name cannot be empty"));
    }
    Ok(label.to_string())
}
