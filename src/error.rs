//! Domain error types
//!
//! Errors raised by the store, the save path and the import boundary. The
//! pure computation modules ([`crate::reconcile`], [`crate::analytics`]) do
//! not fail: malformed records are skipped and empty denominators report zero.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FuelLogError {
    /// A save was rejected because the record or form data is incomplete.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: u64 },

    /// A stored record whose date cannot be interpreted.
    #[error("record {id} has a malformed date {date:?}")]
    MalformedRecord { id: u64, date: String },

    #[error("invalid import data: {0}")]
    ImportFormat(String),
}

impl FuelLogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type FuelLogResult<T> = std::result::Result<T, FuelLogError>;
