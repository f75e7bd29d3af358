use crate::error::{FuelLogError, FuelLogResult};
use anyhow::Result;
use chrono::NaiveDate;

/// Handles parsing the calendar dates stored on fuel log records
pub struct DateParser;

impl DateParser {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Parse a `YYYY-MM-DD` date string.
    /// Surrounding whitespace is ignored; a trailing time component
    /// (`2024-01-01T08:30:00`) from older exports is tolerated and dropped.
    pub fn parse(date_str: &str) -> Result<NaiveDate> {
        let trimmed = date_str.trim();
        let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);

        if let Ok(date) = NaiveDate::parse_from_str(date_part, Self::FORMAT) {
            return Ok(date);
        }

        anyhow::bail!("Failed to parse date: {}", date_str)
    }

    /// Parse the date of a stored record, mapping failure to
    /// [`FuelLogError::MalformedRecord`].
    pub fn parse_record_date(id: u64, date_str: &str) -> FuelLogResult<NaiveDate> {
        Self::parse(date_str).map_err(|_| FuelLogError::MalformedRecord {
            id,
            date: date_str.to_string(),
        })
    }

    /// Parse a `YYYY-MM` month selector into (year, month).
    pub fn parse_month(month_str: &str) -> Result<(i32, u32)> {
        let first_day = format!("{}-01", month_str.trim());
        match NaiveDate::parse_from_str(&first_day, Self::FORMAT) {
            Ok(date) => {
                use chrono::Datelike;
                Ok((date.year(), date.month()))
            }
            Err(_) => anyhow::bail!("Failed to parse month: {}. Use YYYY-MM", month_str),
        }
    }

    pub fn format(date: NaiveDate) -> String {
        date.format(Self::FORMAT).to_string()
    }
}
