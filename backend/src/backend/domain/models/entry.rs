//! Domain model for a dated activity entry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEntry {
    pub id: String,
    pub girl_id: String,
    pub date: NaiveDate,
    pub amount_spent: f64,
    pub duration_minutes: u32,
    pub number_of_nuts: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DataEntry {
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";

    /// Generate a unique ID for an entry
    pub fn generate_id() -> String {
        format!("entry::{}", Uuid::new_v4())
    }

    /// Parse a YYYY-MM-DD date
    pub fn parse_date(date: &str) -> Result<NaiveDate, EntryValidationError> {
        NaiveDate::parse_from_str(date.trim(), Self::DATE_FORMAT)
            .map_err(|_| EntryValidationError::InvalidDate(date.to_string()))
    }

    pub fn validate_amount(amount: f64) -> Result<(), EntryValidationError> {
        if !amount.is_finite() {
            return Err(EntryValidationError::NonFiniteAmount);
        }
        if amount < 0.0 {
            return Err(EntryValidationError::NegativeAmount(amount));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntryValidationError {
    #[error("Amount spent cannot be negative (got {0})")]
    NegativeAmount(f64),
    #[error("Amount spent must be a finite number")]
    NonFiniteAmount,
    #[error("Date must be in YYYY-MM-DD format (got '{0}')")]
    InvalidDate(String),
    #[error("Entry references unknown girl: {0}")]
    UnknownGirl(String),
}
