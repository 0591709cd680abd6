//! Domain model for a tracked girl.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Girl {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub nationality: Option<String>,
    pub ethnicity: Option<String>,
    pub hair_color: Option<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Girl {
    pub const MIN_AGE: u32 = 18;
    pub const MIN_RATING: f64 = 5.0;
    pub const MAX_RATING: f64 = 10.0;
    pub const MAX_NAME_LENGTH: usize = 100;

    /// Generate a unique ID for a girl
    pub fn generate_id() -> String {
        format!("girl::{}", Uuid::new_v4())
    }

    /// Check name, age and rating against the profile rules
    pub fn validate_fields(name: &str, age: u32, rating: f64) -> Result<(), GirlValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GirlValidationError::EmptyName);
        }
        if name.chars().count() > Self::MAX_NAME_LENGTH {
            return Err(GirlValidationError::NameTooLong(Self::MAX_NAME_LENGTH));
        }
        if age < Self::MIN_AGE {
            return Err(GirlValidationError::Underage(age));
        }
        Self::validate_rating(rating)
    }

    /// Ratings live on a 0.5 grid inside [5.0, 10.0]
    pub fn validate_rating(rating: f64) -> Result<(), GirlValidationError> {
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating) {
            return Err(GirlValidationError::RatingOutOfRange(rating));
        }
        if (rating * 2.0).fract() != 0.0 {
            return Err(GirlValidationError::RatingNotOnHalfStep(rating));
        }
        Ok(())
    }

    /// Trim optional free-text attributes, treating blanks as absent
    pub fn normalize_attribute(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GirlValidationError {
    #[error("Name is required")]
    EmptyName,
    #[error("Name cannot exceed {0} characters")]
    NameTooLong(usize),
    #[error("Age must be 18 or older (got {0})")]
    Underage(u32),
    #[error("Rating must be between 5.0 and 10.0 (got {0})")]
    RatingOutOfRange(f64),
    #[error("Rating must be in 0.5 increments (got {0})")]
    RatingNotOnHalfStep(f64),
}
