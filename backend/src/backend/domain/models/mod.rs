//! Domain models for girls, entries and derived metrics.

pub mod entry;
pub mod girl;
pub mod metrics;

pub use entry::{DataEntry, EntryValidationError};
pub use girl::{Girl, GirlValidationError};
pub use metrics::{CalculatedMetrics, GirlWithMetrics, GlobalStats, MetricField, MonthlyTrend};

/// Returned when an id does not resolve to a stored record
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotFoundError {
    #[error("Girl not found: {0}")]
    Girl(String),
    #[error("Entry not found: {0}")]
    Entry(String),
}
