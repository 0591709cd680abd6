//! Derived metric types. Nothing here is ever persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::girl::Girl;

pub use shared::{CalculatedMetrics, GlobalStats, MonthlyTrend};

/// A girl together with the metrics of her entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirlWithMetrics {
    pub girl: Girl,
    pub metrics: CalculatedMetrics,
    pub total_entries: usize,
}

/// One numeric field of [`CalculatedMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricField {
    TotalSpent,
    TotalNuts,
    TotalTime,
    CostPerNut,
    TimePerNut,
    CostPerHour,
}

impl MetricField {
    pub const ALL: [MetricField; 6] = [
        MetricField::TotalSpent,
        MetricField::TotalNuts,
        MetricField::TotalTime,
        MetricField::CostPerNut,
        MetricField::TimePerNut,
        MetricField::CostPerHour,
    ];

    pub fn value(&self, metrics: &CalculatedMetrics) -> f64 {
        match self {
            MetricField::TotalSpent => metrics.total_spent,
            MetricField::TotalNuts => metrics.total_nuts as f64,
            MetricField::TotalTime => metrics.total_time as f64,
            MetricField::CostPerNut => metrics.cost_per_nut,
            MetricField::TimePerNut => metrics.time_per_nut,
            MetricField::CostPerHour => metrics.cost_per_hour,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricField::TotalSpent => "total_spent",
            MetricField::TotalNuts => "total_nuts",
            MetricField::TotalTime => "total_time",
            MetricField::CostPerNut => "cost_per_nut",
            MetricField::TimePerNut => "time_per_nut",
            MetricField::CostPerHour => "cost_per_hour",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown metric: {0}")]
pub struct UnknownMetricError(pub String);

impl FromStr for MetricField {
    type Err = UnknownMetricError;

    /// Accepts snake_case and the camelCase names used by older clients
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "total_spent" | "totalSpent" => Ok(MetricField::TotalSpent),
            "total_nuts" | "totalNuts" => Ok(MetricField::TotalNuts),
            "total_time" | "totalTime" => Ok(MetricField::TotalTime),
            "cost_per_nut" | "costPerNut" => Ok(MetricField::CostPerNut),
            "time_per_nut" | "timePerNut" => Ok(MetricField::TimePerNut),
            "cost_per_hour" | "costPerHour" => Ok(MetricField::CostPerHour),
            other => Err(UnknownMetricError(other.to_string())),
        }
    }
}
