//! Ordering, filtering and bucketing helpers consumed by the overview and
//! analytics views.
//!
//! Sorting takes a typed accessor instead of a string path. String paths
//! coming from the API ("metrics.cost_per_nut") are parsed once into a
//! [`GirlSortField`].

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use icu_collator::{Collator, CollatorOptions, Strength};
use log::warn;
use serde::{Deserialize, Serialize};

use super::calculations::{round_currency, Totals};
use super::models::metrics::UnknownMetricError;
use super::models::{DataEntry, Girl, GirlWithMetrics, MetricField, MonthlyTrend};

pub const DEFAULT_TOP_COUNT: usize = 5;
pub const DEFAULT_RECENT_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyticsParseError {
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),
    #[error(transparent)]
    UnknownMetric(#[from] UnknownMetricError),
    #[error("Sort direction must be 'asc' or 'desc' (got '{0}')")]
    InvalidDirection(String),
    #[error("Time range must be 'all' or a number of days (got '{0}')")]
    InvalidTimeRange(String),
    #[error("Expected a non-negative whole number (got '{0}')")]
    InvalidCount(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = AnalyticsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(AnalyticsParseError::InvalidDirection(s.to_string())),
        }
    }
}

/// Locale-aware text ordering that ignores case. Accents only break ties,
/// so "Élodie" sorts between "Ana" and "Zoe".
pub struct TextCollator {
    collator: Option<Collator>,
}

impl TextCollator {
    pub fn new() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        let collator = match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(e) => {
                warn!("Collation data unavailable, ordering text by lowercase: {}", e);
                None
            }
        };
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        }
    }
}

impl Default for TextCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// Order girls by name in place. Kept synchronous so the collator never
/// lives across an await point.
pub fn sort_by_name(girls: &mut [Girl]) {
    let collator = TextCollator::new();
    girls.sort_by(|a, b| collator.compare(&a.name, &b.name));
}

/// A value extracted from an item for comparison
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    Missing,
}

impl SortValue {
    /// Mixed or missing kinds compare equal so the stable sort leaves them in place
    fn compare(&self, other: &SortValue, collator: &TextCollator) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => collator.compare(a, b),
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Stable sort by an extracted key. Returns a new vector; `items` is untouched.
pub fn sort_by_field<T, F>(items: &[T], key: F, direction: SortDirection) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> SortValue,
{
    let collator = TextCollator::new();
    let mut keyed: Vec<(SortValue, &T)> = items.iter().map(|item| (key(item), item)).collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.compare(b, &collator);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    keyed.into_iter().map(|(_, item)| item.clone()).collect()
}

/// A sortable column of the girls overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GirlSortField {
    #[default]
    Name,
    Age,
    Nationality,
    Rating,
    CreatedAt,
    UpdatedAt,
    TotalEntries,
    Metric(MetricField),
}

impl GirlSortField {
    pub fn value(&self, item: &GirlWithMetrics) -> SortValue {
        let girl = &item.girl;
        match self {
            GirlSortField::Name => SortValue::Text(girl.name.clone()),
            GirlSortField::Age => SortValue::Number(f64::from(girl.age)),
            GirlSortField::Nationality => girl
                .nationality
                .clone()
                .map(SortValue::Text)
                .unwrap_or(SortValue::Missing),
            GirlSortField::Rating => SortValue::Number(girl.rating),
            GirlSortField::CreatedAt => SortValue::Date(girl.created_at),
            GirlSortField::UpdatedAt => SortValue::Date(girl.updated_at),
            GirlSortField::TotalEntries => SortValue::Number(item.total_entries as f64),
            GirlSortField::Metric(metric) => SortValue::Number(metric.value(&item.metrics)),
        }
    }
}

impl fmt::Display for GirlSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GirlSortField::Name => f.write_str("name"),
            GirlSortField::Age => f.write_str("age"),
            GirlSortField::Nationality => f.write_str("nationality"),
            GirlSortField::Rating => f.write_str("rating"),
            GirlSortField::CreatedAt => f.write_str("created_at"),
            GirlSortField::UpdatedAt => f.write_str("updated_at"),
            GirlSortField::TotalEntries => f.write_str("total_entries"),
            GirlSortField::Metric(metric) => write!(f, "metrics.{}", metric),
        }
    }
}

impl FromStr for GirlSortField {
    type Err = AnalyticsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(metric) = s.strip_prefix("metrics.") {
            return Ok(GirlSortField::Metric(metric.parse()?));
        }
        match s {
            "name" => Ok(GirlSortField::Name),
            "age" => Ok(GirlSortField::Age),
            "nationality" => Ok(GirlSortField::Nationality),
            "rating" => Ok(GirlSortField::Rating),
            "created_at" | "createdAt" => Ok(GirlSortField::CreatedAt),
            "updated_at" | "updatedAt" => Ok(GirlSortField::UpdatedAt),
            "total_entries" | "totalEntries" => Ok(GirlSortField::TotalEntries),
            other => Err(AnalyticsParseError::UnknownSortField(other.to_string())),
        }
    }
}

pub fn sort_girls(
    girls: &[GirlWithMetrics],
    field: GirlSortField,
    direction: SortDirection,
) -> Vec<GirlWithMetrics> {
    sort_by_field(girls, |girl| field.value(girl), direction)
}

/// Girls with at least one entry, highest `metric` first, at most `count`
pub fn top_performers(
    girls: &[GirlWithMetrics],
    metric: MetricField,
    count: usize,
) -> Vec<GirlWithMetrics> {
    let mut active: Vec<&GirlWithMetrics> = girls.iter().filter(|g| g.total_entries > 0).collect();
    active.sort_by(|a, b| {
        metric
            .value(&b.metrics)
            .partial_cmp(&metric.value(&a.metrics))
            .unwrap_or(Ordering::Equal)
    });
    active.into_iter().take(count).cloned().collect()
}

/// First day still inside a window of `days` ending at `today`
fn cutoff_date(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Entries dated on or after `today - days`, in their original order
pub fn entries_since(entries: &[DataEntry], days: u32, today: NaiveDate) -> Vec<DataEntry> {
    let cutoff = cutoff_date(today, days);
    entries
        .iter()
        .filter(|entry| entry.date >= cutoff)
        .cloned()
        .collect()
}

/// Entries from the last `days` calendar days, newest first.
/// An entry dated exactly `days` ago is included.
pub fn recent_activity(entries: &[DataEntry], days: u32, today: NaiveDate) -> Vec<DataEntry> {
    let mut recent = entries_since(entries, days, today);
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent
}

/// Analytics time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    All,
    Days(u32),
}

impl TimeRange {
    pub fn apply(&self, entries: &[DataEntry], today: NaiveDate) -> Vec<DataEntry> {
        match self {
            TimeRange::All => entries.to_vec(),
            TimeRange::Days(days) => entries_since(entries, *days, today),
        }
    }
}

impl FromStr for TimeRange {
    type Err = AnalyticsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(TimeRange::All);
        }
        s.parse::<u32>()
            .map(TimeRange::Days)
            .map_err(|_| AnalyticsParseError::InvalidTimeRange(s.to_string()))
    }
}

/// "YYYY-MM" key of a date
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Bucket entries per calendar month, oldest month first.
///
/// Money fields are rounded to cents exactly like per-girl metrics.
pub fn monthly_trends(entries: &[DataEntry]) -> Vec<MonthlyTrend> {
    let mut months: BTreeMap<String, Totals> = BTreeMap::new();
    for entry in entries {
        months.entry(month_key(entry.date)).or_default().add(entry);
    }

    months
        .into_iter()
        .map(|(month, totals)| MonthlyTrend {
            month,
            spent: round_currency(totals.spent),
            nuts: totals.nuts,
            time: totals.time,
            entries: totals.entries,
            cost_per_nut: round_currency(totals.cost_per_nut()),
            cost_per_hour: round_currency(totals.cost_per_hour()),
        })
        .collect()
}
