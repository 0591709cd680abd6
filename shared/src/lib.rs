use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tracked profile as stored on disk and sent over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Girl {
    pub id: String,
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<String>,
    #[serde(default)]
    pub hair_color: Option<String>,
    /// 5.0-10.0 in 0.5 increments
    pub rating: f64,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

/// A dated activity record attached to one girl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEntry {
    pub id: String,
    pub girl_id: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    pub amount_spent: f64,
    pub duration_minutes: u32,
    pub number_of_nuts: u32,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

/// Derived metrics over a set of entries. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculatedMetrics {
    pub total_spent: f64,
    pub total_nuts: u64,
    /// Minutes
    pub total_time: u64,
    pub cost_per_nut: f64,
    /// Minutes per nut
    pub time_per_nut: f64,
    pub cost_per_hour: f64,
}

/// A girl together with the metrics of her entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirlWithMetrics {
    #[serde(flatten)]
    pub girl: Girl,
    pub metrics: CalculatedMetrics,
    pub total_entries: usize,
}

/// Statistics across every girl and entry
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_girls: usize,
    pub active_girls: usize,
    pub total_spent: f64,
    pub total_nuts: u64,
    pub total_time: u64,
    pub average_rating: f64,
}

/// Aggregated activity for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// "YYYY-MM"
    pub month: String,
    pub spent: f64,
    pub nuts: u64,
    pub time: u64,
    pub entries: usize,
    pub cost_per_nut: f64,
    pub cost_per_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGirlRequest {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<String>,
    #[serde(default)]
    pub hair_color: Option<String>,
    pub rating: f64,
}

/// Full-field update of an existing girl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateGirlRequest {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<String>,
    #[serde(default)]
    pub hair_color: Option<String>,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirlResponse {
    pub girl: Girl,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirlListResponse {
    pub girls: Vec<Girl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteGirlResponse {
    pub deleted_entries: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirlMetricsListResponse {
    pub girls: Vec<GirlWithMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub girl_id: String,
    /// YYYY-MM-DD
    pub date: String,
    pub amount_spent: f64,
    pub duration_minutes: u32,
    pub number_of_nuts: u32,
}

/// Full-field update of an existing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
    pub girl_id: String,
    /// YYYY-MM-DD
    pub date: String,
    pub amount_spent: f64,
    pub duration_minutes: u32,
    pub number_of_nuts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryResponse {
    pub entry: DataEntry,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryListResponse {
    pub entries: Vec<DataEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendsResponse {
    pub months: Vec<MonthlyTrend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformersResponse {
    pub metric: String,
    pub girls: Vec<GirlWithMetrics>,
}

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownExportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(UnknownExportFormat(other.to_string())),
        }
    }
}

impl TryFrom<String> for ExportFormat {
    type Error = UnknownExportFormat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownExportFormat(pub String);

impl fmt::Display for UnknownExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown export format: {}", self.0)
    }
}

impl std::error::Error for UnknownExportFormat {}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDataRequest {
    pub format: ExportFormat,
    #[serde(default = "default_true")]
    pub include_girls: bool,
    #[serde(default = "default_true")]
    pub include_entries: bool,
    #[serde(default = "default_true")]
    pub include_metrics: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDataResponse {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAllDataResponse {
    pub deleted_girls: usize,
    pub deleted_entries: usize,
    pub success_message: String,
}

/// Error body returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
