//! Export and bulk deletion of everything the tracker stores.

use anyhow::{anyhow, Context, Result};
use chrono::{Local, Utc};
use csv::WriterBuilder;
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::iter;
use std::sync::Arc;

use shared::ExportFormat;

use crate::backend::domain::calculations::{calculate_metrics, girls_with_metrics};
use crate::backend::domain::commands::data::{DeletedData, ExportOptions, ExportedFile};
use crate::backend::domain::analytics::sort_by_name;
use crate::backend::domain::formatting::format_currency;
use crate::backend::domain::models::{CalculatedMetrics, DataEntry, Girl};
use crate::backend::io::rest::mappers::{EntryMapper, GirlMapper};
use crate::backend::storage::{EntryStorage, GirlStorage};

pub const EXPORT_VERSION: &str = "1.0";

const GIRLS_SECTION_TITLE: &str = "Girls Data";
const GIRLS_SECTION_HEADER: [&str; 10] = [
    "Name",
    "Age",
    "Nationality",
    "Ethnicity",
    "Hair Color",
    "Rating",
    "Created",
    "Total Spent",
    "Total Nuts",
    "Cost Per Nut",
];

const ENTRIES_SECTION_TITLE: &str = "Data Entries";
const ENTRIES_SECTION_HEADER: [&str; 7] = [
    "Girl Name",
    "Date",
    "Amount Spent",
    "Duration (minutes)",
    "Number of Nuts",
    "Cost Per Nut",
    "Cost Per Hour",
];

#[derive(Serialize)]
struct JsonExport {
    export_date: String,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    girls: Option<Vec<shared::Girl>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_entries: Option<Vec<shared::DataEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    calculated_metrics: Option<Vec<GirlMetricsRecord>>,
}

#[derive(Serialize)]
struct GirlMetricsRecord {
    girl_id: String,
    girl_name: String,
    #[serde(flatten)]
    metrics: CalculatedMetrics,
    entries_count: usize,
}

/// Service for exporting and wiping stored data
#[derive(Clone)]
pub struct DataManagementService {
    girls: Arc<dyn GirlStorage>,
    entries: Arc<dyn EntryStorage>,
}

impl DataManagementService {
    pub fn new(girls: Arc<dyn GirlStorage>, entries: Arc<dyn EntryStorage>) -> Self {
        Self { girls, entries }
    }

    /// Render the stored data in the requested format
    pub async fn export(&self, options: ExportOptions) -> Result<ExportedFile> {
        info!(
            "📄 EXPORT: format={}, girls={}, entries={}, metrics={}",
            options.format, options.include_girls, options.include_entries, options.include_metrics
        );

        let mut girls = self.girls.list_girls().await?;
        sort_by_name(&mut girls);
        let mut entries = self.entries.list_entries().await?;
        entries.sort_by(|a, b| a.date.cmp(&b.date));

        let content = match options.format {
            ExportFormat::Csv => render_csv(&girls, &entries, &options)?,
            ExportFormat::Json => render_json(girls, entries, &options)?,
        };

        let filename = format!(
            "cpn-data-{}.{}",
            Local::now().format("%Y-%m-%d"),
            options.format.extension()
        );
        info!("✅ EXPORT: generated {} ({} bytes)", filename, content.len());

        Ok(ExportedFile {
            filename,
            mime_type: options.format.mime_type().to_string(),
            content,
        })
    }

    /// Remove every girl and entry in one store operation
    pub async fn delete_all_data(&self) -> Result<DeletedData> {
        let entries = self.entries.list_entries().await?;
        let total_spent: f64 = entries.iter().map(|e| e.amount_spent).sum();

        let deleted = self.girls.delete_all_girls().await?;

        info!(
            "🗑️ Deleted all data: {} girls, {} entries ({} tracked)",
            deleted.girls,
            deleted.entries,
            format_currency(total_spent)
        );
        Ok(DeletedData {
            girls: deleted.girls,
            entries: deleted.entries,
        })
    }
}

fn render_csv(girls: &[Girl], entries: &[DataEntry], options: &ExportOptions) -> Result<String> {
    let mut sections = Vec::new();

    if options.include_girls {
        let rows = girls_with_metrics(girls, entries).into_iter().map(|g| {
            vec![
                g.girl.name,
                g.girl.age.to_string(),
                g.girl.nationality.unwrap_or_default(),
                g.girl.ethnicity.unwrap_or_default(),
                g.girl.hair_color.unwrap_or_default(),
                g.girl.rating.to_string(),
                g.girl.created_at.to_rfc3339(),
                g.metrics.total_spent.to_string(),
                g.metrics.total_nuts.to_string(),
                g.metrics.cost_per_nut.to_string(),
            ]
        });
        sections.push(render_section(GIRLS_SECTION_TITLE, &GIRLS_SECTION_HEADER, rows)?);
    }

    if options.include_entries {
        let names: HashMap<&str, &str> = girls.iter().map(|g| (g.id.as_str(), g.name.as_str())).collect();
        let rows = entries.iter().map(|entry| {
            let metrics = calculate_metrics(iter::once(entry));
            vec![
                names.get(entry.girl_id.as_str()).copied().unwrap_or("Unknown").to_string(),
                entry.date.format(DataEntry::DATE_FORMAT).to_string(),
                entry.amount_spent.to_string(),
                entry.duration_minutes.to_string(),
                entry.number_of_nuts.to_string(),
                metrics.cost_per_nut.to_string(),
                metrics.cost_per_hour.to_string(),
            ]
        });
        sections.push(render_section(ENTRIES_SECTION_TITLE, &ENTRIES_SECTION_HEADER, rows)?);
    }

    Ok(sections.join("\n"))
}

/// One titled block: title line, header row, data rows
fn render_section<I>(title: &str, header: &[&str], rows: I) -> Result<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush {} section: {}", title, e))?;
    let body = String::from_utf8(bytes).context("Export CSV is not valid UTF-8")?;
    Ok(format!("{}\n{}", title, body))
}

fn render_json(girls: Vec<Girl>, entries: Vec<DataEntry>, options: &ExportOptions) -> Result<String> {
    let calculated_metrics = options.include_metrics.then(|| {
        girls_with_metrics(&girls, &entries)
            .into_iter()
            .map(|g| GirlMetricsRecord {
                girl_id: g.girl.id,
                girl_name: g.girl.name,
                metrics: g.metrics,
                entries_count: g.total_entries,
            })
            .collect()
    });

    let export = JsonExport {
        export_date: Utc::now().to_rfc3339(),
        version: EXPORT_VERSION,
        girls: options
            .include_girls
            .then(|| girls.into_iter().map(GirlMapper::to_dto).collect()),
        data_entries: options
            .include_entries
            .then(|| entries.into_iter().map(EntryMapper::to_dto).collect()),
        calculated_metrics,
    };

    serde_json::to_string_pretty(&export).context("Failed to serialize JSON export")
}
