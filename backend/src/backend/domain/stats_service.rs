use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::info;
use std::sync::Arc;

use crate::backend::domain::analytics::{self, GirlSortField, SortDirection, TimeRange};
use crate::backend::domain::calculations;
use crate::backend::domain::formatting::{format_currency, format_time};
use crate::backend::domain::models::{
    DataEntry, GirlWithMetrics, GlobalStats, MetricField, MonthlyTrend, NotFoundError,
};
use crate::backend::storage::{EntryStorage, GirlStorage};

/// Read-only statistics over the stored girls and entries.
///
/// Every call reads the store afresh; nothing is cached between calls.
#[derive(Clone)]
pub struct StatsService {
    girls: Arc<dyn GirlStorage>,
    entries: Arc<dyn EntryStorage>,
}

impl StatsService {
    pub fn new(girls: Arc<dyn GirlStorage>, entries: Arc<dyn EntryStorage>) -> Self {
        Self { girls, entries }
    }

    /// Every girl with her metrics. Defaults to name ascending.
    pub async fn girls_with_metrics(
        &self,
        sort: Option<(GirlSortField, SortDirection)>,
    ) -> Result<Vec<GirlWithMetrics>> {
        let (field, direction) = sort.unwrap_or_default();
        info!("Computing metrics for all girls, sorted by {} {:?}", field, direction);

        let girls = self.girls.list_girls().await?;
        let entries = self.entries.list_entries().await?;
        let with_metrics = calculations::girls_with_metrics(&girls, &entries);
        Ok(analytics::sort_girls(&with_metrics, field, direction))
    }

    pub async fn girl_metrics(&self, girl_id: &str) -> Result<GirlWithMetrics> {
        let girl = self
            .girls
            .get_girl(girl_id)
            .await?
            .ok_or_else(|| NotFoundError::Girl(girl_id.to_string()))?;
        let entries = self.entries.list_entries_for_girl(girl_id).await?;
        Ok(calculations::girl_with_metrics(girl, &entries))
    }

    pub async fn global_stats(&self) -> Result<GlobalStats> {
        let girls = self.girls.list_girls().await?;
        let entries = self.entries.list_entries().await?;
        let stats = calculations::global_stats(&girls, &entries);
        info!(
            "Global stats: {} girls ({} active), {} spent over {}",
            stats.total_girls,
            stats.active_girls,
            format_currency(stats.total_spent),
            format_time(stats.total_time)
        );
        Ok(stats)
    }

    /// Monthly buckets for the entries inside `range`, counted back from today
    pub async fn monthly_trends(&self, range: TimeRange) -> Result<Vec<MonthlyTrend>> {
        self.monthly_trends_as_of(range, today()).await
    }

    pub async fn monthly_trends_as_of(&self, range: TimeRange, today: NaiveDate) -> Result<Vec<MonthlyTrend>> {
        let entries = self.entries.list_entries().await?;
        let in_range = range.apply(&entries, today);
        Ok(analytics::monthly_trends(&in_range))
    }

    pub async fn top_performers(&self, metric: MetricField, count: usize) -> Result<Vec<GirlWithMetrics>> {
        info!("Top {} girls by {}", count, metric);
        let girls = self.girls.list_girls().await?;
        let entries = self.entries.list_entries().await?;
        let with_metrics = calculations::girls_with_metrics(&girls, &entries);
        Ok(analytics::top_performers(&with_metrics, metric, count))
    }

    /// Entries from the last `days` days, newest first
    pub async fn recent_activity(&self, days: u32) -> Result<Vec<DataEntry>> {
        self.recent_activity_as_of(days, today()).await
    }

    pub async fn recent_activity_as_of(&self, days: u32, today: NaiveDate) -> Result<Vec<DataEntry>> {
        let entries = self.entries.list_entries().await?;
        Ok(analytics::recent_activity(&entries, days, today))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
