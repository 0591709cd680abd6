//! # REST API for Statistics
//!
//! Global totals, monthly trends, top performers and recent activity.
//! Query values are parsed here so bad input is a 400, not a 500.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use serde::Deserialize;
use std::str::FromStr;

use super::failure_response;
use super::mappers::{EntryMapper, GirlMapper};
use crate::backend::domain::analytics::{AnalyticsParseError, TimeRange, DEFAULT_RECENT_DAYS, DEFAULT_TOP_COUNT};
use crate::backend::domain::models::MetricField;
use crate::backend::AppState;
use shared::{MonthlyTrendsResponse, TopPerformersResponse};

#[derive(Debug, Default, Deserialize)]
pub struct MonthlyTrendsQuery {
    pub range: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopPerformersQuery {
    pub metric: Option<String>,
    pub count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentActivityQuery {
    pub days: Option<String>,
}

pub async fn global_stats(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/stats/global");

    match state.stats_service.global_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => failure_response("compute global stats", e),
    }
}

pub async fn monthly_trends(
    State(state): State<AppState>,
    Query(query): Query<MonthlyTrendsQuery>,
) -> impl IntoResponse {
    info!("GET /api/stats/monthly - range: {:?}", query.range);

    let range = match parse_or_default::<TimeRange>(query.range.as_deref(), TimeRange::All) {
        Ok(range) => range,
        Err(e) => return failure_response("parse time range", e.into()),
    };

    match state.stats_service.monthly_trends(range).await {
        Ok(months) => (StatusCode::OK, Json(MonthlyTrendsResponse { months })).into_response(),
        Err(e) => failure_response("compute monthly trends", e),
    }
}

pub async fn top_performers(
    State(state): State<AppState>,
    Query(query): Query<TopPerformersQuery>,
) -> impl IntoResponse {
    info!("GET /api/stats/top - metric: {:?}, count: {:?}", query.metric, query.count);

    let metric = match query.metric.as_deref() {
        Some(metric) => match metric.parse::<MetricField>() {
            Ok(metric) => metric,
            Err(e) => return failure_response("parse metric", AnalyticsParseError::from(e).into()),
        },
        None => MetricField::CostPerNut,
    };
    let count = match parse_count::<usize>(query.count.as_deref(), DEFAULT_TOP_COUNT) {
        Ok(count) => count,
        Err(e) => return failure_response("parse count", e.into()),
    };

    match state.stats_service.top_performers(metric, count).await {
        Ok(girls) => (
            StatusCode::OK,
            Json(TopPerformersResponse {
                metric: metric.as_str().to_string(),
                girls: GirlMapper::to_metrics_list_dto(girls).girls,
            }),
        )
            .into_response(),
        Err(e) => failure_response("compute top performers", e),
    }
}

pub async fn recent_activity(
    State(state): State<AppState>,
    Query(query): Query<RecentActivityQuery>,
) -> impl IntoResponse {
    info!("GET /api/stats/recent - days: {:?}", query.days);

    let days = match parse_count::<u32>(query.days.as_deref(), DEFAULT_RECENT_DAYS) {
        Ok(days) => days,
        Err(e) => return failure_response("parse days", e.into()),
    };

    match state.stats_service.recent_activity(days).await {
        Ok(entries) => (StatusCode::OK, Json(EntryMapper::to_entry_list_dto(entries))).into_response(),
        Err(e) => failure_response("list recent activity", e),
    }
}

fn parse_or_default<T>(value: Option<&str>, default: T) -> Result<T, AnalyticsParseError>
where
    T: FromStr<Err = AnalyticsParseError>,
{
    value.map(str::parse).unwrap_or(Ok(default))
}

/// Parse a non-negative count into the width the service takes, so values
/// that do not fit are rejected instead of clamped
fn parse_count<T: FromStr>(value: Option<&str>, default: T) -> Result<T, AnalyticsParseError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AnalyticsParseError::InvalidCount(raw.to_string())),
        None => Ok(default),
    }
}
