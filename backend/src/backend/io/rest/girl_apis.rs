//! # REST API for Girl Management
//!
//! Endpoints for creating, retrieving, updating and deleting girls, plus the
//! per-girl metrics views.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use serde::Deserialize;

use super::mappers::GirlMapper;
use super::{error_response, failure_response, ApiJson};
use crate::backend::domain::analytics::{AnalyticsParseError, GirlSortField, SortDirection};
use crate::backend::domain::commands::girl::{CreateGirlCommand, UpdateGirlCommand};
use crate::backend::domain::models::NotFoundError;
use crate::backend::AppState;
use shared::{CreateGirlRequest, DeleteGirlResponse, UpdateGirlRequest};

#[derive(Debug, Default, Deserialize)]
pub struct GirlMetricsQuery {
    pub sort: Option<String>,
    pub direction: Option<String>,
}

/// Create a new girl
pub async fn create_girl(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateGirlRequest>,
) -> impl IntoResponse {
    info!("POST /api/girls - name: {}", request.name);

    let command = CreateGirlCommand {
        name: request.name,
        age: request.age,
        nationality: request.nationality,
        ethnicity: request.ethnicity,
        hair_color: request.hair_color,
        rating: request.rating,
    };

    match state.girl_service.create_girl(command).await {
        Ok(girl) => (
            StatusCode::CREATED,
            Json(GirlMapper::to_girl_response_dto(girl, "Girl created successfully")),
        )
            .into_response(),
        Err(e) => failure_response("create girl", e),
    }
}

/// Get a girl by ID
pub async fn get_girl(State(state): State<AppState>, Path(girl_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/girls/{}", girl_id);

    match state.girl_service.get_girl(&girl_id).await {
        Ok(Some(girl)) => (StatusCode::OK, Json(GirlMapper::to_dto(girl))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, NotFoundError::Girl(girl_id).to_string()),
        Err(e) => failure_response("get girl", e),
    }
}

/// List all girls
pub async fn list_girls(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/girls");

    match state.girl_service.list_girls().await {
        Ok(girls) => (StatusCode::OK, Json(GirlMapper::to_girl_list_dto(girls))).into_response(),
        Err(e) => failure_response("list girls", e),
    }
}

/// Replace a girl's editable fields
pub async fn update_girl(
    State(state): State<AppState>,
    Path(girl_id): Path<String>,
    ApiJson(request): ApiJson<UpdateGirlRequest>,
) -> impl IntoResponse {
    info!("PUT /api/girls/{} - request: {:?}", girl_id, request);

    let command = UpdateGirlCommand {
        name: request.name,
        age: request.age,
        nationality: request.nationality,
        ethnicity: request.ethnicity,
        hair_color: request.hair_color,
        rating: request.rating,
    };

    match state.girl_service.update_girl(&girl_id, command).await {
        Ok(girl) => (
            StatusCode::OK,
            Json(GirlMapper::to_girl_response_dto(girl, "Girl updated successfully")),
        )
            .into_response(),
        Err(e) => failure_response("update girl", e),
    }
}

/// Delete a girl together with her entries
pub async fn delete_girl(State(state): State<AppState>, Path(girl_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/girls/{}", girl_id);

    match state.girl_service.delete_girl(&girl_id).await {
        Ok(deleted_entries) => (
            StatusCode::OK,
            Json(DeleteGirlResponse {
                deleted_entries,
                success_message: "Girl deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => failure_response("delete girl", e),
    }
}

/// All girls with their metrics, sorted
pub async fn list_girls_with_metrics(
    State(state): State<AppState>,
    Query(query): Query<GirlMetricsQuery>,
) -> impl IntoResponse {
    info!("GET /api/girls/metrics - {:?}", query);

    let sort = match parse_sort(&query) {
        Ok(sort) => sort,
        Err(e) => return failure_response("parse sort", e.into()),
    };

    match state.stats_service.girls_with_metrics(sort).await {
        Ok(girls) => (StatusCode::OK, Json(GirlMapper::to_metrics_list_dto(girls))).into_response(),
        Err(e) => failure_response("list girls with metrics", e),
    }
}

/// One girl with her metrics
pub async fn get_girl_metrics(State(state): State<AppState>, Path(girl_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/girls/{}/metrics", girl_id);

    match state.stats_service.girl_metrics(&girl_id).await {
        Ok(girl) => (StatusCode::OK, Json(GirlMapper::to_metrics_dto(girl))).into_response(),
        Err(e) => failure_response("get girl metrics", e),
    }
}

fn parse_sort(query: &GirlMetricsQuery) -> Result<Option<(GirlSortField, SortDirection)>, AnalyticsParseError> {
    if query.sort.is_none() && query.direction.is_none() {
        return Ok(None);
    }
    let field = match query.sort.as_deref() {
        Some(sort) => sort.parse::<GirlSortField>()?,
        None => GirlSortField::default(),
    };
    let direction = match query.direction.as_deref() {
        Some(direction) => direction.parse::<SortDirection>()?,
        None => SortDirection::default(),
    };
    Ok(Some((field, direction)))
}
