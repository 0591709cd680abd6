//! # REST API for Data Entries

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use serde::Deserialize;

use super::mappers::EntryMapper;
use super::{error_response, failure_response, ApiJson};
use crate::backend::domain::commands::entry::{CreateEntryCommand, UpdateEntryCommand};
use crate::backend::domain::models::NotFoundError;
use crate::backend::AppState;
use shared::{CreateEntryRequest, UpdateEntryRequest};

#[derive(Debug, Default, Deserialize)]
pub struct EntryListQuery {
    pub girl_id: Option<String>,
}

/// Record a new entry
pub async fn create_entry(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateEntryRequest>,
) -> impl IntoResponse {
    info!("POST /api/entries - request: {:?}", request);

    let command = CreateEntryCommand {
        girl_id: request.girl_id,
        date: request.date,
        amount_spent: request.amount_spent,
        duration_minutes: request.duration_minutes,
        number_of_nuts: request.number_of_nuts,
    };

    match state.entry_service.create_entry(command).await {
        Ok(entry) => (
            StatusCode::CREATED,
            Json(EntryMapper::to_entry_response_dto(entry, "Entry created successfully")),
        )
            .into_response(),
        Err(e) => failure_response("create entry", e),
    }
}

/// List entries, optionally for one girl
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<EntryListQuery>,
) -> impl IntoResponse {
    info!("GET /api/entries - girl_id: {:?}", query.girl_id);

    let result = match query.girl_id.as_deref() {
        Some(girl_id) => state.entry_service.list_entries_for_girl(girl_id).await,
        None => state.entry_service.list_entries().await,
    };

    match result {
        Ok(entries) => (StatusCode::OK, Json(EntryMapper::to_entry_list_dto(entries))).into_response(),
        Err(e) => failure_response("list entries", e),
    }
}

pub async fn get_entry(State(state): State<AppState>, Path(entry_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/entries/{}", entry_id);

    match state.entry_service.get_entry(&entry_id).await {
        Ok(Some(entry)) => (StatusCode::OK, Json(EntryMapper::to_dto(entry))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, NotFoundError::Entry(entry_id).to_string()),
        Err(e) => failure_response("get entry", e),
    }
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    ApiJson(request): ApiJson<UpdateEntryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/entries/{} - request: {:?}", entry_id, request);

    let command = UpdateEntryCommand {
        girl_id: request.girl_id,
        date: request.date,
        amount_spent: request.amount_spent,
        duration_minutes: request.duration_minutes,
        number_of_nuts: request.number_of_nuts,
    };

    match state.entry_service.update_entry(&entry_id, command).await {
        Ok(entry) => (
            StatusCode::OK,
            Json(EntryMapper::to_entry_response_dto(entry, "Entry updated successfully")),
        )
            .into_response(),
        Err(e) => failure_response("update entry", e),
    }
}

pub async fn delete_entry(State(state): State<AppState>, Path(entry_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/entries/{}", entry_id);

    match state.entry_service.delete_entry(&entry_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => failure_response("delete entry", e),
    }
}
