//! # REST API for Data Management
//!
//! Export of all stored data and the "delete everything" operation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{info, warn};

use super::{failure_response, ApiJson};
use crate::backend::domain::commands::data::ExportOptions;
use crate::backend::AppState;
use shared::{DeleteAllDataResponse, ExportDataRequest, ExportDataResponse};

/// Render an export the caller can save to disk
pub async fn export_data(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ExportDataRequest>,
) -> impl IntoResponse {
    info!("POST /api/export - request: {:?}", request);

    let options = ExportOptions {
        format: request.format,
        include_girls: request.include_girls,
        include_entries: request.include_entries,
        include_metrics: request.include_metrics,
    };

    match state.data_management_service.export(options).await {
        Ok(file) => (
            StatusCode::OK,
            Json(ExportDataResponse {
                filename: file.filename,
                mime_type: file.mime_type,
                content: file.content,
            }),
        )
            .into_response(),
        Err(e) => failure_response("export data", e),
    }
}

/// Wipe every girl and entry
pub async fn delete_all_data(State(state): State<AppState>) -> impl IntoResponse {
    warn!("DELETE /api/data - wiping all stored data");

    match state.data_management_service.delete_all_data().await {
        Ok(deleted) => (
            StatusCode::OK,
            Json(DeleteAllDataResponse {
                deleted_girls: deleted.girls,
                deleted_entries: deleted.entries,
                success_message: "All data deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => failure_response("delete all data", e),
    }
}
