//! # REST API Interface Layer
//!
//! Local HTTP endpoints under `/api`. Handlers translate DTOs into domain
//! commands, call a service and map the outcome onto a status code.
//!
//! Errors are returned as `{"error": "..."}`. The status is picked from the
//! typed error found in the `anyhow` chain:
//! - validation and query parse errors, malformed bodies: 400
//! - unknown ids: 404
//! - anything else: 500

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, warn};
use serde::de::DeserializeOwned;

use crate::backend::domain::analytics::AnalyticsParseError;
use crate::backend::domain::models::{EntryValidationError, GirlValidationError, NotFoundError};
use shared::ErrorResponse;

pub mod data_apis;
pub mod entry_apis;
pub mod girl_apis;
pub mod mappers;
pub mod stats_apis;

/// Pick the HTTP status for a service error
pub fn status_for(error: &anyhow::Error) -> StatusCode {
    for cause in error.chain() {
        if cause.is::<NotFoundError>() {
            return StatusCode::NOT_FOUND;
        }
        if cause.is::<GirlValidationError>()
            || cause.is::<EntryValidationError>()
            || cause.is::<AnalyticsParseError>()
        {
            return StatusCode::BAD_REQUEST;
        }
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

/// `Json` body extractor whose rejections (bad syntax, wrong types, negative
/// counts, missing fields, wrong content type) become `{"error": ...}` 400s
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let message = rejection.body_text();
                warn!("Rejected request body: {}", message);
                Err(error_response(StatusCode::BAD_REQUEST, message))
            }
        }
    }
}

/// Log a failed operation and turn it into a JSON error response
pub fn failure_response(operation: &str, e: anyhow::Error) -> Response {
    let status = status_for(&e);
    if status.is_server_error() {
        error!("Failed to {}: {:#}", operation, e);
    } else {
        warn!("Failed to {}: {:#}", operation, e);
    }
    error_response(status, format!("{:#}", e))
}
