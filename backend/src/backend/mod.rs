//! # Backend Module
//!
//! Everything below the presentation layer:
//! - **Domain**: models, the metrics aggregator and the services
//! - **Storage**: the store traits and their file and in-memory backends
//! - **IO**: the local REST API and DTO mappers
//!
//! ## Architecture
//!
//! ```text
//! Presentation (browser / desktop shell)
//!     ↓
//! IO Layer (REST API, mappers)
//!     ↓
//! Domain Layer (services, aggregator)
//!     ↓
//! Storage Layer (girls.yaml, entries.csv)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::backend::domain::{DataManagementService, EntryService, GirlService, StatsService};
use crate::backend::io::rest::{data_apis, entry_apis, girl_apis, stats_apis};
use crate::backend::storage::{Connection, EntryStorage, GirlStorage};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub girl_service: GirlService,
    pub entry_service: EntryService,
    pub stats_service: StatsService,
    pub data_management_service: DataManagementService,
}

/// Initialize the backend with all required services
pub fn initialize_backend<C: Connection>(connection: C) -> AppState {
    info!("Setting up repositories");
    let girls: Arc<dyn GirlStorage> = Arc::new(connection.create_girl_repository());
    let entries: Arc<dyn EntryStorage> = Arc::new(connection.create_entry_repository());

    info!("Setting up domain services");
    AppState {
        girl_service: GirlService::new(girls.clone()),
        entry_service: EntryService::new(girls.clone(), entries.clone()),
        stats_service: StatsService::new(girls.clone(), entries.clone()),
        data_management_service: DataManagementService::new(girls, entries),
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, allowed_origin: HeaderValue) -> Router {
    // CORS setup to allow the presentation layer to make requests
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/girls", get(girl_apis::list_girls).post(girl_apis::create_girl))
        .route("/girls/metrics", get(girl_apis::list_girls_with_metrics))
        .route(
            "/girls/:girl_id",
            get(girl_apis::get_girl)
                .put(girl_apis::update_girl)
                .delete(girl_apis::delete_girl),
        )
        .route("/girls/:girl_id/metrics", get(girl_apis::get_girl_metrics))
        .route("/entries", get(entry_apis::list_entries).post(entry_apis::create_entry))
        .route(
            "/entries/:entry_id",
            get(entry_apis::get_entry)
                .put(entry_apis::update_entry)
                .delete(entry_apis::delete_entry),
        )
        .route("/stats/global", get(stats_apis::global_stats))
        .route("/stats/monthly", get(stats_apis::monthly_trends))
        .route("/stats/top", get(stats_apis::top_performers))
        .route("/stats/recent", get(stats_apis::recent_activity))
        .route("/export", post(data_apis::export_data))
        .route("/data", delete(data_apis::delete_all_data));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::{CsvConnection, MemoryConnection};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let state = initialize_backend(MemoryConnection::new());
        create_router(state, HeaderValue::from_static("http://localhost:8080"))
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_girl(router: &Router, name: &str, rating: f64) -> String {
        let (status, body) = send(
            router,
            "POST",
            "/api/girls",
            Some(json!({ "name": name, "age": 25, "rating": rating })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["girl"]["id"].as_str().unwrap().to_string()
    }

    async fn create_entry(router: &Router, girl_id: &str, date: &str, amount: f64, minutes: u32, nuts: u32) -> String {
        let (status, body) = send(
            router,
            "POST",
            "/api/entries",
            Some(json!({
                "girl_id": girl_id,
                "date": date,
                "amount_spent": amount,
                "duration_minutes": minutes,
                "number_of_nuts": nuts,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["entry"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_girl_lifecycle() {
        let router = test_router();
        let girl_id = create_girl(&router, "Alice", 8.5).await;

        let (status, body) = send(&router, "GET", &format!("/api/girls/{}", girl_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Alice");
        assert_eq!(body["rating"], 8.5);

        let (status, body) = send(
            &router,
            "PUT",
            &format!("/api/girls/{}", girl_id),
            Some(json!({ "name": "Alicia", "age": 26, "hair_color": "Blonde", "rating": 9.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["girl"]["name"], "Alicia");
        assert_eq!(body["success_message"], "Girl updated successfully");

        let (status, body) = send(&router, "GET", "/api/girls", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["girls"].as_array().unwrap().len(), 1);

        create_entry(&router, &girl_id, "2024-01-05", 50.0, 60, 2).await;
        let (status, body) = send(&router, "DELETE", &format!("/api/girls/{}", girl_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted_entries"], 1);

        let (status, body) = send(&router, "GET", &format!("/api/girls/{}", girl_id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("Girl not found"));

        let (_, body) = send(&router, "GET", "/api/entries", None).await;
        assert!(body["entries"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_requests() {
        let router = test_router();

        let (status, body) = send(
            &router,
            "POST",
            "/api/girls",
            Some(json!({ "name": "Young", "age": 17, "rating": 7.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("18"));

        let (status, _) = send(
            &router,
            "POST",
            "/api/entries",
            Some(json!({
                "girl_id": "girl::ghost",
                "date": "2024-01-01",
                "amount_spent": 10.0,
                "duration_minutes": 10,
                "number_of_nuts": 1,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, "GET", "/api/girls/metrics?sort=shoe_size", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&router, "GET", "/api/stats/top?count=lots", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&router, "GET", "/api/stats/monthly?range=forever", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, "DELETE", "/api/entries/entry::missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_json_bad_requests() {
        let router = test_router();
        let girl_id = create_girl(&router, "Alice", 8.0).await;

        let bodies = [
            ("POST", "/api/girls".to_string(), json!({ "name": "Neg", "age": -1, "rating": 7.0 })),
            ("POST", "/api/girls".to_string(), json!({ "name": "No age", "rating": 7.0 })),
            (
                "PUT",
                format!("/api/girls/{}", girl_id),
                json!({ "name": "Alice", "age": "old", "rating": 7.0 }),
            ),
            (
                "POST",
                "/api/entries".to_string(),
                json!({
                    "girl_id": girl_id,
                    "date": "2024-01-01",
                    "amount_spent": 10.0,
                    "duration_minutes": -5,
                    "number_of_nuts": 1,
                }),
            ),
            ("POST", "/api/export".to_string(), json!({ "format": "pdf" })),
        ];
        for (method, uri, body) in bodies {
            let (status, response) = send(&router, method, &uri, Some(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} {} with {}", method, uri, body);
            assert!(response["error"].is_string(), "{} {} returned {}", method, uri, response);
        }

        let request = Request::builder()
            .method("POST")
            .uri("/api/girls")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, "GET", "/api/stats/recent?days=4294967296", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, body) = send(&router, "GET", "/api/stats/recent?days=30", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["entries"].as_array().unwrap().is_empty());

        let (_, body) = send(&router, "GET", "/api/girls", None).await;
        assert_eq!(body["girls"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_metrics_and_stats_endpoints() {
        let router = test_router();
        let alice = create_girl(&router, "Alice", 9.0).await;
        let bea = create_girl(&router, "Bea", 6.0).await;
        create_entry(&router, &alice, "2024-01-05", 50.0, 60, 2).await;
        create_entry(&router, &alice, "2024-01-20", 30.0, 30, 1).await;
        create_entry(&router, &bea, "2024-02-01", 100.0, 120, 1).await;

        let (status, body) = send(&router, "GET", "/api/girls/metrics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["girls"][0]["name"], "Alice");
        assert_eq!(body["girls"][0]["metrics"]["cost_per_nut"], 26.67);
        assert_eq!(body["girls"][0]["total_entries"], 2);

        let (_, body) = send(
            &router,
            "GET",
            "/api/girls/metrics?sort=metrics.cost_per_nut&direction=desc",
            None,
        )
        .await;
        assert_eq!(body["girls"][0]["name"], "Bea");

        let (status, body) = send(&router, "GET", &format!("/api/girls/{}/metrics", bea), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metrics"]["cost_per_hour"], 50.0);

        let (_, body) = send(&router, "GET", "/api/stats/global", None).await;
        assert_eq!(body["total_girls"], 2);
        assert_eq!(body["active_girls"], 2);
        assert_eq!(body["total_spent"], 180.0);
        assert_eq!(body["average_rating"], 7.5);

        let (_, body) = send(&router, "GET", "/api/stats/monthly", None).await;
        let months: Vec<&str> = body["months"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["month"].as_str().unwrap())
            .collect();
        assert_eq!(months, vec!["2024-01", "2024-02"]);
        assert_eq!(body["months"][0]["cost_per_nut"], 26.67);

        let (_, body) = send(&router, "GET", "/api/stats/top?metric=total_spent&count=1", None).await;
        assert_eq!(body["metric"], "total_spent");
        assert_eq!(body["girls"].as_array().unwrap().len(), 1);
        assert_eq!(body["girls"][0]["name"], "Bea");

        let (status, body) = send(&router, "GET", &format!("/api/entries?girl_id={}", alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entries"][0]["date"], "2024-01-20");

        let (status, _) = send(&router, "GET", "/api/stats/recent?days=30", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_export_and_delete_all() {
        let router = test_router();
        let alice = create_girl(&router, "Alice", 9.0).await;
        create_entry(&router, &alice, "2024-01-05", 50.0, 60, 2).await;

        let (status, body) = send(&router, "POST", "/api/export", Some(json!({ "format": "csv" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mime_type"], "text/csv");
        assert!(body["content"].as_str().unwrap().starts_with("Girls Data\n"));

        let (status, body) = send(
            &router,
            "POST",
            "/api/export",
            Some(json!({ "format": "json", "include_entries": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let exported: Value = serde_json::from_str(body["content"].as_str().unwrap()).unwrap();
        assert_eq!(exported["version"], "1.0");
        assert!(exported.get("data_entries").is_none());

        let (status, body) = send(&router, "DELETE", "/api/data", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted_girls"], 1);
        assert_eq!(body["deleted_entries"], 1);

        let (_, body) = send(&router, "GET", "/api/stats/global", None).await;
        assert_eq!(body["total_girls"], 0);
    }

    #[tokio::test]
    async fn test_router_over_file_storage() {
        let temp_dir = TempDir::new().unwrap();
        let state = initialize_backend(CsvConnection::new(temp_dir.path()).unwrap());
        let router = create_router(state, HeaderValue::from_static("http://localhost:8080"));

        let girl_id = create_girl(&router, "Alice", 7.5).await;
        create_entry(&router, &girl_id, "2024-03-10", 129.99, 90, 1).await;

        // a fresh backend over the same directory sees the same data
        let reopened = initialize_backend(CsvConnection::new(temp_dir.path()).unwrap());
        let router = create_router(reopened, HeaderValue::from_static("http://localhost:8080"));
        let (_, body) = send(&router, "GET", &format!("/api/girls/{}/metrics", girl_id), None).await;
        assert_eq!(body["metrics"]["total_spent"], 129.99);
        assert_eq!(body["total_entries"], 1);
    }
}
