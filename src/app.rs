// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::error::RequestError;
use crate::models::version::VersionResponse;
use crate::services::export::FileExporter;
use crate::services::scraper::ListingScraper;
use crate::services::validator::{ensure_post, parse_query};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `GEM_LEADS_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("GEM_LEADS_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
///
/// Nothing in here changes after start-up; requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<ListingScraper>,
    /// Serves exports written by the file output strategy
    pub downloads: FileExporter,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

pub async fn version_handler(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "gem-leads".to_string(),
        version: VERSION.to_string(),
        output_mode: state.scraper.output().name().to_string(),
    })
}

/// `POST /search_businesses` with `{"what": ..., "where": ...}`.
///
/// Validation faults never reach the network. A failed fetch is a 200 with
/// `success: false`; only unexpected faults produce a 500.
pub async fn search_handler(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Response, RequestError> {
    ensure_post(&method)?;
    let query = parse_query(&body)?;

    match state.scraper.scrape(&query).await {
        Ok(result) => Ok((StatusCode::OK, Json(result)).into_response()),
        Err(e) => Ok(e.into_response()),
    }
}

/// `GET /download/{filename}` for a previously written CSV export
pub async fn download_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    let Some(path) = state.downloads.resolve(&filename) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid file name" })),
        )
            .into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(contents) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            contents,
        )
            .into_response(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "download not available");
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("File not found: {filename}") })),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the Axum application router.
///
/// The search route accepts every method so that non-POST requests get the JSON
/// 405 body instead of axum's empty one.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/search_businesses", any(search_handler))
        .route("/download/{filename}", get(download_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scraper::OutputStrategy;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use url::Url;

    fn create_test_app(downloads: &std::path::Path) -> Router {
        // Nothing listens on port 9; searches reaching the network fail fast
        let scraper = ListingScraper::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            "gem-leads-test/0.1",
            None,
            OutputStrategy::InMemory,
        )
        .unwrap();

        create_router(AppState {
            scraper: Arc::new(scraper),
            downloads: FileExporter::new(downloads),
        })
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_version_endpoint_response() {
        let tmp = tempfile::tempdir().unwrap();
        let app = create_test_app(tmp.path());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/version")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body: VersionResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(body.service, "gem-leads");
        assert_eq!(body.version, VERSION);
        assert_eq!(body.output_mode, "in-memory");
    }

    #[test]
    fn test_version_follows_semver_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.parse::<u32>().is_ok()));
    }

    #[tokio::test]
    async fn test_non_post_search_returns_405() {
        let tmp = tempfile::tempdir().unwrap();

        for method in ["GET", "PUT", "DELETE", "PATCH"] {
            let response = create_test_app(tmp.path())
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri("/search_businesses")
                        .header("content-type", "application/json")
                        .body(Body::from(r#"{"what":"plumbers","where":"dublin"}"#))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(
                body_json(response).await,
                json!({ "error": "Method not allowed" })
            );
        }
    }

    #[tokio::test]
    async fn test_missing_parameters_return_400() {
        let tmp = tempfile::tempdir().unwrap();
        let response = create_test_app(tmp.path())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/search_businesses")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("what"));
        assert!(message.contains("where"));
    }

    #[tokio::test]
    async fn test_malformed_body_returns_400() {
        let tmp = tempfile::tempdir().unwrap();
        let response = create_test_app(tmp.path())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/search_businesses")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_unreachable_directory_is_reported_as_failed_search() {
        let tmp = tempfile::tempdir().unwrap();
        let response = create_test_app(tmp.path())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/search_businesses")
                    .body(Body::from(r#"{"what":"plumbers","where":"dublin"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "error": "Failed to fetch business data" })
        );
    }

    #[tokio::test]
    async fn test_download_existing_export() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("business_data_test.csv"),
            "name,phone,address,category\n",
        )
        .unwrap();

        let response = create_test_app(tmp.path())
            .oneshot(
                Request::builder()
                    .uri("/download/business_data_test.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"business_data_test.csv\""
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"name,phone,address,category\n");
    }

    #[tokio::test]
    async fn test_download_missing_export_returns_404() {
        let tmp = tempfile::tempdir().unwrap();
        let response = create_test_app(tmp.path())
            .oneshot(
                Request::builder()
                    .uri("/download/business_data_missing.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_download_rejects_traversal() {
        let tmp = tempfile::tempdir().unwrap();
        let response = create_test_app(tmp.path())
            .oneshot(
                Request::builder()
                    .uri("/download/..%2Fsecret.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_route_returns_404() {
        let tmp = tempfile::tempdir().unwrap();
        let response = create_test_app(tmp.path())
            .oneshot(
                Request::builder()
                    .uri("/invalid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
