// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Error types for request validation and scraping.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Client-input faults. All of them are detected before any network access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Malformed request body: {0}")]
    MalformedRequest(String),

    #[error(
        "Please provide both business type (what) and location (where); missing: {}",
        .missing.join(", ")
    )]
    MissingParameter { missing: Vec<&'static str> },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RequestError::MalformedRequest(_) | RequestError::MissingParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        if status == StatusCode::METHOD_NOT_ALLOWED {
            (status, [(header::ALLOW, "POST")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

/// Faults raised while building the scraper or producing a result.
///
/// `Fetch` never leaves `ListingScraper::scrape`; it becomes a `success: false`
/// result. Anything else reaching a handler is answered with a 500.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("base URL \"{0}\" cannot carry path segments")]
    InvalidBaseUrl(String),

    #[error("invalid selector \"{selector}\": {reason}")]
    Selector { selector: String, reason: String },

    #[error("failed to encode CSV export: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write export {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "unhandled fault while handling search");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
