// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Request validation for the search endpoint.

use crate::error::RequestError;
use crate::models::query::Query;
use axum::http::Method;
use serde_json::{Map, Value};

/// Only POST reaches the scraper. Checked before the body is looked at.
pub fn ensure_post(method: &Method) -> Result<(), RequestError> {
    if *method == Method::POST {
        Ok(())
    } else {
        Err(RequestError::MethodNotAllowed)
    }
}

/// Parse a raw request body into a validated `Query`.
///
/// An empty body counts as `{}`. `what` and `where` must both be non-blank strings.
pub fn parse_query(body: &[u8]) -> Result<Query, RequestError> {
    let text = std::str::from_utf8(body)
        .map_err(|e| RequestError::MalformedRequest(format!("body is not valid UTF-8: {e}")))?;

    let value = if text.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_str::<Value>(text)
            .map_err(|e| RequestError::MalformedRequest(format!("invalid JSON: {e}")))?
    };

    let Value::Object(fields) = value else {
        return Err(RequestError::MalformedRequest(
            "expected a JSON object".to_string(),
        ));
    };

    let business_type = text_field(&fields, "what");
    let location = text_field(&fields, "where");

    match (business_type, location) {
        (Some(business_type), Some(location)) => Ok(Query {
            business_type,
            location,
        }),
        (business_type, location) => {
            let mut missing = Vec::new();
            if business_type.is_none() {
                missing.push("what");
            }
            if location.is_none() {
                missing.push("where");
            }
            Err(RequestError::MissingParameter { missing })
        }
    }
}

/// Trimmed string value of `key`, or `None` when absent, blank or not a string
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
