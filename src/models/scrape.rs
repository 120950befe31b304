// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::listing::Listing;
use serde::{Deserialize, Serialize};

/// Message returned to the caller whenever the directory page could not be fetched.
/// The underlying fault is logged, never exposed.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch business data";

/// Outcome of one search, returned as the response body.
///
/// `success` is true iff the fetch and parse completed. An empty result page is
/// still a success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub success: bool,
    /// Extracted listings in document order (in-memory output only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Listing>>,
    /// Name of the written export (file output only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResult {
    /// Listings returned directly in the response body
    pub fn in_memory(listings: Vec<Listing>) -> Self {
        let message = found_message(listings.len());
        Self {
            success: true,
            data: Some(listings),
            filename: None,
            message: Some(message),
            error: None,
        }
    }

    /// Listings written to `filename`; only the reference is returned
    pub fn persisted(filename: String, count: usize) -> Self {
        let message = format!("{}. Data saved to {}", found_message(count), filename);
        Self {
            success: true,
            data: None,
            filename: Some(filename),
            message: Some(message),
            error: None,
        }
    }

    pub fn fetch_failed() -> Self {
        Self {
            success: false,
            data: None,
            filename: None,
            message: None,
            error: Some(FETCH_FAILED_MESSAGE.to_string()),
        }
    }
}

fn found_message(count: usize) -> String {
    format!("Found {} businesses", count)
}
