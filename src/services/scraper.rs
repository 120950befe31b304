// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Directory search scraper: builds the results URL, fetches it, and extracts
//! one `Listing` per listing element.

use crate::error::ScrapeError;
use crate::models::listing::Listing;
use crate::models::query::Query;
use crate::models::scrape::ScrapeResult;
use crate::services::export::FileExporter;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

/// Marks one listing on a results page
const LISTING_SELECTOR: &str = ".listing";
const NAME_SELECTOR: &str = ".listing-name";
const PHONE_SELECTOR: &str = ".phone";
const ADDRESS_SELECTOR: &str = ".address";
const CATEGORY_SELECTOR: &str = ".category";

/// Compiled selectors for a results page
#[derive(Debug)]
pub struct ListingSelectors {
    listing: Selector,
    name: Selector,
    phone: Selector,
    address: Selector,
    category: Selector,
}

impl ListingSelectors {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            listing: compile(LISTING_SELECTOR)?,
            name: compile(NAME_SELECTOR)?,
            phone: compile(PHONE_SELECTOR)?,
            address: compile(ADDRESS_SELECTOR)?,
            category: compile(CATEGORY_SELECTOR)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// How extracted listings are delivered to the caller
#[derive(Debug, Clone)]
pub enum OutputStrategy {
    /// Listings are returned in the response body
    InMemory,
    /// Listings are written to a CSV export; the response carries its file name
    FilePersisted(FileExporter),
}

impl OutputStrategy {
    pub async fn finalize(
        &self,
        query: &Query,
        listings: Vec<Listing>,
    ) -> Result<ScrapeResult, ScrapeError> {
        match self {
            OutputStrategy::InMemory => Ok(ScrapeResult::in_memory(listings)),
            OutputStrategy::FilePersisted(exporter) => {
                let filename = exporter.write(query, &listings).await?;
                Ok(ScrapeResult::persisted(filename, listings.len()))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputStrategy::InMemory => "in-memory",
            OutputStrategy::FilePersisted(_) => "file",
        }
    }
}

/// Scrapes the first results page of the directory's advanced search
pub struct ListingScraper {
    client: Client,
    base_url: Url,
    selectors: ListingSelectors,
    output: OutputStrategy,
}

impl ListingScraper {
    /// Create a scraper for the directory at `base_url`.
    ///
    /// `timeout` of `None` leaves the HTTP client default in place.
    pub fn new(
        base_url: Url,
        user_agent: &str,
        timeout: Option<Duration>,
        output: OutputStrategy,
    ) -> Result<Self, ScrapeError> {
        if base_url.cannot_be_a_base() {
            return Err(ScrapeError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ScrapeError::Client)?;

        Ok(Self {
            client,
            base_url,
            selectors: ListingSelectors::new()?,
            output,
        })
    }

    pub fn output(&self) -> &OutputStrategy {
        &self.output
    }

    /// `{base}/q/business/advanced/where/{location}/what/{business_type}/1`,
    /// with both query values percent-encoded as path segments
    pub fn search_url(&self, query: &Query) -> Result<Url, ScrapeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ScrapeError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([
                "q",
                "business",
                "advanced",
                "where",
                query.location.as_str(),
                "what",
                query.business_type.as_str(),
                "1",
            ]);
        Ok(url)
    }

    /// Run one search.
    ///
    /// A failed fetch is logged and reported as `success: false`; only
    /// finalization faults are returned as errors.
    pub async fn scrape(&self, query: &Query) -> Result<ScrapeResult, ScrapeError> {
        tracing::info!(
            business_type = %query.business_type,
            location = %query.location,
            "starting business search"
        );

        let url = self.search_url(query)?;
        let html = match self.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(error = %e, "scraping error");
                return Ok(ScrapeResult::fetch_failed());
            }
        };

        let listings = extract_listings(&html, &self.selectors);
        tracing::info!(url = %url, count = listings.len(), "extracted listings");

        self.output.finalize(query, listings).await
    }

    async fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
        let fetch_error = |source: reqwest::Error| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(fetch_error)?;

        response.text().await.map_err(fetch_error)
    }
}

/// Extract every listing on a results page, in document order
pub fn extract_listings(html: &str, selectors: &ListingSelectors) -> Vec<Listing> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.listing)
        .map(|element| Listing {
            name: first_text(element, &selectors.name),
            phone: first_text(element, &selectors.phone),
            address: first_text(element, &selectors.address),
            category: first_text(element, &selectors.category),
        })
        .collect()
}

/// Trimmed text of the first descendant matching `selector`, or empty
fn first_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|found| found.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
