// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::ScrapeError;
use crate::services::export::FileExporter;
use crate::services::hook::ExportHook;
use crate::services::scraper::{ListingScraper, OutputStrategy};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Browser UA sent to the directory site; it rejects obvious bot agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Finalization strategy selected at start-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Return listings in the response body
    InMemory,
    /// Write listings to a CSV export and return its file name
    File,
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::InMemory => write!(f, "in-memory"),
            OutputMode::File => write!(f, "file"),
        }
    }
}

/// Service configuration. Every flag can also be set through its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "gem-leads", about = "Business directory search endpoint")]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind_addr: SocketAddr,

    /// Base URL of the business directory
    #[arg(long, env = "DIRECTORY_BASE_URL", default_value = "https://www.goldenpages.ie")]
    pub base_url: Url,

    /// How search results are delivered
    #[arg(long, env = "OUTPUT_MODE", value_enum, default_value = "in-memory")]
    pub output_mode: OutputMode,

    /// Directory CSV exports are written to and downloaded from
    #[arg(long, env = "DOWNLOADS_DIR", default_value = "downloads")]
    pub downloads_dir: PathBuf,

    /// Command run after each export, with the export path appended
    #[arg(long, env = "EXPORT_HOOK")]
    pub export_hook: Option<String>,

    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Upper bound on a directory fetch; unset means no client-side timeout
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Default log filter, used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn file_exporter(&self) -> FileExporter {
        let exporter = FileExporter::new(&self.downloads_dir);
        match self.export_hook.as_deref().and_then(ExportHook::parse) {
            Some(hook) => exporter.with_hook(hook),
            None => exporter,
        }
    }

    pub fn output_strategy(&self) -> OutputStrategy {
        match self.output_mode {
            OutputMode::InMemory => OutputStrategy::InMemory,
            OutputMode::File => OutputStrategy::FilePersisted(self.file_exporter()),
        }
    }

    pub fn build_scraper(&self) -> Result<ListingScraper, ScrapeError> {
        ListingScraper::new(
            self.base_url.clone(),
            &self.user_agent,
            self.request_timeout_secs.map(Duration::from_secs),
            self.output_strategy(),
        )
    }
}
