// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! CSV exports of scraped listings and lookup of previously written exports.

use crate::error::ScrapeError;
use crate::models::listing::Listing;
use crate::models::query::Query;
use crate::services::hook::ExportHook;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Writes listings as CSV files into a downloads directory
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
    hook: Option<ExportHook>,
}

impl FileExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            hook: None,
        }
    }

    /// Run `hook` after every successful write
    pub fn with_hook(mut self, hook: ExportHook) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `listings` to a new CSV file and return its file name.
    ///
    /// An empty set still produces a file holding only the header row.
    pub async fn write(&self, query: &Query, listings: &[Listing]) -> Result<String, ScrapeError> {
        let filename = export_filename(query, listings.len(), Utc::now());
        let path = self.dir.join(&filename);
        let contents = encode_csv(listings)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ScrapeError::Persist {
                path: self.dir.display().to_string(),
                source,
            })?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| ScrapeError::Persist {
                path: path.display().to_string(),
                source,
            })?;

        tracing::info!(path = %path.display(), count = listings.len(), "export written");

        if let Some(hook) = &self.hook {
            run_hook(hook, &path).await;
        }

        Ok(filename)
    }

    /// Path of a previously written export, or `None` if `filename` is not a
    /// plain file name
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        is_plain_filename(filename).then(|| self.dir.join(filename))
    }
}

async fn run_hook(hook: &ExportHook, path: &Path) {
    match hook.run(path).await {
        Ok(output) if output.succeeded() => {
            tracing::info!(
                path = %path.display(),
                stdout = %output.stdout.trim(),
                "export hook finished"
            );
        }
        Ok(output) => {
            tracing::warn!(
                path = %path.display(),
                exit_code = ?output.exit_code,
                stderr = %output.stderr.trim(),
                "export hook exited unsuccessfully"
            );
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "export hook failed to start");
        }
    }
}

fn encode_csv(listings: &[Listing]) -> Result<Vec<u8>, ScrapeError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // serde only emits the header alongside the first record
    if listings.is_empty() {
        writer.write_record(["name", "phone", "address", "category"])?;
    }
    for listing in listings {
        writer.serialize(listing)?;
    }
    writer
        .into_inner()
        .map_err(|e| ScrapeError::Csv(e.into_error().into()))
}

/// `business_data_{what}_{where}_{n}results_{timestamp}.csv`
pub fn export_filename(query: &Query, count: usize, at: DateTime<Utc>) -> String {
    format!(
        "business_data_{}_{}_{}results_{}.csv",
        slug(&query.business_type),
        slug(&query.location),
        count,
        at.format("%Y%m%d_%H%M%S")
    )
}

fn slug(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && !filename.contains("..")
        && !filename.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn query(what: &str, location: &str) -> Query {
        Query {
            business_type: what.to_string(),
            location: location.to_string(),
        }
    }

    fn listing(name: &str, phone: &str) -> Listing {
        Listing {
            name: name.to_string(),
            phone: phone.to_string(),
            address: "1 Main St, Dublin".to_string(),
            category: "Plumbers".to_string(),
        }
    }

    #[test]
    fn test_export_filename_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            export_filename(&query("Plumbers", "Dublin"), 12, at),
            "business_data_plumbers_dublin_12results_20260309_140507.csv"
        );
    }

    #[test]
    fn test_export_filename_replaces_unsafe_characters() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let name = export_filename(&query("Car Wash/Valet", "../Co. Cork"), 0, at);
        assert_eq!(
            name,
            "business_data_car_wash_valet____co__cork_0results_20260101_000000.csv"
        );
        assert!(is_plain_filename(&name));
    }

    #[test]
    fn test_encode_csv_keeps_order_and_header() {
        let bytes = encode_csv(&[listing("A Plumbing", "01 111"), listing("B Pipes", "")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "name,phone,address,category");
        assert_eq!(lines[1], "A Plumbing,01 111,\"1 Main St, Dublin\",Plumbers");
        assert_eq!(lines[2], "B Pipes,,\"1 Main St, Dublin\",Plumbers");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_encode_csv_empty_has_header_only() {
        let text = String::from_utf8(encode_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, "name,phone,address,category\n");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let exporter = FileExporter::new("downloads");
        assert!(exporter.resolve("../secret.csv").is_none());
        assert!(exporter.resolve("nested/file.csv").is_none());
        assert!(exporter.resolve("nested\\file.csv").is_none());
        assert!(exporter.resolve("").is_none());
        assert_eq!(
            exporter.resolve("business_data_x.csv"),
            Some(PathBuf::from("downloads/business_data_x.csv"))
        );
    }

    #[tokio::test]
    async fn test_write_creates_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(tmp.path().join("downloads"));

        let filename = exporter
            .write(&query("plumbers", "dublin"), &[listing("A Plumbing", "01 111")])
            .await
            .unwrap();

        assert!(filename.starts_with("business_data_plumbers_dublin_1results_"));
        let written = std::fs::read_to_string(exporter.dir().join(&filename)).unwrap();
        assert!(written.starts_with("name,phone,address,category\n"));
        assert!(written.contains("A Plumbing"));
    }

    #[tokio::test]
    async fn test_write_into_file_path_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let exporter = FileExporter::new(&blocker);

        let result = exporter.write(&query("pubs", "cork"), &[]).await;
        assert!(matches!(result, Err(ScrapeError::Persist { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_hook_does_not_fail_write() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter =
            FileExporter::new(tmp.path()).with_hook(ExportHook::parse("false").unwrap());

        let result = exporter.write(&query("pubs", "cork"), &[]).await;
        assert!(result.is_ok());
    }
}
