//! CSV / JSON export of ranked listings

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

use crate::domain::listing::RankedListing;

pub const CSV_HEADER: [&str; 5] = ["Index", "Link", "Price", "Location", "Description"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ExportError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Csv { path, .. } | Self::Json { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Formats requested by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputSelection {
    pub csv: bool,
    pub json: bool,
}

impl OutputSelection {
    pub const BOTH: Self = Self { csv: true, json: true };

    /// Free-text selection: "both" wins, otherwise any "csv"/"json" substrings
    pub fn parse(input: &str) -> Self {
        let input = input.trim().to_lowercase();
        if input.contains("both") {
            return Self::BOTH;
        }

        Self {
            csv: input.contains("csv"),
            json: input.contains("json"),
        }
    }

    pub const fn is_empty(self) -> bool {
        !self.csv && !self.json
    }

    /// Selected formats, JSON first as it is written first
    pub fn formats(self) -> Vec<ExportFormat> {
        let mut formats = Vec::with_capacity(2);
        if self.json {
            formats.push(ExportFormat::Json);
        }
        if self.csv {
            formats.push(ExportFormat::Csv);
        }
        formats
    }
}

/// One exported row; field names are the on-disk column/key names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Index")]
    pub index: usize,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl From<&RankedListing> for ExportRow {
    fn from(listing: &RankedListing) -> Self {
        Self {
            index: listing.rank,
            link: listing.record.url.clone(),
            price: listing.record.raw_price.clone(),
            location: listing.record.location.clone(),
            description: listing.record.description.clone(),
        }
    }
}

/// Files written and per-format failures of one export
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ExportError>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ListingExporter {
    output_dir: PathBuf,
}

impl ListingExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn target_path(&self, stem: &str, format: ExportFormat) -> PathBuf {
        self.output_dir.join(format!("{stem}.{}", format.extension()))
    }

    /// Write every selected format. A failing format does not prevent the other.
    pub fn export(&self, stem: &str, listings: &[RankedListing], selection: OutputSelection) -> ExportReport {
        let rows: Vec<ExportRow> = listings.iter().map(ExportRow::from).collect();
        let mut report = ExportReport::default();

        for format in selection.formats() {
            let path = self.target_path(stem, format);
            let result = match format {
                ExportFormat::Csv => write_csv(&path, &rows),
                ExportFormat::Json => write_json(&path, &rows),
            };

            match result {
                Ok(()) => {
                    info!("Wrote {} rows to {}", rows.len(), path.display());
                    report.written.push(path);
                }
                Err(e) => {
                    error!("{}", e);
                    report.failures.push(e);
                }
            }
        }

        report
    }
}

fn create_file(path: &Path) -> Result<File, ExportError> {
    File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Header row followed by one row per listing; the header is written even when empty
pub fn write_csv(path: &Path, rows: &[ExportRow]) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = create_file(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(CSV_HEADER).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// JSON array, 4-space indentation, non-ASCII text kept as is
pub fn write_json(path: &Path, rows: &[ExportRow]) -> Result<(), ExportError> {
    let file = create_file(path)?;
    let mut out = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    rows.serialize(&mut serializer).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    out.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
