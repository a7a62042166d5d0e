//! Export functionality for scan results.
//!
//! This module provides exporters for writing a [`ScanReport`] in various
//! formats: JSON, CSV, and Markdown.

pub mod csv;
pub mod json;
pub mod markdown;

use std::io::{self, Write};

use crate::report::ScanReport;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - spreadsheet-friendly, one row per unused file
    Csv,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the report to the given writer.
    fn export<W: Write>(&self, report: &ScanReport, writer: &mut W) -> io::Result<()>;
}

/// Export a report in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    report: &ScanReport,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(report, writer),
        ExportFormat::Csv => csv::CsvExporter.export(report, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(report, writer),
    }
}

/// Export a report to a string.
pub fn export_to_string(format: ExportFormat, report: &ScanReport) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, report, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::report::{ScanReport, UnusedImage, Warning};
    use std::path::PathBuf;

    pub fn sample_report() -> ScanReport {
        ScanReport {
            images_root: PathBuf::from("/p/images"),
            scripts_root: PathBuf::from("/p/script"),
            total_images: 3,
            total_files: 3,
            total_references: 2,
            unused: vec![
                UnusedImage {
                    id: "gui/old_frame".to_string(),
                    paths: vec![PathBuf::from("/p/images/gui/old_frame.png")],
                },
                UnusedImage {
                    id: "unused_sprite".to_string(),
                    paths: vec![PathBuf::from("/p/images/unused_sprite.png")],
                },
            ],
            warnings: vec![Warning::Unreadable {
                path: PathBuf::from("/p/script/broken.rpy"),
                reason: "stream did not contain valid UTF-8".to_string(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!("invalid".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Csv), "csv");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_export_to_string_dispatches() {
        let report = test_fixtures::sample_report();
        for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Markdown] {
            let out = export_to_string(format, &report).unwrap();
            assert!(out.contains("unused_sprite"), "{} output", format);
        }
    }
}
