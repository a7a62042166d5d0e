//! JSON export implementation.
//!
//! Writes the scan report in JSON format for machine-readable output.

use std::io::{self, Write};

use serde::Serialize;

use crate::report::{ScanReport, Warning};

use super::Exporter;

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable unused image for JSON output.
#[derive(Serialize)]
struct JsonUnusedImage {
    id: String,
    paths: Vec<String>,
}

/// Serializable warning for JSON output.
#[derive(Serialize)]
struct JsonWarning {
    kind: &'static str,
    message: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    total_images: usize,
    total_files: usize,
    total_references: usize,
    unused_images: usize,
    unused_files: usize,
    warnings: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    images_root: String,
    scripts_root: String,
    summary: JsonSummary,
    unused: Vec<JsonUnusedImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<JsonWarning>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, report: &ScanReport, writer: &mut W) -> io::Result<()> {
        let unused: Vec<JsonUnusedImage> = report
            .unused
            .iter()
            .map(|u| JsonUnusedImage {
                id: u.id.clone(),
                paths: u.paths.iter().map(|p| p.display().to_string()).collect(),
            })
            .collect();

        let warnings: Vec<JsonWarning> = report
            .warnings
            .iter()
            .map(|w| JsonWarning {
                kind: match w {
                    Warning::Unreadable { .. } => "unreadable",
                    Warning::AmbiguousImageId { .. } => "ambiguous_image_id",
                },
                message: w.to_string(),
            })
            .collect();

        let export = JsonExport {
            images_root: report.images_root.display().to_string(),
            scripts_root: report.scripts_root.display().to_string(),
            summary: JsonSummary {
                total_images: report.total_images,
                total_files: report.total_files,
                total_references: report.total_references,
                unused_images: report.unused.len(),
                unused_files: report.unused_file_count(),
                warnings: report.warnings.len(),
            },
            unused,
            warnings,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
