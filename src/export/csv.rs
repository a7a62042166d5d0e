//! CSV export implementation.
//!
//! Writes one row per unused file for spreadsheet use.

use std::io::{self, Write};

use crate::report::ScanReport;

use super::Exporter;

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, report: &ScanReport, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "id,path,collision")?;

        for image in &report.unused {
            let collision = image.paths.len() > 1;
            for path in &image.paths {
                writeln!(
                    writer,
                    "{},{},{}",
                    Self::escape_field(&image.id),
                    Self::escape_field(&path.display().to_string()),
                    collision
                )?;
            }
        }

        Ok(())
    }
}
