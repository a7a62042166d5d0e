//! Markdown export implementation.
//!
//! Writes the scan report in Markdown format for documentation and reporting.

use std::io::{self, Write};

use crate::report::ScanReport;

use super::Exporter;

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, report: &ScanReport, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "# Unused Image Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Images:** `{}`", report.images_root.display())?;
        writeln!(writer, "**Scripts:** `{}`", report.scripts_root.display())?;
        writeln!(writer)?;

        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Indexed Images | {} |", report.total_images)?;
        writeln!(writer, "| Indexed Files | {} |", report.total_files)?;
        writeln!(writer, "| Script References | {} |", report.total_references)?;
        writeln!(writer, "| Unused Images | {} |", report.unused.len())?;
        writeln!(writer, "| Unused Files | {} |", report.unused_file_count())?;
        writeln!(writer, "| Warnings | {} |", report.warnings.len())?;
        writeln!(writer)?;

        if report.is_clean() {
            writeln!(writer, "No unused images found.")?;
        } else {
            writeln!(writer, "## Unused Images")?;
            writeln!(writer)?;
            for image in &report.unused {
                writeln!(writer, "- **{}**", image.id)?;
                for path in &image.paths {
                    writeln!(writer, "  - `{}`", path.display())?;
                }
            }
        }

        if !report.warnings.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "## Warnings")?;
            writeln!(writer)?;
            for warning in &report.warnings {
                writeln!(writer, "- {}", warning)?;
            }
        }

        Ok(())
    }
}
