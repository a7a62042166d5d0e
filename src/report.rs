//! Scan results and the error taxonomy.
//!
//! A run produces a single [`ScanReport`]: the unused images, the totals
//! behind them, and every non-fatal warning accumulated along the way.
//! Only missing root paths are fatal; everything else degrades to a
//! [`Warning`] so the unused-image report is still produced.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a scan before or during setup.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A root path does not exist or is not a directory. Raised before any
    /// scanning begins.
    #[error("Path not found or not a directory: {0}")]
    PathNotFound(PathBuf),

    /// An I/O failure outside the per-file warning policy.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A reference pattern failed to compile.
    #[error("Invalid reference pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Non-fatal problems found during a scan.
///
/// Warnings accumulate in the report and are surfaced at the end of the
/// run; they never abort it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A file or directory could not be read and was skipped.
    Unreadable { path: PathBuf, reason: String },

    /// Two or more distinct files normalize to the same identifier. All of
    /// them are kept, and all count as used if the identifier is referenced.
    AmbiguousImageId { id: String, paths: Vec<PathBuf> },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Unreadable { path, reason } => {
                write!(f, "Skipped unreadable {}: {}", path.display(), reason)
            }
            Warning::AmbiguousImageId { id, paths } => {
                let listed: Vec<String> =
                    paths.iter().map(|p| p.display().to_string()).collect();
                write!(
                    f,
                    "Ambiguous image id '{}' ({} files: {})",
                    id,
                    paths.len(),
                    listed.join(", ")
                )
            }
        }
    }
}

/// An indexed image no script references, with every concrete file that
/// normalizes to its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedImage {
    /// Normalized identifier.
    pub id: String,
    /// Concrete files under this identifier, in index order.
    pub paths: Vec<PathBuf>,
}

/// The complete result of one scan run.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Root directory the images were indexed from.
    pub images_root: PathBuf,
    /// Root directory the scripts were scanned from.
    pub scripts_root: PathBuf,
    /// Number of distinct image identifiers indexed.
    pub total_images: usize,
    /// Number of image files indexed (collisions make this exceed
    /// `total_images`).
    pub total_files: usize,
    /// Number of distinct reference identifiers extracted from scripts.
    pub total_references: usize,
    /// Unused images, sorted by identifier.
    pub unused: Vec<UnusedImage>,
    /// Warnings accumulated from the indexer and the extractor.
    pub warnings: Vec<Warning>,
}

impl ScanReport {
    /// Returns true if every indexed image is referenced somewhere.
    pub fn is_clean(&self) -> bool {
        self.unused.is_empty()
    }

    /// Total number of files behind the unused identifiers.
    pub fn unused_file_count(&self) -> usize {
        self.unused.iter().map(|u| u.paths.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ScanReport {
        ScanReport {
            images_root: PathBuf::from("/p/images"),
            scripts_root: PathBuf::from("/p/script"),
            total_images: 3,
            total_files: 4,
            total_references: 2,
            unused: vec![UnusedImage {
                id: "old_logo".to_string(),
                paths: vec![
                    PathBuf::from("/p/images/old_logo.png"),
                    PathBuf::from("/p/images/gui/old_logo.png"),
                ],
            }],
            warnings: vec![],
        }
    }

    #[test]
    fn test_is_clean() {
        let mut report = sample_report();
        assert!(!report.is_clean());
        report.unused.clear();
        assert!(report.is_clean());
    }

    #[test]
    fn test_unused_file_count_covers_collisions() {
        let report = sample_report();
        assert_eq!(report.unused.len(), 1);
        assert_eq!(report.unused_file_count(), 2);
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::Unreadable {
            path: PathBuf::from("/p/script/broken.rpy"),
            reason: "permission denied".to_string(),
        };
        let text = warning.to_string();
        assert!(text.contains("broken.rpy"));
        assert!(text.contains("permission denied"));

        let warning = Warning::AmbiguousImageId {
            id: "bg_room".to_string(),
            paths: vec![
                PathBuf::from("/p/images/bg_room.png"),
                PathBuf::from("/p/images/bg_room.jpg"),
            ],
        };
        let text = warning.to_string();
        assert!(text.contains("bg_room"));
        assert!(text.contains("2 files"));
    }
}
