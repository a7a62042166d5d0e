//! Disposition application.
//!
//! The only component that mutates the file system. Given the unused set
//! and a per-identifier keep/delete decision, deletes every concrete file
//! of each "delete" identifier. Deletion is best-effort per file and
//! refuses to touch anything that does not resolve under the images root.
//! Directories are never removed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::report::UnusedImage;

/// Caller decision for one unused identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Leave the files in place.
    Keep,
    /// Delete every file under the identifier.
    Delete,
}

/// Outcome of applying dispositions.
#[derive(Debug, Default)]
pub struct DeletionReport {
    /// Files removed from the file system.
    pub deleted: Vec<PathBuf>,
    /// Files whose deletion failed, with the error.
    pub failed: Vec<(PathBuf, io::Error)>,
    /// Files refused because they do not resolve under the images root.
    pub skipped: Vec<PathBuf>,
}

impl DeletionReport {
    /// Returns true if nothing failed and nothing was refused.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Apply a keep/delete decision to each unused identifier.
///
/// `decide` is called once per identifier; batch "delete all" is
/// `|_| Disposition::Delete`. One file failing never blocks the rest.
pub fn apply_dispositions<F>(
    unused: &[UnusedImage],
    images_root: &Path,
    mut decide: F,
) -> DeletionReport
where
    F: FnMut(&UnusedImage) -> Disposition,
{
    let mut report = DeletionReport::default();

    let root = match images_root.canonicalize() {
        Ok(root) => root,
        Err(_) => {
            // Without a verifiable root nothing can be proven safe to delete.
            for image in unused {
                if decide(image) == Disposition::Delete {
                    report.skipped.extend(image.paths.iter().cloned());
                }
            }
            return report;
        }
    };

    for image in unused {
        if decide(image) == Disposition::Keep {
            continue;
        }
        for path in &image.paths {
            delete_file(path, &root, &mut report);
        }
    }
    report
}

/// Delete the files of an already-decided subset, e.g. the marks made in
/// the review UI. Equivalent to `apply_dispositions` with a constant
/// `Delete` decision.
pub fn delete_all(unused: &[UnusedImage], images_root: &Path) -> DeletionReport {
    apply_dispositions(unused, images_root, |_| Disposition::Delete)
}

fn delete_file(path: &Path, root: &Path, report: &mut DeletionReport) {
    let resolved = match path.canonicalize() {
        Ok(resolved) => resolved,
        Err(err) => {
            report.failed.push((path.to_path_buf(), err));
            return;
        }
    };
    if !resolved.starts_with(root) {
        report.skipped.push(path.to_path_buf());
        return;
    }
    match fs::remove_file(&resolved) {
        Ok(()) => report.deleted.push(path.to_path_buf()),
        Err(err) => report.failed.push((path.to_path_buf(), err)),
    }
}
