//! Usage resolution.
//!
//! Combines the image index and the usage index into the unused set, and
//! provides [`scan_project`], the single entry point that runs a whole
//! scan and assembles the [`ScanReport`]. Nothing here mutates the file
//! system.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::config::ScanConfig;
use crate::extract::patterns::PatternSet;
use crate::extract::{extract_references, UsageIndex};
use crate::index::{index_images, ImageIndex};
use crate::normalize::{basename, Normalizer};
use crate::report::{ScanError, ScanReport, ScanResult, UnusedImage};

/// Identifiers present in the image index but absent from the usage index.
///
/// The primary rule is plain set difference. With the basename fallback
/// enabled, an image also counts as used when its bare file name matches a
/// used identifier or the bare name of one — in either direction, because
/// scripting conventions allow referencing an image by stem from any
/// directory. Ambiguity always resolves toward "used".
pub fn resolve_unused(
    index: &ImageIndex,
    usage: &UsageIndex,
    config: &ScanConfig,
) -> BTreeSet<String> {
    let used_stems: HashSet<&str> = if config.allow_basename_fallback {
        usage.ids().map(basename).collect()
    } else {
        HashSet::new()
    };

    let mut unused = BTreeSet::new();
    for (id, _) in index.iter() {
        if usage.contains(id) {
            continue;
        }
        if config.allow_basename_fallback {
            let stem = basename(id);
            if usage.contains(stem) || used_stems.contains(stem) {
                continue;
            }
        }
        unused.insert(id.to_string());
    }
    unused
}

/// Run a complete scan: index images, extract references, resolve.
///
/// Both roots are validated up front; a missing root is fatal before any
/// traversal starts. Everything after that is non-fatal and accumulates
/// into the report's warnings.
pub fn scan_project(
    images_root: &Path,
    scripts_root: &Path,
    config: &ScanConfig,
) -> ScanResult<ScanReport> {
    let images_root = resolve_root(images_root)?;
    let scripts_root = resolve_root(scripts_root)?;

    let normalizer = Normalizer::new(config);
    let patterns = PatternSet::for_config(config)?;

    let (index, mut warnings) = index_images(&images_root, &normalizer, config)?;
    let (usage, extract_warnings) =
        extract_references(&scripts_root, &patterns, &normalizer, config)?;
    warnings.extend(extract_warnings);

    let unused_ids = resolve_unused(&index, &usage, config);
    let unused = unused_ids
        .into_iter()
        .map(|id| {
            let paths = index
                .get(&id)
                .map(|files| files.iter().map(|a| a.path.clone()).collect())
                .unwrap_or_default();
            UnusedImage { id, paths }
        })
        .collect();

    Ok(ScanReport {
        total_images: index.id_count(),
        total_files: index.file_count(),
        total_references: usage.id_count(),
        images_root,
        scripts_root,
        unused,
        warnings,
    })
}

/// Validate a root path and pin it to its canonical absolute form.
fn resolve_root(path: &Path) -> ScanResult<std::path::PathBuf> {
    if !path.is_dir() {
        return Err(ScanError::PathNotFound(path.to_path_buf()));
    }
    Ok(path.canonicalize()?)
}
