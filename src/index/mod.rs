//! Image indexing.
//!
//! Walks the images root, enumerates files with recognized image
//! extensions, and maps every normalized identifier to the concrete
//! file(s) behind it. Two files landing on the same identifier is a
//! collision: both are kept and reported, never silently resolved to one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::normalize::Normalizer;
use crate::report::{ScanError, ScanResult, Warning};

/// A single indexed image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Concrete path of the file.
    pub path: PathBuf,
    /// Identifier the file normalizes to.
    pub normalized_id: String,
    /// Original extension (lowercase, no leading dot).
    pub extension: String,
}

/// Mapping from normalized identifier to the image files behind it.
///
/// Backed by a `BTreeMap` so iteration (and therefore every report) is in
/// deterministic identifier order.
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    assets: BTreeMap<String, Vec<ImageAsset>>,
}

impl ImageIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset under its normalized identifier.
    pub fn insert(&mut self, asset: ImageAsset) {
        self.assets
            .entry(asset.normalized_id.clone())
            .or_default()
            .push(asset);
    }

    /// Files behind an identifier, if indexed.
    pub fn get(&self, id: &str) -> Option<&[ImageAsset]> {
        self.assets.get(id).map(|v| v.as_slice())
    }

    /// Returns true if the identifier is indexed.
    pub fn contains(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    /// Iterate over `(identifier, files)` in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ImageAsset])> {
        self.assets.iter().map(|(id, v)| (id.as_str(), v.as_slice()))
    }

    /// Number of distinct identifiers.
    pub fn id_count(&self) -> usize {
        self.assets.len()
    }

    /// Number of indexed files across all identifiers.
    pub fn file_count(&self) -> usize {
        self.assets.values().map(Vec::len).sum()
    }

    /// Identifiers with more than one file.
    pub fn collisions(&self) -> impl Iterator<Item = (&str, &[ImageAsset])> {
        self.iter().filter(|(_, files)| files.len() > 1)
    }
}

/// Index every image file under `images_root`.
///
/// Fatal only if the root itself is missing or not a directory.
/// Unreadable entries inside it become warnings and the traversal
/// continues; the traversal itself is read-only.
pub fn index_images(
    images_root: &Path,
    normalizer: &Normalizer,
    config: &ScanConfig,
) -> ScanResult<(ImageIndex, Vec<Warning>)> {
    if !images_root.is_dir() {
        return Err(ScanError::PathNotFound(images_root.to_path_buf()));
    }

    let mut index = ImageIndex::new();
    let mut warnings = Vec::new();

    for entry in WalkDir::new(images_root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| images_root.to_path_buf());
                warnings.push(Warning::Unreadable {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !config.is_image_extension(extension) {
            continue;
        }

        let normalized_id = normalizer.normalize_path(&path, images_root);
        let extension = extension.to_lowercase();
        index.insert(ImageAsset {
            path,
            normalized_id,
            extension,
        });
    }

    for (id, files) in index.collisions() {
        warnings.push(Warning::AmbiguousImageId {
            id: id.to_string(),
            paths: files.iter().map(|a| a.path.clone()).collect(),
        });
    }

    Ok((index, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup() -> (Normalizer, ScanConfig) {
        let config = ScanConfig::default();
        (Normalizer::new(&config), config)
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let (normalizer, config) = setup();
        let result = index_images(Path::new("/no/such/dir"), &normalizer, &config);
        assert!(matches!(result, Err(ScanError::PathNotFound(_))));
    }

    #[test]
    fn test_indexes_recursively_and_filters_extensions() {
        let (normalizer, config) = setup();
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("bg")).unwrap();
        fs::write(dir.path().join("logo.png"), b"").unwrap();
        fs::write(dir.path().join("bg").join("room.webp"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let (index, warnings) = index_images(dir.path(), &normalizer, &config).unwrap();
        assert_eq!(index.id_count(), 2);
        assert_eq!(index.file_count(), 2);
        assert!(index.contains("logo"));
        assert!(index.contains("bg/room"));
        assert!(!index.contains("notes"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_collision_keeps_both_and_warns() {
        let (normalizer, config) = setup();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bg_room.png"), b"").unwrap();
        fs::write(dir.path().join("bg_room.jpg"), b"").unwrap();

        let (index, warnings) = index_images(dir.path(), &normalizer, &config).unwrap();
        assert_eq!(index.id_count(), 1);
        let files = index.get("bg_room").unwrap();
        assert_eq!(files.len(), 2);

        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            Warning::AmbiguousImageId { id, paths } if id == "bg_room" && paths.len() == 2
        ));
    }

    #[test]
    fn test_asset_fields() {
        let (normalizer, config) = setup();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Logo.PNG"), b"").unwrap();

        let (index, _) = index_images(dir.path(), &normalizer, &config).unwrap();
        let files = index.get("logo").unwrap();
        assert_eq!(files[0].extension, "png");
        assert!(files[0].path.ends_with("Logo.PNG"));
    }

    #[test]
    fn test_deterministic_order() {
        let (normalizer, config) = setup();
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta.png", "alpha.png", "mid.png"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let (index, _) = index_images(dir.path(), &normalizer, &config).unwrap();
        let ids: Vec<&str> = index.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }
}
