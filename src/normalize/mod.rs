//! Path and reference normalization.
//!
//! Image files and script references arrive in many spellings: absolute
//! paths, `images/`-prefixed relative paths, backslash separators, mixed
//! case, with or without an extension. [`Normalizer`] folds all of them
//! into one comparable identifier so the indexer and the extractor agree
//! on equality.

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::ScanConfig;

/// Canonicalizes paths and reference tokens into normalized identifiers.
///
/// Normalization is idempotent: `normalize(normalize(x)) == normalize(x)`.
/// It never fails; a string with nothing to normalize comes back unchanged.
#[derive(Debug, Clone)]
pub struct Normalizer {
    case_sensitive: bool,
    image_extensions: BTreeSet<String>,
    strip_prefixes: Vec<String>,
}

impl Normalizer {
    /// Build a normalizer from the scan configuration.
    pub fn new(config: &ScanConfig) -> Self {
        let strip_prefixes = config
            .strip_prefixes
            .iter()
            .map(|p| {
                let p = p.trim_matches('/');
                if config.case_sensitive {
                    p.to_string()
                } else {
                    p.to_lowercase()
                }
            })
            .filter(|p| !p.is_empty())
            .collect();

        Self {
            case_sensitive: config.case_sensitive,
            image_extensions: config
                .image_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            strip_prefixes,
        }
    }

    /// Normalize a raw path or reference token into an identifier.
    ///
    /// Applies, in order: whitespace trimming, separator unification
    /// (`\` becomes `/`), leading `./` and `/` removal, case folding
    /// (unless configured case-sensitive), configured root-prefix
    /// stripping, and recognized-image-extension stripping. Extension and
    /// prefix stripping repeat until nothing more applies, which keeps the
    /// whole operation idempotent.
    pub fn normalize(&self, raw: &str) -> String {
        let mut id = raw.trim().replace('\\', "/");

        if !self.case_sensitive {
            id = id.to_lowercase();
        }

        let mut s = id.as_str();
        s = s.trim_start_matches('/');
        while let Some(rest) = s.strip_prefix("./") {
            s = rest.trim_start_matches('/');
        }

        let mut changed = true;
        while changed {
            changed = false;
            for prefix in &self.strip_prefixes {
                if let Some(rest) = s.strip_prefix(prefix.as_str()) {
                    if let Some(rest) = rest.strip_prefix('/') {
                        s = rest;
                        changed = true;
                    }
                }
            }
        }

        let mut out = s.to_string();
        while let Some(stem) = self.strip_image_extension(&out) {
            out = stem;
        }
        out
    }

    /// Normalize a file path relative to a scanned root.
    ///
    /// This is the form the indexer stores: the path below `root`, run
    /// through the same token rules as script references.
    pub fn normalize_path(&self, path: &Path, root: &Path) -> String {
        let relative = path.strip_prefix(root).unwrap_or(path);
        self.normalize(&relative.to_string_lossy())
    }

    /// Strip one trailing recognized image extension, if present.
    fn strip_image_extension(&self, id: &str) -> Option<String> {
        let (stem, ext) = id.rsplit_once('.')?;
        if stem.is_empty() || ext.contains('/') {
            return None;
        }
        if self.image_extensions.contains(&ext.to_lowercase()) {
            Some(stem.to_string())
        } else {
            None
        }
    }
}

/// The bare file name of an identifier: everything after the last `/`.
pub fn basename(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}
