//! Reference extraction from script files.
//!
//! Walks the scripts root, reads each script file as text, and runs the
//! [`PatternSet`](patterns::PatternSet) over it. Every match is
//! normalized with the same rules the indexer uses and recorded in a
//! [`UsageIndex`]. Unreadable or non-UTF-8 files are skipped with a
//! warning; they never abort the run.

pub mod patterns;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::normalize::Normalizer;
use crate::report::{ScanError, ScanResult, Warning};
use patterns::PatternSet;

/// One raw match found in a script, with its normalized form.
///
/// Tokens are ephemeral: produced per file, folded into the
/// [`UsageIndex`], and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceToken {
    /// The matched text as it appeared in the script.
    pub raw: String,
    /// Normalized identifier of the match.
    pub normalized_id: String,
    /// Script file the match came from.
    pub script: PathBuf,
}

/// Mapping from normalized identifier to the scripts that reference it.
///
/// Every key was produced by at least one [`ReferenceToken`].
#[derive(Debug, Clone, Default)]
pub struct UsageIndex {
    refs: HashMap<String, Vec<PathBuf>>,
}

impl UsageIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a token.
    pub fn insert(&mut self, token: ReferenceToken) {
        self.refs
            .entry(token.normalized_id)
            .or_default()
            .push(token.script);
    }

    /// Returns true if the identifier is referenced anywhere.
    pub fn contains(&self, id: &str) -> bool {
        self.refs.contains_key(id)
    }

    /// Scripts referencing an identifier.
    pub fn locations(&self, id: &str) -> Option<&[PathBuf]> {
        self.refs.get(id).map(|v| v.as_slice())
    }

    /// Iterate over the referenced identifiers.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.refs.keys().map(String::as_str)
    }

    /// Number of distinct referenced identifiers.
    pub fn id_count(&self) -> usize {
        self.refs.len()
    }
}

/// Extract every reference token from one script's text.
///
/// Pure: no file system access. Matches that normalize to an empty
/// identifier (e.g. a bare placeholder template) are dropped.
pub fn extract_from_str(
    text: &str,
    script: &Path,
    patterns: &PatternSet,
    normalizer: &Normalizer,
) -> Vec<ReferenceToken> {
    let mut tokens = Vec::new();
    for raw in patterns.find_references(text) {
        let stripped = patterns.strip_placeholders(raw);
        let normalized_id = normalizer.normalize(&stripped);
        if normalized_id.is_empty() {
            continue;
        }
        tokens.push(ReferenceToken {
            raw: raw.to_string(),
            normalized_id,
            script: script.to_path_buf(),
        });
    }
    tokens
}

/// Walk `scripts_root` and build the usage index from every script file.
///
/// Fatal only if the root itself is missing or not a directory.
pub fn extract_references(
    scripts_root: &Path,
    patterns: &PatternSet,
    normalizer: &Normalizer,
    config: &ScanConfig,
) -> ScanResult<(UsageIndex, Vec<Warning>)> {
    if !scripts_root.is_dir() {
        return Err(ScanError::PathNotFound(scripts_root.to_path_buf()));
    }

    let mut usage = UsageIndex::new();
    let mut warnings = Vec::new();

    for entry in WalkDir::new(scripts_root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| scripts_root.to_path_buf());
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
        let is_script = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| config.is_script_extension(e));
        if !is_script {
            continue;
        }

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                warnings.push(Warning::Unreadable {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        for token in extract_from_str(&text, &path, patterns, normalizer) {
            usage.insert(token);
        }
    }

    Ok((usage, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup() -> (PatternSet, Normalizer, ScanConfig) {
        let config = ScanConfig::default();
        let patterns = PatternSet::for_config(&config).unwrap();
        let normalizer = Normalizer::new(&config);
        (patterns, normalizer, config)
    }

    // ===== extract_from_str =====

    #[test]
    fn test_tokens_are_normalized() {
        let (patterns, normalizer, _) = setup();
        let text = "scene BG_Room\nadd \"images/GUI/Frame.PNG\"";
        let tokens = extract_from_str(text, Path::new("day1.rpy"), &patterns, &normalizer);

        let ids: Vec<&str> = tokens.iter().map(|t| t.normalized_id.as_str()).collect();
        assert!(ids.contains(&"bg_room"));
        assert!(ids.contains(&"gui/frame"));
    }

    #[test]
    fn test_token_keeps_raw_and_source() {
        let (patterns, normalizer, _) = setup();
        let tokens =
            extract_from_str("show eileen", Path::new("intro.rpy"), &patterns, &normalizer);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].raw, "eileen");
        assert_eq!(tokens[0].normalized_id, "eileen");
        assert_eq!(tokens[0].script, Path::new("intro.rpy"));
    }

    #[test]
    fn test_placeholder_template_normalizes_to_stem() {
        let (patterns, normalizer, _) = setup();
        let text = "imagebutton auto \"gui/button_%s.png\" action NullAction()";
        let tokens = extract_from_str(text, Path::new("screens.rpy"), &patterns, &normalizer);
        assert!(tokens.iter().any(|t| t.normalized_id == "gui/button_"));
    }

    #[test]
    fn test_plain_prose_extracts_nothing() {
        let (patterns, normalizer, _) = setup();
        let text = "label start:\n    \"Nothing to see here.\"\n    return";
        let tokens = extract_from_str(text, Path::new("x.rpy"), &patterns, &normalizer);
        assert!(tokens.is_empty());
    }

    // ===== UsageIndex =====

    #[test]
    fn test_usage_index_aggregates_locations() {
        let mut usage = UsageIndex::new();
        for script in ["a.rpy", "b.rpy"] {
            usage.insert(ReferenceToken {
                raw: "bg_room".to_string(),
                normalized_id: "bg_room".to_string(),
                script: PathBuf::from(script),
            });
        }
        assert_eq!(usage.id_count(), 1);
        assert!(usage.contains("bg_room"));
        assert_eq!(usage.locations("bg_room").unwrap().len(), 2);
        assert!(usage.locations("missing").is_none());
    }

    // ===== extract_references =====

    #[test]
    fn test_missing_root_is_fatal() {
        let (patterns, normalizer, config) = setup();
        let result =
            extract_references(Path::new("/no/such/dir"), &patterns, &normalizer, &config);
        assert!(matches!(result, Err(ScanError::PathNotFound(_))));
    }

    #[test]
    fn test_walks_scripts_and_skips_other_files() {
        let (patterns, normalizer, config) = setup();
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("chapter1")).unwrap();
        fs::write(dir.path().join("intro.rpy"), "scene bg_room\n").unwrap();
        fs::write(
            dir.path().join("chapter1").join("day.rpy"),
            "show eileen happy\n",
        )
        .unwrap();
        fs::write(dir.path().join("readme.md"), "scene not_a_script\n").unwrap();

        let (usage, warnings) =
            extract_references(dir.path(), &patterns, &normalizer, &config).unwrap();
        assert!(usage.contains("bg_room"));
        assert!(usage.contains("eileen"));
        assert!(!usage.contains("not_a_script"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_non_utf8_script_warns_and_continues() {
        let (patterns, normalizer, config) = setup();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.rpy"), "scene bg_room\n").unwrap();
        fs::write(dir.path().join("binary.rpy"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let (usage, warnings) =
            extract_references(dir.path(), &patterns, &normalizer, &config).unwrap();
        assert!(usage.contains("bg_room"));
        assert_eq!(warnings.len(), 1);
        assert!(matches!(&warnings[0], Warning::Unreadable { path, .. }
            if path.ends_with("binary.rpy")));
    }
}
