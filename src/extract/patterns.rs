//! Reference syntax patterns.
//!
//! The extractor does not parse the scripting language; it scans raw text
//! with a table of regular expressions, one per reference syntax. The
//! table is configurable because reference conventions are
//! project-specific: the defaults cover the common visual-novel forms, and
//! callers can push their own patterns on top.
//!
//! Over-matching is deliberate here. A pattern that flags too much as
//! "used" can only keep an unused image around; a pattern that misses a
//! reference could delete an image the game still loads.

use regex::Regex;

use crate::config::ScanConfig;

/// A single named reference syntax.
///
/// The regex must have exactly one capture group holding the reference.
#[derive(Debug, Clone)]
pub struct ReferencePattern {
    name: String,
    regex: Regex,
}

impl ReferencePattern {
    /// Compile a pattern. Fails if the regex is invalid or has no capture
    /// group.
    pub fn new(name: &str, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        if regex.captures_len() < 2 {
            return Err(regex::Error::Syntax(format!(
                "pattern '{}' has no capture group",
                name
            )));
        }
        Ok(Self {
            name: name.to_string(),
            regex,
        })
    }

    /// Name of the syntax this pattern recognizes.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The table of reference syntaxes applied to every script file.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<ReferencePattern>,
    placeholder: Regex,
}

impl PatternSet {
    /// Build the default table for a configuration:
    ///
    /// 1. `directive` — `show`/`scene` at line start followed by an
    ///    identifier (which may contain `/` for path-style names).
    /// 2. `image-define` — `image <name> = …`, binding a logical name.
    /// 3. `quoted-literal` — any quoted string ending in a recognized
    ///    image extension.
    /// 4. `imagebutton` — quoted path in an `imagebutton` declaration,
    ///    including `auto` templates with `%`-placeholders.
    /// 5. `prefixed-literal` — quoted strings starting with a configured
    ///    image-root prefix (`"images/…"`), with or without an extension.
    pub fn for_config(config: &ScanConfig) -> Result<Self, regex::Error> {
        let ext_alt = config
            .image_extensions
            .iter()
            .map(|e| regex::escape(e))
            .collect::<Vec<_>>()
            .join("|");

        let mut set = Self {
            patterns: Vec::new(),
            placeholder: Regex::new(r"%.")?,
        };
        set.push("directive", r"(?mi)^\s*(?:show|scene)\s+([\w/-]+)")?;
        set.push("image-define", r"(?mi)^\s*image\s+([\w/-]+)\s*=")?;
        set.push(
            "quoted-literal",
            &format!("(?i)\"([^\"\\n]+\\.(?:{}))\"", ext_alt),
        )?;
        set.push(
            "imagebutton",
            "(?i)imagebutton\\s+(?:auto\\s+)?(?:hover\\s+)?\"([^\"\\n]+)\"",
        )?;
        if !config.strip_prefixes.is_empty() {
            let prefix_alt = config
                .strip_prefixes
                .iter()
                .map(|p| regex::escape(p.trim_matches('/')))
                .collect::<Vec<_>>()
                .join("|");
            set.push(
                "prefixed-literal",
                &format!("(?i)\"((?:{})/[^\"\\n]+)\"", prefix_alt),
            )?;
        }
        Ok(set)
    }

    /// Add a custom pattern to the table.
    pub fn push(&mut self, name: &str, pattern: &str) -> Result<(), regex::Error> {
        self.patterns.push(ReferencePattern::new(name, pattern)?);
        Ok(())
    }

    /// Number of patterns in the table.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// All group-1 captures of every pattern over `text`, in pattern
    /// order. Matches are raw; normalization happens in the extractor.
    pub fn find_references<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut found = Vec::new();
        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(text) {
                if let Some(m) = caps.get(1) {
                    found.push(m.as_str());
                }
            }
        }
        found
    }

    /// Strip `%`-placeholders (`button_%s.png` → `button_.png`) so the
    /// static part of a template still matches an indexed file stem.
    pub fn strip_placeholders(&self, raw: &str) -> String {
        self.placeholder.replace_all(raw, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_set() -> PatternSet {
        PatternSet::for_config(&ScanConfig::default()).unwrap()
    }

    #[test]
    fn test_directive_matches_show_and_scene() {
        let set = default_set();
        let text = "    show eileen happy\nscene bg_room\n  SCENE gui/frame";
        let refs = set.find_references(text);
        assert!(refs.contains(&"eileen"));
        assert!(refs.contains(&"bg_room"));
        assert!(refs.contains(&"gui/frame"));
    }

    #[test]
    fn test_directive_requires_line_start() {
        let set = default_set();
        let refs = set.find_references("# a sideshow attraction");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_image_define_captures_bound_name() {
        let set = default_set();
        let refs = set.find_references("image logo = \"images/logo_v2.png\"");
        assert!(refs.contains(&"logo"));
        // The quoted path is picked up by the literal pattern as well
        assert!(refs.contains(&"images/logo_v2.png"));
    }

    #[test]
    fn test_quoted_literal_requires_image_extension() {
        let set = default_set();
        let text = "play sound \"click.ogg\"\nadd \"gui/overlay.webp\"";
        let refs = set.find_references(text);
        assert_eq!(refs, vec!["gui/overlay.webp"]);
    }

    #[test]
    fn test_imagebutton_captures_path_template() {
        let set = default_set();
        let refs =
            set.find_references("imagebutton auto \"gui/button_%s.png\" action NullAction()");
        assert!(refs.contains(&"gui/button_%s.png"));
    }

    #[test]
    fn test_prefixed_literal_matches_without_extension() {
        let set = default_set();
        let refs = set.find_references("$ renpy.show_screen(\"x\", \"images/bg/room\")");
        assert!(refs.contains(&"images/bg/room"));
        // An unprefixed, extension-less literal is dialogue, not a reference
        let refs = set.find_references("\"bg/room\"");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_strip_placeholders() {
        let set = default_set();
        assert_eq!(set.strip_placeholders("button_%s.png"), "button_.png");
        assert_eq!(set.strip_placeholders("plain.png"), "plain.png");
        assert_eq!(set.strip_placeholders("%d_%s"), "_");
    }

    #[test]
    fn test_custom_pattern() {
        let mut set = default_set();
        let before = set.len();
        set.push("portrait", r"(?m)^\s*portrait\s+([\w/-]+)").unwrap();
        assert_eq!(set.len(), before + 1);
        let refs = set.find_references("portrait hero_smile");
        assert!(refs.contains(&"hero_smile"));
    }

    #[test]
    fn test_pattern_without_capture_group_rejected() {
        assert!(ReferencePattern::new("bad", r"\w+").is_err());
    }

    #[test]
    fn test_invalid_regex_rejected() {
        assert!(ReferencePattern::new("bad", r"([unclosed").is_err());
    }
}
