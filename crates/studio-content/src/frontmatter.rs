//! Front matter extraction.
//!
//! A front matter block is a run of `key: value` lines between two lines
//! that contain only `---`, at the very start of a document:
//!
//! ```text
//! ---
//! title: 'Cold Email That Converts'
//! category: Sales
//! ---
//! ## Body starts here
//! ```
//!
//! Parsing is deliberately lenient. A document without a block, or whose
//! closing delimiter has not arrived yet, simply has no front matter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Line that opens and closes a front matter block.
pub const DELIMITER: &str = "---";

/// Ordered key/value metadata parsed from a front matter block.
///
/// The key set is open: whatever the source emits is kept. Accessors for
/// the conventional keys all return `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter {
    entries: IndexMap<String, String>,
}

impl FrontMatter {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert a value. A repeated key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the block had no usable lines.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in the order they first appeared.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `title` field.
    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    /// The `category` field.
    pub fn category(&self) -> Option<&str> {
        self.get("category")
    }

    /// The `date` field.
    pub fn date(&self) -> Option<&str> {
        self.get("date")
    }

    /// The `excerpt` field.
    pub fn excerpt(&self) -> Option<&str> {
        self.get("excerpt")
    }

    /// The `author` field.
    pub fn author(&self) -> Option<&str> {
        self.get("author")
    }

    /// The `readTime` field.
    pub fn read_time(&self) -> Option<&str> {
        self.get("readTime")
    }

    /// The raw `tags` field, usually a bracketed list such as `[a, b]`.
    pub fn tags(&self) -> Option<&str> {
        self.get("tags")
    }

    /// Render back into a delimited block, one `key: value` line per entry.
    pub fn to_block(&self) -> String {
        let mut out = String::from(DELIMITER);
        out.push('\n');
        for (key, value) in self.iter() {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FrontMatter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fm = Self::new();
        for (k, v) in iter {
            fm.insert(k, v);
        }
        fm
    }
}

/// A document split at its front matter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// Lines between the delimiters, without the delimiters themselves.
    pub block: &'a str,
    /// Everything after the closing delimiter line.
    pub rest: &'a str,
}

/// Locate the front matter block at the start of `text`.
///
/// Returns `None` when the first line is not exactly `---` or when no
/// closing `---` line exists yet.
pub fn split_front_matter(text: &str) -> Option<Split<'_>> {
    let (first, mut remaining) = next_line(text)?;
    if trim_cr(first) != DELIMITER {
        return None;
    }

    let block_start = text.len() - remaining.len();
    loop {
        let line_start = text.len() - remaining.len();
        let (line, after) = next_line(remaining)?;
        if trim_cr(line) == DELIMITER {
            // The block excludes the newline that precedes the closing line.
            let block_end = line_start.saturating_sub(1).max(block_start);
            return Some(Split {
                block: &text[block_start..block_end],
                rest: after,
            });
        }
        remaining = after;
    }
}

/// Parse the front matter block at the start of `text`, if complete.
pub fn parse_front_matter(text: &str) -> Option<FrontMatter> {
    split_front_matter(text).map(|split| parse_block(split.block))
}

/// Parse the inner lines of a block into a mapping.
pub fn parse_block(block: &str) -> FrontMatter {
    let mut fm = FrontMatter::new();
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fm.insert(key, unquote(value.trim()));
    }
    fm
}

/// The document with its front matter block and any following blank lines
/// removed. Without a complete block the whole text is body.
pub fn strip_front_matter(text: &str) -> &str {
    match split_front_matter(text) {
        Some(split) => skip_blank_lines(split.rest),
        None => text,
    }
}

/// Remove one matching pair of surrounding `'` or `"` quotes.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'\'' || first == b'"') && first == last {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Split off the first line. The returned line excludes the `\n`; the final
/// line of a text without a trailing newline is returned as-is.
fn next_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.find('\n') {
        Some(idx) => Some((&text[..idx], &text[idx + 1..])),
        None => Some((text, "")),
    }
}

fn trim_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn skip_blank_lines(mut text: &str) -> &str {
    while let Some((line, rest)) = next_line(text) {
        if !line.trim().is_empty() {
            break;
        }
        text = rest;
    }
    text
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "---\ntitle: 'Cold Email That Converts'\ndate: 2025-03-01\nexcerpt: \"Open rates, explained\"\ncategory: Sales\ntags: [email, outreach]\nauthor: 'BenEl Team'\nreadTime: '6 min read'\n---\n\n## Why it matters\n";

    #[test]
    fn test_parse_full_block() {
        let fm = parse_front_matter(SAMPLE).unwrap();
        assert_eq!(fm.len(), 7);
        assert_eq!(fm.title(), Some("Cold Email That Converts"));
        assert_eq!(fm.date(), Some("2025-03-01"));
        assert_eq!(fm.excerpt(), Some("Open rates, explained"));
        assert_eq!(fm.category(), Some("Sales"));
        assert_eq!(fm.tags(), Some("[email, outreach]"));
        assert_eq!(fm.author(), Some("BenEl Team"));
        assert_eq!(fm.read_time(), Some("6 min read"));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let fm = parse_front_matter(SAMPLE).unwrap();
        let keys: Vec<&str> = fm.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["title", "date", "excerpt", "category", "tags", "author", "readTime"]
        );
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let fm = parse_front_matter("---\nmood: sunny\ncoverImage: /a.png\n---\n").unwrap();
        assert_eq!(fm.get("mood"), Some("sunny"));
        assert_eq!(fm.get("coverImage"), Some("/a.png"));
        assert!(fm.title().is_none());
    }

    #[test]
    fn test_value_split_on_first_colon() {
        let fm = parse_front_matter("---\ntitle: Sales: The Sequel\n---\n").unwrap();
        assert_eq!(fm.title(), Some("Sales: The Sequel"));
    }

    #[test]
    fn test_lines_without_colon_or_key_are_ignored() {
        let fm = parse_front_matter("---\njust words\n: orphan\ntitle: X\n---\n").unwrap();
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.title(), Some("X"));
    }

    #[test]
    fn test_only_matching_quote_pair_is_removed() {
        let fm = parse_front_matter(
            "---\na: 'single'\nb: \"double\"\nc: 'mixed\"\nd: '\ne: it's\n---\n",
        )
        .unwrap();
        assert_eq!(fm.get("a"), Some("single"));
        assert_eq!(fm.get("b"), Some("double"));
        assert_eq!(fm.get("c"), Some("'mixed\""));
        assert_eq!(fm.get("d"), Some("'"));
        assert_eq!(fm.get("e"), Some("it's"));
    }

    #[test]
    fn test_duplicate_key_overwrites_in_place() {
        let fm = parse_front_matter("---\ntitle: A\ndate: D\ntitle: B\n---\n").unwrap();
        let entries: Vec<(&str, &str)> = fm.iter().collect();
        assert_eq!(entries, vec![("title", "B"), ("date", "D")]);
    }

    #[test]
    fn test_empty_block() {
        let fm = parse_front_matter("---\n---\nbody").unwrap();
        assert!(fm.is_empty());
        assert_eq!(strip_front_matter("---\n---\nbody"), "body");
    }

    #[test]
    fn test_missing_closing_delimiter_is_absent() {
        assert!(parse_front_matter("---").is_none());
        assert!(parse_front_matter("---\n").is_none());
        assert!(parse_front_matter("---\ntitle: 'Half").is_none());
        assert!(parse_front_matter("---\ntitle: 'X'\n--").is_none());
    }

    #[test]
    fn test_closing_delimiter_without_trailing_newline() {
        let fm = parse_front_matter("---\ntitle: 'X'\n---").unwrap();
        assert_eq!(fm.title(), Some("X"));
    }

    #[test]
    fn test_no_front_matter() {
        assert!(parse_front_matter("").is_none());
        assert!(parse_front_matter("## Heading\n---\n").is_none());
        assert!(parse_front_matter(" ---\ntitle: X\n---\n").is_none());
        assert!(parse_front_matter("----\ntitle: X\n----\n").is_none());
    }

    #[test]
    fn test_crlf_delimiters() {
        let fm = parse_front_matter("---\r\ntitle: 'X'\r\n---\r\nBody").unwrap();
        assert_eq!(fm.title(), Some("X"));
        assert_eq!(strip_front_matter("---\r\ntitle: 'X'\r\n---\r\nBody"), "Body");
    }

    #[test]
    fn test_split_exposes_block_and_rest() {
        let split = split_front_matter("---\na: 1\nb: 2\n---\nrest\n").unwrap();
        assert_eq!(split.block, "a: 1\nb: 2");
        assert_eq!(split.rest, "rest\n");
    }

    #[test]
    fn test_strip_removes_leading_blank_lines() {
        assert_eq!(strip_front_matter(SAMPLE), "## Why it matters\n");
        assert_eq!(strip_front_matter("---\na: 1\n---\n\n  \n\nText"), "Text");
    }

    #[test]
    fn test_strip_without_block_keeps_everything() {
        assert_eq!(strip_front_matter("---\ntitle: 'Half"), "---\ntitle: 'Half");
        assert_eq!(strip_front_matter("Plain body"), "Plain body");
    }

    #[test]
    fn test_to_block_round_trip() {
        let fm: FrontMatter = [("title", "X"), ("category", "Sales")].into_iter().collect();
        assert_eq!(fm.to_block(), "---\ntitle: X\ncategory: Sales\n---\n");
        assert_eq!(parse_front_matter(&fm.to_block()).unwrap(), fm);
    }

    proptest! {
        #[test]
        fn prop_extracts_exact_pairs_and_is_idempotent(
            pairs in prop::collection::btree_map("[a-zA-Z][a-zA-Z0-9_]{0,8}", "[A-Za-z0-9][A-Za-z0-9 ,.]{0,14}[A-Za-z0-9]", 0..8),
            quote in prop::sample::select(vec!["", "'", "\""]),
        ) {
            let mut text = String::from("---\n");
            for (k, v) in &pairs {
                text.push_str(&format!("{k}: {quote}{v}{quote}\n"));
            }
            text.push_str("---\n## Body\n");

            let parsed = parse_front_matter(&text).unwrap();
            prop_assert_eq!(parsed.len(), pairs.len());
            for (k, v) in &pairs {
                prop_assert_eq!(parsed.get(k), Some(v.as_str()));
            }

            let reparsed = parse_front_matter(&parsed.to_block()).unwrap();
            prop_assert_eq!(reparsed, parsed);
        }

        #[test]
        fn prop_unterminated_block_never_parses(body in "[a-z: \n']{0,40}") {
            let text = format!("---\n{body}");
            prop_assert!(parse_front_matter(&text).is_none());
            prop_assert_eq!(strip_front_matter(&text), text.as_str());
        }
    }
}
