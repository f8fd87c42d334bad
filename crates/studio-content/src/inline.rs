//! Inline span formatting.
//!
//! A line is scanned once, left to right, with a single alternation that
//! recognises, in priority order at each position:
//!
//! - bold: `**text**` (non-greedy)
//! - italic: `*text*` (non-greedy, the content cannot contain `*`)
//! - code: `` `text` ``
//!
//! Matched spans are not scanned again, so formatting does not nest.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[allow(clippy::expect_used)]
static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(?P<bold>.*?)\*\*|\*(?P<italic>[^*]+?)\*|`(?P<code>[^`]+?)`")
        .expect("inline pattern is valid")
});

/// One run of text carrying a single formatting kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum InlineSpan {
    /// Unformatted text.
    Plain(String),
    /// `**bold**`
    Bold(String),
    /// `*italic*`
    Italic(String),
    /// `` `code` ``
    Code(String),
}

impl InlineSpan {
    /// The visible text, without formatting markers.
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(t) | Self::Bold(t) | Self::Italic(t) | Self::Code(t) => t,
        }
    }

    /// The markdown this span was parsed from.
    pub fn to_markdown(&self) -> String {
        match self {
            Self::Plain(t) => t.clone(),
            Self::Bold(t) => format!("**{t}**"),
            Self::Italic(t) => format!("*{t}*"),
            Self::Code(t) => format!("`{t}`"),
        }
    }

    /// Whether the span is unformatted.
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain(_))
    }
}

/// Split a line into spans.
///
/// # Example
///
/// ```
/// use studio_content::inline::{format_inline, InlineSpan};
///
/// let spans = format_inline("a **b** `c`");
/// assert_eq!(spans[1], InlineSpan::Bold("b".into()));
/// assert_eq!(spans[3], InlineSpan::Code("c".into()));
/// ```
pub fn format_inline(line: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            spans.push(InlineSpan::Plain(line[last..whole.start()].to_string()));
        }
        let span = if let Some(m) = caps.name("bold") {
            InlineSpan::Bold(m.as_str().to_string())
        } else if let Some(m) = caps.name("italic") {
            InlineSpan::Italic(m.as_str().to_string())
        } else if let Some(m) = caps.name("code") {
            InlineSpan::Code(m.as_str().to_string())
        } else {
            InlineSpan::Plain(whole.as_str().to_string())
        };
        spans.push(span);
        last = whole.end();
    }

    if last < line.len() {
        spans.push(InlineSpan::Plain(line[last..].to_string()));
    }
    spans
}

/// Concatenated visible text of a span sequence.
pub fn plain_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

/// Concatenated markdown source of a span sequence.
pub fn to_markdown(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::to_markdown).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn plain(s: &str) -> InlineSpan {
        InlineSpan::Plain(s.to_string())
    }

    #[test]
    fn test_mixed_line() {
        let spans = format_inline("Use **bold** and *italic* and `code`.");
        assert_eq!(
            spans,
            vec![
                plain("Use "),
                InlineSpan::Bold("bold".into()),
                plain(" and "),
                InlineSpan::Italic("italic".into()),
                plain(" and "),
                InlineSpan::Code("code".into()),
                plain("."),
            ]
        );
    }

    #[test]
    fn test_plain_line_is_one_span() {
        assert_eq!(format_inline("nothing special"), vec![plain("nothing special")]);
    }

    #[test]
    fn test_empty_line_has_no_spans() {
        assert!(format_inline("").is_empty());
    }

    #[test]
    fn test_bold_is_non_greedy() {
        let spans = format_inline("**a** and **b**");
        assert_eq!(
            spans,
            vec![
                InlineSpan::Bold("a".into()),
                plain(" and "),
                InlineSpan::Bold("b".into()),
            ]
        );
    }

    #[test]
    fn test_italic_does_not_consume_double_star() {
        let spans = format_inline("**strong** then *soft*");
        assert_eq!(spans[0], InlineSpan::Bold("strong".into()));
        assert_eq!(spans[2], InlineSpan::Italic("soft".into()));
    }

    #[test]
    fn test_no_nesting() {
        let spans = format_inline("**bold with *inner* text**");
        assert_eq!(spans, vec![InlineSpan::Bold("bold with *inner* text".into())]);

        let spans = format_inline("`**not bold**`");
        assert_eq!(spans, vec![InlineSpan::Code("**not bold**".into())]);
    }

    #[test]
    fn test_unclosed_markers_stay_plain() {
        assert_eq!(format_inline("a * b"), vec![plain("a * b")]);
        assert_eq!(format_inline("price `5"), vec![plain("price `5")]);
        assert_eq!(format_inline("**open"), vec![plain("**open")]);
    }

    #[test]
    fn test_empty_bold() {
        assert_eq!(format_inline("****"), vec![InlineSpan::Bold(String::new())]);
    }

    #[test]
    fn test_plain_text_strips_markers() {
        let spans = format_inline("Use **bold** and *italic* and `code`.");
        assert_eq!(plain_text(&spans), "Use bold and italic and code.");
    }

    #[test]
    fn test_span_serialization() {
        let json = serde_json::to_string(&InlineSpan::Bold("x".into())).unwrap_or_default();
        assert_eq!(json, r#"{"kind":"bold","text":"x"}"#);
    }

    proptest! {
        #[test]
        fn prop_markdown_round_trip(line in "[a-z *`]{0,40}") {
            let spans = format_inline(&line);
            prop_assert_eq!(to_markdown(&spans), line);
        }

        #[test]
        fn prop_plain_text_matches_marker_removal(
            words in prop::collection::vec(("[a-z ]{1,6}", 0usize..4), 0..8)
        ) {
            let mut line = String::new();
            let mut visible = String::new();
            for (word, kind) in &words {
                let word = word.trim();
                prop_assume!(!word.is_empty());
                match kind {
                    0 => line.push_str(word),
                    1 => line.push_str(&format!("**{word}**")),
                    2 => line.push_str(&format!("*{word}*")),
                    _ => line.push_str(&format!("`{word}`")),
                }
                line.push(' ');
                visible.push_str(word);
                visible.push(' ');
            }
            prop_assert_eq!(plain_text(&format_inline(&line)), visible);
        }

        #[test]
        fn prop_no_adjacent_plain_spans(line in "[a-z *`]{0,40}") {
            let spans = format_inline(&line);
            for pair in spans.windows(2) {
                prop_assert!(!(pair[0].is_plain() && pair[1].is_plain()));
            }
        }
    }
}
