//! Block structure parsing.
//!
//! The body dialect is intentionally small. Each line is classified by the
//! first rule that matches:
//!
//! 1. `### ` heading (level 3)
//! 2. `## ` heading (level 2)
//! 3. `> ` blockquote
//! 4. `- ` or `* ` unordered list item
//! 5. `<digits>.` followed by whitespace, ordered list item
//! 6. blank line, skipped
//! 7. anything else, a paragraph
//!
//! Consecutive list items of the same kind form one list. Every other block
//! is exactly one line; paragraphs are never merged.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::inline::{format_inline, plain_text, InlineSpan};

#[allow(clippy::expect_used)]
static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("ordered marker pattern is valid"));

/// One structural unit of a rendered body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// `## ` or `### ` heading.
    Heading {
        /// 2 or 3.
        level: u8,
        /// Heading text.
        spans: Vec<InlineSpan>,
    },
    /// `> ` quote line.
    Blockquote {
        /// Quote text.
        spans: Vec<InlineSpan>,
    },
    /// Run of `- ` / `* ` lines.
    UnorderedList {
        /// One entry per line.
        items: Vec<Vec<InlineSpan>>,
    },
    /// Run of `1. ` lines.
    OrderedList {
        /// One entry per line, markers removed.
        items: Vec<Vec<InlineSpan>>,
    },
    /// Any other non-blank line.
    Paragraph {
        /// Paragraph text.
        spans: Vec<InlineSpan>,
    },
}

impl Block {
    /// Visible text of the block; list items are joined with `\n`.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Heading { spans, .. } | Self::Blockquote { spans } | Self::Paragraph { spans } => {
                plain_text(spans)
            }
            Self::UnorderedList { items } | Self::OrderedList { items } => items
                .iter()
                .map(|item| plain_text(item))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Short name of the block kind, used in logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Blockquote { .. } => "blockquote",
            Self::UnorderedList { .. } => "unordered_list",
            Self::OrderedList { .. } => "ordered_list",
            Self::Paragraph { .. } => "paragraph",
        }
    }
}

/// How a single line is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Heading(u8, &'a str),
    Quote(&'a str),
    Bullet(&'a str),
    Numbered(&'a str),
    Blank,
    Text(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix("### ") {
        LineKind::Heading(3, rest)
    } else if let Some(rest) = line.strip_prefix("## ") {
        LineKind::Heading(2, rest)
    } else if let Some(rest) = line.strip_prefix("> ") {
        LineKind::Quote(rest)
    } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        LineKind::Bullet(rest)
    } else if let Some(marker) = ORDERED_MARKER.find(line) {
        LineKind::Numbered(&line[marker.end()..])
    } else if line.trim().is_empty() {
        LineKind::Blank
    } else {
        LineKind::Text(line)
    }
}

/// The list being accumulated, if any.
enum OpenList {
    None,
    Unordered(Vec<Vec<InlineSpan>>),
    Ordered(Vec<Vec<InlineSpan>>),
}

impl OpenList {
    fn close(&mut self, out: &mut Vec<Block>) {
        match std::mem::replace(self, Self::None) {
            Self::None => {}
            Self::Unordered(items) => out.push(Block::UnorderedList { items }),
            Self::Ordered(items) => out.push(Block::OrderedList { items }),
        }
    }
}

/// Parse a document body (front matter already removed) into blocks.
///
/// # Example
///
/// ```
/// use studio_content::blocks::{parse_blocks, Block};
///
/// let blocks = parse_blocks("- a\n- b\n\nplain text");
/// assert_eq!(blocks.len(), 2);
/// assert!(matches!(blocks[0], Block::UnorderedList { .. }));
/// assert!(matches!(blocks[1], Block::Paragraph { .. }));
/// ```
pub fn parse_blocks(body: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut list = OpenList::None;

    for raw in body.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        match classify(line) {
            LineKind::Bullet(item) => {
                if !matches!(list, OpenList::Unordered(_)) {
                    list.close(&mut blocks);
                    list = OpenList::Unordered(Vec::new());
                }
                if let OpenList::Unordered(items) = &mut list {
                    items.push(format_inline(item));
                }
            }
            LineKind::Numbered(item) => {
                if !matches!(list, OpenList::Ordered(_)) {
                    list.close(&mut blocks);
                    list = OpenList::Ordered(Vec::new());
                }
                if let OpenList::Ordered(items) = &mut list {
                    items.push(format_inline(item));
                }
            }
            LineKind::Blank => list.close(&mut blocks),
            LineKind::Heading(level, text) => {
                list.close(&mut blocks);
                blocks.push(Block::Heading {
                    level,
                    spans: format_inline(text),
                });
            }
            LineKind::Quote(text) => {
                list.close(&mut blocks);
                blocks.push(Block::Blockquote {
                    spans: format_inline(text),
                });
            }
            LineKind::Text(text) => {
                list.close(&mut blocks);
                blocks.push(Block::Paragraph {
                    spans: format_inline(text),
                });
            }
        }
    }
    list.close(&mut blocks);
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Vec<InlineSpan> {
        vec![InlineSpan::Plain(s.to_string())]
    }

    #[test]
    fn test_list_then_paragraph() {
        let blocks = parse_blocks("- a\n- b\n\nplain text");
        assert_eq!(
            blocks,
            vec![
                Block::UnorderedList {
                    items: vec![text("a"), text("b")]
                },
                Block::Paragraph {
                    spans: text("plain text")
                },
            ]
        );
    }

    #[test]
    fn test_headings() {
        let blocks = parse_blocks("## Section\n### Sub\n#### Deeper\n# Top");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    spans: text("Section")
                },
                Block::Heading {
                    level: 3,
                    spans: text("Sub")
                },
                Block::Paragraph {
                    spans: text("#### Deeper")
                },
                Block::Paragraph {
                    spans: text("# Top")
                },
            ]
        );
    }

    #[test]
    fn test_heading_requires_space() {
        assert_eq!(
            parse_blocks("##NoSpace"),
            vec![Block::Paragraph {
                spans: text("##NoSpace")
            }]
        );
    }

    #[test]
    fn test_blockquote_with_inline() {
        let blocks = parse_blocks("> **Key** insight");
        assert_eq!(
            blocks,
            vec![Block::Blockquote {
                spans: vec![
                    InlineSpan::Bold("Key".into()),
                    InlineSpan::Plain(" insight".into())
                ]
            }]
        );
    }

    #[test]
    fn test_mixed_bullet_markers_form_one_list() {
        let blocks = parse_blocks("- one\n* two\n- three");
        assert_eq!(
            blocks,
            vec![Block::UnorderedList {
                items: vec![text("one"), text("two"), text("three")]
            }]
        );
    }

    #[test]
    fn test_ordered_list_strips_markers() {
        let blocks = parse_blocks("1. first\n2. second\n10. tenth");
        assert_eq!(
            blocks,
            vec![Block::OrderedList {
                items: vec![text("first"), text("second"), text("tenth")]
            }]
        );
    }

    #[test]
    fn test_ordered_marker_needs_whitespace() {
        assert_eq!(
            parse_blocks("2024.was a year"),
            vec![Block::Paragraph {
                spans: text("2024.was a year")
            }]
        );
    }

    #[test]
    fn test_list_kind_switch_closes_list() {
        let blocks = parse_blocks("- a\n1. b\n- c");
        assert_eq!(
            blocks,
            vec![
                Block::UnorderedList {
                    items: vec![text("a")]
                },
                Block::OrderedList {
                    items: vec![text("b")]
                },
                Block::UnorderedList {
                    items: vec![text("c")]
                },
            ]
        );
    }

    #[test]
    fn test_blank_line_splits_lists() {
        let blocks = parse_blocks("- a\n\n- b");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_paragraphs_are_not_merged() {
        let blocks = parse_blocks("line one\nline two");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    spans: text("line one")
                },
                Block::Paragraph {
                    spans: text("line two")
                },
            ]
        );
    }

    #[test]
    fn test_whitespace_lines_are_skipped() {
        assert!(parse_blocks("\n   \n\t\n").is_empty());
        assert!(parse_blocks("").is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let blocks = parse_blocks("## Title\r\n- a\r\n- b\r\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    spans: text("Title")
                },
                Block::UnorderedList {
                    items: vec![text("a"), text("b")]
                },
            ]
        );
    }

    #[test]
    fn test_partial_trailing_line_is_paragraph() {
        // Mid-stream the last line may be incomplete; it still renders.
        let blocks = parse_blocks("## Section\nSome pa");
        assert_eq!(
            blocks[1],
            Block::Paragraph {
                spans: text("Some pa")
            }
        );
    }

    #[test]
    fn test_plain_text_and_kind() {
        let blocks = parse_blocks("## **Big** idea\n- x\n- *y*");
        assert_eq!(blocks[0].plain_text(), "Big idea");
        assert_eq!(blocks[0].kind(), "heading");
        assert_eq!(blocks[1].plain_text(), "x\ny");
        assert_eq!(blocks[1].kind(), "unordered_list");
    }

    #[test]
    fn test_block_serialization_shape() {
        let json = serde_json::to_value(Block::Heading {
            level: 2,
            spans: text("S"),
        })
        .unwrap_or_default();
        assert_eq!(json["type"], "heading");
        assert_eq!(json["level"], 2);
        assert_eq!(json["spans"][0]["kind"], "plain");
    }
}
