//! Document composition: raw text in, structured document out.

use serde::{Deserialize, Serialize};

use crate::blocks::{parse_blocks, Block};
use crate::frontmatter::{parse_front_matter, strip_front_matter, FrontMatter};

/// Read-only projection of a raw document snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Metadata block, if a complete one is present.
    pub front_matter: Option<FrontMatter>,
    /// Body structure.
    pub blocks: Vec<Block>,
}

impl Document {
    /// Title from the front matter, if any.
    pub fn title(&self) -> Option<&str> {
        self.front_matter.as_ref().and_then(FrontMatter::title)
    }

    /// Whether nothing renderable has arrived yet.
    pub fn is_empty(&self) -> bool {
        self.front_matter.is_none() && self.blocks.is_empty()
    }
}

/// Render a raw document into front matter and blocks.
///
/// Safe to call on any prefix of a streamed document: an unterminated front
/// matter block is treated as body text until its closing delimiter arrives.
pub fn render(raw: &str) -> Document {
    let front_matter = parse_front_matter(raw);
    let blocks = parse_blocks(strip_front_matter(raw));
    tracing::trace!(
        bytes = raw.len(),
        blocks = blocks.len(),
        has_front_matter = front_matter.is_some(),
        "Rendered document"
    );
    Document {
        front_matter,
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::InlineSpan;

    const CHUNKS: [&str; 3] = ["---\ntitle: 'X'\n---\n", "## Section\n", "Some para."];

    #[test]
    fn test_streamed_chunks_render_final_document() {
        let mut raw = String::new();
        let mut last = Document::default();
        for chunk in CHUNKS {
            raw.push_str(chunk);
            last = render(&raw);
        }

        assert_eq!(raw, CHUNKS.concat());
        let fm = last.front_matter.clone().unwrap_or_default();
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.title(), Some("X"));
        assert_eq!(
            last.blocks,
            vec![
                Block::Heading {
                    level: 2,
                    spans: vec![InlineSpan::Plain("Section".into())]
                },
                Block::Paragraph {
                    spans: vec![InlineSpan::Plain("Some para.".into())]
                },
            ]
        );
    }

    #[test]
    fn test_every_prefix_renders() {
        let full = CHUNKS.concat();
        for end in 0..=full.len() {
            if full.is_char_boundary(end) {
                let _ = render(&full[..end]);
            }
        }
    }

    #[test]
    fn test_unterminated_front_matter_is_body() {
        let doc = render("---\ntitle: 'X'\n");
        assert!(doc.front_matter.is_none());
        assert_eq!(doc.blocks.len(), 2);
    }

    #[test]
    fn test_front_matter_only() {
        let doc = render("---\ntitle: Hello\n---\n");
        assert_eq!(doc.title(), Some("Hello"));
        assert!(doc.blocks.is_empty());
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert!(render("").is_empty());
    }
}
