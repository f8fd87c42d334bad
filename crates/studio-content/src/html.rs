//! HTML preview rendering.
//!
//! Produces an escaped HTML fragment for a [`Document`]: a metadata card
//! built from the front matter, followed by the body blocks. Category badge
//! colours come from a [`CategoryPalette`] supplied by the caller.

use indexmap::IndexMap;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::blocks::Block;
use crate::document::{Document, render};
use crate::frontmatter::FrontMatter;
use crate::inline::InlineSpan;

/// Badge colour used for categories missing from the palette.
pub const FALLBACK_COLOR: &str = "#4B5563";

/// Mapping from category name to badge colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPalette {
    colors: IndexMap<String, String>,
    fallback: String,
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self::new([
            ("Sales", "#3B82F6"),
            ("Marketing", "#FF6B35"),
            ("Branding", "#8B5CF6"),
        ])
    }
}

impl CategoryPalette {
    /// Build a palette from `(category, colour)` pairs.
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            colors: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            fallback: FALLBACK_COLOR.to_string(),
        }
    }

    /// Replace the fallback colour.
    pub fn with_fallback(mut self, color: impl Into<String>) -> Self {
        self.fallback = color.into();
        self
    }

    /// Colour for a category; exact match on the name.
    pub fn color_for(&self, category: &str) -> &str {
        self.colors
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    /// Category names in palette order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(String::as_str)
    }
}

/// A rendered draft: structure plus markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    /// Metadata block, if complete.
    pub front_matter: Option<FrontMatter>,
    /// Body structure.
    pub blocks: Vec<Block>,
    /// HTML fragment.
    pub html: String,
}

impl Preview {
    /// Render a raw document.
    pub fn of(raw: &str, palette: &CategoryPalette) -> Self {
        let doc = render(raw);
        let html = to_html(&doc, palette);
        Self {
            front_matter: doc.front_matter,
            blocks: doc.blocks,
            html,
        }
    }
}

/// Render a document as an HTML fragment string.
pub fn to_html(doc: &Document, palette: &CategoryPalette) -> String {
    render_document(doc, palette).into_string()
}

/// Render a document as maud markup.
pub fn render_document(doc: &Document, palette: &CategoryPalette) -> Markup {
    html! {
        article.draft-preview {
            @if let Some(fm) = &doc.front_matter {
                (render_front_matter(fm, palette))
            }
            @for block in &doc.blocks {
                (render_block(block))
            }
        }
    }
}

fn render_front_matter(fm: &FrontMatter, palette: &CategoryPalette) -> Markup {
    html! {
        header.front-matter {
            @if let Some(title) = fm.title() {
                h1.title { (title) }
            }
            div.meta {
                @if let Some(category) = fm.category() {
                    span.category style={ "background-color: " (palette.color_for(category)) } {
                        (category)
                    }
                }
                @if let Some(read_time) = fm.read_time() {
                    span.read-time { (read_time) }
                }
                @if let Some(date) = fm.date() {
                    time.date { (date) }
                }
            }
        }
    }
}

/// Render one block.
pub fn render_block(block: &Block) -> Markup {
    match block {
        Block::Heading { level: 3, spans } => html! { h3 { (render_spans(spans)) } },
        Block::Heading { spans, .. } => html! { h2 { (render_spans(spans)) } },
        Block::Blockquote { spans } => html! { blockquote { (render_spans(spans)) } },
        Block::UnorderedList { items } => html! {
            ul {
                @for item in items {
                    li { (render_spans(item)) }
                }
            }
        },
        Block::OrderedList { items } => html! {
            ol {
                @for item in items {
                    li { (render_spans(item)) }
                }
            }
        },
        Block::Paragraph { spans } => html! { p { (render_spans(spans)) } },
    }
}

fn render_spans(spans: &[InlineSpan]) -> Markup {
    html! {
        @for span in spans {
            @match span {
                InlineSpan::Plain(text) => { (text) }
                InlineSpan::Bold(text) => { strong { (text) } }
                InlineSpan::Italic(text) => { em { (text) } }
                InlineSpan::Code(text) => { code { (text) } }
            }
        }
    }
}
