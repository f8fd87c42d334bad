//! Studio Content — everything that turns raw markdown into something
//! readable.
//!
//! The renderer is a pipeline of small pure functions, each usable on any
//! prefix of a streamed document:
//!
//! - [`frontmatter`]: metadata block extraction
//! - [`inline`]: bold / italic / code spans within a line
//! - [`blocks`]: headings, quotes, lists, paragraphs
//! - [`document`]: composition of the above
//!
//! Around it sit [`html`] (preview markup), [`export`] (draft file naming)
//! and [`posts`] (the published post catalog).

pub mod blocks;
pub mod document;
pub mod export;
pub mod frontmatter;
pub mod html;
pub mod inline;
pub mod posts;

pub use blocks::{Block, parse_blocks};
pub use document::{Document, render};
pub use export::{ExportFile, slugify};
pub use frontmatter::{FrontMatter, parse_front_matter, strip_front_matter};
pub use html::{CategoryPalette, Preview, to_html};
pub use inline::{InlineSpan, format_inline};
pub use posts::{Post, PostCatalog, PostMeta};
