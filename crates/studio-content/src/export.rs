//! Export naming and file output for drafts.

use std::path::{Path, PathBuf};

use studio_core::Result;
use studio_core::util::files::write_file;

use crate::frontmatter::parse_front_matter;

/// Slug used when a draft has no usable title.
pub const DEFAULT_SLUG: &str = "generated-post";

/// Extension of exported drafts.
pub const EXTENSION: &str = "mdx";

/// Turn a title into a filename slug.
///
/// Lowercases, collapses whitespace runs into `-`, then drops every character
/// outside `[A-Za-z0-9_-]`. Returns [`DEFAULT_SLUG`] when nothing is left.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
                in_space = true;
            }
            continue;
        }
        in_space = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
        }
    }
    if out.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        out
    }
}

/// Filename for a raw draft, derived from its front matter title.
pub fn filename_for(raw: &str) -> String {
    let slug = parse_front_matter(raw)
        .and_then(|fm| fm.title().map(slugify))
        .unwrap_or_else(|| DEFAULT_SLUG.to_string());
    format!("{slug}.{EXTENSION}")
}

/// A draft ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// `<slug>.mdx`
    pub filename: String,
    /// The raw document, unchanged.
    pub contents: String,
}

impl ExportFile {
    /// Prepare an export of a raw draft.
    pub fn from_raw(raw: &str) -> Self {
        Self {
            filename: filename_for(raw),
            contents: raw.to_string(),
        }
    }

    /// Write the file into `dir`, returning the full path.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.filename);
        write_file(&path, &self.contents).await?;
        tracing::info!(path = %path.display(), bytes = self.contents.len(), "Exported draft");
        Ok(path)
    }
}
