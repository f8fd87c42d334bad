//! Published post catalog.
//!
//! Posts live as `<slug>.mdx` files directly under a content directory, each
//! with a YAML front matter block. The catalog is loaded once and then
//! queried in memory.

use std::cmp::Reverse;
use std::path::Path;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use studio_core::util::files::{exists, find_all_files, read_file, FindOptions};
use studio_core::{ConfigProvider, Error, Result};

use crate::frontmatter::split_front_matter;

/// Front matter as written in a post file. Missing keys take defaults.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawMeta {
    title: String,
    date: String,
    excerpt: String,
    category: String,
    tags: Vec<String>,
    author: String,
    cover_image: String,
    read_time: String,
}

impl Default for RawMeta {
    fn default() -> Self {
        Self {
            title: String::new(),
            date: String::new(),
            excerpt: String::new(),
            category: "Marketing".to_string(),
            tags: Vec::new(),
            author: "BenEl Team".to_string(),
            cover_image: String::new(),
            read_time: "5 min read".to_string(),
        }
    }
}

/// Listing metadata for a post.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    /// File stem.
    pub slug: String,
    pub title: String,
    /// Usually `YYYY-MM-DD`.
    pub date: String,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: String,
    pub cover_image: String,
    pub read_time: String,
}

impl PostMeta {
    /// The date as a calendar day, if it parses.
    pub fn published_on(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// A post with its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Listing metadata.
    #[serde(flatten)]
    pub meta: PostMeta,
    /// Body markdown, front matter removed.
    pub content: String,
}

impl Post {
    /// Parse a post file's contents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] when the front matter is not valid YAML.
    pub fn parse(slug: &str, source: &str) -> Result<Self> {
        let (raw, content) = match split_front_matter(source) {
            Some(split) if !split.block.trim().is_empty() => {
                let raw: RawMeta = serde_yaml::from_str(split.block)
                    .map_err(|e| Error::invalid_data(format!("{slug}: {e}")))?;
                (raw, split.rest)
            }
            Some(split) => (RawMeta::default(), split.rest),
            None => (RawMeta::default(), source),
        };

        Ok(Self {
            meta: PostMeta {
                slug: slug.to_string(),
                title: raw.title,
                date: raw.date,
                excerpt: raw.excerpt,
                category: raw.category,
                tags: raw.tags,
                author: raw.author,
                cover_image: raw.cover_image,
                read_time: raw.read_time,
            },
            content: content.to_string(),
        })
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.date_naive()))
}

/// In-memory index of published posts, newest first.
#[derive(Debug, Clone, Default)]
pub struct PostCatalog {
    posts: Vec<Post>,
}

impl PostCatalog {
    /// Build a catalog from already parsed posts.
    pub fn from_posts(mut posts: Vec<Post>) -> Self {
        posts.sort_by_key(|p| Reverse(p.meta.published_on()));
        Self { posts }
    }

    /// Load every `*.mdx` file directly under `dir`.
    ///
    /// A missing directory yields an empty catalog. Files that cannot be
    /// read or whose front matter does not parse are logged and skipped.
    pub async fn load(dir: &Path) -> Result<Self> {
        if !exists(dir).await {
            tracing::warn!(dir = %dir.display(), "Posts directory not found, catalog is empty");
            return Ok(Self::default());
        }

        let mut posts = Vec::new();
        for file in find_all_files(dir, FindOptions::posts()).await? {
            let source = match read_file(&file.path).await {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!(path = %file.path.display(), error = %e, "Skipping unreadable post");
                    continue;
                }
            };
            match Post::parse(&file.stem, &source) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!(path = %file.path.display(), error = %e, "Skipping post with bad front matter");
                }
            }
        }

        tracing::info!(dir = %dir.display(), count = posts.len(), "Loaded post catalog");
        Ok(Self::from_posts(posts))
    }

    /// Load from the `posts` content path of a configuration.
    pub async fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let dir = config.content_path("posts")?;
        Self::load(&dir).await
    }

    /// Number of posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the catalog has no posts.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// All posts' metadata, newest first.
    pub fn list(&self) -> Vec<PostMeta> {
        self.posts.iter().map(|p| p.meta.clone()).collect()
    }

    /// A single post by slug.
    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.meta.slug == slug)
    }

    /// Posts whose category matches, ignoring case.
    pub fn by_category(&self, category: &str) -> Vec<PostMeta> {
        self.filter(Some(category), None)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for post in &self.posts {
            if !seen.contains(&post.meta.category) {
                seen.push(post.meta.category.clone());
            }
        }
        seen
    }

    /// Posts whose title or tags contain `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<PostMeta> {
        self.filter(None, Some(query))
    }

    /// Combined category and text filter. Blank arguments match everything.
    pub fn filter(&self, category: Option<&str>, query: Option<&str>) -> Vec<PostMeta> {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.posts
            .iter()
            .map(|p| &p.meta)
            .filter(|m| {
                category
                    .as_deref()
                    .is_none_or(|c| m.category.to_lowercase() == c)
            })
            .filter(|m| needle.as_deref().is_none_or(|n| m.matches_query(n)))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn post_file(title: &str, date: &str, category: &str, tags: &str) -> String {
        format!(
            "---\ntitle: '{title}'\ndate: '{date}'\nexcerpt: 'About {title}'\ncategory: {category}\ntags: [{tags}]\n---\n\n## Intro\nBody of {title}.\n"
        )
    }

    async fn sample_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        let files = [
            ("old-sales.mdx", post_file("Old Sales", "2024-01-10", "Sales", "crm")),
            ("new-brand.mdx", post_file("New Brand", "2025-06-01", "Branding", "identity, logo")),
            ("mid-marketing.mdx", post_file("Mid Marketing", "2024-11-20", "Marketing", "seo")),
            ("undated.mdx", post_file("Undated", "someday", "sales", "")),
        ];
        for (name, body) in files {
            tokio::fs::write(temp.path().join(name), body).await.unwrap();
        }
        tokio::fs::write(temp.path().join("README.md"), "ignored")
            .await
            .unwrap();
        temp
    }

    #[test]
    fn test_parse_defaults() {
        let post = Post::parse("bare", "---\ntitle: Only Title\n---\nHello").unwrap();
        assert_eq!(post.meta.title, "Only Title");
        assert_eq!(post.meta.category, "Marketing");
        assert_eq!(post.meta.author, "BenEl Team");
        assert_eq!(post.meta.read_time, "5 min read");
        assert!(post.meta.tags.is_empty());
        assert_eq!(post.content, "Hello");
    }

    #[test]
    fn test_parse_without_front_matter() {
        let post = Post::parse("loose", "just text").unwrap();
        assert_eq!(post.meta.title, "");
        assert_eq!(post.content, "just text");
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = Post::parse("bad", "---\ntags: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_post_json_shape() {
        let post = Post::parse("x", "---\ncoverImage: /img.png\nreadTime: 3 min read\n---\n").unwrap();
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["slug"], "x");
        assert_eq!(json["coverImage"], "/img.png");
        assert_eq!(json["readTime"], "3 min read");
        assert!(json.get("content").is_some());
    }

    #[tokio::test]
    async fn test_load_sorts_newest_first() {
        let temp = sample_dir().await;
        let catalog = PostCatalog::load(temp.path()).await.unwrap();
        let slugs: Vec<_> = catalog.list().into_iter().map(|m| m.slug).collect();
        assert_eq!(slugs, vec!["new-brand", "mid-marketing", "old-sales", "undated"]);
    }

    #[tokio::test]
    async fn test_missing_dir_is_empty() {
        let catalog = PostCatalog::load(Path::new("/nonexistent/posts")).await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_bad_file_is_skipped() {
        let temp = sample_dir().await;
        tokio::fs::write(temp.path().join("broken.mdx"), "---\ntitle: [oops\n---\n")
            .await
            .unwrap();
        let catalog = PostCatalog::load(temp.path()).await.unwrap();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.get("broken").is_none());
    }

    #[tokio::test]
    async fn test_get_and_queries() {
        let temp = sample_dir().await;
        let catalog = PostCatalog::load(temp.path()).await.unwrap();

        let post = catalog.get("new-brand").unwrap();
        assert_eq!(post.meta.tags, vec!["identity", "logo"]);
        assert!(post.content.contains("## Intro"));
        assert!(catalog.get("missing").is_none());

        let sales: Vec<_> = catalog
            .by_category("SALES")
            .into_iter()
            .map(|m| m.slug)
            .collect();
        assert_eq!(sales, vec!["old-sales", "undated"]);

        assert_eq!(
            catalog.categories(),
            vec!["Branding", "Marketing", "Sales", "sales"]
        );

        let hits: Vec<_> = catalog.search("LOGO").into_iter().map(|m| m.slug).collect();
        assert_eq!(hits, vec!["new-brand"]);
        assert_eq!(catalog.search("  ").len(), 4);
        // Excerpts are not searched.
        assert!(catalog.search("about").is_empty());

        let combined = catalog.filter(Some("marketing"), Some("mid"));
        assert_eq!(combined.len(), 1);
        assert!(catalog.filter(Some("marketing"), Some("brand")).is_empty());
    }

    #[derive(Clone)]
    struct Site(PathBuf);

    impl ConfigProvider for Site {
        fn project_name(&self) -> &str {
            "site"
        }

        fn base_path(&self) -> Result<PathBuf> {
            Ok(self.0.clone())
        }

        fn content_path(&self, content_type: &str) -> Result<PathBuf> {
            Ok(self.0.join("content").join(content_type))
        }
    }

    #[tokio::test]
    async fn test_from_config() {
        let temp = TempDir::new().unwrap();
        let posts = temp.path().join("content").join("posts");
        tokio::fs::create_dir_all(&posts).await.unwrap();
        tokio::fs::write(posts.join("one.mdx"), post_file("One", "2025-01-01", "Sales", "a"))
            .await
            .unwrap();
        let catalog = PostCatalog::from_config(&Site(temp.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(catalog.len(), 1);
    }
}
