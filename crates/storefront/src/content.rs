//! Markdown-backed pages (story, licensing, terms, privacy).
//!
//! Pages live in `content/pages/*.md` with YAML frontmatter. They are parsed
//! and rendered to HTML once at startup and served from memory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

/// Content directory shipped with the crate.
pub const BUNDLED_CONTENT_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/content");

/// Frontmatter for a page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered page.
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// Holds every loaded page, keyed by slug.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load all pages under `content_dir/pages`.
    ///
    /// A missing directory yields an empty store. Individual files that fail
    /// to parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let dir = content_dir.join("pages");
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!("Pages directory does not exist: {:?}", dir);
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match load_page(&path) {
                    Ok(page) => {
                        tracing::info!("Loaded page: {}", page.slug);
                        pages.insert(page.slug.clone(), page);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load page {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Get a page by slug.
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    /// Number of loaded pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn load_page(path: &Path) -> Result<Page, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
        .to_string();

    parse_page(slug, &content)
}

fn parse_page(slug: String, source: &str) -> Result<Page, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(source)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok(Page {
        slug,
        meta,
        content_html: render_markdown(&parsed.content),
    })
}

/// Render markdown to HTML with the GFM extensions the legal pages use.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;

    markdown_to_html(content, &options)
}

/// Content loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_pages_load() {
        let store = ContentStore::load(Path::new(BUNDLED_CONTENT_DIR)).unwrap();
        for slug in ["story", "licensing", "terms", "privacy"] {
            let page = store.get_page(slug);
            assert!(page.is_some(), "missing page {slug}");
        }
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let store = ContentStore::load(Path::new("/nonexistent/content")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_parse_page_renders_table() {
        let source = "---\ntitle: Licensing\n---\n| Tier | Price |\n|---|---|\n| MP3 | €29.99 |\n";
        let page = parse_page("licensing".to_string(), source).unwrap();
        assert_eq!(page.meta.title, "Licensing");
        assert!(page.content_html.contains("<table>"));
    }

    #[test]
    fn test_parse_page_requires_frontmatter() {
        let result = parse_page("bare".to_string(), "# Just a heading\n");
        assert!(matches!(result, Err(ContentError::Parse(_))));
    }

    #[test]
    fn test_raw_html_is_not_rendered() {
        let source = "---\ntitle: T\n---\n<script>alert(1)</script>\n";
        let page = parse_page("t".to_string(), source).unwrap();
        assert!(!page.content_html.contains("<script>"));
    }
}
