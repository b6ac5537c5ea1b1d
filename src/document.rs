//! Loaded posts and title extraction.

/// Title used when a post has no top-level heading.
pub const DEFAULT_TITLE: &str = "Post";

/// Markdown post addressed by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    slug: String,
    content: String,
    title: String,
}

impl Document {
    /// Creates document and derives its title from the content.
    pub fn new(slug: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let title = extract_title(&content);

        Self {
            slug: slug.into(),
            content,
            title,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Derives display title from markdown content.
///
/// Uses the first line starting with `"# "`, with the marker and
/// surrounding whitespace removed. Falls back to [`DEFAULT_TITLE`].
///
/// # Examples
///
/// ```
/// use postview::extract_title;
///
/// assert_eq!(extract_title("# Hello World\nbody"), "Hello World");
/// assert_eq!(extract_title("no heading"), "Post");
/// ```
pub fn extract_title(markdown: &str) -> String {
    markdown
        .split('\n')
        .find_map(|line| line.strip_prefix("# "))
        .map(|heading| heading.trim().to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}
