//! Content sources that load markdown posts by slug.

use anyhow::{Context, Result, bail};
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;
use reqwest::Url;
use tracing::debug;

/// Raised for every failed load: missing file, non-success response,
/// transport failure, invalid encoding or malformed slug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("document not found: {slug}")]
pub struct DocumentNotFound {
    slug: String,
}

impl DocumentNotFound {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

/// Retrieves raw markdown for a slug.
pub trait ContentSource {
    /// Loads the full markdown text of the post addressed by `slug`.
    fn fetch(&self, slug: &str) -> impl Future<Output = Result<String, DocumentNotFound>> + Send;
}

/// Returns true if slug can address a post without leaving the source.
///
/// Rejects empty slugs, path separators, `..` and leading dots.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains("..")
        && !slug.contains(['/', '\\'])
}

/// Reads posts from `{root}/{slug}.md`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path holding the post for a slug.
    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{}.md", slug))
    }
}

impl ContentSource for DirectorySource {
    async fn fetch(&self, slug: &str) -> Result<String, DocumentNotFound> {
        if !is_valid_slug(slug) {
            debug!(slug, "rejected malformed slug");
            return Err(DocumentNotFound::new(slug));
        }

        let path = self.path_for(slug);
        debug!(slug, path = %path.display(), "reading post");

        tokio::fs::read_to_string(&path).await.map_err(|e| {
            debug!(slug, path = %path.display(), error = %e, "post read failed");
            DocumentNotFound::new(slug)
        })
    }
}

/// Fetches posts from `{base_url}/{slug}.md` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    /// Creates HTTP source for a base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is not http(s) or the client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Self::with_client(base_url, client)
    }

    /// Creates HTTP source using a preconfigured client.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is malformed or not http(s).
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("Invalid content source URL: {}", base_url))?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            bail!("Content source URL must use http or https: {}", base_url);
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// URL addressing the post for a slug.
    ///
    /// The file name is appended as a single percent-encoded path segment,
    /// so `#`, `?` and `%` in a slug stay part of the name.
    pub fn url_for(&self, slug: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&format!("{}.md", slug));
        }
        url
    }
}

impl ContentSource for HttpSource {
    async fn fetch(&self, slug: &str) -> Result<String, DocumentNotFound> {
        if !is_valid_slug(slug) {
            debug!(slug, "rejected malformed slug");
            return Err(DocumentNotFound::new(slug));
        }

        let url = self.url_for(slug);
        debug!(slug, %url, "fetching post");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                debug!(slug, %url, error = %e, "post request failed");
                DocumentNotFound::new(slug)
            })?;

        response.text().await.map_err(|e| {
            debug!(slug, %url, error = %e, "post body unreadable");
            DocumentNotFound::new(slug)
        })
    }
}

/// Content source selected from a command line value.
#[derive(Debug, Clone)]
pub enum Source {
    Directory(DirectorySource),
    Http(HttpSource),
}

impl Source {
    /// Interprets `http://` and `https://` values as base URLs and anything
    /// else as a directory path.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn parse(value: &str) -> Result<Self> {
        if is_http_url(value) {
            Ok(Source::Http(HttpSource::new(value)?))
        } else {
            Ok(Source::Directory(DirectorySource::new(value)))
        }
    }
}

impl ContentSource for Source {
    async fn fetch(&self, slug: &str) -> Result<String, DocumentNotFound> {
        match self {
            Source::Directory(source) => source.fetch(slug).await,
            Source::Http(source) => source.fetch(slug).await,
        }
    }
}

pub(crate) fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
