//! Post view state machine.
//!
//! A view starts in [`ViewState::Loading`]. Navigating to a slug issues a
//! [`Ticket`]; completing that ticket moves the view to `Loaded` or
//! `NotFound`. Navigating again returns to `Loading` and invalidates every
//! earlier ticket, so a slow response for an old slug can never overwrite
//! the state of a newer one.

use anyhow::{Context, Result};
use maud::Markup;
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::loader::{ContentSource, DocumentNotFound};
use crate::markdown::MarkdownRenderer;
use crate::pages;

/// Presentation state of the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Loading,
    NotFound,
    Loaded(Document),
}

/// Identifies one load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    slug: String,
    generation: u64,
}

impl Ticket {
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

/// Rendered output for the current state.
#[derive(Debug)]
pub enum Page {
    /// Placeholder shown while loading.
    Placeholder(Markup),
    /// Rendered post.
    Article { title: String, markup: Markup },
    /// Redirect to the listing route after a failed load.
    Redirect { to: String, markup: Markup },
}

impl Page {
    pub fn into_string(self) -> String {
        match self {
            Page::Placeholder(markup)
            | Page::Article { markup, .. }
            | Page::Redirect { markup, .. } => markup.into_string(),
        }
    }
}

/// Single post view driven by slug changes.
#[derive(Debug, Default)]
pub struct PostView {
    slug: Option<String>,
    generation: u64,
    state: ViewState,
}

impl PostView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Slug most recently navigated to.
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Starts loading a slug.
    ///
    /// # Returns
    ///
    /// Ticket to complete with the load outcome, or `None` when the slug is
    /// empty or already current (no load is needed).
    pub fn navigate(&mut self, slug: &str) -> Option<Ticket> {
        if slug.is_empty() || self.slug.as_deref() == Some(slug) {
            return None;
        }

        self.generation += 1;
        self.slug = Some(slug.to_string());
        self.state = ViewState::Loading;

        debug!(slug, generation = self.generation, "navigate");

        Some(Ticket {
            slug: slug.to_string(),
            generation: self.generation,
        })
    }

    /// Applies a load outcome.
    ///
    /// # Returns
    ///
    /// False if the ticket was superseded by a later navigation; the
    /// outcome is discarded in that case.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<String, DocumentNotFound>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                slug = %ticket.slug,
                generation = ticket.generation,
                current = self.generation,
                "discarded stale load"
            );
            return false;
        }

        self.state = match outcome {
            Ok(content) => {
                let document = Document::new(ticket.slug, content);
                info!(slug = document.slug(), title = document.title(), "loaded");
                ViewState::Loaded(document)
            }
            Err(err) => {
                warn!(slug = err.slug(), "not found");
                ViewState::NotFound
            }
        };

        true
    }

    /// Renders the page for the current state.
    ///
    /// # Errors
    ///
    /// Returns error if markdown rendering fails.
    pub fn page(&self, renderer: &MarkdownRenderer<'_>, listing_route: &str) -> Result<Page> {
        let page = match &self.state {
            ViewState::Loading => Page::Placeholder(pages::post::loading()),
            ViewState::NotFound => Page::Redirect {
                to: listing_route.to_string(),
                markup: pages::redirect::generate(listing_route),
            },
            ViewState::Loaded(document) => Page::Article {
                title: document.title().to_string(),
                markup: pages::post::generate(document, renderer)
                    .with_context(|| format!("Failed to render post: {}", document.slug()))?,
            },
        };

        Ok(page)
    }
}

/// Navigates the view to a slug and applies the fetched outcome.
///
/// # Returns
///
/// True if the view state changed as a result.
pub async fn load<S: ContentSource>(view: &mut PostView, source: &S, slug: &str) -> bool {
    let Some(ticket) = view.navigate(slug) else {
        return false;
    };

    let outcome = source.fetch(slug).await;
    view.complete(ticket, outcome)
}
