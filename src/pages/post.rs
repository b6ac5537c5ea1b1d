//! Post page generation

use anyhow::{Context, Result};
use maud::{Markup, PreEscaped, html};

use crate::components::layout::page_wrapper;
use crate::document::{DEFAULT_TITLE, Document};
use crate::markdown::MarkdownRenderer;

/// Stylesheets linked from post pages, relative to the page.
pub const STYLESHEETS: &[&str] = &["assets/post.css", "assets/syntax.css"];

/// Generates HTML page for a loaded post
///
/// Renders the markdown body with tooltips, highlighted code blocks and
/// external links, and places the extracted title in the page head.
///
/// # Errors
///
/// Returns error if markdown rendering fails.
///
/// # Examples
///
/// ```no_run
/// use postview::{Document, MarkdownRenderer};
/// use postview::pages::post::generate;
///
/// let renderer = MarkdownRenderer::new()?;
/// let document = Document::new("hello", "# Hello\n\nA [[tip|shown on hover]].");
/// let html = generate(&document, &renderer)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn generate(document: &Document, renderer: &MarkdownRenderer<'_>) -> Result<Markup> {
    let body = renderer
        .render(document.content())
        .context("Failed to render markdown body")?;

    Ok(post_page_markup(document.title(), &body))
}

/// Generates placeholder page shown while a post is loading
pub fn loading() -> Markup {
    page_wrapper(
        DEFAULT_TITLE,
        STYLESHEETS,
        html! {
            p class="loading" { "..." }
        },
    )
}

fn post_page_markup(title: &str, body: &str) -> Markup {
    page_wrapper(
        title,
        STYLESHEETS,
        html! {
            main class="post-page" {
                article class="post" {
                    (PreEscaped(body))
                }
            }
        },
    )
}
