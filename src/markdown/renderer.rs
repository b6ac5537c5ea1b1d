//! Markdown rendering with GitHub Flavored Markdown support.

use anyhow::{Context, Result};
use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use comrak::{Arena, Options};
use tracing::trace;

use super::rules::{Override, RenderRules, Replacement};
use super::tooltip::{alloc, annotate_tree};
use crate::highlight::{DEFAULT_THEME, Highlighter};

/// Renders markdown posts to HTML.
///
/// Provides GFM extensions including tables, strikethrough, autolinks,
/// task lists and footnotes. The parsed document goes through two passes
/// before formatting: tooltip annotations are spliced into text nodes, then
/// code blocks, inline code and links are replaced according to
/// [`RenderRules`].
pub struct MarkdownRenderer<'a> {
    options: Options<'a>,
    rules: RenderRules,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates renderer with the default syntax highlighting theme.
    ///
    /// # Errors
    ///
    /// Returns error if the default theme cannot be loaded.
    pub fn new() -> Result<Self> {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Creates renderer highlighting code with the named syntect theme.
    ///
    /// Configures GFM extensions and rendering settings:
    /// - Tables, strikethrough, autolinks, task lists, footnotes
    /// - Raw HTML enabled; overrides are spliced in as HTML nodes
    ///
    /// # Errors
    ///
    /// Returns error if the theme is not bundled with syntect.
    pub fn with_theme(theme: &str) -> Result<Self> {
        let mut options = Options::default();

        // Extension options (GFM features)
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;

        // Render options (trusted post content)
        options.render.unsafe_ = true;

        let highlighter = Highlighter::with_theme(theme)
            .with_context(|| format!("Failed to create syntax highlighter with theme: {}", theme))?;

        Ok(Self {
            options,
            rules: RenderRules::new(highlighter),
        })
    }

    pub fn highlighter(&self) -> &Highlighter {
        self.rules.highlighter()
    }

    /// Renders markdown content to HTML string.
    ///
    /// # Errors
    ///
    /// Returns error if syntax highlighting or HTML formatting fails
    pub fn render(&self, content: &str) -> Result<String> {
        let arena = Arena::new();
        let root = comrak::parse_document(&arena, content, &self.options);

        let annotated = annotate_tree(&arena, root, |tooltip| self.rules.tooltip(tooltip));
        trace!(annotated, "applied tooltip annotations");

        self.apply_overrides(&arena, root)?;

        let mut html = Vec::with_capacity(content.len() * 2);
        comrak::format_html(root, &self.options, &mut html)
            .context("Failed to format markdown as HTML")?;

        String::from_utf8(html).context("Rendered markdown is not valid UTF8")
    }

    /// Replaces nodes with their override output.
    fn apply_overrides<'n>(
        &self,
        arena: &'n Arena<AstNode<'n>>,
        root: &'n AstNode<'n>,
    ) -> Result<()> {
        let nodes: Vec<_> = root.descendants().collect();

        for node in nodes {
            let (replacement, start) = {
                let ast = node.data.borrow();
                let replacement = self
                    .rules
                    .render(&Override::for_node(&ast.value))
                    .context("Failed to apply rendering override")?;
                (replacement, ast.sourcepos.start)
            };

            match replacement {
                Replacement::Keep => {}
                Replacement::Block(literal) => {
                    let value = NodeValue::HtmlBlock(NodeHtmlBlock {
                        block_type: 0,
                        literal,
                    });
                    node.insert_before(alloc(arena, value, start));
                    node.detach();
                }
                Replacement::Inline(html) => {
                    node.insert_before(alloc(arena, NodeValue::HtmlInline(html), start));
                    node.detach();
                }
                Replacement::Wrap { open, close } => {
                    node.insert_before(alloc(arena, NodeValue::HtmlInline(open), start));

                    let children: Vec<_> = node.children().collect();
                    for child in children {
                        node.insert_before(child);
                    }

                    let close = NodeValue::HtmlInline(close.to_string());
                    node.insert_before(alloc(arena, close, start));
                    node.detach();
                }
            }
        }

        Ok(())
    }
}
