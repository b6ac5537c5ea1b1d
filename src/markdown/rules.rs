//! Per-node rendering overrides.

use anyhow::{Context, Result};
use comrak::nodes::NodeValue;

use super::tooltip::Tooltip;
use crate::highlight::Highlighter;

/// Node kinds whose HTML differs from comrak's default output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override<'n> {
    /// Fenced or indented code block, or inline code span.
    Code {
        language: Option<&'n str>,
        literal: &'n str,
        inline: bool,
    },
    Tooltip {
        text: &'n str,
        title: &'n str,
    },
    Link {
        url: &'n str,
        title: &'n str,
    },
    Default,
}

impl<'n> Override<'n> {
    /// Selects the override for a parsed node.
    pub fn for_node(value: &'n NodeValue) -> Self {
        match value {
            NodeValue::CodeBlock(block) => Override::Code {
                language: fence_language(&block.info),
                literal: &block.literal,
                inline: false,
            },
            NodeValue::Code(code) => Override::Code {
                language: None,
                literal: &code.literal,
                inline: true,
            },
            NodeValue::Link(link) => Override::Link {
                url: &link.url,
                title: &link.title,
            },
            _ => Override::Default,
        }
    }

    pub fn for_tooltip(tooltip: &'n Tooltip) -> Self {
        Override::Tooltip {
            text: &tooltip.text,
            title: &tooltip.title,
        }
    }
}

/// How a node is emitted after its override is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Node is replaced by a raw HTML block.
    Block(String),
    /// Node is replaced by raw inline HTML.
    Inline(String),
    /// Node's children are kept and surrounded by raw inline HTML.
    Wrap { open: String, close: &'static str },
    /// Node renders with comrak's default output.
    Keep,
}

/// Renders overridden nodes to HTML.
///
/// Code blocks with a recognized language go through the highlighter;
/// other code blocks and inline code become plain styled code. Links open
/// in a new browsing context without leaking the opener. Tooltips become
/// focusable spans whose popup text is drawn by the stylesheet.
pub struct RenderRules {
    highlighter: Highlighter,
}

impl RenderRules {
    pub fn new(highlighter: Highlighter) -> Self {
        Self { highlighter }
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Produces the replacement for an override.
    ///
    /// # Errors
    ///
    /// Returns error if syntax highlighting fails.
    pub fn render(&self, node: &Override<'_>) -> Result<Replacement> {
        let replacement = match *node {
            Override::Code {
                language,
                literal,
                inline: false,
            } => Replacement::Block(self.code_block(language, literal)?),
            Override::Code {
                literal,
                inline: true,
                ..
            } => Replacement::Inline(plain_code(literal)),
            Override::Tooltip { text, title } => Replacement::Inline(tooltip_span(text, title)),
            Override::Link { url, title } => Replacement::Wrap {
                open: link_open(url, title),
                close: "</a>",
            },
            Override::Default => Replacement::Keep,
        };

        Ok(replacement)
    }

    /// Renders a tooltip as inline HTML.
    pub fn tooltip(&self, tooltip: &Tooltip) -> String {
        tooltip_span(&tooltip.text, &tooltip.title)
    }

    fn code_block(&self, language: Option<&str>, literal: &str) -> Result<String> {
        if let Some(language) = language {
            let code = literal.strip_suffix('\n').unwrap_or(literal);

            let highlighted = self
                .highlighter
                .highlight(code, language)
                .with_context(|| format!("Failed to highlight {} code block", language))?;

            if let Some(html) = highlighted {
                return Ok(format!(
                    "<pre class=\"code-block hl-code\"><code class=\"language-{}\">{}</code></pre>\n",
                    escape_html(language),
                    html
                ));
            }
        }

        Ok(format!("<pre>{}</pre>\n", plain_code(literal)))
    }
}

/// Language of a fenced block: the first info string word when it is made
/// of word characters only.
pub fn fence_language(info: &str) -> Option<&str> {
    let word = info.split_whitespace().next()?;

    if word.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Some(word)
    } else {
        None
    }
}

fn plain_code(literal: &str) -> String {
    format!("<code class=\"code-plain\">{}</code>", escape_html(literal))
}

fn tooltip_span(text: &str, title: &str) -> String {
    let title = escape_html(title);
    format!(
        "<span class=\"tooltip\" tabindex=\"0\" data-tooltip=\"{title}\" aria-label=\"{title}\">{}</span>",
        escape_html(text)
    )
}

fn link_open(url: &str, title: &str) -> String {
    let mut open = format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\"",
        escape_html(url)
    );

    if !title.is_empty() {
        open.push_str(&format!(" title=\"{}\"", escape_html(title)));
    }

    open.push('>');
    open
}

/// Escapes HTML special characters.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::DEFAULT_THEME;
    use comrak::{Arena, Options, parse_document};

    fn rules() -> RenderRules {
        RenderRules::new(Highlighter::with_theme(DEFAULT_THEME).expect("Theme should load"))
    }

    /// Parses markdown and returns the first node matching `pick`.
    fn first_node(markdown: &str, pick: fn(&NodeValue) -> bool) -> NodeValue {
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &Options::default());
        root.descendants()
            .map(|node| node.data.borrow().value.clone())
            .find(|value| pick(value))
            .expect("Markdown should contain the node")
    }

    fn code_block(info: &str, literal: &str) -> NodeValue {
        let markdown = format!("```{}\n{}```\n", info, literal);
        first_node(&markdown, |value| matches!(value, NodeValue::CodeBlock(_)))
    }

    #[test]
    fn test_fence_language() {
        // Arrange & Act & Assert
        assert_eq!(fence_language("rust"), Some("rust"));
        assert_eq!(fence_language("rust ignore"), Some("rust"));
        assert_eq!(fence_language("c++"), None);
        assert_eq!(fence_language(""), None);
        assert_eq!(fence_language("   "), None);
    }

    #[test]
    fn test_for_node_dispatch() {
        // Arrange
        let block = code_block("python", "pass\n");
        let inline = first_node("`x`", |value| matches!(value, NodeValue::Code(_)));
        let link = first_node("[site](https://example.com)", |value| {
            matches!(value, NodeValue::Link(_))
        });
        let text = first_node("plain", |value| matches!(value, NodeValue::Text(_)));

        // Act & Assert
        assert_eq!(
            Override::for_node(&block),
            Override::Code {
                language: Some("python"),
                literal: "pass\n",
                inline: false
            }
        );
        assert_eq!(
            Override::for_node(&inline),
            Override::Code {
                language: None,
                literal: "x",
                inline: true
            }
        );
        assert_eq!(
            Override::for_node(&link),
            Override::Link {
                url: "https://example.com",
                title: ""
            }
        );
        assert_eq!(Override::for_node(&text), Override::Default);
    }

    #[test]
    fn test_render_known_language_highlights() {
        // Arrange
        let rules = rules();
        let block = code_block("rust", "fn main() {}\n");

        // Act
        let replacement = rules
            .render(&Override::for_node(&block))
            .expect("Should render");

        // Assert
        let Replacement::Block(html) = replacement else {
            panic!("Code block should become an HTML block");
        };
        assert!(html.contains("<code class=\"language-rust\">"), "{}", html);
        assert!(html.contains("hl-"), "Should be highlighted: {}", html);
    }

    #[test]
    fn test_render_unknown_language_is_plain() {
        // Arrange
        let rules = rules();
        let block = code_block("nosuchlang", "a < b\n");

        // Act
        let replacement = rules
            .render(&Override::for_node(&block))
            .expect("Should render");

        // Assert
        assert_eq!(
            replacement,
            Replacement::Block("<pre><code class=\"code-plain\">a &lt; b\n</code></pre>\n".to_string())
        );
    }

    #[test]
    fn test_render_inline_code() {
        // Arrange
        let rules = rules();
        let node = Override::Code {
            language: None,
            literal: "<b>",
            inline: true,
        };

        // Act
        let replacement = rules.render(&node).expect("Should render");

        // Assert
        assert_eq!(
            replacement,
            Replacement::Inline("<code class=\"code-plain\">&lt;b&gt;</code>".to_string())
        );
    }

    #[test]
    fn test_render_link_wraps_children() {
        // Arrange
        let rules = rules();
        let node = Override::Link {
            url: "https://example.com/?a=1&b=2",
            title: "Example",
        };

        // Act
        let replacement = rules.render(&node).expect("Should render");

        // Assert
        assert_eq!(
            replacement,
            Replacement::Wrap {
                open: "<a href=\"https://example.com/?a=1&amp;b=2\" target=\"_blank\" \
                       rel=\"noopener noreferrer\" title=\"Example\">"
                    .to_string(),
                close: "</a>",
            }
        );
    }

    #[test]
    fn test_render_tooltip_escapes_title() {
        // Arrange
        let rules = rules();
        let tooltip = Tooltip {
            text: "term".to_string(),
            title: "a \"quoted\" <hint>".to_string(),
        };

        // Act
        let replacement = rules
            .render(&Override::for_tooltip(&tooltip))
            .expect("Should render");

        // Assert
        let Replacement::Inline(html) = replacement else {
            panic!("Tooltip should be inline HTML");
        };
        assert!(html.starts_with("<span class=\"tooltip\" tabindex=\"0\""), "{}", html);
        assert!(
            html.contains("data-tooltip=\"a &quot;quoted&quot; &lt;hint&gt;\""),
            "{}",
            html
        );
        assert!(html.ends_with(">term</span>"), "{}", html);
        assert_eq!(html, rules.tooltip(&tooltip));
    }

    #[test]
    fn test_render_default_keeps_node() {
        // Arrange
        let rules = rules();

        // Act
        let replacement = rules.render(&Override::Default).expect("Should render");

        // Assert
        assert_eq!(replacement, Replacement::Keep);
    }
}
