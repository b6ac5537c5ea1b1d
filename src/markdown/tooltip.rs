//! Tooltip annotations written as `[[display text|tooltip title]]`.
//!
//! The display text may not contain `|` or `]`, the title may not contain
//! `]`. There is no escape sequence. Anything that does not match exactly
//! (an unterminated `[[a|b`, a missing title) stays plain text.

use comrak::Arena;
use comrak::arena_tree::Node;
use comrak::nodes::{Ast, AstNode, LineColumn, NodeValue};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;

static TOOLTIP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([^|\]]+)\|([^\]]+)\]\]").expect("tooltip pattern is a valid regex")
});

/// Display text paired with the title shown on hover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub text: String,
    pub title: String,
}

/// Inline content produced by splitting a text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Tooltip(Tooltip),
}

impl Inline {
    /// Visible text: the plain value, or the tooltip's display text.
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(text) => text,
            Inline::Tooltip(tooltip) => &tooltip.text,
        }
    }

    /// Markdown source this node was cut from.
    pub fn source(&self) -> String {
        match self {
            Inline::Text(text) => text.clone(),
            Inline::Tooltip(tooltip) => format!("[[{}|{}]]", tooltip.text, tooltip.title),
        }
    }
}

/// Splits a text value around tooltip annotations.
///
/// Matches are taken left to right without overlap. Plain text between,
/// before and after matches is emitted only when non-empty, so two adjacent
/// annotations produce two adjacent tooltip nodes.
///
/// # Returns
///
/// `None` when the text contains no annotation, meaning the caller should
/// leave the original node untouched.
///
/// # Examples
///
/// ```
/// use postview::{Inline, Tooltip, annotate};
///
/// let parts = annotate("before [[shown|hint]] after").unwrap();
/// assert_eq!(parts[1], Inline::Tooltip(Tooltip {
///     text: "shown".to_string(),
///     title: "hint".to_string(),
/// }));
/// assert!(annotate("no annotations here").is_none());
/// ```
pub fn annotate(text: &str) -> Option<Vec<Inline>> {
    let mut parts = Vec::new();
    let mut last = 0;

    for captures in TOOLTIP_PATTERN.captures_iter(text) {
        let (Some(whole), Some(display), Some(title)) =
            (captures.get(0), captures.get(1), captures.get(2))
        else {
            continue;
        };

        if whole.start() > last {
            parts.push(Inline::Text(text[last..whole.start()].to_string()));
        }

        parts.push(Inline::Tooltip(Tooltip {
            text: display.as_str().to_string(),
            title: title.as_str().to_string(),
        }));

        last = whole.end();
    }

    if parts.is_empty() {
        return None;
    }

    if last < text.len() {
        parts.push(Inline::Text(text[last..].to_string()));
    }

    Some(parts)
}

/// Rewrites every text node of a parsed document that contains tooltip
/// annotations.
///
/// Adjacent text siblings are merged first because the parser may split a
/// run of text at bracket characters or soft line breaks. Matched text nodes
/// are replaced in place by plain text nodes and inline HTML produced by
/// `render`; text without annotations is not touched. Inside image
/// descriptions, which become `alt` attributes, a tooltip is reduced to its
/// display text.
///
/// # Returns
///
/// Number of text nodes that were replaced
pub fn annotate_tree<'a, F>(
    arena: &'a Arena<AstNode<'a>>,
    root: &'a AstNode<'a>,
    mut render: F,
) -> usize
where
    F: FnMut(&Tooltip) -> String,
{
    merge_adjacent_text(root);

    let text_nodes: Vec<_> = root
        .descendants()
        .filter(|node| matches!(node.data.borrow().value, NodeValue::Text(_)))
        .collect();

    let mut replaced = 0;

    for node in text_nodes {
        let in_image = node
            .ancestors()
            .skip(1)
            .any(|ancestor| matches!(ancestor.data.borrow().value, NodeValue::Image(_)));

        let (parts, start) = {
            let ast = node.data.borrow();
            let NodeValue::Text(ref text) = ast.value else {
                continue;
            };
            let Some(parts) = annotate(text) else {
                continue;
            };
            (parts, ast.sourcepos.start)
        };

        for part in parts {
            let value = match part {
                Inline::Text(text) => NodeValue::Text(text),
                Inline::Tooltip(tooltip) if in_image => NodeValue::Text(tooltip.text),
                Inline::Tooltip(tooltip) => NodeValue::HtmlInline(render(&tooltip)),
            };
            node.insert_before(alloc(arena, value, start));
        }

        node.detach();
        replaced += 1;
    }

    replaced
}

/// Allocates a detached node in the document arena.
pub(crate) fn alloc<'a>(
    arena: &'a Arena<AstNode<'a>>,
    value: NodeValue,
    start: LineColumn,
) -> &'a AstNode<'a> {
    arena.alloc(Node::new(RefCell::new(Ast::new(value, start))))
}

/// Joins runs of text siblings into the first node of the run.
///
/// A soft break between two text nodes is folded in as `\n`, which renders
/// the same while hard breaks are off.
fn merge_adjacent_text<'a>(root: &'a AstNode<'a>) {
    let text_nodes: Vec<_> = root
        .descendants()
        .filter(|node| matches!(node.data.borrow().value, NodeValue::Text(_)))
        .collect();

    for node in text_nodes {
        // Already absorbed into a preceding sibling
        if node.parent().is_none() {
            continue;
        }

        while let Some(next) = node.next_sibling() {
            let (following, absorbed) = match next.data.borrow().value {
                NodeValue::Text(ref text) => (text.clone(), vec![next]),
                NodeValue::SoftBreak => match next.next_sibling() {
                    Some(after) => match after.data.borrow().value {
                        NodeValue::Text(ref text) => (format!("\n{}", text), vec![next, after]),
                        _ => break,
                    },
                    None => break,
                },
                _ => break,
            };

            if let NodeValue::Text(ref mut text) = node.data.borrow_mut().value {
                text.push_str(&following);
            }
            for sibling in absorbed {
                sibling.detach();
            }
        }
    }
}
