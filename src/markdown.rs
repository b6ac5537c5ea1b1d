//! Markdown rendering with GitHub Flavored Markdown support.
//!
//! This module renders posts with comrak, splices `[[text|title]]` tooltip
//! annotations into the parsed tree and replaces code blocks, inline code
//! and links through explicit per-node rendering overrides.

mod renderer;
mod rules;
mod tooltip;

pub use renderer::MarkdownRenderer;
pub use rules::{Override, RenderRules, Replacement, fence_language};
pub use tooltip::{Inline, Tooltip, annotate, annotate_tree};
