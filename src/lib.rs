//! Markdown post viewer producing standalone HTML pages.

mod assets;
pub mod components;
mod config;
mod document;
mod highlight;
mod loader;
mod markdown;
pub mod pages;
mod view;

pub use assets::write_css_assets;
pub use config::Config;
pub use document::{DEFAULT_TITLE, Document, extract_title};
pub use highlight::{DEFAULT_THEME, Highlighter};
pub use loader::{
    ContentSource, DirectorySource, DocumentNotFound, HttpSource, Source, is_valid_slug,
};
pub use markdown::{
    Inline, MarkdownRenderer, Override, RenderRules, Replacement, Tooltip, annotate,
    annotate_tree, fence_language,
};
pub use view::{Page, PostView, Ticket, ViewState, load};
