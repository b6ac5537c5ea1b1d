//! CSS asset bundling

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::highlight::Highlighter;

const BASE: &str = include_str!("../assets/base.css");
const POST: &str = include_str!("../assets/post.css");
const TOOLTIP: &str = include_str!("../assets/tooltip.css");

/// Writes bundled CSS assets to output directory
///
/// Produces `post.css` (layout, article, code and tooltip rules) and
/// `syntax.css` (colors for the highlighter's theme).
pub fn write_css_assets(assets_dir: &Path, highlighter: &Highlighter) -> Result<()> {
    write_bundled(assets_dir, "post.css", &[BASE, POST, TOOLTIP])?;

    let syntax = highlighter.stylesheet()?;
    write_bundled(assets_dir, "syntax.css", &[&syntax])?;
    Ok(())
}

fn write_bundled(dir: &Path, name: &str, parts: &[&str]) -> Result<()> {
    let css = parts.join("\n");
    fs::write(dir.join(name), css)
        .with_context(|| format!("Failed to write CSS asset: {}", name))?;
    Ok(())
}
