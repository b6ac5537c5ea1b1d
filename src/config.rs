//! Command line configuration.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::highlight::{DEFAULT_THEME, Highlighter};
use crate::loader::is_http_url;

/// Command line configuration for Postview.
#[derive(Debug, Clone, Parser)]
#[command(name = "postview", version, about, long_about = None)]
pub struct Config {
    /// Slugs of the posts to render
    #[arg(required = true)]
    pub slugs: Vec<String>,

    /// Content source: directory holding `<slug>.md` files or http(s) base URL
    #[arg(short, long, default_value = "posts")]
    pub source: String,

    /// Output directory
    #[arg(short, long, default_value = "dist")]
    pub output: PathBuf,

    /// Route to redirect to when a post is not found
    #[arg(long, default_value = "/posts")]
    pub listing_route: String,

    /// Syntax highlighting theme (base16-ocean.dark, InspiredGitHub, etc.)
    #[arg(long, default_value = DEFAULT_THEME)]
    pub theme: String,

    /// Do not open the first rendered post in a browser
    #[arg(long)]
    pub no_open: bool,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if no slug is given, the source directory does not
    /// exist, or the theme is unknown.
    pub fn validate(&self) -> Result<()> {
        if self.slugs.iter().all(|slug| slug.is_empty()) {
            bail!("At least one non-empty slug is required");
        }

        if !is_http_url(&self.source) && !Path::new(&self.source).is_dir() {
            bail!("Content directory does not exist: {}", self.source);
        }

        if !Highlighter::has_theme(&self.theme) {
            bail!(
                "Unknown theme: {} (available: {})",
                self.theme,
                Highlighter::available_themes().join(", ")
            );
        }

        Ok(())
    }

    /// Directory receiving bundled stylesheets.
    pub fn assets_dir(&self) -> PathBuf {
        self.output.join("assets")
    }
}
