//! Syntax highlighting with syntect.

use anyhow::{Context, Result, bail};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Default syntax highlighting theme.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// CSS class prefix shared by highlighted spans and the theme stylesheet.
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Highlights fenced code blocks keyed by language token.
///
/// Output uses CSS classes rather than inline styles; the matching colors
/// come from [`Highlighter::stylesheet`], so the theme stays a separate
/// stylesheet instead of being baked into every page.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    theme_name: String,
}

impl Highlighter {
    /// Creates highlighter with one of syntect's bundled themes.
    ///
    /// # Errors
    ///
    /// Returns error if the theme name is not bundled with syntect.
    pub fn with_theme(theme_name: &str) -> Result<Self> {
        let mut themes = ThemeSet::load_defaults().themes;

        let Some(theme) = themes.remove(theme_name) else {
            bail!(
                "Unknown theme: {} (available: {})",
                theme_name,
                Self::available_themes().join(", ")
            );
        };

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            theme_name: theme_name.to_string(),
        })
    }

    /// Names of all bundled themes.
    pub fn available_themes() -> Vec<String> {
        ThemeSet::load_defaults().themes.into_keys().collect()
    }

    /// Returns true if a bundled theme has this name.
    pub fn has_theme(theme_name: &str) -> bool {
        ThemeSet::load_defaults().themes.contains_key(theme_name)
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Looks up syntax definition by language token or file extension.
    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        self.syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language))
    }

    /// Highlights code as HTML with `hl-` prefixed CSS classes.
    ///
    /// # Returns
    ///
    /// `None` when the language is not recognized, so the caller can fall
    /// back to plain code.
    ///
    /// # Errors
    ///
    /// Returns error if syntect fails to parse a line.
    pub fn highlight(&self, code: &str, language: &str) -> Result<Option<String>> {
        if language.is_empty() {
            return Ok(None);
        }

        let Some(syntax) = self.find_syntax(language) else {
            return Ok(None);
        };

        if code.is_empty() {
            return Ok(Some(String::new()));
        }

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);

        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .context("Failed to parse line for syntax highlighting")?;
        }

        Ok(Some(generator.finalize()))
    }

    /// Generates the CSS rules for the configured theme.
    ///
    /// # Errors
    ///
    /// Returns error if the theme cannot be converted to CSS.
    pub fn stylesheet(&self) -> Result<String> {
        css_for_theme_with_class_style(&self.theme, CLASS_STYLE)
            .with_context(|| format!("Failed to generate CSS for theme: {}", self.theme_name))
    }
}
