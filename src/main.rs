use anyhow::{Context, Result};
use postview::{Config, MarkdownRenderer, Page, PostView, Source, is_valid_slug};
use std::fs;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    let source = Source::parse(&config.source).context("Failed to configure content source")?;

    let renderer = MarkdownRenderer::with_theme(&config.theme)
        .context("Failed to create markdown renderer")?;

    fs::create_dir_all(&config.output).context("Failed to create output directory")?;

    let assets_dir = config.assets_dir();
    fs::create_dir_all(&assets_dir).context("Failed to create assets directory")?;
    postview::write_css_assets(&assets_dir, renderer.highlighter())
        .context("Failed to write CSS assets")?;

    let mut view = PostView::new();
    let mut first_article: Option<PathBuf> = None;
    let mut article_count = 0;
    let mut redirect_count = 0;

    for slug in &config.slugs {
        if slug.is_empty() {
            continue;
        }

        postview::load(&mut view, &source, slug).await;

        let page = view
            .page(&renderer, &config.listing_route)
            .with_context(|| format!("Failed to render page for slug: {}", slug))?;

        match &page {
            Page::Article { title, .. } => {
                article_count += 1;
                println!("Loaded: {} ({})", slug, title);
            }
            Page::Redirect { to, .. } => {
                redirect_count += 1;
                println!("Not found: {} -> {}", slug, to);
            }
            Page::Placeholder(_) => {}
        }

        // Malformed slugs cannot name a file safely
        if !is_valid_slug(slug) {
            warn!(slug = slug.as_str(), "skipping output for malformed slug");
            continue;
        }

        let is_article = matches!(page, Page::Article { .. });
        let page_path = config.output.join(format!("{}.html", slug));
        fs::write(&page_path, page.into_string())
            .with_context(|| format!("Failed to write page to {}", page_path.display()))?;

        println!("Generated: {}", page_path.display());

        if is_article && first_article.is_none() {
            first_article = Some(page_path);
        }
    }

    println!(
        "Rendered {} posts, {} redirects into {}",
        article_count,
        redirect_count,
        config.output.display()
    );

    if !config.no_open
        && let Some(path) = first_article
        && let Err(e) = open::that(&path)
    {
        warn!(path = %path.display(), error = %e, "failed to open browser");
    }

    Ok(())
}
