//! Redirect page generation for posts that could not be loaded

use maud::{DOCTYPE, Markup, html};

/// Generates a page that immediately redirects to `target`
///
/// Static output cannot answer with an HTTP redirect, so the page uses a
/// zero-delay refresh and a canonical link, with a plain anchor for agents
/// that ignore both.
pub fn generate(target: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta http-equiv="refresh" content=(format!("0; url={}", target));
                link rel="canonical" href=(target);
                meta name="robots" content="noindex";
                title { "Redirecting" }
            }
            body {
                p {
                    "Redirecting to "
                    a href=(target) { (target) }
                }
            }
        }
    }
}
