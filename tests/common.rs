//! Shared test utilities for integration tests.
//!
//! Provides helpers for building temporary content directories and a
//! one-shot HTTP responder standing in for a remote content source.

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Creates temporary content directory holding `<slug>.md` files.
///
/// # Errors
///
/// Returns error if directory creation or a file write fails
pub fn create_content_dir(posts: &[(&str, &str)]) -> Result<TempDir> {
    let dir = TempDir::new()?;

    for (slug, content) in posts {
        write_post(dir.path(), slug, content)?;
    }

    Ok(dir)
}

/// Writes one post file into a content directory.
///
/// # Errors
///
/// Returns error if the write fails
pub fn write_post(dir: &Path, slug: &str, content: &str) -> Result<()> {
    fs::write(dir.join(format!("{}.md", slug)), content)?;
    Ok(())
}

/// Starts a server answering exactly one request.
///
/// # Returns
///
/// Base URL of the server and a handle resolving to the request line
///
/// # Errors
///
/// Returns error if the listener cannot bind
pub async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> Result<(String, tokio::task::JoinHandle<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        let Ok((mut stream, _)) = listener.accept().await else {
            return String::new();
        };

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/markdown; charset=utf-8\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;

        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    Ok((format!("http://{}", addr), handle))
}

/// HTTP client that ignores proxy settings from the environment.
///
/// # Errors
///
/// Returns error if the client cannot be built
pub fn direct_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().no_proxy().build()?)
}
