//! Content source seam and local input helpers.
//!
//! The analyzer never talks to the network directly. Documents arrive through
//! a [`ContentSource`]; the [`JinaReader`](crate::JinaReader) adapter is the
//! production implementation and tests substitute in-memory ones.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::{GeoError, RawContent, Result};

/// Per-request hints passed to the content source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Ask the reader to append an image summary.
    pub with_images_summary: bool,
    /// Ask the reader to append a links summary.
    pub with_links_summary: bool,
}

/// Outcome of one URL in a batch read.
#[derive(Debug)]
pub struct BatchRead {
    pub url: String,
    pub outcome: Result<RawContent>,
}

/// Reads documents by URL and discovers documents by search query.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Read one document.
    async fn read(&self, url: &str, options: &ReadOptions) -> Result<RawContent>;

    /// Read several documents concurrently; one failure never affects the others.
    async fn read_batch(&self, urls: &[String], options: &ReadOptions) -> Vec<BatchRead> {
        let reads = urls.iter().map(|url| async move {
            let outcome = self.read(url, options).await;
            BatchRead { url: url.clone(), outcome }
        });
        join_all(reads).await
    }

    /// Find documents relevant to `query`.
    async fn search(&self, query: &str, options: &ReadOptions) -> Result<Vec<RawContent>>;
}

/// Reads a local file as text.
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(GeoError::InvalidInput(format!("file not found: {}", path.display())));
    }
    Ok(fs::read_to_string(path)?)
}

/// Reads all of standard input until EOF.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
