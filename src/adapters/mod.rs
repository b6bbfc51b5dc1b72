//! Adapter interfaces for external collaborators.
//!
//! Acquisition, extraction and markdown rendering sit behind traits so the
//! loader can run against in-memory fakes in tests.

pub mod archive;
pub mod http;
pub mod markdown;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

pub use archive::ZipExtractor;
pub use http::HttpFetcher;
pub use markdown::CommonMarkRenderer;

/// Retrieves a zip payload
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    /// Human-readable fetcher name
    fn name(&self) -> &str;

    /// Download the archive at `url` and return its raw bytes
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Unpacks an archive file into a directory
#[async_trait]
pub trait ArchiveExtractor: Send + Sync {
    /// Extract every entry of `archive` below `dest`
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// Pure markdown to HTML conversion
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}
