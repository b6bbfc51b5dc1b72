//! Error taxonomy for a content load.
//!
//! Every variant is fatal for the run that produced it. Malformed per-item
//! JSON files never reach this type; the materializer logs and skips them.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed source error for collaborators that are swappable (fetchers,
/// extractors) and therefore have no single concrete error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`crate::ContentLoader::get_data`]
#[derive(Debug, Error)]
pub enum Error {
    /// No usable source, or an unsafe staging directory
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Download or transport failure
    #[error("Failed to acquire archive {url}: {source}")]
    Acquisition {
        url: String,
        #[source]
        source: BoxError,
    },

    /// Corrupt or unreadable archive
    #[error("Failed to extract archive {}: {source}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Unexpected I/O failure while staging or walking the tree
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A root-level `<type>.json` file that does not parse
    #[error("Invalid content file {}: {source}", path.display())]
    InvalidContent {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Wrap an I/O error with the path it concerns
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Build an acquisition error from any source error
    pub fn acquisition(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Acquisition {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// Attach a path to `std::io::Result` values
pub(crate) trait IoContext<T> {
    fn at(self, path: &std::path::Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| Error::fs(path, e))
    }
}
