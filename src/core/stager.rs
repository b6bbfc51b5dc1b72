//! Staging directory management.
//!
//! The staging directory is emptied at the start of every load. Remote
//! archives are downloaded into it, extracted in place, and flattened when
//! they carry a single wrapper folder (`repo-branch/`).
//!
//! Only one load may use a staging directory at a time.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use super::walker::list_dir;
use crate::adapters::{ArchiveExtractor, ArchiveFetcher};
use crate::error::{IoContext, Result};

/// Temporary archive file name inside the staging directory
const ARCHIVE_FILE_NAME: &str = ".treeload-archive.zip";

/// Name the wrapper folder is moved to while its children are lifted out
const WRAPPER_HOLD_NAME: &str = ".treeload-wrapper";

/// Owns one staging directory
#[derive(Debug, Clone)]
pub struct Stager {
    dir: PathBuf,
}

impl Stager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the staging directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the staging directory, or empty it if it exists
    pub async fn reset(&self) -> Result<()> {
        match fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&self.dir).await.at(&self.dir)?,
            Ok(_) => fs::remove_file(&self.dir).await.at(&self.dir)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(crate::Error::fs(&self.dir, e)),
        }

        fs::create_dir_all(&self.dir).await.at(&self.dir)?;
        debug!(dir = %self.dir.display(), "Staging directory ready");
        Ok(())
    }

    /// Download `archive_url`, extract it into the staging directory and
    /// flatten a wrapper folder. The staging directory must already be reset.
    pub async fn stage_remote(
        &self,
        archive_url: &str,
        fetcher: &dyn ArchiveFetcher,
        extractor: &dyn ArchiveExtractor,
    ) -> Result<()> {
        info!(url = %archive_url, fetcher = fetcher.name(), "Fetching archive");
        let bytes = fetcher.fetch(archive_url).await?;

        let archive_path = self.dir.join(ARCHIVE_FILE_NAME);
        fs::write(&archive_path, &bytes).await.at(&archive_path)?;

        extractor.extract(&archive_path, &self.dir).await?;
        fs::remove_file(&archive_path).await.at(&archive_path)?;

        if self.flatten().await? {
            debug!("Flattened archive wrapper folder");
        }
        Ok(())
    }

    /// Lift the children of a single wrapper folder into the staging root.
    ///
    /// Applies only when the sole non-hidden top-level entry is a directory;
    /// an already-flat tree is left untouched. Hidden children of the wrapper
    /// are dropped. Returns whether anything moved.
    pub async fn flatten(&self) -> Result<bool> {
        let visible: Vec<_> = list_dir(&self.dir)
            .await?
            .into_iter()
            .filter(|child| !child.name.starts_with('.'))
            .collect();

        let wrapper = match visible.as_slice() {
            [only] if only.file_type.is_dir() => only,
            _ => return Ok(false),
        };

        // Move the wrapper aside first so a child sharing its name can land
        // in the staging root.
        let held = self.dir.join(WRAPPER_HOLD_NAME);
        fs::rename(&wrapper.path, &held).await.at(&wrapper.path)?;

        for child in list_dir(&held).await? {
            if child.name.starts_with('.') {
                continue;
            }
            let target = self.dir.join(&child.name);
            fs::rename(&child.path, &target).await.at(&target)?;
        }

        fs::remove_dir_all(&held).await.at(&held)?;
        Ok(true)
    }
}
