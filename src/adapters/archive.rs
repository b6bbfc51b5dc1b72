//! Zip archive extraction.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::ArchiveExtractor;
use crate::error::{Error, Result};

/// Extracts zip archives with the `zip` crate on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    fn extract_blocking(archive: &Path, dest: &Path) -> Result<()> {
        let file = std::fs::File::open(archive).map_err(|e| Error::fs(archive, e))?;

        let mut zip = zip::ZipArchive::new(file).map_err(|e| Error::Extraction {
            path: archive.to_path_buf(),
            source: Box::new(e),
        })?;

        zip.extract(dest).map_err(|e| Error::Extraction {
            path: archive.to_path_buf(),
            source: Box::new(e),
        })
    }
}

#[async_trait]
impl ArchiveExtractor for ZipExtractor {
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        let archive: PathBuf = archive.to_path_buf();
        let dest: PathBuf = dest.to_path_buf();
        let task_archive = archive.clone();

        tokio::task::spawn_blocking(move || Self::extract_blocking(&task_archive, &dest))
            .await
            .map_err(|e| Error::Extraction {
                path: archive,
                source: Box::new(e),
            })?
    }
}
