//! Public entry point: stage, resolve, walk, materialize, normalize.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, instrument};

use super::materializer::{strip_bom, Materializer};
use super::normalizer::Normalizers;
use super::progress::ProgressNotice;
use super::resolver::{
    is_inside_staging, normalize_lexically, resolve_source, resolve_staging_dir, ResolvedSource,
    Source,
};
use super::stager::Stager;
use super::walker::{walk, Entry};
use crate::adapters::{
    ArchiveExtractor, ArchiveFetcher, CommonMarkRenderer, HttpFetcher, MarkdownRenderer,
    ZipExtractor,
};
use crate::config::Config;
use crate::domain::{ContentType, EntryKind};
use crate::error::{Error, IoContext, Result};

/// Message logged when a load outlives the configured delay
pub const STILL_WORKING: &str = "Getting data...";

/// Loads content types from a local directory or a remote archive.
///
/// Each call to [`ContentLoader::get_data`] empties the configured staging
/// directory; concurrent calls sharing a staging directory are not supported.
/// When the staging directory lies inside a local content root (for example
/// `--local .` with the default `.treeload/staging`), the top-level entry
/// holding it is not loaded as a content type.
pub struct ContentLoader {
    config: Config,
    fetcher: Arc<dyn ArchiveFetcher>,
    extractor: Arc<dyn ArchiveExtractor>,
    renderer: Arc<dyn MarkdownRenderer>,
    normalizers: Normalizers,
}

impl ContentLoader {
    /// Create a loader with the HTTP fetcher, zip extractor, CommonMark
    /// renderer and built-in normalizers
    pub fn new(config: Config) -> Self {
        Self {
            config,
            fetcher: Arc::new(HttpFetcher::new()),
            extractor: Arc::new(ZipExtractor),
            renderer: Arc::new(CommonMarkRenderer::new()),
            normalizers: Normalizers::default(),
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn ArchiveFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ArchiveExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn MarkdownRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_normalizers(mut self, normalizers: Normalizers) -> Self {
        self.normalizers = normalizers;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load every content type. Any fatal error aborts the whole load.
    #[instrument(skip(self))]
    pub async fn get_data(&self) -> Result<Vec<ContentType>> {
        let notice = ProgressNotice::schedule(self.config.notice_delay(), STILL_WORKING);

        let (resolved, staging_dir) = self.prepare().await?;
        let content = self
            .load_tree(
                &resolved.content_root,
                resolved.asset_base_url.as_deref(),
                Some(&staging_dir),
            )
            .await?;

        notice.cancel();
        info!(types = content.len(), "Content loaded");
        Ok(content)
    }

    /// Reset staging, pick the source and stage it when remote.
    /// Returns the absolute content root and the staging directory.
    async fn prepare(&self) -> Result<(ResolvedSource, PathBuf)> {
        let cwd = std::env::current_dir().at(Path::new("."))?;
        let staging_dir = resolve_staging_dir(&self.config.staging_dir, &cwd)?;
        if let Some(ref local) = self.config.local_path {
            if is_inside_staging(local, &staging_dir, &cwd).await {
                return Err(Error::Configuration(format!(
                    "local path {} lies inside the staging directory",
                    local.display()
                )));
            }
        }
        let stager = Stager::new(staging_dir.clone());
        stager.reset().await?;

        match resolve_source(&self.config).await? {
            Source::Local {
                root,
                asset_base_url,
            } => {
                info!(root = %root.display(), "Using local content");
                let resolved = ResolvedSource {
                    content_root: normalize_lexically(&cwd.join(root)),
                    asset_base_url,
                };
                Ok((resolved, staging_dir))
            }
            Source::Remote {
                archive_url,
                asset_base_url,
            } => {
                stager
                    .stage_remote(&archive_url, self.fetcher.as_ref(), self.extractor.as_ref())
                    .await?;
                info!(root = %stager.dir().display(), "Using staged archive content");
                let resolved = ResolvedSource {
                    content_root: stager.dir().to_path_buf(),
                    asset_base_url,
                };
                Ok((resolved, staging_dir))
            }
        }
    }

    /// Walk an already-local content tree into content types
    pub async fn build_content(
        &self,
        content_root: &Path,
        asset_base_url: Option<&str>,
    ) -> Result<Vec<ContentType>> {
        self.load_tree(content_root, asset_base_url, None).await
    }

    /// Walk `content_root`, leaving out the entry that holds `staging_dir`
    async fn load_tree(
        &self,
        content_root: &Path,
        asset_base_url: Option<&str>,
        staging_dir: Option<&Path>,
    ) -> Result<Vec<ContentType>> {
        let materializer = Materializer::new(self.renderer.as_ref(), asset_base_url);
        let mut content = Vec::new();

        for entry in walk(content_root).await? {
            if entry.kind == EntryKind::Dir
                && staging_dir.is_some_and(|staging| staging.starts_with(&entry.path))
            {
                debug!(name = %entry.name, "Skipping entry holding the staging directory");
                continue;
            }

            let items: Vec<Value> = match entry.kind {
                EntryKind::Dir => materializer
                    .materialize(&entry.path, entry.type_name())
                    .await?
                    .into_iter()
                    .map(Value::Object)
                    .collect(),
                EntryKind::Json => load_file_items(&entry).await?,
                EntryKind::Skip => {
                    debug!(name = %entry.name, "Skipping entry");
                    continue;
                }
            };

            let type_name = entry.type_name();
            let items = self.normalizers.normalize(type_name, items);
            debug!(type_name, items = items.len(), "Loaded content type");
            content.push(ContentType::new(type_name, items));
        }

        Ok(content)
    }
}

/// Items of a file-backed type: the parsed file, as a list
async fn load_file_items(entry: &Entry) -> Result<Vec<Value>> {
    let bytes = fs::read(&entry.path).await.at(&entry.path)?;
    let value: Value =
        serde_json::from_slice(strip_bom(&bytes)).map_err(|source| Error::InvalidContent {
            path: entry.path.clone(),
            source,
        })?;

    Ok(match value {
        Value::Array(items) => items,
        single => vec![single],
    })
}
