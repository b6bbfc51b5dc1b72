//! Source resolution.
//!
//! Decides whether content comes from a local directory or a remote
//! archive, and which base URL synthesized asset URLs use.

use std::path::{Component, Path, PathBuf};

use tokio::fs;

use crate::config::Config;
use crate::error::{Error, Result};

/// Where content is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// An existing local directory, read in place
    Local {
        root: PathBuf,
        asset_base_url: Option<String>,
    },

    /// A zip archive to download into the staging directory
    Remote {
        archive_url: String,
        asset_base_url: Option<String>,
    },
}

impl Source {
    /// Base URL for synthesized asset URLs
    pub fn asset_base_url(&self) -> Option<&str> {
        match self {
            Source::Local { asset_base_url, .. } | Source::Remote { asset_base_url, .. } => {
                asset_base_url.as_deref()
            }
        }
    }
}

/// A ready local content tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub content_root: PathBuf,
    pub asset_base_url: Option<String>,
}

/// Pick the content source. A configured local path wins when it exists
/// and is a directory; otherwise a zip URL, then a GitHub branch URL.
pub async fn resolve_source(config: &Config) -> Result<Source> {
    if let Some(ref local) = config.local_path {
        match fs::metadata(local).await {
            Ok(meta) if meta.is_dir() => {
                return Ok(Source::Local {
                    root: local.clone(),
                    asset_base_url: config.asset_base_url.clone(),
                });
            }
            _ => tracing::warn!(
                path = %local.display(),
                "Local path is missing or not a directory, trying remote source"
            ),
        }
    }

    if let Some(ref zip_url) = config.zip_url {
        let asset_base_url = config
            .asset_base_url
            .clone()
            .unwrap_or_else(|| derive_asset_base_url(zip_url));
        return Ok(Source::Remote {
            archive_url: zip_url.clone(),
            asset_base_url: Some(asset_base_url),
        });
    }

    if let Some(ref branch_url) = config.github_branch_url {
        let branch_url = branch_url.trim_end_matches('/');
        let asset_base_url = config
            .asset_base_url
            .clone()
            .unwrap_or_else(|| derive_asset_base_url(branch_url));
        return Ok(Source::Remote {
            archive_url: format!("{}.zip", branch_url),
            asset_base_url: Some(asset_base_url),
        });
    }

    Err(Error::Configuration(
        "no valid local path or remote source configured".to_string(),
    ))
}

/// Map a GitHub archive reference to its raw-content URL:
/// `https://github.com/org/site/archive/master.zip` becomes
/// `https://raw.githubusercontent.com/org/site/master`.
pub fn derive_asset_base_url(archive_ref: &str) -> String {
    let trimmed = archive_ref.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".zip").unwrap_or(trimmed);

    let rewritten = trimmed.replacen("://github.com/", "://raw.githubusercontent.com/", 1);
    let rewritten = rewritten.replacen("/archive/", "/", 1);

    match rewritten.strip_suffix("/archive") {
        Some(stripped) => stripped.to_string(),
        None => rewritten,
    }
}

/// Resolve the staging directory below `cwd`. A leading root is dropped, so
/// `/tmp` means `<cwd>/tmp`. The result must lie strictly below `cwd`.
pub fn resolve_staging_dir(staging_dir: &Path, cwd: &Path) -> Result<PathBuf> {
    if staging_dir.as_os_str().is_empty() {
        return Err(Error::Configuration("staging directory is empty".to_string()));
    }

    let relative: PathBuf = staging_dir
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();

    let base = normalize_lexically(cwd);
    let resolved = normalize_lexically(&base.join(relative));

    if resolved == base || !resolved.starts_with(&base) {
        return Err(Error::Configuration(format!(
            "refusing to use {} as staging directory",
            resolved.display()
        )));
    }

    Ok(resolved)
}

/// Whether `local` (relative to `cwd`) is the staging directory or lies
/// inside it. Compares lexically, then by canonical path when both exist so
/// symlinks are caught too.
pub async fn is_inside_staging(local: &Path, staging_dir: &Path, cwd: &Path) -> bool {
    let local_abs = normalize_lexically(&cwd.join(local));
    if local_abs.starts_with(staging_dir) {
        return true;
    }

    match (fs::canonicalize(&local_abs).await, fs::canonicalize(staging_dir).await) {
        (Ok(local), Ok(staging)) => local.starts_with(staging),
        _ => false,
    }
}

/// Collapse `.` and `..` components without touching the filesystem
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
