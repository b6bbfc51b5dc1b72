//! Top-level content walk.
//!
//! Each immediate child of the content root becomes a directory-backed
//! type, a file-backed type (`<name>.json`) or is skipped.

use std::fs::FileType;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::domain::EntryKind;
use crate::error::{IoContext, Result};

/// A classified top-level entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// File or directory name as listed
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    /// Content type name: the directory name, or the file name without `.json`
    pub fn type_name(&self) -> &str {
        match self.kind {
            EntryKind::Json => self.name.strip_suffix(".json").unwrap_or(&self.name),
            EntryKind::Dir | EntryKind::Skip => &self.name,
        }
    }
}

/// A directory child, as returned by [`list_dir`]
#[derive(Debug, Clone)]
pub(crate) struct DirChild {
    pub name: String,
    pub path: PathBuf,
    pub file_type: FileType,
}

/// List the immediate children of `dir`, sorted by name.
/// File types come from the entry itself, so symlinks are not followed.
pub(crate) async fn list_dir(dir: &Path) -> Result<Vec<DirChild>> {
    let mut children = Vec::new();
    let mut entries = fs::read_dir(dir).await.at(dir)?;

    while let Some(entry) = entries.next_entry().await.at(dir)? {
        let path = entry.path();
        let file_type = entry.file_type().await.at(&path)?;
        children.push(DirChild {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            file_type,
        });
    }

    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(children)
}

/// Classify a listed child
fn classify(child: &DirChild) -> EntryKind {
    if child.file_type.is_dir() {
        EntryKind::Dir
    } else if child.file_type.is_file()
        && Path::new(&child.name).extension().and_then(|e| e.to_str()) == Some("json")
    {
        EntryKind::Json
    } else {
        EntryKind::Skip
    }
}

/// Enumerate and classify the top-level entries of `content_root`
pub async fn walk(content_root: &Path) -> Result<Vec<Entry>> {
    let entries: Vec<Entry> = list_dir(content_root)
        .await?
        .into_iter()
        .map(|child| {
            let kind = classify(&child);
            debug!(name = %child.name, ?kind, "Classified entry");
            Entry {
                name: child.name,
                path: child.path,
                kind,
            }
        })
        .collect();

    Ok(entries)
}
