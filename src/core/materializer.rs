//! Item materialization for directory-backed content types.
//!
//! ```text
//! <type>/
//! ├── alice/           # item, slug = "alice"
//! │   ├── data.json    # keys merged into the item
//! │   ├── bio.md       # item.bio = rendered HTML
//! │   └── photo.jpg    # item.photo = <asset base>/<type>/alice/photo.jpg
//! ├── _drafts/         # skipped
//! └── .git/            # skipped
//! ```

use std::path::Path;

use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use super::walker::{list_dir, DirChild};
use crate::adapters::MarkdownRenderer;
use crate::domain::{ContentItem, FileKind};
use crate::error::{IoContext, Result};

/// Builds items from per-item sub-directories
pub struct Materializer<'a> {
    renderer: &'a dyn MarkdownRenderer,
    asset_base_url: Option<&'a str>,
}

impl<'a> Materializer<'a> {
    pub fn new(renderer: &'a dyn MarkdownRenderer, asset_base_url: Option<&'a str>) -> Self {
        Self {
            renderer,
            asset_base_url,
        }
    }

    /// Build one item per qualifying sub-directory of `type_dir`, in name order
    pub async fn materialize(&self, type_dir: &Path, type_name: &str) -> Result<Vec<ContentItem>> {
        let mut items = Vec::new();

        for child in list_dir(type_dir).await? {
            if !child.file_type.is_dir() || !is_item_dir_name(&child.name) {
                debug!(type_name, name = %child.name, "Skipping non-item entry");
                continue;
            }
            items.push(self.materialize_item(&child.path, type_name, &child.name).await?);
        }

        Ok(items)
    }

    /// Merge every recognized file of one item directory into a record
    async fn materialize_item(
        &self,
        item_dir: &Path,
        type_name: &str,
        slug: &str,
    ) -> Result<ContentItem> {
        let mut files: Vec<(FileKind, DirChild)> = list_dir(item_dir)
            .await?
            .into_iter()
            .filter(|child| child.file_type.is_file())
            .filter_map(|child| FileKind::from_path(&child.path).map(|kind| (kind, child)))
            .collect();
        files.sort_by(|(ka, a), (kb, b)| ka.cmp(kb).then_with(|| a.name.cmp(&b.name)));

        let mut item = ContentItem::new();
        item.insert("slug".to_string(), Value::String(slug.to_string()));

        for (kind, file) in &files {
            let field = base_name(&file.name);
            match kind {
                FileKind::Json => {
                    if let Some(fields) = read_json_fields(&file.path).await {
                        item.extend(fields);
                    }
                }
                FileKind::Markdown => {
                    let bytes = fs::read(&file.path).await.at(&file.path)?;
                    let html = self.renderer.render(&String::from_utf8_lossy(&bytes));
                    item.insert(field.to_string(), Value::String(html));
                }
                FileKind::Image => {
                    let url = asset_url(self.asset_base_url, type_name, slug, &file.name);
                    item.insert(field.to_string(), Value::String(url));
                }
            }
        }

        // The directory name always identifies the item.
        item.insert("slug".to_string(), Value::String(slug.to_string()));

        debug!(type_name, slug, files = files.len(), "Materialized item");
        Ok(item)
    }
}

/// Whether a sub-directory name denotes an item
pub fn is_item_dir_name(name: &str) -> bool {
    !name.starts_with('_') && !name.starts_with('.') && name.to_lowercase() != "readme.md"
}

/// URL of an image asset: `<base>/<type>/<slug>/<file name>`.
/// A trailing `/` on the base is dropped before joining; without a base URL
/// the path is returned relative.
pub fn asset_url(base: Option<&str>, type_name: &str, slug: &str, file_name: &str) -> String {
    match base {
        Some(base) => format!(
            "{}/{}/{}/{}",
            base.trim_end_matches('/'),
            type_name,
            slug,
            file_name
        ),
        None => format!("{}/{}/{}", type_name, slug, file_name),
    }
}

/// File name without its final extension
fn base_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

/// Strip a UTF-8 byte order mark
pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

/// Read a per-item JSON file. Unreadable, malformed, or non-object content
/// contributes nothing.
async fn read_json_fields(path: &Path) -> Option<serde_json::Map<String, Value>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping unreadable JSON file");
            return None;
        }
    };

    match serde_json::from_slice::<Value>(strip_bom(&bytes)) {
        Ok(Value::Object(fields)) => Some(fields),
        Ok(other) => {
            warn!(path = %path.display(), kind = json_kind(&other), "Skipping non-object JSON file");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping malformed JSON file");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
