//! Classification of staged entries and item files.

use std::path::Path;

/// How a top-level entry of the content root is backed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// One sub-directory per item
    Dir,

    /// A single JSON file holding one item or a list of items
    Json,

    /// Neither; excluded from output
    Skip,
}

/// How a file inside an item directory contributes to the item.
///
/// Variant order is merge order: later kinds overwrite earlier ones
/// when they write the same field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileKind {
    /// `.json`: keys shallow-merged into the item
    Json,

    /// `.md`: rendered to HTML under the file's base name
    Markdown,

    /// `.png` / `.jpg`: replaced by an asset URL under the file's base name
    Image,
}

impl FileKind {
    /// Classify by extension. Matching is case-sensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "md" => Some(Self::Markdown),
            "png" | "jpg" => Some(Self::Image),
            _ => None,
        }
    }
}
