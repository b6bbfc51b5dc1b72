//! Domain types for loaded content.
//!
//! - ContentType: a named collection of items
//! - EntryKind: how a top-level staged entry is backed
//! - FileKind: how a file inside an item directory is merged

pub mod content;
pub mod kinds;

pub use content::{ContentItem, ContentType};
pub use kinds::{EntryKind, FileKind};
