//! treeload - content tree loader
//!
//! Turns a directory of content (local, or a downloaded zip of a remote
//! repository) into a list of typed content collections for static-site
//! and templating pipelines.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! ├── team/                # directory-backed type "team"
//! │   └── alice/           # item with slug "alice"
//! │       ├── bio.md       # bio: rendered HTML
//! │       ├── data.json    # keys merged into the item
//! │       └── photo.jpg    # photo: <asset base>/team/alice/photo.jpg
//! └── staff.json           # file-backed type "staff"
//! ```
//!
//! # Modules
//!
//! - `adapters`: Archive download, zip extraction, markdown rendering
//! - `core`: The loading pipeline (resolve, stage, walk, materialize, normalize)
//! - `domain`: Data structures (ContentType, EntryKind, FileKind)
//! - `config`: Configuration file and environment handling
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```rust,ignore
//! use treeload::{Config, ContentLoader};
//!
//! let loader = ContentLoader::new(Config::local("./content"));
//! let content = loader.get_data().await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;

// Re-export main types at crate root for convenience
pub use crate::config::Config;
pub use crate::core::{ContentLoader, Normalizers, TypeRule};
pub use domain::{ContentItem, ContentType};
pub use error::{Error, Result};
