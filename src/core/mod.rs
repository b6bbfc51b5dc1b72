//! Content loading pipeline.
//!
//! Stages, in data-flow order:
//! - Resolver: local directory or remote archive, plus the asset base URL
//! - Stager: staging directory reset, download, extraction, flattening
//! - Walker: classification of top-level entries
//! - Materializer: per-item records from item directories
//! - Normalizer: per-type post-processing rules
//! - Loader: the public entry point tying them together

pub mod loader;
pub mod materializer;
pub mod normalizer;
pub mod progress;
pub mod resolver;
pub mod stager;
pub mod walker;

// Re-export commonly used types
pub use loader::{ContentLoader, STILL_WORKING};
pub use materializer::{asset_url, is_item_dir_name, Materializer};
pub use normalizer::{Normalizers, TypeRule};
pub use progress::ProgressNotice;
pub use resolver::{derive_asset_base_url, resolve_source, ResolvedSource, Source};
pub use stager::Stager;
pub use walker::{walk, Entry};
