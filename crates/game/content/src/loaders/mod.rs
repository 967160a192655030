//! Content loaders for reading economy data from files.
//!
//! Each loader has a `load(path)` entry point and a `parse(str)` twin so the
//! formats can be tested without touching the filesystem.

pub mod catalog;
pub mod config;
pub mod factory;
pub mod rewards;

pub use catalog::{CatalogFile, CatalogLoader, LoadedCatalog};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use rewards::{LoadedRewards, RewardsFile, RewardsLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
