//! Data-driven economy content and loaders.
//!
//! This crate provides loaders for the RON/TOML data files that configure the
//! economy:
//! - Bonus catalog: boost items, crystal types, pet types, synergies (RON)
//! - Reward tables (RON)
//! - Economy configuration (TOML)
//!
//! Content is loaded once at startup and treated as immutable afterwards.
//! All loaders deserialize straight into economy-core types.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogFile, CatalogLoader, ConfigLoader, ContentFactory, LoadResult, LoadedCatalog,
    LoadedRewards, RewardsFile, RewardsLoader,
};
