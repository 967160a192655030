//! Content factory for loading every economy data file from one directory.

use std::path::{Path, PathBuf};

use economy_core::{BonusCatalog, EconomyConfig, RewardTableDef};

use crate::loaders::{
    CatalogLoader, ConfigLoader, LoadResult, LoadedCatalog, LoadedRewards, RewardsLoader,
};

/// Content factory that loads all economy content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── catalog.ron
/// └── rewards.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const CATALOG_FILE: &'static str = "catalog.ron";
    pub const REWARDS_FILE: &'static str = "rewards.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load economy configuration from `config.toml`.
    ///
    /// A missing file yields the defaults.
    pub fn load_config(&self) -> LoadResult<EconomyConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            return Ok(EconomyConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the bonus catalog from `catalog.ron`.
    pub fn load_catalog(&self) -> LoadResult<LoadedCatalog> {
        let path = self.data_dir.join(Self::CATALOG_FILE);
        CatalogLoader::load(&path)
    }

    /// Load reward table definitions from `rewards.ron`.
    pub fn load_rewards(&self) -> LoadResult<Vec<RewardTableDef>> {
        let path = self.data_dir.join(Self::REWARDS_FILE);
        RewardsLoader::load(&path)
    }

    /// Load reward tables and drop entries that reference types missing
    /// from `catalog`.
    pub fn load_rewards_for(&self, catalog: &BonusCatalog) -> LoadResult<LoadedRewards> {
        Ok(RewardsLoader::resolve(self.load_rewards()?, catalog))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
