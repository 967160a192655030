//! Economy configuration loader.

use std::path::Path;

use economy_core::EconomyConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for economy configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`EconomyConfig::default`].
    pub fn load(path: &Path) -> LoadResult<EconomyConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<EconomyConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}
