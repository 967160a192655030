//! Bonus catalog loader.

use std::path::Path;

use economy_core::{
    BonusCatalog, BoostTypeDef, CatalogError, CrystalTypeDef, PetTypeDef, SynergyDef,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Catalog structure for RON files. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub boosts: Vec<BoostTypeDef>,
    pub crystals: Vec<CrystalTypeDef>,
    pub pets: Vec<PetTypeDef>,
    pub synergies: Vec<SynergyDef>,
}

/// A built catalog plus the records that failed validation.
///
/// Skipped records do not abort loading; the caller decides how loudly to
/// report them.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub catalog: BonusCatalog,
    pub skipped: Vec<CatalogError>,
}

/// Loader for the bonus catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load and build the catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<LoadedCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<LoadedCatalog> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;
        Ok(Self::build(file))
    }

    pub fn build(file: CatalogFile) -> LoadedCatalog {
        let (catalog, skipped) = BonusCatalog::builder()
            .boosts(file.boosts)
            .crystals(file.crystals)
            .pets(file.pets)
            .synergies(file.synergies)
            .build();
        LoadedCatalog { catalog, skipped }
    }
}
