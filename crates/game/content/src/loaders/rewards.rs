//! Reward table loader.

use std::collections::HashSet;
use std::path::Path;

use economy_core::{BonusCatalog, CatalogError, RewardTableDef};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Reward table structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardsFile {
    pub tables: Vec<RewardTableDef>,
}

/// Reward tables with their catalog references checked.
#[derive(Debug, Clone, Default)]
pub struct LoadedRewards {
    pub tables: Vec<RewardTableDef>,
    /// One error per entry dropped for naming a missing boost or pet type.
    pub skipped: Vec<CatalogError>,
}

/// Loader for reward tables from RON files.
///
/// Only the file shape is checked here. Weights are validated when a table
/// is first built, so a bad table fails on use instead of blocking startup.
pub struct RewardsLoader;

impl RewardsLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<RewardTableDef>> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<RewardTableDef>> {
        let file: RewardsFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse reward tables RON: {}", e))?;

        let mut seen = HashSet::new();
        for table in &file.tables {
            if !seen.insert(table.id.clone()) {
                anyhow::bail!("Duplicate reward table '{}'", table.id);
            }
        }

        Ok(file.tables)
    }

    /// Drops entries whose payload names a boost or pet type missing from
    /// `catalog`, so a typo is reported at startup instead of after a draw.
    ///
    /// A table left without entries still loads and fails on selection.
    pub fn resolve(tables: Vec<RewardTableDef>, catalog: &BonusCatalog) -> LoadedRewards {
        let mut skipped = Vec::new();
        let tables = tables
            .into_iter()
            .map(|mut table| {
                table.entries.retain(|entry| match entry.payload.check_refs(catalog) {
                    Ok(()) => true,
                    Err(e) => {
                        skipped.push(e);
                        false
                    }
                });
                table
            })
            .collect();
        LoadedRewards { tables, skipped }
    }
}
