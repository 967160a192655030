//! Bonus categories that every modifier is expressed against.

use crate::catalog::CatalogError;

/// Kind of gameplay value a bonus applies to.
///
/// [`BonusCategory::All`] is the distinguished "applies to all" category:
/// a timed boost in that category contributes to every other category.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BonusCategory {
    Token,
    Money,
    Xp,
    SellPrice,
    MiningYield,
    JobXp,
    All,
}

impl BonusCategory {
    /// Categories a gameplay formula can ask for (everything except `All`).
    pub const CONCRETE: [BonusCategory; 6] = [
        BonusCategory::Token,
        BonusCategory::Money,
        BonusCategory::Xp,
        BonusCategory::SellPrice,
        BonusCategory::MiningYield,
        BonusCategory::JobXp,
    ];

    /// Parses a persisted or configured category name.
    pub fn parse(name: &str) -> Result<Self, CatalogError> {
        name.parse().map_err(|_| CatalogError::UnknownType {
            kind: "category",
            id: name.to_string(),
        })
    }

    #[inline]
    pub const fn is_all(self) -> bool {
        matches!(self, BonusCategory::All)
    }

    /// Human-readable label for announcements.
    pub fn display_name(self) -> &'static str {
        match self {
            BonusCategory::Token => "Token",
            BonusCategory::Money => "Money",
            BonusCategory::Xp => "XP",
            BonusCategory::SellPrice => "Sell Price",
            BonusCategory::MiningYield => "Mining Yield",
            BonusCategory::JobXp => "Job XP",
            BonusCategory::All => "Everything",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn names_round_trip_through_parse() {
        for category in BonusCategory::iter() {
            assert_eq!(BonusCategory::parse(category.as_ref()).unwrap(), category);
        }
        assert_eq!(
            BonusCategory::parse("SELL_PRICE").unwrap(),
            BonusCategory::SellPrice
        );
    }

    #[test]
    fn unknown_name_is_unknown_type() {
        let err = BonusCategory::parse("luck").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownType { kind: "category", .. }));
    }

    #[test]
    fn concrete_excludes_all() {
        assert!(!BonusCategory::CONCRETE.contains(&BonusCategory::All));
        assert_eq!(BonusCategory::CONCRETE.len() + 1, BonusCategory::iter().count());
    }
}
