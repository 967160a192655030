//! Timed percentage boosts.
//!
//! A [`BoostInstance`] is a value object: once created its window and bonus
//! never change. Expiry is purely a function of `now`, so there are no timer
//! objects; an expired instance is only ever removed and possibly replaced by
//! a brand-new one.

mod error;

pub use error::BoostError;

use crate::category::BonusCategory;
use crate::types::Timestamp;

/// Who a timed boost applies to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BoostScope {
    /// Applies to a single entity; at most one per (entity, category).
    Player,
    /// Applies to every entity; one per category server-wide, never persisted.
    AdminGlobal,
}

/// Lifecycle state of a boost at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoostState {
    Active,
    /// Terminal.
    Expired,
}

/// One active timed modifier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoostInstance {
    pub category: BonusCategory,
    pub scope: BoostScope,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Raw percentage, e.g. `12.5` means +12.5%.
    pub bonus_percent: f64,
}

impl BoostInstance {
    /// Creates a boost starting at `start` and lasting `duration_secs`.
    ///
    /// # Errors
    ///
    /// - [`BoostError::InvalidDuration`] if the duration is zero
    /// - [`BoostError::InvalidBonus`] if the bonus is negative or not finite
    pub fn new(
        category: BonusCategory,
        scope: BoostScope,
        start: Timestamp,
        duration_secs: u64,
        bonus_percent: f64,
    ) -> Result<Self, BoostError> {
        let end = start.plus_secs(duration_secs);
        Self::with_window(category, scope, start, end, bonus_percent)
    }

    /// Rebuilds a boost from an explicit window (used when hydrating
    /// persisted state).
    pub fn with_window(
        category: BonusCategory,
        scope: BoostScope,
        start: Timestamp,
        end: Timestamp,
        bonus_percent: f64,
    ) -> Result<Self, BoostError> {
        if end <= start {
            return Err(BoostError::InvalidDuration { start, end });
        }
        if !bonus_percent.is_finite() || bonus_percent < 0.0 {
            return Err(BoostError::InvalidBonus(bonus_percent));
        }

        Ok(Self {
            category,
            scope,
            start,
            end,
            bonus_percent,
        })
    }

    #[inline]
    pub fn is_active(&self, now: Timestamp) -> bool {
        now < self.end
    }

    pub fn state(&self, now: Timestamp) -> BoostState {
        if self.is_active(now) {
            BoostState::Active
        } else {
            BoostState::Expired
        }
    }

    /// Configured duration in milliseconds.
    pub fn duration_millis(&self) -> u64 {
        self.end.millis_since(self.start)
    }

    /// Milliseconds left before expiry (0 once expired).
    pub fn remaining_millis(&self, now: Timestamp) -> u64 {
        self.end.millis_since(now)
    }

    /// Compact `1h 5m 3s` rendering of the remaining time for listings.
    pub fn remaining_display(&self, now: Timestamp) -> String {
        format_duration(self.remaining_millis(now) / 1000)
    }

    /// Bonus contributed at `now`, or `None` once expired.
    #[inline]
    pub fn active_bonus(&self, now: Timestamp) -> Option<f64> {
        self.is_active(now).then_some(self.bonus_percent)
    }
}

/// Renders whole seconds as `Xh Ym Zs`, omitting leading zero units.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boost(duration_secs: u64) -> BoostInstance {
        BoostInstance::new(
            BonusCategory::Money,
            BoostScope::Player,
            Timestamp::from_secs(100),
            duration_secs,
            25.0,
        )
        .unwrap()
    }

    #[test]
    fn active_until_end_exclusive() {
        let b = boost(60);
        assert_eq!(b.end, Timestamp::from_secs(160));
        assert!(b.is_active(Timestamp::from_secs(159)));
        assert!(!b.is_active(Timestamp::from_secs(160)));
        assert_eq!(b.state(Timestamp::from_secs(200)), BoostState::Expired);
        assert_eq!(b.active_bonus(Timestamp::from_secs(160)), None);
        assert_eq!(b.active_bonus(Timestamp::from_secs(100)), Some(25.0));
    }

    #[test]
    fn rejects_zero_duration_and_bad_bonus() {
        let zero = BoostInstance::new(
            BonusCategory::Xp,
            BoostScope::Player,
            Timestamp::EPOCH,
            0,
            10.0,
        );
        assert!(matches!(zero, Err(BoostError::InvalidDuration { .. })));

        let negative = BoostInstance::new(
            BonusCategory::Xp,
            BoostScope::Player,
            Timestamp::EPOCH,
            10,
            -1.0,
        );
        assert!(matches!(negative, Err(BoostError::InvalidBonus(_))));

        let nan = BoostInstance::new(
            BonusCategory::Xp,
            BoostScope::Player,
            Timestamp::EPOCH,
            10,
            f64::NAN,
        );
        assert!(matches!(nan, Err(BoostError::InvalidBonus(_))));
    }

    #[test]
    fn remaining_time_rendering() {
        let b = boost(3_725);
        assert_eq!(b.remaining_display(Timestamp::from_secs(100)), "1h 2m 5s");
        assert_eq!(b.remaining_display(Timestamp::from_secs(3_800)), "25s");
        assert_eq!(b.remaining_millis(Timestamp::from_secs(10_000)), 0);
        assert_eq!(b.duration_millis(), 3_725_000);
    }
}
