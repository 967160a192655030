//! Timed boost activation errors.

use crate::category::BonusCategory;
use crate::error::{EconomyError, ErrorSeverity};
use crate::types::{EntityId, Timestamp};

/// Errors raised when creating or activating a timed boost.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BoostError {
    /// A player-scoped boost of this category is still running.
    #[error("{entity} already has an active {category} boost (ends at {ends_at})")]
    AlreadyActive {
        entity: EntityId,
        category: BonusCategory,
        ends_at: Timestamp,
    },

    /// The boost window is empty or inverted.
    #[error("boost window is empty: start {start}, end {end}")]
    InvalidDuration { start: Timestamp, end: Timestamp },

    /// The bonus is negative or not a finite number.
    #[error("boost bonus must be a finite non-negative percentage, got {0}")]
    InvalidBonus(f64),
}

impl EconomyError for BoostError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            BoostError::AlreadyActive { .. } => ErrorSeverity::Recoverable,
            BoostError::InvalidDuration { .. } | BoostError::InvalidBonus(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            BoostError::AlreadyActive { .. } => "BOOST_ALREADY_ACTIVE",
            BoostError::InvalidDuration { .. } => "BOOST_INVALID_DURATION",
            BoostError::InvalidBonus(_) => "BOOST_INVALID_BONUS",
        }
    }
}
