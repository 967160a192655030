use crate::error::{EconomyError, ErrorSeverity};

/// Errors raised by weighted sampling and reward tables.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RewardError {
    /// The table has no entries. Never defaults to a grant.
    #[error("reward table is empty")]
    EmptyTable,

    #[error("unknown reward table '{0}'")]
    UnknownTable(String),

    /// An entry weight is zero, negative or not finite.
    #[error("entry {index} has invalid weight {weight}")]
    InvalidWeight { index: usize, weight: f64 },

    /// The weights are each valid but their sum is not a finite number.
    #[error("table weights overflow to a non-finite total")]
    TotalOverflow,
}

impl EconomyError for RewardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RewardError::EmptyTable
            | RewardError::InvalidWeight { .. }
            | RewardError::TotalOverflow => ErrorSeverity::Fatal,
            RewardError::UnknownTable(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RewardError::EmptyTable => "REWARD_EMPTY_TABLE",
            RewardError::UnknownTable(_) => "REWARD_UNKNOWN_TABLE",
            RewardError::InvalidWeight { .. } => "REWARD_INVALID_WEIGHT",
            RewardError::TotalOverflow => "REWARD_TOTAL_OVERFLOW",
        }
    }
}
