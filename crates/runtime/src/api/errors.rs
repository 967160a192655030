//! Unified error types surfaced by the runtime API.
//!
//! Wraps the domain errors of economy-core together with repository and
//! worker failures so callers can bubble them up with consistent context.

use thiserror::Error;

use economy_core::{
    BoostError, CatalogError, EconomyError, ErrorSeverity, ModifierError, RewardError,
};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Boost(#[from] BoostError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Reward(#[from] RewardError),

    #[error(transparent)]
    Modifier(#[from] ModifierError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{worker} worker join failed")]
    WorkerJoin {
        worker: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("runtime requires a bonus catalog to be configured before building")]
    MissingCatalog,
}

impl EconomyError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Boost(e) => e.severity(),
            RuntimeError::Catalog(e) => e.severity(),
            RuntimeError::Reward(e) => e.severity(),
            RuntimeError::Modifier(e) => e.severity(),
            RuntimeError::Repository(_) | RuntimeError::WorkerJoin { .. } => {
                ErrorSeverity::Internal
            }
            RuntimeError::MissingCatalog => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Boost(e) => e.error_code(),
            RuntimeError::Catalog(e) => e.error_code(),
            RuntimeError::Reward(e) => e.error_code(),
            RuntimeError::Modifier(e) => e.error_code(),
            RuntimeError::Repository(_) => "RUNTIME_REPOSITORY",
            RuntimeError::WorkerJoin { .. } => "RUNTIME_WORKER_JOIN",
            RuntimeError::MissingCatalog => "RUNTIME_MISSING_CATALOG",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use economy_core::{BonusCategory, EntityId, Timestamp};

    #[test]
    fn domain_errors_keep_their_classification() {
        let err: RuntimeError = BoostError::AlreadyActive {
            entity: EntityId(1),
            category: BonusCategory::Xp,
            ends_at: Timestamp::from_secs(60),
        }
        .into();
        assert!(err.severity().is_recoverable());
        assert_eq!(err.error_code(), "BOOST_ALREADY_ACTIVE");

        let err: RuntimeError = RewardError::EmptyTable.into();
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(RuntimeError::MissingCatalog.error_code(), "RUNTIME_MISSING_CATALOG");
    }
}
