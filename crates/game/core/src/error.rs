//! Common error infrastructure for economy-core.
//!
//! Domain-specific errors (`BoostError`, `CatalogError`, `RewardError`,
//! `ModifierError`) live next to the modules that raise them. This module
//! holds the shared classification they all report through.
//!
//! The hot path (`is_active`, bonus resolution) never returns these: missing
//! data contributes zero. Errors only surface from cold-path operations such
//! as activation, reward selection and crystal reveal.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Expected rejection; the caller can report it and carry on.
    ///
    /// Examples: boost already active for that category
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unknown type name, non-positive duration
    Validation,

    /// Unexpected state inconsistency.
    Internal,

    /// Configuration is unusable.
    ///
    /// Examples: reward table with no entries
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or broken configuration.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all economy-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait EconomyError: std::fmt::Display + std::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and tests.
    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }
}
