//! Catalog lookup and validation errors.

use crate::error::{EconomyError, ErrorSeverity};
use crate::types::ContentId;

/// Errors that occur when resolving or registering catalog data.
///
/// Loading code treats these per entry: the offending record is skipped and
/// logged, the rest of the catalog still loads.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A persisted or configured name does not resolve in the catalog.
    #[error("unknown {kind} type '{id}'")]
    UnknownType { kind: &'static str, id: String },

    /// Two records share an identifier; the later one is dropped.
    #[error("duplicate {kind} type '{id}'")]
    DuplicateType { kind: &'static str, id: String },

    /// A record violates its numeric invariants.
    #[error("invalid {kind} '{id}': {field} is out of range")]
    InvalidDefinition {
        kind: &'static str,
        id: String,
        field: &'static str,
    },

    /// A random choice was requested from an empty set of types.
    #[error("no {kind} types are configured")]
    EmptyCatalog { kind: &'static str },
}

impl CatalogError {
    pub fn unknown(kind: &'static str, id: impl AsRef<str>) -> Self {
        Self::UnknownType {
            kind,
            id: id.as_ref().to_string(),
        }
    }

    pub(crate) fn invalid(kind: &'static str, id: &ContentId, field: &'static str) -> Self {
        Self::InvalidDefinition {
            kind,
            id: id.to_string(),
            field,
        }
    }
}

impl EconomyError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CatalogError::UnknownType { .. }
            | CatalogError::DuplicateType { .. }
            | CatalogError::InvalidDefinition { .. } => ErrorSeverity::Validation,
            CatalogError::EmptyCatalog { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::UnknownType { .. } => "CATALOG_UNKNOWN_TYPE",
            CatalogError::DuplicateType { .. } => "CATALOG_DUPLICATE_TYPE",
            CatalogError::InvalidDefinition { .. } => "CATALOG_INVALID_DEFINITION",
            CatalogError::EmptyCatalog { .. } => "CATALOG_EMPTY",
        }
    }
}
