use crate::error::{EconomyError, ErrorSeverity};
use crate::types::{CrystalId, PetId};

/// Errors from crystal and pet operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModifierError {
    #[error("crystal {0} not found")]
    CrystalNotFound(CrystalId),

    #[error("pet {0} not found")]
    PetNotFound(PetId),

    /// Only revealed crystals can be equipped.
    #[error("crystal {0} has not been revealed")]
    CrystalUnrevealed(CrystalId),
}

impl EconomyError for ModifierError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            ModifierError::CrystalNotFound(_) => "MODIFIER_CRYSTAL_NOT_FOUND",
            ModifierError::PetNotFound(_) => "MODIFIER_PET_NOT_FOUND",
            ModifierError::CrystalUnrevealed(_) => "MODIFIER_CRYSTAL_UNREVEALED",
        }
    }
}
