//! Oracle access errors.
//!
//! Errors related to oracle availability and data access. Callers in this
//! crate log them and fall back to neutral values; they never abort a
//! computation.

use crate::error::{ErrorSeverity, GameError};
use crate::state::ItemId;

use super::{ItemTypeId, VocationId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// ItemOracle is not available in the environment.
    #[error("ItemOracle not available")]
    ItemsNotAvailable,

    /// VocationOracle is not available in the environment.
    #[error("VocationOracle not available")]
    VocationsNotAvailable,

    /// WorldOracle is not available in the environment.
    #[error("WorldOracle not available")]
    WorldNotAvailable,

    #[error("item type {0:?} not found")]
    ItemTypeNotFound(ItemTypeId),

    #[error("vocation {0:?} not found")]
    VocationNotFound(VocationId),

    /// Arena index does not point at a live item.
    #[error("item {0} not found in arena")]
    ItemNotFound(ItemId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ItemsNotAvailable => "ORACLE_ITEMS_NOT_AVAILABLE",
            VocationsNotAvailable => "ORACLE_VOCATIONS_NOT_AVAILABLE",
            WorldNotAvailable => "ORACLE_WORLD_NOT_AVAILABLE",
            ItemTypeNotFound(_) => "ORACLE_ITEM_TYPE_NOT_FOUND",
            VocationNotFound(_) => "ORACLE_VOCATION_NOT_FOUND",
            ItemNotFound(_) => "ORACLE_ITEM_NOT_FOUND",
        }
    }
}
