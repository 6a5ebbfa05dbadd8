//! Common error infrastructure for character-core.
//!
//! Domain-specific errors (e.g. `EquipError`, `OracleError`) live next to the
//! operations that produce them. Nothing in this crate panics on bad input:
//! placement failures are returned as values and lookup failures degrade to
//! neutral defaults after being logged.
//!
//! # Design Principles
//!
//! - **Type Safety**: each operation family has its own error type
//! - **Severity Classification**: errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the actor may retry with a different request
/// - **Validation**: invalid input, rejected without state change
/// - **Internal**: inconsistent collaborator data, computation degraded
/// - **Fatal**: reserved for hosts; the core never produces it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry after changing the request.
    ///
    /// Examples: slot occupied by a two-handed weapon, not enough capacity
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: item is not pickupable, item cannot be worn in that slot
    Validation,

    /// Internal error - collaborator data is missing or inconsistent.
    ///
    /// Examples: unknown vocation id, item type missing from the catalog
    Internal,

    /// Fatal error - host state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all character-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Used for metrics, client cancel messages and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }
}
