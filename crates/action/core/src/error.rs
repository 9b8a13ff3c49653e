//! Common error infrastructure for action-core.
//!
//! The engine itself never surfaces errors from its hot path: overflow, reuse and
//! stale-target conditions are silent discards recorded in the event journal. The
//! types here cover the places where a caller *can* act on a failure, mainly
//! catalog validation before the catalog is handed to a player.

use crate::action::{ActionId, ActionLogic};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: temporary conditions that may succeed on retry
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: the engine cannot be used with the given data
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
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

    /// Returns true if this error indicates a bug or broken data.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all action-core errors.
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and test assertions.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Problems found while validating an action catalog.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("action {id} is defined more than once")]
    DuplicateAction { id: ActionId },

    #[error("reserved {role} action {id} is not configured")]
    MissingReservedAction { role: &'static str, id: ActionId },

    #[error("reserved {role} action {id} uses {found:?} logic, expected {expected:?}")]
    ReservedLogicMismatch {
        role: &'static str,
        id: ActionId,
        expected: ActionLogic,
        found: ActionLogic,
    },

    #[error("action {id} has negative {field}: {value}")]
    NegativeTiming {
        id: ActionId,
        field: &'static str,
        value: f32,
    },

    #[error("action {id} lists itself in interruptible_by")]
    SelfInterrupt { id: ActionId },
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingReservedAction { .. } | Self::ReservedLogicMismatch { .. } => {
                ErrorSeverity::Fatal
            }
            Self::DuplicateAction { .. }
            | Self::NegativeTiming { .. }
            | Self::SelfInterrupt { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateAction { .. } => "CATALOG_DUPLICATE_ACTION",
            Self::MissingReservedAction { .. } => "CATALOG_MISSING_RESERVED_ACTION",
            Self::ReservedLogicMismatch { .. } => "CATALOG_RESERVED_LOGIC_MISMATCH",
            Self::NegativeTiming { .. } => "CATALOG_NEGATIVE_TIMING",
            Self::SelfInterrupt { .. } => "CATALOG_SELF_INTERRUPT",
        }
    }
}
