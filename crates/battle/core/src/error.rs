//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (e.g. `SchedulerError`, `ResolveError`) live next to
//! the code that raises them. This module only provides the shared
//! classification used by the runtime when deciding how to react.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller can pick another action and try again
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistency, indicates a bug
/// - **Fatal**: the battle cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with an alternative action.
    ///
    /// Examples: target already defeated, caster picked an unknown skill
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: non-finite speed delta, zero initial speed
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: roster and scheduler disagree about an actor
    Internal,

    /// Fatal error - battle state cannot progress.
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

/// Common trait for all battle-core errors.
///
/// Provides a uniform interface for classification so the runtime can log
/// and react without matching on every concrete error type.
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Used as a structured field in logs and in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
