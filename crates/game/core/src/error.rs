//! Common error infrastructure for game-core.
//!
//! Gameplay conditions (low MP, out-of-range slot, malformed payloads, death)
//! are never errors: they degrade to events or no-ops inside the session.
//! The types here only cover host misuse of explicit APIs.

use crate::item::ItemCategory;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Hosts use it to decide between skipping a command, rejecting input and
/// reporting a bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative request.
    ///
    /// Examples: acting while the run is over, a generation result from an
    /// earlier run.
    Recoverable,

    /// Invalid input; should not be retried unchanged.
    ///
    /// Examples: consuming an empty slot.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Contextual information attached to errors for diagnostics.
///
/// Captured when the error is raised, so a log line can be matched against a
/// replay of the same seed.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Session clock when the error was raised.
    pub clock_ms: u64,

    /// Stage number of the run.
    pub stage: u32,
}

impl ErrorContext {
    /// Creates a context for the given session clock and stage.
    #[must_use]
    pub const fn new(clock_ms: u64, stage: u32) -> Self {
        Self { clock_ms, stage }
    }
}

/// Common trait for all game-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised by explicit [`crate::GameSession`] APIs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// `consume` pointed at a slot with no item.
    #[error("no {category} item in slot {index}")]
    EmptySlot {
        category: ItemCategory,
        index: usize,
        context: ErrorContext,
    },

    /// The operation needs a different run state.
    #[error("run is not accepting {operation} (state: {state})")]
    RunNotActive {
        operation: &'static str,
        state: &'static str,
        context: ErrorContext,
    },

    /// A generation result was charged under a run that has since ended.
    #[error("generation from run {run_id} arrived during run {current}")]
    StaleGeneration {
        run_id: u64,
        current: u64,
        context: ErrorContext,
    },
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptySlot { .. } => ErrorSeverity::Validation,
            Self::RunNotActive { .. } | Self::StaleGeneration { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::EmptySlot { context, .. }
            | Self::RunNotActive { context, .. }
            | Self::StaleGeneration { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptySlot { .. } => "EMPTY_SLOT",
            Self::RunNotActive { .. } => "RUN_NOT_ACTIVE",
            Self::StaleGeneration { .. } => "STALE_GENERATION",
        }
    }
}
