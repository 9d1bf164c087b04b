//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, session misuse and the external
//! item generator so clients can bubble them up with consistent context.
use game_core::{ErrorSeverity, GameError, SessionError};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("item generator not set")]
    GeneratorNotSet,

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("invalid runtime configuration: {0}")]
    InvalidConfig(&'static str),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Session(error) => error.severity(),
            Self::GeneratorNotSet | Self::InvalidConfig(_) => ErrorSeverity::Validation,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::GeneratorNotSet => "RUNTIME_GENERATOR_NOT_SET",
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::Session(_) => "RUNTIME_SESSION",
            Self::InvalidConfig(_) => "RUNTIME_INVALID_CONFIG",
        }
    }
}

/// Failure reported by an [`crate::ItemGenerator`].
///
/// Malformed payloads are not errors: they are normalized into a fallback item.
/// These variants cover the cases where no payload arrived at all.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    #[error("generator rejected the request: {0}")]
    Rejected(String),

    #[error("generation timed out after {0} ms")]
    Timeout(u64),
}

impl GameError for GenerationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Unavailable(_) | Self::Timeout(_) => ErrorSeverity::Recoverable,
            Self::Rejected(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "GENERATION_UNAVAILABLE",
            Self::Rejected(_) => "GENERATION_REJECTED",
            Self::Timeout(_) => "GENERATION_TIMEOUT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{ErrorContext, ItemCategory};

    #[test]
    fn session_errors_keep_their_severity() {
        let error = RuntimeError::from(SessionError::EmptySlot {
            category: ItemCategory::Weapon,
            index: 2,
            context: ErrorContext::new(0, 1),
        });
        assert_eq!(error.severity(), ErrorSeverity::Validation);
        assert_eq!(error.to_string(), "no weapon item in slot 2");
    }

    #[test]
    fn timeouts_are_recoverable() {
        assert!(GenerationError::Timeout(500).severity().is_recoverable());
        assert!(RuntimeError::CommandChannelClosed.severity().is_internal());
    }
}
