//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from skill resolution, the scheduler and action providers
//! so clients can bubble them up with consistent context.
use battle_core::{
    ActorId, BattleError, BattleOutcome, ErrorSeverity, ResolveError, Round, SchedulerError, Team,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{team} action provider not set")]
    ProviderNotSet { team: Team },

    #[error("{team} action provider failed for {actor}: {message}")]
    Provider {
        team: Team,
        actor: ActorId,
        message: String,
    },

    #[error("queued actor {0} has no combatant on the roster")]
    UnknownActor(ActorId),

    #[error("round {round} started but no living actor can act within it")]
    RoundStalled { round: Round },

    #[error("no winner after {max_rounds} rounds")]
    RoundCapReached { max_rounds: u32 },

    #[error("battle already ended in {0}")]
    BattleOver(BattleOutcome),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

impl BattleError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ProviderNotSet { .. } => ErrorSeverity::Validation,
            Self::Provider { .. } => ErrorSeverity::Recoverable,
            Self::UnknownActor(_) => ErrorSeverity::Internal,
            Self::RoundStalled { .. } | Self::RoundCapReached { .. } | Self::BattleOver(_) => {
                ErrorSeverity::Fatal
            }
            Self::Resolve(inner) => inner.severity(),
            Self::Scheduler(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ProviderNotSet { .. } => "RUNTIME_PROVIDER_NOT_SET",
            Self::Provider { .. } => "RUNTIME_PROVIDER_FAILED",
            Self::UnknownActor(_) => "RUNTIME_UNKNOWN_ACTOR",
            Self::RoundStalled { .. } => "RUNTIME_ROUND_STALLED",
            Self::RoundCapReached { .. } => "RUNTIME_ROUND_CAP_REACHED",
            Self::BattleOver(_) => "RUNTIME_BATTLE_OVER",
            Self::Resolve(inner) => inner.error_code(),
            Self::Scheduler(inner) => inner.error_code(),
        }
    }
}
