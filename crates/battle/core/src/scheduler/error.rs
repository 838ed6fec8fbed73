use crate::error::{BattleError, ErrorSeverity};
use crate::state::ActorId;

/// Errors raised at the scheduler's call boundary.
///
/// The scheduler itself never enters a state it cannot represent; invalid
/// parameters are rejected before any mutation happens.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum SchedulerError {
    #[error("distance must be finite and positive, got {0}")]
    InvalidDistance(f64),

    #[error("round action value must be finite and positive, got {0}")]
    InvalidActionValue(f64),

    #[error("round cap must be at least one round")]
    InvalidRoundCap,

    #[error("actor {actor} speed must be finite and positive, got {speed}")]
    InvalidSpeed { actor: ActorId, speed: f64 },

    #[error("speed delta for actor {actor} must be finite, got {delta}")]
    InvalidSpeedDelta { actor: ActorId, delta: f64 },

    #[error("action fraction for actor {actor} must be finite, got {fraction}")]
    InvalidFraction { actor: ActorId, fraction: f64 },

    #[error("actor {0} is not enrolled in the scheduler")]
    UnknownActor(ActorId),

    #[error("actor {0} is already enrolled in the scheduler")]
    DuplicateActor(ActorId),
}

impl BattleError for SchedulerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownActor(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDistance(_) => "SCHEDULER_INVALID_DISTANCE",
            Self::InvalidActionValue(_) => "SCHEDULER_INVALID_ACTION_VALUE",
            Self::InvalidRoundCap => "SCHEDULER_INVALID_ROUND_CAP",
            Self::InvalidSpeed { .. } => "SCHEDULER_INVALID_SPEED",
            Self::InvalidSpeedDelta { .. } => "SCHEDULER_INVALID_SPEED_DELTA",
            Self::InvalidFraction { .. } => "SCHEDULER_INVALID_FRACTION",
            Self::UnknownActor(_) => "SCHEDULER_UNKNOWN_ACTOR",
            Self::DuplicateActor(_) => "SCHEDULER_DUPLICATE_ACTOR",
        }
    }
}
