//! Event types for the different topics.

use battle_core::{ActorId, BattleOutcome, Round, SkillOutcome};
use serde::{Deserialize, Serialize};

use crate::presentation::TurnOrderSlot;

/// Round lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// A new round started with `actors` pending entries.
    RoundStarted { round: Round, actors: usize },

    /// The battle is over. `outcome` is `None` when the round cap ran out.
    BattleEnded {
        round: Round,
        outcome: Option<BattleOutcome>,
        digest: String,
    },
}

/// Turn management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// `actor` was popped from the queue and is about to act.
    TurnStarted {
        round: Round,
        actor: ActorId,
        label: String,
    },

    /// The pending turn order changed.
    TurnOrderChanged {
        round: Round,
        slots: Vec<TurnOrderSlot>,
    },
}

/// Skill resolution results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    SkillResolved { round: Round, outcome: SkillOutcome },

    ActorDefeated {
        round: Round,
        actor: ActorId,
        label: String,
    },
}
