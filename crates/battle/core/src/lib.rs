//! Deterministic battle rules shared by the runtime and offline tools.
//!
//! `battle-core` defines the canonical action-value scheduler, combatant
//! records and skill resolution. Everything here is pure: no I/O, no clocks,
//! no randomness. Turn order flows through [`scheduler::Scheduler`], and skill
//! effects are applied with [`combat::resolve_skill`].
pub mod combat;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod state;

pub use combat::{
    EffectRecord, ResolveError, Skill, SkillEffect, SkillError, SkillOutcome, Targeting,
    apply_damage, apply_heal, calculate_damage, calculate_heal, resolve_skill,
};
pub use config::BattleConfig;
pub use error::{BattleError, ErrorSeverity};
pub use scheduler::{ActorInfo, QueueEntry, Scheduler, SchedulerError, SpeedChange};
pub use state::{ActorId, BattleOutcome, Combatant, Roster, RosterError, Round, Team};
