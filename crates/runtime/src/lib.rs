//! Async orchestration for action-value battles.
//!
//! This crate drives a [`Battle`] turn by turn: it starts rounds on the
//! scheduler, asks an [`ActionProvider`] per side what the acting combatant
//! does, resolves the skill and publishes what happened on the [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the battle loop and its builder
//! - [`api`] exposes the error and provider types clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`presentation`] maps scheduler entries to display labels
pub mod api;
pub mod events;
pub mod presentation;
pub mod runtime;

pub use api::{
    ActionProvider, AutoProvider, Decision, Result, RuntimeError, ScriptedProvider, TurnContext,
};
pub use events::{CombatEvent, Event, EventBus, RoundEvent, Topic, TurnEvent};
pub use presentation::{TurnOrderSlot, label, turn_order_slots};
pub use runtime::{Battle, BattleBuilder, BattleSummary, TurnReport};
