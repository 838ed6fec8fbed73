//! Battle state: identifiers, combatant records and the roster.

mod combatant;
mod roster;
mod types;

pub use combatant::Combatant;
pub use roster::{BattleOutcome, Roster, RosterError};
pub use types::{ActorId, Round, Team};
