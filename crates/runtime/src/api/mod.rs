//! Public API surface of the runtime: errors and action providers.
mod errors;
mod providers;

pub use errors::{Result, RuntimeError};
pub use providers::{ActionProvider, AutoProvider, Decision, ScriptedProvider, TurnContext};
