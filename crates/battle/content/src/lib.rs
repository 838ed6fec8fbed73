//! Data-driven battle content and loaders.
//!
//! This crate reads static battle data from RON/TOML files:
//! - Rosters: combatants with their stats and skills (RON)
//! - Battle configuration: round budget, distance, round cap (TOML)
//!
//! Content is turned into `battle-core` types and validated on load, so the
//! runtime never sees a roster or config the scheduler would reject.

pub mod loaders;

pub use loaders::{CombatantSpec, ConfigLoader, ContentFactory, LoadResult, RosterLoader};
