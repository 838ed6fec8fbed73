//! Skills, damage/heal math and skill resolution.

mod damage;
mod resolve;
mod skill;

pub use damage::{apply_damage, apply_heal, calculate_damage, calculate_heal};
pub use resolve::{EffectRecord, ResolveError, SkillOutcome, resolve_skill};
pub use skill::{Skill, SkillEffect, SkillError, Targeting};
