use crate::combat::Skill;

use super::{ActorId, Team};

/// Stat record of a single combatant.
///
/// `speed` is the base stat used when the combatant is enrolled in the
/// scheduler. Buffs and debuffs change the effective speed held by the
/// scheduler, never this field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: ActorId,
    pub team: Team,
    pub name: String,
    pub max_hp: u32,
    pub hp: u32,
    pub attack: u32,
    pub speed: f64,
    pub skills: Vec<Skill>,
}

impl Combatant {
    /// Creates a combatant at full health with no skills.
    pub fn new(
        id: ActorId,
        team: Team,
        name: impl Into<String>,
        max_hp: u32,
        attack: u32,
        speed: f64,
    ) -> Self {
        Self {
            id,
            team,
            name: name.into(),
            max_hp,
            hp: max_hp,
            attack,
            speed,
            skills: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    #[must_use]
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.max_hp);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn skill(&self, index: usize) -> Option<&Skill> {
        self.skills.get(index)
    }
}
