//! Skill definitions.
//!
//! A skill is a named list of effects applied in order to every selected
//! target. Effects cover the classic action-value toolkit: hit, mend, haste
//! or slow, pull a turn forward (or push it back), and grant an extra turn.

use crate::error::{BattleError, ErrorSeverity};

/// Who a skill can be aimed at, relative to the caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Targeting {
    SelfOnly,
    SingleEnemy,
    SingleAlly,
    AllEnemies,
    AllAllies,
}

impl Targeting {
    /// True when the caller has to name a target.
    pub const fn needs_target(self) -> bool {
        matches!(self, Targeting::SingleEnemy | Targeting::SingleAlly)
    }

    /// True when the skill lands on the caster's own side.
    pub const fn is_friendly(self) -> bool {
        matches!(
            self,
            Targeting::SelfOnly | Targeting::SingleAlly | Targeting::AllAllies
        )
    }
}

/// A single effect of a skill.
#[derive(Clone, Copy, Debug, PartialEq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SkillEffect {
    /// Deals `attack * power / 100` damage.
    Damage { power: u32 },
    /// Restores `attack * power / 100` hp, capped at max hp.
    Heal { power: u32 },
    /// Adds `delta` to the target's speed (negative slows).
    SpeedChange { delta: f64 },
    /// Pulls the target's next turn forward by `distance * fraction / speed`
    /// (negative delays).
    AdvanceAction { fraction: f64 },
    /// Inserts an immediate extra turn for the target.
    ExtraTurn,
}

impl SkillEffect {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SkillError {
    #[error("skill name must not be empty")]
    EmptyName,

    #[error("skill '{0}' has no effects")]
    NoEffects(String),

    #[error("skill '{skill}' speed delta must be finite, got {delta}")]
    InvalidSpeedDelta { skill: String, delta: f64 },

    #[error("skill '{skill}' action fraction must be finite, got {fraction}")]
    InvalidFraction { skill: String, fraction: f64 },
}

impl BattleError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "SKILL_EMPTY_NAME",
            Self::NoEffects(_) => "SKILL_NO_EFFECTS",
            Self::InvalidSpeedDelta { .. } => "SKILL_INVALID_SPEED_DELTA",
            Self::InvalidFraction { .. } => "SKILL_INVALID_FRACTION",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub name: String,
    pub target: Targeting,
    pub effects: Vec<SkillEffect>,
}

impl Skill {
    pub fn new(name: impl Into<String>, target: Targeting) -> Self {
        Self {
            name: name.into(),
            target,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: SkillEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Rejects skills the scheduler would refuse at resolution time.
    pub fn validate(&self) -> Result<(), SkillError> {
        if self.name.trim().is_empty() {
            return Err(SkillError::EmptyName);
        }
        if self.effects.is_empty() {
            return Err(SkillError::NoEffects(self.name.clone()));
        }
        for effect in &self.effects {
            match *effect {
                SkillEffect::SpeedChange { delta } if !delta.is_finite() => {
                    return Err(SkillError::InvalidSpeedDelta {
                        skill: self.name.clone(),
                        delta,
                    });
                }
                SkillEffect::AdvanceAction { fraction } if !fraction.is_finite() => {
                    return Err(SkillError::InvalidFraction {
                        skill: self.name.clone(),
                        fraction,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// True when any effect deals damage.
    pub fn is_offensive(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, SkillEffect::Damage { .. }))
    }

    /// True when any effect restores hp.
    pub fn heals(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, SkillEffect::Heal { .. }))
    }
}
