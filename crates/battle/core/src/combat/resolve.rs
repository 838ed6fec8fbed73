//! Applies a skill to the roster and the scheduler.

use crate::error::{BattleError, ErrorSeverity};
use crate::scheduler::{Scheduler, SchedulerError};
use crate::state::{ActorId, Roster};

use super::damage::{apply_damage, apply_heal, calculate_damage, calculate_heal};
use super::skill::{SkillEffect, SkillError, Targeting};

/// One observable consequence of a resolved skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectRecord {
    Damage {
        target: ActorId,
        amount: u32,
        remaining_hp: u32,
    },
    Heal {
        target: ActorId,
        amount: u32,
        hp: u32,
    },
    SpeedChanged {
        target: ActorId,
        from: f64,
        to: f64,
    },
    /// `offset` is `None` when the target had no pending turn left.
    ActionAdvanced {
        target: ActorId,
        offset: Option<f64>,
    },
    ExtraTurn {
        target: ActorId,
        granted: bool,
    },
    Defeated {
        target: ActorId,
    },
}

/// Everything that happened while resolving one skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillOutcome {
    pub caster: ActorId,
    pub skill: String,
    pub records: Vec<EffectRecord>,
}

impl SkillOutcome {
    /// Combatants defeated by this skill, in resolution order.
    pub fn defeated(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.records.iter().filter_map(|record| match record {
            EffectRecord::Defeated { target } => Some(*target),
            _ => None,
        })
    }

    pub fn total_damage(&self) -> u64 {
        self.records
            .iter()
            .map(|record| match record {
                EffectRecord::Damage { amount, .. } => u64::from(*amount),
                _ => 0,
            })
            .sum()
    }

    pub fn total_heal(&self) -> u64 {
        self.records
            .iter()
            .map(|record| match record {
                EffectRecord::Heal { amount, .. } => u64::from(*amount),
                _ => 0,
            })
            .sum()
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("combatant {0} is not on the roster")]
    UnknownCombatant(ActorId),

    #[error("caster {0} is defeated and cannot act")]
    CasterDefeated(ActorId),

    #[error("caster {caster} has no skill at index {index}")]
    UnknownSkill { caster: ActorId, index: usize },

    #[error("skill '{skill}' needs a target")]
    MissingTarget { skill: String },

    #[error("{target} is not a valid target for {caster}'s {targeting}")]
    InvalidTarget {
        caster: ActorId,
        target: ActorId,
        targeting: Targeting,
    },

    #[error("target {0} is already defeated")]
    TargetDefeated(ActorId),

    #[error(transparent)]
    InvalidSkill(#[from] SkillError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

impl BattleError for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownSkill { .. }
            | Self::MissingTarget { .. }
            | Self::InvalidTarget { .. }
            | Self::TargetDefeated(_) => ErrorSeverity::Recoverable,
            Self::UnknownCombatant(_) | Self::CasterDefeated(_) => ErrorSeverity::Internal,
            Self::InvalidSkill(inner) => inner.severity(),
            Self::Scheduler(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCombatant(_) => "RESOLVE_UNKNOWN_COMBATANT",
            Self::CasterDefeated(_) => "RESOLVE_CASTER_DEFEATED",
            Self::UnknownSkill { .. } => "RESOLVE_UNKNOWN_SKILL",
            Self::MissingTarget { .. } => "RESOLVE_MISSING_TARGET",
            Self::InvalidTarget { .. } => "RESOLVE_INVALID_TARGET",
            Self::TargetDefeated(_) => "RESOLVE_TARGET_DEFEATED",
            Self::InvalidSkill(inner) => inner.error_code(),
            Self::Scheduler(inner) => inner.error_code(),
        }
    }
}

/// Resolves `caster`'s skill at `skill_index` against `target`.
///
/// Caster, skill and targets are validated before anything is mutated.
/// Effects are then applied in declaration order to each target; once a
/// target drops to 0 hp it is removed from the scheduler and skips the
/// remaining effects.
pub fn resolve_skill(
    roster: &mut Roster,
    scheduler: &mut Scheduler,
    caster: ActorId,
    skill_index: usize,
    target: Option<ActorId>,
) -> Result<SkillOutcome, ResolveError> {
    let caster_state = roster
        .get(caster)
        .ok_or(ResolveError::UnknownCombatant(caster))?;
    if !caster_state.is_alive() {
        return Err(ResolveError::CasterDefeated(caster));
    }
    let skill = caster_state
        .skill(skill_index)
        .cloned()
        .ok_or(ResolveError::UnknownSkill {
            caster,
            index: skill_index,
        })?;
    skill.validate()?;
    let attack = caster_state.attack;

    let targets = select_targets(roster, caster, skill.target, target, &skill.name)?;

    let mut records = Vec::new();
    for target in targets {
        for effect in &skill.effects {
            let Some(combatant) = roster.get_mut(target) else {
                return Err(ResolveError::UnknownCombatant(target));
            };
            if !combatant.is_alive() {
                break;
            }
            match *effect {
                SkillEffect::Damage { power } => {
                    let amount = calculate_damage(attack, power);
                    combatant.hp = apply_damage(combatant.hp, amount);
                    records.push(EffectRecord::Damage {
                        target,
                        amount,
                        remaining_hp: combatant.hp,
                    });
                    if !combatant.is_alive() {
                        scheduler.kill(target)?;
                        records.push(EffectRecord::Defeated { target });
                    }
                }
                SkillEffect::Heal { power } => {
                    let amount = calculate_heal(attack, power);
                    combatant.hp = apply_heal(combatant.hp, combatant.max_hp, amount);
                    records.push(EffectRecord::Heal {
                        target,
                        amount,
                        hp: combatant.hp,
                    });
                }
                SkillEffect::SpeedChange { delta } => {
                    let change = scheduler.speed_change(target, delta)?;
                    records.push(EffectRecord::SpeedChanged {
                        target,
                        from: change.from,
                        to: change.to,
                    });
                }
                SkillEffect::AdvanceAction { fraction } => {
                    let offset = scheduler.advance_action(target, fraction)?;
                    records.push(EffectRecord::ActionAdvanced { target, offset });
                }
                SkillEffect::ExtraTurn => {
                    let granted = scheduler.grant_extra_turn(target)?;
                    records.push(EffectRecord::ExtraTurn { target, granted });
                }
            }
        }
    }

    Ok(SkillOutcome {
        caster,
        skill: skill.name,
        records,
    })
}

fn select_targets(
    roster: &Roster,
    caster: ActorId,
    targeting: Targeting,
    requested: Option<ActorId>,
    skill: &str,
) -> Result<Vec<ActorId>, ResolveError> {
    let team = roster
        .get(caster)
        .ok_or(ResolveError::UnknownCombatant(caster))?
        .team;

    let targets = match targeting {
        Targeting::SelfOnly => vec![caster],
        Targeting::SingleEnemy | Targeting::SingleAlly => {
            let target = requested.ok_or_else(|| ResolveError::MissingTarget {
                skill: skill.to_string(),
            })?;
            let combatant = roster
                .get(target)
                .ok_or(ResolveError::UnknownCombatant(target))?;
            let expected = if targeting == Targeting::SingleAlly {
                team
            } else {
                team.opponent()
            };
            if combatant.team != expected {
                return Err(ResolveError::InvalidTarget {
                    caster,
                    target,
                    targeting,
                });
            }
            if !combatant.is_alive() {
                return Err(ResolveError::TargetDefeated(target));
            }
            vec![target]
        }
        Targeting::AllEnemies => roster.living(team.opponent()).map(|c| c.id).collect(),
        Targeting::AllAllies => roster.living(team).map(|c| c.id).collect(),
    };
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Skill;
    use crate::config::BattleConfig;
    use crate::state::{Combatant, Team};

    fn setup() -> (Roster, Scheduler) {
        let strike = Skill::new("Strike", Targeting::SingleEnemy)
            .with_effect(SkillEffect::Damage { power: 100 })
            .with_effect(SkillEffect::AdvanceAction { fraction: -0.3 });
        let haste = Skill::new("Haste", Targeting::AllAllies)
            .with_effect(SkillEffect::SpeedChange { delta: 30.0 })
            .with_effect(SkillEffect::Heal { power: 50 });
        let sweep = Skill::new("Sweep", Targeting::AllEnemies)
            .with_effect(SkillEffect::Damage { power: 200 })
            .with_effect(SkillEffect::SpeedChange { delta: -20.0 });
        let rally = Skill::new("Rally", Targeting::SelfOnly).with_effect(SkillEffect::ExtraTurn);

        let roster = Roster::from_combatants([
            Combatant::new(ActorId(1), Team::Ally, "Knight", 120, 40, 230.0)
                .with_skill(strike)
                .with_skill(sweep)
                .with_skill(rally),
            Combatant::new(ActorId(2), Team::Ally, "Cleric", 80, 20, 190.0)
                .with_skill(haste)
                .with_hp(30),
            Combatant::new(ActorId(3), Team::Enemy, "Wolf", 60, 25, 215.0),
            Combatant::new(ActorId(4), Team::Enemy, "Slime", 100, 5, 150.0),
        ])
        .unwrap();

        let mut scheduler = Scheduler::new(&BattleConfig::default()).unwrap();
        roster.enroll_all(&mut scheduler).unwrap();
        scheduler.start_round();
        (roster, scheduler)
    }

    #[test]
    fn single_target_damage_reports_numbers() {
        let (mut roster, mut scheduler) = setup();

        let outcome = resolve_skill(&mut roster, &mut scheduler, ActorId(1), 0, Some(ActorId(4)))
            .unwrap();

        assert_eq!(
            outcome.records[0],
            EffectRecord::Damage {
                target: ActorId(4),
                amount: 40,
                remaining_hp: 60
            }
        );
        assert_eq!(outcome.total_damage(), 40);
        assert_eq!(roster.get(ActorId(4)).unwrap().hp, 60);
        // Delayed by 10000 * 0.3 / 150 = 20.
        let offset = scheduler.entries_for(ActorId(4))[0].scheduled_offset;
        assert!((offset - (10_000.0 / 150.0 + 20.0)).abs() < 1e-9);
    }

    #[test]
    fn defeat_removes_target_from_queue_and_skips_remaining_effects() {
        let (mut roster, mut scheduler) = setup();

        let outcome = resolve_skill(&mut roster, &mut scheduler, ActorId(1), 1, None).unwrap();

        // 80 damage kills the wolf (60 hp), the slime survives with 20 hp.
        assert_eq!(outcome.defeated().collect::<Vec<_>>(), vec![ActorId(3)]);
        assert!(scheduler.entries_for(ActorId(3)).is_empty());
        assert!(!scheduler.actor(ActorId(3)).unwrap().is_alive());
        assert!(!outcome.records.iter().any(|r| matches!(
            r,
            EffectRecord::SpeedChanged { target: ActorId(3), .. }
        )));
        assert!(outcome.records.contains(&EffectRecord::SpeedChanged {
            target: ActorId(4),
            from: 150.0,
            to: 130.0
        }));
    }

    #[test]
    fn group_heal_is_capped_and_speeds_up_allies() {
        let (mut roster, mut scheduler) = setup();

        let outcome = resolve_skill(&mut roster, &mut scheduler, ActorId(2), 0, None).unwrap();

        assert_eq!(roster.get(ActorId(1)).unwrap().hp, 120);
        assert_eq!(roster.get(ActorId(2)).unwrap().hp, 40);
        assert_eq!(outcome.total_heal(), 20);
        assert_eq!(scheduler.actor(ActorId(1)).unwrap().speed, 260.0);
        assert_eq!(scheduler.actor(ActorId(2)).unwrap().speed, 220.0);
    }

    #[test]
    fn extra_turn_goes_to_the_front() {
        let (mut roster, mut scheduler) = setup();

        let outcome = resolve_skill(&mut roster, &mut scheduler, ActorId(1), 2, None).unwrap();

        assert_eq!(
            outcome.records,
            vec![EffectRecord::ExtraTurn {
                target: ActorId(1),
                granted: true
            }]
        );
        assert_eq!(scheduler.peek().unwrap().actor, ActorId(1));
        assert_eq!(scheduler.peek().unwrap().scheduled_offset, 0.0);
    }

    #[test]
    fn rejects_bad_targets_without_mutating() {
        let (mut roster, mut scheduler) = setup();
        let before = scheduler.digest();

        assert_eq!(
            resolve_skill(&mut roster, &mut scheduler, ActorId(1), 0, None),
            Err(ResolveError::MissingTarget {
                skill: "Strike".into()
            })
        );
        assert!(matches!(
            resolve_skill(&mut roster, &mut scheduler, ActorId(1), 0, Some(ActorId(2))),
            Err(ResolveError::InvalidTarget { .. })
        ));
        assert_eq!(
            resolve_skill(&mut roster, &mut scheduler, ActorId(1), 9, Some(ActorId(3))),
            Err(ResolveError::UnknownSkill {
                caster: ActorId(1),
                index: 9
            })
        );
        assert_eq!(scheduler.digest(), before);
        assert_eq!(roster.get(ActorId(3)).unwrap().hp, 60);
    }

    #[test]
    fn malformed_skill_is_rejected_before_any_effect() {
        let (mut roster, mut scheduler) = setup();
        let broken = Skill::new("Broken", Targeting::SingleEnemy)
            .with_effect(SkillEffect::Damage { power: 100 })
            .with_effect(SkillEffect::SpeedChange { delta: f64::NAN });
        roster.get_mut(ActorId(1)).unwrap().skills.push(broken);
        let before = scheduler.digest();

        let err = resolve_skill(&mut roster, &mut scheduler, ActorId(1), 3, Some(ActorId(4)))
            .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::InvalidSkill(SkillError::InvalidSpeedDelta { .. })
        ));
        assert_eq!(err.error_code(), "SKILL_INVALID_SPEED_DELTA");
        assert_eq!(roster.get(ActorId(4)).unwrap().hp, 100);
        assert_eq!(scheduler.digest(), before);
    }

    #[test]
    fn defeated_caster_and_target_are_rejected() {
        let (mut roster, mut scheduler) = setup();
        roster.get_mut(ActorId(3)).unwrap().hp = 0;
        scheduler.kill(ActorId(3)).unwrap();

        let err = resolve_skill(&mut roster, &mut scheduler, ActorId(1), 0, Some(ActorId(3)))
            .unwrap_err();
        assert_eq!(err, ResolveError::TargetDefeated(ActorId(3)));
        assert!(err.severity().is_recoverable());

        let err = resolve_skill(&mut roster, &mut scheduler, ActorId(3), 0, None).unwrap_err();
        assert_eq!(err.error_code(), "RESOLVE_CASTER_DEFEATED");
    }
}
