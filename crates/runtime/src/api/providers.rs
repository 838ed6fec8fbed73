//! Asynchronous abstraction for sourcing combatant intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so a battle can
//! run with human input, scripted fixtures, or AI policies. One provider
//! serves each side.
use std::collections::VecDeque;

use async_trait::async_trait;
use battle_core::{ActorId, Combatant, QueueEntry, Roster, Round, Skill, Targeting, Team};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::errors::{Result, RuntimeError};

/// What the acting combatant does this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Index into the combatant's skill list.
    pub skill_index: usize,
    /// Required for single-target skills, ignored otherwise.
    pub target: Option<ActorId>,
}

impl Decision {
    pub fn new(skill_index: usize, target: Option<ActorId>) -> Self {
        Self {
            skill_index,
            target,
        }
    }
}

/// Read-only view handed to a provider when one of its combatants acts.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub actor: ActorId,
    pub team: Team,
    pub round: Round,
    pub roster: &'a Roster,
    /// Entries still pending after the current one, in execution order.
    pub turn_order: &'a [QueueEntry],
}

impl TurnContext<'_> {
    /// The acting combatant.
    pub fn combatant(&self) -> Option<&Combatant> {
        self.roster.get(self.actor)
    }
}

/// Trait for choosing a skill for the acting combatant.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - AI decisions
/// - Scripted/replayed decisions
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Decide what `ctx.actor` does this turn.
    async fn decide(&self, ctx: &TurnContext<'_>) -> Result<Decision>;
}

/// Greedy policy: the first usable skill, aimed at the weakest target.
///
/// Offensive single-target skills go to the living opponent with the lowest
/// hp. Heals are only picked while an ally is hurt and go to the ally with
/// the lowest hp. When no skill qualifies the first skill with any legal
/// target is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoProvider;

impl AutoProvider {
    fn choose(ctx: &TurnContext<'_>) -> Option<Decision> {
        let me = ctx.combatant()?;
        let pick = |strict: bool| {
            me.skills.iter().enumerate().find_map(|(index, skill)| {
                target_for(ctx.roster, me, skill, strict).map(|target| Decision::new(index, target))
            })
        };
        pick(true).or_else(|| pick(false))
    }
}

#[async_trait]
impl ActionProvider for AutoProvider {
    async fn decide(&self, ctx: &TurnContext<'_>) -> Result<Decision> {
        Self::choose(ctx).ok_or_else(|| RuntimeError::Provider {
            team: ctx.team,
            actor: ctx.actor,
            message: "no skill has a legal target".to_string(),
        })
    }
}

/// Returns `None` when the skill should not be used, `Some(target)` otherwise.
/// `strict` skips heals while nobody is hurt.
fn target_for(roster: &Roster, me: &Combatant, skill: &Skill, strict: bool) -> Option<Option<ActorId>> {
    let heal_only = skill.heals() && !skill.is_offensive();
    let hurt = |c: &&Combatant| !strict || !heal_only || c.hp < c.max_hp;

    match skill.target {
        Targeting::SelfOnly => hurt(&me).then_some(None),
        Targeting::SingleEnemy => weakest(roster.living(me.team.opponent())).map(Some),
        Targeting::SingleAlly => weakest(roster.living(me.team).filter(hurt)).map(Some),
        Targeting::AllEnemies => roster.has_living(me.team.opponent()).then_some(None),
        Targeting::AllAllies => roster.living(me.team).any(|c| hurt(&c)).then_some(None),
    }
}

fn weakest<'a>(candidates: impl Iterator<Item = &'a Combatant>) -> Option<ActorId> {
    candidates.min_by_key(|c| c.hp).map(|c| c.id)
}

/// Replays a fixed list of decisions, one per call.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    decisions: Mutex<VecDeque<Decision>>,
}

impl ScriptedProvider {
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            decisions: Mutex::new(decisions.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.decisions.lock().await.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn decide(&self, ctx: &TurnContext<'_>) -> Result<Decision> {
        self.decisions
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| RuntimeError::Provider {
                team: ctx.team,
                actor: ctx.actor,
                message: "script exhausted".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::SkillEffect;

    fn roster() -> Roster {
        let strike =
            Skill::new("Strike", Targeting::SingleEnemy).with_effect(SkillEffect::Damage { power: 100 });
        let mend = Skill::new("Mend", Targeting::SingleAlly).with_effect(SkillEffect::Heal { power: 100 });

        Roster::from_combatants([
            Combatant::new(ActorId(1), Team::Ally, "Knight", 100, 30, 200.0).with_skill(strike.clone()),
            Combatant::new(ActorId(2), Team::Ally, "Cleric", 100, 20, 150.0)
                .with_skill(mend)
                .with_skill(strike.clone()),
            Combatant::new(ActorId(10), Team::Enemy, "Wolf", 80, 20, 180.0)
                .with_skill(strike.clone())
                .with_hp(60),
            Combatant::new(ActorId(11), Team::Enemy, "Slime", 80, 10, 120.0)
                .with_skill(strike)
                .with_hp(30),
        ])
        .unwrap()
    }

    fn context(roster: &Roster, actor: ActorId, team: Team) -> TurnContext<'_> {
        TurnContext {
            actor,
            team,
            round: Round(1),
            roster,
            turn_order: &[],
        }
    }

    #[tokio::test]
    async fn auto_targets_weakest_opponent() {
        let roster = roster();
        let decision = AutoProvider
            .decide(&context(&roster, ActorId(1), Team::Ally))
            .await
            .unwrap();

        assert_eq!(decision, Decision::new(0, Some(ActorId(11))));
    }

    #[tokio::test]
    async fn auto_skips_heal_when_nobody_is_hurt() {
        let roster = roster();
        let decision = AutoProvider
            .decide(&context(&roster, ActorId(2), Team::Ally))
            .await
            .unwrap();

        assert_eq!(decision, Decision::new(1, Some(ActorId(11))));
    }

    #[tokio::test]
    async fn auto_heals_the_weakest_ally() {
        let mut roster = roster();
        roster.get_mut(ActorId(1)).unwrap().hp = 40;
        roster.get_mut(ActorId(2)).unwrap().hp = 70;

        let decision = AutoProvider
            .decide(&context(&roster, ActorId(2), Team::Ally))
            .await
            .unwrap();

        assert_eq!(decision, Decision::new(0, Some(ActorId(1))));
    }

    #[tokio::test]
    async fn auto_fails_without_skills() {
        let roster = Roster::from_combatants([
            Combatant::new(ActorId(1), Team::Ally, "Dummy", 10, 1, 100.0),
            Combatant::new(ActorId(2), Team::Enemy, "Dummy", 10, 1, 100.0),
        ])
        .unwrap();

        let err = AutoProvider
            .decide(&context(&roster, ActorId(1), Team::Ally))
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::Provider { actor: ActorId(1), .. }));
    }

    #[tokio::test]
    async fn scripted_replays_in_order() {
        let roster = roster();
        let provider = ScriptedProvider::new([
            Decision::new(0, Some(ActorId(10))),
            Decision::new(0, Some(ActorId(11))),
        ]);
        let ctx = context(&roster, ActorId(1), Team::Ally);

        assert_eq!(provider.decide(&ctx).await.unwrap().target, Some(ActorId(10)));
        assert_eq!(provider.decide(&ctx).await.unwrap().target, Some(ActorId(11)));
        assert_eq!(provider.remaining().await, 0);
        assert!(provider.decide(&ctx).await.is_err());
    }
}
