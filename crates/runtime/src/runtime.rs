//! Battle orchestrator.
//!
//! [`Battle`] owns the roster, the scheduler and one action provider per
//! side. Each [`Battle::step`] resolves exactly one turn; [`Battle::run`]
//! steps until one side is defeated or the round cap is reached.

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use battle_core::{
    ActorId, BattleConfig, BattleError, BattleOutcome, Roster, Round, Scheduler, SkillOutcome,
    Team, resolve_skill,
};

use crate::api::{ActionProvider, Result, RuntimeError, TurnContext};
use crate::events::{CombatEvent, Event, EventBus, RoundEvent, Topic, TurnEvent};
use crate::presentation::{label, turn_order_slots};

/// What happened during one [`Battle::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub round: Round,
    pub actor: ActorId,
    /// `None` when the actor has no skills and passed.
    pub skill: Option<SkillOutcome>,
    /// Whether the actor got another entry in the current round.
    pub requeued: bool,
    /// Set once the turn decided the battle.
    pub outcome: Option<BattleOutcome>,
}

/// Final state of a battle driven by [`Battle::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleSummary {
    /// `None` when the round cap ran out first.
    pub outcome: Option<BattleOutcome>,
    pub rounds: Round,
    pub turns: u64,
    pub digest: [u8; 32],
}

impl BattleSummary {
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// A single battle instance.
pub struct Battle {
    config: BattleConfig,
    roster: Roster,
    scheduler: Scheduler,
    bus: EventBus,
    ally_provider: Box<dyn ActionProvider>,
    enemy_provider: Box<dyn ActionProvider>,
    turns: u64,
}

impl Battle {
    /// Create a new battle builder
    pub fn builder() -> BattleBuilder {
        BattleBuilder::new()
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn round(&self) -> Round {
        self.scheduler.round()
    }

    /// Turns resolved so far.
    pub fn turns(&self) -> u64 {
        self.turns
    }

    /// Cloneable handle to the event bus.
    pub fn events(&self) -> EventBus {
        self.bus.clone()
    }

    /// Subscribe to battle events on `topic`.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.roster.outcome()
    }

    /// Resolves the next turn.
    ///
    /// Starts a new round first when the current one is complete. Provider
    /// and resolution errors are returned after the acting entry has been
    /// consumed and requeued, so the actor loses only that turn.
    pub async fn step(&mut self) -> Result<TurnReport> {
        if let Some(outcome) = self.roster.outcome() {
            return Err(RuntimeError::BattleOver(outcome));
        }
        if self.scheduler.is_round_complete() {
            self.begin_round()?;
        }

        let entry = self.scheduler.advance();
        let round = self.scheduler.round();
        let actor = entry.actor;
        let actor_label = label(entry.team, actor);
        self.turns += 1;

        info!(round = round.0, actor = %actor_label, "turn started");
        self.bus.publish(TurnEvent::TurnStarted {
            round,
            actor,
            label: actor_label.clone(),
        });

        let acted = self.act(entry.actor, entry.team, round, &actor_label).await;

        // A failed turn still hands the actor its next entry.
        let requeued = self.scheduler.requeue_if_eligible(actor)?;
        self.bus.publish(TurnEvent::TurnOrderChanged {
            round,
            slots: turn_order_slots(&self.scheduler),
        });
        let skill = acted?;

        let outcome = self.roster.outcome();
        if let Some(outcome) = outcome {
            info!(round = round.0, %outcome, "battle decided");
            self.publish_end(Some(outcome));
        }

        Ok(TurnReport {
            round,
            actor,
            skill,
            requeued,
            outcome,
        })
    }

    /// Steps until one side is defeated or the round cap is reached.
    pub async fn run(&mut self) -> Result<BattleSummary> {
        loop {
            match self.step().await {
                Ok(report) if report.outcome.is_some() => return Ok(self.summary()),
                Ok(_) => {}
                Err(RuntimeError::RoundCapReached { max_rounds }) => {
                    info!(max_rounds, "round cap reached without a winner");
                    self.publish_end(None);
                    return Ok(self.summary());
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn summary(&self) -> BattleSummary {
        BattleSummary {
            outcome: self.roster.outcome(),
            rounds: self.scheduler.round(),
            turns: self.turns,
            digest: self.scheduler.digest(),
        }
    }

    /// Asks the side's provider for a decision and resolves it.
    async fn act(
        &mut self,
        actor: ActorId,
        team: Team,
        round: Round,
        actor_label: &str,
    ) -> Result<Option<SkillOutcome>> {
        let combatant = self
            .roster
            .get(actor)
            .ok_or(RuntimeError::UnknownActor(actor))?;
        if combatant.skills.is_empty() {
            debug!(actor = %actor_label, "no skills, passing");
            return Ok(None);
        }

        let turn_order = self.scheduler.turn_order();
        let ctx = TurnContext {
            actor,
            team,
            round,
            roster: &self.roster,
            turn_order: &turn_order,
        };
        let provider = match team {
            Team::Ally => &self.ally_provider,
            Team::Enemy => &self.enemy_provider,
        };
        let decision = provider.decide(&ctx).await?;
        debug!(
            actor = %actor_label,
            skill_index = decision.skill_index,
            target = ?decision.target,
            "decision received"
        );

        let outcome = resolve_skill(
            &mut self.roster,
            &mut self.scheduler,
            actor,
            decision.skill_index,
            decision.target,
        )
        .inspect_err(|e| {
            warn!(
                actor = %actor_label,
                code = e.error_code(),
                severity = e.severity().as_str(),
                "skill resolution failed: {e}"
            )
        })?;
        self.publish_resolution(round, &outcome);
        Ok(Some(outcome))
    }

    fn begin_round(&mut self) -> Result<()> {
        if self.scheduler.round().0 >= self.config.max_rounds {
            return Err(RuntimeError::RoundCapReached {
                max_rounds: self.config.max_rounds,
            });
        }

        let round = self.scheduler.start_round();
        let actors = self.scheduler.len();
        info!(round = round.0, actors, "round started");
        self.bus.publish(RoundEvent::RoundStarted { round, actors });

        if self.scheduler.is_round_complete() {
            warn!(round = round.0, "no living actor fits into the round budget");
            return Err(RuntimeError::RoundStalled { round });
        }
        self.bus.publish(TurnEvent::TurnOrderChanged {
            round,
            slots: turn_order_slots(&self.scheduler),
        });
        Ok(())
    }

    fn publish_resolution(&self, round: Round, outcome: &SkillOutcome) {
        debug!(
            caster = %outcome.caster,
            skill = %outcome.skill,
            damage = outcome.total_damage(),
            heal = outcome.total_heal(),
            "skill resolved"
        );
        self.bus.publish(CombatEvent::SkillResolved {
            round,
            outcome: outcome.clone(),
        });
        for actor in outcome.defeated() {
            let team = self
                .roster
                .get(actor)
                .map_or(Team::Enemy, |combatant| combatant.team);
            let actor_label = label(team, actor);
            info!(round = round.0, actor = %actor_label, "combatant defeated");
            self.bus.publish(CombatEvent::ActorDefeated {
                round,
                actor,
                label: actor_label,
            });
        }
    }

    fn publish_end(&self, outcome: Option<BattleOutcome>) {
        self.bus.publish(RoundEvent::BattleEnded {
            round: self.scheduler.round(),
            outcome,
            digest: hex::encode(self.scheduler.digest()),
        });
    }
}

/// Builder for [`Battle`].
pub struct BattleBuilder {
    config: BattleConfig,
    roster: Roster,
    ally_provider: Option<Box<dyn ActionProvider>>,
    enemy_provider: Option<Box<dyn ActionProvider>>,
    event_capacity: usize,
}

impl BattleBuilder {
    fn new() -> Self {
        Self {
            config: BattleConfig::default(),
            roster: Roster::new(),
            ally_provider: None,
            enemy_provider: None,
            event_capacity: 256,
        }
    }

    /// Override battle configuration
    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// Combatants taking part, in seeding order.
    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    pub fn ally_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.ally_provider = Some(Box::new(provider));
        self
    }

    pub fn enemy_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.enemy_provider = Some(Box::new(provider));
        self
    }

    /// Buffered events per topic before slow subscribers start lagging.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Validates the configuration and enrolls every living combatant.
    pub fn build(self) -> Result<Battle> {
        let ally_provider = self
            .ally_provider
            .ok_or(RuntimeError::ProviderNotSet { team: Team::Ally })?;
        let enemy_provider = self
            .enemy_provider
            .ok_or(RuntimeError::ProviderNotSet { team: Team::Enemy })?;

        let mut scheduler = Scheduler::new(&self.config)?;
        self.roster.enroll_all(&mut scheduler)?;
        debug!(
            combatants = self.roster.len(),
            enrolled = scheduler.actors().len(),
            "battle built"
        );

        Ok(Battle {
            config: self.config,
            roster: self.roster,
            scheduler,
            bus: EventBus::with_capacity(self.event_capacity),
            ally_provider,
            enemy_provider,
            turns: 0,
        })
    }
}
