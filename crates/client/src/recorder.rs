//! Consumes battle events: logs them and appends them as JSON lines.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use runtime::{CombatEvent, Event, EventBus, RoundEvent, Topic, TurnEvent};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

pub struct EventRecorder {
    rounds: broadcast::Receiver<Event>,
    turns: broadcast::Receiver<Event>,
    combat: broadcast::Receiver<Event>,
    out: BufWriter<File>,
}

impl EventRecorder {
    /// Subscribes to every topic of `bus` and creates the JSON lines file.
    pub fn new(bus: &EventBus, path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        Ok(Self {
            rounds: bus.subscribe(Topic::Round),
            turns: bus.subscribe(Topic::Turn),
            combat: bus.subscribe(Topic::Combat),
            out: BufWriter::new(file),
        })
    }

    /// Records events until every publisher is gone. Returns the number of
    /// events written.
    pub async fn run(mut self) -> Result<usize> {
        let mut open = [true; 3];
        let mut written = 0;

        while open.iter().any(|o| *o) {
            let (slot, received) = tokio::select! {
                r = self.rounds.recv(), if open[0] => (0, r),
                r = self.turns.recv(), if open[1] => (1, r),
                r = self.combat.recv(), if open[2] => (2, r),
            };
            match received {
                Ok(event) => {
                    log_event(&event);
                    serde_json::to_writer(&mut self.out, &event)?;
                    self.out.write_all(b"\n")?;
                    written += 1;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event recorder lagged behind");
                }
                Err(RecvError::Closed) => open[slot] = false,
            }
        }

        self.out.flush()?;
        Ok(written)
    }
}

fn log_event(event: &Event) {
    match event {
        Event::Round(RoundEvent::RoundStarted { round, actors }) => {
            info!("Round {round} started with {actors} pending turns");
        }
        Event::Round(RoundEvent::BattleEnded { round, outcome, .. }) => match outcome {
            Some(outcome) => info!("Battle ended in round {round}: {outcome}"),
            None => info!("Battle ended in round {round} without a winner"),
        },
        Event::Turn(TurnEvent::TurnStarted { label, .. }) => debug!("{label} acts"),
        Event::Turn(TurnEvent::TurnOrderChanged { slots, .. }) => {
            let order: Vec<String> = slots
                .iter()
                .map(|s| format!("{}@{}", s.label, s.display_offset))
                .collect();
            debug!("Turn order: {}", order.join(" "));
        }
        Event::Combat(CombatEvent::SkillResolved { outcome, .. }) => {
            info!(
                "{} used {} (damage {}, heal {})",
                outcome.caster,
                outcome.skill,
                outcome.total_damage(),
                outcome.total_heal()
            );
        }
        Event::Combat(CombatEvent::ActorDefeated { label, .. }) => info!("{label} is defeated"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{ActorId, BattleOutcome, Round};

    #[tokio::test]
    async fn writes_one_json_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let bus = EventBus::new();
        let recorder = EventRecorder::new(&bus, &path).unwrap();

        bus.publish(RoundEvent::RoundStarted {
            round: Round(1),
            actors: 2,
        });
        bus.publish(TurnEvent::TurnStarted {
            round: Round(1),
            actor: ActorId(1),
            label: "A1".to_string(),
        });
        bus.publish(RoundEvent::BattleEnded {
            round: Round(1),
            outcome: Some(BattleOutcome::Victory),
            digest: "00".to_string(),
        });
        drop(bus);

        let written = recorder.run().await.unwrap();
        assert_eq!(written, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        let events: Vec<Event> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(events.len(), 3);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, Event::Turn(TurnEvent::TurnStarted { actor: ActorId(1), .. })))
        );
    }
}
