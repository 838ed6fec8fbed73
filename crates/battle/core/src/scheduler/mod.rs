//! Action-value turn scheduler.
//!
//! Each round every living actor receives the same action value budget. An
//! actor's next action lies `distance / speed` time units ahead; the queue
//! always advances to the closest pending action and charges the elapsed time
//! against every budget. Fast actors therefore get several turns in a round,
//! slow ones fewer, and the round ends once no pending action fits into the
//! remaining budget.
//!
//! Every public mutation leaves the queue purged: dead actors and
//! unreachable entries are removed before the call returns, so
//! [`Scheduler::advance`] can always trust the head of the queue.

mod entry;
mod error;

pub use entry::{ActorInfo, QueueEntry, SpeedChange};
pub use error::SchedulerError;

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use crate::config::BattleConfig;
use crate::state::{ActorId, Round, Team};

/// Pending actions for one battle instance.
#[derive(Clone, Debug)]
pub struct Scheduler {
    round_action_value: f64,
    distance: f64,
    actors: Vec<ActorInfo>,
    queue: BinaryHeap<Reverse<QueueEntry>>,
    round: Round,
    elapsed: f64,
    next_seq: u64,
}

impl Scheduler {
    /// Lowest speed reachable through [`Scheduler::speed_change`].
    pub const MIN_SPEED: f64 = 1.0;

    pub fn new(config: &BattleConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self {
            round_action_value: config.round_action_value,
            distance: config.distance,
            actors: Vec::new(),
            queue: BinaryHeap::new(),
            round: Round::NONE,
            elapsed: 0.0,
            next_seq: 0,
        })
    }

    // ===== queries =====

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn round_action_value(&self) -> f64 {
        self.round_action_value
    }

    /// Time advanced since the current round started.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorInfo> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// Enrolled actors in enrolment order.
    pub fn actors(&self) -> &[ActorInfo] {
        &self.actors
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Next entry to act, if any.
    pub fn peek(&self) -> Option<&QueueEntry> {
        self.queue.peek().map(|Reverse(entry)| entry)
    }

    /// Pending entries in execution order.
    pub fn turn_order(&self) -> Vec<QueueEntry> {
        let mut entries: Vec<QueueEntry> =
            self.queue.iter().map(|Reverse(entry)| *entry).collect();
        entries.sort();
        entries
    }

    /// Pending entries belonging to `id`, in execution order.
    pub fn entries_for(&self, id: ActorId) -> Vec<QueueEntry> {
        self.turn_order()
            .into_iter()
            .filter(|entry| entry.actor == id)
            .collect()
    }

    /// True when no reachable entry is left and a new round must start.
    pub fn is_round_complete(&self) -> bool {
        self.queue.is_empty()
    }

    // ===== roster management =====

    /// Registers an actor. Actors joining mid-round get the budget that is
    /// left in the current round.
    pub fn enroll(&mut self, id: ActorId, team: Team, speed: f64) -> Result<(), SchedulerError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(SchedulerError::InvalidSpeed { actor: id, speed });
        }
        if self.actor(id).is_some() {
            return Err(SchedulerError::DuplicateActor(id));
        }
        self.actors.push(ActorInfo {
            id,
            team,
            speed,
            action_value: self.remaining_budget(),
            distance: self.distance,
        });
        Ok(())
    }

    /// Marks an actor as dead and drops its pending entries.
    pub fn kill(&mut self, id: ActorId) -> Result<(), SchedulerError> {
        let actor = self.actor_mut(id)?;
        actor.speed = 0.0;
        self.filter_and_purge();
        Ok(())
    }

    // ===== round lifecycle =====

    /// Starts a new round: resets every living budget and seeds one entry per
    /// living actor at `distance / speed`.
    ///
    /// Actors too slow to act within a single round budget are purged right
    /// away and get no turn this round.
    pub fn start_round(&mut self) -> Round {
        self.round = self.round.next();
        self.elapsed = 0.0;
        self.queue.clear();

        let budget = self.round_action_value;
        let seeds: Vec<(ActorId, Team, f64)> = self
            .actors
            .iter_mut()
            .filter(|actor| actor.is_alive())
            .map(|actor| {
                actor.action_value = budget;
                (actor.id, actor.team, actor.action_delay())
            })
            .collect();

        for (id, team, offset) in seeds {
            self.push(id, team, offset);
        }
        self.filter_and_purge();
        self.round
    }

    /// Fast-forwards to the closest pending action and removes it.
    ///
    /// # Panics
    ///
    /// Panics when the queue is empty. Callers check
    /// [`Scheduler::is_round_complete`] first.
    pub fn advance(&mut self) -> QueueEntry {
        match self.try_advance() {
            Some(entry) => entry,
            None => panic!("advance called on an empty action queue; start a new round first"),
        }
    }

    /// Like [`Scheduler::advance`], but returns `None` on an empty queue.
    pub fn try_advance(&mut self) -> Option<QueueEntry> {
        let Reverse(mut entry) = self.queue.pop()?;
        let delta = entry.scheduled_offset;

        self.elapsed += delta;
        // A uniform shift keeps the relative order, so rebuilding from the
        // shifted vector never reorders entries.
        let mut pending = std::mem::take(&mut self.queue).into_vec();
        for Reverse(other) in &mut pending {
            other.scheduled_offset = (other.scheduled_offset - delta).max(0.0);
        }
        self.queue = BinaryHeap::from(pending);

        for actor in &mut self.actors {
            actor.action_value = (actor.action_value - delta).max(0.0);
        }

        entry.scheduled_offset = 0.0;
        Some(entry)
    }

    /// Queues another action for `id` when one more `distance / speed` still
    /// fits into its remaining budget. Returns whether a new entry is pending.
    pub fn requeue_if_eligible(&mut self, id: ActorId) -> Result<bool, SchedulerError> {
        let actor = *self.actor_mut(id)?;
        if !actor.is_alive() {
            return Ok(false);
        }
        let offset = actor.action_delay();
        if offset > actor.action_value {
            return Ok(false);
        }
        Ok(self.insert(actor.id, actor.team, offset))
    }

    /// Inserts an immediate extra action for a living actor. Returns whether a
    /// new entry is pending; an actor already holding an entry at offset zero
    /// gains nothing.
    pub fn grant_extra_turn(&mut self, id: ActorId) -> Result<bool, SchedulerError> {
        let actor = *self.actor_mut(id)?;
        if !actor.is_alive() {
            return Ok(false);
        }
        Ok(self.insert(actor.id, actor.team, 0.0))
    }

    // ===== skill effects =====

    /// Changes an actor's speed by `delta` (floored at [`Self::MIN_SPEED`]) and
    /// rescales its pending offsets by `old / new`.
    ///
    /// Dead actors are left untouched.
    pub fn speed_change(&mut self, id: ActorId, delta: f64) -> Result<SpeedChange, SchedulerError> {
        if !delta.is_finite() {
            return Err(SchedulerError::InvalidSpeedDelta { actor: id, delta });
        }
        let actor = self.actor_mut(id)?;
        let from = actor.speed;
        if !actor.is_alive() {
            return Ok(SpeedChange { from, to: from });
        }
        let to = (from + delta).max(Self::MIN_SPEED);
        actor.speed = to;

        let mut pending = std::mem::take(&mut self.queue).into_vec();
        for Reverse(entry) in pending.iter_mut().filter(|Reverse(e)| e.actor == id) {
            entry.scheduled_offset = entry.scheduled_offset * from / to;
        }
        self.queue = BinaryHeap::from(pending);

        self.filter_and_purge();
        Ok(SpeedChange { from, to })
    }

    /// Moves the actor's earliest pending entry forward by
    /// `distance * fraction / speed`, never below zero. Negative fractions
    /// delay the entry instead.
    ///
    /// Returns the adjusted offset, or `None` when the actor has no pending
    /// entry (or the entry was purged as unreachable after a delay).
    pub fn advance_action(
        &mut self,
        id: ActorId,
        fraction: f64,
    ) -> Result<Option<f64>, SchedulerError> {
        if !fraction.is_finite() {
            return Err(SchedulerError::InvalidFraction { actor: id, fraction });
        }
        let actor = *self.actor_mut(id)?;
        if !actor.is_alive() {
            return Ok(None);
        }
        let reduction = actor.distance * fraction / actor.speed;

        let mut pending = std::mem::take(&mut self.queue).into_vec();
        let target = pending
            .iter_mut()
            .filter(|Reverse(e)| e.actor == id)
            .min_by(|Reverse(a), Reverse(b)| a.cmp(b));
        let adjusted = target.map(|Reverse(entry)| {
            entry.scheduled_offset = (entry.scheduled_offset - reduction).max(0.0);
            entry.seq()
        });
        self.queue = BinaryHeap::from(pending);
        self.filter_and_purge();

        Ok(adjusted.and_then(|seq| {
            self.queue
                .iter()
                .find(|Reverse(e)| e.seq() == seq)
                .map(|Reverse(e)| e.scheduled_offset)
        }))
    }

    /// Drops entries of dead actors and entries beyond their actor's budget,
    /// removes duplicate `(actor, offset)` pairs (earliest insertion wins) and
    /// restores ascending order.
    pub fn filter_and_purge(&mut self) {
        let mut entries: Vec<QueueEntry> = std::mem::take(&mut self.queue)
            .into_vec()
            .into_iter()
            .map(|Reverse(entry)| entry)
            .collect();
        entries.sort();

        let mut seen = BTreeSet::new();
        entries.retain(|entry| {
            let reachable = self
                .actor(entry.actor)
                .is_some_and(|a| a.is_alive() && entry.scheduled_offset <= a.action_value);
            reachable && seen.insert(entry.identity())
        });

        self.queue = entries.into_iter().map(Reverse).collect();
    }

    /// SHA-256 over the round, the actor records and the ordered queue.
    ///
    /// Two schedulers fed the same call sequence produce the same digest.
    pub fn digest(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(self.round.0.to_le_bytes());
        hasher.update(self.elapsed.to_bits().to_le_bytes());
        for actor in &self.actors {
            hasher.update(actor.id.0.to_le_bytes());
            hasher.update([actor.team.as_byte()]);
            hasher.update(actor.speed.to_bits().to_le_bytes());
            hasher.update(actor.action_value.to_bits().to_le_bytes());
        }
        for entry in self.turn_order() {
            hasher.update(entry.actor.0.to_le_bytes());
            hasher.update(entry.scheduled_offset.to_bits().to_le_bytes());
            hasher.update(entry.seq().to_le_bytes());
        }
        hasher.finalize().into()
    }

    // ===== internals =====

    fn actor_mut(&mut self, id: ActorId) -> Result<&mut ActorInfo, SchedulerError> {
        self.actors
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(SchedulerError::UnknownActor(id))
    }

    fn remaining_budget(&self) -> f64 {
        (self.round_action_value - self.elapsed).max(0.0)
    }

    fn push(&mut self, actor: ActorId, team: Team, offset: f64) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue
            .push(Reverse(QueueEntry::new(actor, team, offset, seq)));
        seq
    }

    /// Pushes and purges; true when the new entry survived deduplication.
    fn insert(&mut self, actor: ActorId, team: Team, offset: f64) -> bool {
        let seq = self.push(actor, team, offset);
        self.filter_and_purge();
        self.queue.iter().any(|Reverse(e)| e.seq() == seq)
    }
}
