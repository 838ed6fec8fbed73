use core::cmp::Ordering;

use crate::state::{ActorId, Team};

/// Scheduling record of one enrolled actor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorInfo {
    pub id: ActorId,
    pub team: Team,
    /// Effective speed. `speed <= 0` marks the actor as permanently
    /// unschedulable.
    pub speed: f64,
    /// Budget left in the current round.
    pub action_value: f64,
    /// Distance covered before each action.
    pub distance: f64,
}

impl ActorInfo {
    pub fn is_alive(&self) -> bool {
        self.speed > 0.0
    }

    /// Time units between two consecutive actions at the current speed.
    pub fn action_delay(&self) -> f64 {
        self.distance / self.speed
    }
}

/// A pending action in the queue.
///
/// Entries order by ascending `scheduled_offset`; equal offsets fall back to
/// insertion order (`seq`).
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueEntry {
    pub actor: ActorId,
    pub team: Team,
    /// Time units until the actor acts, relative to the queue origin.
    pub scheduled_offset: f64,
    seq: u64,
}

impl QueueEntry {
    pub(crate) fn new(actor: ActorId, team: Team, scheduled_offset: f64, seq: u64) -> Self {
        Self {
            actor,
            team,
            scheduled_offset,
            seq,
        }
    }

    /// Insertion sequence number used for tie-breaking.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Dedup key: actor plus the exact offset bits (`-0.0` folded into `0.0`).
    pub(crate) fn identity(&self) -> (ActorId, u64) {
        (self.actor, (self.scheduled_offset + 0.0).to_bits())
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.scheduled_offset
            .total_cmp(&other.scheduled_offset)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Speed before and after a `speed_change`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedChange {
    pub from: f64,
    pub to: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(offset: f64, seq: u64) -> QueueEntry {
        QueueEntry::new(ActorId(1), Team::Ally, offset, seq)
    }

    #[test]
    fn orders_by_offset_then_insertion() {
        let mut entries = vec![entry(5.0, 2), entry(3.0, 3), entry(5.0, 1)];
        entries.sort();
        let seqs: Vec<u64> = entries.iter().map(QueueEntry::seq).collect();
        assert_eq!(seqs, vec![3, 1, 2]);
    }

    #[test]
    fn identity_folds_negative_zero() {
        assert_eq!(entry(-0.0, 1).identity(), entry(0.0, 2).identity());
    }

    #[test]
    fn dead_actor_has_no_speed() {
        let info = ActorInfo {
            id: ActorId(1),
            team: Team::Enemy,
            speed: 0.0,
            action_value: 100.0,
            distance: 10_000.0,
        };
        assert!(!info.is_alive());
    }
}
