//! Display mapping for the turn order.
//!
//! The scheduler only knows ids and offsets. Labels and rounded offsets are
//! produced here, for the UI and for logs.
use battle_core::{ActorId, QueueEntry, Scheduler, Team};
use serde::{Deserialize, Serialize};

/// Short label for a combatant, e.g. `A1` or `E12`.
pub fn label(team: Team, id: ActorId) -> String {
    let prefix = match team {
        Team::Ally => 'A',
        Team::Enemy => 'E',
    };
    format!("{prefix}{}", id.0)
}

/// One row of the displayed turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrderSlot {
    pub label: String,
    pub actor: ActorId,
    pub team: Team,
    /// Scheduled offset rounded to the nearest whole time unit, saturating
    /// at `u32::MAX`. Display only; ordering always uses the exact offset.
    pub display_offset: u32,
}

impl TurnOrderSlot {
    pub fn from_entry(entry: &QueueEntry) -> Self {
        Self {
            label: label(entry.team, entry.actor),
            actor: entry.actor,
            team: entry.team,
            display_offset: display_offset(entry.scheduled_offset),
        }
    }
}

/// Rounds an offset for display, clamped to the `u32` range.
pub fn display_offset(offset: f64) -> u32 {
    let rounded = offset.round();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Current turn order of `scheduler`, ready for display.
pub fn turn_order_slots(scheduler: &Scheduler) -> Vec<TurnOrderSlot> {
    scheduler
        .turn_order()
        .iter()
        .map(TurnOrderSlot::from_entry)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::BattleConfig;

    #[test]
    fn labels_use_team_prefix() {
        assert_eq!(label(Team::Ally, ActorId(1)), "A1");
        assert_eq!(label(Team::Enemy, ActorId(12)), "E12");
    }

    #[test]
    fn display_offset_rounds_and_saturates() {
        assert_eq!(display_offset(43.48), 43);
        assert_eq!(display_offset(46.5), 47);
        assert_eq!(display_offset(0.0), 0);
        assert_eq!(display_offset(1e12), u32::MAX);
    }

    #[test]
    fn huge_budgets_saturate_the_displayed_offset() {
        let config = BattleConfig::default()
            .with_round_action_value(1e12)
            .with_distance(1e12);
        let mut scheduler = Scheduler::new(&config).unwrap();
        scheduler.enroll(ActorId(1), Team::Ally, 1.0).unwrap();
        scheduler.start_round();

        let slots = turn_order_slots(&scheduler);

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].display_offset, u32::MAX);
    }

    #[test]
    fn slots_follow_turn_order_with_rounded_offsets() {
        let mut scheduler = Scheduler::new(&BattleConfig::default()).unwrap();
        scheduler.enroll(ActorId(1), Team::Ally, 230.0).unwrap();
        scheduler.enroll(ActorId(2), Team::Ally, 190.0).unwrap();
        scheduler.enroll(ActorId(10), Team::Enemy, 215.0).unwrap();
        scheduler.start_round();

        let slots = turn_order_slots(&scheduler);

        let rows: Vec<(&str, u32)> = slots
            .iter()
            .map(|s| (s.label.as_str(), s.display_offset))
            .collect();
        // 10000/230 = 43.48, 10000/215 = 46.51, 10000/190 = 52.63
        assert_eq!(rows, vec![("A1", 43), ("E10", 47), ("A2", 53)]);
    }
}
