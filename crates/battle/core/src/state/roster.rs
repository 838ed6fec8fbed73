//! Ordered set of combatants taking part in a battle.

use crate::error::{BattleError, ErrorSeverity};
use crate::scheduler::{Scheduler, SchedulerError};

use super::{ActorId, Combatant, Team};

/// Result of a finished battle, seen from the allied side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    /// Every enemy is defeated.
    Victory,
    /// Every ally is defeated.
    Defeat,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("combatant {0} is already on the roster")]
    DuplicateCombatant(ActorId),
}

impl BattleError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCombatant(_) => "ROSTER_DUPLICATE_COMBATANT",
        }
    }
}

/// Combatants in roster order. Roster order is the seeding order at round
/// start and therefore the tie-break order for equal speeds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    combatants: Vec<Combatant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster, rejecting duplicate ids.
    pub fn from_combatants(
        combatants: impl IntoIterator<Item = Combatant>,
    ) -> Result<Self, RosterError> {
        let mut roster = Self::new();
        for combatant in combatants {
            roster.push(combatant)?;
        }
        Ok(roster)
    }

    pub fn push(&mut self, combatant: Combatant) -> Result<(), RosterError> {
        if self.get(combatant.id).is_some() {
            return Err(RosterError::DuplicateCombatant(combatant.id));
        }
        self.combatants.push(combatant);
        Ok(())
    }

    pub fn get(&self, id: ActorId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    /// Living members of `team`, in roster order.
    pub fn living(&self, team: Team) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .iter()
            .filter(move |c| c.team == team && c.is_alive())
    }

    pub fn has_living(&self, team: Team) -> bool {
        self.living(team).next().is_some()
    }

    /// Returns the outcome once one side has no living members.
    ///
    /// Allies are checked first, so a roster with nobody alive is a defeat.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        if !self.has_living(Team::Ally) {
            Some(BattleOutcome::Defeat)
        } else if !self.has_living(Team::Enemy) {
            Some(BattleOutcome::Victory)
        } else {
            None
        }
    }

    /// Enrolls every living combatant in `scheduler`, in roster order.
    pub fn enroll_all(&self, scheduler: &mut Scheduler) -> Result<(), SchedulerError> {
        for combatant in self.combatants.iter().filter(|c| c.is_alive()) {
            scheduler.enroll(combatant.id, combatant.team, combatant.speed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combatant(id: u32, team: Team, hp: u32) -> Combatant {
        Combatant::new(ActorId(id), team, format!("c{id}"), 100, 10, 100.0).with_hp(hp)
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Roster::from_combatants([
            combatant(1, Team::Ally, 100),
            combatant(1, Team::Enemy, 100),
        ]);
        assert_eq!(result, Err(RosterError::DuplicateCombatant(ActorId(1))));
    }

    #[test]
    fn outcome_tracks_living_sides() {
        let mut roster = Roster::from_combatants([
            combatant(1, Team::Ally, 100),
            combatant(2, Team::Enemy, 100),
        ])
        .unwrap();
        assert_eq!(roster.outcome(), None);

        roster.get_mut(ActorId(2)).unwrap().hp = 0;
        assert_eq!(roster.outcome(), Some(BattleOutcome::Victory));

        roster.get_mut(ActorId(1)).unwrap().hp = 0;
        assert_eq!(roster.outcome(), Some(BattleOutcome::Defeat));
    }

    #[test]
    fn enroll_all_skips_defeated() {
        let roster = Roster::from_combatants([
            combatant(1, Team::Ally, 100),
            combatant(2, Team::Enemy, 0),
        ])
        .unwrap();
        let mut scheduler = Scheduler::new(&crate::BattleConfig::default()).unwrap();

        roster.enroll_all(&mut scheduler).unwrap();

        assert!(scheduler.actor(ActorId(1)).is_some());
        assert!(scheduler.actor(ActorId(2)).is_none());
    }
}
