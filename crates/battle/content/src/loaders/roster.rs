//! Roster loader.
//!
//! Loads combatants (allies and enemies) from RON files.

use std::path::Path;

use battle_core::{ActorId, Combatant, Roster, Skill, Team};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// On-disk description of one combatant.
///
/// `hp` defaults to `max_hp` when omitted.
#[derive(Clone, Debug, Deserialize)]
pub struct CombatantSpec {
    pub id: u32,
    pub team: Team,
    pub name: String,
    pub max_hp: u32,
    #[serde(default)]
    pub hp: Option<u32>,
    pub attack: u32,
    pub speed: f64,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl CombatantSpec {
    fn into_combatant(self) -> LoadResult<Combatant> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            anyhow::bail!(
                "Combatant '{}' has invalid speed {}",
                self.name,
                self.speed
            );
        }
        if self.max_hp == 0 {
            anyhow::bail!("Combatant '{}' must have max_hp above 0", self.name);
        }
        for skill in &self.skills {
            skill
                .validate()
                .map_err(|e| anyhow::anyhow!("Combatant '{}': {}", self.name, e))?;
        }

        let mut combatant = Combatant::new(
            ActorId(self.id),
            self.team,
            self.name,
            self.max_hp,
            self.attack,
            self.speed,
        );
        if let Some(hp) = self.hp {
            combatant = combatant.with_hp(hp);
        }
        combatant.skills = self.skills;
        Ok(combatant)
    }
}

/// Loader for rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    ///
    /// RON format: `Vec<CombatantSpec>`, in roster order.
    pub fn load(path: &Path) -> LoadResult<Roster> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a roster from RON text.
    pub fn parse(content: &str) -> LoadResult<Roster> {
        let specs: Vec<CombatantSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        let combatants = specs
            .into_iter()
            .map(CombatantSpec::into_combatant)
            .collect::<LoadResult<Vec<_>>>()?;

        let roster = Roster::from_combatants(combatants)
            .map_err(|e| anyhow::anyhow!("Invalid roster: {}", e))?;
        if roster.has_living(Team::Ally) && roster.has_living(Team::Enemy) {
            Ok(roster)
        } else {
            anyhow::bail!("Roster needs at least one living combatant on each team")
        }
    }
}
