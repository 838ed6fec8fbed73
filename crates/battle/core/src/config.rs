use crate::scheduler::SchedulerError;

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Action value every living actor receives at the start of a round.
    pub round_action_value: f64,

    /// Distance an actor covers before acting; `distance / speed` is the
    /// number of time units until its next action.
    pub distance: f64,

    /// Upper bound on rounds the runtime will play before giving up.
    pub max_rounds: u32,
}

impl BattleConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ROUND_ACTION_VALUE: f64 = 100.0;
    pub const DEFAULT_DISTANCE: f64 = 10_000.0;
    pub const DEFAULT_MAX_ROUNDS: u32 = 50;

    pub fn new() -> Self {
        Self {
            round_action_value: Self::DEFAULT_ROUND_ACTION_VALUE,
            distance: Self::DEFAULT_DISTANCE,
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
        }
    }

    #[must_use]
    pub fn with_round_action_value(mut self, round_action_value: f64) -> Self {
        self.round_action_value = round_action_value;
        self
    }

    #[must_use]
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Rejects values the scheduler cannot represent.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if !(self.distance.is_finite() && self.distance > 0.0) {
            return Err(SchedulerError::InvalidDistance(self.distance));
        }
        if !(self.round_action_value.is_finite() && self.round_action_value > 0.0) {
            return Err(SchedulerError::InvalidActionValue(
                self.round_action_value,
            ));
        }
        if self.max_rounds == 0 {
            return Err(SchedulerError::InvalidRoundCap);
        }
        Ok(())
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BattleConfig::default();
        assert_eq!(config.round_action_value, 100.0);
        assert_eq!(config.distance, 10_000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_negative_distance() {
        let config = BattleConfig::new().with_distance(-1.0);
        assert_eq!(
            config.validate(),
            Err(SchedulerError::InvalidDistance(-1.0))
        );
    }

    #[test]
    fn rejects_non_finite_action_value() {
        let config = BattleConfig::new().with_round_action_value(f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(SchedulerError::InvalidActionValue(_))
        ));
    }

    #[test]
    fn rejects_zero_round_cap() {
        let config = BattleConfig::new().with_max_rounds(0);
        assert_eq!(config.validate(), Err(SchedulerError::InvalidRoundCap));
    }
}
