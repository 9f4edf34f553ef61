//! Search configuration.

use crate::board::PlayerId;
use crate::error::MctsError;

/// Exploration constant used when none is given; the textbook UCB1 value.
pub const DEFAULT_EXPLORATION_CONSTANT: f64 = std::f64::consts::SQRT_2;

/// Number of iterations per decision used when none is given.
pub const DEFAULT_BUDGET: u32 = 1000;

/// Configuration for one Monte Carlo tree search agent.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Exploration constant `c` in the UCT formula.
    /// Higher values favor less visited moves, lower values favor moves with a
    /// better average result. Must be finite and strictly positive.
    pub exploration_constant: f64,

    /// Number of select/expand/simulate/backpropagate iterations per decision.
    /// Must be at least 1.
    pub budget: u32,

    /// The side this agent decides for. Informational only: the search itself
    /// attributes results through each state's player to move.
    pub player: PlayerId,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: DEFAULT_EXPLORATION_CONSTANT,
            budget: DEFAULT_BUDGET,
            player: PlayerId(0),
        }
    }
}

impl MctsConfig {
    /// Create a config from its three parameters, in `make_agent` argument order.
    pub fn new(exploration_constant: f64, player: PlayerId, budget: u32) -> Self {
        Self {
            exploration_constant,
            budget,
            player,
        }
    }

    /// Create a small config for fast tests.
    pub fn for_testing() -> Self {
        Self {
            budget: 100,
            ..Self::default()
        }
    }

    /// Check that the parameters can drive a search.
    pub fn validate(&self) -> Result<(), MctsError> {
        if !self.exploration_constant.is_finite() || self.exploration_constant <= 0.0 {
            return Err(MctsError::InvalidConfig(format!(
                "exploration constant must be finite and positive, got {}",
                self.exploration_constant
            )));
        }

        if self.budget == 0 {
            return Err(MctsError::InvalidConfig(
                "budget must be at least one iteration".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = MctsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.exploration_constant, std::f64::consts::SQRT_2);
        assert_eq!(config.budget, DEFAULT_BUDGET);
    }

    #[test]
    fn testing_preset_keeps_default_exploration() {
        let config = MctsConfig::for_testing();
        assert!(config.validate().is_ok());
        assert_eq!(config.budget, 100);
        assert_eq!(config.exploration_constant, DEFAULT_EXPLORATION_CONSTANT);
    }

    #[test]
    fn rejects_zero_budget() {
        let config = MctsConfig::new(1.2, PlayerId(0), 0);
        assert!(matches!(config.validate(), Err(MctsError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_bad_exploration_constants() {
        for c in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = MctsConfig::new(c, PlayerId(1), 10);
            assert!(
                matches!(config.validate(), Err(MctsError::InvalidConfig(_))),
                "accepted exploration constant {c}"
            );
        }
    }
}
