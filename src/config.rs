//! Configuration for the tick engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Grid;

/// Tunable constants of the tick engine.
///
/// Controls grid geometry, perception range, the randomized axis override
/// used to break gridlock, and the jitter applied to exploration targets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    // --- Geometry ---
    /// Side length of the square grid.
    pub grid_side: u32,

    // --- Perception ---
    /// Half-width of the square scan window around each agent.
    pub perception_radius: i32,

    // --- Path step ---
    /// Base probability of overriding the axis priority with a random axis.
    pub detour_base_probability: f64,
    /// Added per agent index step to desynchronize agents.
    pub detour_probability_step: f64,
    /// Agent indices wrap modulo this value when computing the offset.
    pub detour_probability_cycle: usize,

    // --- Exploration ---
    /// Maximum absolute jitter added on each axis to exploration targets.
    pub exploration_jitter: i32,
}

impl EngineConfig {
    /// Grid bounds derived from `grid_side`.
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_side)
    }

    /// Probability that the agent at `agent_index` ignores the usual axis
    /// priority for one step.
    pub fn detour_probability(&self, agent_index: usize) -> f64 {
        let cycle = self.detour_probability_cycle.max(1);
        let p = self.detour_base_probability
            + (agent_index % cycle) as f64 * self.detour_probability_step;
        p.clamp(0.0, 1.0)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_side: 32,
            perception_radius: 5,
            detour_base_probability: 0.2,
            detour_probability_step: 0.05,
            detour_probability_cycle: 5,
            exploration_jitter: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_reference_scenario() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.grid().side(), 32);
        assert_eq!(cfg.perception_radius, 5);
    }

    #[test]
    fn detour_probability_cycles_per_agent() {
        let cfg = EngineConfig::default();
        assert!((cfg.detour_probability(0) - 0.2).abs() < 1e-12);
        assert!((cfg.detour_probability(4) - 0.4).abs() < 1e-12);
        assert!((cfg.detour_probability(5) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn detour_probability_is_clamped() {
        let cfg = EngineConfig {
            detour_base_probability: 0.9,
            detour_probability_step: 0.5,
            detour_probability_cycle: 0,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.detour_probability(3), 0.9);
        let cfg = EngineConfig {
            detour_base_probability: 0.9,
            detour_probability_step: 0.5,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.detour_probability(3), 1.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_uses_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{ "grid_side": 16 }"#).unwrap();
        assert_eq!(cfg.grid_side, 16);
        assert_eq!(cfg.perception_radius, 5);
    }
}
