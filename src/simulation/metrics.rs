//! Aggregate statistics over several seeded games.

use std::fmt;

use super::{Simulation, SimulationError};
use crate::config::EngineConfig;
use crate::scenario::ScenarioParams;

/// Aggregated metrics over multiple games of the same scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics {
    /// Number of games played.
    pub n_runs: usize,
    /// Games that collected every waste item within the turn cap.
    pub completed_runs: usize,
    /// Mean turns to completion over completed games (0 if none completed).
    pub mean_turns_to_complete: f64,
    /// Mean waste collected per game.
    pub mean_collected: f64,
    /// Mean detours per turn across all games.
    pub mean_detours_per_turn: f64,
    /// Mean blocked agents per turn across all games.
    pub mean_blocked_per_turn: f64,
}

#[derive(Debug, Default)]
struct GameStats {
    turns: u32,
    collected: u32,
    completed: bool,
    detours: usize,
    blocked: usize,
}

impl RunMetrics {
    /// Plays one game per seed, each capped at `max_turns`, and aggregates.
    ///
    /// # Arguments
    ///
    /// * `params` - Scenario to play
    /// * `config` - Engine configuration shared by every game
    /// * `seeds` - One game is played per seed
    /// * `max_turns` - Turn cap per game
    pub fn evaluate<I>(
        params: &ScenarioParams,
        config: &EngineConfig,
        seeds: I,
        max_turns: u32,
    ) -> Result<Self, SimulationError>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut all_stats = Vec::new();

        for seed in seeds {
            let mut sim = Simulation::start(params, config.clone(), seed)?;
            if sim.is_active() {
                sim.run_to_completion(max_turns)?;
            }
            let totals = sim.totals();
            all_stats.push(GameStats {
                turns: sim.turn(),
                collected: sim.state().collected,
                completed: sim.is_complete(),
                detours: totals.detours,
                blocked: totals.blocked,
            });
        }

        let n = all_stats.len();
        let completed: Vec<&GameStats> = all_stats.iter().filter(|s| s.completed).collect();
        let total_turns: u64 = all_stats.iter().map(|s| s.turns as u64).sum();

        let mean = |sum: f64, count: usize| if count > 0 { sum / count as f64 } else { 0.0 };

        Ok(Self {
            n_runs: n,
            completed_runs: completed.len(),
            mean_turns_to_complete: mean(
                completed.iter().map(|s| s.turns as f64).sum(),
                completed.len(),
            ),
            mean_collected: mean(all_stats.iter().map(|s| s.collected as f64).sum(), n),
            mean_detours_per_turn: mean(
                all_stats.iter().map(|s| s.detours as f64).sum(),
                total_turns as usize,
            ),
            mean_blocked_per_turn: mean(
                all_stats.iter().map(|s| s.blocked as f64).sum(),
                total_turns as usize,
            ),
        })
    }

    /// Fraction of games that finished, in `[0, 1]`.
    pub fn completion_rate(&self) -> f64 {
        if self.n_runs == 0 {
            0.0
        } else {
            self.completed_runs as f64 / self.n_runs as f64
        }
    }
}

impl fmt::Display for RunMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Run Metrics ({} games) ===", self.n_runs)?;
        writeln!(
            f,
            "  Completed:               {} ({:.1}%)",
            self.completed_runs,
            self.completion_rate() * 100.0
        )?;
        writeln!(
            f,
            "  Mean turns to complete:  {:.1}",
            self.mean_turns_to_complete
        )?;
        writeln!(f, "  Mean collected:          {:.2}", self.mean_collected)?;
        writeln!(
            f,
            "  Mean detours per turn:   {:.3}",
            self.mean_detours_per_turn
        )?;
        writeln!(
            f,
            "  Mean blocked per turn:   {:.3}",
            self.mean_blocked_per_turn
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    #[test]
    fn evaluate_completes() {
        let params = ScenarioParams::new(4, 8, Position::new(2, 2));
        let metrics =
            RunMetrics::evaluate(&params, &EngineConfig::default(), 0..3, 50_000).unwrap();
        assert_eq!(metrics.n_runs, 3);
        assert_eq!(metrics.completed_runs, 3);
        assert!(metrics.mean_turns_to_complete > 0.0);
        assert!((metrics.mean_collected - 8.0).abs() < 1e-10);
        assert!((metrics.completion_rate() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn capped_runs_are_not_completed() {
        let params = ScenarioParams::new(2, 10, Position::new(2, 2));
        let metrics = RunMetrics::evaluate(&params, &EngineConfig::default(), 0..2, 1).unwrap();
        assert_eq!(metrics.completed_runs, 0);
        assert_eq!(metrics.mean_turns_to_complete, 0.0);
    }

    #[test]
    fn invalid_scenario_is_reported() {
        let params = ScenarioParams::new(5000, 1, Position::new(2, 2));
        let result = RunMetrics::evaluate(&params, &EngineConfig::default(), [1], 10);
        assert!(matches!(result, Err(SimulationError::InvalidScenario(_))));
    }

    #[test]
    fn display_mentions_game_count() {
        let params = ScenarioParams::new(2, 1, Position::new(2, 2));
        let metrics = RunMetrics::evaluate(&params, &EngineConfig::default(), [7], 10).unwrap();
        assert!(metrics.to_string().contains("(1 games)"));
    }
}
