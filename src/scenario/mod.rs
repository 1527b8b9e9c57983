//! Scenario generation: random, non-overlapping agent and waste placement.
//!
//! Validation policy:
//! - negative counts are rejected,
//! - a count equal to or above the number of grid cells is rejected,
//! - otherwise the waste count is silently clamped to the cells left free
//!   after the agents are placed.
//!
//! The base is not reserved; waste may be generated on the base cell.

mod error;

pub use error::ScenarioError;

use std::collections::HashSet;

use rand::seq::index;
use rand::Rng;

use crate::geometry::{Grid, Position};
use crate::state::{Agent, WorldState};

/// Requested scenario, with counts as signed integers the way a transport
/// layer hands them over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioParams {
    pub agent_count: i64,
    pub waste_count: i64,
    pub base: Position,
}

impl ScenarioParams {
    /// Creates a new parameter set.
    pub fn new(agent_count: i64, waste_count: i64, base: Position) -> Self {
        Self {
            agent_count,
            waste_count,
            base,
        }
    }

    /// Checks the parameters against `grid` and returns the validated
    /// `(agent_count, waste_count)` pair. The waste count is not yet clamped.
    pub fn validate(&self, grid: &Grid) -> Result<(usize, usize), ScenarioError> {
        let cells = grid.cell_count();
        if cells == 0 {
            return Err(ScenarioError::EmptyGrid);
        }
        let agents = checked_count("agent", self.agent_count)?;
        let waste = checked_count("waste", self.waste_count)?;
        if agents >= cells {
            return Err(ScenarioError::TooManyAgents {
                requested: self.agent_count,
                cells,
            });
        }
        if waste >= cells {
            return Err(ScenarioError::TooManyWaste {
                requested: self.waste_count,
                cells,
            });
        }
        if !grid.contains(&self.base) {
            return Err(ScenarioError::BaseOutOfBounds(self.base));
        }
        Ok((agents, waste))
    }
}

fn checked_count(what: &'static str, value: i64) -> Result<usize, ScenarioError> {
    usize::try_from(value).map_err(|_| ScenarioError::NegativeCount { what, value })
}

/// Samples `n` distinct cells of `grid` not in `excluded`, uniformly and
/// without replacement. `n` is clamped to the number of free cells.
pub fn sample_positions<R: Rng>(
    grid: &Grid,
    n: usize,
    excluded: &HashSet<Position>,
    rng: &mut R,
) -> Vec<Position> {
    let free: Vec<Position> = grid.cells().filter(|c| !excluded.contains(c)).collect();
    let n = n.min(free.len());
    index::sample(rng, free.len(), n)
        .into_iter()
        .map(|i| free[i])
        .collect()
}

/// Generates the initial world: `agent_count` idle agents and up to
/// `waste_count` waste items on cells disjoint from the agents.
///
/// The known waste set starts empty and the collected counter at zero.
pub fn initialize<R: Rng>(
    params: &ScenarioParams,
    grid: &Grid,
    rng: &mut R,
) -> Result<WorldState, ScenarioError> {
    let (agent_count, waste_count) = params.validate(grid)?;

    let agent_cells = sample_positions(grid, agent_count, &HashSet::new(), rng);
    let occupied: HashSet<Position> = agent_cells.iter().copied().collect();
    let waste = sample_positions(grid, waste_count, &occupied, rng);

    if waste.len() < waste_count {
        tracing::debug!(
            requested = waste_count,
            placed = waste.len(),
            "Clamped waste count to free cells"
        );
    }

    Ok(WorldState {
        waste,
        known_waste: Vec::new(),
        agents: agent_cells.into_iter().map(Agent::idle).collect(),
        base: params.base,
        collected: 0,
    })
}
