//! Game session driving the engine turn by turn.
//!
//! A [`Simulation`] owns the RNG and the current snapshot, counts turns and
//! decides when the game is over. It is the in-memory counterpart of what a
//! web or persistence layer would keep between requests.
//!
//! # Lifecycle
//!
//! 1. Call [`Simulation::start`] with scenario parameters, configuration and seed.
//! 2. Repeatedly call [`Simulation::next_round`] until it reports the game is over.
//! 3. Inspect [`Simulation::status`] at any point, or [`Simulation::stop`] early.

mod error;
pub mod metrics;

pub use error::SimulationError;
pub use metrics::RunMetrics;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::{self, TickReport};
use crate::geometry::Position;
use crate::scenario::{self, ScenarioParams};
use crate::state::{Agent, WorldState};

/// Read-only view of a game, as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameStatus {
    pub waste_collected: u32,
    pub total_waste: u32,
    pub agents: Vec<Agent>,
    pub waste: Vec<Position>,
    pub base: Position,
    pub turn: u32,
    pub active: bool,
}

/// A running game.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: EngineConfig,
    state: WorldState,
    /// Waste actually placed at start; the game ends once this many are collected.
    total_waste: u32,
    turn: u32,
    active: bool,
    /// Running sum of per-turn reports.
    totals: TickReport,
    rng: StdRng,
}

impl Simulation {
    /// Generates a scenario and starts a game at turn 0.
    ///
    /// The game's total is the number of waste items actually placed, which
    /// may be lower than requested when the grid is crowded.
    pub fn start(
        params: &ScenarioParams,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = scenario::initialize(params, &config.grid(), &mut rng)?;
        let total_waste = state.waste.len() as u32;

        info!(
            agents = state.agents.len(),
            waste = total_waste,
            base = %state.base,
            seed,
            "Game started"
        );

        Ok(Self::from_parts(config, state, total_waste, 0, rng))
    }

    /// Resumes a game from a persisted snapshot.
    ///
    /// `total_waste` is the number of items the game started with and `turn`
    /// the number of turns already played. The game is active unless the
    /// snapshot has already collected everything.
    pub fn resume(
        config: EngineConfig,
        state: WorldState,
        total_waste: u32,
        turn: u32,
        seed: u64,
    ) -> Self {
        Self::from_parts(config, state, total_waste, turn, StdRng::seed_from_u64(seed))
    }

    fn from_parts(
        config: EngineConfig,
        state: WorldState,
        total_waste: u32,
        turn: u32,
        rng: StdRng,
    ) -> Self {
        let active = state.collected < total_waste;
        Self {
            config,
            state,
            total_waste,
            turn,
            active,
            totals: TickReport::default(),
            rng,
        }
    }

    /// Plays one turn.
    ///
    /// Deactivates the game once every placed waste item has been
    /// collected. Fails with [`SimulationError::Inactive`] on a finished or
    /// stopped game.
    pub fn next_round(&mut self) -> Result<TickReport, SimulationError> {
        if !self.active {
            return Err(SimulationError::Inactive);
        }

        let outcome = engine::step(&self.state, &self.config, &mut self.rng);
        self.state = outcome.state;
        self.totals += outcome.report;
        self.turn += 1;

        if self.state.collected >= self.total_waste {
            self.active = false;
            info!(turn = self.turn, collected = self.state.collected, "Game over");
        }

        Ok(outcome.report)
    }

    /// Plays turns until the game is over or `max_turns` more turns have
    /// been played. Returns the number of turns played by this call.
    pub fn run_to_completion(&mut self, max_turns: u32) -> Result<u32, SimulationError> {
        if !self.active {
            return Err(SimulationError::Inactive);
        }
        let mut played = 0;
        while self.active && played < max_turns {
            self.next_round()?;
            played += 1;
        }
        if self.active {
            debug!(turn = self.turn, played, "Turn cap reached before completion");
        }
        Ok(played)
    }

    /// Stops the game and returns its final status.
    pub fn stop(&mut self) -> Result<GameStatus, SimulationError> {
        if !self.active {
            return Err(SimulationError::AlreadyStopped);
        }
        self.active = false;
        info!(turn = self.turn, collected = self.state.collected, "Game stopped");
        Ok(self.status())
    }

    /// Current read-only status.
    pub fn status(&self) -> GameStatus {
        GameStatus {
            waste_collected: self.state.collected,
            total_waste: self.total_waste,
            agents: self.state.agents.clone(),
            waste: self.state.waste.clone(),
            base: self.state.base,
            turn: self.turn,
            active: self.active,
        }
    }

    /// Current snapshot, suitable for persisting.
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true once every placed waste item has been collected.
    pub fn is_complete(&self) -> bool {
        self.state.collected >= self.total_waste
    }

    /// Sum of every turn report since this session was created.
    pub fn totals(&self) -> TickReport {
        self.totals
    }
}
