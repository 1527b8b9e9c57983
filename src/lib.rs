//! walle - a tick engine for swarms of waste-collecting agents.
//!
//! Agents roam a bounded square grid, discover waste within a fixed radius,
//! carry it back one item at a time to a base, and coordinate through
//! per-tick claims and collision arbitration. The engine is a pure state
//! transition: every tick takes a [`WorldState`] snapshot and a caller-owned
//! RNG and returns the next snapshot.
//!
//! Entry points:
//! - [`initialize`] builds a random scenario,
//! - [`advance_tick`] (or [`engine::step`] for per-tick counters) moves it forward,
//! - [`Simulation`] wraps both into a turn-counted game session.

pub mod config;
pub mod engine;
pub mod geometry;
pub mod scenario;
pub mod simulation;
pub mod state;

pub use config::EngineConfig;
pub use engine::{advance_tick, TickOutcome, TickReport};
pub use geometry::{Direction, Grid, Position};
pub use scenario::{initialize, ScenarioError, ScenarioParams};
pub use simulation::{GameStatus, RunMetrics, Simulation, SimulationError};
pub use state::{Agent, WorldState};
