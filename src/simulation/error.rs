use thiserror::Error;

use crate::scenario::ScenarioError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Invalid scenario: {0}")]
    InvalidScenario(#[from] ScenarioError),

    #[error("Game is not active. Start a new game first.")]
    Inactive,

    #[error("Game is already stopped")]
    AlreadyStopped,
}
