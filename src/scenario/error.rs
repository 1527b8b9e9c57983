use thiserror::Error;

use crate::geometry::Position;

/// Construction-time parameter violation. The only error the core engine
/// surfaces.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("Grid has no cells")]
    EmptyGrid,

    #[error("Negative {what} count: {value}")]
    NegativeCount { what: &'static str, value: i64 },

    #[error("Too many agents for the grid: {requested} requested, must be below {cells}")]
    TooManyAgents { requested: i64, cells: usize },

    #[error("Too many waste items for the grid: {requested} requested, must be below {cells}")]
    TooManyWaste { requested: i64, cells: usize },

    #[error("Base position {0} lies outside the grid")]
    BaseOutOfBounds(Position),
}
