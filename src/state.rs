//! World snapshot threaded through ticks.

use std::collections::HashSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Grid, Position};

/// A cleaning agent. Agents are identified by their index in
/// [`WorldState::agents`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Agent {
    pub position: Position,
    /// Whether the agent currently holds one waste item.
    pub carrying: bool,
}

impl Agent {
    /// An agent with empty hands.
    pub fn idle(position: Position) -> Self {
        Self {
            position,
            carrying: false,
        }
    }

    /// An agent holding one waste item.
    pub fn loaded(position: Position) -> Self {
        Self {
            position,
            carrying: true,
        }
    }
}

/// Complete engine state between two ticks.
///
/// `waste` is the ground truth; `known_waste` is the subset agents have
/// perceived. Both keep discovery order, which is also the tie-breaking
/// order used by task assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldState {
    pub waste: Vec<Position>,
    pub known_waste: Vec<Position>,
    pub agents: Vec<Agent>,
    pub base: Position,
    /// Number of successful drop-offs so far.
    pub collected: u32,
}

/// A structural violation found by [`WorldState::check_invariants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    SharedCell(Position),
    OutOfBounds(Position),
    DuplicateWaste(Position),
    UnknownToTruth(Position),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::SharedCell(p) => write!(f, "two agents share cell {}", p),
            Violation::OutOfBounds(p) => write!(f, "cell {} is outside the grid", p),
            Violation::DuplicateWaste(p) => write!(f, "waste listed twice at {}", p),
            Violation::UnknownToTruth(p) => {
                write!(f, "known waste at {} is not in the true waste set", p)
            }
        }
    }
}

impl WorldState {
    /// Index of the agent standing on `pos`, if any.
    pub fn agent_at(&self, pos: &Position) -> Option<usize> {
        self.agents.iter().position(|a| a.position == *pos)
    }

    /// Returns true if `pos` is in the known waste set.
    pub fn is_known_waste(&self, pos: &Position) -> bool {
        self.known_waste.contains(pos)
    }

    /// Number of waste items still lying on the grid.
    pub fn remaining_waste(&self) -> usize {
        self.waste.len()
    }

    /// Number of agents currently carrying waste.
    pub fn carrying_count(&self) -> usize {
        self.agents.iter().filter(|a| a.carrying).count()
    }

    /// Checks the structural invariants a tick relies on and returns the
    /// first violation found.
    pub fn check_invariants(&self, grid: &Grid) -> Result<(), Violation> {
        let mut cells = HashSet::with_capacity(self.agents.len());
        for agent in &self.agents {
            if !grid.contains(&agent.position) {
                return Err(Violation::OutOfBounds(agent.position));
            }
            if !cells.insert(agent.position) {
                return Err(Violation::SharedCell(agent.position));
            }
        }

        let mut truth = HashSet::with_capacity(self.waste.len());
        for w in &self.waste {
            if !grid.contains(w) {
                return Err(Violation::OutOfBounds(*w));
            }
            if !truth.insert(*w) {
                return Err(Violation::DuplicateWaste(*w));
            }
        }

        let mut known = HashSet::with_capacity(self.known_waste.len());
        for k in &self.known_waste {
            if !truth.contains(k) {
                return Err(Violation::UnknownToTruth(*k));
            }
            if !known.insert(*k) {
                return Err(Violation::DuplicateWaste(*k));
            }
        }

        if !grid.contains(&self.base) {
            return Err(Violation::OutOfBounds(self.base));
        }
        Ok(())
    }
}
