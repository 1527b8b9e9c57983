//! Collision arbitration for one tick.
//!
//! Agents are processed one at a time in a shuffled priority order. A cell
//! is free for a mover when no other agent currently stands on it (whether
//! that agent has already moved this tick or not) and no earlier agent has
//! committed to it this tick.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use super::pathing::alternative_moves;
use crate::geometry::{Grid, Position};
use crate::state::Agent;

/// Per-tick occupancy: where every agent stands right now, plus the cells
/// committed by agents already processed this tick.
#[derive(Debug, Clone)]
pub struct Occupancy {
    standing: HashMap<Position, usize>,
    committed: HashSet<Position>,
}

impl Occupancy {
    /// Starts a tick from the pre-tick agent positions.
    pub fn new(agents: &[Agent]) -> Self {
        Self {
            standing: agents
                .iter()
                .enumerate()
                .map(|(i, a)| (a.position, i))
                .collect(),
            committed: HashSet::with_capacity(agents.len()),
        }
    }

    /// Returns true if `mover` may end this tick on `cell`.
    pub fn is_free_for(&self, cell: &Position, mover: usize) -> bool {
        if self.committed.contains(cell) {
            return false;
        }
        match self.standing.get(cell) {
            Some(&other) => other == mover,
            None => true,
        }
    }

    /// Moves `mover` from `from` to `to` and commits `to` for the tick.
    pub fn commit(&mut self, mover: usize, from: Position, to: Position) {
        if self.standing.get(&from) == Some(&mover) {
            self.standing.remove(&from);
        }
        self.standing.insert(to, mover);
        self.committed.insert(to);
    }

    /// Commits `mover` to its current cell.
    pub fn hold(&mut self, mover: usize, at: Position) {
        self.commit(mover, at, at);
    }

    /// Returns true if `cell` was committed this tick.
    pub fn is_committed(&self, cell: &Position) -> bool {
        self.committed.contains(cell)
    }
}

/// How one agent's move request was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The intended step was the current cell: nothing to do.
    Idle,
    /// The intended step was accepted.
    Direct(Position),
    /// The intended step was rejected; a free neighbour was used instead.
    Detour(Position),
    /// No free cell was available; the agent holds position.
    Blocked,
}

impl Resolution {
    /// Where the agent ends the tick.
    pub fn destination(&self, from: Position) -> Position {
        match *self {
            Resolution::Direct(p) | Resolution::Detour(p) => p,
            Resolution::Idle | Resolution::Blocked => from,
        }
    }
}

/// Settles the move of agent `mover` from `from` toward `intended`.
///
/// The intended cell is accepted when it lies in the grid and is free.
/// Otherwise the in-bounds neighbours are tried in a shuffled order and the
/// first free one wins. Draws randomness only when the intended cell is
/// rejected.
pub fn resolve_move<R: Rng>(
    mover: usize,
    from: Position,
    intended: Position,
    occupancy: &Occupancy,
    grid: &Grid,
    rng: &mut R,
) -> Resolution {
    if intended == from {
        return Resolution::Idle;
    }
    if grid.contains(&intended) && occupancy.is_free_for(&intended, mover) {
        return Resolution::Direct(intended);
    }

    alternative_moves(from, grid, rng)
        .into_iter()
        .find(|cell| occupancy.is_free_for(cell, mover))
        .map_or(Resolution::Blocked, Resolution::Detour)
}
