//! Single-tick movement toward a target.
//!
//! Agents move one cell along one axis per tick. The axis with the larger
//! remaining delta goes first (ties broken by a coin flip). With a per-agent
//! probability the priority is overridden by a uniformly random axis, which
//! keeps agents converging on the same corridor from locking step.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::{Direction, Grid, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

fn random_axis<R: Rng>(rng: &mut R) -> Axis {
    if rng.gen_bool(0.5) {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Next cell from `start` toward `target`.
///
/// `detour_probability` is the chance of ignoring the usual axis priority
/// (must lie in `[0, 1]`). The result is adjacent to `start`, reduces the
/// Manhattan distance by one and is clamped to `grid`. When `start` already
/// equals `target` it is returned unchanged and no randomness is drawn.
pub fn path_step<R: Rng>(
    start: Position,
    target: Position,
    detour_probability: f64,
    grid: &Grid,
    rng: &mut R,
) -> Position {
    let (dx, dy) = start.delta_to(&target);
    if dx == 0 && dy == 0 {
        return start;
    }

    let preferred = if rng.gen_bool(detour_probability) {
        random_axis(rng)
    } else if dx.abs() > dy.abs() {
        Axis::Horizontal
    } else if dx.abs() < dy.abs() {
        Axis::Vertical
    } else {
        random_axis(rng)
    };

    // Never pick an axis with nothing left to cover.
    let axis = match preferred {
        Axis::Horizontal if dx == 0 => Axis::Vertical,
        Axis::Vertical if dy == 0 => Axis::Horizontal,
        axis => axis,
    };

    let next = match axis {
        Axis::Horizontal => Position::new(start.x + dx.signum(), start.y),
        Axis::Vertical => Position::new(start.x, start.y + dy.signum()),
    };
    grid.clamp(next)
}

/// In-bounds neighbours of `start`, in a freshly shuffled direction order.
pub fn alternative_moves<R: Rng>(start: Position, grid: &Grid, rng: &mut R) -> Vec<Position> {
    let mut directions = Direction::ALL;
    directions.shuffle(rng);
    directions
        .into_iter()
        .map(|d| start.offset(d))
        .filter(|cell| grid.contains(cell))
        .collect()
}
