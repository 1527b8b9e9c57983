//! Per-tick state transition.
//!
//! One tick runs these stages over a working copy of the snapshot:
//!
//! 1. **Perception**: every agent scans around its pre-move cell
//!    ([`perception`]).
//! 2. **Priority**: agent indices are shuffled; the order is fresh every tick.
//! 3. For each agent in priority order, the first matching phase applies:
//!    - [`Phase::DropOff`]: carrying and standing on the base,
//!    - [`Phase::PickUp`]: empty-handed and standing on known waste,
//!    - [`Phase::Move`]: pick a target ([`assignment`]), compute one step
//!      ([`pathing`]) and settle collisions ([`arbiter`]).
//!
//! Phases are recomputed from position and load every tick; nothing about
//! them is stored. Claims and committed cells only live for one tick.
//!
//! The transition never fails on a well-formed snapshot (see
//! [`WorldState::check_invariants`]). All randomness comes from the
//! caller's RNG, so a seeded RNG reproduces a run exactly.

pub mod arbiter;
pub mod assignment;
pub mod pathing;
pub mod perception;


use std::ops::AddAssign;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::state::{Agent, WorldState};
use arbiter::{Occupancy, Resolution};
use assignment::Assignments;

/// What an agent does this tick, decided before any movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    DropOff,
    PickUp,
    Move,
}

impl Phase {
    /// Classifies `agent` against the current snapshot.
    pub fn of(agent: &Agent, state: &WorldState) -> Self {
        if agent.carrying && agent.position == state.base {
            Phase::DropOff
        } else if !agent.carrying && state.is_known_waste(&agent.position) {
            Phase::PickUp
        } else {
            Phase::Move
        }
    }
}

/// Counters describing what happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Waste newly added to the known set by perception.
    pub discovered: usize,
    pub pick_ups: usize,
    pub drop_offs: usize,
    /// Agents whose intended step was accepted.
    pub direct_moves: usize,
    /// Agents that fell back to a free neighbouring cell.
    pub detours: usize,
    /// Agents with no free cell to move to.
    pub blocked: usize,
    /// Agents already standing on their target.
    pub idle: usize,
}

impl AddAssign for TickReport {
    fn add_assign(&mut self, rhs: Self) {
        self.discovered += rhs.discovered;
        self.pick_ups += rhs.pick_ups;
        self.drop_offs += rhs.drop_offs;
        self.direct_moves += rhs.direct_moves;
        self.detours += rhs.detours;
        self.blocked += rhs.blocked;
        self.idle += rhs.idle;
    }
}

/// The next snapshot together with what happened on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub state: WorldState,
    pub report: TickReport,
}

/// Advances `state` by one tick and returns the next snapshot.
pub fn advance_tick<R: Rng>(state: &WorldState, config: &EngineConfig, rng: &mut R) -> WorldState {
    step(state, config, rng).state
}

/// Advances `state` by one tick, reporting per-tick counters.
pub fn step<R: Rng>(state: &WorldState, config: &EngineConfig, rng: &mut R) -> TickOutcome {
    let grid = config.grid();
    let mut next = state.clone();
    let mut report = TickReport {
        discovered: perception::perceive(&mut next, config),
        ..TickReport::default()
    };

    let mut order: Vec<usize> = (0..next.agents.len()).collect();
    order.shuffle(rng);

    let mut claims = Assignments::new();
    let mut occupancy = Occupancy::new(&next.agents);

    for index in order {
        let agent = next.agents[index];
        match Phase::of(&agent, &next) {
            Phase::DropOff => {
                next.agents[index].carrying = false;
                next.collected += 1;
                claims.release(index);
                occupancy.hold(index, agent.position);
                report.drop_offs += 1;
                debug!(agent = index, collected = next.collected, "Dropped off waste at base");
            }
            Phase::PickUp => {
                let cell = agent.position;
                next.agents[index].carrying = true;
                next.known_waste.retain(|w| *w != cell);
                next.waste.retain(|w| *w != cell);
                claims.release(index);
                occupancy.hold(index, cell);
                report.pick_ups += 1;
                debug!(agent = index, %cell, "Picked up waste");
            }
            Phase::Move => {
                let target = assignment::select_target(index, &next, &mut claims, config, rng);
                let intended = pathing::path_step(
                    agent.position,
                    target.position(),
                    config.detour_probability(index),
                    &grid,
                    rng,
                );
                let resolution =
                    arbiter::resolve_move(index, agent.position, intended, &occupancy, &grid, rng);
                match resolution {
                    Resolution::Idle => report.idle += 1,
                    Resolution::Direct(_) => report.direct_moves += 1,
                    Resolution::Detour(_) => report.detours += 1,
                    Resolution::Blocked => {
                        report.blocked += 1;
                        trace!(agent = index, cell = %agent.position, "Agent blocked, holding");
                    }
                }
                let to = resolution.destination(agent.position);
                occupancy.commit(index, agent.position, to);
                next.agents[index].position = to;
            }
        }
    }

    debug!(
        discovered = report.discovered,
        pick_ups = report.pick_ups,
        drop_offs = report.drop_offs,
        detours = report.detours,
        blocked = report.blocked,
        collected = next.collected,
        remaining = next.waste.len(),
        "Tick complete"
    );

    TickOutcome {
        state: next,
        report,
    }
}
