//! Local waste discovery.
//!
//! Every agent scans the square window of half-width
//! [`EngineConfig::perception_radius`] around its pre-move position and adds
//! any true waste it sees to the known set. The result is a set union, so
//! the order in which agents scan only affects the order of newly appended
//! entries.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::geometry::Position;
use crate::state::WorldState;

/// Returns the true-waste cells visible to any agent that are not yet
/// known, in discovery order (agent order, then scan order).
pub fn discover(state: &WorldState, config: &EngineConfig) -> Vec<Position> {
    let grid = config.grid();
    let truth: HashSet<Position> = state.waste.iter().copied().collect();
    let mut seen: HashSet<Position> = state.known_waste.iter().copied().collect();

    let mut found = Vec::new();
    for agent in &state.agents {
        for cell in grid.neighborhood(agent.position, config.perception_radius) {
            if truth.contains(&cell) && seen.insert(cell) {
                found.push(cell);
            }
        }
    }
    found
}

/// Extends `state.known_waste` with everything the agents currently see.
/// Returns the number of newly known items.
pub fn perceive(state: &mut WorldState, config: &EngineConfig) -> usize {
    let found = discover(state, config);
    let n = found.len();
    state.known_waste.extend(found);
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Agent;

    fn state_with(agents: Vec<Agent>, waste: Vec<Position>) -> WorldState {
        WorldState {
            waste,
            known_waste: Vec::new(),
            agents,
            base: Position::new(0, 0),
            collected: 0,
        }
    }

    #[test]
    fn sees_waste_within_radius() {
        let cfg = EngineConfig::default();
        let mut state = state_with(
            vec![Agent::idle(Position::new(10, 10))],
            vec![
                Position::new(15, 15), // corner of the window
                Position::new(16, 10), // just outside
                Position::new(10, 10), // under the agent
            ],
        );
        assert_eq!(perceive(&mut state, &cfg), 2);
        assert!(state.is_known_waste(&Position::new(15, 15)));
        assert!(state.is_known_waste(&Position::new(10, 10)));
        assert!(!state.is_known_waste(&Position::new(16, 10)));
    }

    #[test]
    fn window_is_clipped_at_edges() {
        let cfg = EngineConfig::default();
        let mut state = state_with(
            vec![Agent::idle(Position::new(0, 31))],
            vec![Position::new(5, 26), Position::new(6, 31)],
        );
        perceive(&mut state, &cfg);
        assert_eq!(state.known_waste, vec![Position::new(5, 26)]);
    }

    #[test]
    fn perception_is_idempotent() {
        let cfg = EngineConfig::default();
        let mut state = state_with(
            vec![
                Agent::idle(Position::new(3, 3)),
                Agent::idle(Position::new(5, 5)),
            ],
            vec![Position::new(4, 4), Position::new(8, 8), Position::new(30, 30)],
        );
        perceive(&mut state, &cfg);
        let once = state.known_waste.clone();
        assert_eq!(perceive(&mut state, &cfg), 0);
        assert_eq!(state.known_waste, once);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn overlapping_windows_do_not_duplicate() {
        let cfg = EngineConfig::default();
        let mut state = state_with(
            vec![
                Agent::idle(Position::new(3, 3)),
                Agent::idle(Position::new(4, 3)),
            ],
            vec![Position::new(4, 4)],
        );
        perceive(&mut state, &cfg);
        assert_eq!(state.known_waste, vec![Position::new(4, 4)]);
    }
}
