//! Task assignment: closest unclaimed known waste, or sector exploration.
//!
//! Claims live in an [`Assignments`] value built fresh every tick. A claim
//! only keeps two agents from chasing the same item within that tick; it is
//! never persisted, and a claim pointing at waste that has since been picked
//! up is simply dropped and recomputed.

use std::collections::HashMap;

use rand::Rng;

use crate::config::EngineConfig;
use crate::geometry::{Grid, Position};
use crate::state::WorldState;

/// What an agent is heading for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Carrying agents always return to base.
    Base(Position),
    /// A claimed known-waste cell.
    Waste(Position),
    /// No waste known: a point inside the agent's exploration sector.
    Explore(Position),
}

impl Target {
    /// The cell this target points at.
    pub fn position(&self) -> Position {
        match *self {
            Target::Base(p) | Target::Waste(p) | Target::Explore(p) => p,
        }
    }
}

/// Tick-scoped claim map from agent index to the waste it pursues.
///
/// Several agents may hold the same item once every known item is claimed,
/// so claims are counted per cell.
#[derive(Debug, Clone, Default)]
pub struct Assignments {
    claims: HashMap<usize, Position>,
    holders: HashMap<Position, usize>,
}

impl Assignments {
    /// Creates an empty claim map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `agent` pursues `waste`, replacing any earlier claim.
    pub fn claim(&mut self, agent: usize, waste: Position) {
        self.release(agent);
        self.claims.insert(agent, waste);
        *self.holders.entry(waste).or_insert(0) += 1;
    }

    /// Drops the claim held by `agent`, if any.
    pub fn release(&mut self, agent: usize) -> Option<Position> {
        let waste = self.claims.remove(&agent)?;
        if let Some(count) = self.holders.get_mut(&waste) {
            *count -= 1;
            if *count == 0 {
                self.holders.remove(&waste);
            }
        }
        Some(waste)
    }

    /// The claim held by `agent`, if any.
    pub fn get(&self, agent: usize) -> Option<Position> {
        self.claims.get(&agent).copied()
    }

    /// Returns true if some agent other than `agent` has claimed `waste`.
    pub fn claimed_by_other(&self, waste: &Position, agent: usize) -> bool {
        let total = self.holders.get(waste).copied().unwrap_or(0);
        let own = usize::from(self.get(agent) == Some(*waste));
        total > own
    }

    /// Returns the claim of `agent` if it still points at known waste.
    /// Stale claims are released.
    pub fn live_claim(&mut self, agent: usize, known: &[Position]) -> Option<Position> {
        match self.get(agent) {
            Some(w) if known.contains(&w) => Some(w),
            Some(_) => {
                self.release(agent);
                None
            }
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// Nearest known waste from `from` that no other agent has claimed.
///
/// When every known item is claimed, all known items are candidates again.
/// Ties go to the first minimum in `known` order. Returns `None` only when
/// `known` is empty.
pub fn closest_waste(
    known: &[Position],
    from: Position,
    agent: usize,
    claims: &Assignments,
) -> Option<Position> {
    let unclaimed = known
        .iter()
        .filter(|w| !claims.claimed_by_other(w, agent))
        .min_by_key(|w| from.manhattan_to(w));

    unclaimed
        .or_else(|| known.iter().min_by_key(|w| from.manhattan_to(w)))
        .copied()
}

/// Exploration target for `agent` when nothing is known.
///
/// The grid is split into up to 2×2 sectors: the column comes from
/// `agent mod 2` (used once there are at least two agents), the row from
/// `(agent / 2) mod 2` (used once there are at least three). The target is a
/// random corner of the sector, jittered by up to `exploration_jitter` on
/// each axis and clamped into the grid.
pub fn exploration_target<R: Rng>(
    agent: usize,
    agent_count: usize,
    config: &EngineConfig,
    rng: &mut R,
) -> Position {
    let grid = config.grid();
    let columns = if agent_count >= 2 { 2 } else { 1 };
    let rows = if agent_count >= 3 { 2 } else { 1 };

    let x = sector_edge(&grid, agent % 2 % columns, columns, rng);
    let y = sector_edge(&grid, (agent / 2) % 2 % rows, rows, rng);

    let jitter = config.exploration_jitter.max(0);
    let jx = rng.gen_range(-jitter..=jitter);
    let jy = rng.gen_range(-jitter..=jitter);

    grid.clamp(Position::new(x + jx, y + jy))
}

/// Low or high edge, picked at random, of sector `slot` out of `slots` along
/// one axis.
fn sector_edge<R: Rng>(grid: &Grid, slot: usize, slots: usize, rng: &mut R) -> i32 {
    let span = (grid.side() / slots as i32).max(1);
    let low = slot as i32 * span;
    if rng.gen_bool(0.5) {
        low
    } else {
        low + span - 1
    }
}

/// Picks this tick's target for the agent at `index` of `state` and records
/// any claim.
///
/// Carrying agents head for the base and release whatever they held. Others
/// keep a live claim, or claim the closest unclaimed known waste, or
/// explore when nothing is known.
pub fn select_target<R: Rng>(
    index: usize,
    state: &WorldState,
    claims: &mut Assignments,
    config: &EngineConfig,
    rng: &mut R,
) -> Target {
    let agent = &state.agents[index];
    if agent.carrying {
        claims.release(index);
        return Target::Base(state.base);
    }

    if let Some(waste) = claims.live_claim(index, &state.known_waste) {
        return Target::Waste(waste);
    }

    match closest_waste(&state.known_waste, agent.position, index, claims) {
        Some(waste) => {
            claims.claim(index, waste);
            Target::Waste(waste)
        }
        None => Target::Explore(exploration_target(
            index,
            state.agents.len(),
            config,
            rng,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Agent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn world(agents: Vec<Agent>, known: Vec<Position>) -> WorldState {
        WorldState {
            waste: known.clone(),
            known_waste: known,
            agents,
            base: p(2, 2),
            collected: 0,
        }
    }

    #[test]
    fn picks_nearest_known_waste() {
        let known = [p(10, 10), p(2, 1), p(20, 0)];
        let claims = Assignments::new();
        assert_eq!(closest_waste(&known, p(0, 0), 0, &claims), Some(p(2, 1)));
    }

    #[test]
    fn ties_go_to_first_in_known_order() {
        let known = [p(3, 0), p(0, 3), p(1, 2)];
        let claims = Assignments::new();
        assert_eq!(closest_waste(&known, p(0, 0), 0, &claims), Some(p(3, 0)));
    }

    #[test]
    fn skips_waste_claimed_by_others() {
        let known = [p(1, 0), p(5, 5)];
        let mut claims = Assignments::new();
        claims.claim(1, p(1, 0));
        assert_eq!(closest_waste(&known, p(0, 0), 0, &claims), Some(p(5, 5)));
        // An agent's own claim does not block it.
        assert_eq!(closest_waste(&known, p(0, 0), 1, &claims), Some(p(1, 0)));
    }

    #[test]
    fn falls_back_to_all_known_when_everything_is_claimed() {
        let known = [p(1, 0), p(5, 5)];
        let mut claims = Assignments::new();
        claims.claim(1, p(1, 0));
        claims.claim(2, p(5, 5));
        assert_eq!(closest_waste(&known, p(0, 0), 0, &claims), Some(p(1, 0)));
    }

    #[test]
    fn nothing_known_yields_none() {
        assert_eq!(closest_waste(&[], p(0, 0), 0, &Assignments::new()), None);
    }

    #[test]
    fn shared_claims_are_counted() {
        let mut claims = Assignments::new();
        claims.claim(0, p(1, 1));
        claims.claim(1, p(1, 1));
        assert!(claims.claimed_by_other(&p(1, 1), 0));
        claims.release(1);
        assert!(!claims.claimed_by_other(&p(1, 1), 0));
        assert!(claims.claimed_by_other(&p(1, 1), 2));
        claims.claim(0, p(3, 3));
        assert!(!claims.claimed_by_other(&p(1, 1), 2));
    }

    #[test]
    fn stale_claim_is_released() {
        let mut claims = Assignments::new();
        claims.claim(0, p(4, 4));
        assert_eq!(claims.live_claim(0, &[p(1, 1)]), None);
        assert!(claims.is_empty());

        claims.claim(0, p(1, 1));
        assert_eq!(claims.live_claim(0, &[p(1, 1)]), Some(p(1, 1)));
    }

    #[test]
    fn carrying_agent_targets_base_and_releases_claim() {
        let cfg = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut claims = Assignments::new();
        claims.claim(0, p(9, 9));
        let state = world(vec![Agent::loaded(p(5, 5))], vec![p(9, 9)]);
        let target = select_target(0, &state, &mut claims, &cfg, &mut rng);
        assert_eq!(target, Target::Base(p(2, 2)));
        assert_eq!(claims.get(0), None);
    }

    #[test]
    fn two_agents_split_two_items() {
        let cfg = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut claims = Assignments::new();
        let state = world(
            vec![Agent::idle(p(4, 4)), Agent::idle(p(4, 5))],
            vec![p(5, 5), p(6, 6)],
        );
        let ta = select_target(0, &state, &mut claims, &cfg, &mut rng);
        let tb = select_target(1, &state, &mut claims, &cfg, &mut rng);
        assert_eq!(ta, Target::Waste(p(5, 5)));
        assert_eq!(tb, Target::Waste(p(6, 6)));
        assert_eq!(claims.len(), 2);
    }

    #[test]
    fn explores_when_nothing_is_known() {
        let cfg = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(8);
        let mut claims = Assignments::new();
        let state = world(vec![Agent::idle(p(4, 4))], Vec::new());
        let target = select_target(0, &state, &mut claims, &cfg, &mut rng);
        assert!(matches!(target, Target::Explore(_)));
        assert!(claims.is_empty());
    }

    #[test]
    fn exploration_targets_stay_in_sector() {
        let cfg = EngineConfig {
            exploration_jitter: 0,
            ..EngineConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let t0 = exploration_target(0, 4, &cfg, &mut rng);
            let t1 = exploration_target(1, 4, &cfg, &mut rng);
            let t2 = exploration_target(2, 4, &cfg, &mut rng);
            let t3 = exploration_target(3, 4, &cfg, &mut rng);
            assert!(t0.x < 16 && t0.y < 16);
            assert!(t1.x >= 16 && t1.y < 16);
            assert!(t2.x < 16 && t2.y >= 16);
            assert!(t3.x >= 16 && t3.y >= 16);
        }
    }

    #[test]
    fn exploration_targets_are_clamped() {
        let cfg = EngineConfig {
            exploration_jitter: 50,
            ..EngineConfig::default()
        };
        let grid = cfg.grid();
        let mut rng = StdRng::seed_from_u64(5);
        for i in 0..100 {
            let t = exploration_target(i % 7, 7, &cfg, &mut rng);
            assert!(grid.contains(&t));
        }
    }

    #[test]
    fn lone_agent_explores_whole_grid() {
        let cfg = EngineConfig {
            exploration_jitter: 0,
            ..EngineConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(2);
        let far = (0..500)
            .map(|_| exploration_target(0, 1, &cfg, &mut rng))
            .any(|t| t.x >= 16 && t.y >= 16);
        assert!(far);
    }
}
