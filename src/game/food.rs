//! Curriculum-driven food placement
//!
//! The curriculum only decides where the opening food of an episode goes.
//! Every respawn after food is eaten draws uniformly from the free cells.

use rand::Rng;

use super::action::Direction;
use super::grid::{CELL_SIZE, GridWorld};
use super::state::{Position, Snake};

/// Stage of the placement curriculum, derived from the episode counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurriculumPhase {
    /// Food one cell to the side of the head, forcing a turn
    Intro,
    /// Half forced-turn placement at a larger offset, half random
    Mixed,
    /// Uniformly random placement
    Free,
}

/// First episode of each phase
const PHASE_TABLE: [(u64, CurriculumPhase); 3] = [
    (0, CurriculumPhase::Intro),
    (100, CurriculumPhase::Mixed),
    (1000, CurriculumPhase::Free),
];

/// Probability that a `Mixed` episode uses the forced-turn rule
const MIXED_FORCED_TURN_PROBABILITY: f64 = 0.5;

/// How one opening food position is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRule {
    /// Offset from the head: `along` units in the heading, `across` units to a
    /// random perpendicular side
    ForcedTurn { along: i32, across: i32 },
    /// Any free cell
    Random,
}

const INTRO_RULE: PlacementRule = PlacementRule::ForcedTurn {
    along: 0,
    across: CELL_SIZE,
};

const MIXED_RULE: PlacementRule = PlacementRule::ForcedTurn {
    along: -4 * CELL_SIZE,
    across: 4 * CELL_SIZE,
};

impl CurriculumPhase {
    /// Phase for a 0-based episode number
    pub fn for_episode(episode: u64) -> Self {
        PHASE_TABLE
            .iter()
            .rev()
            .find(|(start, _)| episode >= *start)
            .map(|&(_, phase)| phase)
            .unwrap_or(CurriculumPhase::Free)
    }

    /// Draw the placement rule for one episode opening
    pub fn placement_rule(&self, rng: &mut impl Rng) -> PlacementRule {
        match self {
            CurriculumPhase::Intro => INTRO_RULE,
            CurriculumPhase::Mixed => {
                if rng.gen_bool(MIXED_FORCED_TURN_PROBABILITY) {
                    MIXED_RULE
                } else {
                    PlacementRule::Random
                }
            }
            CurriculumPhase::Free => PlacementRule::Random,
        }
    }
}

/// Food placement scheduler
///
/// Owns the episode counter, which survives resets for the lifetime of the
/// environment instance.
#[derive(Debug, Clone)]
pub struct FoodScheduler {
    episode_counter: u64,
    curriculum: bool,
}

impl FoodScheduler {
    pub fn new(curriculum: bool) -> Self {
        Self {
            episode_counter: 0,
            curriculum,
        }
    }

    /// Number of episodes started so far
    pub fn episode_counter(&self) -> u64 {
        self.episode_counter
    }

    /// Override the counter, e.g. to resume a curriculum mid-way
    pub fn set_episode_counter(&mut self, episode_counter: u64) {
        self.episode_counter = episode_counter;
    }

    /// Phase the next episode will use
    pub fn current_phase(&self) -> CurriculumPhase {
        if self.curriculum {
            CurriculumPhase::for_episode(self.episode_counter)
        } else {
            CurriculumPhase::Free
        }
    }

    /// Claim the next episode number and its phase
    pub fn begin_episode(&mut self) -> (u64, CurriculumPhase) {
        let episode = self.episode_counter;
        let phase = self.current_phase();
        self.episode_counter += 1;
        (episode, phase)
    }

    /// Opening food for a freshly reset snake
    pub fn opening_food(
        &self,
        phase: CurriculumPhase,
        snake: &Snake,
        world: &GridWorld,
        rng: &mut impl Rng,
    ) -> Option<Position> {
        match phase.placement_rule(rng) {
            PlacementRule::ForcedTurn { along, across } => {
                forced_turn_food(along, across, snake, world, rng)
                    .or_else(|| random_free_cell(snake, world, rng))
            }
            PlacementRule::Random => random_free_cell(snake, world, rng),
        }
    }

    /// Food after the previous one was eaten, independent of the phase
    pub fn respawn(&self, snake: &Snake, world: &GridWorld, rng: &mut impl Rng) -> Option<Position> {
        random_free_cell(snake, world, rng)
    }
}

/// Offset food beside the head; tries the random side first, then the other
fn forced_turn_food(
    along: i32,
    across: i32,
    snake: &Snake,
    world: &GridWorld,
    rng: &mut impl Rng,
) -> Option<Position> {
    let head = snake.head();
    let heading = snake.direction;
    let [first, second] = heading.perpendicular();
    let sides = if rng.gen_bool(0.5) {
        [first, second]
    } else {
        [second, first]
    };

    sides
        .into_iter()
        .map(|side| offset(head, heading, along, side, across))
        .find(|&pos| world.in_bounds(pos) && !snake.occupies(pos))
}

fn offset(head: Position, heading: Direction, along: i32, side: Direction, across: i32) -> Position {
    let (hx, hy) = heading.delta();
    let (sx, sy) = side.delta();
    head.moved_by(hx * along + sx * across, hy * along + sy * across)
}

/// Uniform draw over the cells not covered by the snake
fn random_free_cell(snake: &Snake, world: &GridWorld, rng: &mut impl Rng) -> Option<Position> {
    let free: Vec<Position> = world.cells().filter(|&cell| !snake.occupies(cell)).collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.gen_range(0..free.len())])
}
