use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use super::{
    action::{Action, Direction, position_after, resolve_direction},
    collision::{CollisionType, check_collision, near_wall, wall_evade},
    config::GameConfig,
    food::FoodScheduler,
    grid::GridWorld,
    lifecycle::{EpisodeStatus, is_truncated},
    reward::{RewardBreakdown, RewardEngine, TickContext},
    state::{GameState, Snake},
};

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Whether this step was a last-instant turn away from a wall
    pub wall_evade: bool,
    /// The snake covers every cell, leaving nowhere to respawn food
    pub board_full: bool,
    /// The step limit ended the episode without a collision
    pub time_out: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the episode ended by collision
    pub terminated: bool,
    /// Whether the episode ended without a collision (step limit or full board)
    pub truncated: bool,
    /// Per-term decomposition of `reward`
    pub breakdown: RewardBreakdown,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
///
/// Owns the seeded RNG and the food scheduler, so two engines never share
/// random state.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    grid: GridWorld,
    rng: ChaCha8Rng,
    scheduler: FoodScheduler,
    rewards: RewardEngine,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            grid: config.grid(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            scheduler: FoodScheduler::new(config.curriculum),
            rewards: RewardEngine::new(config.reward_mode, &config.rewards),
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridWorld {
        &self.grid
    }

    pub fn rewards(&self) -> &RewardEngine {
        &self.rewards
    }

    pub fn scheduler(&self) -> &FoodScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut FoodScheduler {
        &mut self.scheduler
    }

    /// Reset the game to initial state, reseeding first if a seed is given
    pub fn reset(&mut self, seed: Option<u64>) -> GameState {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }

        let (episode, phase) = self.scheduler.begin_episode();
        let snake = Snake::new(
            self.grid.center(),
            Direction::Right,
            self.config.initial_snake_length,
        );

        // A validated config always leaves free cells beside the starting snake
        let food = self
            .scheduler
            .opening_food(phase, &snake, &self.grid, &mut self.rng)
            .expect("validated frame has room for food");
        debug_assert!(!snake.occupies(food));

        debug!(episode, ?phase, food_x = food.x, food_y = food.y, "episode reset");

        let mut state = GameState::new(snake, food, self.grid);
        state.episode = episode;
        state.phase = phase;
        state
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if state.status.is_over() {
            warn!(episode = state.episode, status = ?state.status, "step called on finished episode");
            return StepResult {
                reward: 0.0,
                terminated: state.status == EpisodeStatus::Terminated,
                truncated: state.status == EpisodeStatus::Truncated,
                breakdown: RewardBreakdown::default(),
                info: StepInfo::default(),
            };
        }

        let prev_head = state.snake.head();
        let prev_direction = state.snake.direction;
        let food = state.food;

        // Update direction based on action (prevent 180° turns)
        let new_direction = resolve_direction(prev_direction, action);
        let new_head = position_after(prev_head, new_direction);

        // Growth is known up front: food never sits on the body
        let grows = new_head == food;
        let collision_type = check_collision(&state.snake, new_head, grows, &self.grid);
        let ate_food = grows && collision_type.is_none();
        let evaded =
            collision_type.is_none() && wall_evade(prev_direction, new_direction, prev_head, &self.grid);

        state.snake.direction = new_direction;
        state.snake.advance(new_head, ate_food);
        debug_assert!(!state.snake.is_empty());

        let counters = &mut state.counters;
        counters.steps += 1;
        counters.record_heading(new_direction != prev_direction);
        if evaded {
            counters.wall_turn_evade += 1;
        }

        let terminated = collision_type.is_some();
        let mut board_full = false;
        if ate_food {
            counters.score += 1;
            match self.scheduler.respawn(&state.snake, &self.grid, &mut self.rng) {
                Some(next) => state.food = next,
                None => board_full = true,
            }
        }

        let breakdown = self.rewards.compute(&TickContext {
            prev_head,
            new_head,
            food,
            prev_direction,
            new_direction,
            terminated,
            ate_food,
            straight_ticks: counters.straight_ticks,
            near_wall: near_wall(new_head, self.config.near_wall_margin, &self.grid),
            wall_evade: evaded,
        });

        let step_limit = is_truncated(counters.steps, self.config.max_steps);
        let time_out = step_limit && !terminated;
        let truncated = step_limit || board_full;
        state.status = EpisodeStatus::after_tick(terminated, truncated);

        trace!(
            episode = state.episode,
            step = counters.steps,
            x = new_head.x,
            y = new_head.y,
            reward = breakdown.total(),
            terminated,
            truncated,
            "tick"
        );

        StepResult {
            reward: breakdown.total(),
            terminated,
            truncated,
            breakdown,
            info: StepInfo {
                ate_food,
                collision_type,
                wall_evade: evaded,
                board_full,
                time_out,
            },
        }
    }
}
