use anyhow::{Context, Result};
use serde::Serialize;

use super::observation::{CHANNELS, Observation, create_observation};
use crate::game::{Action, GameConfig, GameEngine, GameState, RewardBreakdown};

/// Info returned by [`SnakeEnvironment::reset`]; always empty
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResetInfo {}

/// Info returned alongside every step
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvInfo {
    /// Foods eaten this episode
    pub score: u32,
    /// Direction changes this episode
    pub turn_count: u32,
    /// Episode hit the step limit without dying; a full board is not a timeout
    pub time_out: bool,
    /// Last-instant wall turns this episode
    pub wall_turn_evade: u32,
    /// Reward terms of this step only
    pub reward_breakdown: RewardBreakdown,
}

/// One environment transition
#[derive(Debug, Clone, PartialEq)]
pub struct EnvStep {
    pub observation: Observation,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: EnvInfo,
}

impl EnvStep {
    /// Episode over by either termination or truncation
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Snake environment for reinforcement learning
///
/// Wraps the game engine and provides the reset/step contract with:
/// - Pixel observations (`[rows, cols, 3]`, walls/body/head/food colors)
/// - Discrete action space (4 actions: Up, Down, Left, Right)
/// - Separate terminated and truncated flags
///
/// Each instance owns its RNG, so environments can be built and stepped on
/// separate threads without coordination.
#[derive(Debug, Clone)]
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
    last_breakdown: RewardBreakdown,
}

impl SnakeEnvironment {
    /// Create a new Snake environment; the first episode is reset immediately
    pub fn new(config: GameConfig) -> Result<Self> {
        let mut engine = GameEngine::new(config).context("invalid game configuration")?;
        let state = engine.reset(None);
        Ok(Self {
            engine,
            state,
            last_breakdown: RewardBreakdown::default(),
        })
    }

    /// Reset the environment and return initial observation
    ///
    /// A seed reseeds this instance's RNG. The curriculum episode counter is
    /// never reset.
    pub fn reset(&mut self, seed: Option<u64>) -> (Observation, ResetInfo) {
        self.state = self.engine.reset(seed);
        self.last_breakdown = RewardBreakdown::default();
        (create_observation(&self.state), ResetInfo::default())
    }

    /// Step the environment with an action
    pub fn step(&mut self, action: Action) -> EnvStep {
        let result = self.engine.step(&mut self.state, action);
        let counters = &self.state.counters;

        let info = EnvInfo {
            score: counters.score,
            turn_count: counters.turn_count,
            time_out: result.info.time_out,
            wall_turn_evade: counters.wall_turn_evade,
            reward_breakdown: result.breakdown.clone(),
        };
        self.last_breakdown = result.breakdown;

        EnvStep {
            observation: create_observation(&self.state),
            reward: result.reward,
            terminated: result.terminated,
            truncated: result.truncated,
            info,
        }
    }

    /// Step with a discrete action index
    ///
    /// - 0: Move Up
    /// - 1: Move Down
    /// - 2: Move Left
    /// - 3: Move Right
    ///
    /// Any other index is rejected.
    pub fn step_index(&mut self, action_idx: usize) -> Result<EnvStep> {
        let action = Action::try_from(action_idx)?;
        Ok(self.step(action))
    }

    /// Get current observation without stepping
    pub fn observation(&self) -> Observation {
        create_observation(&self.state)
    }

    /// `[rows, cols, channels]` of every observation
    pub fn observation_shape(&self) -> [usize; 3] {
        let grid = self.engine.grid();
        [grid.rows(), grid.cols(), CHANNELS]
    }

    pub fn action_count(&self) -> usize {
        Action::COUNT
    }

    /// Reward terms of the most recent step
    pub fn last_breakdown(&self) -> &RewardBreakdown {
        &self.last_breakdown
    }

    /// Episodes started so far, including the current one
    pub fn episode_counter(&self) -> u64 {
        self.engine.scheduler().episode_counter()
    }

    /// Move the curriculum to a given episode number for the next reset
    pub fn set_episode_counter(&mut self, episode_counter: u64) {
        self.engine.scheduler_mut().set_episode_counter(episode_counter);
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    /// Get reference to current game state (for testing/debugging)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
