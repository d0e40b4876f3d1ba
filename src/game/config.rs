use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use super::grid::{CELL_SIZE, GridWorld};
use super::reward::{RewardMode, RewardWeights};

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the frame in units (multiple of the cell size)
    pub frame_width: i32,
    /// Height of the frame in units (multiple of the cell size)
    pub frame_height: i32,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Step limit after which an episode is truncated
    pub max_steps: u32,

    // Rewards (for RL)
    /// Which reward terms are active
    pub reward_mode: RewardMode,
    /// Weights of the reward terms
    pub rewards: RewardWeights,
    /// Distance from a wall, in units, that counts as "near"
    pub near_wall_margin: i32,

    /// Whether the opening food follows the placement curriculum
    pub curriculum: bool,
    /// Seed of the environment RNG
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frame_width: 720,
            frame_height: 480,
            initial_snake_length: 3,
            max_steps: 1000,
            reward_mode: RewardMode::Length,
            rewards: RewardWeights::default(),
            near_wall_margin: CELL_SIZE,
            curriculum: true,
            seed: 7,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom frame size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            frame_width: width,
            frame_height: height,
            ..Default::default()
        }
    }

    /// Create a small frame for testing
    pub fn small() -> Self {
        Self::new(300, 200)
    }

    pub fn with_reward_mode(mut self, reward_mode: RewardMode) -> Self {
        self.reward_mode = reward_mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_curriculum(mut self, curriculum: bool) -> Self {
        self.curriculum = curriculum;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Frame geometry described by this configuration
    pub fn grid(&self) -> GridWorld {
        GridWorld::new(self.frame_width, self.frame_height)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("frame_width", self.frame_width), ("frame_height", self.frame_height)] {
            if value <= 0 || value % CELL_SIZE != 0 {
                bail!("{name} must be a positive multiple of {CELL_SIZE}, got {value}");
            }
            if value < 3 * CELL_SIZE {
                bail!("{name} must span at least 3 cells, got {value}");
            }
        }

        if self.initial_snake_length < 3 {
            bail!(
                "initial_snake_length must be at least 3, got {}",
                self.initial_snake_length
            );
        }

        // The body is laid out leftwards from the centre cell
        let cells_left_of_center = (self.grid().center().x / CELL_SIZE) as usize;
        if self.initial_snake_length > cells_left_of_center + 1 {
            bail!(
                "initial_snake_length ({}) does not fit in a frame {} units wide",
                self.initial_snake_length,
                self.frame_width
            );
        }

        if self.max_steps == 0 {
            bail!("max_steps must be at least 1");
        }

        if self.near_wall_margin < 0 {
            bail!(
                "near_wall_margin must be non-negative, got {}",
                self.near_wall_margin
            );
        }

        for (name, weight) in self.rewards.values() {
            if !weight.is_finite() || weight < 0.0 {
                bail!("reward weight `{name}` must be a non-negative magnitude, got {weight}");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.frame_width, 720);
        assert_eq!(config.frame_height, 480);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.reward_mode, RewardMode::Length);
        assert!(config.curriculum);
        assert_eq!(config.seed, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(300, 200)
            .with_reward_mode(RewardMode::Survival)
            .with_seed(42)
            .with_curriculum(false)
            .with_max_steps(50);
        assert_eq!(config.frame_width, 300);
        assert_eq!(config.frame_height, 200);
        assert_eq!(config.reward_mode, RewardMode::Survival);
        assert_eq!(config.seed, 42);
        assert!(!config.curriculum);
        assert_eq!(config.max_steps, 50);
        assert_eq!(config.grid().cols(), 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_frame_size() {
        assert!(GameConfig::new(305, 200).validate().is_err());
        assert!(GameConfig::new(0, 200).validate().is_err());
        assert!(GameConfig::new(-300, 200).validate().is_err());
        assert!(GameConfig::new(20, 200).validate().is_err());
        assert!(GameConfig::new(300, 20).validate().is_err());
    }

    #[test]
    fn test_validation_snake_length() {
        let mut config = GameConfig::small();
        config.initial_snake_length = 2;
        assert!(config.validate().is_err());

        config.initial_snake_length = 16;
        assert!(config.validate().is_ok());

        config.initial_snake_length = 17;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_steps_and_weights() {
        let mut config = GameConfig::small();
        config.max_steps = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::small();
        config.rewards.death = -50.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::small();
        config.rewards.food = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = GameConfig::small();
        config.near_wall_margin = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(
            r#"{"frame_width": 300, "frame_height": 200, "reward_mode": "survival", "rewards": {"death": 10.0}}"#,
        )
        .unwrap();

        assert_eq!(config.frame_width, 300);
        assert_eq!(config.reward_mode, RewardMode::Survival);
        assert_eq!(config.rewards.death, 10.0);
        assert_eq!(config.rewards.food, 50.0);
        assert_eq!(config.max_steps, 1000);
        assert!(config.validate().is_ok());
    }
}
