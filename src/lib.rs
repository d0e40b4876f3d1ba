//! Snake Curriculum - a deterministic snake simulation for reinforcement learning
//!
//! This library provides:
//! - Core game logic: movement, collisions, curriculum food placement and
//!   named reward terms (game module)
//! - The reset/step RL environment with pixel observations (rl module)
//! - Episode aggregation and evaluation summaries (metrics module)
//!
//! ```rust
//! use snake_curriculum::game::{Action, GameConfig};
//! use snake_curriculum::rl::SnakeEnvironment;
//!
//! let mut env = SnakeEnvironment::new(GameConfig::small()).unwrap();
//! let (obs, _info) = env.reset(Some(7));
//! assert_eq!(obs.shape(), [20, 30, 3]);
//!
//! let step = env.step(Action::Up);
//! let sum: f32 = step.info.reward_breakdown.iter().map(|(_, v)| v).sum();
//! assert_eq!(sum, step.reward);
//! ```

pub mod game;
pub mod metrics;
pub mod rl;
