//! Reinforcement learning environment for Snake game
//!
//! Provides:
//! - Pixel-grid observations (walls, body, head, food)
//! - The reset/step contract consumed by training and evaluation harnesses

pub mod environment;
pub mod observation;

pub use environment::{EnvInfo, EnvStep, ResetInfo, SnakeEnvironment};
pub use observation::{Observation, create_observation};
