//! Core game logic module for Snake
//!
//! This module contains all the simulation logic without any I/O or rendering
//! dependencies: movement, collisions, curriculum food placement and reward
//! shaping. Everything is deterministic given a seed and an action sequence.

pub mod action;
pub mod collision;
pub mod config;
pub mod engine;
pub mod food;
pub mod grid;
pub mod lifecycle;
pub mod reward;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use collision::CollisionType;
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use food::{CurriculumPhase, FoodScheduler};
pub use grid::{CELL_SIZE, GridWorld};
pub use lifecycle::{EpisodeCounters, EpisodeStatus};
pub use reward::{RewardBreakdown, RewardEngine, RewardMode, RewardTerm, RewardWeights};
pub use state::{GameState, Position, Snake};
