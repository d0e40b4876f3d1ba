use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::action::{Direction, position_after};
use super::food::CurriculumPhase;
use super::grid::GridWorld;
use super::lifecycle::{EpisodeCounters, EpisodeStatus};

/// A position in frame units, always on a multiple of the cell size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        position_after(*self, direction)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, head at the front
    body: VecDeque<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with its body laid out behind the head
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = VecDeque::with_capacity(length + 1);
        let back = direction.opposite();

        let mut segment = head;
        body.push_back(segment);
        for _ in 1..length {
            segment = segment.moved_in_direction(back);
            body.push_back(segment);
        }

        Self { body, direction }
    }

    /// Build a snake from explicit head-first segments
    pub fn from_segments(segments: impl IntoIterator<Item = Position>, direction: Direction) -> Self {
        let body: VecDeque<Position> = segments.into_iter().collect();
        debug_assert!(!body.is_empty(), "snake needs at least one segment");
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    /// Segments excluding the head
    pub fn body_segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().skip(1).copied()
    }

    /// Check whether any segment, head included, occupies `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Check whether moving the head onto `pos` hits the body
    ///
    /// Evaluated before the new head is inserted. The head is skipped, and
    /// so is the tail when the snake does not grow this tick, since that cell
    /// is vacated as the head arrives.
    pub fn collides_with_body(&self, pos: Position, grows: bool) -> bool {
        let checked = if grows {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body
            .iter()
            .take(checked)
            .skip(1)
            .any(|&segment| segment == pos)
    }

    /// Insert `new_head` at the front and drop the tail unless the snake grew
    pub fn advance(&mut self, new_head: Position, grew: bool) {
        self.body.push_front(new_head);

        if !grew {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Complete per-episode game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid: GridWorld,
    pub counters: EpisodeCounters,
    pub status: EpisodeStatus,
    /// Episode number this state belongs to (0-based)
    pub episode: u64,
    /// Curriculum phase that placed the opening food
    pub phase: CurriculumPhase,
}

impl GameState {
    /// Create a fresh active state
    pub fn new(snake: Snake, food: Position, grid: GridWorld) -> Self {
        Self {
            snake,
            food,
            grid,
            counters: EpisodeCounters::default(),
            status: EpisodeStatus::Active,
            episode: 0,
            phase: CurriculumPhase::Free,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        self.grid.in_bounds(pos)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    pub fn is_active(&self) -> bool {
        self.status == EpisodeStatus::Active
    }
}
