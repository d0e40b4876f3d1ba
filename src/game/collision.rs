//! Wall and body collision checks, plus the wall-proximity helpers used for
//! shaping and telemetry.

use super::action::Direction;
use super::grid::GridWorld;
use super::state::{Position, Snake};

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// True if any coordinate is negative or exceeds `frame - cell`
pub fn wall_collision(pos: Position, world: &GridWorld) -> bool {
    !world.in_bounds(pos)
}

/// Collision caused by moving the head of `snake` onto `new_head`
///
/// Wall is checked first; the body check is only meaningful in bounds.
pub fn check_collision(
    snake: &Snake,
    new_head: Position,
    grows: bool,
    world: &GridWorld,
) -> Option<CollisionType> {
    if wall_collision(new_head, world) {
        return Some(CollisionType::Wall);
    }

    if snake.collides_with_body(new_head, grows) {
        return Some(CollisionType::SelfCollision);
    }

    None
}

/// True if either coordinate is less than `margin` units from a boundary
///
/// The bound is exclusive: with a margin of one cell only the edge cells
/// count, and a margin of 0 never matches.
pub fn near_wall(pos: Position, margin: i32, world: &GridWorld) -> bool {
    pos.x < margin
        || pos.y < margin
        || pos.x > world.max_x() - margin
        || pos.y > world.max_y() - margin
}

/// True if heading `direction` from `pos` leaves the grid next tick
pub fn facing_wall(pos: Position, direction: Direction, world: &GridWorld) -> bool {
    match direction {
        Direction::Up => pos.y <= 0,
        Direction::Down => pos.y >= world.max_y(),
        Direction::Left => pos.x <= 0,
        Direction::Right => pos.x >= world.max_x(),
    }
}

/// A last-instant turn away from a wall
///
/// True iff the snake at `pos` was heading straight at the edge it already
/// sits on in `prev_direction`, and the direction taken this tick differs.
pub fn wall_evade(
    prev_direction: Direction,
    new_direction: Direction,
    pos: Position,
    world: &GridWorld,
) -> bool {
    facing_wall(pos, prev_direction, world) && new_direction != prev_direction
}
