use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use super::grid::CELL_SIZE;
use super::state::Position;

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// The direct reverse of this direction
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the unit delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The two directions at right angles to this one
    pub fn perpendicular(&self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    /// Axis-dominant direction from `from` toward `to`
    ///
    /// Horizontal wins only when the horizontal gap is strictly larger; ties
    /// (including zero distance) resolve vertically, Up when `dy <= 0`.
    pub fn toward(from: Position, to: Position) -> Direction {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx.abs() > dy.abs() {
            if dx > 0 { Direction::Right } else { Direction::Left }
        } else if dy > 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

/// Discrete action: the requested heading for the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    /// Size of the discrete action space
    pub const COUNT: usize = 4;

    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn direction(&self) -> Direction {
        match self {
            Action::Up => Direction::Up,
            Action::Down => Direction::Down,
            Action::Left => Direction::Left,
            Action::Right => Direction::Right,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Action::Up,
            Direction::Down => Action::Down,
            Direction::Left => Action::Left,
            Direction::Right => Action::Right,
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = anyhow::Error;

    /// - 0 → Up
    /// - 1 → Down
    /// - 2 → Left
    /// - 3 → Right
    /// - other → error
    fn try_from(idx: usize) -> Result<Self> {
        match idx {
            0 => Ok(Action::Up),
            1 => Ok(Action::Down),
            2 => Ok(Action::Left),
            3 => Ok(Action::Right),
            _ => bail!("action index {idx} out of range (expected 0..{})", Action::COUNT),
        }
    }
}

/// Apply `action` unless it is the exact reverse of `current`
///
/// Illegal reversals are ignored and the current heading is kept.
pub fn resolve_direction(current: Direction, action: Action) -> Direction {
    let requested = action.direction();
    if current.is_opposite(requested) {
        current
    } else {
        requested
    }
}

/// Position one cell further along `direction`
pub fn position_after(pos: Position, direction: Direction) -> Position {
    let (dx, dy) = direction.delta();
    pos.moved_by(dx * CELL_SIZE, dy * CELL_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Right));
        assert!(!Direction::Up.is_opposite(Direction::Up));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_reversal_guard_is_absolute() {
        for current in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            for action in Action::ALL {
                let resolved = resolve_direction(current, action);
                assert!(!resolved.is_opposite(current), "{current:?} -> {resolved:?}");
                if action.direction() == current.opposite() {
                    assert_eq!(resolved, current);
                } else {
                    assert_eq!(resolved, action.direction());
                }
            }
        }
    }

    #[test]
    fn test_position_after_moves_one_cell() {
        let pos = Position::new(150, 100);
        assert_eq!(position_after(pos, Direction::Up), Position::new(150, 90));
        assert_eq!(position_after(pos, Direction::Down), Position::new(150, 110));
        assert_eq!(position_after(pos, Direction::Left), Position::new(140, 100));
        assert_eq!(position_after(pos, Direction::Right), Position::new(160, 100));
    }

    #[test]
    fn test_action_mapping() {
        assert_eq!(Action::try_from(0).unwrap(), Action::Up);
        assert_eq!(Action::try_from(1).unwrap(), Action::Down);
        assert_eq!(Action::try_from(2).unwrap(), Action::Left);
        assert_eq!(Action::try_from(3).unwrap(), Action::Right);
        assert!(Action::try_from(4).is_err());
        assert!(Action::try_from(999).is_err());

        for action in Action::ALL {
            assert_eq!(Action::try_from(action.index()).unwrap(), action);
            assert_eq!(Action::from(action.direction()), action);
        }
    }

    #[test]
    fn test_direction_toward_food() {
        let head = Position::new(100, 100);
        assert_eq!(Direction::toward(head, Position::new(150, 120)), Direction::Right);
        assert_eq!(Direction::toward(head, Position::new(50, 90)), Direction::Left);
        assert_eq!(Direction::toward(head, Position::new(110, 150)), Direction::Down);
        assert_eq!(Direction::toward(head, Position::new(90, 20)), Direction::Up);
        // Ties go vertical
        assert_eq!(Direction::toward(head, Position::new(120, 120)), Direction::Down);
        assert_eq!(Direction::toward(head, head), Direction::Up);
    }

    #[test]
    fn test_perpendicular() {
        assert_eq!(Direction::Right.perpendicular(), [Direction::Up, Direction::Down]);
        assert_eq!(Direction::Up.perpendicular(), [Direction::Left, Direction::Right]);
    }
}
