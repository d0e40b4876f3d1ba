use crate::game::GameState;

/// Number of color channels per cell
pub const CHANNELS: usize = 3;

/// Border ring color
pub const WALL_COLOR: [u8; 3] = [128, 128, 128];
/// Snake body color (every segment except the head)
pub const BODY_COLOR: [u8; 3] = [0, 255, 0];
/// Snake head color
pub const HEAD_COLOR: [u8; 3] = [0, 0, 255];
/// Food color
pub const FOOD_COLOR: [u8; 3] = [255, 0, 0];

/// Pixel-grid observation, one pixel per cell
///
/// Layout is row-major `[rows, cols, 3]` with `u8` channel values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl Observation {
    fn blank(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols * CHANNELS],
        }
    }

    /// `[rows, cols, channels]`
    pub fn shape(&self) -> [usize; 3] {
        [self.rows, self.cols, CHANNELS]
    }

    /// Raw row-major bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Color of one cell
    pub fn pixel(&self, row: usize, col: usize) -> [u8; 3] {
        let idx = self.index(row, col);
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    fn paint(&mut self, row: usize, col: usize, color: [u8; 3]) {
        let idx = self.index(row, col);
        self.data[idx..idx + CHANNELS].copy_from_slice(&color);
    }

    fn index(&self, row: usize, col: usize) -> usize {
        (row * self.cols + col) * CHANNELS
    }
}

/// Render the game state into a pixel grid
///
/// Painting order: walls, body, head, food. Later items win on overlap, and
/// cells outside the frame (a head that just left it) are skipped.
pub fn create_observation(state: &GameState) -> Observation {
    let grid = &state.grid;
    let mut obs = Observation::blank(grid.rows(), grid.cols());

    paint_walls(&mut obs);

    for pos in state.snake.body_segments() {
        if let Some((row, col)) = grid.cell_of(pos) {
            obs.paint(row, col, BODY_COLOR);
        }
    }

    if let Some((row, col)) = grid.cell_of(state.snake.head()) {
        obs.paint(row, col, HEAD_COLOR);
    }

    if let Some((row, col)) = grid.cell_of(state.food) {
        obs.paint(row, col, FOOD_COLOR);
    }

    obs
}

/// Border ring: first/last row, first/last column
fn paint_walls(obs: &mut Observation) {
    let (rows, cols) = (obs.rows, obs.cols);

    for col in 0..cols {
        obs.paint(0, col, WALL_COLOR);
        obs.paint(rows - 1, col, WALL_COLOR);
    }

    for row in 0..rows {
        obs.paint(row, 0, WALL_COLOR);
        obs.paint(row, cols - 1, WALL_COLOR);
    }
}
