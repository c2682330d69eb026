use log::{debug, warn};
use rand::Rng;

use super::state::{Grid, Position, Snake};

/// Lower bound on random draws before falling back to a scan
const MIN_SAMPLE_ATTEMPTS: usize = 64;

/// The single food item on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    position: Position,
}

impl Food {
    /// Place food on a free cell of a fresh board
    pub fn spawn<R: Rng>(snake: &Snake, grid: Grid, rng: &mut R) -> Self {
        let mut food = Self {
            position: grid.center(),
        };
        food.relocate(snake, grid, rng);
        food
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Move the food to a uniformly random cell the snake does not occupy.
    ///
    /// Random draws are capped at four times the board area; after that the
    /// first free cell in row-major order is used. Returns false, leaving the
    /// food where it was, only when the snake covers the whole board.
    pub fn relocate<R: Rng>(&mut self, snake: &Snake, grid: Grid, rng: &mut R) -> bool {
        let attempts = (grid.area() * 4).max(MIN_SAMPLE_ATTEMPTS);

        for _ in 0..attempts {
            let candidate = Position::new(
                rng.gen_range(0..grid.width()) as i32,
                rng.gen_range(0..grid.height()) as i32,
            );
            if !snake.contains(candidate) {
                self.position = candidate;
                return true;
            }
        }

        debug!(
            "no free cell after {} draws (snake length {}), scanning board",
            attempts,
            snake.len()
        );

        match grid.cells().find(|cell| !snake.contains(*cell)) {
            Some(cell) => {
                self.position = cell;
                true
            }
            None => {
                warn!("board is full, food left at {:?}", self.position);
                false
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn place_at(&mut self, position: Position) {
        self.position = position;
    }
}
