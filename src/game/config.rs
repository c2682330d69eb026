use serde::{Deserialize, Serialize};

use super::state::Grid;

/// Fixed board and pacing constants for a game session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the board in cells
    pub grid_width: u16,
    /// Height of the board in cells
    pub grid_height: u16,
    /// Ticks per second at the start of a session
    pub initial_speed: u32,
    /// Speed goes up by one every time the score reaches a multiple of this
    pub speed_step: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 30,
            initial_speed: 10,
            speed_step: 5,
        }
    }
}

impl GameConfig {
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }

    /// Small board used by tests that need to fill it up
    #[cfg(test)]
    pub(crate) fn tiny(width: u16, height: u16) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }
}
