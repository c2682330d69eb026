//! Core game logic module for Snake
//!
//! Pure game state with no I/O or rendering dependencies: the snake on a
//! wrapping board, its food, and the session that scores a game.

pub mod action;
pub mod config;
pub mod food;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use food::Food;
pub use session::{GameSession, TickEvent};
pub use state::{Advance, Grid, Position, Snake};
