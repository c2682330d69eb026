//! Wrap Snake - terminal Snake on a board whose edges wrap around
//!
//! This library provides:
//! - Core game logic (game module)
//! - Record persistence (storage module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - The interactive terminal loop (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod storage;
