//! Game logic built on the core data structures.
//!
//! - [`GameField`] - Single-turn state (board, falling piece, upcoming pieces)
//! - [`GameSession`] - Per-frame session with gravity, pause and statistics
//! - [`GameStats`] - Pieces locked and layers cleared
//! - [`PieceBuffer`] - Seeded bag randomizer over the shape catalog
//! - [`GameConfig`] - Board shape, speed and piece set of a session
//!
//! # Game Flow
//!
//! 1. Build a [`GameSession`] from a [`GameConfig`]
//! 2. A player or bot moves and rotates the falling piece
//! 3. The piece falls under gravity (or is dropped) and locks
//! 4. Full layers are cleared and the next piece spawns above the ceiling
//! 5. Repeat until a piece locks above the ceiling or the spawn collides
//!
//! # Example
//!
//! ```
//! use ndtris_engine::{GameConfig, GameSession};
//!
//! let mut session = GameSession::new(&GameConfig::default()).unwrap();
//! session.try_move(0, -1).ok();
//! session.hard_drop_and_complete();
//! assert_eq!(session.stats().completed_pieces(), 1);
//! ```

pub use self::{game_config::*, game_field::*, game_session::*, game_stats::*, piece_buffer::*};

mod game_config;
mod game_field;
mod game_session;
mod game_stats;
mod piece_buffer;
