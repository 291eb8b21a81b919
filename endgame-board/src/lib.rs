//! `endgame-board` is the Othello position model behind the endgame solver.
//!
//! This package implements four levels of abstraction:
//!
//!  - [`bitops`] contains allocation-free bit-twiddling primitives: population
//!    count, bit scans and isolated-bit extraction.
//!  - [`bitboard`] contains the raw, unchecked operations for working with Othello boards.
//!    These are fast, but may result in inconsistent state if their contracts are not manually checked.
//!  - [`Board`] implements the core game logic in the same fast, unchecked way, from the
//!    perspective of the player to move. This is suitable for use with engines.
//!  - [`Game`] adds the colour to move and checked move application.
//!
//! Search code talks to positions through the [`Position`] trait.

pub mod bitboard;
pub mod bitops;
pub mod test_utils;

mod board;
mod game;
mod location;
mod position;
mod utils;

pub use board::*;
pub use game::*;
pub use location::*;
pub use position::*;

/// The number of spaces on one edge of an Othello board.
pub const EDGE_LENGTH: usize = 8;

/// The number of spaces on an Othello board.
pub const NUM_SPACES: usize = 64;

/// Largest possible magnitude of a final disc differential.
pub const MAX_SCORE: i8 = NUM_SPACES as i8;
