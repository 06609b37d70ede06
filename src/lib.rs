//! An exact solver for the board game 'Connect 4'
//!
//! The solver searches the whole game tree below a position with negamax,
//! alpha-beta pruning and center-first move ordering, and reports how the game
//! ends under perfect play.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_solver::{board::Board, solver::Solver};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let board = Board::from_moves("121212")?;
//! let mut solver = Solver::new();
//! let score = solver.solve(&board);
//!
//! assert_eq!(score, 18);
//! assert_eq!(solver.node_count(), 1);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod solver;

pub mod reference;

pub mod benchmark;


/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// a line of four must fit in every direction
const_assert!(WIDTH >= 4 && HEIGHT >= 4);
// every column must be a single digit in a move sequence
const_assert!(WIDTH <= 9);
