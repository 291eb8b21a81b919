//! `endgame-solver` computes exact values of Othello endgame positions.
//!
//! The core is a negamax search with fail-hard alpha-beta pruning
//! ([`Solver`]), driven by a fixed square-priority and mobility move
//! ordering ([`ordering`]). Any [`endgame_board::Position`] can be solved.
//! A [`Solver`] can carry a [`SearchObserver`] such as [`CsvTrace`] that sees
//! every node it enters; [`sampler`] plays random games with the same machinery.
//! [`fast`] holds a second exact solver using region parity, tuned for the
//! last stretch of the game.

pub mod fast;
mod line;
pub mod node;
pub mod ordering;
pub mod sampler;
pub mod search;
pub mod solution;
pub mod trace;

pub use fast::{solve_fast, FastSolver, FastSolverConfig};
pub use node::SearchNode;
pub use ordering::{order_moves, MoveList, MoveListEntry};
pub use sampler::{sample, sample_observed};
pub use search::{solve, solve_win_loss_draw, Solver};
pub use solution::ExactSolution;
pub use trace::{CsvTrace, NodeVisit, NullObserver, SearchObserver};
