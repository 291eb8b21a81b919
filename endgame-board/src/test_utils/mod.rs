//! Utilities used for testing and benchmarking.

pub mod ffo;

mod perft;
pub use perft::run_perft;
