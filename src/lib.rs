#![deny(missing_docs)]

//! Ground-truth answers for five classic puzzle games.
//!
//! Each module generates or accepts a problem instance and computes the
//! textbook answer a player's input is checked against, running two or more
//! independent algorithms and timing each:
//!
//!  - [`board_path`]: fewest dice throws on a snakes and ladders board, by
//!    breadth first search and by tabulation.
//!  - [`max_flow`]: maximum traffic flow through a road network, by
//!    Edmonds–Karp and by Dinic's algorithm.
//!  - [`route`]: shortest round trip through selected cities, by exhaustive
//!    search, nearest neighbour and a genetic algorithm.
//!  - [`hanoi`]: optimal Tower of Hanoi moves for three or four pegs, by
//!    recursive and explicit stack generators.
//!  - [`queens`]: the eight queens puzzle, by sequential and parallel
//!    backtracking.
//!
//! Algorithms that must agree are checked against each other, and a mismatch
//! is reported as [`Error::AlgorithmDisagreement`] rather than papered over.
//! [`verdict`] defines when a player's answer counts as correct.

pub mod board_path;
pub mod error;
pub mod hanoi;
pub mod max_flow;
pub mod queens;
pub mod route;
pub mod timing;
pub mod verdict;

pub use board_path::BoardGraph;
pub use error::{Error, Result};
pub use hanoi::{HanoiSolver, Move};
pub use max_flow::FlowNetwork;
pub use queens::{Placement, QueensSolver};
pub use route::{RouteOptimizer, TspInstance};
pub use timing::Timed;
