//! Error types shared by every solver in this crate.

use thiserror::Error;

/// Convenience alias used by all fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a problem instance may be rejected or a computation may fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The board side length is not supported by the requested operation.
    #[error("board size {size} is not supported")]
    InvalidBoardSize {
        /// The rejected side length.
        size: usize,
    },

    /// A snake or ladder breaks the board invariants.
    #[error("invalid shortcut {from} -> {to}: {reason}")]
    InvalidShortcut {
        /// The cell the shortcut starts on.
        from: usize,
        /// The cell the shortcut ends on.
        to: usize,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// No sequence of dice throws reaches the last cell.
    #[error("the last cell of a {cells}-cell board cannot be reached")]
    Unreachable {
        /// Number of cells on the board.
        cells: usize,
    },

    /// A flow network failed validation.
    #[error("invalid flow network: {0}")]
    InvalidNetwork(String),

    /// Only 3 and 4 peg towers are supported.
    #[error("{pegs} pegs are not supported, expected 3 or 4")]
    InvalidPegCount {
        /// The rejected peg count.
        pegs: usize,
    },

    /// Too many disks for the move count to fit in a `u64`.
    #[error("{disks} disks are not supported, at most {max} allowed")]
    InvalidDiskCount {
        /// The rejected disk count.
        disks: u32,
        /// The largest supported disk count.
        max: u32,
    },

    /// A move could not be decoded from text such as `A->C`.
    #[error("invalid move text [{0}]")]
    InvalidMoveText(String),

    /// A move sequence broke the Tower of Hanoi rules.
    #[error("move #{index} ({from} -> {to}) is illegal: {reason}")]
    IllegalMove {
        /// Zero based position of the move in its sequence.
        index: usize,
        /// Source peg index.
        from: usize,
        /// Destination peg index.
        to: usize,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A route problem referenced cities inconsistently.
    #[error("invalid city: {0}")]
    InvalidCity(String),

    /// A distance oracle produced a negative or non-finite distance.
    #[error("invalid distance: {0}")]
    InvalidDistance(String),

    /// A queen placement could not be decoded.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// Two algorithms that must agree on an instance returned different
    /// answers.
    ///
    /// `None` stands for "no answer", e.g. an unreachable goal.
    #[error("{problem}: algorithms disagree ({first:?} vs {second:?})")]
    AlgorithmDisagreement {
        /// Which pair of algorithms was compared.
        problem: &'static str,
        /// Answer of the first algorithm.
        first: Option<u64>,
        /// Answer of the second algorithm.
        second: Option<u64>,
    },
}
