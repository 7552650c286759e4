//! The [`n` queens puzzle](https://en.wikipedia.org/wiki/Eight_queens_puzzle)
//!  is the problem of placing `n` chess queens on an `n`×`n` chessboard so that
//! no two queens threaten each other.
//!
//! A placement puts exactly one queen in every row, so it is written as the
//! column of the queen in each row. It solves the puzzle when no two queens
//! share a column or a diagonal.

use crate::{
    error::{Error, Result},
    timing::{time, Timed},
};
use rand::{seq::SliceRandom, Rng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::{collections::BTreeSet, fmt, str::FromStr};

/// Side length of the board used by the game.
pub const BOARD_SIZE: usize = 8;

/// Queen columns, one per row starting from row `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement(Vec<usize>);

impl Placement {
    /// Create a placement from the column of each row.
    pub fn new(columns: impl IntoIterator<Item = usize>) -> Self {
        Placement(columns.into_iter().collect())
    }

    /// The column of the queen in each row.
    pub fn columns(&self) -> &[usize] {
        &self.0
    }

    /// Return true if no two queens attack each other.
    pub fn is_valid(&self) -> bool {
        is_valid_placement(&self.0)
    }
}

/// Columns are written as concatenated digits, e.g. `04752613`.
impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for column in &self.0 {
            write!(f, "{}", column)?;
        }

        Ok(())
    }
}

/// Accepts either concatenated digits (`04752613`) or whitespace separated
/// columns (`0 4 7 5 2 6 1 3`).
impl FromStr for Placement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.contains(char::is_whitespace) {
            s.split_whitespace()
                .map(|word| {
                    word.parse::<usize>().map_err(|_| {
                        Error::InvalidPlacement(format!("[{}] is not a column", word))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Placement)
        } else {
            s.chars()
                .map(|c| {
                    c.to_digit(10)
                        .map(|digit| digit as usize)
                        .ok_or_else(|| Error::InvalidPlacement(format!("[{}] is not a column", c)))
                })
                .collect::<Result<Vec<_>>>()
                .map(Placement)
        }
    }
}

/// Return true if no two entries share a column or a diagonal.
///
/// Entry `i` is the column of the queen on row `i`, so rows never clash.
pub fn is_valid_placement(columns: &[usize]) -> bool {
    columns.iter().enumerate().all(|(row, &column)| {
        columns[..row]
            .iter()
            .enumerate()
            .all(|(prev_row, &prev_column)| !attacks(prev_row, prev_column, row, column))
    })
}

fn attacks(row_a: usize, column_a: usize, row_b: usize, column_b: usize) -> bool {
    column_a == column_b || column_a.abs_diff(column_b) == row_a.abs_diff(row_b)
}

/// Result of running the sequential and parallel searches.
#[derive(Debug, Clone)]
pub struct QueensReport {
    /// Every solution of the board.
    pub solutions: BTreeSet<Placement>,
    /// Number of solutions found by the sequential search and its timing.
    pub sequential: Timed<usize>,
    /// Number of solutions found by the parallel search and its timing.
    pub parallel: Timed<usize>,
}

/// Backtracking search over queen placements on a square board.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QueensSolver {
    side_length: usize,
}

impl Default for QueensSolver {
    fn default() -> Self {
        QueensSolver::new(BOARD_SIZE)
    }
}

impl QueensSolver {
    /// Create a solver for a board with the given side length.
    pub fn new(side_length: usize) -> Self {
        QueensSolver { side_length }
    }

    /// The side length of the board.
    pub fn side_length(&self) -> usize {
        self.side_length
    }

    /// Return true if `placement` has a queen on every row of this board, all
    /// on the board, and none attack each other.
    pub fn is_solution(&self, placement: &Placement) -> bool {
        placement.0.len() == self.side_length
            && placement.0.iter().all(|&column| column < self.side_length)
            && placement.is_valid()
    }

    /// Every solution, found by backtracking row by row and trying columns
    /// in increasing order.
    pub fn all_solutions(&self) -> BTreeSet<Placement> {
        let mut found = Vec::new();
        self.backtrack(&mut Vec::with_capacity(self.side_length), &mut found);

        found.into_iter().collect()
    }

    /// Every solution, with the column of the first row fixed per worker.
    ///
    /// Each worker fills its own buffer; buffers are merged and deduplicated
    /// once all workers are done.
    pub fn par_all_solutions(&self) -> BTreeSet<Placement> {
        if self.side_length == 0 {
            return self.all_solutions();
        }

        let buffers: Vec<Vec<Placement>> = (0..self.side_length)
            .into_par_iter()
            .map(|first| {
                let mut local = Vec::new();
                let mut board = Vec::with_capacity(self.side_length);
                board.push(first);
                self.backtrack(&mut board, &mut local);
                local
            })
            .collect();

        let found: usize = buffers.iter().map(Vec::len).sum();
        let merged: BTreeSet<_> = buffers.into_iter().flatten().collect();
        if merged.len() != found {
            log::warn!(
                "Dropped {} duplicate placements while merging workers.",
                found - merged.len()
            );
        }

        merged
    }

    /// One solution found by backtracking with the columns of every row
    /// tried in random order, or `None` if the board has no solution.
    pub fn random_solution(&self, rng: &mut impl Rng) -> Option<Placement> {
        let mut board = Vec::with_capacity(self.side_length);
        if self.random_backtrack(&mut board, rng) {
            Some(Placement(board))
        } else {
            None
        }
    }

    /// The first square a queen can still go on without being attacked,
    /// for a board where `board[row]` holds the column of the queen on that
    /// row, if any.
    ///
    /// Empty rows are scanned top to bottom and their columns left to right.
    /// Rows past the end of `board` count as empty. Returns `None` if no
    /// empty row has a safe square.
    pub fn hint(&self, board: &[Option<usize>]) -> Option<(usize, usize)> {
        let queens: Vec<(usize, usize)> = board
            .iter()
            .enumerate()
            .filter_map(|(row, column)| column.map(|column| (row, column)))
            .collect();

        (0..self.side_length)
            .filter(|&row| board.get(row).copied().flatten().is_none())
            .flat_map(|row| (0..self.side_length).map(move |column| (row, column)))
            .find(|&(row, column)| {
                queens
                    .iter()
                    .all(|&(queen_row, queen_column)| !attacks(queen_row, queen_column, row, column))
            })
    }

    /// Run both searches and return the solutions with the timing of each.
    ///
    /// # Errors
    ///  - [`Error::AlgorithmDisagreement`] if the searches find different
    ///    solution sets.
    pub fn solve(&self) -> Result<QueensReport> {
        let sequential = time(|| self.all_solutions());
        let parallel = time(|| self.par_all_solutions());

        if sequential.value != parallel.value {
            log::error!(
                "Sequential and parallel searches disagree on a {}x{} board.",
                self.side_length,
                self.side_length
            );

            return Err(Error::AlgorithmDisagreement {
                problem: "queens solutions",
                first: Some(sequential.value.len() as u64),
                second: Some(parallel.value.len() as u64),
            });
        }

        log::debug!(
            "{} solutions (sequential {:.3}ms, parallel {:.3}ms).",
            sequential.value.len(),
            sequential.millis(),
            parallel.millis()
        );

        let solutions = sequential.value;
        Ok(QueensReport {
            sequential: Timed {
                value: solutions.len(),
                elapsed: sequential.elapsed,
            },
            parallel: parallel.map(|set| set.len()),
            solutions,
        })
    }

    fn is_safe(board: &[usize], column: usize) -> bool {
        let row = board.len();
        board
            .iter()
            .enumerate()
            .all(|(prev_row, &prev_column)| !attacks(prev_row, prev_column, row, column))
    }

    fn backtrack(&self, board: &mut Vec<usize>, found: &mut Vec<Placement>) {
        if board.len() == self.side_length {
            found.push(Placement(board.clone()));
            return;
        }

        for column in 0..self.side_length {
            if Self::is_safe(board, column) {
                board.push(column);
                self.backtrack(board, found);
                board.pop();
            }
        }
    }

    fn random_backtrack(&self, board: &mut Vec<usize>, rng: &mut impl Rng) -> bool {
        if board.len() == self.side_length {
            return true;
        }

        let mut columns: Vec<usize> = (0..self.side_length).collect();
        columns.shuffle(rng);

        for column in columns {
            if Self::is_safe(board, column) {
                board.push(column);
                if self.random_backtrack(board, rng) {
                    return true;
                }
                board.pop();
            }
        }

        false
    }
}
