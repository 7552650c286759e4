//! Optimal solutions to the [Tower of Hanoi](https://en.wikipedia.org/wiki/Tower_of_Hanoi)
//! with three or four pegs.
//!
//! Disks start on peg `0` (largest at the bottom) and must end on the last
//! peg, never placing a larger disk on a smaller one. Three pegs need
//! `2^n - 1` moves. Four pegs follow the
//! [Frame–Stewart](https://en.wikipedia.org/wiki/Tower_of_Hanoi#Frame%E2%80%93Stewart_algorithm)
//! recurrence `T(n) = min over 1 <= k < n of 2·T(k) + 2^(n-k) - 1`.

use crate::{
    error::{Error, Result},
    timing::{time, Timed},
};
use std::{fmt, str::FromStr};

/// Largest disk count whose three peg move count fits in a `u64`.
pub const MAX_COUNTED_DISKS: u32 = 63;

/// Largest disk count a [`HanoiSolver`] accepts, keeping generated move
/// sequences to about a million moves.
pub const MAX_DISKS: u32 = 20;

/// Disk counts used for generated rounds.
pub const ROUND_DISKS: std::ops::RangeInclusive<u32> = 5..=10;

/// A single move of the top disk of one peg onto another.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    /// Index of the peg the disk is taken from.
    pub from: usize,
    /// Index of the peg the disk is put on.
    pub to: usize,
}

impl Move {
    /// Create a move between two pegs.
    pub fn new(from: usize, to: usize) -> Self {
        Move { from, to }
    }
}

fn peg_label(peg: usize) -> char {
    u8::try_from(peg)
        .ok()
        .and_then(|peg| b'A'.checked_add(peg))
        .map_or('?', char::from)
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", peg_label(self.from), peg_label(self.to))
    }
}

impl FromStr for Move {
    type Err = Error;

    /// Parse a move written as `A->C`, pegs lettered from `A`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMoveText(s.to_owned());

        let (from, to) = s.trim().split_once("->").ok_or_else(invalid)?;
        let peg = |label: &str| {
            let mut chars = label.trim().chars();
            match (chars.next(), chars.next()) {
                (Some(c @ 'A'..='Z'), None) => Ok(usize::from(c as u8 - b'A')),
                _ => Err(invalid()),
            }
        };

        Ok(Move {
            from: peg(from)?,
            to: peg(to)?,
        })
    }
}

/// Render a move sequence as `A->B, A->C, B->C`.
pub fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a comma separated move sequence as produced by [`format_moves`].
pub fn parse_moves(text: &str) -> Result<Vec<Move>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    text.split(',').map(str::parse).collect()
}

/// Minimum move counts and best split for four pegs, for `0..=disks`.
///
/// Entry `n` holds `(T(n), k)` where `k` is the smallest split achieving the
/// minimum, or `0` when `n < 2`.
pub fn frame_stewart(disks: u32) -> Vec<(u64, u32)> {
    let n = disks as usize;
    let mut table = vec![(0, 0); n + 1];
    if n >= 1 {
        table[1] = (1, 0);
    }

    for i in 2..=n {
        table[i] = (1..i)
            .map(|k| (2 * table[k].0 + ((1u64 << (i - k)) - 1), k as u32))
            .min_by_key(|&(moves, _)| moves)
            .unwrap_or((0, 0));
    }

    table
}

/// The minimum number of moves for `disks` disks on `pegs` pegs, for towers
/// too large to generate the moves of.
///
/// # Errors
///  - [`Error::InvalidPegCount`] unless `pegs` is 3 or 4.
///  - [`Error::InvalidDiskCount`] if `disks` exceeds [`MAX_COUNTED_DISKS`].
pub fn optimal_move_count(disks: u32, pegs: usize) -> Result<u64> {
    if pegs != 3 && pegs != 4 {
        return Err(Error::InvalidPegCount { pegs });
    }
    if disks > MAX_COUNTED_DISKS {
        return Err(Error::InvalidDiskCount {
            disks,
            max: MAX_COUNTED_DISKS,
        });
    }

    Ok(match pegs {
        3 => three_peg_count(disks),
        _ => frame_stewart(disks)[disks as usize].0,
    })
}

/// The current arrangement of disks, used to check move sequences.
///
/// Disks are numbered by size from `1`, each peg lists its disks bottom to
/// top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Towers {
    pegs: Vec<Vec<u32>>,
}

impl Towers {
    /// All `disks` on the first of `pegs` pegs.
    pub fn new(disks: u32, pegs: usize) -> Self {
        let mut towers = vec![Vec::new(); pegs];
        if let Some(first) = towers.first_mut() {
            first.extend((1..=disks).rev());
        }

        Towers { pegs: towers }
    }

    /// The disks on every peg, bottom to top.
    pub fn pegs(&self) -> &[Vec<u32>] {
        &self.pegs
    }

    /// Apply one move, which is the `index`-th of its sequence.
    pub fn apply(&mut self, index: usize, mv: Move) -> Result<()> {
        let illegal = |reason| Error::IllegalMove {
            index,
            from: mv.from,
            to: mv.to,
            reason,
        };

        if mv.from >= self.pegs.len() || mv.to >= self.pegs.len() {
            return Err(illegal("no such peg"));
        }
        if mv.from == mv.to {
            return Err(illegal("source and destination are the same peg"));
        }

        let disk = *self.pegs[mv.from].last().ok_or_else(|| illegal("source peg is empty"))?;
        if self.pegs[mv.to].last().is_some_and(|&top| top < disk) {
            return Err(illegal("larger disk placed on a smaller one"));
        }

        self.pegs[mv.from].pop();
        self.pegs[mv.to].push(disk);
        Ok(())
    }

    /// Return true if every disk is on the last peg.
    pub fn is_solved(&self) -> bool {
        match self.pegs.split_last() {
            Some((_, rest)) => rest.iter().all(Vec::is_empty),
            None => true,
        }
    }
}

/// Result of running both generators on one tower.
#[derive(Debug, Clone)]
pub struct HanoiReport {
    /// Minimum number of moves.
    pub optimal_moves: u64,
    /// Moves from the recursive generator and its timing.
    pub recursive: Timed<Vec<Move>>,
    /// Moves from the explicit stack generator and its timing.
    pub iterative: Timed<Vec<Move>>,
}

/// A Tower of Hanoi instance with a fixed number of disks and pegs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HanoiSolver {
    disks: u32,
    pegs: usize,
}

impl HanoiSolver {
    /// Create an instance with `disks` disks on `pegs` pegs.
    ///
    /// # Errors
    ///  - [`Error::InvalidPegCount`] unless `pegs` is 3 or 4.
    ///  - [`Error::InvalidDiskCount`] if `disks` exceeds [`MAX_DISKS`].
    pub fn new(disks: u32, pegs: usize) -> Result<Self> {
        if pegs != 3 && pegs != 4 {
            return Err(Error::InvalidPegCount { pegs });
        }
        if disks > MAX_DISKS {
            return Err(Error::InvalidDiskCount {
                disks,
                max: MAX_DISKS,
            });
        }

        Ok(HanoiSolver { disks, pegs })
    }

    /// Number of disks.
    pub fn disks(&self) -> u32 {
        self.disks
    }

    /// Number of pegs.
    pub fn pegs(&self) -> usize {
        self.pegs
    }

    /// The minimum number of moves that solves this tower.
    pub fn optimal_move_count(&self) -> u64 {
        optimal_move_count(self.disks, self.pegs).unwrap_or(u64::MAX)
    }

    /// An optimal move sequence built by recursive decomposition.
    pub fn recursive_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();

        match self.pegs {
            3 => recursive_three(self.disks, 0, 2, 1, &mut moves),
            _ => {
                let table = frame_stewart(self.disks);
                recursive_four(self.disks, 0, 3, [1, 2], &table, &mut moves);
            }
        }

        moves
    }

    /// An optimal move sequence built without recursion.
    ///
    /// Three pegs use the parity cycle of peg pairs; four pegs drive the
    /// Frame–Stewart split from an explicit task stack.
    pub fn iterative_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();

        match self.pegs {
            3 => iterative_three(self.disks, 0, 2, 1, &mut moves),
            _ => iterative_four(self.disks, &frame_stewart(self.disks), &mut moves),
        }

        moves
    }

    /// An optimal move sequence.
    pub fn generate_moves(&self) -> Vec<Move> {
        self.iterative_moves()
    }

    /// Play `moves` from the starting position, returning whether they
    /// leave every disk on the last peg.
    ///
    /// # Errors
    ///  - [`Error::IllegalMove`] for the first move that breaks the rules.
    pub fn check_moves(&self, moves: &[Move]) -> Result<bool> {
        let mut towers = Towers::new(self.disks, self.pegs);
        for (index, mv) in moves.iter().enumerate() {
            towers.apply(index, *mv)?;
        }

        Ok(towers.is_solved())
    }

    /// Run both generators, checking that each produces an optimal length
    /// sequence.
    ///
    /// # Errors
    ///  - [`Error::AlgorithmDisagreement`] if either sequence has the wrong
    ///    length.
    pub fn solve(&self) -> Result<HanoiReport> {
        let optimal_moves = self.optimal_move_count();
        let recursive = time(|| self.recursive_moves());
        let iterative = time(|| self.iterative_moves());

        for (name, moves) in [("recursive", &recursive), ("iterative", &iterative)] {
            let generated = moves.value.len() as u64;
            if generated != optimal_moves {
                log::error!(
                    "{} generator made {} moves for {} disks on {} pegs, expected {}",
                    name,
                    generated,
                    self.disks,
                    self.pegs,
                    optimal_moves
                );

                return Err(Error::AlgorithmDisagreement {
                    problem: "hanoi move count",
                    first: Some(optimal_moves),
                    second: Some(generated),
                });
            }
        }

        log::debug!(
            "Hanoi {} disks / {} pegs: {} moves (recursive {:.3}ms, iterative {:.3}ms).",
            self.disks,
            self.pegs,
            optimal_moves,
            recursive.millis(),
            iterative.millis()
        );

        Ok(HanoiReport {
            optimal_moves,
            recursive,
            iterative,
        })
    }
}

fn three_peg_count(disks: u32) -> u64 {
    (1u64 << disks) - 1
}

fn recursive_three(disks: u32, from: usize, to: usize, via: usize, moves: &mut Vec<Move>) {
    if disks == 0 {
        return;
    }

    recursive_three(disks - 1, from, via, to, moves);
    moves.push(Move::new(from, to));
    recursive_three(disks - 1, via, to, from, moves);
}

fn recursive_four(
    disks: u32,
    from: usize,
    to: usize,
    spare: [usize; 2],
    table: &[(u64, u32)],
    moves: &mut Vec<Move>,
) {
    match disks {
        0 => {}
        1 => moves.push(Move::new(from, to)),
        _ => {
            let k = table[disks as usize].1;
            recursive_four(k, from, spare[0], [to, spare[1]], table, moves);
            recursive_three(disks - k, from, to, spare[1], moves);
            recursive_four(k, spare[0], to, [from, spare[1]], table, moves);
        }
    }
}

fn iterative_three(disks: u32, from: usize, to: usize, via: usize, moves: &mut Vec<Move>) {
    let pegs = [from, via, to];
    let mut stacks: [Vec<u32>; 3] = [(1..=disks).rev().collect(), Vec::new(), Vec::new()];

    // The smallest disk cycles forward for an odd count and backward for an
    // even one.
    let pairs = if disks % 2 == 0 {
        [(0, 1), (0, 2), (1, 2)]
    } else {
        [(0, 2), (0, 1), (1, 2)]
    };

    for step in 0..three_peg_count(disks) {
        let (a, b) = pairs[(step % 3) as usize];
        let (src, dst) = match (stacks[a].last(), stacks[b].last()) {
            (Some(x), Some(y)) if x < y => (a, b),
            (Some(_), None) => (a, b),
            (_, Some(_)) => (b, a),
            (None, None) => continue,
        };

        if let Some(disk) = stacks[src].pop() {
            stacks[dst].push(disk);
            moves.push(Move::new(pegs[src], pegs[dst]));
        }
    }
}

enum Task {
    Four {
        disks: u32,
        from: usize,
        to: usize,
        spare: [usize; 2],
    },
    Three {
        disks: u32,
        from: usize,
        to: usize,
        via: usize,
    },
}

fn iterative_four(disks: u32, table: &[(u64, u32)], moves: &mut Vec<Move>) {
    let mut stack = vec![Task::Four {
        disks,
        from: 0,
        to: 3,
        spare: [1, 2],
    }];

    while let Some(task) = stack.pop() {
        match task {
            Task::Three {
                disks,
                from,
                to,
                via,
            } => iterative_three(disks, from, to, via, moves),
            Task::Four { disks: 0, .. } => {}
            Task::Four {
                disks: 1, from, to, ..
            } => moves.push(Move::new(from, to)),
            Task::Four {
                disks,
                from,
                to,
                spare,
            } => {
                let k = table[disks as usize].1;

                // Pushed in reverse so they run in order.
                stack.push(Task::Four {
                    disks: k,
                    from: spare[0],
                    to,
                    spare: [from, spare[1]],
                });
                stack.push(Task::Three {
                    disks: disks - k,
                    from,
                    to,
                    via: spare[1],
                });
                stack.push(Task::Four {
                    disks: k,
                    from,
                    to: spare[0],
                    spare: [to, spare[1]],
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(from: usize, to: usize) -> Move {
        Move::new(from, to)
    }

    #[test]
    fn three_disks_three_pegs() {
        let solver = HanoiSolver::new(3, 3).unwrap();

        assert_eq!(solver.optimal_move_count(), 7);
        assert_eq!(
            solver.recursive_moves(),
            vec![m(0, 2), m(0, 1), m(2, 1), m(0, 2), m(1, 0), m(1, 2), m(0, 2)]
        );
        assert_eq!(solver.iterative_moves(), solver.recursive_moves());
    }

    #[test]
    fn frame_stewart_values() {
        let table = frame_stewart(10);
        let counts: Vec<_> = table.iter().map(|(moves, _)| *moves).collect();

        assert_eq!(counts, vec![0, 1, 3, 5, 9, 13, 17, 25, 33, 41, 49]);
        // 4 disks tie between k = 1 and k = 2, the smaller split wins
        assert_eq!(table[4].1, 1);
        assert_eq!(table[5].1, 2);
    }

    #[test]
    fn every_generator_solves_the_tower() {
        for pegs in [3, 4] {
            for disks in 0..=8 {
                let solver = HanoiSolver::new(disks, pegs).unwrap();
                let optimal = solver.optimal_move_count();

                for moves in [solver.recursive_moves(), solver.iterative_moves()] {
                    assert_eq!(moves.len() as u64, optimal, "{} disks {} pegs", disks, pegs);
                    assert_eq!(solver.check_moves(&moves), Ok(true));
                }
            }
        }
    }

    #[test]
    fn zero_disks() {
        let solver = HanoiSolver::new(0, 4).unwrap();

        assert_eq!(solver.optimal_move_count(), 0);
        assert!(solver.generate_moves().is_empty());
        assert_eq!(solver.check_moves(&[]), Ok(true));
    }

    #[test]
    fn rejects_unsupported_instances() {
        assert_eq!(
            HanoiSolver::new(3, 5),
            Err(Error::InvalidPegCount { pegs: 5 })
        );
        assert!(HanoiSolver::new(MAX_DISKS, 4).is_ok());
        assert_eq!(
            HanoiSolver::new(MAX_DISKS + 1, 3),
            Err(Error::InvalidDiskCount {
                disks: MAX_DISKS + 1,
                max: MAX_DISKS
            })
        );
        assert_eq!(
            HanoiSolver::new(40, 3),
            Err(Error::InvalidDiskCount {
                disks: 40,
                max: MAX_DISKS
            })
        );
    }

    #[test]
    fn counts_beyond_generated_towers() {
        assert_eq!(optimal_move_count(40, 3), Ok((1 << 40) - 1));
        assert_eq!(optimal_move_count(63, 3), Ok(u64::MAX));
        assert_eq!(optimal_move_count(10, 4), Ok(49));
        assert_eq!(
            optimal_move_count(64, 3),
            Err(Error::InvalidDiskCount { disks: 64, max: 63 })
        );
        assert_eq!(
            optimal_move_count(5, 2),
            Err(Error::InvalidPegCount { pegs: 2 })
        );
    }

    #[test]
    fn illegal_moves_are_reported() {
        let solver = HanoiSolver::new(2, 3).unwrap();

        assert!(matches!(
            solver.check_moves(&[m(0, 1), m(0, 1)]),
            Err(Error::IllegalMove { index: 1, .. })
        ));
        assert!(matches!(
            solver.check_moves(&[m(1, 2)]),
            Err(Error::IllegalMove { index: 0, .. })
        ));
        assert!(matches!(
            solver.check_moves(&[m(0, 3)]),
            Err(Error::IllegalMove { index: 0, .. })
        ));
        assert_eq!(solver.check_moves(&[m(0, 1)]), Ok(false));
    }

    #[test]
    fn move_text() {
        let moves = vec![m(0, 1), m(0, 2), m(1, 2)];
        let text = format_moves(&moves);

        assert_eq!(text, "A->B, A->C, B->C");
        assert_eq!(parse_moves(&text).unwrap(), moves);
        assert_eq!(parse_moves("  ").unwrap(), vec![]);
        assert!(matches!(
            parse_moves("A->B, AC"),
            Err(Error::InvalidMoveText(_))
        ));
        assert!(matches!("a->b".parse::<Move>(), Err(Error::InvalidMoveText(_))));
    }

    #[test]
    fn solve_reports_both_generators() {
        let report = HanoiSolver::new(6, 4).unwrap().solve().unwrap();

        assert_eq!(report.optimal_moves, 17);
        assert_eq!(report.recursive.value.len(), 17);
        assert_eq!(report.iterative.value.len(), 17);
    }
}
