//! Minimum number of dice throws needed to finish a
//! [snakes and ladders](https://en.wikipedia.org/wiki/Snakes_and_ladders)
//! board.
//!
//! The board is a `size` × `size` grid with cells numbered `1..=size²`. A
//! throw moves the token forward by `1..=6` cells; a throw that would overshoot
//! the last cell is wasted. Landing on the start of a snake or ladder moves the
//! token to its end.
//!
//! Two independent algorithms compute the answer: a breadth first search
//! ([`bfs_min_throws`]) and a tabulated relaxation ([`dp_min_throws`]).
//! [`solve`] runs both and refuses to answer if they disagree.

use crate::{
    error::{Error, Result},
    timing::{time, Timed},
};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Faces of the die.
const FACES: std::ops::RangeInclusive<usize> = 1..=6;

/// Range of board sizes used for generated rounds.
pub const SUPPORTED_SIZES: std::ops::RangeInclusive<usize> = 6..=12;

/// Largest side length [`BoardGraph::new`] accepts.
pub const MAX_BOARD_SIZE: usize = 100;

/// Placement attempts per snake or ladder before generation gives up.
const PLACEMENT_ATTEMPTS: usize = 1000;

/// A snakes and ladders board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardGraph {
    size: usize,
    shortcuts: BTreeMap<usize, usize>,
}

impl BoardGraph {
    /// Create a board of `size` × `size` cells with the given snakes and
    /// ladders, each given as a `(from, to)` pair.
    ///
    /// Every shortcut must start strictly between the first and last cell,
    /// end on the board, and no cell may start more than one shortcut.
    ///
    /// # Errors
    ///  - [`Error::InvalidBoardSize`] if `size` exceeds [`MAX_BOARD_SIZE`].
    ///  - [`Error::InvalidShortcut`] for the first shortcut breaking the rules
    ///    above.
    pub fn new(size: usize, shortcuts: impl IntoIterator<Item = (usize, usize)>) -> Result<Self> {
        let cells = size
            .checked_mul(size)
            .filter(|_| size <= MAX_BOARD_SIZE)
            .ok_or(Error::InvalidBoardSize { size })?;
        let mut map = BTreeMap::new();

        for (from, to) in shortcuts {
            let reason = if from <= 1 || from >= cells {
                Some("must start strictly between the first and last cell")
            } else if to < 1 || to > cells {
                Some("must end on the board")
            } else if from == to {
                Some("must move the token")
            } else if map.contains_key(&from) {
                Some("cell already starts another shortcut")
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(Error::InvalidShortcut { from, to, reason });
            }

            map.insert(from, to);
        }

        Ok(Self {
            size,
            shortcuts: map,
        })
    }

    /// Generate a random board of the given size.
    ///
    /// Places `max(1, size - 2)` ladders and as many snakes. Ladders climb at
    /// most `2 * size` cells. No cell is the start or end of two shortcuts,
    /// and the first and last cells are never touched.
    pub fn random(size: usize, rng: &mut impl Rng) -> Result<Self> {
        if !SUPPORTED_SIZES.contains(&size) {
            return Err(Error::InvalidBoardSize { size });
        }

        let cells = size * size;
        let wanted = size.saturating_sub(2).max(1);
        let mut used: BTreeSet<usize> = [1, cells].into_iter().collect();
        let mut ladders = Vec::with_capacity(wanted);
        let mut snakes = Vec::with_capacity(wanted);

        for _ in 0..PLACEMENT_ATTEMPTS {
            if ladders.len() == wanted {
                break;
            }
            let from = rng.gen_range(2..=cells - 2);
            let to = rng.gen_range(from + 1..=(cells - 1).min(from + 2 * size));
            if !used.contains(&from) && !used.contains(&to) {
                used.extend([from, to]);
                ladders.push((from, to));
            }
        }

        for _ in 0..PLACEMENT_ATTEMPTS {
            if snakes.len() == wanted {
                break;
            }
            let from = rng.gen_range(3..=cells - 1);
            let to = rng.gen_range(2..from);
            if !used.contains(&from) && !used.contains(&to) {
                used.extend([from, to]);
                snakes.push((from, to));
            }
        }

        if ladders.len() < wanted || snakes.len() < wanted {
            log::warn!(
                "Only placed {} ladders and {} snakes of {} requested on a {}x{} board.",
                ladders.len(),
                snakes.len(),
                wanted,
                size,
                size
            );
        }

        Self::new(size, ladders.into_iter().chain(snakes))
    }

    /// The side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of cells, which is also the number of the last cell.
    pub fn cells(&self) -> usize {
        self.size * self.size
    }

    /// All snakes and ladders as a `from -> to` map.
    pub fn shortcuts(&self) -> &BTreeMap<usize, usize> {
        &self.shortcuts
    }

    /// Shortcuts that move the token forward.
    pub fn ladders(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.shortcuts
            .iter()
            .map(|(&from, &to)| (from, to))
            .filter(|(from, to)| to > from)
    }

    /// Shortcuts that move the token backward.
    pub fn snakes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.shortcuts
            .iter()
            .map(|(&from, &to)| (from, to))
            .filter(|(from, to)| to < from)
    }

    /// Where the token ends up after throwing `face` from `cell`, or `None`
    /// if the throw overshoots the last cell.
    pub fn land(&self, cell: usize, face: usize) -> Option<usize> {
        let next = cell + face;
        if next > self.cells() {
            None
        } else {
            Some(self.shortcuts.get(&next).copied().unwrap_or(next))
        }
    }

    fn successors(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        FACES.filter_map(move |face| self.land(cell, face))
    }
}

/// Result of running both algorithms on a board.
#[derive(Debug, Clone)]
pub struct ThrowReport {
    /// The agreed minimum number of throws.
    pub min_throws: u32,
    /// Breadth first search result and timing.
    pub bfs: Timed<u32>,
    /// Tabulated relaxation result and timing.
    pub dp: Timed<u32>,
}

/// Minimum throws by breadth first search over cells, or `None` if the last
/// cell cannot be reached.
pub fn bfs_min_throws(board: &BoardGraph) -> Option<u32> {
    let cells = board.cells();
    if cells <= 1 {
        return Some(0);
    }

    let mut visited = vec![false; cells + 1];
    let mut queue = VecDeque::from([(1, 0)]);
    visited[1] = true;

    while let Some((cell, throws)) = queue.pop_front() {
        if cell == cells {
            return Some(throws);
        }

        for next in board.successors(cell) {
            if !visited[next] {
                visited[next] = true;
                queue.push_back((next, throws + 1));
            }
        }
    }

    None
}

/// Minimum throws by relaxing `best[next] = best[cell] + 1` over cells in
/// increasing order, or `None` if the last cell cannot be reached.
///
/// A single increasing sweep is not enough: a snake can lower the value of a
/// cell the sweep has already passed, which then has to be propagated again.
/// Sweeps therefore repeat until nothing changes. The first sweep is the
/// plain single pass, and boards without such snakes settle right after it.
pub fn dp_min_throws(board: &BoardGraph) -> Option<u32> {
    let cells = board.cells();
    if cells <= 1 {
        return Some(0);
    }

    let mut best: Vec<Option<u32>> = vec![None; cells + 1];
    best[1] = Some(0);

    let mut sweeps = 0;
    loop {
        sweeps += 1;
        let mut changed = false;

        for cell in 1..cells {
            let Some(throws) = best[cell] else {
                continue;
            };

            for next in board.successors(cell) {
                if best[next].map_or(true, |known| throws + 1 < known) {
                    best[next] = Some(throws + 1);
                    changed = true;
                }
            }
        }

        if !changed {
            break;
        }
    }

    log::trace!("Relaxation settled after {} sweeps.", sweeps);

    best[cells]
}

/// Run both algorithms and return the minimum number of throws with the
/// timing of each.
///
/// # Errors
///  - [`Error::Unreachable`] if neither algorithm reaches the last cell.
///  - [`Error::AlgorithmDisagreement`] if the two algorithms differ.
pub fn solve(board: &BoardGraph) -> Result<ThrowReport> {
    let bfs = time(|| bfs_min_throws(board));
    let dp = time(|| dp_min_throws(board));

    match (bfs.value, dp.value) {
        (Some(a), Some(b)) if a == b => {
            log::debug!(
                "Board {0}x{0}: {1} throws (bfs {2:.3}ms, dp {3:.3}ms).",
                board.size(),
                a,
                bfs.millis(),
                dp.millis()
            );

            Ok(ThrowReport {
                min_throws: a,
                bfs: bfs.map(|_| a),
                dp: dp.map(|_| b),
            })
        }
        (None, None) => Err(Error::Unreachable {
            cells: board.cells(),
        }),
        (first, second) => {
            log::error!(
                "BFS and DP disagree on board {:?}: {:?} vs {:?}",
                board,
                first,
                second
            );

            Err(Error::AlgorithmDisagreement {
                problem: "minimum dice throws",
                first: first.map(u64::from),
                second: second.map(u64::from),
            })
        }
    }
}

/// Minimum number of throws to finish the board.
pub fn min_throws(board: &BoardGraph) -> Result<u32> {
    solve(board).map(|report| report.min_throws)
}

/// Three sorted answer options for a multiple choice round, one of which is
/// `answer`.
///
/// Distractors are drawn up to three throws either side of the answer, never
/// below the throws needed on a board without shortcuts.
pub fn throw_choices(answer: u32, board: &BoardGraph, rng: &mut impl Rng) -> [u32; 3] {
    let unassisted = u32::try_from((board.cells().saturating_sub(1) + 5) / 6).unwrap_or(u32::MAX);

    let mut options = BTreeSet::from([answer]);
    options.insert(answer + rng.gen_range(1..=3));
    options.insert(unassisted.max(answer.saturating_sub(rng.gen_range(1..=3))));

    let mut options: Vec<u32> = options.into_iter().take(3).collect();
    while options.len() < 3 {
        let next = options[options.len() - 1] + 1;
        options.push(next);
    }

    [options[0], options[1], options[2]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::iter;

    #[test]
    fn plain_board_takes_seventeen_throws() {
        let board = BoardGraph::new(10, iter::empty()).unwrap();

        assert_eq!(bfs_min_throws(&board), Some(17));
        assert_eq!(dp_min_throws(&board), Some(17));
        assert_eq!(min_throws(&board).unwrap(), 17);
    }

    #[test]
    fn ladder_never_hurts() {
        let plain = BoardGraph::new(10, iter::empty()).unwrap();
        let laddered = BoardGraph::new(10, [(7, 50)]).unwrap();

        assert!(min_throws(&laddered).unwrap() <= min_throws(&plain).unwrap());
        // 1 -> 7 (50) -> 56 -> ... 8 more throws to reach 100
        assert_eq!(min_throws(&laddered).unwrap(), 10);
    }

    #[test]
    fn degenerate_boards() {
        let empty = BoardGraph::new(0, iter::empty()).unwrap();
        assert_eq!(min_throws(&empty).unwrap(), 0);

        let single = BoardGraph::new(1, iter::empty()).unwrap();
        assert_eq!(min_throws(&single).unwrap(), 0);
    }

    #[test]
    fn snake_behind_the_sweep() {
        // The only way forward is 1 -> 2 (13) -> 14 (8) -> 9 (24) -> 25, which
        // needs the value of cell 8 after cell 8 has already been swept.
        let board = BoardGraph::new(
            5,
            [
                (2, 13),
                (3, 1),
                (4, 1),
                (5, 1),
                (6, 1),
                (7, 1),
                (9, 24),
                (14, 8),
                (15, 1),
                (16, 1),
                (17, 1),
                (18, 1),
                (19, 1),
            ],
        )
        .unwrap();

        assert_eq!(bfs_min_throws(&board), Some(4));
        assert_eq!(dp_min_throws(&board), Some(4));
    }

    #[test]
    fn unreachable_goal_is_an_error() {
        let board = BoardGraph::new(3, (2..=7).map(|from| (from, 1))).unwrap();

        assert_eq!(solve(&board).unwrap_err(), Error::Unreachable { cells: 9 });
    }

    #[test]
    fn rejects_invalid_shortcuts() {
        assert!(matches!(
            BoardGraph::new(10, [(1, 50)]),
            Err(Error::InvalidShortcut { from: 1, .. })
        ));
        assert!(matches!(
            BoardGraph::new(10, [(100, 3)]),
            Err(Error::InvalidShortcut { from: 100, .. })
        ));
        assert!(matches!(
            BoardGraph::new(10, [(20, 101)]),
            Err(Error::InvalidShortcut { to: 101, .. })
        ));
        assert!(matches!(
            BoardGraph::new(10, [(20, 30), (20, 5)]),
            Err(Error::InvalidShortcut { from: 20, to: 5, .. })
        ));
    }

    #[test]
    fn random_boards_respect_invariants() {
        let mut rng = StdRng::seed_from_u64(7);

        for size in SUPPORTED_SIZES {
            let board = BoardGraph::random(size, &mut rng).unwrap();
            let cells = board.cells();

            assert!(board.ladders().count() >= 1);
            assert!(board.snakes().count() >= 1);
            assert!(!board.shortcuts().contains_key(&1));
            assert!(!board.shortcuts().contains_key(&cells));

            let targets: BTreeSet<_> = board.shortcuts().values().copied().collect();
            assert_eq!(targets.len(), board.shortcuts().len());
            assert!(targets.iter().all(|to| !board.shortcuts().contains_key(to)));
        }
    }

    #[test]
    fn random_rejects_unsupported_sizes() {
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            BoardGraph::random(5, &mut rng),
            Err(Error::InvalidBoardSize { size: 5 })
        );
        assert_eq!(
            BoardGraph::random(13, &mut rng),
            Err(Error::InvalidBoardSize { size: 13 })
        );
    }

    #[test]
    fn new_rejects_oversized_boards() {
        assert!(BoardGraph::new(MAX_BOARD_SIZE, iter::empty()).is_ok());
        assert_eq!(
            BoardGraph::new(MAX_BOARD_SIZE + 1, iter::empty()),
            Err(Error::InvalidBoardSize {
                size: MAX_BOARD_SIZE + 1
            })
        );
        assert_eq!(
            BoardGraph::new(100_000, iter::empty()),
            Err(Error::InvalidBoardSize { size: 100_000 })
        );
        // size * size overflows
        assert_eq!(
            BoardGraph::new(usize::MAX / 2, iter::empty()),
            Err(Error::InvalidBoardSize {
                size: usize::MAX / 2
            })
        );
    }

    #[test]
    fn choices_contain_answer() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = BoardGraph::new(10, iter::empty()).unwrap();

        for _ in 0..50 {
            let choices = throw_choices(17, &board, &mut rng);
            assert!(choices.contains(&17));
            assert!(choices.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(choices[0] >= 17);
        }
    }
}
