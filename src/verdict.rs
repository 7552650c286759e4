//! What counts as a correct player answer, and the shape of the record kept
//! for every round.
//!
//! Counts (dice throws, maximum flow, moves) must match exactly. Tour lengths
//! are real numbers and match within [`DISTANCE_TOLERANCE`]. A queen
//! placement is correct when it solves the board, whichever of the solutions
//! it is.

use crate::{
    error::Result,
    hanoi::{HanoiSolver, Move},
    queens::{Placement, QueensSolver},
    timing::Timed,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest difference between a player's tour length and the computed one
/// that is still accepted.
pub const DISTANCE_TOLERANCE: f64 = 0.1;

/// Return true if a counted answer matches exactly.
pub fn count_matches(expected: u64, answer: u64) -> bool {
    expected == answer
}

/// Return true if a tour length is within [`DISTANCE_TOLERANCE`] of the
/// expected one.
pub fn distance_matches(expected: f64, answer: f64) -> bool {
    (expected - answer).abs() < DISTANCE_TOLERANCE
}

/// Return true if `answer` is a solution of the solver's board.
pub fn placement_matches(solver: &QueensSolver, answer: &Placement) -> bool {
    solver.is_solution(answer)
}

/// Return true if `answer` legally solves the tower in the optimal number of
/// moves. Illegal sequences are simply wrong answers.
pub fn moves_match(solver: &HanoiSolver, answer: &[Move]) -> bool {
    answer.len() as u64 == solver.optimal_move_count() && matches!(solver.check_moves(answer), Ok(true))
}

/// The five games a round can belong to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Game {
    /// Minimum dice throws on a snakes and ladders board.
    SnakeLadder,
    /// Maximum flow through the traffic network.
    Traffic,
    /// Shortest tour through the selected cities.
    TravelingSalesman,
    /// Minimum moves for the Tower of Hanoi.
    Hanoi,
    /// A non-attacking eight queens placement.
    EightQueens,
}

/// Everything kept about one round: who played, the problem, both answers
/// and how long each algorithm took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Player identifier.
    pub player: String,
    /// Which game was played.
    pub game: Game,
    /// Problem parameters, e.g. board size or disk count.
    pub parameters: BTreeMap<String, String>,
    /// The computed answer.
    pub correct_answer: String,
    /// The answer the player gave.
    pub player_answer: String,
    /// Whether the player's answer was accepted.
    pub is_correct: bool,
    /// Wall-clock time of each algorithm, in milliseconds.
    pub timings_ms: BTreeMap<String, f64>,
}

impl RoundRecord {
    /// Start a record for `player` playing `game`.
    pub fn new(player: impl Into<String>, game: Game) -> Self {
        RoundRecord {
            player: player.into(),
            game,
            parameters: BTreeMap::new(),
            correct_answer: String::new(),
            player_answer: String::new(),
            is_correct: false,
            timings_ms: BTreeMap::new(),
        }
    }

    /// Add a problem parameter.
    pub fn parameter(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.parameters.insert(name.into(), value.to_string());
        self
    }

    /// Add the timing of one algorithm.
    pub fn timing<T>(mut self, algorithm: impl Into<String>, timed: &Timed<T>) -> Self {
        self.timings_ms.insert(algorithm.into(), timed.millis());
        self
    }

    /// Set both answers and whether the player was right.
    pub fn answers(mut self, correct: impl ToString, given: impl ToString, is_correct: bool) -> Self {
        self.correct_answer = correct.to_string();
        self.player_answer = given.to_string();
        self.is_correct = is_correct;
        self
    }
}

/// Destination for finished rounds. Rounds are never read back through this
/// trait.
pub trait RoundStore {
    /// Persist one round.
    fn record(&mut self, round: RoundRecord) -> Result<()>;
}

/// A [`RoundStore`] that keeps rounds in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rounds: Vec<RoundRecord>,
}

impl MemoryStore {
    /// Rounds recorded so far, oldest first.
    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }
}

impl RoundStore for MemoryStore {
    fn record(&mut self, round: RoundRecord) -> Result<()> {
        log::debug!(
            "Recording {:?} round for [{}], correct: {}.",
            round.game,
            round.player,
            round.is_correct
        );
        self.rounds.push(round);
        Ok(())
    }
}

impl<S: RoundStore + ?Sized> RoundStore for &mut S {
    fn record(&mut self, round: RoundRecord) -> Result<()> {
        (**self).record(round)
    }
}
