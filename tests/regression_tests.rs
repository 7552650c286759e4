mod common;

use common::init_logging;
use puzzle_answers::{
    board_path,
    hanoi::{format_moves, parse_moves},
    max_flow,
    queens::is_valid_placement,
    verdict::{self, Game, MemoryStore, RoundRecord, RoundStore},
    BoardGraph, FlowNetwork, HanoiSolver, QueensSolver,
};

#[test]
fn empty_ten_by_ten_board() {
    init_logging();
    let board = BoardGraph::new(10, std::iter::empty()).unwrap();

    let report = board_path::solve(&board).unwrap();
    assert_eq!(report.min_throws, 17);
    assert_eq!(report.bfs.value, report.dp.value);
}

#[test]
fn three_disks_three_pegs() {
    let solver = HanoiSolver::new(3, 3).unwrap();

    assert_eq!(solver.optimal_move_count(), 7);
    let moves = solver.generate_moves();
    assert_eq!(moves.len(), 7);
    assert_eq!(
        format_moves(&moves),
        "A->C, A->B, C->B, A->C, B->A, B->C, A->C"
    );
    assert!(verdict::moves_match(
        &solver,
        &parse_moves(&format_moves(&moves)).unwrap()
    ));
}

#[test]
fn uniform_traffic_network() {
    init_logging();
    let network = FlowNetwork::traffic([10; 13]).unwrap();

    let report = max_flow::solve(&network).unwrap();
    // G -> T and H -> T form the minimum cut.
    assert_eq!(report.max_flow, 20);
    assert_eq!(report.edmonds_karp.value.value, report.dinic.value.value);
    assert!(report.max_flow <= network.source_capacity());
}

#[test]
fn known_queens_placements() {
    assert!(is_valid_placement(&[0, 4, 7, 5, 2, 6, 1, 3]));
    assert!(!is_valid_placement(&[0, 1, 2, 3, 4, 5, 6, 7]));
    assert!(!is_valid_placement(&[0, 4, 7, 5, 2, 6, 1, 1]));
}

#[test]
fn round_record_shape() {
    let solver = QueensSolver::default();
    let answer = "04752613".parse().unwrap();
    let report = solver.solve().unwrap();

    let record = RoundRecord::new("player-1", Game::EightQueens)
        .parameter("board_size", solver.side_length())
        .timing("sequential", &report.sequential)
        .timing("parallel", &report.parallel)
        .answers(&answer, &answer, verdict::placement_matches(&solver, &answer));

    let mut store = MemoryStore::default();
    store.record(record.clone()).unwrap();
    assert_eq!(store.rounds(), &[record.clone()]);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["game"], "eight_queens");
    assert_eq!(json["correct_answer"], "04752613");
    assert_eq!(json["is_correct"], true);
    assert_eq!(json["parameters"]["board_size"], "8");
    assert!(json["timings_ms"]["parallel"].is_number());

    let back: RoundRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, record);
}
