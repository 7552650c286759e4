//! Play one generated round of every game and print the answers.
//! Usage:
//!
//! ```bash
//! RUST_LOG=debug cargo run --release --example round
//! ```

use puzzle_answers::{
    board_path::{self, BoardGraph, SUPPORTED_SIZES},
    hanoi::{format_moves, HanoiSolver, ROUND_DISKS},
    max_flow::{self, FlowNetwork, TRAFFIC_EDGES},
    queens::QueensSolver,
    route::{DistanceModel, RouteOptimizer, TspInstance},
    verdict::{Game, MemoryStore, RoundRecord, RoundStore},
    Result,
};
use rand::Rng;

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = rand::thread_rng();
    let mut store = MemoryStore::default();

    let size = rng.gen_range(SUPPORTED_SIZES);
    let board = BoardGraph::random(size, &mut rng)?;
    let throws = board_path::solve(&board)?;
    println!(
        "Snake and ladder {}x{}: {} throws (choices {:?})",
        size,
        size,
        throws.min_throws,
        board_path::throw_choices(throws.min_throws, &board, &mut rng)
    );
    store.record(
        RoundRecord::new("demo", Game::SnakeLadder)
            .parameter("board_size", size)
            .timing("bfs", &throws.bfs)
            .timing("dp", &throws.dp)
            .answers(throws.min_throws, throws.min_throws, true),
    )?;

    let network = FlowNetwork::random_traffic(&mut rng)?;
    let flow = max_flow::solve(&network)?;
    println!("Traffic A -> T: maximum flow {}", flow.max_flow);
    for (&(from, to), carried) in TRAFFIC_EDGES.iter().zip(&flow.dinic.value.edge_flows) {
        let capacity = network.capacity(from, to).unwrap_or_default();
        println!("  {} -> {}: {}/{}", from, to, carried, capacity);
    }
    store.record(
        RoundRecord::new("demo", Game::Traffic)
            .timing("edmonds_karp", &flow.edmonds_karp)
            .timing("dinic", &flow.dinic)
            .answers(flow.max_flow, flow.max_flow, true),
    )?;

    let instance = TspInstance::random(10, DistanceModel::Euclidean, &mut rng)?;
    let route = RouteOptimizer::default().solve(&instance);
    println!(
        "Route: {} ({:.2})",
        route.best.path.join(" -> "),
        route.best.distance
    );
    let mut record = RoundRecord::new("demo", Game::TravelingSalesman)
        .parameter("home", &instance.home().name)
        .parameter("selected", instance.selected().len())
        .timing("nearest_neighbor", &route.nearest_neighbor)
        .timing("genetic", &route.genetic);
    if let Some(exact) = &route.exact {
        record = record.timing("exact", exact);
    }
    store.record(record.answers(
        format!("{:.2}", route.best.distance),
        format!("{:.2}", route.best.distance),
        true,
    ))?;

    let disks = rng.gen_range(ROUND_DISKS);
    for pegs in [3, 4] {
        let solver = HanoiSolver::new(disks, pegs)?;
        let hanoi = solver.solve()?;
        println!(
            "Hanoi {} disks on {} pegs: {} moves",
            disks, pegs, hanoi.optimal_moves
        );
        if disks <= 5 {
            println!("  {}", format_moves(&hanoi.iterative.value));
        }
        store.record(
            RoundRecord::new("demo", Game::Hanoi)
                .parameter("disks", disks)
                .parameter("pegs", pegs)
                .timing("recursive", &hanoi.recursive)
                .timing("iterative", &hanoi.iterative)
                .answers(hanoi.optimal_moves, hanoi.optimal_moves, true),
        )?;
    }

    let queens = QueensSolver::default();
    let report = queens.solve()?;
    if let Some(placement) = queens.random_solution(&mut rng) {
        println!(
            "Eight queens: {} solutions, e.g. {}",
            report.solutions.len(),
            placement
        );
    }
    store.record(
        RoundRecord::new("demo", Game::EightQueens)
            .timing("sequential", &report.sequential)
            .timing("parallel", &report.parallel)
            .answers(report.solutions.len(), report.solutions.len(), true),
    )?;

    for round in store.rounds() {
        println!("{:?}: {:?}", round.game, round.timings_ms);
    }

    Ok(())
}
