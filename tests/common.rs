use puzzle_answers::{
    board_path::SUPPORTED_SIZES,
    max_flow::TRAFFIC_CAPACITIES,
    route::{DistanceModel, TspInstance},
    BoardGraph, FlowNetwork,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Install the test logger once per binary. Later calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic generator so failures can be replayed.
#[allow(dead_code)]
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `count` generated boards cycling through every supported size.
#[allow(dead_code)]
pub fn random_boards(count: usize, rng: &mut StdRng) -> Vec<BoardGraph> {
    SUPPORTED_SIZES
        .cycle()
        .take(count)
        .map(|size| BoardGraph::random(size, rng).unwrap())
        .collect()
}

/// `count` traffic networks, each edge capacity drawn from `capacities`.
#[allow(dead_code)]
pub fn random_networks(
    count: usize,
    capacities: std::ops::RangeInclusive<u32>,
    rng: &mut StdRng,
) -> Vec<FlowNetwork> {
    (0..count)
        .map(|_| {
            let mut drawn = [0; 13];
            for capacity in &mut drawn {
                *capacity = rng.gen_range(capacities.clone());
            }
            FlowNetwork::traffic(drawn).unwrap()
        })
        .collect()
}

/// `count` traffic networks with capacities drawn like a game round.
#[allow(dead_code)]
pub fn round_networks(count: usize, rng: &mut StdRng) -> Vec<FlowNetwork> {
    random_networks(count, TRAFFIC_CAPACITIES, rng)
}

/// `count` route rounds alternating between the distance models.
#[allow(dead_code)]
pub fn random_routes(count: usize, rng: &mut StdRng) -> Vec<TspInstance> {
    [DistanceModel::Euclidean, DistanceModel::RandomIntegers]
        .into_iter()
        .cycle()
        .take(count)
        .map(|model| TspInstance::random(10, model, rng).unwrap())
        .collect()
}
