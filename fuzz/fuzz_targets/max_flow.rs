#![no_main]

use libfuzzer_sys::fuzz_target;
use puzzle_answers::max_flow::{dinic, edmonds_karp, FlowNetwork};

fuzz_target!(|capacities: [u16; 13]| {
    let capacities = capacities.map(|capacity| u32::from(capacity) + 1);
    let network = FlowNetwork::traffic(capacities).unwrap();

    let by_paths = edmonds_karp(&network);
    let by_levels = dinic(&network);

    assert_eq!(by_paths.value, by_levels.value);
    assert!(by_paths.value <= network.source_capacity());
    assert!(network.is_feasible(&by_paths));
    assert!(network.is_feasible(&by_levels));
});
