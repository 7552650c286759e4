//! Genetic search over visiting orders.
//!
//! Fitness is `1 / (length + ε)`. Each generation is chosen by tournament
//! selection, recombined pairwise with order crossover and perturbed by swap
//! mutation. The shortest order seen in any generation is returned.

use rand::{rngs::StdRng, seq::index, seq::SliceRandom, Rng, SeedableRng};

/// Keeps fitness finite for zero length tours.
const EPSILON: f64 = 0.01;

/// Tuning parameters for the genetic heuristic.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeneticConfig {
    /// Number of orders per generation. Values below 2 are raised to 2.
    pub population_size: usize,
    /// Number of generations to evolve.
    pub generations: usize,
    /// Orders competing in each tournament.
    pub tournament_size: usize,
    /// Probability that a pair of parents is recombined rather than copied.
    pub crossover_rate: f64,
    /// Probability that a child has two of its stops swapped.
    pub mutation_rate: f64,
    /// Seed of the random number generator, so runs are repeatable.
    pub seed: u64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        GeneticConfig {
            population_size: 100,
            generations: 500,
            tournament_size: 3,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            seed: 0x5EED,
        }
    }
}

/// Evolve visiting orders of `stops`, returning the shortest one found and
/// its length under `length`.
pub(crate) fn evolve(
    stops: &[usize],
    length: impl Fn(&[usize]) -> f64,
    config: &GeneticConfig,
) -> (Vec<usize>, f64) {
    if stops.len() < 2 {
        return (stops.to_vec(), length(stops));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let population_size = config.population_size.max(2);

    let mut population: Vec<Vec<usize>> = (0..population_size)
        .map(|_| {
            let mut order = stops.to_vec();
            order.shuffle(&mut rng);
            order
        })
        .collect();

    let mut best = (stops.to_vec(), f64::INFINITY);

    for generation in 0..config.generations {
        let lengths: Vec<f64> = population.iter().map(|order| length(order)).collect();
        track_best(&mut best, &population, &lengths, generation);

        let selected: Vec<&Vec<usize>> = (0..population_size)
            .map(|_| tournament(&population, &lengths, config.tournament_size, &mut rng))
            .collect();

        let mut next = Vec::with_capacity(population_size);
        for pair in selected.chunks(2) {
            match pair {
                [first, second] => {
                    let (mut a, mut b) = if rng.gen_bool(config.crossover_rate.clamp(0.0, 1.0)) {
                        let (start, end) = cut_points(first.len(), &mut rng);
                        (
                            order_crossover(first, second, start, end),
                            order_crossover(second, first, start, end),
                        )
                    } else {
                        ((*first).clone(), (*second).clone())
                    };

                    mutate(&mut a, config.mutation_rate, &mut rng);
                    mutate(&mut b, config.mutation_rate, &mut rng);
                    next.push(a);
                    next.push(b);
                }
                [single] => next.push((*single).clone()),
                _ => {}
            }
        }

        population = next;
    }

    let lengths: Vec<f64> = population.iter().map(|order| length(order)).collect();
    track_best(&mut best, &population, &lengths, config.generations);

    best
}

fn track_best(best: &mut (Vec<usize>, f64), population: &[Vec<usize>], lengths: &[f64], generation: usize) {
    for (order, &len) in population.iter().zip(lengths) {
        if len < best.1 {
            log::trace!("Generation {}: new best length {:.2}.", generation, len);
            *best = (order.clone(), len);
        }
    }
}

/// Pick the fittest of `size` distinct random members.
fn tournament<'p>(
    population: &'p [Vec<usize>],
    lengths: &[f64],
    size: usize,
    rng: &mut impl Rng,
) -> &'p Vec<usize> {
    let size = size.clamp(1, population.len());

    let winner = index::sample(rng, population.len(), size)
        .into_iter()
        .max_by(|&a, &b| fitness(lengths[a]).total_cmp(&fitness(lengths[b])))
        .unwrap_or(0);

    &population[winner]
}

fn fitness(length: f64) -> f64 {
    1.0 / (length + EPSILON)
}

/// Two distinct positions `start < end` in `0..len`; `len` must be at least 2.
fn cut_points(len: usize, rng: &mut impl Rng) -> (usize, usize) {
    let cuts = index::sample(rng, len, 2);
    let (a, b) = (cuts.index(0), cuts.index(1));

    (a.min(b), a.max(b))
}

/// Child keeping `first[start..end]` in place, with the remaining slots filled
/// in the order they appear in `second`, both read and written starting at
/// `end` and wrapping around.
pub(crate) fn order_crossover(first: &[usize], second: &[usize], start: usize, end: usize) -> Vec<usize> {
    let len = first.len();
    let kept = &first[start..end];
    let mut child: Vec<Option<usize>> = vec![None; len];

    for position in start..end {
        child[position] = Some(first[position]);
    }

    let mut slot = end;
    for offset in 0..len {
        let gene = second[(end + offset) % len];
        if !kept.contains(&gene) {
            child[slot % len] = Some(gene);
            slot += 1;
        }
    }

    child.into_iter().flatten().collect()
}

fn mutate(order: &mut [usize], rate: f64, rng: &mut impl Rng) {
    if order.len() >= 2 && rng.gen_bool(rate.clamp(0.0, 1.0)) {
        let swap = index::sample(rng, order.len(), 2);
        order.swap(swap.index(0), swap.index(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossover_keeps_segment_and_order() {
        let first = [1, 2, 3, 4, 5, 6, 7, 8];
        let second = [8, 6, 4, 2, 7, 5, 3, 1];

        let child = order_crossover(&first, &second, 2, 5);

        // 3, 4, 5 stay put; the rest follow `second` from position 5.
        assert_eq!(child, vec![2, 7, 3, 4, 5, 1, 8, 6]);
    }

    #[test]
    fn crossover_is_a_permutation() {
        let first = [0, 1, 2, 3, 4];
        let second = [4, 3, 2, 1, 0];

        for start in 0..5 {
            for end in (start + 1)..5 {
                let mut child = order_crossover(&first, &second, start, end);
                assert_eq!(&child[start..end], &first[start..end]);
                child.sort_unstable();
                assert_eq!(child, vec![0, 1, 2, 3, 4]);
            }
        }
    }

    #[test]
    fn finds_obvious_order() {
        // Stops on a line: visiting them in order is optimal.
        let stops = [3, 1, 4, 2];
        let length = |order: &[usize]| {
            let mut total = 0.0;
            let mut at = 0usize;
            for &stop in order {
                total += at.abs_diff(stop) as f64;
                at = stop;
            }
            total + at as f64
        };

        let (order, best) = evolve(&stops, length, &GeneticConfig::default());
        assert_eq!(best, 8.0);
        assert_eq!(length(&order), best);
    }

    #[test]
    fn repeatable_with_same_seed() {
        let stops = [0, 1, 2, 3, 4, 5];
        let length = |order: &[usize]| -> f64 { order.iter().enumerate().map(|(i, s)| (i * s) as f64).sum() };
        let config = GeneticConfig {
            generations: 20,
            ..GeneticConfig::default()
        };

        assert_eq!(evolve(&stops, length, &config), evolve(&stops, length, &config));
    }

    #[test]
    fn trivial_inputs() {
        let length = |order: &[usize]| order.len() as f64;

        assert_eq!(evolve(&[], length, &GeneticConfig::default()), (vec![], 0.0));
        assert_eq!(evolve(&[7], length, &GeneticConfig::default()), (vec![7], 1.0));
    }
}
