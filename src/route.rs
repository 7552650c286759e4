//! Shortest closed tour from a home city through a set of destinations, the
//! [travelling salesman problem](https://en.wikipedia.org/wiki/Travelling_salesman_problem)
//! at the scale of a single game round.
//!
//! Three methods are available:
//!  - [`RouteOptimizer::exact`] tries every visiting order, only for up to
//!    [`RouteOptimizer::exact_limit`] destinations.
//!  - [`nearest_neighbor`] always moves to the closest unvisited destination.
//!  - [`RouteOptimizer::genetic`] evolves visiting orders, see [`genetic`].
//!
//! The answer of a round is the shortest tour found by whichever methods ran.

pub mod distance;
pub mod genetic;

pub use distance::{CityPoint, DistanceMatrix, DistanceModel};
pub use genetic::GeneticConfig;

use crate::{
    error::{Error, Result},
    timing::{time, Timed},
};
use itertools::Itertools;
use rand::{seq::index, Rng};
use std::collections::BTreeSet;

/// Most destinations a generated round selects.
pub const MAX_SELECTED: usize = 8;

/// A closed tour starting and ending at home.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    /// Total length of the tour.
    pub distance: f64,
    /// City names in visiting order, starting and ending with home.
    pub path: Vec<String>,
}

/// A home city, the destinations to visit and the distances between them.
#[derive(Debug, Clone, PartialEq)]
pub struct TspInstance {
    home: CityPoint,
    selected: Vec<CityPoint>,
    distances: DistanceMatrix,
    home_index: usize,
    stops: Vec<usize>,
}

impl TspInstance {
    /// Create an instance.
    ///
    /// # Errors
    ///  - [`Error::InvalidCity`] if a destination repeats, home is also a
    ///    destination, or a city is unknown to `distances`.
    pub fn new(home: CityPoint, selected: Vec<CityPoint>, distances: DistanceMatrix) -> Result<Self> {
        let lookup = |city: &CityPoint| {
            distances
                .index_of(&city.name)
                .ok_or_else(|| Error::InvalidCity(format!("no distances for [{}]", city.name)))
        };

        let home_index = lookup(&home)?;
        let stops = selected.iter().map(lookup).collect::<Result<Vec<_>>>()?;

        let unique: BTreeSet<_> = stops.iter().collect();
        if unique.len() != stops.len() {
            return Err(Error::InvalidCity("destinations must be unique".into()));
        }
        if unique.contains(&home_index) {
            return Err(Error::InvalidCity(format!(
                "home [{}] cannot also be a destination",
                home.name
            )));
        }

        Ok(TspInstance {
            home,
            selected,
            distances,
            home_index,
            stops,
        })
    }

    /// Generate a round: `city_count` cities labelled from `A` at random
    /// positions on a 1000 × 600 map, a random home and `1..=8` random
    /// destinations.
    ///
    /// # Errors
    ///  - [`Error::InvalidCity`] unless `2 <= city_count <= 26`.
    pub fn random(city_count: usize, model: DistanceModel, rng: &mut impl Rng) -> Result<Self> {
        if !(2..=26).contains(&city_count) {
            return Err(Error::InvalidCity(format!(
                "cannot generate a round with {} cities",
                city_count
            )));
        }

        let cities: Vec<CityPoint> = (b'A'..)
            .take(city_count)
            .map(|label| {
                CityPoint::new(
                    char::from(label).to_string(),
                    rng.gen_range(50.0..950.0),
                    rng.gen_range(50.0..550.0),
                )
            })
            .collect();

        let distances = match model {
            DistanceModel::Euclidean => DistanceMatrix::euclidean(&cities)?,
            DistanceModel::RandomIntegers => {
                DistanceMatrix::random(cities.iter().map(|city| city.name.clone()), rng)?
            }
        };

        let home = rng.gen_range(0..city_count);
        let wanted = rng.gen_range(1..=MAX_SELECTED.min(city_count - 1));
        let mut picked: Vec<usize> = index::sample(rng, city_count - 1, wanted)
            .into_iter()
            .map(|i| if i >= home { i + 1 } else { i })
            .collect();
        picked.sort_unstable();

        let selected = picked.iter().map(|&i| cities[i].clone()).collect();
        Self::new(cities[home].clone(), selected, distances)
    }

    /// The home city.
    pub fn home(&self) -> &CityPoint {
        &self.home
    }

    /// The destinations.
    pub fn selected(&self) -> &[CityPoint] {
        &self.selected
    }

    /// The distance oracle.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Length of `home -> order[0] -> ... -> order[last] -> home`, with
    /// `order` given as distance matrix indices.
    fn tour_length(&self, order: &[usize]) -> f64 {
        let mut at = self.home_index;
        let mut total = 0.0;
        for &stop in order {
            total += self.distances.get(at, stop);
            at = stop;
        }

        total + self.distances.get(at, self.home_index)
    }

    fn tour(&self, order: &[usize]) -> Tour {
        let names = self.distances.names();
        let path = std::iter::once(self.home_index)
            .chain(order.iter().copied())
            .chain(std::iter::once(self.home_index))
            .map(|index| names[index].clone())
            .collect();

        Tour {
            distance: self.tour_length(order),
            path,
        }
    }

    /// Length of a tour given by city names, which must start and end at
    /// home and visit every destination exactly once.
    ///
    /// # Errors
    ///  - [`Error::InvalidCity`] if the route is not such a tour.
    pub fn route_length(&self, path: &[&str]) -> Result<f64> {
        let home = self.home.name.as_str();
        let inner = match path {
            [first, inner @ .., last] if *first == home && *last == home => inner,
            _ => {
                return Err(Error::InvalidCity(format!(
                    "route must start and end at [{}]",
                    home
                )))
            }
        };

        let order = inner
            .iter()
            .map(|name| {
                self.distances
                    .index_of(name)
                    .filter(|index| self.stops.contains(index))
                    .ok_or_else(|| Error::InvalidCity(format!("[{}] is not a destination", name)))
            })
            .collect::<Result<Vec<_>>>()?;

        let visited: BTreeSet<_> = order.iter().collect();
        if visited.len() != order.len() || order.len() != self.stops.len() {
            return Err(Error::InvalidCity(
                "route must visit every destination exactly once".into(),
            ));
        }

        Ok(self.tour_length(&order))
    }
}

/// Nearest neighbour tour: from home, repeatedly move to the closest
/// unvisited destination, preferring the earliest listed on ties.
pub fn nearest_neighbor(instance: &TspInstance) -> Tour {
    let mut remaining = instance.stops.clone();
    let mut order = Vec::with_capacity(remaining.len());
    let mut at = instance.home_index;

    while !remaining.is_empty() {
        let mut closest = 0;
        for (position, &stop) in remaining.iter().enumerate().skip(1) {
            if instance.distances.get(at, stop) < instance.distances.get(at, remaining[closest]) {
                closest = position;
            }
        }

        at = remaining.remove(closest);
        order.push(at);
    }

    instance.tour(&order)
}

/// Results of every method that ran on an instance.
#[derive(Debug, Clone)]
pub struct RouteReport {
    /// The shortest tour among the methods that ran.
    pub best: Tour,
    /// The exhaustive search, or `None` when the instance had more
    /// destinations than the exact limit.
    pub exact: Option<Timed<Tour>>,
    /// The nearest neighbour tour.
    pub nearest_neighbor: Timed<Tour>,
    /// The genetic tour.
    pub genetic: Timed<Tour>,
}

/// Runs the route methods with fixed tuning.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RouteOptimizer {
    /// Largest number of destinations the exhaustive search accepts.
    pub exact_limit: usize,
    /// Tuning of the genetic heuristic.
    pub genetic: GeneticConfig,
}

impl Default for RouteOptimizer {
    fn default() -> Self {
        RouteOptimizer {
            exact_limit: MAX_SELECTED,
            genetic: GeneticConfig::default(),
        }
    }
}

impl RouteOptimizer {
    /// The shortest tour over all visiting orders, or `None` if the instance
    /// has more than [`Self::exact_limit`] destinations.
    pub fn exact(&self, instance: &TspInstance) -> Option<Tour> {
        let stops = &instance.stops;
        if stops.len() > self.exact_limit {
            log::debug!(
                "Skipping exact search over {} destinations (limit {}).",
                stops.len(),
                self.exact_limit
            );
            return None;
        }

        let mut best: Option<(f64, Vec<usize>)> = None;
        for order in stops.iter().copied().permutations(stops.len()) {
            let length = instance.tour_length(&order);
            if best.as_ref().map_or(true, |(shortest, _)| length < *shortest) {
                best = Some((length, order));
            }
        }

        best.map(|(_, order)| instance.tour(&order))
    }

    /// The shortest tour found by the genetic heuristic.
    pub fn genetic(&self, instance: &TspInstance) -> Tour {
        let (order, _) = genetic::evolve(
            &instance.stops,
            |order| instance.tour_length(order),
            &self.genetic,
        );

        instance.tour(&order)
    }

    /// Run every applicable method and report the shortest tour.
    pub fn solve(&self, instance: &TspInstance) -> RouteReport {
        let timed = time(|| self.exact(instance));
        let exact = timed.value.map(|tour| Timed {
            value: tour,
            elapsed: timed.elapsed,
        });
        let nearest_neighbor = time(|| nearest_neighbor(instance));
        let genetic = time(|| self.genetic(instance));

        let best = exact
            .iter()
            .chain([&nearest_neighbor, &genetic])
            .map(|timed| &timed.value)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .unwrap_or(&nearest_neighbor.value)
            .clone();

        log::debug!(
            "Route from [{}] through {} destinations: {:.2} (exact {}, nearest neighbour {:.2}, genetic {:.2}).",
            instance.home.name,
            instance.stops.len(),
            best.distance,
            exact
                .as_ref()
                .map_or_else(|| "skipped".to_owned(), |timed| format!("{:.2}", timed.value.distance)),
            nearest_neighbor.value.distance,
            genetic.value.distance
        );

        RouteReport {
            best,
            exact,
            nearest_neighbor,
            genetic,
        }
    }

    /// The shortest tour length found across the methods that ran.
    pub fn optimal_tour(&self, instance: &TspInstance) -> Tour {
        self.solve(instance).best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn square() -> TspInstance {
        let cities = vec![
            CityPoint::new("H", 0.0, 0.0),
            CityPoint::new("A", 0.0, 10.0),
            CityPoint::new("B", 10.0, 10.0),
            CityPoint::new("C", 10.0, 0.0),
        ];
        let distances = DistanceMatrix::euclidean(&cities).unwrap();

        // Listed so that visiting them in order crosses the square.
        TspInstance::new(
            cities[0].clone(),
            vec![cities[2].clone(), cities[1].clone(), cities[3].clone()],
            distances,
        )
        .unwrap()
    }

    #[test]
    fn exact_finds_perimeter() {
        let tour = RouteOptimizer::default().exact(&square()).unwrap();

        assert!((tour.distance - 40.0).abs() < 1e-9);
        assert_eq!(tour.path.first().map(String::as_str), Some("H"));
        assert_eq!(tour.path.last().map(String::as_str), Some("H"));
        assert_eq!(tour.path.len(), 5);
    }

    #[test]
    fn heuristics_on_square() {
        let instance = square();

        let nearest = nearest_neighbor(&instance);
        assert_eq!(nearest.path, vec!["H", "A", "B", "C", "H"]);
        assert!((nearest.distance - 40.0).abs() < 1e-9);

        let genetic = RouteOptimizer::default().genetic(&instance);
        assert!((genetic.distance - 40.0).abs() < 1e-9);
    }

    #[test]
    fn nearest_neighbor_ties_take_first_listed() {
        let distances = DistanceMatrix::from_fn(["H", "X", "Y"], |_, _| 5.0).unwrap();
        let city = |name: &str| CityPoint::new(name, 0.0, 0.0);
        let instance =
            TspInstance::new(city("H"), vec![city("Y"), city("X")], distances).unwrap();

        assert_eq!(nearest_neighbor(&instance).path, vec!["H", "Y", "X", "H"]);
    }

    #[test]
    fn exact_skipped_above_limit() {
        let optimizer = RouteOptimizer {
            exact_limit: 2,
            ..RouteOptimizer::default()
        };

        let report = optimizer.solve(&square());
        assert!(report.exact.is_none());
        assert!(report.best.distance <= report.nearest_neighbor.value.distance);
        assert!(report.best.distance <= report.genetic.value.distance);
    }

    #[test]
    fn degenerate_selections() {
        let cities = vec![CityPoint::new("H", 0.0, 0.0), CityPoint::new("A", 3.0, 4.0)];
        let distances = DistanceMatrix::euclidean(&cities).unwrap();

        let stay_home = TspInstance::new(cities[0].clone(), vec![], distances.clone()).unwrap();
        let report = RouteOptimizer::default().solve(&stay_home);
        assert_eq!(report.best.distance, 0.0);
        assert_eq!(report.best.path, vec!["H", "H"]);

        let one = TspInstance::new(cities[0].clone(), vec![cities[1].clone()], distances).unwrap();
        let report = RouteOptimizer::default().solve(&one);
        assert_eq!(report.best.distance, 10.0);
        assert_eq!(report.best.path, vec!["H", "A", "H"]);
    }

    #[test]
    fn rejects_inconsistent_cities() {
        let cities = vec![CityPoint::new("H", 0.0, 0.0), CityPoint::new("A", 3.0, 4.0)];
        let distances = DistanceMatrix::euclidean(&cities).unwrap();

        assert!(matches!(
            TspInstance::new(cities[0].clone(), vec![cities[0].clone()], distances.clone()),
            Err(Error::InvalidCity(_))
        ));
        assert!(matches!(
            TspInstance::new(
                cities[0].clone(),
                vec![cities[1].clone(), cities[1].clone()],
                distances.clone()
            ),
            Err(Error::InvalidCity(_))
        ));
        assert!(matches!(
            TspInstance::new(cities[0].clone(), vec![CityPoint::new("Z", 1.0, 1.0)], distances),
            Err(Error::InvalidCity(_))
        ));
    }

    #[test]
    fn route_length_of_player_route() {
        let instance = square();

        assert!((instance.route_length(&["H", "A", "B", "C", "H"]).unwrap() - 40.0).abs() < 1e-9);
        assert!(instance.route_length(&["H", "A", "B", "H"]).is_err());
        assert!(instance.route_length(&["A", "B", "C", "H", "A"]).is_err());
        assert!(instance.route_length(&["H", "A", "A", "C", "H"]).is_err());
    }

    #[test]
    fn random_rounds() {
        let mut rng = StdRng::seed_from_u64(9);

        for model in [DistanceModel::Euclidean, DistanceModel::RandomIntegers] {
            for _ in 0..10 {
                let instance = TspInstance::random(10, model, &mut rng).unwrap();
                assert!((1..=MAX_SELECTED).contains(&instance.selected().len()));
                assert!(instance
                    .selected()
                    .iter()
                    .all(|city| city.name != instance.home().name));
            }
        }

        assert!(TspInstance::random(1, DistanceModel::Euclidean, &mut rng).is_err());
    }
}
