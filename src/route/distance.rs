//! Distance oracles between named cities.

use crate::error::{Error, Result};
use rand::Rng;
use std::collections::BTreeSet;

/// Range of the integer distances drawn by [`DistanceMatrix::random`].
pub const RANDOM_DISTANCES: std::ops::RangeInclusive<u32> = 50..=100;

/// A named city. The position is only used by [`DistanceMatrix::euclidean`].
#[derive(Debug, Clone, PartialEq)]
pub struct CityPoint {
    /// Unique label.
    pub name: String,
    /// `(x, y)` coordinates.
    pub position: (f64, f64),
}

impl CityPoint {
    /// Create a city at the given position.
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        CityPoint {
            name: name.into(),
            position: (x, y),
        }
    }

    /// Straight line distance to `other`.
    pub fn euclidean_to(&self, other: &CityPoint) -> f64 {
        let (dx, dy) = (
            self.position.0 - other.position.0,
            self.position.1 - other.position.1,
        );

        dx.hypot(dy)
    }
}

/// How distances between generated cities are chosen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DistanceModel {
    /// Straight line distance between positions. Satisfies the triangle
    /// inequality.
    #[default]
    Euclidean,
    /// An independent integer from [`RANDOM_DISTANCES`] per pair of cities.
    /// May break the triangle inequality.
    RandomIntegers,
}

/// Symmetric, non-negative distances between a fixed set of cities, with
/// zero distance from a city to itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    names: Vec<String>,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix from `distance(a, b)`, called once for every
    /// unordered pair `a < b` of indices into `names`.
    ///
    /// # Errors
    ///  - [`Error::InvalidCity`] if a name repeats.
    ///  - [`Error::InvalidDistance`] if a distance is negative or not finite.
    pub fn from_fn(
        names: impl IntoIterator<Item = impl Into<String>>,
        mut distance: impl FnMut(usize, usize) -> f64,
    ) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        let unique: BTreeSet<_> = names.iter().collect();
        if unique.len() != names.len() {
            return Err(Error::InvalidCity("city names must be unique".into()));
        }

        let n = names.len();
        let mut values = vec![0.0; n * n];
        for a in 0..n {
            for b in (a + 1)..n {
                let d = distance(a, b);
                if !d.is_finite() || d < 0.0 {
                    return Err(Error::InvalidDistance(format!(
                        "{} between [{}] and [{}]",
                        d, names[a], names[b]
                    )));
                }
                values[a * n + b] = d;
                values[b * n + a] = d;
            }
        }

        Ok(DistanceMatrix { names, values })
    }

    /// Straight line distances between the given cities.
    pub fn euclidean(cities: &[CityPoint]) -> Result<Self> {
        Self::from_fn(cities.iter().map(|city| city.name.clone()), |a, b| {
            cities[a].euclidean_to(&cities[b])
        })
    }

    /// An independent random integer distance for every pair of cities.
    pub fn random(names: impl IntoIterator<Item = impl Into<String>>, rng: &mut impl Rng) -> Result<Self> {
        Self::from_fn(names, |_, _| f64::from(rng.gen_range(RANDOM_DISTANCES)))
    }

    /// City names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of a city by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|known| known == name)
    }

    /// Distance between two cities by index.
    ///
    /// # Panics
    ///  - If either index is out of range.
    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.values[a * self.names.len() + b]
    }

    /// Distance between two cities by name, if both are known.
    pub fn distance(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.get(self.index_of(a)?, self.index_of(b)?))
    }
}
