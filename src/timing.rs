//! Wall-clock instrumentation for the individual algorithms of a solver.

use std::time::{Duration, Instant};

/// The value produced by an algorithm together with how long it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    /// The algorithm's result.
    pub value: T,
    /// Wall-clock time spent producing `value`.
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    /// Elapsed time in fractional milliseconds, the unit rounds are stored
    /// with.
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Apply `f` to the value, keeping the timing.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Timed<U> {
        Timed {
            value: f(self.value),
            elapsed: self.elapsed,
        }
    }
}

impl<T, E> Timed<Result<T, E>> {
    /// Turn a timed `Result` into a `Result` of a timed value.
    pub fn transpose(self) -> Result<Timed<T>, E> {
        let elapsed = self.elapsed;
        self.value.map(|value| Timed { value, elapsed })
    }
}

/// Run `f` and record how long it took.
pub fn time<T>(f: impl FnOnce() -> T) -> Timed<T> {
    let start = Instant::now();
    let value = f();

    Timed {
        value,
        elapsed: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_keeps_elapsed() {
        let timed: Timed<Result<u32, ()>> = Timed {
            value: Ok(3),
            elapsed: Duration::from_millis(2),
        };

        let ok = timed.transpose().unwrap();
        assert_eq!(ok.value, 3);
        assert_eq!(ok.elapsed, Duration::from_millis(2));
        assert!((ok.millis() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn time_returns_value() {
        let timed = time(|| (1..=10).sum::<u32>());
        assert_eq!(timed.value, 55);
    }
}
