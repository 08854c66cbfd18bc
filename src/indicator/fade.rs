//! Fade-out shape for graceful indicator shutdown

use crate::constants::fade;
use std::time::Duration;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Bounded sequence of repaint intervals, each shorter than the last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeSequence {
    steps: usize,
    initial: Duration,
    factor: f64,
}

impl FadeSequence {
    /// Creates a fade sequence. `factor` is clamped into `(0, 1)` so the
    /// intervals keep shrinking.
    pub fn new(steps: usize, initial: Duration, factor: f64) -> Self {
        Self {
            steps,
            initial: initial.max(MIN_INTERVAL),
            factor: factor.clamp(0.05, 0.95),
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Sum of every interval in the sequence
    pub fn total(&self) -> Duration {
        self.intervals().sum()
    }

    /// Yields the repaint intervals in order.
    ///
    /// Intervals strictly decrease until they reach the 1 ms floor; the
    /// floor is only hit for very long sequences, which stay bounded by
    /// `steps`.
    pub fn intervals(&self) -> impl Iterator<Item = Duration> + use<> {
        let factor = self.factor;
        let mut next = self.initial;
        (0..self.steps).map(move |_| {
            let current = next;
            next = next.mul_f64(factor).max(MIN_INTERVAL);
            current
        })
    }
}

impl Default for FadeSequence {
    fn default() -> Self {
        Self::new(
            fade::STEPS,
            Duration::from_millis(fade::INITIAL_MS),
            fade::FACTOR,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_intervals_strictly_decrease() {
        let intervals: Vec<Duration> = FadeSequence::default().intervals().collect();
        assert_eq!(intervals.len(), fade::STEPS);
        for pair in intervals.windows(2) {
            assert!(pair[1] < pair[0], "{:?} should be shorter than {:?}", pair[1], pair[0]);
        }
        assert_eq!(intervals[0], Duration::from_millis(fade::INITIAL_MS));
    }

    #[test]
    fn test_total_is_bounded() {
        let fade = FadeSequence::new(3, Duration::from_millis(100), 0.5);
        assert_eq!(fade.total(), Duration::from_millis(175));
    }

    #[test]
    fn test_zero_steps_is_empty() {
        let fade = FadeSequence::new(0, Duration::from_millis(100), 0.5);
        assert_eq!(fade.intervals().count(), 0);
        assert_eq!(fade.total(), Duration::ZERO);
    }

    #[test]
    fn test_factor_clamped() {
        let fade = FadeSequence::new(2, Duration::from_millis(100), 3.0);
        let intervals: Vec<Duration> = fade.intervals().collect();
        assert!(intervals[1] < intervals[0]);
    }

    #[test]
    fn test_interval_floor() {
        let fade = FadeSequence::new(20, Duration::from_millis(2), 0.5);
        assert!(fade.intervals().all(|d| d >= MIN_INTERVAL));
    }
}
