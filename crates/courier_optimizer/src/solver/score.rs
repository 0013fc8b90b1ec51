use std::cmp::Ordering;

use crate::problem::DRIVER_COST;

/// The global objective: every driver costs a flat penalty on top of the
/// minutes their route consumes.
pub fn quick_cost(drivers: usize, minutes: f64) -> Score {
    Score::new(DRIVER_COST * drivers as f64 + minutes)
}

/// A totally ordered objective value. `f64` has no `Ord`, which the
/// branch-and-bound heap and the parallel neighbor reduction both need;
/// this wrapper supplies it via `total_cmp`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Score(f64);

impl Score {
    pub const MAX: Score = Score(f64::MAX);

    pub fn new(value: f64) -> Self {
        Score(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_cost() {
        assert_eq!(quick_cost(0, 0.0), Score::new(0.0));
        assert_eq!(quick_cost(1, 10.0), Score::new(510.0));
        assert_eq!(quick_cost(3, 120.5), Score::new(1620.5));
    }

    #[test]
    fn test_score_ordering() {
        let cheap = Score::new(510.0);
        let pricey = Score::new(1020.0);

        assert!(cheap < pricey);
        assert!(cheap < Score::MAX);
        assert_eq!(cheap.cmp(&Score::new(510.0)), Ordering::Equal);

        let mut scores = [pricey, cheap, Score::new(600.0)];
        scores.sort();
        assert_eq!(scores[0], cheap);
    }
}
