use super::load::LoadCatalog;

/// Precomputed travel times from every load's dropoff to every other
/// load's pickup, in a flat row-major layout: `index = from * n + to`,
/// addressed by catalog ordinals. The diagonal is meaningless and is
/// never read.
pub struct TravelMatrix {
    distances: Vec<f64>,
    num_loads: usize,
    average_distance: f64,
}

impl TravelMatrix {
    pub fn from_catalog(catalog: &LoadCatalog) -> Self {
        let num_loads = catalog.len();
        let mut distances = vec![0.0; num_loads * num_loads];
        let mut total = 0.0;

        for (i, from) in catalog.iter().enumerate() {
            for (j, to) in catalog.iter().enumerate() {
                if i == j {
                    continue;
                }
                let d = from.dropoff().euclidean_distance(to.pickup());
                distances[i * num_loads + j] = d;
                total += d;
            }
        }

        let ordered_pairs = num_loads * num_loads.saturating_sub(1);
        let average_distance = if ordered_pairs == 0 {
            0.0
        } else {
            total / ordered_pairs as f64
        };

        TravelMatrix {
            distances,
            num_loads,
            average_distance,
        }
    }

    #[inline(always)]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        debug_assert_ne!(from, to, "dropoff→pickup distance of a load to itself");
        self.distances[from * self.num_loads + to]
    }

    pub fn num_loads(&self) -> usize {
        self.num_loads
    }

    /// Mean dropoff→pickup distance over all ordered pairs; cached for the
    /// branch-and-bound travel estimate.
    pub fn average_distance(&self) -> f64 {
        self.average_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{load::Load, location::Location};

    fn identical_pair() -> LoadCatalog {
        LoadCatalog::new(vec![
            Load::new(
                1,
                Location::from_cartesian(0.0, 0.0),
                Location::from_cartesian(3.0, 4.0),
            ),
            Load::new(
                2,
                Location::from_cartesian(0.0, 0.0),
                Location::from_cartesian(3.0, 4.0),
            ),
        ])
    }

    #[test]
    fn test_stored_distances() {
        let catalog = identical_pair();
        let matrix = TravelMatrix::from_catalog(&catalog);

        // dropoff (3,4) → pickup (0,0), both directions
        assert_eq!(matrix.get(0, 1), 5.0);
        assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
    }

    #[test]
    fn test_average_distance() {
        let catalog = identical_pair();
        let matrix = TravelMatrix::from_catalog(&catalog);
        assert_eq!(matrix.average_distance(), 5.0);
    }

    #[test]
    fn test_average_distance_degenerate() {
        let single = LoadCatalog::new(vec![Load::new(
            1,
            Location::from_cartesian(1.0, 0.0),
            Location::from_cartesian(2.0, 0.0),
        )]);
        assert_eq!(TravelMatrix::from_catalog(&single).average_distance(), 0.0);

        let empty = LoadCatalog::new(Vec::new());
        assert_eq!(TravelMatrix::from_catalog(&empty).average_distance(), 0.0);
    }
}
