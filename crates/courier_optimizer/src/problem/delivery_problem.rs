use fxhash::FxHashSet;

use super::{
    DRIVER_COST,
    load::{Load, LoadCatalog},
    travel_matrix::TravelMatrix,
};

/// One dispatch problem: the load catalog plus the precomputed travel
/// matrix. Built once from the parsed input and shared read-only by every
/// solver stage; all distance and duration queries go through here.
pub struct DeliveryProblem {
    catalog: LoadCatalog,
    travel: TravelMatrix,
}

impl DeliveryProblem {
    pub fn new(loads: Vec<Load>) -> Self {
        let catalog = LoadCatalog::new(loads);
        let travel = TravelMatrix::from_catalog(&catalog);
        DeliveryProblem { catalog, travel }
    }

    pub fn catalog(&self) -> &LoadCatalog {
        &self.catalog
    }

    pub fn load(&self, index: usize) -> &Load {
        self.catalog.get(index)
    }

    pub fn num_loads(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn average_distance(&self) -> f64 {
        self.travel.average_distance()
    }

    /// Travel time from `i`'s dropoff to `j`'s pickup. Undefined for
    /// `i == j`; never queried that way.
    #[inline(always)]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.travel
            .get(self.catalog.ordinal(i), self.catalog.ordinal(j))
    }

    /// Time for one driver to serve `route` in order. With `include_depot`
    /// the legs from the depot to the first pickup and from the last
    /// dropoff back home are counted; without, both are omitted (partial
    /// route bookkeeping).
    pub fn route_duration(&self, route: &[usize], include_depot: bool) -> f64 {
        let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
            return 0.0;
        };

        let mut minutes = 0.0;
        if include_depot {
            minutes += self.load(first).depot_to_pickup();
            minutes += self.load(last).dropoff_to_depot();
        }
        for &index in route {
            minutes += self.load(index).service_time();
        }
        for pair in route.windows(2) {
            minutes += self.distance(pair[0], pair[1]);
        }
        minutes
    }

    /// Full objective of a complete route set: a flat per-driver penalty
    /// plus every driver's depot-to-depot duration.
    pub fn total_cost(&self, routes: &[Vec<usize>]) -> f64 {
        let minutes: f64 = routes
            .iter()
            .map(|route| self.route_duration(route, true))
            .sum();
        DRIVER_COST * routes.len() as f64 + minutes
    }

    /// Closest unexcluded pickup reachable from `i`'s dropoff. `None` when
    /// every other load is excluded.
    pub fn nearest(&self, i: usize, excluded: &FxHashSet<usize>) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for j in self.catalog.indices() {
            if j == i || excluded.contains(&j) {
                continue;
            }
            let d = self.distance(i, j);
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((j, d));
            }
        }
        best
    }

    /// Closest unexcluded load whose dropoff reaches `i`'s pickup; the
    /// prepend candidate.
    pub fn nearest_before(&self, i: usize, excluded: &FxHashSet<usize>) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for j in self.catalog.indices() {
            if j == i || excluded.contains(&j) {
                continue;
            }
            let d = self.distance(j, i);
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((j, d));
            }
        }
        best
    }

    /// The ordered pair of unexcluded loads with the least dropoff→pickup
    /// deadhead between them.
    pub fn nearest_pair(&self, excluded: &FxHashSet<usize>) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in self.catalog.indices() {
            if excluded.contains(&i) {
                continue;
            }
            for j in self.catalog.indices() {
                if j == i || excluded.contains(&j) {
                    continue;
                }
                let d = self.distance(i, j);
                if best.is_none_or(|(_, _, best_d)| d < best_d) {
                    best = Some((i, j, d));
                }
            }
        }
        best
    }

    /// The unexcluded load whose pickup is closest to the depot.
    pub fn nearest_pickup_from_depot(&self, excluded: &FxHashSet<usize>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for load in self.catalog.iter() {
            if excluded.contains(&load.index()) {
                continue;
            }
            let d = load.depot_to_pickup();
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((load.index(), d));
            }
        }
        best.map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use fxhash::FxHashSet;

    use crate::test_utils;

    #[test]
    fn test_distance_matches_geometry() {
        // identical loads: dropoff (4,0) → pickup (0,3) is 5 either way
        let problem = test_utils::create_problem(&[
            (1, (0.0, 3.0), (4.0, 0.0)),
            (2, (0.0, 3.0), (4.0, 0.0)),
        ]);

        assert_eq!(problem.distance(1, 2), 5.0);
        assert_eq!(problem.distance(2, 1), 5.0);
    }

    #[test]
    fn test_route_duration_single_load() {
        let problem = test_utils::create_problem(&[(1, (3.0, 4.0), (0.0, 0.0))]);

        assert_eq!(problem.route_duration(&[1], true), 10.0);
        assert_eq!(problem.route_duration(&[1], false), 5.0);
        assert_eq!(problem.route_duration(&[], true), 0.0);
    }

    #[test]
    fn test_total_cost_single_driver() {
        let problem = test_utils::create_problem(&[(1, (3.0, 4.0), (0.0, 0.0))]);
        assert_eq!(problem.total_cost(&[vec![1]]), 510.0);
    }

    #[test]
    fn test_total_cost_two_leg_route() {
        let problem = test_utils::create_problem(&[
            (1, (0.0, 0.0), (3.0, 4.0)),
            (2, (3.0, 5.0), (6.0, 9.0)),
        ]);

        let expected = 500.0 + 5.0 + 1.0 + 5.0 + 117.0_f64.sqrt();
        let cost = problem.total_cost(&[vec![1, 2]]);
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_queries() {
        // chain of three loads along the x axis
        let problem = test_utils::create_problem(&[
            (1, (1.0, 0.0), (2.0, 0.0)),
            (2, (3.0, 0.0), (4.0, 0.0)),
            (3, (9.0, 0.0), (10.0, 0.0)),
        ]);

        let mut excluded = FxHashSet::default();
        assert_eq!(problem.nearest(1, &excluded), Some((2, 1.0)));
        assert_eq!(problem.nearest_before(2, &excluded), Some((1, 1.0)));
        assert_eq!(problem.nearest_pair(&excluded), Some((1, 2, 1.0)));
        assert_eq!(problem.nearest_pickup_from_depot(&excluded), Some(1));

        excluded.insert(2);
        assert_eq!(problem.nearest(1, &excluded), Some((3, 7.0)));

        excluded.insert(1);
        excluded.insert(3);
        assert_eq!(problem.nearest(1, &excluded), None);
        assert_eq!(problem.nearest_pair(&excluded), None);
        assert_eq!(problem.nearest_pickup_from_depot(&excluded), None);
    }
}
