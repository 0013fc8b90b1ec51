use fxhash::FxHashMap;

use super::location::Location;

/// A pickup/dropoff pair; the atomic unit of work. The pickup→dropoff
/// travel time is precomputed so hot solver paths never touch geometry.
#[derive(Debug, Clone)]
pub struct Load {
    index: usize,
    pickup: Location,
    dropoff: Location,
    service_time: f64,
}

impl Load {
    pub fn new(index: usize, pickup: Location, dropoff: Location) -> Self {
        let service_time = pickup.euclidean_distance(&dropoff);
        Load {
            index,
            pickup,
            dropoff,
            service_time,
        }
    }

    /// The user-visible identifier from the input. Indices start at 1.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pickup(&self) -> &Location {
        &self.pickup
    }

    pub fn dropoff(&self) -> &Location {
        &self.dropoff
    }

    /// Travel time of the pickup→dropoff leg.
    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    /// Travel time from the depot to the pickup.
    pub fn depot_to_pickup(&self) -> f64 {
        self.pickup.depot_distance()
    }

    /// Travel time from the dropoff back to the depot.
    pub fn dropoff_to_depot(&self) -> f64 {
        self.dropoff.depot_distance()
    }
}

/// All loads of one problem, in input order, with O(1) lookup by index.
/// Built once per run and immutable afterwards.
pub struct LoadCatalog {
    loads: Vec<Load>,
    ordinals: FxHashMap<usize, usize>,
}

impl LoadCatalog {
    pub fn new(loads: Vec<Load>) -> Self {
        let ordinals = loads
            .iter()
            .enumerate()
            .map(|(ordinal, load)| (load.index(), ordinal))
            .collect::<FxHashMap<_, _>>();
        debug_assert_eq!(ordinals.len(), loads.len(), "duplicate load index");

        LoadCatalog { loads, ordinals }
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    pub fn get(&self, index: usize) -> &Load {
        &self.loads[self.ordinals[&index]]
    }

    /// Position of `index` in input order; the travel matrix is addressed
    /// by these ordinals.
    pub fn ordinal(&self, index: usize) -> usize {
        self.ordinals[&index]
    }

    /// Iteration follows input order, which makes every argmin over the
    /// catalog deterministic for a fixed input.
    pub fn iter(&self) -> impl Iterator<Item = &Load> {
        self.loads.iter()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.loads.iter().map(Load::index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_depot_to_pickup() {
        let load = Load::new(
            1,
            Location::from_cartesian(0.0, 0.0),
            Location::from_cartesian(3.0, 4.0),
        );
        assert_eq!(load.depot_to_pickup(), 0.0);
    }

    #[test]
    fn test_load_dropoff_to_depot() {
        let load = Load::new(
            1,
            Location::from_cartesian(0.0, 0.0),
            Location::from_cartesian(3.0, 4.0),
        );
        assert_eq!(load.dropoff_to_depot(), 5.0);
    }

    #[test]
    fn test_service_time_precomputed() {
        let load = Load::new(
            7,
            Location::from_cartesian(0.0, 3.0),
            Location::from_cartesian(4.0, 0.0),
        );
        assert_eq!(load.service_time(), 5.0);

        let stationary = Load::new(
            8,
            Location::from_cartesian(2.0, 2.0),
            Location::from_cartesian(2.0, 2.0),
        );
        assert_eq!(stationary.service_time(), 0.0);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = LoadCatalog::new(vec![
            Load::new(
                3,
                Location::from_cartesian(1.0, 0.0),
                Location::from_cartesian(2.0, 0.0),
            ),
            Load::new(
                11,
                Location::from_cartesian(0.0, 1.0),
                Location::from_cartesian(0.0, 2.0),
            ),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(11).index(), 11);
        assert_eq!(catalog.ordinal(3), 0);
        assert_eq!(catalog.ordinal(11), 1);
        assert_eq!(catalog.indices().collect::<Vec<_>>(), vec![3, 11]);
    }
}
