use geo::{Distance, Euclidean};

/// A point on the dispatch plane with a precomputed travel time to or from
/// the depot. Every driver starts and ends the day at the depot, so the
/// depot leg is queried on every feasibility check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    point: geo::Point,
    depot_distance: f64,
}

impl Location {
    pub fn from_cartesian(x: f64, y: f64) -> Self {
        let point = geo::Point::new(x, y);
        Location {
            point,
            depot_distance: Euclidean.distance(point, geo::Point::new(0.0, 0.0)),
        }
    }

    /// The origin; all routes open and close here.
    pub fn depot() -> Self {
        Location::from_cartesian(0.0, 0.0)
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    pub fn euclidean_distance(&self, to: &Location) -> f64 {
        Euclidean.distance(self.point, to.point)
    }

    /// Cached Euclidean distance to the depot.
    pub fn depot_distance(&self) -> f64 {
        self.depot_distance
    }
}
