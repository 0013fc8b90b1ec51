pub mod delivery_problem;
pub mod load;
pub mod location;
pub mod travel_matrix;

/// Total travel time per day allowed for any one driver, in minutes.
/// Distances on the plane are travel times: one unit of Euclidean distance
/// is one minute.
pub const MAX_MINUTES_PER_DRIVER: f64 = 720.0;

/// Flat objective penalty for putting one more driver on the road.
pub const DRIVER_COST: f64 = 500.0;
