use crate::problem::{delivery_problem::DeliveryProblem, load::Load, location::Location};

/// `(index, (pickup x, y), (dropoff x, y))`
pub type LoadSpec = (usize, (f64, f64), (f64, f64));

pub fn create_loads(specs: &[LoadSpec]) -> Vec<Load> {
    specs
        .iter()
        .map(|&(index, (px, py), (dx, dy))| {
            Load::new(
                index,
                Location::from_cartesian(px, py),
                Location::from_cartesian(dx, dy),
            )
        })
        .collect()
}

pub fn create_problem(specs: &[LoadSpec]) -> DeliveryProblem {
    DeliveryProblem::new(create_loads(specs))
}
