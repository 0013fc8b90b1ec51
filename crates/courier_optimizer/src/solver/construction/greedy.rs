use fxhash::FxHashSet;
use tracing::{Level, instrument};

use crate::{
    problem::{MAX_MINUTES_PER_DRIVER, delivery_problem::DeliveryProblem},
    solver::solution::assignment::Assignment,
};

/// Nearest-pickup-first constructive heuristic. One driver at a time:
/// always serve the unassigned load whose pickup is closest to the
/// driver's current position, and close the driver when the next load
/// plus a depot return would overrun the day.
///
/// Returns the assignment and the minutes it consumed, where the final
/// depot-return legs are NOT included. Consumers that need the objective
/// must re-derive it from the assignment via
/// [`DeliveryProblem::total_cost`].
#[instrument(skip_all, level = Level::DEBUG)]
pub fn assign_routes(problem: &DeliveryProblem) -> (Assignment, f64) {
    let mut remaining: FxHashSet<usize> = problem.catalog().indices().collect();
    let mut assignment = Assignment::new();
    let mut total_minutes = 0.0;

    while !remaining.is_empty() {
        let mut route: Vec<usize> = Vec::new();
        let mut minutes = 0.0;
        let mut current_dropoff: Option<usize> = None;

        loop {
            let next = nearest_remaining(problem, &remaining, current_dropoff);
            let Some((index, approach)) = next else {
                break;
            };

            let load = problem.load(index);
            let added = approach + load.service_time();

            // Inputs are required to keep every load solo-serviceable, so a
            // fresh driver always takes its first load.
            if !route.is_empty()
                && minutes + added + load.dropoff_to_depot() > MAX_MINUTES_PER_DRIVER
            {
                break;
            }

            route.push(index);
            remaining.remove(&index);
            minutes += added;
            current_dropoff = Some(index);
        }

        total_minutes += minutes;
        assignment.push_route(route);
    }

    (assignment, total_minutes)
}

/// Closest unassigned pickup from the driver's position: the depot when
/// the route is still empty, the previous dropoff otherwise. Scans in
/// catalog order, which keeps ties deterministic.
fn nearest_remaining(
    problem: &DeliveryProblem,
    remaining: &FxHashSet<usize>,
    current_dropoff: Option<usize>,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for load in problem.catalog().iter() {
        let index = load.index();
        if !remaining.contains(&index) {
            continue;
        }
        let approach = match current_dropoff {
            None => load.depot_to_pickup(),
            Some(previous) => problem.distance(previous, index),
        };
        if best.is_none_or(|(_, best_d)| approach < best_d) {
            best = Some((index, approach));
        }
    }
    best
}
