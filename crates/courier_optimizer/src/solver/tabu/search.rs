use std::collections::VecDeque;

use jiff::{SignedDuration, Timestamp};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{Level, debug, instrument};

use crate::{
    problem::{MAX_MINUTES_PER_DRIVER, delivery_problem::DeliveryProblem},
    solver::{
        score::Score, solution::assignment::Assignment, solver_params::SolverParams,
        tabu::relocate::RelocateMove,
    },
};

/// Tabu search over the single-load relocation neighborhood. Each
/// iteration scores every neighbor of the current candidate in parallel,
/// walks to the best one that is feasible and not on the tabu list — even
/// when that is uphill — and remembers the best solution ever seen.
pub struct TabuSearch<'a> {
    problem: &'a DeliveryProblem,
    iterations: usize,
    tabu_size: usize,
    max_source_route_len: usize,
    time_limit: SignedDuration,
}

impl<'a> TabuSearch<'a> {
    pub fn new(problem: &'a DeliveryProblem, params: &SolverParams) -> Self {
        TabuSearch {
            problem,
            iterations: params.tabu_iterations,
            tabu_size: params.tabu_size,
            max_source_route_len: params.max_source_route_len,
            time_limit: params.time_limit,
        }
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn run(&self, seed: Assignment) -> Assignment {
        let mut best_solution = seed.clone();
        let mut best_score = Score::new(self.problem.total_cost(best_solution.routes()));
        let mut candidate = seed;

        let mut tabu: VecDeque<Assignment> = VecDeque::with_capacity(self.tabu_size + 1);
        let start = Timestamp::now();

        for iteration in 0..self.iterations {
            if Timestamp::now().duration_since(start) > self.time_limit {
                debug!(iteration, "time budget exhausted");
                break;
            }

            let mut moves = Vec::new();
            RelocateMove::generate(&candidate, self.max_source_route_len, |relocation| {
                moves.push(relocation);
            });

            // Every neighbor is scored on its own deep copy; the travel
            // matrix and the tabu list are shared read-only. The reduction
            // keeps the cheapest neighbor that is feasible and not tabu.
            let chosen = moves
                .par_iter()
                .map(|relocation| {
                    let neighbor = relocation.apply(&candidate);
                    let score = Score::new(self.problem.total_cost(neighbor.routes()));
                    let good = self.is_valid(&neighbor) && !tabu.contains(&neighbor);
                    (score, neighbor, good)
                })
                .filter(|(_, _, good)| *good)
                .min_by(|a, b| a.0.cmp(&b.0));

            let Some((score, neighbor, _)) = chosen else {
                debug!(iteration, "neighborhood exhausted");
                break;
            };

            if score < best_score {
                debug!(iteration, score = score.value(), "new best solution");
                best_score = score;
                best_solution = neighbor.clone();
            }

            tabu.push_back(neighbor.clone());
            if tabu.len() > self.tabu_size {
                tabu.pop_front();
            }
            candidate = neighbor;
        }

        best_solution
    }

    fn is_valid(&self, neighbor: &Assignment) -> bool {
        neighbor
            .routes()
            .iter()
            .all(|route| self.problem.route_duration(route, true) <= MAX_MINUTES_PER_DRIVER)
    }
}
