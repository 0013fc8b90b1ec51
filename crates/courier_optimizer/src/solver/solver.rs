use jiff::Timestamp;
use tracing::{debug, instrument};

use crate::{
    problem::{delivery_problem::DeliveryProblem, load::Load},
    solver::{
        branch_bound,
        construction::greedy,
        solution::assignment::Assignment,
        solver_params::{SearchStrategy, SolverParams},
        tabu::search::TabuSearch,
    },
};

/// The pipeline façade: builds the problem once, then runs the configured
/// composition — a greedy seed refined by tabu search, or best-first
/// branch and bound (which seeds itself with the same greedy pass).
pub struct Solver {
    problem: DeliveryProblem,
    params: SolverParams,
}

impl Solver {
    pub fn new(loads: Vec<Load>, params: SolverParams) -> Self {
        Solver {
            problem: DeliveryProblem::new(loads),
            params,
        }
    }

    pub fn problem(&self) -> &DeliveryProblem {
        &self.problem
    }

    #[instrument(skip_all)]
    pub fn solve(&self) -> Assignment {
        if self.problem.is_empty() {
            return Assignment::new();
        }

        let started = Timestamp::now();
        let assignment = match self.params.strategy {
            SearchStrategy::Tabu => {
                let (seed, seed_minutes) = greedy::assign_routes(&self.problem);
                debug!(
                    seed_minutes,
                    drivers = seed.driver_count(),
                    "greedy seed constructed"
                );
                TabuSearch::new(&self.problem, &self.params).run(seed)
            }
            SearchStrategy::BranchBound => {
                branch_bound::assign_routes(&self.problem, Some(self.params.time_limit))
            }
        };

        debug!(
            elapsed = ?Timestamp::now().duration_since(started),
            drivers = assignment.driver_count(),
            cost = self.problem.total_cost(assignment.routes()),
            "solve finished"
        );
        assignment
    }
}

/// Solves with the default composition (greedy seed, tabu refinement).
pub fn solve_loads(loads: Vec<Load>) -> Assignment {
    Solver::new(loads, SolverParams::default()).solve()
}
