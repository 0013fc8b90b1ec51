use jiff::SignedDuration;

/// Which refinement runs on top of the greedy seed. Both take the same
/// input and produce the same output shape, so they swap freely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStrategy {
    Tabu,
    BranchBound,
}

#[derive(Clone, Debug)]
pub struct SolverParams {
    pub strategy: SearchStrategy,

    /// Wall-clock budget for the refinement stage. Exhausting it is normal
    /// termination: the best solution so far comes back.
    pub time_limit: SignedDuration,

    pub tabu_size: usize,
    pub tabu_iterations: usize,

    /// Routes longer than this are never relocation sources; moving loads
    /// out of long routes rarely frees a driver.
    pub max_source_route_len: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Tabu,
            time_limit: SignedDuration::from_secs(29),
            tabu_size: 20,
            tabu_iterations: 90,
            max_source_route_len: 5,
        }
    }
}
