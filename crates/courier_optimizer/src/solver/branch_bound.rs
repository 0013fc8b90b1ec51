use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use fxhash::FxHashSet;
use jiff::{SignedDuration, Timestamp};
use tracing::{Level, debug, instrument};

use crate::{
    problem::{MAX_MINUTES_PER_DRIVER, delivery_problem::DeliveryProblem},
    solver::{
        construction::greedy,
        score::{Score, quick_cost},
        solution::assignment::Assignment,
    },
};

/// Best-first branch and bound over partial assignments. Routes grow from
/// both ends: the driver's first pair is the cheapest dropoff→pickup pair
/// still open, and each expansion appends behind the last load, prepends
/// before the first, or does both at once. A greedy solution seeds the
/// incumbent so pruning bites from the first pop.
///
/// The lower-bound estimator is deliberately optimistic but not a true
/// lower bound (average-distance travel estimate, coarse driver count), so
/// the search is a high-quality heuristic rather than an exact optimizer.
pub struct BranchBoundSolver<'a> {
    problem: &'a DeliveryProblem,
    time_limit: Option<SignedDuration>,
    best_cost: Score,
    best_routes: Assignment,
}

/// A partial assignment on the queue. `total_minutes` excludes every depot
/// leg in this growth scheme; the bound re-adds the current driver's
/// depot-to-first-pickup leg and the completion step adds the final
/// driver's two legs.
struct SearchNode {
    lower_bound: Score,
    visited: FxHashSet<usize>,
    assignment: Assignment,
    driver: usize,
    total_minutes: f64,
    can_prepend: bool,
    can_append: bool,
}

impl SearchNode {
    /// A deep copy for branching; nested routes never alias across nodes.
    fn child(&self) -> SearchNode {
        SearchNode {
            lower_bound: self.lower_bound,
            visited: self.visited.clone(),
            assignment: self.assignment.clone(),
            driver: self.driver,
            total_minutes: self.total_minutes,
            can_prepend: self.can_prepend,
            can_append: self.can_append,
        }
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.lower_bound == other.lower_bound
    }
}

impl Eq for SearchNode {}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lower_bound.cmp(&other.lower_bound)
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Entry point: solve `problem` within the optional time budget.
pub fn assign_routes(problem: &DeliveryProblem, time_limit: Option<SignedDuration>) -> Assignment {
    BranchBoundSolver::new(problem, time_limit).solve()
}

impl<'a> BranchBoundSolver<'a> {
    pub fn new(problem: &'a DeliveryProblem, time_limit: Option<SignedDuration>) -> Self {
        // The greedy solution is the incumbent until the search beats it.
        let (best_routes, minutes) = greedy::assign_routes(problem);
        let best_cost = quick_cost(best_routes.driver_count(), minutes);

        BranchBoundSolver {
            problem,
            time_limit,
            best_cost,
            best_routes,
        }
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn solve(mut self) -> Assignment {
        if self.problem.is_empty() {
            return Assignment::new();
        }

        let start = Timestamp::now();
        let mut queue: BinaryHeap<Reverse<SearchNode>> = BinaryHeap::new();

        // A zero bound keeps the root ahead of the staleness cut; it is the
        // only entry, so pop order is unaffected.
        let mut root_assignment = Assignment::new();
        root_assignment.push_route(Vec::new());
        queue.push(Reverse(SearchNode {
            lower_bound: Score::new(0.0),
            visited: FxHashSet::default(),
            assignment: root_assignment,
            driver: 0,
            total_minutes: 0.0,
            can_prepend: true,
            can_append: true,
        }));

        let mut pops = 0_usize;
        while let Some(Reverse(node)) = queue.pop() {
            pops += 1;
            if let Some(limit) = self.time_limit
                && Timestamp::now().duration_since(start) > limit
            {
                debug!(pops, "time budget exhausted, returning incumbent");
                break;
            }

            // Stale: the incumbent improved since this node was pushed.
            if node.lower_bound >= self.best_cost {
                continue;
            }

            if node.visited.len() == self.problem.num_loads() {
                self.complete(node);
            } else {
                self.expand(node, &mut queue);
            }
        }

        debug!(
            pops,
            cost = self.best_cost.value(),
            drivers = self.best_routes.driver_count(),
            "search finished"
        );
        self.best_routes
    }

    /// A complete candidate: account for the final driver's depot legs,
    /// then challenge the incumbent.
    fn complete(&mut self, mut node: SearchNode) {
        let route = node.assignment.route(node.driver);
        if let (Some(&first), Some(&last)) = (route.first(), route.last()) {
            node.total_minutes += self.problem.load(first).depot_to_pickup();
            node.total_minutes += self.problem.load(last).dropoff_to_depot();
        }
        self.post_result(node.total_minutes, node.assignment);
    }

    fn post_result(&mut self, minutes: f64, routes: Assignment) {
        let cost = quick_cost(routes.driver_count(), minutes);
        if cost < self.best_cost {
            debug!(cost = cost.value(), "new incumbent");
            self.best_cost = cost;
            self.best_routes = routes;
        }
    }

    fn expand(&mut self, node: SearchNode, queue: &mut BinaryHeap<Reverse<SearchNode>>) {
        if node.assignment.route(node.driver).is_empty() {
            self.open_route(node, queue);
        } else {
            self.extend_route(node, queue);
        }
    }

    /// The current driver is fresh: start with the pair of open loads with
    /// the least deadhead between them, or fall back to the single load
    /// closest to the depot when no pair fits in a day.
    fn open_route(&mut self, node: SearchNode, queue: &mut BinaryHeap<Reverse<SearchNode>>) {
        if let Some((drop, pick, _)) = self.problem.nearest_pair(&node.visited)
            && self.problem.route_duration(&[drop, pick], true) <= MAX_MINUTES_PER_DRIVER
        {
            let mut child = node.child();
            *child.assignment.route_mut(child.driver) = vec![drop, pick];
            child.visited.insert(drop);
            child.visited.insert(pick);
            child.total_minutes += self.problem.route_duration(&[drop, pick], false);
            child.can_prepend = true;
            child.can_append = true;
            self.push_if_promising(child, queue);
            return;
        }

        // Only one load left, or the closest pair overruns the day.
        let Some(single) = self.problem.nearest_pickup_from_depot(&node.visited) else {
            return;
        };
        let mut child = node.child();
        child.assignment.route_mut(child.driver).push(single);
        child.visited.insert(single);
        child.total_minutes += self.problem.load(single).service_time();
        child.can_prepend = false;
        child.can_append = true;
        self.push_if_promising(child, queue);
    }

    /// The current driver has a route: try appending behind its last load,
    /// prepending before its first, and both at once. When no extension
    /// survives, close the driver and open the next one.
    fn extend_route(&mut self, node: SearchNode, queue: &mut BinaryHeap<Reverse<SearchNode>>) {
        let route = node.assignment.route(node.driver);
        let first = route[0];
        let last = *route.last().expect("non-empty route");

        let mut appended: Option<(usize, f64)> = None;
        if node.can_append
            && let Some((next, deadhead)) = self.problem.nearest(last, &node.visited)
        {
            let mut extended = route.to_vec();
            extended.push(next);
            if self.problem.route_duration(&extended, true) <= MAX_MINUTES_PER_DRIVER {
                let mut child = node.child();
                *child.assignment.route_mut(child.driver) = extended;
                child.visited.insert(next);
                child.total_minutes += deadhead + self.problem.load(next).service_time();
                child.can_prepend = false;
                child.can_append = true;
                if self.push_if_promising(child, queue) {
                    appended = Some((next, deadhead));
                }
            }
        }

        let mut prepended: Option<(usize, f64)> = None;
        if node.can_prepend
            && let Some((previous, deadhead)) = self.problem.nearest_before(first, &node.visited)
        {
            let mut extended = Vec::with_capacity(route.len() + 1);
            extended.push(previous);
            extended.extend_from_slice(route);
            if self.problem.route_duration(&extended, true) <= MAX_MINUTES_PER_DRIVER {
                let mut child = node.child();
                *child.assignment.route_mut(child.driver) = extended;
                child.visited.insert(previous);
                child.total_minutes += deadhead + self.problem.load(previous).service_time();
                child.can_prepend = true;
                child.can_append = false;
                if self.push_if_promising(child, queue) {
                    prepended = Some((previous, deadhead));
                }
            }
        }

        if let (Some((back, back_deadhead)), Some((front, front_deadhead))) = (appended, prepended)
        {
            let mut extended = Vec::with_capacity(route.len() + 2);
            extended.push(front);
            extended.extend_from_slice(route);
            extended.push(back);
            if self.problem.route_duration(&extended, true) <= MAX_MINUTES_PER_DRIVER {
                let mut child = node.child();
                *child.assignment.route_mut(child.driver) = extended;
                child.visited.insert(front);
                child.visited.insert(back);
                child.total_minutes += front_deadhead
                    + self.problem.load(front).service_time()
                    + back_deadhead
                    + self.problem.load(back).service_time();
                child.can_prepend = true;
                child.can_append = true;
                self.push_if_promising(child, queue);
            }
        } else if appended.is_none() && prepended.is_none() {
            // This driver is done for the day; always keep the branch alive
            // with a fresh driver.
            let mut child = node.child();
            child.assignment.push_route(Vec::new());
            child.driver = node.driver + 1;
            child.can_prepend = true;
            child.can_append = true;
            child.lower_bound = self.bound(&child);
            queue.push(Reverse(child));
        }
    }

    /// Bounds the child and pushes it when it can still beat the incumbent.
    /// Returns whether it was pushed.
    fn push_if_promising(
        &self,
        mut child: SearchNode,
        queue: &mut BinaryHeap<Reverse<SearchNode>>,
    ) -> bool {
        child.lower_bound = self.bound(&child);
        if child.lower_bound < self.best_cost {
            queue.push(Reverse(child));
            true
        } else {
            false
        }
    }

    /// Optimistic completion estimate: the minutes already consumed plus
    /// the current driver's missing start leg, every open load's service
    /// leg, the cheapest possible final return, an average-distance guess
    /// for the travel in between, and a coarse count of extra drivers.
    fn bound(&self, node: &SearchNode) -> Score {
        let remaining = self.problem.num_loads() - node.visited.len();

        let mut open_service = 0.0;
        let mut cheapest_return = f64::INFINITY;
        for load in self.problem.catalog().iter() {
            if node.visited.contains(&load.index()) {
                continue;
            }
            open_service += load.service_time();
            cheapest_return = cheapest_return.min(load.dropoff_to_depot());
        }
        if cheapest_return.is_finite() {
            open_service += cheapest_return;
        }

        let start_leg = node
            .assignment
            .route(node.driver)
            .first()
            .map_or(0.0, |&index| self.problem.load(index).depot_to_pickup());

        let approx_minutes = node.total_minutes
            + start_leg
            + open_service
            + self.problem.average_distance() * (remaining as f64 - 1.0);

        const MAX_LOADS_PER_DRIVER: usize = 6;
        const GOOD_AVG_LOADS_PER_DRIVER: usize = 3;
        let extra_drivers = if remaining > MAX_LOADS_PER_DRIVER {
            remaining / GOOD_AVG_LOADS_PER_DRIVER
        } else {
            0
        };

        quick_cost(
            node.assignment.driver_count() + extra_drivers,
            approx_minutes,
        )
    }
}
