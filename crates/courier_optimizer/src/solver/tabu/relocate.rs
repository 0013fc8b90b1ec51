use crate::solver::solution::assignment::Assignment;

/// **Single-load relocation**
///
/// Removes one load from a source route and reinserts it at a target
/// position, possibly under another driver.
///
/// ```text
/// BEFORE:
///    Driver i: ... (A) -> [load] -> (B) ...
///    Driver n: ... (X) -> (Y) ...
///
/// AFTER:
///    Driver i: ... (A) -> (B) ...
///    Driver n: ... (X) -> [load] -> (Y) ...
/// ```
///
/// A move that drains its source route also deletes that driver, which is
/// how the refiner shrinks the fleet.
#[derive(Debug, Clone, Copy)]
pub struct RelocateMove {
    pub from_route: usize,
    pub from_pos: usize,
    pub to_route: usize,
    pub to_pos: usize,
}

impl RelocateMove {
    /// Every relocation reachable from `assignment`. Source routes longer
    /// than `max_source_route_len` are left alone; target positions are
    /// counted on the route before removal, so `to_pos` may equal the
    /// route length (insert at the end).
    pub fn generate(
        assignment: &Assignment,
        max_source_route_len: usize,
        mut consumer: impl FnMut(RelocateMove),
    ) {
        for (from_route, source) in assignment.routes().iter().enumerate() {
            if source.len() > max_source_route_len {
                continue;
            }
            for from_pos in 0..source.len() {
                for (to_route, target) in assignment.routes().iter().enumerate() {
                    for to_pos in 0..=target.len() {
                        if from_route == to_route && from_pos == to_pos {
                            continue;
                        }
                        consumer(RelocateMove {
                            from_route,
                            from_pos,
                            to_route,
                            to_pos,
                        });
                    }
                }
            }
        }
    }

    /// Applies the move to a deep copy of `assignment`; the input is never
    /// touched.
    pub fn apply(&self, assignment: &Assignment) -> Assignment {
        let mut neighbor = assignment.clone();

        if self.from_route == self.to_route {
            let route = neighbor.route_mut(self.from_route);
            let load = route.remove(self.from_pos);
            // Removal shifted everything behind the source down by one.
            let to_pos = if self.from_pos < self.to_pos {
                self.to_pos - 1
            } else {
                self.to_pos
            };
            route.insert(to_pos, load);
        } else {
            let load = neighbor.route_mut(self.from_route).remove(self.from_pos);
            neighbor.route_mut(self.to_route).insert(self.to_pos, load);
            if neighbor.route(self.from_route).is_empty() {
                neighbor.remove_route(self.from_route);
            }
        }

        neighbor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate_across_routes() {
        let assignment = Assignment::from_routes(vec![vec![1, 2, 3], vec![4, 5]]);

        let neighbor = RelocateMove {
            from_route: 0,
            from_pos: 1,
            to_route: 1,
            to_pos: 2,
        }
        .apply(&assignment);

        assert_eq!(neighbor.routes(), &[vec![1, 3], vec![4, 5, 2]]);
        // the parent is untouched
        assert_eq!(assignment.routes(), &[vec![1, 2, 3], vec![4, 5]]);
    }

    #[test]
    fn test_relocate_within_route_forward() {
        let assignment = Assignment::from_routes(vec![vec![1, 2, 3, 4]]);

        let neighbor = RelocateMove {
            from_route: 0,
            from_pos: 0,
            to_route: 0,
            to_pos: 3,
        }
        .apply(&assignment);

        assert_eq!(neighbor.routes(), &[vec![2, 3, 1, 4]]);
    }

    #[test]
    fn test_relocate_within_route_backward() {
        let assignment = Assignment::from_routes(vec![vec![1, 2, 3, 4]]);

        let neighbor = RelocateMove {
            from_route: 0,
            from_pos: 3,
            to_route: 0,
            to_pos: 1,
        }
        .apply(&assignment);

        assert_eq!(neighbor.routes(), &[vec![1, 4, 2, 3]]);
    }

    #[test]
    fn test_relocate_drains_source_route() {
        let assignment = Assignment::from_routes(vec![vec![1, 2], vec![3]]);

        let neighbor = RelocateMove {
            from_route: 1,
            from_pos: 0,
            to_route: 0,
            to_pos: 2,
        }
        .apply(&assignment);

        assert_eq!(neighbor.routes(), &[vec![1, 2, 3]]);
        assert_eq!(neighbor.driver_count(), 1);
    }

    #[test]
    fn test_generate_skips_degenerate_and_long_sources() {
        let assignment = Assignment::from_routes(vec![vec![1], vec![2, 3, 4, 5, 6, 7]]);

        let mut moves = Vec::new();
        RelocateMove::generate(&assignment, 5, |m| moves.push(m));

        // only the singleton route may act as a source: positions 0..=1 in
        // its own route minus the degenerate stay-put, plus 0..=6 in the
        // six-load route
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.from_route == 0));
        assert!(
            moves
                .iter()
                .all(|m| !(m.from_route == m.to_route && m.from_pos == m.to_pos))
        );
    }
}
