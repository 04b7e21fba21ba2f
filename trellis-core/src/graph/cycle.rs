//! Cycle Guard
//!
//! Adding `src -> dst` to an acyclic graph closes a cycle exactly when `src`
//! is already reachable from `dst`. The graph is acyclic before every
//! insertion, so a single reachability search from `dst` is enough; the whole
//! graph never needs revalidating.

use std::collections::HashSet;

use indexmap::IndexSet;

use super::store::Graph;
use super::vertex::{Direction, VertexId};

impl<T> Graph<T> {
    /// Check whether `to` can be reached from `from` by following edges.
    ///
    /// Depth-first with a visited set, so each vertex is expanded at most once.
    pub(crate) fn path_exists(&self, from: &str, to: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![from];

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Ok(vertex) = self.get(current) {
                stack.extend(
                    vertex
                        .children()
                        .iter()
                        .map(VertexId::as_str)
                        .filter(|c| !visited.contains(c)),
                );
            }
        }

        false
    }

    /// Every vertex reachable from `start` in `direction`, excluding `start`,
    /// in breadth-first discovery order.
    pub(crate) fn reachable(&self, start: &str, direction: Direction) -> IndexSet<&VertexId> {
        let mut found: IndexSet<&VertexId> = IndexSet::new();
        let Ok(vertex) = self.get(start) else {
            return found;
        };
        found.extend(vertex.neighbors(direction));

        let mut next = 0;
        while let Some(&current) = found.get_index(next) {
            next += 1;
            if let Ok(vertex) = self.get(current) {
                for neighbor in vertex.neighbors(direction) {
                    found.insert(neighbor);
                }
            }
        }

        found
    }

    /// Every vertex reachable from `start` through outgoing edges.
    pub(crate) fn reachable_from(&self, start: &str) -> IndexSet<&VertexId> {
        self.reachable(start, Direction::Descendants)
    }
}
