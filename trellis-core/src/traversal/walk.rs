//! Depth-first, breadth-first and topological walks.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::trace;

use super::visitor::Visitor;
use crate::error::DagResult;
use crate::graph::{Direction, Graph, VertexId};

impl<T> Graph<T> {
    /// Visit every vertex depth-first.
    ///
    /// For each root in insertion order, performs a pre-order descent into
    /// children in edge-insertion order, skipping vertices already visited
    /// from an earlier root or branch.
    pub fn dfs_walk<V>(&self, visitor: &mut V)
    where
        V: Visitor<T> + ?Sized,
    {
        for id in self.dfs_order() {
            if let Ok(value) = self.vertex(id) {
                visitor.visit(id, value);
            }
        }
    }

    /// Visit every vertex breadth-first.
    ///
    /// The queue is seeded with all roots in insertion order. Vertices are
    /// marked visited when enqueued, so a vertex with several parents is
    /// enqueued (and visited) once.
    pub fn bfs_walk<V>(&self, visitor: &mut V)
    where
        V: Visitor<T> + ?Sized,
    {
        let mut visited: HashSet<&VertexId> = HashSet::with_capacity(self.order());
        let mut queue: VecDeque<&VertexId> = VecDeque::new();

        for root in self.roots() {
            visited.insert(root);
            queue.push_back(root);
        }

        while let Some(id) = queue.pop_front() {
            let Ok(vertex) = self.get(id) else {
                continue;
            };
            visitor.visit(id, vertex.value());

            for child in vertex.children() {
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }
    }

    /// Visit every vertex in topological order.
    ///
    /// Kahn's algorithm seeded with the roots in insertion order. Vertices
    /// that become ready while processing the same vertex are queued in
    /// vertex-insertion order.
    pub fn ordered_walk<V>(&self, visitor: &mut V)
    where
        V: Visitor<T> + ?Sized,
    {
        for id in self.topological_order() {
            if let Ok(value) = self.vertex(id) {
                visitor.visit(id, value);
            }
        }
    }

    /// All vertices reachable from `id` through outgoing edges.
    pub fn descendants(&self, id: &str) -> DagResult<HashSet<&VertexId>> {
        self.get(id)?;
        Ok(self.reachable(id, Direction::Descendants).into_iter().collect())
    }

    /// All vertices from which `id` is reachable.
    pub fn ancestors(&self, id: &str) -> DagResult<HashSet<&VertexId>> {
        self.get(id)?;
        Ok(self.reachable(id, Direction::Ancestors).into_iter().collect())
    }

    /// Descendants of `id` in breadth-first discovery order.
    pub fn ordered_descendants(&self, id: &str) -> DagResult<Vec<&VertexId>> {
        self.get(id)?;
        Ok(self.reachable(id, Direction::Descendants).into_iter().collect())
    }

    /// Ancestors of `id` in breadth-first discovery order.
    pub fn ordered_ancestors(&self, id: &str) -> DagResult<Vec<&VertexId>> {
        self.get(id)?;
        Ok(self.reachable(id, Direction::Ancestors).into_iter().collect())
    }

    /// Vertex IDs in depth-first walk order.
    pub(crate) fn dfs_order(&self) -> Vec<&VertexId> {
        let mut order = Vec::with_capacity(self.order());
        let mut visited: HashSet<&VertexId> = HashSet::with_capacity(self.order());
        let mut stack: Vec<&VertexId> = Vec::new();

        for root in self.roots() {
            stack.push(root);

            while let Some(id) = stack.pop() {
                if !visited.insert(id) {
                    continue;
                }
                order.push(id);

                if let Ok(children) = self.children(id) {
                    // Reversed so the first child is popped first.
                    stack.extend(children.iter().rev().filter(|c| !visited.contains(c)));
                }
            }
        }

        trace!(vertices = order.len(), "computed depth-first order");
        order
    }

    /// Vertex IDs in topological order.
    pub(crate) fn topological_order(&self) -> Vec<&VertexId> {
        let mut in_degree: HashMap<&VertexId, usize> = self
            .vertices()
            .filter_map(|(id, _)| self.parents(id).ok().map(|p| (id, p.len())))
            .collect();
        let mut queue: VecDeque<&VertexId> = self.roots().collect();
        let mut order = Vec::with_capacity(self.order());

        while let Some(id) = queue.pop_front() {
            order.push(id);

            let Ok(children) = self.children(id) else {
                continue;
            };
            let mut ready = Vec::new();
            for child in children {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(child);
                    }
                }
            }
            self.sort_by_insertion(&mut ready);
            queue.extend(ready);
        }

        order
    }

    /// Sort IDs by the insertion position of their vertices.
    pub(crate) fn sort_by_insertion(&self, ids: &mut [&VertexId]) {
        ids.sort_by_key(|id| self.insertion_index(id).unwrap_or(usize::MAX));
    }
}
