//! Shared DAG Handle
//!
//! `Dag` is the thread-safe face of the engine. It owns a [`Graph`] behind a
//! single reader/writer lock:
//!
//! - Mutations (`add_vertex`, `delete_vertex`, `add_edge`, `delete_edge`,
//!   `reduce_transitively`) take the lock exclusively.
//! - Lookups, walks and flows take it shared, so they run concurrently with
//!   each other and always see a stable snapshot.
//!
//! Guards are scoped to each call and released on every return path,
//! including errors. Visitors and flow callbacks run while the shared lock is
//! held, so they must not call into the same `Dag` at all: even a read waits
//! behind a queued writer, which in turn waits for the walk. Flow callbacks
//! get the locked [`Graph`] itself for any lookups they need. A visitor that
//! needs lookups should walk the graph behind [`Dag::read`] and query that.
//!
//! Comparing two `Dag`s holds both shared locks, always acquired in address
//! order.

use std::collections::HashSet;
use std::fmt;
use std::ptr;

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard};

use super::store::Graph;
use super::vertex::VertexId;
use crate::error::{BoxError, DagResult};
use crate::flow::FlowResult;
use crate::traversal::Visitor;

/// A directed acyclic graph that can be shared across threads.
///
/// # Example
///
/// ```
/// use trellis_core::graph::{Dag, VertexId};
///
/// let dag = Dag::new();
/// dag.add_vertex_by_id("fetch", "download sources").unwrap();
/// dag.add_vertex_by_id("build", "compile").unwrap();
/// dag.add_edge("fetch", "build").unwrap();
///
/// // Closing the loop is rejected and the graph is unchanged.
/// assert!(dag.add_edge("build", "fetch").is_err());
/// assert_eq!(dag.size(), 1);
///
/// let mut order = Vec::new();
/// dag.dfs_walk(&mut |id: &VertexId, _: &&str| order.push(id.to_string()));
/// assert_eq!(order, vec!["fetch", "build"]);
/// ```
pub struct Dag<T> {
    inner: RwLock<Graph<T>>,
}

impl<T> Dag<T> {
    /// Create a new empty DAG.
    pub fn new() -> Self {
        Self::from(Graph::new())
    }

    /// Create an empty DAG with room for `vertices` vertices.
    pub fn with_capacity(vertices: usize) -> Self {
        Self::from(Graph::with_capacity(vertices))
    }

    /// Acquire the shared lock for several reads against one snapshot.
    ///
    /// Mutations on this `Dag` block until the guard is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, Graph<T>> {
        self.inner.read()
    }

    /// Unwrap the underlying graph.
    pub fn into_inner(self) -> Graph<T> {
        self.inner.into_inner()
    }

    /// Add a vertex under a generated ID and return the ID.
    pub fn add_vertex(&self, value: T) -> VertexId {
        self.inner.write().add_vertex(value)
    }

    /// Add a vertex under a caller-supplied ID.
    pub fn add_vertex_by_id(&self, id: impl Into<VertexId>, value: T) -> DagResult<()> {
        self.inner.write().add_vertex_by_id(id, value)
    }

    /// Delete a vertex with all its edges, returning its value.
    pub fn delete_vertex(&self, id: &str) -> DagResult<T> {
        self.inner.write().delete_vertex(id)
    }

    /// Add the edge `src -> dst`, subject to the cycle guard.
    pub fn add_edge(&self, src: &str, dst: &str) -> DagResult<()> {
        self.inner.write().add_edge(src, dst)
    }

    /// Delete the edge `src -> dst`.
    pub fn delete_edge(&self, src: &str, dst: &str) -> DagResult<()> {
        self.inner.write().delete_edge(src, dst)
    }

    /// Remove edges implied by longer paths. Returns how many were removed.
    pub fn reduce_transitively(&self) -> usize {
        self.inner.write().reduce_transitively()
    }

    /// Check whether the edge `src -> dst` exists.
    pub fn is_edge(&self, src: &str, dst: &str) -> DagResult<bool> {
        self.inner.read().is_edge(src, dst)
    }

    /// Check whether a vertex exists.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().contains(id)
    }

    /// Check whether a vertex has no parents.
    pub fn is_root(&self, id: &str) -> DagResult<bool> {
        self.inner.read().is_root(id)
    }

    /// Check whether a vertex has no children.
    pub fn is_leaf(&self, id: &str) -> DagResult<bool> {
        self.inner.read().is_leaf(id)
    }

    /// Parents of a vertex, in edge-insertion order.
    pub fn get_parents(&self, id: &str) -> DagResult<Vec<VertexId>> {
        Ok(self.inner.read().parents(id)?.iter().cloned().collect())
    }

    /// Children of a vertex, in edge-insertion order.
    pub fn get_children(&self, id: &str) -> DagResult<Vec<VertexId>> {
        Ok(self.inner.read().children(id)?.iter().cloned().collect())
    }

    /// Vertices without parents, in vertex-insertion order.
    pub fn get_roots(&self) -> Vec<VertexId> {
        self.inner.read().roots().cloned().collect()
    }

    /// Vertices without children, in vertex-insertion order.
    pub fn get_leaves(&self) -> Vec<VertexId> {
        self.inner.read().leaves().cloned().collect()
    }

    /// All edges, grouped by source in vertex-insertion order.
    pub fn get_edges(&self) -> Vec<(VertexId, VertexId)> {
        self.inner
            .read()
            .edges()
            .map(|(src, dst)| (src.clone(), dst.clone()))
            .collect()
    }

    /// Every vertex reachable from `id` through outgoing edges.
    pub fn get_descendants(&self, id: &str) -> DagResult<HashSet<VertexId>> {
        Ok(self.inner.read().descendants(id)?.into_iter().cloned().collect())
    }

    /// Every vertex from which `id` is reachable.
    pub fn get_ancestors(&self, id: &str) -> DagResult<HashSet<VertexId>> {
        Ok(self.inner.read().ancestors(id)?.into_iter().cloned().collect())
    }

    /// Descendants of a vertex, in breadth-first discovery order.
    pub fn get_ordered_descendants(&self, id: &str) -> DagResult<Vec<VertexId>> {
        Ok(self
            .inner
            .read()
            .ordered_descendants(id)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Ancestors of a vertex, in breadth-first discovery order.
    pub fn get_ordered_ancestors(&self, id: &str) -> DagResult<Vec<VertexId>> {
        Ok(self
            .inner
            .read()
            .ordered_ancestors(id)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.inner.read().order()
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    /// True when the DAG has no vertices.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Depth-first walk over the whole DAG.
    ///
    /// The visitor runs under the shared lock and must not call back into
    /// this `Dag`.
    pub fn dfs_walk<V>(&self, visitor: &mut V)
    where
        V: Visitor<T> + ?Sized,
    {
        self.inner.read().dfs_walk(visitor)
    }

    /// Breadth-first walk over the whole DAG.
    pub fn bfs_walk<V>(&self, visitor: &mut V)
    where
        V: Visitor<T> + ?Sized,
    {
        self.inner.read().bfs_walk(visitor)
    }

    /// Topological walk over the whole DAG.
    pub fn ordered_walk<V>(&self, visitor: &mut V)
    where
        V: Visitor<T> + ?Sized,
    {
        self.inner.read().ordered_walk(visitor)
    }

    /// Flow through descendants; returns the leaf results.
    pub fn descendants_flow<R, E, F>(
        &self,
        start: &str,
        inputs: &[FlowResult<R>],
        aggregate: F,
    ) -> DagResult<Vec<FlowResult<R>>>
    where
        R: Clone,
        E: Into<BoxError>,
        F: FnMut(&Graph<T>, &VertexId, &[FlowResult<R>]) -> Result<R, E>,
    {
        self.inner.read().descendants_flow(start, inputs, aggregate)
    }

    /// Flow through descendants; returns every result keyed by vertex.
    pub fn descendants_flow_results<R, E, F>(
        &self,
        start: &str,
        inputs: &[FlowResult<R>],
        aggregate: F,
    ) -> DagResult<IndexMap<VertexId, R>>
    where
        R: Clone,
        E: Into<BoxError>,
        F: FnMut(&Graph<T>, &VertexId, &[FlowResult<R>]) -> Result<R, E>,
    {
        self.inner
            .read()
            .descendants_flow_results(start, inputs, aggregate)
    }

    /// Flow through ancestors; returns the root results.
    pub fn ancestors_flow<R, E, F>(
        &self,
        start: &str,
        inputs: &[FlowResult<R>],
        aggregate: F,
    ) -> DagResult<Vec<FlowResult<R>>>
    where
        R: Clone,
        E: Into<BoxError>,
        F: FnMut(&Graph<T>, &VertexId, &[FlowResult<R>]) -> Result<R, E>,
    {
        self.inner.read().ancestors_flow(start, inputs, aggregate)
    }

    /// Flow through ancestors; returns every result keyed by vertex.
    pub fn ancestors_flow_results<R, E, F>(
        &self,
        start: &str,
        inputs: &[FlowResult<R>],
        aggregate: F,
    ) -> DagResult<IndexMap<VertexId, R>>
    where
        R: Clone,
        E: Into<BoxError>,
        F: FnMut(&Graph<T>, &VertexId, &[FlowResult<R>]) -> Result<R, E>,
    {
        self.inner
            .read()
            .ancestors_flow_results(start, inputs, aggregate)
    }
}

impl<T: Clone> Dag<T> {
    /// Get a copy of a vertex value.
    pub fn get_vertex(&self, id: &str) -> DagResult<T> {
        self.inner.read().vertex(id).cloned()
    }

    /// All vertices as `(id, value)`, in vertex-insertion order.
    pub fn get_vertices(&self) -> Vec<(VertexId, T)> {
        self.inner
            .read()
            .vertices()
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect()
    }

    /// Copy the current state into a standalone graph.
    pub fn snapshot(&self) -> Graph<T> {
        self.inner.read().clone()
    }
}

impl<T> Default for Dag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Graph<T>> for Dag<T> {
    fn from(graph: Graph<T>) -> Self {
        Self {
            inner: RwLock::new(graph),
        }
    }
}

impl<T: Clone> Clone for Dag<T> {
    fn clone(&self) -> Self {
        Self::from(self.snapshot())
    }
}

impl<T: PartialEq> PartialEq for Dag<T> {
    fn eq(&self, other: &Self) -> bool {
        // Taking the same lock twice could wait behind a queued writer.
        if ptr::eq(self, other) {
            return true;
        }
        let (first, second) = if (self as *const Self) < (other as *const Self) {
            (self, other)
        } else {
            (other, self)
        };
        let first = first.inner.read();
        let second = second.inner.read();
        *first == *second
    }
}

impl<T: fmt::Debug> fmt::Debug for Dag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dag")
            .field("graph", &*self.inner.read())
            .finish()
    }
}

impl<T> fmt::Display for Dag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner.read(), f)
    }
}
