//! Graph Store
//!
//! `Graph` owns the vertex table and the edge relation. It is the unlocked,
//! single-owner form of the engine: every mutation takes `&mut self`, every
//! query takes `&self`. [`Dag`](super::Dag) wraps it in a reader/writer lock
//! for shared use.
//!
//! # Representation
//!
//! Vertices live in an insertion-ordered map keyed by ID. Each vertex keeps
//! insertion-ordered parent and child sets, so neighbor queries are O(degree)
//! in both directions and edge lookups are O(1). There is no separate edge
//! list; an edge exists exactly when `dst` is in `src`'s child set and `src`
//! is in `dst`'s parent set.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use super::vertex::{Vertex, VertexId};
use crate::error::{DagError, DagResult};

/// A directed acyclic graph of vertices carrying values of type `T`.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    /// All vertices, in insertion order.
    vertices: IndexMap<VertexId, Vertex<T>>,

    /// Number of edges.
    edge_count: usize,
}

impl<T> Graph<T> {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            vertices: IndexMap::new(),
            edge_count: 0,
        }
    }

    /// Create an empty graph with room for `vertices` vertices.
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: IndexMap::with_capacity(vertices),
            edge_count: 0,
        }
    }

    /// Add a vertex under a freshly generated ID and return that ID.
    pub fn add_vertex(&mut self, value: T) -> VertexId {
        let mut id = VertexId::generate();
        while self.vertices.contains_key(&id) {
            id = VertexId::generate();
        }

        debug!(vertex = %id, "adding vertex");
        self.vertices.insert(id.clone(), Vertex::new(value));
        id
    }

    /// Add a vertex under a caller-supplied ID.
    ///
    /// Fails with [`DagError::DuplicateVertexId`] if the ID is taken.
    pub fn add_vertex_by_id(&mut self, id: impl Into<VertexId>, value: T) -> DagResult<()> {
        let id = id.into();
        if self.vertices.contains_key(&id) {
            debug!(vertex = %id, "rejecting duplicate vertex id");
            return Err(DagError::duplicate_vertex(id));
        }

        debug!(vertex = %id, "adding vertex");
        self.vertices.insert(id, Vertex::new(value));
        Ok(())
    }

    /// Get the value stored at a vertex.
    pub fn vertex(&self, id: &str) -> DagResult<&T> {
        self.get(id).map(Vertex::value)
    }

    /// Get the full vertex record.
    pub fn get(&self, id: &str) -> DagResult<&Vertex<T>> {
        self.vertices
            .get(id)
            .ok_or_else(|| DagError::vertex_not_found(id))
    }

    /// Get the stored ID and record of a vertex.
    pub(crate) fn get_entry(&self, id: &str) -> DagResult<(&VertexId, &Vertex<T>)> {
        self.vertices
            .get_key_value(id)
            .ok_or_else(|| DagError::vertex_not_found(id))
    }

    /// Check whether a vertex exists.
    pub fn contains(&self, id: &str) -> bool {
        self.vertices.contains_key(id)
    }

    /// Position of a vertex in insertion order.
    pub(crate) fn insertion_index(&self, id: &str) -> Option<usize> {
        self.vertices.get_index_of(id)
    }

    /// Delete a vertex and every edge touching it. Returns the vertex value.
    pub fn delete_vertex(&mut self, id: &str) -> DagResult<T> {
        let Some((id, vertex)) = self.vertices.shift_remove_entry(id) else {
            return Err(DagError::vertex_not_found(id));
        };

        for parent in vertex.parents() {
            if let Some(p) = self.vertices.get_mut(parent) {
                p.remove_child(&id);
            }
        }
        for child in vertex.children() {
            if let Some(c) = self.vertices.get_mut(child) {
                c.remove_parent(&id);
            }
        }

        let removed = vertex.parents().len() + vertex.children().len();
        self.edge_count -= removed;
        debug!(vertex = %id, edges = removed, "deleted vertex");

        Ok(vertex.into_value())
    }

    /// Add an edge `src -> dst`.
    ///
    /// The edge is rejected, leaving the graph untouched, when either endpoint
    /// is missing, when `src == dst`, when the edge is already present, or
    /// when `src` is reachable from `dst` (the edge would close a cycle).
    pub fn add_edge(&mut self, src: &str, dst: &str) -> DagResult<()> {
        let src_vertex = self.get(src)?;
        self.get(dst)?;

        if src == dst {
            debug!(vertex = src, "rejecting self-loop");
            return Err(DagError::self_loop(src));
        }
        if src_vertex.children().contains(dst) {
            return Err(DagError::edge_exists(src, dst));
        }
        if self.path_exists(dst, src) {
            debug!(src, dst, "rejecting edge that would create a cycle");
            return Err(DagError::cycle(src, dst));
        }

        let (src_id, dst_id) = (VertexId::from(src), VertexId::from(dst));
        if let Some(v) = self.vertices.get_mut(src) {
            v.add_child(dst_id);
        }
        if let Some(v) = self.vertices.get_mut(dst) {
            v.add_parent(src_id);
        }
        self.edge_count += 1;

        debug!(src, dst, "added edge");
        Ok(())
    }

    /// Delete the edge `src -> dst`.
    pub fn delete_edge(&mut self, src: &str, dst: &str) -> DagResult<()> {
        if !self.is_edge(src, dst)? {
            return Err(DagError::edge_not_found(src, dst));
        }

        if let Some(v) = self.vertices.get_mut(src) {
            v.remove_child(dst);
        }
        if let Some(v) = self.vertices.get_mut(dst) {
            v.remove_parent(src);
        }
        self.edge_count -= 1;

        debug!(src, dst, "deleted edge");
        Ok(())
    }

    /// Check whether the edge `src -> dst` exists.
    ///
    /// Fails if either endpoint is missing.
    pub fn is_edge(&self, src: &str, dst: &str) -> DagResult<bool> {
        let src_vertex = self.get(src)?;
        self.get(dst)?;
        Ok(src_vertex.children().contains(dst))
    }

    /// Parents of a vertex, in edge-insertion order.
    pub fn parents(&self, id: &str) -> DagResult<&IndexSet<VertexId>> {
        self.get(id).map(Vertex::parents)
    }

    /// Children of a vertex, in edge-insertion order.
    pub fn children(&self, id: &str) -> DagResult<&IndexSet<VertexId>> {
        self.get(id).map(Vertex::children)
    }

    /// Check whether a vertex has no parents.
    pub fn is_root(&self, id: &str) -> DagResult<bool> {
        self.get(id).map(Vertex::is_root)
    }

    /// Check whether a vertex has no children.
    pub fn is_leaf(&self, id: &str) -> DagResult<bool> {
        self.get(id).map(Vertex::is_leaf)
    }

    /// Vertices without parents, in vertex-insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &VertexId> {
        self.vertices
            .iter()
            .filter(|(_, v)| v.is_root())
            .map(|(id, _)| id)
    }

    /// Vertices without children, in vertex-insertion order.
    pub fn leaves(&self) -> impl Iterator<Item = &VertexId> {
        self.vertices
            .iter()
            .filter(|(_, v)| v.is_leaf())
            .map(|(id, _)| id)
    }

    /// All vertices as `(id, value)`, in vertex-insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (&VertexId, &T)> {
        self.vertices.iter().map(|(id, v)| (id, v.value()))
    }

    /// All edges as `(src, dst)`, grouped by source in vertex-insertion order,
    /// each source's edges in edge-insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&VertexId, &VertexId)> {
        self.vertices
            .iter()
            .flat_map(|(src, v)| v.children().iter().map(move |dst| (src, dst)))
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.edge_count
    }

    /// True when the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Remove every edge `src -> dst` for which another path from `src` to
    /// `dst` exists. Reachability is unchanged. Returns the number of edges
    /// removed.
    pub fn reduce_transitively(&mut self) -> usize {
        let mut redundant = Vec::new();

        for (src, vertex) in &self.vertices {
            // Everything reachable through at least two edges from `src`.
            let mut indirect: IndexSet<&VertexId> = IndexSet::new();
            for child in vertex.children() {
                indirect.extend(self.reachable_from(child));
            }
            for child in vertex.children() {
                if indirect.contains(child) {
                    redundant.push((src.clone(), child.clone()));
                }
            }
        }

        for (src, dst) in &redundant {
            if let Some(v) = self.vertices.get_mut(src.as_str()) {
                v.remove_child(dst);
            }
            if let Some(v) = self.vertices.get_mut(dst.as_str()) {
                v.remove_parent(src);
            }
        }
        self.edge_count -= redundant.len();

        debug!(removed = redundant.len(), "reduced graph transitively");
        redundant.len()
    }

    /// Remove all vertices and edges.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edge_count = 0;
    }
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Two graphs are equal when they hold the same ID-to-value mapping and the
/// same set of edges. Insertion order is not compared.
impl<T: PartialEq> PartialEq for Graph<T> {
    fn eq(&self, other: &Self) -> bool {
        self.order() == other.order()
            && self.size() == other.size()
            && self.vertices.iter().all(|(id, v)| {
                other.vertices.get(id).is_some_and(|o| {
                    v.value() == o.value()
                        && v.children().len() == o.children().len()
                        && v.children().iter().all(|c| o.children().contains(c))
                })
            })
    }
}

impl<T: Eq> Eq for Graph<T> {}

impl<T> fmt::Display for Graph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DAG Vertices: {} - Edges: {}", self.order(), self.size())?;
        writeln!(f, "Vertices:")?;
        for id in self.vertices.keys() {
            writeln!(f, "  {id}")?;
        }
        writeln!(f, "Edges:")?;
        for (src, dst) in self.edges() {
            writeln!(f, "  {src} -> {dst}")?;
        }
        Ok(())
    }
}
