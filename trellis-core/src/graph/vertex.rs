//! Graph Vertices
//!
//! This module defines the vertex identifier and the vertex record stored in
//! the graph.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a vertex in a graph.
///
/// IDs are either supplied by the caller or generated by the graph. They are
/// unique within one graph instance only.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(String);

impl VertexId {
    /// Create an ID from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random ID (UUIDv4).
    ///
    /// Uniqueness inside a graph is still checked by the graph itself.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the ID and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexId({})", self.0)
    }
}

impl From<&str> for VertexId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for VertexId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for VertexId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

impl From<&VertexId> for VertexId {
    fn from(id: &VertexId) -> Self {
        id.clone()
    }
}

impl Deref for VertexId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for VertexId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VertexId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Which way to follow edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow edges from parent to child.
    Descendants,

    /// Follow edges from child to parent.
    Ancestors,
}

/// A vertex in the graph.
///
/// Besides the caller's value, a vertex records its neighbors in both
/// directions. Both neighbor sets keep insertion order, which is what makes
/// walks deterministic.
#[derive(Debug, Clone)]
pub struct Vertex<T> {
    /// The caller-supplied value.
    value: T,

    /// Vertices with an edge into this one.
    parents: IndexSet<VertexId>,

    /// Vertices this one has an edge to, in edge-insertion order.
    children: IndexSet<VertexId>,
}

impl<T> Vertex<T> {
    /// Create a vertex with no neighbors.
    pub fn new(value: T) -> Self {
        Self {
            value,
            parents: IndexSet::new(),
            children: IndexSet::new(),
        }
    }

    /// Get the vertex value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Parents in edge-insertion order.
    pub fn parents(&self) -> &IndexSet<VertexId> {
        &self.parents
    }

    /// Children in edge-insertion order.
    pub fn children(&self) -> &IndexSet<VertexId> {
        &self.children
    }

    /// True when nothing points at this vertex.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// True when this vertex points at nothing.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Neighbors in the given direction: children for descendants, parents
    /// for ancestors.
    pub fn neighbors(&self, direction: Direction) -> &IndexSet<VertexId> {
        match direction {
            Direction::Descendants => &self.children,
            Direction::Ancestors => &self.parents,
        }
    }

    pub(crate) fn add_parent(&mut self, id: VertexId) {
        self.parents.insert(id);
    }

    pub(crate) fn remove_parent(&mut self, id: &str) {
        self.parents.shift_remove(id);
    }

    pub(crate) fn add_child(&mut self, id: VertexId) {
        self.children.insert(id);
    }

    pub(crate) fn remove_child(&mut self, id: &str) {
        self.children.shift_remove(id);
    }

    pub(crate) fn into_value(self) -> T {
        self.value
    }
}
