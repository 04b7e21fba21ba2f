//! Visitor capability for walks.

use crate::graph::VertexId;

/// Receives each vertex visited by a walk.
///
/// A visitor only observes: it cannot change the walk order or stop the walk.
/// Any `FnMut(&VertexId, &T)` closure is a visitor.
pub trait Visitor<T> {
    /// Called once per visited vertex.
    fn visit(&mut self, id: &VertexId, value: &T);
}

impl<T, F> Visitor<T> for F
where
    F: FnMut(&VertexId, &T),
{
    fn visit(&mut self, id: &VertexId, value: &T) {
        self(id, value)
    }
}
