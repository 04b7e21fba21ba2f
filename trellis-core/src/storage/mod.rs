//! Serialization Adapter
//!
//! Turns a graph into a portable vertex/edge list and back.
//!
//! # Wire Format
//!
//! ```json
//! {"vs":[{"i":"1","v":"v1"},{"i":"2","v":"v2"}],"es":[{"s":"1","d":"2"}]}
//! ```
//!
//! Vertices appear in depth-first walk order. Each vertex's outgoing edges
//! follow in edge-insertion order, emitted as the walk visits their source.
//! Short field names keep the payload small.
//!
//! # Decoding
//!
//! The vertex value type is not on the wire, so a bare [`Graph`] or
//! [`Dag`] cannot be deserialized: both fail with
//! [`DagError::UnsupportedDecodeTarget`](crate::error::DagError::UnsupportedDecodeTarget). Instead, decode into a type that
//! implements [`StorableDag`] (usually [`StoredDag<T>`]) and rebuild from it
//! with [`from_storable`]. Rebuilding re-runs every vertex and edge
//! insertion, cycle guard included, so a hand-edited payload cannot smuggle
//! in an invalid graph.

mod codec;
mod stored;

pub use codec::{from_json, from_msgpack, to_json, to_msgpack};
pub use stored::{StoredDag, StoredEdge, StoredVertex};

use tracing::debug;

use crate::error::DagResult;
use crate::graph::{Dag, Graph};

/// A vertex/edge listing that a graph can be rebuilt from.
///
/// Implemented by [`StoredDag`] and by [`Graph`] itself; implement it on your
/// own intermediate type to decode custom payloads.
pub trait StorableDag<T> {
    /// All vertices as `(id, value)`, in the order they should be inserted.
    fn stored_vertices(&self) -> Vec<(&str, &T)>;

    /// All edges as `(src, dst)`, in the order they should be inserted.
    fn stored_edges(&self) -> Vec<(&str, &str)>;
}

impl<T> StorableDag<T> for Graph<T> {
    fn stored_vertices(&self) -> Vec<(&str, &T)> {
        self.dfs_order()
            .into_iter()
            .filter_map(|id| self.vertex(id).ok().map(|value| (id.as_str(), value)))
            .collect()
    }

    fn stored_edges(&self) -> Vec<(&str, &str)> {
        self.dfs_order()
            .into_iter()
            .filter_map(|src| self.children(src).ok().map(|children| (src, children)))
            .flat_map(|(src, children)| children.iter().map(move |dst| (src.as_str(), dst.as_str())))
            .collect()
    }
}

/// Rebuild a graph from a storable listing, validating every insertion.
pub fn graph_from_storable<T, S>(storable: &S) -> DagResult<Graph<T>>
where
    T: Clone,
    S: StorableDag<T> + ?Sized,
{
    let vertices = storable.stored_vertices();
    let edges = storable.stored_edges();

    let mut graph = Graph::with_capacity(vertices.len());
    for (id, value) in vertices {
        graph.add_vertex_by_id(id, value.clone())?;
    }
    for (src, dst) in edges {
        graph.add_edge(src, dst)?;
    }

    debug!(
        vertices = graph.order(),
        edges = graph.size(),
        "rebuilt graph from storage"
    );
    Ok(graph)
}

/// Rebuild a shared DAG from a storable listing, validating every insertion.
pub fn from_storable<T, S>(storable: &S) -> DagResult<Dag<T>>
where
    T: Clone,
    S: StorableDag<T> + ?Sized,
{
    graph_from_storable(storable).map(Dag::from)
}
