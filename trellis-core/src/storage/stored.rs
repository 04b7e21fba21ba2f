//! Storable intermediate structures and the serde glue for graphs.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::StorableDag;
use crate::error::DagError;
use crate::graph::{Dag, Graph, VertexId};

/// One vertex on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredVertex<T> {
    /// Vertex ID.
    #[serde(rename = "i")]
    pub id: VertexId,

    /// Vertex value.
    #[serde(rename = "v")]
    pub value: T,
}

/// One edge on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEdge {
    /// Source vertex ID.
    #[serde(rename = "s")]
    pub src: VertexId,

    /// Destination vertex ID.
    #[serde(rename = "d")]
    pub dst: VertexId,
}

/// A whole graph on the wire.
///
/// This is the default decode target: deserialize into `StoredDag<T>` for
/// your value type, then rebuild with [`from_storable`](super::from_storable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDag<T> {
    /// Vertices in insertion order.
    #[serde(rename = "vs", default = "Vec::new")]
    pub vertices: Vec<StoredVertex<T>>,

    /// Edges in insertion order.
    #[serde(rename = "es", default = "Vec::new")]
    pub edges: Vec<StoredEdge>,
}

impl<'a, T> StoredDag<&'a T> {
    /// Borrowing listing of a graph, in storage order.
    pub fn from_graph(graph: &'a Graph<T>) -> Self {
        let vertices = graph
            .stored_vertices()
            .into_iter()
            .map(|(id, value)| StoredVertex {
                id: VertexId::from(id),
                value,
            })
            .collect();
        let edges = graph
            .stored_edges()
            .into_iter()
            .map(|(src, dst)| StoredEdge {
                src: VertexId::from(src),
                dst: VertexId::from(dst),
            })
            .collect();
        Self { vertices, edges }
    }
}

impl<T> StorableDag<T> for StoredDag<T> {
    fn stored_vertices(&self) -> Vec<(&str, &T)> {
        self.vertices
            .iter()
            .map(|v| (v.id.as_str(), &v.value))
            .collect()
    }

    fn stored_edges(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .map(|e| (e.src.as_str(), e.dst.as_str()))
            .collect()
    }
}

impl<T: Serialize> Serialize for Graph<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoredDag::from_graph(self).serialize(serializer)
    }
}

impl<T: Serialize> Serialize for Dag<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read().serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Graph<T> {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(de::Error::custom(DagError::UnsupportedDecodeTarget))
    }
}

impl<'de, T> Deserialize<'de> for Dag<T> {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(de::Error::custom(DagError::UnsupportedDecodeTarget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::graph_from_storable;

    #[test]
    fn stored_dag_uses_short_field_names() {
        let stored = StoredDag {
            vertices: vec![StoredVertex {
                id: VertexId::new("1"),
                value: 7,
            }],
            edges: vec![],
        };
        let json = serde_json::to_string(&stored).unwrap();
        assert_eq!(json, r#"{"vs":[{"i":"1","v":7}],"es":[]}"#);
    }

    #[test]
    fn missing_arrays_decode_as_empty() {
        let stored: StoredDag<u32> = serde_json::from_str("{}").unwrap();
        assert!(stored.vertices.is_empty());
        assert!(stored.edges.is_empty());
    }

    #[test]
    fn bare_graph_cannot_be_decoded() {
        let err = serde_json::from_str::<Graph<u32>>(r#"{"vs":[],"es":[]}"#).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn rebuild_rejects_cyclic_payload() {
        let json = r#"{"vs":[{"i":"a","v":1},{"i":"b","v":2}],
                       "es":[{"s":"a","d":"b"},{"s":"b","d":"a"}]}"#;
        let stored: StoredDag<u32> = serde_json::from_str(json).unwrap();
        let result = graph_from_storable(&stored);
        assert!(matches!(result, Err(DagError::EdgeWouldCreateCycle { .. })));
    }

    #[test]
    fn rebuild_rejects_dangling_edge() {
        let json = r#"{"vs":[{"i":"a","v":1}],"es":[{"s":"a","d":"ghost"}]}"#;
        let stored: StoredDag<u32> = serde_json::from_str(json).unwrap();
        let result = graph_from_storable(&stored);
        assert!(matches!(result, Err(DagError::VertexNotFound { .. })));
    }
}
