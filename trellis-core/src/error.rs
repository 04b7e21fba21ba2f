//! Error Types
//!
//! A single error enum covers every way a graph operation can fail. Mutations
//! that return an error leave the graph exactly as it was.

use thiserror::Error;

use crate::graph::VertexId;

/// Boxed error produced by a caller-supplied flow callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for graph operations.
pub type DagResult<T> = Result<T, DagError>;

/// Errors that can occur during graph operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DagError {
    /// The vertex does not exist in the graph.
    #[error("vertex not found: {id}")]
    VertexNotFound {
        /// The missing vertex ID.
        id: VertexId,
    },

    /// A vertex with this ID already exists.
    #[error("duplicate vertex id: {id}")]
    DuplicateVertexId {
        /// The ID that was reused.
        id: VertexId,
    },

    /// The edge does not exist in the graph.
    #[error("edge not found: {src} -> {dst}")]
    EdgeNotFound {
        /// Source vertex of the missing edge.
        src: VertexId,
        /// Destination vertex of the missing edge.
        dst: VertexId,
    },

    /// The edge is already present.
    #[error("edge already exists: {src} -> {dst}")]
    EdgeAlreadyExists {
        /// Source vertex of the edge.
        src: VertexId,
        /// Destination vertex of the edge.
        dst: VertexId,
    },

    /// An edge from a vertex to itself was requested.
    #[error("self-loop rejected on vertex {id}")]
    SelfLoop {
        /// The vertex that would point to itself.
        id: VertexId,
    },

    /// The edge would close a cycle.
    #[error("edge {src} -> {dst} would create a cycle")]
    EdgeWouldCreateCycle {
        /// Source vertex of the rejected edge.
        src: VertexId,
        /// Destination vertex of the rejected edge.
        dst: VertexId,
    },

    /// A serialized graph cannot be decoded without a typed intermediate structure.
    #[error("decoding directly into a graph is unsupported; decode through a StorableDag instead")]
    UnsupportedDecodeTarget,

    /// A flow callback failed for a vertex.
    #[error("aggregation failed at vertex {id}: {source}")]
    AggregationFailed {
        /// The vertex whose callback failed.
        id: VertexId,
        /// The callback's own error.
        #[source]
        source: BoxError,
    },

    /// JSON encoding or decoding failed.
    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// MessagePack encoding failed.
    #[error("msgpack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MessagePack decoding failed.
    #[error("msgpack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
}

impl DagError {
    /// Creates a vertex not found error.
    pub fn vertex_not_found(id: impl Into<VertexId>) -> Self {
        Self::VertexNotFound { id: id.into() }
    }

    /// Creates a duplicate vertex error.
    pub fn duplicate_vertex(id: impl Into<VertexId>) -> Self {
        Self::DuplicateVertexId { id: id.into() }
    }

    /// Creates an edge not found error.
    pub fn edge_not_found(src: impl Into<VertexId>, dst: impl Into<VertexId>) -> Self {
        Self::EdgeNotFound {
            src: src.into(),
            dst: dst.into(),
        }
    }

    /// Creates an edge already exists error.
    pub fn edge_exists(src: impl Into<VertexId>, dst: impl Into<VertexId>) -> Self {
        Self::EdgeAlreadyExists {
            src: src.into(),
            dst: dst.into(),
        }
    }

    /// Creates a self-loop error.
    pub fn self_loop(id: impl Into<VertexId>) -> Self {
        Self::SelfLoop { id: id.into() }
    }

    /// Creates a cycle error for the rejected edge.
    pub fn cycle(src: impl Into<VertexId>, dst: impl Into<VertexId>) -> Self {
        Self::EdgeWouldCreateCycle {
            src: src.into(),
            dst: dst.into(),
        }
    }

    /// Wraps a callback failure with the vertex it happened at.
    pub fn aggregation_failed(id: impl Into<VertexId>, source: impl Into<BoxError>) -> Self {
        Self::AggregationFailed {
            id: id.into(),
            source: source.into(),
        }
    }
}
