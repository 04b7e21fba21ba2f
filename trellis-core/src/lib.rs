//! Trellis Core
//!
//! This crate provides a generic, mutable, concurrency-safe directed acyclic
//! graph (DAG) engine. It implements:
//!
//! - Vertex and edge storage with insertion-ordered neighbor sets
//! - A cycle guard that rejects any edge that would close a loop
//! - Deterministic depth-first, breadth-first and topological walks
//! - Flow evaluation: propagating results through descendants or ancestors
//!   in dependency order
//! - A compact vertex/edge list encoding (JSON or MessagePack)
//!
//! It is the kind of primitive that sits under build systems, workflow
//! schedulers and dependency resolvers. The engine only orders callback
//! invocations; it never runs work concurrently on the caller's behalf.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: vertex/edge storage, the cycle guard, and the lock-guarded `Dag`
//! - `traversal`: visitors and walks
//! - `flow`: topological value propagation
//! - `storage`: the serialization adapter
//! - `error`: the error type shared by all of the above
//!
//! # Example
//!
//! ```rust
//! use trellis_core::flow::FlowResult;
//! use trellis_core::graph::{Dag, Graph, VertexId};
//!
//! let dag = Dag::new();
//! for i in 0..5i64 {
//!     dag.add_vertex_by_id(i.to_string(), i).unwrap();
//! }
//! for (src, dst) in [("0", "1"), ("0", "3"), ("1", "2"), ("2", "4"), ("3", "4")] {
//!     dag.add_edge(src, dst).unwrap();
//! }
//!
//! // Each vertex adds its own value to the results of its parents.
//! let results = dag
//!     .descendants_flow_results("0", &[], |g: &Graph<i64>, id: &VertexId, parents: &[FlowResult<i64>]| {
//!         let own = *g.vertex(id)?;
//!         Ok::<_, trellis_core::error::DagError>(own + parents.iter().map(|p| p.result).sum::<i64>())
//!     })
//!     .unwrap();
//!
//! assert_eq!(results["4"], 10);
//! ```

pub mod error;
pub mod flow;
pub mod graph;
pub mod storage;
pub mod traversal;

pub use error::{DagError, DagResult};
pub use flow::FlowResult;
pub use graph::{Dag, Graph, VertexId};
pub use traversal::Visitor;
