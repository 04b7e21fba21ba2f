//! Graph Store
//!
//! This module implements the vertex/edge storage of the engine and the
//! invariant that keeps it a directed acyclic graph (DAG).
//!
//! # Overview
//!
//! - Vertices are identified by a string [`VertexId`] and carry a caller value.
//! - An edge `src -> dst` means `dst` depends on `src`: `src` is a parent of
//!   `dst`, `dst` is a child of `src`.
//! - Every edge insertion runs the cycle guard first. A rejected mutation
//!   leaves the graph untouched.
//!
//! # Design Decisions
//!
//! 1. [`Graph`] is the plain store and owns all the algorithms. [`Dag`] wraps
//!    it in a single reader/writer lock so one instance can be shared across
//!    threads: reads, walks and flows take the lock shared, mutations take it
//!    exclusively.
//!
//! 2. The graph is indexed by vertex ID for O(1) lookups, and each vertex
//!    keeps both parent and child sets for O(degree) neighbor queries in both
//!    directions.
//!
//! 3. Vertex order and per-vertex edge order are insertion order. Walks and
//!    flows break every tie with them, so their output is a function of the
//!    build history alone.

mod cycle;
mod dag;
mod store;
mod vertex;

pub use dag::Dag;
pub use store::Graph;
pub use vertex::{Direction, Vertex, VertexId};
