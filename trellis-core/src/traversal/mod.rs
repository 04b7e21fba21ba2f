//! Traversal Engine
//!
//! Walks over a [`Graph`](crate::graph::Graph) driven by a [`Visitor`].
//!
//! # Ordering
//!
//! Every walk is a pure function of the graph's build history:
//!
//! - Roots (vertices without parents) are taken in vertex-insertion order.
//! - Children are taken in edge-insertion order.
//! - A vertex is visited at most once per walk, even when it is reachable
//!   from several roots or through a diamond-shaped fan-in.
//!
//! The visited set lives on the stack of the walk itself, never on the
//! vertices, so concurrent walks over one shared graph do not interfere.

mod visitor;
mod walk;

pub use visitor::Visitor;
