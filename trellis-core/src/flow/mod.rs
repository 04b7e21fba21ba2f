//! Flow Evaluator
//!
//! A flow propagates a computation from one vertex through everything
//! reachable from it, in dependency order. Each vertex is evaluated once, by a
//! caller-supplied aggregation callback that receives the results of the
//! vertex's predecessors.
//!
//! # Algorithm
//!
//! 1. Collect the reachable subgraph: the start vertex plus all of its
//!    descendants (or ancestors).
//! 2. For every vertex in it, count the predecessors that are also in the
//!    subgraph. Predecessors outside the subgraph are never awaited.
//! 3. Kahn's algorithm from the start vertex: evaluate a vertex, cache its
//!    result, decrement the count of each successor, and queue successors
//!    whose count reaches zero.
//!
//! # Ordering Contract
//!
//! Vertices are evaluated in the order they become ready. Vertices that
//! become ready while the same vertex is being processed are queued in
//! vertex-insertion order. A predecessor's results are passed in the order
//! of the vertex's own parent (or child) set, which is edge-insertion order.
//!
//! # Failure
//!
//! The first callback error stops the flow. It is returned as
//! [`DagError::AggregationFailed`] naming the vertex; results computed so far
//! are dropped and the graph itself is unaffected.

use std::collections::{HashMap, VecDeque};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::error::{BoxError, DagError, DagResult};
use crate::graph::{Direction, Graph, VertexId};

/// The result a flow computed for one vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowResult<R> {
    /// The vertex that produced the result.
    pub id: VertexId,

    /// The value returned by the callback for that vertex.
    pub result: R,
}

impl<R> FlowResult<R> {
    /// Create a flow result.
    pub fn new(id: impl Into<VertexId>, result: R) -> Self {
        Self {
            id: id.into(),
            result,
        }
    }
}

/// Predecessor results handed to the callback. Most vertices have few parents.
type Inputs<R> = SmallVec<[FlowResult<R>; 4]>;

impl<T> Graph<T> {
    /// Flow from `start` through its descendants and return the results of
    /// the leaves reached, in evaluation order.
    ///
    /// `inputs` is passed to the callback as the start vertex's parent
    /// results.
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
        let results = self.flow(start, Direction::Descendants, inputs, aggregate)?;
        Ok(self.terminal_results(results, Direction::Descendants))
    }

    /// Flow from `start` through its descendants and return every result,
    /// keyed by vertex ID in evaluation order.
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
        self.flow(start, Direction::Descendants, inputs, aggregate)
    }

    /// Flow from `start` through its ancestors and return the results of the
    /// roots reached, in evaluation order.
    ///
    /// Each vertex receives the results of its children.
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
        let results = self.flow(start, Direction::Ancestors, inputs, aggregate)?;
        Ok(self.terminal_results(results, Direction::Ancestors))
    }

    /// Flow from `start` through its ancestors and return every result.
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
        self.flow(start, Direction::Ancestors, inputs, aggregate)
    }

    fn flow<R, E, F>(
        &self,
        start: &str,
        direction: Direction,
        inputs: &[FlowResult<R>],
        mut aggregate: F,
    ) -> DagResult<IndexMap<VertexId, R>>
    where
        R: Clone,
        E: Into<BoxError>,
        F: FnMut(&Graph<T>, &VertexId, &[FlowResult<R>]) -> Result<R, E>,
    {
        let (start_id, _) = self.get_entry(start)?;
        let backward = match direction {
            Direction::Descendants => Direction::Ancestors,
            Direction::Ancestors => Direction::Descendants,
        };

        let mut subgraph: IndexSet<&VertexId> = self.reachable(start, direction);
        subgraph.insert(start_id);

        // Predecessors still to be evaluated, counting only those inside the subgraph.
        let mut pending: HashMap<&VertexId, usize> = HashMap::with_capacity(subgraph.len());
        for &id in &subgraph {
            let count = self
                .get(id)
                .map(|v| {
                    v.neighbors(backward)
                        .iter()
                        .filter(|p| subgraph.contains(p))
                        .count()
                })
                .unwrap_or(0);
            pending.insert(id, count);
        }

        let mut results: IndexMap<VertexId, R> = IndexMap::with_capacity(subgraph.len());
        let mut queue: VecDeque<&VertexId> = VecDeque::from([start_id]);

        while let Some(id) = queue.pop_front() {
            let vertex = self.get(id)?;

            let outcome = if id == start_id {
                aggregate(self, id, inputs)
            } else {
                let parents: Inputs<R> = vertex
                    .neighbors(backward)
                    .iter()
                    .filter_map(|p| {
                        results
                            .get(p.as_str())
                            .map(|r| FlowResult::new(p, r.clone()))
                    })
                    .collect();
                aggregate(self, id, &parents)
            };

            let result = match outcome {
                Ok(result) => result,
                Err(err) => {
                    let err = DagError::aggregation_failed(id, err);
                    warn!(vertex = %id, error = %err, "flow aborted");
                    return Err(err);
                }
            };
            trace!(vertex = %id, "evaluated flow vertex");
            results.insert(id.clone(), result);

            let mut ready = Vec::new();
            for next in vertex.neighbors(direction) {
                if let Some(count) = pending.get_mut(next) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(next);
                    }
                }
            }
            self.sort_by_insertion(&mut ready);
            queue.extend(ready);
        }

        Ok(results)
    }

    /// Keep the results of vertices with no further neighbors in `direction`.
    fn terminal_results<R>(
        &self,
        results: IndexMap<VertexId, R>,
        direction: Direction,
    ) -> Vec<FlowResult<R>> {
        results
            .into_iter()
            .filter(|(id, _)| {
                self.get(id)
                    .map(|v| v.neighbors(direction).is_empty())
                    .unwrap_or(false)
            })
            .map(|(id, result)| FlowResult { id, result })
            .collect()
    }
}
