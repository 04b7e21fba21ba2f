//! Integration Tests for the DAG Engine
//!
//! Golden walk orders, flow evaluation and the storage encoding, exercised
//! through the shared `Dag` handle.

use std::sync::{Arc, Mutex};

use trellis_core::flow::FlowResult;
use trellis_core::graph::{Dag, Graph, VertexId};
use trellis_core::storage::{self, StorableDag, StoredDag};
use trellis_core::{DagError, Visitor};

/// Collects visited values in order.
#[derive(Default)]
struct Recorder {
    values: Vec<String>,
}

impl Visitor<String> for Recorder {
    fn visit(&mut self, _id: &VertexId, value: &String) {
        self.values.push(value.clone());
    }
}

fn build(edges: &[(&str, &str)]) -> Dag<String> {
    let dag = Dag::new();
    for id in ["1", "2", "3", "4", "5"] {
        dag.add_vertex_by_id(id, format!("v{id}")).unwrap();
    }
    for (src, dst) in edges {
        dag.add_edge(src, dst).unwrap();
    }
    dag
}

// v1 -> v2 -> v3
//        \--> v4 -> v5
fn walk_dag_1() -> Dag<String> {
    build(&[("1", "2"), ("2", "3"), ("2", "4"), ("4", "5")])
}

// v1 -> v3 -> v5
// v2 ---^     ^
// v4 ---------/
fn walk_dag_2() -> Dag<String> {
    build(&[("1", "3"), ("2", "3"), ("3", "5"), ("4", "5")])
}

// v1 -> v3 <- v2
// v4 -> v5
fn walk_dag_3() -> Dag<String> {
    build(&[("1", "3"), ("2", "3"), ("4", "5")])
}

// v1 -> v2 -> v3 -> v5
//        \--> v4
fn walk_dag_4() -> Dag<String> {
    build(&[("1", "2"), ("2", "3"), ("3", "5"), ("2", "4")])
}

fn dfs(dag: &Dag<String>) -> Vec<String> {
    let mut recorder = Recorder::default();
    dag.dfs_walk(&mut recorder);
    recorder.values
}

fn bfs(dag: &Dag<String>) -> Vec<String> {
    let mut recorder = Recorder::default();
    dag.bfs_walk(&mut recorder);
    recorder.values
}

#[test]
fn dfs_golden_orders() {
    let cases = [
        (walk_dag_1(), ["v1", "v2", "v3", "v4", "v5"]),
        (walk_dag_2(), ["v1", "v3", "v5", "v2", "v4"]),
        (walk_dag_3(), ["v1", "v3", "v2", "v4", "v5"]),
        (walk_dag_4(), ["v1", "v2", "v3", "v5", "v4"]),
    ];

    for (dag, expected) in cases {
        assert_eq!(dfs(&dag), expected);
    }
}

#[test]
fn bfs_golden_orders() {
    let cases = [
        (walk_dag_1(), ["v1", "v2", "v3", "v4", "v5"]),
        (walk_dag_2(), ["v1", "v2", "v4", "v3", "v5"]),
        (walk_dag_3(), ["v1", "v2", "v4", "v3", "v5"]),
        (walk_dag_4(), ["v1", "v2", "v3", "v4", "v5"]),
    ];

    for (dag, expected) in cases {
        assert_eq!(bfs(&dag), expected);
    }
}

#[test]
fn walks_are_repeatable() {
    let first = walk_dag_2();
    let second = walk_dag_2();
    assert_eq!(dfs(&first), dfs(&second));
    assert_eq!(bfs(&first), bfs(&second));
    assert_eq!(dfs(&first), dfs(&first));
}

#[test]
fn encoding_golden_documents() {
    let cases = [
        (
            walk_dag_1(),
            r#"{"vs":[{"i":"1","v":"v1"},{"i":"2","v":"v2"},{"i":"3","v":"v3"},{"i":"4","v":"v4"},{"i":"5","v":"v5"}],"es":[{"s":"1","d":"2"},{"s":"2","d":"3"},{"s":"2","d":"4"},{"s":"4","d":"5"}]}"#,
        ),
        (
            walk_dag_2(),
            r#"{"vs":[{"i":"1","v":"v1"},{"i":"3","v":"v3"},{"i":"5","v":"v5"},{"i":"2","v":"v2"},{"i":"4","v":"v4"}],"es":[{"s":"1","d":"3"},{"s":"3","d":"5"},{"s":"2","d":"3"},{"s":"4","d":"5"}]}"#,
        ),
        (
            walk_dag_3(),
            r#"{"vs":[{"i":"1","v":"v1"},{"i":"3","v":"v3"},{"i":"2","v":"v2"},{"i":"4","v":"v4"},{"i":"5","v":"v5"}],"es":[{"s":"1","d":"3"},{"s":"2","d":"3"},{"s":"4","d":"5"}]}"#,
        ),
        (
            walk_dag_4(),
            r#"{"vs":[{"i":"1","v":"v1"},{"i":"2","v":"v2"},{"i":"3","v":"v3"},{"i":"5","v":"v5"},{"i":"4","v":"v4"}],"es":[{"s":"1","d":"2"},{"s":"2","d":"3"},{"s":"2","d":"4"},{"s":"3","d":"5"}]}"#,
        ),
    ];

    for (dag, expected) in cases {
        let json = storage::to_json(&dag).unwrap();
        assert_eq!(json, expected);

        // Straight into a bare DAG: refused.
        let err = serde_json::from_str::<Dag<String>>(&json).unwrap_err();
        assert!(err
            .to_string()
            .contains(&DagError::UnsupportedDecodeTarget.to_string()));
        assert!(matches!(
            storage::from_json::<String, Graph<String>>(&json),
            Err(DagError::UnsupportedDecodeTarget)
        ));

        // Through the intermediate structure: identical graph.
        let decoded = storage::from_json::<String, StoredDag<String>>(&json).unwrap();
        assert_eq!(decoded, dag);
        assert_eq!(storage::to_json(&decoded).unwrap(), json);
    }
}

/// A caller-defined intermediate structure with its own field layout.
#[derive(serde::Deserialize)]
struct Payload {
    vs: Vec<PayloadVertex>,
    es: Vec<PayloadEdge>,
}

#[derive(serde::Deserialize)]
struct PayloadVertex {
    i: String,
    v: String,
}

#[derive(serde::Deserialize)]
struct PayloadEdge {
    s: String,
    d: String,
}

impl StorableDag<String> for Payload {
    fn stored_vertices(&self) -> Vec<(&str, &String)> {
        self.vs.iter().map(|v| (v.i.as_str(), &v.v)).collect()
    }

    fn stored_edges(&self) -> Vec<(&str, &str)> {
        self.es.iter().map(|e| (e.s.as_str(), e.d.as_str())).collect()
    }
}

#[test]
fn decode_through_custom_intermediate() {
    let dag = walk_dag_4();
    let json = storage::to_json(&dag).unwrap();
    let decoded = storage::from_json::<String, Payload>(&json).unwrap();
    assert_eq!(decoded, dag);
}

#[test]
fn hand_edited_cycle_is_rejected_on_decode() {
    let json = r#"{"vs":[{"i":"1","v":"v1"},{"i":"2","v":"v2"}],"es":[{"s":"1","d":"2"},{"s":"2","d":"1"}]}"#;
    let result = storage::from_json::<String, StoredDag<String>>(json);
    assert!(matches!(result, Err(DagError::EdgeWouldCreateCycle { .. })));
}

#[test]
fn flow_sums_diamond() {
    let dag = Dag::new();
    let ids: Vec<VertexId> = (0..5i64).map(|i| dag.add_vertex(i)).collect();
    for (src, dst) in [(0, 1), (0, 3), (1, 2), (2, 4), (3, 4)] {
        dag.add_edge(&ids[src], &ids[dst]).unwrap();
    }

    let log = Arc::new(Mutex::new(Vec::new()));
    let log_clone = Arc::clone(&log);
    let leaves = dag
        .descendants_flow(&ids[0], &[], move |g: &Graph<i64>, id, parents| {
            let own = *g.vertex(id)?;
            let mut seen: Vec<i64> = parents
                .iter()
                .map(|p| *g.vertex(&p.id).unwrap_or(&-1))
                .collect();
            seen.sort_unstable();
            log_clone.lock().unwrap().push((own, seen));
            Ok::<_, DagError>(own + parents.iter().map(|p| p.result).sum::<i64>())
        })
        .unwrap();

    assert_eq!(leaves, vec![FlowResult::new(ids[4].clone(), 10)]);

    let log = log.lock().unwrap();
    assert_eq!(
        *log,
        vec![
            (0, vec![]),
            (1, vec![0]),
            (3, vec![0]),
            (2, vec![1]),
            (4, vec![2, 3]),
        ]
    );
}

#[test]
fn flow_never_runs_a_vertex_before_its_parents() {
    // Wide fan-out followed by fan-in, inserted in a scrambled order.
    let dag = Dag::new();
    for id in ["sink", "b", "root", "c", "a", "mid"] {
        dag.add_vertex_by_id(id, ()).unwrap();
    }
    for (src, dst) in [
        ("root", "a"),
        ("root", "b"),
        ("root", "c"),
        ("a", "mid"),
        ("b", "mid"),
        ("mid", "sink"),
        ("c", "sink"),
    ] {
        dag.add_edge(src, dst).unwrap();
    }

    let results = dag
        .descendants_flow_results("root", &[], |g: &Graph<()>, id, parents| {
            let expected = g.parents(id)?.len();
            let given = if id.as_str() == "root" { 0 } else { parents.len() };
            assert_eq!(expected, given, "vertex {id} ran early");
            Ok::<_, DagError>(())
        })
        .unwrap();

    let order: Vec<&str> = results.keys().map(VertexId::as_str).collect();
    // Ties among root's children broken by vertex insertion: b, c, a.
    assert_eq!(order, vec!["root", "b", "c", "a", "mid", "sink"]);
}

#[test]
fn failed_flow_leaves_graph_usable() {
    let dag = walk_dag_1();
    let result = dag.descendants_flow_results("1", &[], |_, id, _| {
        if id.as_str() == "4" {
            Err("refused")
        } else {
            Ok(1)
        }
    });
    assert!(matches!(
        result,
        Err(DagError::AggregationFailed { ref id, .. }) if id.as_str() == "4"
    ));

    dag.add_edge("3", "5").unwrap();
    assert_eq!(dag.size(), 5);
    assert_eq!(dfs(&dag), vec!["v1", "v2", "v3", "v5", "v4"]);
}

#[test]
fn delete_vertex_then_walk() {
    let dag = walk_dag_1();
    dag.delete_vertex("2").unwrap();

    assert_eq!(dag.get_roots().len(), 3);
    assert_eq!(dfs(&dag), vec!["v1", "v3", "v4", "v5"]);
    assert!(matches!(
        dag.get_children("2"),
        Err(DagError::VertexNotFound { .. })
    ));
}

#[test]
fn ordered_descendants_and_ancestors() {
    let dag = walk_dag_4();
    let down: Vec<String> = dag
        .get_ordered_descendants("2")
        .unwrap()
        .into_iter()
        .map(VertexId::into_string)
        .collect();
    assert_eq!(down, vec!["3", "4", "5"]);

    let up: Vec<String> = dag
        .get_ordered_ancestors("5")
        .unwrap()
        .into_iter()
        .map(VertexId::into_string)
        .collect();
    assert_eq!(up, vec!["3", "2", "1"]);
}
