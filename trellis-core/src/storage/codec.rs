//! JSON and MessagePack codecs.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{from_storable, StorableDag};
use crate::error::{DagError, DagResult};
use crate::graph::Dag;

/// Convert a codec error, recovering [`DagError::UnsupportedDecodeTarget`]
/// when the decode target was a bare graph.
fn decode_error<E>(err: E) -> DagError
where
    E: Into<DagError> + fmt::Display,
{
    let unsupported = DagError::UnsupportedDecodeTarget.to_string();
    if err.to_string().contains(&unsupported) {
        DagError::UnsupportedDecodeTarget
    } else {
        err.into()
    }
}

/// Encode a DAG as a JSON document.
pub fn to_json<T: Serialize>(dag: &Dag<T>) -> DagResult<String> {
    Ok(serde_json::to_string(dag)?)
}

/// Decode a JSON document through the intermediate type `S` and rebuild the DAG.
///
/// ```
/// use trellis_core::graph::Dag;
/// use trellis_core::storage::{from_json, to_json, StoredDag};
///
/// let dag = Dag::new();
/// dag.add_vertex_by_id("1", "v1".to_string()).unwrap();
/// dag.add_vertex_by_id("2", "v2".to_string()).unwrap();
/// dag.add_edge("1", "2").unwrap();
///
/// let json = to_json(&dag).unwrap();
/// let copy = from_json::<String, StoredDag<String>>(&json).unwrap();
/// assert_eq!(dag, copy);
/// ```
pub fn from_json<T, S>(data: &str) -> DagResult<Dag<T>>
where
    T: Clone,
    S: StorableDag<T> + DeserializeOwned,
{
    let storable: S = serde_json::from_str(data).map_err(decode_error)?;
    from_storable(&storable)
}

/// Encode a DAG as MessagePack, with field names.
pub fn to_msgpack<T: Serialize>(dag: &Dag<T>) -> DagResult<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(dag)?)
}

/// Decode MessagePack through the intermediate type `S` and rebuild the DAG.
pub fn from_msgpack<T, S>(data: &[u8]) -> DagResult<Dag<T>>
where
    T: Clone,
    S: StorableDag<T> + DeserializeOwned,
{
    let storable: S = rmp_serde::from_slice(data).map_err(decode_error)?;
    from_storable(&storable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::storage::StoredDag;

    fn sample() -> Dag<u64> {
        let dag = Dag::new();
        for (id, value) in [("a", 1), ("b", 2), ("c", 3)] {
            dag.add_vertex_by_id(id, value).unwrap();
        }
        dag.add_edge("a", "c").unwrap();
        dag.add_edge("b", "c").unwrap();
        dag
    }

    #[test]
    fn msgpack_round_trip() {
        let dag = sample();
        let bytes = to_msgpack(&dag).unwrap();
        let copy = from_msgpack::<u64, StoredDag<u64>>(&bytes).unwrap();
        assert_eq!(dag, copy);
        assert_eq!(to_json(&dag).unwrap(), to_json(&copy).unwrap());
    }

    #[test]
    fn bare_dag_cannot_be_decoded_from_msgpack() {
        let bytes = to_msgpack(&sample()).unwrap();
        let result: Result<Dag<u64>, _> = rmp_serde::from_slice(&bytes);
        assert!(result.is_err());

        let result = from_msgpack::<u64, Graph<u64>>(&bytes);
        assert!(matches!(result, Err(DagError::UnsupportedDecodeTarget)));
    }

    #[test]
    fn bare_graph_as_json_decode_target_is_unsupported() {
        let json = to_json(&sample()).unwrap();
        let result = from_json::<u64, Graph<u64>>(&json);
        assert!(matches!(result, Err(DagError::UnsupportedDecodeTarget)));
    }

    #[test]
    fn malformed_json_is_a_codec_error() {
        let result = from_json::<u64, StoredDag<u64>>("{not json");
        assert!(matches!(result, Err(DagError::Json(_))));
    }
}
