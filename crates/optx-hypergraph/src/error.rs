//! Error types for hypergraph construction.
//!
//! Every variant is a caller bug: a malformed edge, an index outside the graph,
//! or an edge attached to a node it does not touch. They are reported instead of
//! being absorbed into the neighborhood bitmap, because a corrupted bitmap makes
//! the enumerator miss or invent join opportunities without any visible symptom.

use thiserror::Error;

use crate::edge::EdgeId;

pub type Result<T> = std::result::Result<T, HyperGraphError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HyperGraphError {
    #[error("hypergraph must contain at least one node")]
    EmptyGraph,

    #[error("hypergraph has {count} nodes, limit is {limit}")]
    TooManyNodes { count: usize, limit: usize },

    #[error("hypergraph edge limit of {limit} reached")]
    TooManyEdges { limit: usize },

    #[error("node index {index} out of range for a graph of {num_nodes} nodes")]
    NodeOutOfRange { index: usize, num_nodes: usize },

    #[error("edge has an empty {side} side")]
    EmptyEdgeSide { side: &'static str },

    #[error("edge sides overlap on nodes {overlap}")]
    OverlappingEdgeSides { overlap: String },

    #[error("edge {edge} does not reference node {node}")]
    EdgeNotIncident { edge: EdgeId, node: usize },

    #[error("unknown edge {edge}")]
    UnknownEdge { edge: EdgeId },
}
