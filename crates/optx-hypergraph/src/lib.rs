//! # optx-hypergraph: Join Hypergraph Topology
//!
//! This crate implements the topology layer of the join hypergraph consumed by
//! join-order enumeration. Vertices are join inputs (base relations or already
//! planned sub-plans living in memo groups) and edges are join predicates, which
//! may connect more than one vertex on each side.
//!
//! The enumerator asks "is this set of nodes adjacent to that one?" on its
//! innermost loop. Most join predicates are binary equi-joins, so every node
//! caches the nodes it reaches through binary ("simple") edges as a bitmap. The
//! common adjacency test is then a single bitmap intersection; multi-way
//! ("complex") edges stay in a short per-node list that is consulted only when
//! the bitmap is inconclusive.
//!
//! ## Module Overview
//!
//! - **`node_set`**: `NodeSet`, a fixed-width bitmap over node indices.
//! - **`expr`**: Join predicate vocabulary carried on edges (columns, operators, join types).
//! - **`edge`**: The `HyperEdge` contract and the concrete `JoinEdge`.
//! - **`node`**: `Node`, a vertex with its simple/complex edge lists and simple neighborhood.
//! - **`graph`**: `HyperGraphBuilder` (construction phase) and `HyperGraph` (sealed, read-only).
//! - **`error`**: Error type for precondition violations during construction.
//!
//! ## Lifecycle
//!
//! ```text
//! HyperGraphBuilder::new(plans)      // one Node per join input
//!   .add_edge(..) * N               // JoinEdge created, attached to every endpoint
//!   .build()                        // seal
//! HyperGraph                        // shared, read-only; Send + Sync
//! ```

pub mod edge;
pub mod error;
pub mod expr;
pub mod graph;
pub mod node;
pub mod node_set;

pub use edge::{EdgeId, HyperEdge, JoinEdge};
pub use error::{HyperGraphError, Result};
pub use graph::{GraphConfig, HyperGraph, HyperGraphBuilder};
pub use node::{GroupId, Node};
pub use node_set::NodeSet;
