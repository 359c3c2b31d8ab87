//! # Join-Graph Hypergraph Endpoint
//!
//! This module accepts a join graph from the coordinator, builds the join
//! hypergraph the enumerator would search, and reports the per-node topology:
//! which nodes are reachable through simple edges and which edges each node
//! holds. It is the inspection surface for the adjacency bookkeeping.
//!
//! - **Tables**: one hypergraph node each, in request order.
//! - **Edges**: join predicates, each naming the tables on its left and right
//!   side. One table per side makes a simple edge; more than one on either side
//!   makes a complex edge.
//!
//! ## Wire Protocol
//!
//! - Request: `POST /hypergraph` with JSON body (`JoinGraphRequest`)
//! - Response: JSON body (`HyperGraphResponse`)
//!
//! Malformed graphs (unknown table ids, empty or overlapping sides, limits
//! exceeded) are rejected with 400 Bad Request.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use optx_hypergraph::expr::{Expr, JoinType, TableRef};
use optx_hypergraph::{GraphConfig, HyperEdge, HyperGraph, HyperGraphBuilder, NodeSet};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// JSON wire-protocol types
// ---------------------------------------------------------------------------

/// Request body for `POST /hypergraph`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGraphRequest {
    /// Join inputs. The position of a table is its node index.
    pub tables: Vec<TableInfo>,
    /// Join predicates connecting sets of tables.
    #[serde(default)]
    pub edges: Vec<EdgeInfo>,
}

/// A join input.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    /// Unique identifier for this table within the request (e.g., "t0", "t1").
    pub id: String,
    /// Schema name (e.g., "tpch").
    pub schema: String,
    /// Table name (e.g., "customer").
    pub name: String,
}

/// A join predicate between two sets of tables.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeInfo {
    /// IDs of the tables referenced by the left side of the condition.
    pub left_table_ids: Vec<String>,
    /// IDs of the tables referenced by the right side of the condition.
    pub right_table_ids: Vec<String>,
    /// Join type (INNER, LEFT, RIGHT, FULL, SEMI, ANTI, CROSS).
    #[serde(default = "default_join_type")]
    pub join_type: String,
    /// Optional join condition, carried on the edge unchanged.
    #[serde(default)]
    pub condition: Option<Expr>,
}

fn default_join_type() -> String {
    "INNER".to_string()
}

/// Response body from the hypergraph endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperGraphResponse {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    /// Whether every table can be reached from the first one.
    pub connected: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub index: usize,
    pub table_id: String,
    pub table: String,
    /// IDs of the tables in this node's simple neighborhood, in node order.
    pub simple_neighbors: Vec<String>,
    pub simple_edges: Vec<usize>,
    pub complex_edges: Vec<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeView {
    pub index: usize,
    pub simple: bool,
    pub join_type: String,
    pub left_table_ids: Vec<String>,
    pub right_table_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /hypergraph: build the join hypergraph and report its topology.
pub async fn inspect_hypergraph(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JoinGraphRequest>,
) -> Result<Json<HyperGraphResponse>, (StatusCode, String)> {
    let graph = build_hypergraph(&req, &state.config.graph)?;
    debug!(
        "Built hypergraph for {} tables, {} edges",
        graph.num_nodes(),
        graph.edges().len()
    );
    Ok(Json(describe(&graph, &req)))
}

// ---------------------------------------------------------------------------
// Hypergraph construction from the join graph
// ---------------------------------------------------------------------------

/// Build and seal a hypergraph from the request.
///
/// Node `i` is `req.tables[i]`; its plan handle is the table position, which is
/// the memo group the coordinator assigns to the table scan.
fn build_hypergraph(
    req: &JoinGraphRequest,
    config: &GraphConfig,
) -> Result<HyperGraph, (StatusCode, String)> {
    let mut index_of: HashMap<&str, usize> = HashMap::new();
    for (idx, table) in req.tables.iter().enumerate() {
        if index_of.insert(table.id.as_str(), idx).is_some() {
            return Err(bad_request(format!("Duplicate table ID: {}", table.id)));
        }
    }

    let plans = (0..req.tables.len() as u32).collect();
    let mut builder = HyperGraphBuilder::new(plans, config.clone()).map_err(bad_request)?;

    for edge in &req.edges {
        let left = resolve_ids(&edge.left_table_ids, &index_of)?;
        let right = resolve_ids(&edge.right_table_ids, &index_of)?;
        builder
            .add_edge(
                join_type(&edge.join_type),
                edge.condition.clone(),
                &left,
                &right,
            )
            .map_err(bad_request)?;
    }

    Ok(builder.build())
}

/// Parse a wire join type, warning when an unknown name falls back to INNER.
fn join_type(name: &str) -> JoinType {
    let parsed = JoinType::parse(name);
    if !parsed.as_str().eq_ignore_ascii_case(name) {
        warn!("Unknown join type {:?}, treating the edge as INNER", name);
    }
    parsed
}

fn resolve_ids(
    ids: &[String],
    index_of: &HashMap<&str, usize>,
) -> Result<Vec<usize>, (StatusCode, String)> {
    ids.iter()
        .map(|id| {
            index_of
                .get(id.as_str())
                .copied()
                .ok_or_else(|| bad_request(format!("Unknown table ID: {}", id)))
        })
        .collect()
}

fn bad_request(err: impl ToString) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

// ---------------------------------------------------------------------------
// Hypergraph → response conversion
// ---------------------------------------------------------------------------

fn describe(graph: &HyperGraph, req: &JoinGraphRequest) -> HyperGraphResponse {
    let table_ids = |set: &NodeSet| -> Vec<String> {
        set.iter().map(|i| req.tables[i].id.clone()).collect()
    };

    let nodes = graph
        .nodes()
        .iter()
        .map(|node| {
            let table = &req.tables[node.index()];
            NodeView {
                index: node.index(),
                table_id: table.id.clone(),
                table: TableRef {
                    schema: table.schema.clone(),
                    name: table.name.clone(),
                }
                .to_string(),
                simple_neighbors: table_ids(node.simple_neighborhood()),
                simple_edges: node.simple_edges().to_vec(),
                complex_edges: node.complex_edges().to_vec(),
            }
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| EdgeView {
            index: edge.id(),
            simple: edge.is_simple(),
            join_type: edge.join_type().as_str().to_string(),
            left_table_ids: table_ids(edge.left()),
            right_table_ids: table_ids(edge.right()),
            condition: edge.condition().map(|c| c.to_string()),
        })
        .collect();

    HyperGraphResponse {
        nodes,
        edges,
        connected: graph.is_fully_connected(),
    }
}
