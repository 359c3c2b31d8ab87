//! # Join Hypergraph
//!
//! The hypergraph has two phases, each with its own type:
//!
//! 1. **Construction** (`HyperGraphBuilder`): one node per join input is created
//!    up front, then edges are added one join predicate at a time. The builder
//!    owns every node exclusively and attaches each new edge to all nodes on
//!    either of its sides, which keeps the per-node neighborhood bitmaps in sync
//!    with the edge lists.
//!
//! 2. **Sealed** (`HyperGraph`): produced by `HyperGraphBuilder::build`. It only
//!    hands out shared references, so nothing can mutate a node once enumeration
//!    starts. The sealed graph is `Send + Sync`; enumeration threads may query it
//!    concurrently without locking.
//!
//! ## Neighborhood Queries
//!
//! The sealed graph answers the adjacency questions asked by the join
//! enumerator. Each query first takes the bitmap fast path (OR of the simple
//! neighborhoods of the nodes involved) and only walks complex edges when that
//! is not enough:
//!
//! - `neighborhood(S, X)`: nodes adjacent to subgraph `S` that are not in `S`
//!   or the forbidden set `X`. A complex edge contributes the lowest index of
//!   its far side, the representative used by DPhyp-style enumeration.
//! - `is_connected(A, B)`: whether any edge joins `A` to `B`.
//! - `edges_between(A, B)`: all edges whose sides lie in `A` and `B`, which is
//!   the join condition for the pair.
//!
//! A graph with N join inputs allocates N bitmaps of N bits. Builds beyond
//! `GraphConfig::max_nodes` are refused.

use tracing::debug;

use crate::edge::{EdgeId, HyperEdge, JoinEdge};
use crate::error::{HyperGraphError, Result};
use crate::expr::{Expr, JoinType};
use crate::node::{GroupId, Node};
use crate::node_set::NodeSet;

/// Limits applied while building a hypergraph.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Upper bound on the number of join inputs.
    pub max_nodes: usize,
    /// Upper bound on the number of edges (join predicates).
    pub max_edges: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_nodes: 256,
            max_edges: 10_000,
        }
    }
}

/// Construction phase of a hypergraph.
pub struct HyperGraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<JoinEdge>,
    config: GraphConfig,
}

impl HyperGraphBuilder {
    /// Create one node per entry of `plans`; node `i` wraps `plans[i]`.
    pub fn new(plans: Vec<GroupId>, config: GraphConfig) -> Result<Self> {
        if plans.is_empty() {
            return Err(HyperGraphError::EmptyGraph);
        }
        if plans.len() > config.max_nodes {
            return Err(HyperGraphError::TooManyNodes {
                count: plans.len(),
                limit: config.max_nodes,
            });
        }

        let num_nodes = plans.len();
        let nodes = plans
            .into_iter()
            .enumerate()
            .map(|(index, plan)| Node::new(index, plan, num_nodes))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            nodes,
            edges: Vec::new(),
            config,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Add a join predicate connecting the `left` nodes to the `right` nodes.
    ///
    /// The edge is attached to every node on either side. Returns the id of the
    /// new edge.
    pub fn add_edge(
        &mut self,
        join_type: JoinType,
        condition: Option<Expr>,
        left: &[usize],
        right: &[usize],
    ) -> Result<EdgeId> {
        if self.edges.len() >= self.config.max_edges {
            return Err(HyperGraphError::TooManyEdges {
                limit: self.config.max_edges,
            });
        }
        let left = self.node_set(left)?;
        let right = self.node_set(right)?;

        let id = self.edges.len();
        let edge = JoinEdge::new(id, join_type, condition, left, right)?;

        for index in edge.nodes().iter() {
            self.nodes[index].attach_edge(id, &edge)?;
        }
        debug!("Added hyperedge {} (simple={})", edge, edge.is_simple());

        self.edges.push(edge);
        Ok(id)
    }

    /// Attach an already added edge to `node` once more.
    ///
    /// Edge lists are append-only, so the edge is listed again; the node must
    /// still be referenced by the edge.
    pub fn attach(&mut self, node: usize, edge: EdgeId) -> Result<()> {
        let num_nodes = self.nodes.len();
        let target = self
            .nodes
            .get_mut(node)
            .ok_or(HyperGraphError::NodeOutOfRange {
                index: node,
                num_nodes,
            })?;
        let edge_ref = self
            .edges
            .get(edge)
            .ok_or(HyperGraphError::UnknownEdge { edge })?;
        target.attach_edge(edge, edge_ref)
    }

    /// Seal the graph. No node can be mutated afterwards.
    pub fn build(self) -> HyperGraph {
        let simple = self.edges.iter().filter(|e| e.is_simple()).count();
        debug!(
            "Sealed hypergraph: nodes={}, edges={} (simple={}, complex={})",
            self.nodes.len(),
            self.edges.len(),
            simple,
            self.edges.len() - simple
        );
        HyperGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    fn node_set(&self, indices: &[usize]) -> Result<NodeSet> {
        let num_nodes = self.nodes.len();
        let mut set = NodeSet::new(num_nodes);
        for &index in indices {
            if index >= num_nodes {
                return Err(HyperGraphError::NodeOutOfRange { index, num_nodes });
            }
            set.insert(index);
        }
        Ok(set)
    }
}

/// A sealed, read-only join hypergraph.
#[derive(Debug, Clone)]
pub struct HyperGraph {
    nodes: Vec<Node>,
    edges: Vec<JoinEdge>,
}

impl HyperGraph {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn edges(&self) -> &[JoinEdge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&JoinEdge> {
        self.edges.get(id)
    }

    /// Panics unless `set` was sized for this graph.
    fn check_capacity(&self, set: &NodeSet) {
        assert_eq!(
            set.capacity(),
            self.nodes.len(),
            "node set of capacity {} used with a graph of {} nodes",
            set.capacity(),
            self.nodes.len()
        );
    }

    /// The set of every node in the graph.
    pub fn all_nodes(&self) -> NodeSet {
        NodeSet::full(self.nodes.len())
    }

    /// Nodes adjacent to `subgraph`, excluding `subgraph` and `forbidden`.
    ///
    /// # Panics
    ///
    /// Panics if either set's capacity differs from `num_nodes()`. The same
    /// holds for every query below that takes a `NodeSet`.
    pub fn neighborhood(&self, subgraph: &NodeSet, forbidden: &NodeSet) -> NodeSet {
        self.check_capacity(subgraph);
        self.check_capacity(forbidden);
        let excluded = subgraph.union(forbidden);

        let mut result = NodeSet::new(self.nodes.len());
        for index in subgraph.iter() {
            result.union_with(self.nodes[index].simple_neighborhood());
        }
        let mut result = result.difference(&excluded);

        for edge in self.complex_edges_of(subgraph) {
            let far = if edge.left().is_subset_of(subgraph) {
                edge.right()
            } else if edge.right().is_subset_of(subgraph) {
                edge.left()
            } else {
                continue;
            };
            if far.is_disjoint(&excluded) {
                if let Some(representative) = far.first() {
                    result.insert(representative);
                }
            }
        }
        result
    }

    /// True if at least one edge joins `left` to `right`.
    pub fn is_connected(&self, left: &NodeSet, right: &NodeSet) -> bool {
        self.check_capacity(left);
        self.check_capacity(right);
        if left
            .iter()
            .any(|index| self.nodes[index].simple_neighborhood().intersects(right))
        {
            return true;
        }
        self.complex_edges_of(left)
            .any(|edge| edge.connects(left, right))
    }

    /// Every edge connecting `left` to `right`, in ascending id order.
    pub fn edges_between(&self, left: &NodeSet, right: &NodeSet) -> Vec<EdgeId> {
        self.check_capacity(left);
        self.check_capacity(right);
        let mut ids: Vec<EdgeId> = left
            .iter()
            .flat_map(move |index| {
                let node = &self.nodes[index];
                node.simple_edges().iter().chain(node.complex_edges())
            })
            .copied()
            .filter(|&id| self.edges[id].connects(left, right))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// All nodes reachable from `start` by repeatedly crossing edges.
    ///
    /// A complex edge is crossed once one of its sides is fully reached, and
    /// then brings in its whole far side.
    pub fn reachable_from(&self, start: &NodeSet) -> NodeSet {
        self.check_capacity(start);
        let mut reached = start.clone();
        loop {
            let mut next = reached.clone();
            for index in reached.iter() {
                next.union_with(self.nodes[index].simple_neighborhood());
            }
            for edge in self.complex_edges_of(&reached) {
                if edge.left().is_subset_of(&reached) {
                    next.union_with(edge.right());
                } else if edge.right().is_subset_of(&reached) {
                    next.union_with(edge.left());
                }
            }
            if next == reached {
                return reached;
            }
            reached = next;
        }
    }

    /// True if every node can be reached from node 0.
    pub fn is_fully_connected(&self) -> bool {
        let start = NodeSet::singleton(self.nodes.len(), 0);
        self.reachable_from(&start) == self.all_nodes()
    }

    fn complex_edges_of<'a>(&'a self, nodes: &'a NodeSet) -> impl Iterator<Item = &'a JoinEdge> + 'a {
        nodes
            .iter()
            .flat_map(move |index| self.nodes[index].complex_edges().iter())
            .map(move |&id| &self.edges[id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(n: usize, indices: &[usize]) -> NodeSet {
        NodeSet::from_indices(n, indices.iter().copied())
    }

    /// Chain 0 - 1 - 2 - 3 with simple edges, plus a complex edge {0, 1} - {3}.
    fn chain_with_hyperedge() -> HyperGraph {
        let mut b = HyperGraphBuilder::new(vec![10, 11, 12, 13], GraphConfig::default()).unwrap();
        b.add_edge(JoinType::Inner, None, &[0], &[1]).unwrap();
        b.add_edge(JoinType::Inner, None, &[1], &[2]).unwrap();
        b.add_edge(JoinType::Inner, None, &[2], &[3]).unwrap();
        b.add_edge(JoinType::Inner, None, &[0, 1], &[3]).unwrap();
        b.build()
    }

    #[test]
    fn test_builder_rejects_empty_and_oversized_graphs() {
        assert_eq!(
            HyperGraphBuilder::new(vec![], GraphConfig::default()).err(),
            Some(HyperGraphError::EmptyGraph)
        );
        let config = GraphConfig {
            max_nodes: 2,
            ..GraphConfig::default()
        };
        assert_eq!(
            HyperGraphBuilder::new(vec![0, 1, 2], config).err(),
            Some(HyperGraphError::TooManyNodes { count: 3, limit: 2 })
        );
    }

    #[test]
    fn test_add_edge_validates_indices_and_limit() {
        let config = GraphConfig {
            max_edges: 1,
            ..GraphConfig::default()
        };
        let mut b = HyperGraphBuilder::new(vec![0, 1, 2], config).unwrap();
        assert_eq!(
            b.add_edge(JoinType::Inner, None, &[0], &[5]),
            Err(HyperGraphError::NodeOutOfRange { index: 5, num_nodes: 3 })
        );
        assert_eq!(
            b.add_edge(JoinType::Inner, None, &[], &[1]),
            Err(HyperGraphError::EmptyEdgeSide { side: "left" })
        );
        assert_eq!(b.add_edge(JoinType::Inner, None, &[0], &[1]), Ok(0));
        assert_eq!(
            b.add_edge(JoinType::Inner, None, &[1], &[2]),
            Err(HyperGraphError::TooManyEdges { limit: 1 })
        );
        assert_eq!(b.num_edges(), 1);
    }

    #[test]
    fn test_attach_existing_edge() {
        let mut b = HyperGraphBuilder::new(vec![0, 1, 2], GraphConfig::default()).unwrap();
        let e = b.add_edge(JoinType::Inner, None, &[0], &[1]).unwrap();
        b.attach(0, e).unwrap();
        assert_eq!(
            b.attach(2, e),
            Err(HyperGraphError::EdgeNotIncident { edge: e, node: 2 })
        );
        assert_eq!(b.attach(0, 9), Err(HyperGraphError::UnknownEdge { edge: 9 }));
        assert_eq!(
            b.attach(7, e),
            Err(HyperGraphError::NodeOutOfRange { index: 7, num_nodes: 3 })
        );

        let graph = b.build();
        assert_eq!(graph.node(0).unwrap().simple_edges(), &[e, e]);
        assert_eq!(graph.node(1).unwrap().simple_edges(), &[e]);
        assert!(graph.node(2).unwrap().simple_edges().is_empty());
    }

    #[test]
    fn test_neighborhood_simple_fast_path() {
        let graph = chain_with_hyperedge();
        let n = graph.num_nodes();

        let nb = graph.neighborhood(&set(n, &[1]), &set(n, &[]));
        assert_eq!(nb, set(n, &[0, 2]));

        let nb = graph.neighborhood(&set(n, &[1]), &set(n, &[0]));
        assert_eq!(nb, set(n, &[2]));
    }

    #[test]
    fn test_neighborhood_includes_complex_representative() {
        let graph = chain_with_hyperedge();
        let n = graph.num_nodes();

        // {0, 1} covers the left side of the hyperedge, so 3 becomes reachable.
        let nb = graph.neighborhood(&set(n, &[0, 1]), &set(n, &[2]));
        assert_eq!(nb, set(n, &[3]));

        // From {3} the far side {0, 1} is represented by its lowest index.
        let nb = graph.neighborhood(&set(n, &[3]), &set(n, &[2]));
        assert_eq!(nb, set(n, &[0]));

        // {0} alone does not cover {0, 1}.
        let nb = graph.neighborhood(&set(n, &[0]), &set(n, &[]));
        assert_eq!(nb, set(n, &[1]));
    }

    #[test]
    fn test_is_connected_and_edges_between() {
        let graph = chain_with_hyperedge();
        let n = graph.num_nodes();

        assert!(graph.is_connected(&set(n, &[0]), &set(n, &[1])));
        assert!(!graph.is_connected(&set(n, &[0]), &set(n, &[3])));
        // Only the hyperedge joins {0, 1} to {3}.
        assert!(graph.is_connected(&set(n, &[0, 1]), &set(n, &[3])));
        assert_eq!(graph.edges_between(&set(n, &[0, 1]), &set(n, &[3])), vec![3]);
        assert_eq!(
            graph.edges_between(&set(n, &[0, 1, 2]), &set(n, &[3])),
            vec![2, 3]
        );
        assert!(graph.edges_between(&set(n, &[0]), &set(n, &[2])).is_empty());
    }

    #[test]
    #[should_panic(expected = "node set of capacity 8 used with a graph of 4 nodes")]
    fn test_is_connected_rejects_foreign_set() {
        let graph = chain_with_hyperedge();
        graph.is_connected(&NodeSet::singleton(8, 6), &set(4, &[0]));
    }

    #[test]
    #[should_panic(expected = "used with a graph of 4 nodes")]
    fn test_neighborhood_rejects_foreign_set() {
        let graph = chain_with_hyperedge();
        graph.neighborhood(&set(4, &[0]), &NodeSet::new(3));
    }

    #[test]
    #[should_panic(expected = "used with a graph of 4 nodes")]
    fn test_reachable_from_rejects_foreign_set() {
        chain_with_hyperedge().reachable_from(&NodeSet::singleton(2, 1));
    }

    #[test]
    fn test_reachability() {
        let mut b = HyperGraphBuilder::new(vec![0, 1, 2, 3], GraphConfig::default()).unwrap();
        b.add_edge(JoinType::Inner, None, &[0], &[1]).unwrap();
        b.add_edge(JoinType::Inner, None, &[0, 1], &[2]).unwrap();
        let graph = b.build();
        let n = graph.num_nodes();

        assert_eq!(graph.reachable_from(&set(n, &[0])), set(n, &[0, 1, 2]));
        assert_eq!(graph.reachable_from(&set(n, &[2])), set(n, &[0, 1, 2]));
        assert_eq!(graph.reachable_from(&set(n, &[3])), set(n, &[3]));
        assert!(!graph.is_fully_connected());
        assert!(chain_with_hyperedge().is_fully_connected());
    }
}
