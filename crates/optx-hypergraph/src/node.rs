//! # Hypergraph Nodes
//!
//! A node is one join input: a base relation or an already-planned sub-plan,
//! identified by a stable index in `[0, N)` and wrapping the memo group that owns
//! the plan.
//!
//! Incident edges are split into two lists. Simple edges (one node on each
//! side) are also folded into `simple_neighborhood`, a bitmap of every node
//! reachable from this one through a single binary predicate. The enumerator
//! can therefore discard all simple edges with one bitmap test against the set
//! of nodes it is interested in, and only walks `complex_edges` when that test
//! is inconclusive.
//!
//! ## Invariants
//!
//! - `index` never changes after construction.
//! - The node's own bit is never set in `simple_neighborhood`, not even
//!   transiently while an edge is being attached.
//! - `simple_neighborhood` is exactly the union of the sides of the edges in
//!   `simple_edges`, minus `index`. It is a derived cache and is only written by
//!   `attach_edge`.
//! - Edge lists are append-only; attaching an edge twice lists it twice.

use tracing::trace;

use crate::edge::{EdgeId, HyperEdge};
use crate::error::{HyperGraphError, Result};
use crate::node_set::NodeSet;

/// Memo group that owns the sub-plan a node wraps.
pub type GroupId = u32;

#[derive(Debug, Clone)]
pub struct Node {
    index: usize,
    plan: GroupId,
    simple_edges: Vec<EdgeId>,
    complex_edges: Vec<EdgeId>,
    simple_neighborhood: NodeSet,
}

impl Node {
    /// Create node `index` of a graph with `num_nodes` nodes.
    ///
    /// Fails with `NodeOutOfRange` unless `index < num_nodes`.
    pub fn new(index: usize, plan: GroupId, num_nodes: usize) -> Result<Self> {
        if index >= num_nodes {
            return Err(HyperGraphError::NodeOutOfRange { index, num_nodes });
        }
        Ok(Self {
            index,
            plan,
            simple_edges: Vec::new(),
            complex_edges: Vec::new(),
            simple_neighborhood: NodeSet::new(num_nodes),
        })
    }

    /// Record `edge` (stored under `id`) as incident to this node.
    ///
    /// The edge must reference this node on one of its sides and only name
    /// indices inside the graph. Both checks run before anything is mutated, so
    /// a rejected edge leaves the node untouched.
    pub fn attach_edge<E: HyperEdge + ?Sized>(&mut self, id: EdgeId, edge: &E) -> Result<()> {
        let num_nodes = self.simple_neighborhood.capacity();
        if let Some(index) = edge
            .left()
            .iter()
            .chain(edge.right().iter())
            .find(|&i| i >= num_nodes)
        {
            return Err(HyperGraphError::NodeOutOfRange { index, num_nodes });
        }
        if !edge.left().contains(self.index) && !edge.right().contains(self.index) {
            return Err(HyperGraphError::EdgeNotIncident {
                edge: id,
                node: self.index,
            });
        }

        if edge.is_simple() {
            self.simple_edges.push(id);
            for neighbor in edge.left().iter().chain(edge.right().iter()) {
                if neighbor != self.index {
                    self.simple_neighborhood.insert(neighbor);
                }
            }
            trace!(
                "node {}: simple edge {} attached, neighborhood={}",
                self.index,
                id,
                self.simple_neighborhood
            );
        } else {
            self.complex_edges.push(id);
            trace!("node {}: complex edge {} attached", self.index, id);
        }
        Ok(())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn plan(&self) -> GroupId {
        self.plan
    }

    pub fn simple_edges(&self) -> &[EdgeId] {
        &self.simple_edges
    }

    pub fn complex_edges(&self) -> &[EdgeId] {
        &self.complex_edges
    }

    /// Nodes reachable through one simple edge. Never contains `index()`.
    pub fn simple_neighborhood(&self) -> &NodeSet {
        &self.simple_neighborhood
    }

    pub fn is_simple_neighbor(&self, other: usize) -> bool {
        self.simple_neighborhood.contains(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::JoinEdge;
    use crate::expr::JoinType;

    fn edge(id: EdgeId, left: &[usize], right: &[usize]) -> JoinEdge {
        JoinEdge::new(
            id,
            JoinType::Inner,
            None,
            NodeSet::from_indices(4, left.iter().copied()),
            NodeSet::from_indices(4, right.iter().copied()),
        )
        .unwrap()
    }

    #[test]
    fn test_new_node_is_empty() {
        let node = Node::new(2, 7, 4).unwrap();
        assert_eq!(node.index(), 2);
        assert_eq!(node.plan(), 7);
        assert!(node.simple_edges().is_empty());
        assert!(node.complex_edges().is_empty());
        assert!(node.simple_neighborhood().is_empty());
        assert_eq!(node.simple_neighborhood().capacity(), 4);
    }

    #[test]
    fn test_new_rejects_index_outside_graph() {
        assert_eq!(
            Node::new(5, 0, 4).unwrap_err(),
            HyperGraphError::NodeOutOfRange { index: 5, num_nodes: 4 }
        );
        assert_eq!(
            Node::new(4, 0, 4).unwrap_err(),
            HyperGraphError::NodeOutOfRange { index: 4, num_nodes: 4 }
        );
        assert!(Node::new(0, 0, 0).is_err());
        assert_eq!(Node::new(3, 0, 4).unwrap().index(), 3);
    }

    #[test]
    fn test_simple_edge_sets_other_endpoint_only() {
        let mut node = Node::new(0, 0, 4).unwrap();
        node.attach_edge(0, &edge(0, &[0], &[1])).unwrap();
        assert_eq!(node.simple_edges(), &[0]);
        assert!(node.is_simple_neighbor(1));
        assert!(!node.is_simple_neighbor(0));
        assert_eq!(node.simple_neighborhood().len(), 1);

        // Same result when this node sits on the right side.
        let mut node = Node::new(3, 3, 4).unwrap();
        node.attach_edge(5, &edge(5, &[2], &[3])).unwrap();
        assert_eq!(node.simple_neighborhood().iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_complex_edge_leaves_neighborhood_untouched() {
        let mut node = Node::new(0, 0, 4).unwrap();
        node.attach_edge(0, &edge(0, &[0], &[1])).unwrap();
        let before = node.simple_neighborhood().clone();

        node.attach_edge(1, &edge(1, &[0, 2], &[3])).unwrap();
        assert_eq!(node.complex_edges(), &[1]);
        assert_eq!(node.simple_edges(), &[0]);
        assert_eq!(node.simple_neighborhood(), &before);
    }

    #[test]
    fn test_attaching_twice_appends_twice() {
        let mut node = Node::new(1, 1, 4).unwrap();
        let e = edge(4, &[1], &[2]);
        node.attach_edge(4, &e).unwrap();
        let after_first = node.simple_neighborhood().clone();
        node.attach_edge(4, &e).unwrap();

        assert_eq!(node.simple_edges(), &[4, 4]);
        assert_eq!(node.simple_neighborhood(), &after_first);

        let c = edge(6, &[0, 1], &[3]);
        node.attach_edge(6, &c).unwrap();
        node.attach_edge(6, &c).unwrap();
        assert_eq!(node.complex_edges(), &[6, 6]);
    }

    #[test]
    fn test_rejects_edge_not_referencing_node() {
        let mut node = Node::new(3, 3, 4).unwrap();
        let err = node.attach_edge(0, &edge(0, &[0], &[1])).unwrap_err();
        assert_eq!(err, HyperGraphError::EdgeNotIncident { edge: 0, node: 3 });
        assert!(node.simple_edges().is_empty());
        assert!(node.simple_neighborhood().is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        // Edge built for a wider graph than the node belongs to.
        let wide = JoinEdge::new(
            0,
            JoinType::Inner,
            None,
            NodeSet::singleton(8, 0),
            NodeSet::singleton(8, 6),
        )
        .unwrap();
        let mut node = Node::new(0, 0, 4).unwrap();
        let err = node.attach_edge(0, &wide).unwrap_err();
        assert_eq!(err, HyperGraphError::NodeOutOfRange { index: 6, num_nodes: 4 });
        assert!(node.simple_edges().is_empty());
        assert!(node.simple_neighborhood().is_empty());
    }
}
