//! # Hyperedges
//!
//! A hyperedge connects two non-empty, disjoint sets of node indices: the nodes
//! referenced by the left and by the right side of a join condition.
//!
//! - A **simple** edge has exactly one node on each side. This is an ordinary
//!   binary join predicate such as `orders.o_custkey = customer.c_custkey`, and
//!   the adjacency it expresses is a pairwise fact that fits in one bit.
//! - A **complex** edge has more than one node on at least one side, e.g.
//!   `a.x + b.y = c.z` connects `{a, b}` to `{c}`. Which nodes are jointly
//!   required cannot be flattened into a neighbor bitmap, so complex edges are
//!   always consulted explicitly.
//!
//! `HyperEdge` is the contract nodes consume when an edge is attached. `JoinEdge`
//! is the edge the builder creates; it validates the side sets once, at
//! construction, so nodes never have to.

use std::fmt;

use crate::error::{HyperGraphError, Result};
use crate::expr::{Expr, JoinType};
use crate::node_set::NodeSet;

/// Arena handle of an edge within its hypergraph.
pub type EdgeId = usize;

/// The view of an edge a node needs to maintain its adjacency.
pub trait HyperEdge {
    fn left(&self) -> &NodeSet;

    fn right(&self) -> &NodeSet;

    /// Exactly one node on each side.
    fn is_simple(&self) -> bool {
        self.left().len() == 1 && self.right().len() == 1
    }
}

/// A join predicate edge in the hypergraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinEdge {
    id: EdgeId,
    join_type: JoinType,
    condition: Option<Expr>,
    left: NodeSet,
    right: NodeSet,
}

impl JoinEdge {
    /// Build an edge, rejecting empty or overlapping sides.
    pub fn new(
        id: EdgeId,
        join_type: JoinType,
        condition: Option<Expr>,
        left: NodeSet,
        right: NodeSet,
    ) -> Result<Self> {
        if left.is_empty() {
            return Err(HyperGraphError::EmptyEdgeSide { side: "left" });
        }
        if right.is_empty() {
            return Err(HyperGraphError::EmptyEdgeSide { side: "right" });
        }
        if left.intersects(&right) {
            return Err(HyperGraphError::OverlappingEdgeSides {
                overlap: left.intersection(&right).to_string(),
            });
        }
        Ok(Self {
            id,
            join_type,
            condition,
            left,
            right,
        })
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn condition(&self) -> Option<&Expr> {
        self.condition.as_ref()
    }

    /// All nodes referenced by either side.
    pub fn nodes(&self) -> NodeSet {
        self.left.union(&self.right)
    }

    pub fn references(&self, node: usize) -> bool {
        self.left.contains(node) || self.right.contains(node)
    }

    /// True if one side lies within `a` and the other within `b`.
    pub fn connects(&self, a: &NodeSet, b: &NodeSet) -> bool {
        (self.left.is_subset_of(a) && self.right.is_subset_of(b))
            || (self.left.is_subset_of(b) && self.right.is_subset_of(a))
    }
}

impl HyperEdge for JoinEdge {
    fn left(&self) -> &NodeSet {
        &self.left
    }

    fn right(&self) -> &NodeSet {
        &self.right
    }
}

impl fmt::Display for JoinEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "e{} {} {} {}",
            self.id,
            self.left,
            self.join_type.as_str(),
            self.right
        )?;
        if let Some(ref cond) = self.condition {
            write!(f, " ON {}", cond)?;
        }
        Ok(())
    }
}
