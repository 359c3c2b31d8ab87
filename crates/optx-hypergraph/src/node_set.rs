//! # Node Sets
//!
//! `NodeSet` is a set of node indices drawn from `[0, capacity)`, stored as a
//! fixed-width bit vector. The capacity is the node count of the enclosing
//! hypergraph, so every set in one graph has the same width and the set algebra
//! used by the enumerator (union, intersection, subset) runs one `u64` word at a
//! time over the raw storage.
//!
//! Sets of different capacities are never combined; the binary operations
//! panic when the capacities differ.

use bitvec::prelude::*;
use std::fmt;

/// A fixed-capacity set of node indices.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeSet {
    bits: BitVec<u64, Lsb0>,
}

impl NodeSet {
    /// Create an empty set able to hold indices in `[0, capacity)`.
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, capacity),
        }
    }

    pub fn singleton(capacity: usize, index: usize) -> Self {
        let mut set = Self::new(capacity);
        set.insert(index);
        set
    }

    pub fn from_indices(capacity: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::new(capacity);
        for index in indices {
            set.insert(index);
        }
        set
    }

    /// Every index in `[0, capacity)`.
    pub fn full(capacity: usize) -> Self {
        Self {
            bits: BitVec::repeat(true, capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Panics if `index >= capacity`.
    pub fn insert(&mut self, index: usize) {
        self.bits.set(index, true);
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, false);
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.bits.len() && self.bits[index]
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Lowest index in the set.
    pub fn first(&self) -> Option<usize> {
        self.bits.first_one()
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Add every index of `other`.
    ///
    /// # Panics
    ///
    /// Panics if the two sets have different capacities, as do all binary
    /// operations below.
    pub fn union_with(&mut self, other: &NodeSet) {
        assert_eq!(self.capacity(), other.capacity(), "node set capacity mismatch");
        for (word, rhs) in self
            .bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *word |= *rhs;
        }
    }

    pub fn union(&self, other: &NodeSet) -> NodeSet {
        let mut out = self.clone();
        out.union_with(other);
        out
    }

    pub fn intersection(&self, other: &NodeSet) -> NodeSet {
        assert_eq!(self.capacity(), other.capacity(), "node set capacity mismatch");
        let mut out = self.clone();
        for (word, rhs) in out
            .bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *word &= *rhs;
        }
        out
    }

    pub fn difference(&self, other: &NodeSet) -> NodeSet {
        assert_eq!(self.capacity(), other.capacity(), "node set capacity mismatch");
        let mut out = self.clone();
        for (word, rhs) in out
            .bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *word &= !*rhs;
        }
        out
    }

    /// True if the two sets share at least one index.
    pub fn intersects(&self, other: &NodeSet) -> bool {
        assert_eq!(self.capacity(), other.capacity(), "node set capacity mismatch");
        self.bits
            .as_raw_slice()
            .iter()
            .zip(other.bits.as_raw_slice())
            .any(|(a, b)| a & b != 0)
    }

    pub fn is_disjoint(&self, other: &NodeSet) -> bool {
        !self.intersects(other)
    }

    pub fn is_subset_of(&self, other: &NodeSet) -> bool {
        assert_eq!(self.capacity(), other.capacity(), "node set capacity mismatch");
        self.bits
            .as_raw_slice()
            .iter()
            .zip(other.bits.as_raw_slice())
            .all(|(a, b)| a & !b == 0)
    }
}

impl fmt::Display for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, index) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeSet{}", self)
    }
}
