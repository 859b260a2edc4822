//! Atomic variant of the sum tree for concurrent update application.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::{TreeError, build_nodes};

/// A sum tree whose nodes are atomic counters, allowing updates from
/// multiple workers at once.
///
/// Distinct updates share ancestor nodes (every path ends at the root), so
/// a plain read-modify-write from two workers would lose increments. Every
/// node write here is a `fetch_add`, which makes concurrent update-runs
/// safe: addition commutes, so the final tree state is independent of the
/// order in which workers land their increments.
pub struct AtomicSumTree {
    nodes: Vec<AtomicI64>,
    size: usize,
    len: usize,
}

impl AtomicSumTree {
    /// Builds a tree from the given values in O(n).
    ///
    /// Returns [`TreeError::EmptyInput`] if `values` is empty.
    pub fn from_values(values: &[i64]) -> Result<Self, TreeError> {
        let (size, nodes) = build_nodes(values)?;
        Ok(Self {
            nodes: nodes.into_iter().map(AtomicI64::new).collect(),
            size,
            len: values.len(),
        })
    }

    /// Number of elements in the original (unpadded) array.
    pub fn len(&self) -> usize {
        self.len
    }

    /// A built tree always holds at least one element.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Copies the node buffer out as plain integers.
    ///
    /// Meaningful only while no updates are in flight, e.g. at a run
    /// boundary or in tests.
    pub fn snapshot(&self) -> Vec<i64> {
        self.nodes.iter().map(|n| n.load(Ordering::SeqCst)).collect()
    }

    /// Returns the sum over the closed interval `[left, right]`.
    ///
    /// Same contract as [`crate::SumTree::sum_range`]: `left > right` is an
    /// empty range yielding 0, out-of-range bounds fail before traversal.
    /// The result is only meaningful while no updates are in flight; the
    /// batcher guarantees that with its run barrier.
    pub fn sum_range(&self, left: usize, right: usize) -> Result<i64, TreeError> {
        self.check_bound(left)?;
        self.check_bound(right)?;
        Ok(self.sum_node(left, right, 0, 0, self.size - 1))
    }

    /// Adds `delta` to the element at `index` via atomic accumulation on
    /// the leaf and every ancestor.
    ///
    /// Takes `&self`: any number of workers may apply deltas concurrently
    /// without losing increments. Fails with
    /// [`TreeError::IndexOutOfRange`] before any write if `index >= len`.
    pub fn apply_delta(&self, index: usize, delta: i64) -> Result<(), TreeError> {
        self.check_bound(index)?;
        let mut node = self.size - 1 + index;
        self.nodes[node].fetch_add(delta, Ordering::SeqCst);
        while node > 0 {
            node = (node - 1) / 2;
            self.nodes[node].fetch_add(delta, Ordering::SeqCst);
        }
        Ok(())
    }

    fn check_bound(&self, index: usize) -> Result<(), TreeError> {
        if index < self.len {
            Ok(())
        } else {
            Err(TreeError::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    fn sum_node(
        &self,
        left: usize,
        right: usize,
        node: usize,
        node_left: usize,
        node_right: usize,
    ) -> i64 {
        if left > right {
            return 0;
        }
        if left == node_left && right == node_right {
            return self.nodes[node].load(Ordering::SeqCst);
        }
        let mid = node_left + (node_right - node_left) / 2;
        self.sum_node(left, right.min(mid), 2 * node + 1, node_left, mid)
            + self.sum_node(left.max(mid + 1), right, 2 * node + 2, mid + 1, node_right)
    }
}
