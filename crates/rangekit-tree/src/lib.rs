//! Segment tree for range-sum queries and point-delta updates.
//!
//! The tree is stored as a flat node buffer in implicit-heap layout: node
//! `p` has children at `2p+1` and `2p+2`, leaves occupy the last `size`
//! slots where `size` is the smallest power of two that fits the input.
//! Every internal node holds the sum of its two children, which is what
//! makes O(log n) range queries possible without touching every leaf.

mod atomic;
mod error;

pub use atomic::AtomicSumTree;
pub use error::TreeError;

/// Computes the padded leaf count and the fully built node buffer for the
/// given values. Shared by [`SumTree`] and [`AtomicSumTree`].
fn build_nodes(values: &[i64]) -> Result<(usize, Vec<i64>), TreeError> {
    if values.is_empty() {
        return Err(TreeError::EmptyInput);
    }
    let size = values.len().next_power_of_two();
    let mut nodes = vec![0i64; 2 * size - 1];
    nodes[size - 1..size - 1 + values.len()].copy_from_slice(values);
    for node in (0..size - 1).rev() {
        nodes[node] = nodes[2 * node + 1] + nodes[2 * node + 2];
    }
    Ok((size, nodes))
}

/// A segment tree over an integer array supporting range-sum queries and
/// additive point updates, both in O(log n).
///
/// The node buffer is exclusively owned by the tree and mutated only by
/// [`SumTree::apply_delta`]. For a tree that accepts concurrent updaters,
/// see [`AtomicSumTree`].
#[derive(Debug, Clone)]
pub struct SumTree {
    nodes: Vec<i64>,
    size: usize,
    len: usize,
}

impl SumTree {
    /// Builds a tree from the given values in O(n).
    ///
    /// Returns [`TreeError::EmptyInput`] if `values` is empty. Values
    /// beyond `values.len()` up to the padded power-of-two size are
    /// zero-filled padding and never contribute to a query.
    pub fn from_values(values: &[i64]) -> Result<Self, TreeError> {
        let (size, nodes) = build_nodes(values)?;
        Ok(Self {
            nodes,
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

    /// Number of nodes in the flat buffer, padding included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The full node buffer. Exposed for invariant checks; the buffer
    /// cannot be mutated through this view.
    pub fn nodes(&self) -> &[i64] {
        &self.nodes
    }

    /// Returns the sum over the closed interval `[left, right]`.
    ///
    /// `left > right` denotes a deliberately empty range and yields 0.
    /// Either bound outside `[0, len)` is a contract violation and fails
    /// with [`TreeError::IndexOutOfRange`] before any traversal.
    pub fn sum_range(&self, left: usize, right: usize) -> Result<i64, TreeError> {
        self.check_bound(left)?;
        self.check_bound(right)?;
        Ok(self.sum_node(left, right, 0, 0, self.size - 1))
    }

    /// Adds `delta` to the element at `index`, updating the leaf and every
    /// ancestor up to the root.
    ///
    /// This is a pure additive mutation: reapplying the same delta
    /// accumulates. Fails with [`TreeError::IndexOutOfRange`] before any
    /// write if `index >= len`, so a rejected call leaves the tree intact.
    pub fn apply_delta(&mut self, index: usize, delta: i64) -> Result<(), TreeError> {
        self.check_bound(index)?;
        let mut node = self.size - 1 + index;
        self.nodes[node] += delta;
        while node > 0 {
            node = (node - 1) / 2;
            self.nodes[node] += delta;
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
            return self.nodes[node];
        }
        let mid = node_left + (node_right - node_left) / 2;
        self.sum_node(left, right.min(mid), 2 * node + 1, node_left, mid)
            + self.sum_node(left.max(mid + 1), right, 2 * node + 2, mid + 1, node_right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_builds_sums() {
        let tree = SumTree::from_values(&[1, 2, 3, 4]).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.node_count(), 7);
        // Root holds the total; leaves hold the original values.
        assert_eq!(tree.nodes()[0], 10);
        assert_eq!(&tree.nodes()[3..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(SumTree::from_values(&[]).unwrap_err(), TreeError::EmptyInput);
    }

    #[test]
    fn test_padded_build_keeps_total() {
        // Length 5 pads to 8 leaves; padding must contribute nothing.
        let tree = SumTree::from_values(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(tree.node_count(), 15);
        assert_eq!(tree.sum_range(0, 4).unwrap(), 15);
        assert_eq!(tree.sum_range(4, 4).unwrap(), 5);
    }

    #[test]
    fn test_sum_range_subranges() {
        let tree = SumTree::from_values(&[1, 2, 3, 4]).unwrap();
        assert_eq!(tree.sum_range(0, 3).unwrap(), 10);
        assert_eq!(tree.sum_range(1, 2).unwrap(), 5);
        assert_eq!(tree.sum_range(2, 3).unwrap(), 7);
        assert_eq!(tree.sum_range(0, 0).unwrap(), 1);
        assert_eq!(tree.sum_range(3, 3).unwrap(), 4);
    }

    #[test]
    fn test_inverted_range_is_empty_by_convention() {
        let tree = SumTree::from_values(&[1, 2, 3, 4]).unwrap();
        assert_eq!(tree.sum_range(2, 1).unwrap(), 0);
    }

    #[test]
    fn test_out_of_range_bounds_rejected() {
        let tree = SumTree::from_values(&[1, 2, 3, 4]).unwrap();
        assert_eq!(
            tree.sum_range(0, 4),
            Err(TreeError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(
            tree.sum_range(7, 2),
            Err(TreeError::IndexOutOfRange { index: 7, len: 4 })
        );
    }

    #[test]
    fn test_apply_delta_updates_ancestor_chain() {
        let mut tree = SumTree::from_values(&[1, 2, 3, 4]).unwrap();
        tree.apply_delta(1, 5).unwrap();
        assert_eq!(tree.sum_range(0, 3).unwrap(), 15);
        assert_eq!(tree.sum_range(1, 1).unwrap(), 7);
        assert_eq!(tree.sum_range(2, 3).unwrap(), 7);
    }

    #[test]
    fn test_apply_delta_accumulates() {
        let mut tree = SumTree::from_values(&[1, 2, 3, 4]).unwrap();
        tree.apply_delta(0, 10).unwrap();
        tree.apply_delta(0, 10).unwrap();
        assert_eq!(tree.sum_range(0, 0).unwrap(), 21);
    }

    #[test]
    fn test_apply_delta_at_both_ends() {
        let mut tree = SumTree::from_values(&[1, 2, 3, 4, 5]).unwrap();
        tree.apply_delta(0, -1).unwrap();
        tree.apply_delta(4, 100).unwrap();
        assert_eq!(tree.sum_range(0, 0).unwrap(), 0);
        assert_eq!(tree.sum_range(4, 4).unwrap(), 105);
        assert_eq!(tree.sum_range(0, 4).unwrap(), 114);
    }

    #[test]
    fn test_rejected_update_leaves_tree_usable() {
        let mut tree = SumTree::from_values(&[1, 2, 3, 4]).unwrap();
        assert_eq!(
            tree.apply_delta(4, 99),
            Err(TreeError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(tree.sum_range(0, 3).unwrap(), 10);
    }

    #[test]
    fn test_single_element_tree() {
        let mut tree = SumTree::from_values(&[5]).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.sum_range(0, 0).unwrap(), 5);
        tree.apply_delta(0, -5).unwrap();
        assert_eq!(tree.sum_range(0, 0).unwrap(), 0);
    }
}
