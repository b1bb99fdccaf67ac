//! Read-only diagnostics: depth statistics and invariant checking.

use std::fmt;

use super::LlrbTree;
use super::node::Node;
use crate::ordering::Item;

// =============================================================================
// Height Statistics
// =============================================================================

/// Mean and standard deviation of node depths.
///
/// The depth of a node is the length of the path from the root to it (the
/// root has depth 0). An empty tree reports zero for both values.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct HeightStats {
    /// Mean node depth.
    pub mean: f64,
    /// Standard deviation of node depths.
    pub std_dev: f64,
}

#[derive(Default)]
struct DepthAccumulator {
    count: usize,
    sum: f64,
    sum_of_squares: f64,
}

impl DepthAccumulator {
    #[allow(clippy::cast_precision_loss)]
    fn add(&mut self, depth: usize) {
        let depth = depth as f64;
        self.count += 1;
        self.sum += depth;
        self.sum_of_squares += depth * depth;
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self) -> HeightStats {
        if self.count == 0 {
            return HeightStats::default();
        }
        let count = self.count as f64;
        let mean = self.sum / count;
        let variance = (self.sum_of_squares / count - mean * mean).max(0.0);
        HeightStats {
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

// =============================================================================
// Invariant Violations
// =============================================================================

/// A broken red-black invariant reported by [`LlrbTree::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The item at this in-order position is less than its predecessor.
    OutOfOrder {
        /// Zero-based in-order position of the offending item.
        position: usize,
    },
    /// A node has a red right child.
    RedRightChild,
    /// A red node has a red left child.
    DoubleRed,
    /// The two subtrees of a node cross different numbers of black links.
    BlackHeightMismatch {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// The root is red.
    RedRoot,
    /// The recorded length disagrees with the number of reachable items.
    SizeMismatch {
        /// Length stored in the tree handle.
        recorded: usize,
        /// Items actually reachable from the root.
        counted: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfOrder { position } => {
                write!(formatter, "item at in-order position {position} is out of order")
            }
            Self::RedRightChild => write!(formatter, "red link leans right"),
            Self::DoubleRed => write!(formatter, "two consecutive red links"),
            Self::BlackHeightMismatch { left, right } => write!(
                formatter,
                "unbalanced black height: left {left}, right {right}"
            ),
            Self::RedRoot => write!(formatter, "root is red"),
            Self::SizeMismatch { recorded, counted } => write!(
                formatter,
                "length is {recorded} but {counted} items are reachable"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

// =============================================================================
// Tree Entry Points
// =============================================================================

impl<T> LlrbTree<T> {
    /// Returns the mean and standard deviation of node depths.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let tree: LlrbTree<i32> = (0..1000).collect();
    /// let stats = tree.height_stats();
    /// assert!(stats.mean < 2.0 * 1000f64.log2());
    /// ```
    #[must_use]
    pub fn height_stats(&self) -> HeightStats {
        let mut accumulator = DepthAccumulator::default();
        Self::collect_depths(self.root(), 0, &mut accumulator);
        accumulator.finish()
    }

    fn collect_depths(node: Option<&Node<T>>, depth: usize, accumulator: &mut DepthAccumulator) {
        if let Some(node) = node {
            accumulator.add(depth);
            Self::collect_depths(node.left(), depth + 1, accumulator);
            Self::collect_depths(node.right(), depth + 1, accumulator);
        }
    }
}

/// State threaded through the invariant check.
struct Validation<'a, T> {
    previous: Option<&'a T>,
    counted: usize,
}

impl<T: Item> LlrbTree<T> {
    /// Checks every structural invariant and reports the first violation.
    ///
    /// # Errors
    ///
    /// Returns the violated invariant. A tree only built through this
    /// crate's operations with a lawful ordering never fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let tree: LlrbTree<i32> = (0..100).rev().collect();
    /// assert!(tree.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let root = self.root();
        if root.is_some_and(Node::is_red) {
            return Err(InvariantViolation::RedRoot);
        }
        let mut validation = Validation {
            previous: None,
            counted: 0,
        };
        Self::validate_node(root, &mut validation)?;
        if validation.counted != self.length {
            return Err(InvariantViolation::SizeMismatch {
                recorded: self.length,
                counted: validation.counted,
            });
        }
        Ok(())
    }

    /// Returns the black height of the subtree.
    fn validate_node<'a>(
        node: Option<&'a Node<T>>,
        validation: &mut Validation<'a, T>,
    ) -> Result<usize, InvariantViolation> {
        let Some(node) = node else {
            return Ok(0);
        };
        if node.right().is_some_and(Node::is_red) {
            return Err(InvariantViolation::RedRightChild);
        }
        if node.is_red() && node.left().is_some_and(Node::is_red) {
            return Err(InvariantViolation::DoubleRed);
        }

        let left = Self::validate_node(node.left(), validation)?;

        if validation
            .previous
            .is_some_and(|previous| node.item.less_than(previous))
        {
            return Err(InvariantViolation::OutOfOrder {
                position: validation.counted,
            });
        }
        validation.previous = Some(&node.item);
        validation.counted += 1;

        let right = Self::validate_node(node.right(), validation)?;

        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { left, right });
        }
        Ok(left + usize::from(!node.is_red()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Color, OwnerId};
    use crate::tree::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_height_stats_of_empty_tree_is_zero() {
        let tree: LlrbTree<i32> = LlrbTree::new();
        assert_eq!(tree.height_stats(), HeightStats::default());
    }

    #[rstest]
    fn test_height_stats_of_three_nodes() {
        let tree: LlrbTree<i32> = [2, 1, 3].into_iter().collect();
        // Depths 0, 1, 1
        let stats = tree.height_stats();
        assert!((stats.mean - 2.0 / 3.0).abs() < 1e-9);
        assert!((stats.std_dev - (2.0f64 / 9.0).sqrt()).abs() < 1e-9);
    }

    #[rstest]
    fn test_validate_accepts_empty_tree() {
        let tree: LlrbTree<i32> = LlrbTree::new();
        assert_eq!(tree.validate(), Ok(()));
    }

    #[rstest]
    fn test_validate_reports_red_root() {
        let mut tree: LlrbTree<i32> = LlrbTree::new();
        tree.replace_or_insert(1);
        let owner = OwnerId::fresh();
        let broken = LlrbTree {
            root: Some(ReferenceCounter::new(Node::new_red(1, owner))),
            ..tree
        };
        assert_eq!(broken.validate(), Err(InvariantViolation::RedRoot));
    }

    #[rstest]
    fn test_validate_reports_size_mismatch() {
        let mut tree: LlrbTree<i32> = LlrbTree::new();
        tree.replace_or_insert(1);
        let broken = LlrbTree { length: 2, ..tree };
        assert_eq!(
            broken.validate(),
            Err(InvariantViolation::SizeMismatch {
                recorded: 2,
                counted: 1
            })
        );
    }

    #[rstest]
    fn test_validate_reports_red_right_child() {
        let owner = OwnerId::fresh();
        let mut root = Node::new_red(1, owner);
        root.color = Color::Black;
        root.right = Some(ReferenceCounter::new(Node::new_red(2, owner)));
        let mut tree: LlrbTree<i32> = LlrbTree::new();
        tree.replace_or_insert(0);
        let broken = LlrbTree {
            root: Some(ReferenceCounter::new(root)),
            length: 2,
            ..tree
        };
        assert_eq!(broken.validate(), Err(InvariantViolation::RedRightChild));
    }

    #[rstest]
    fn test_validate_reports_out_of_order() {
        let owner = OwnerId::fresh();
        let mut root = Node::new_red(1, owner);
        root.color = Color::Black;
        root.left = Some(ReferenceCounter::new(Node::new_red(5, owner)));
        let mut tree: LlrbTree<i32> = LlrbTree::new();
        tree.replace_or_insert(0);
        let broken = LlrbTree {
            root: Some(ReferenceCounter::new(root)),
            length: 2,
            ..tree
        };
        assert_eq!(
            broken.validate(),
            Err(InvariantViolation::OutOfOrder { position: 1 })
        );
    }

    #[rstest]
    fn test_display_messages() {
        let violation = InvariantViolation::BlackHeightMismatch { left: 2, right: 3 };
        assert_eq!(
            format!("{violation}"),
            "unbalanced black height: left 2, right 3"
        );
    }
}
