//! Ordered traversal.
//!
//! [`Ascend`] and [`Descend`] are pull-based iterators that keep only the
//! path from the root to the next item, so starting a traversal costs
//! O(log N) and each step is amortised O(1). The visitor-style methods on
//! [`LlrbTree`] (`ascend_range` and friends) are thin loops over them: the
//! visitor returns `false` to stop the walk immediately.
//!
//! Every call starts a fresh traversal of the current tree; no cursor
//! survives between calls.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::LlrbTree;
use super::node::Node;
use crate::ordering::Item;

/// Stack entries kept inline before spilling to the heap.
const INLINE_DEPTH: usize = 48;

type Path<'a, T> = SmallVec<[&'a Node<T>; INLINE_DEPTH]>;

// =============================================================================
// Ascend
// =============================================================================

/// An ascending iterator over the items of an [`LlrbTree`].
///
/// Created by [`LlrbTree::iter`] and [`LlrbTree::range_from`].
pub struct Ascend<'a, T> {
    path: Path<'a, T>,
}

impl<'a, T> Ascend<'a, T> {
    fn new(root: Option<&'a Node<T>>) -> Self {
        let mut ascend = Self { path: Path::new() };
        ascend.push_left_spine(root);
        ascend
    }

    fn push_left_spine(&mut self, mut current: Option<&'a Node<T>>) {
        while let Some(node) = current {
            self.path.push(node);
            current = node.left();
        }
    }
}

impl<'a, T: Item> Ascend<'a, T> {
    /// Positions the iterator on the first item not less than `pivot`.
    fn seek(root: Option<&'a Node<T>>, pivot: &T) -> Self {
        let mut path = Path::new();
        let mut current = root;
        while let Some(node) = current {
            if node.item.less_than(pivot) {
                current = node.right();
            } else {
                path.push(node);
                current = node.left();
            }
        }
        Self { path }
    }
}

impl<'a, T> Iterator for Ascend<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.path.pop()?;
        self.push_left_spine(node.right());
        Some(&node.item)
    }
}

impl<T> FusedIterator for Ascend<'_, T> {}

// =============================================================================
// Descend
// =============================================================================

/// A descending iterator over the items of an [`LlrbTree`].
///
/// Created by [`LlrbTree::iter_rev`] and [`LlrbTree::rev_from`].
pub struct Descend<'a, T> {
    path: Path<'a, T>,
}

impl<'a, T> Descend<'a, T> {
    fn new(root: Option<&'a Node<T>>) -> Self {
        let mut descend = Self { path: Path::new() };
        descend.push_right_spine(root);
        descend
    }

    fn push_right_spine(&mut self, mut current: Option<&'a Node<T>>) {
        while let Some(node) = current {
            self.path.push(node);
            current = node.right();
        }
    }
}

impl<'a, T: Item> Descend<'a, T> {
    /// Positions the iterator on the last item not greater than `pivot`.
    fn seek(root: Option<&'a Node<T>>, pivot: &T) -> Self {
        let mut path = Path::new();
        let mut current = root;
        while let Some(node) = current {
            if pivot.less_than(&node.item) {
                current = node.left();
            } else {
                path.push(node);
                current = node.right();
            }
        }
        Self { path }
    }
}

impl<'a, T> Iterator for Descend<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.path.pop()?;
        self.push_right_spine(node.left());
        Some(&node.item)
    }
}

impl<T> FusedIterator for Descend<'_, T> {}

// =============================================================================
// Tree Entry Points
// =============================================================================

impl<T> LlrbTree<T> {
    /// Returns an iterator over all items in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let tree: LlrbTree<i32> = [3, 1, 2].into_iter().collect();
    /// let items: Vec<i32> = tree.iter().copied().collect();
    /// assert_eq!(items, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Ascend<'_, T> {
        Ascend::new(self.root())
    }

    /// Returns an iterator over all items in descending order.
    #[must_use]
    pub fn iter_rev(&self) -> Descend<'_, T> {
        Descend::new(self.root())
    }
}

impl<T: Item> LlrbTree<T> {
    /// Returns an ascending iterator starting at the first item not less
    /// than `pivot`.
    #[must_use]
    pub fn range_from(&self, pivot: &T) -> Ascend<'_, T> {
        Ascend::seek(self.root(), pivot)
    }

    /// Returns a descending iterator starting at the last item not greater
    /// than `pivot`.
    #[must_use]
    pub fn rev_from(&self, pivot: &T) -> Descend<'_, T> {
        Descend::seek(self.root(), pivot)
    }

    /// Returns an ascending iterator over the half-open interval
    /// `[from, to)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let tree: LlrbTree<i32> = (0..10).collect();
    /// let items: Vec<i32> = tree.range(&3, &6).copied().collect();
    /// assert_eq!(items, vec![3, 4, 5]);
    /// ```
    pub fn range<'a>(&'a self, from: &T, to: &'a T) -> impl Iterator<Item = &'a T> + use<'a, T> {
        self.range_from(from).take_while(move |item| item.less_than(to))
    }

    /// Visits every item not less than `pivot` in ascending order.
    ///
    /// The walk stops as soon as `visit` returns `false`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let tree: LlrbTree<i32> = (0..10).collect();
    /// let mut seen = Vec::new();
    /// tree.ascend_greater_or_equal(&7, |item| {
    ///     seen.push(*item);
    ///     true
    /// });
    /// assert_eq!(seen, vec![7, 8, 9]);
    /// ```
    pub fn ascend_greater_or_equal<F>(&self, pivot: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        for item in self.range_from(pivot) {
            if !visit(item) {
                break;
            }
        }
    }

    /// Visits every item `x` with `from <= x < to` in ascending order.
    ///
    /// The walk stops as soon as `visit` returns `false`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let tree: LlrbTree<i32> = (0..10).collect();
    /// let mut seen = Vec::new();
    /// tree.ascend_range(&2, &8, |item| {
    ///     seen.push(*item);
    ///     seen.len() < 3
    /// });
    /// assert_eq!(seen, vec![2, 3, 4]);
    /// ```
    pub fn ascend_range<F>(&self, from: &T, to: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        for item in self.range_from(from) {
            if !item.less_than(to) || !visit(item) {
                break;
            }
        }
    }

    /// Visits every item less than `pivot` in ascending order.
    pub fn ascend_less_than<F>(&self, pivot: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        for item in self.iter() {
            if !item.less_than(pivot) || !visit(item) {
                break;
            }
        }
    }

    /// Visits every item not greater than `pivot` in descending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let tree: LlrbTree<i32> = (0..10).collect();
    /// let mut seen = Vec::new();
    /// tree.descend_less_or_equal(&2, |item| {
    ///     seen.push(*item);
    ///     true
    /// });
    /// assert_eq!(seen, vec![2, 1, 0]);
    /// ```
    pub fn descend_less_or_equal<F>(&self, pivot: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        for item in self.rev_from(pivot) {
            if !visit(item) {
                break;
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a LlrbTree<T> {
    type Item = &'a T;
    type IntoIter = Ascend<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
