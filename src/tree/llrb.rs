//! The tree handle.
//!
//! [`LlrbTree`] owns a root link, an item count and the identity it stamps
//! onto nodes it is allowed to mutate in place. All mutating entry points
//! build a [`WriteBarrier`] from that identity and hand the actual
//! restructuring to the balancing engine.
//!
//! # Examples
//!
//! ```rust
//! use llrb::tree::LlrbTree;
//!
//! let mut tree = LlrbTree::new();
//! assert_eq!(tree.replace_or_insert(1), None);
//! assert_eq!(tree.replace_or_insert(1), Some(1));
//! assert_eq!(tree.len(), 1);
//!
//! assert_eq!(tree.delete(&1), Some(1));
//! assert_eq!(tree.delete(&1), None);
//! assert!(tree.is_empty());
//! ```

use std::cmp::Ordering;
use std::fmt;

use super::balance::WriteBarrier;
use super::node::{Node, NodeRef, is_left_red, is_red};
use super::{OwnerId, ReferenceCounter};
use crate::ordering::Item;

// =============================================================================
// LlrbTree Definition
// =============================================================================

/// An ordered multiset based on a left-leaning red-black tree.
///
/// Items are ordered by [`Item::less_than`]. Equivalent items (neither less
/// than the other) are treated as the same key by [`get`](Self::get),
/// [`delete`](Self::delete) and [`replace_or_insert`](Self::replace_or_insert);
/// [`insert_no_replace`](Self::insert_no_replace) keeps them side by side.
///
/// # Copy-on-write
///
/// A tree created with [`new_cow`](Self::new_cow) clones in O(1): the clone
/// shares every node and gets a fresh identity. Afterwards each handle copies
/// a node before its first write to it, so a mutation costs at most one copy
/// per node on its search path and never affects the other handle.
///
/// Handles that still share nodes must not be mutated from different threads
/// without external locking; with the default `Rc` links the compiler
/// enforces this by making the tree `!Send`.
///
/// # Time Complexity
///
/// | Operation                  | Complexity   |
/// |----------------------------|--------------|
/// | `replace_or_insert`        | O(log N)     |
/// | `insert_no_replace`        | O(log N)     |
/// | `delete`                   | O(log N)     |
/// | `delete_min`/`delete_max`  | O(log N)     |
/// | `get`/`has`                | O(log N)     |
/// | `min`/`max`                | O(log N)     |
/// | `ascend_range`             | O(log N + k) |
/// | `clone` (copy-on-write)    | O(1)         |
/// | `clone` (exclusive)        | O(N)         |
/// | `len`                      | O(1)         |
pub struct LlrbTree<T> {
    /// Root node of the tree
    pub(crate) root: Option<NodeRef<T>>,
    /// Number of stored items
    pub(crate) length: usize,
    /// Whether nodes may be shared with other handles
    pub(crate) copy_on_write: bool,
    /// Owner stamp for nodes this handle may mutate in place
    pub(crate) identity: OwnerId,
}

impl<T> LlrbTree<T> {
    /// Creates an empty tree that mutates its nodes destructively.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let tree: LlrbTree<i32> = LlrbTree::new();
    /// assert!(tree.is_empty());
    /// assert!(!tree.is_cow());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_copy_on_write(false)
    }

    /// Creates an empty tree with copy-on-write enabled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let mut tree = LlrbTree::new_cow();
    /// tree.replace_or_insert("a");
    ///
    /// let mut snapshot = tree.clone();
    /// snapshot.delete(&"a");
    ///
    /// assert!(tree.has(&"a"));
    /// assert!(!snapshot.has(&"a"));
    /// ```
    #[must_use]
    pub fn new_cow() -> Self {
        Self::with_copy_on_write(true)
    }

    /// Creates an empty tree, choosing the sharing mode at runtime.
    #[must_use]
    pub fn with_copy_on_write(copy_on_write: bool) -> Self {
        Self {
            root: None,
            length: 0,
            copy_on_write,
            identity: OwnerId::fresh(),
        }
    }

    /// Returns the number of stored items.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree stores no items.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns `true` if this tree was created in copy-on-write mode.
    #[inline]
    #[must_use]
    pub const fn is_cow(&self) -> bool {
        self.copy_on_write
    }

    /// Returns the identity this handle stamps onto nodes it owns.
    #[inline]
    #[must_use]
    pub const fn identity(&self) -> OwnerId {
        self.identity
    }

    /// Returns the root node for inspection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::{Color, LlrbTree};
    ///
    /// let mut tree = LlrbTree::new();
    /// tree.replace_or_insert(2);
    /// tree.replace_or_insert(1);
    ///
    /// let root = tree.root().unwrap();
    /// assert_eq!(root.item(), &2);
    /// assert_eq!(root.color(), Color::Black);
    /// assert_eq!(root.left().map(|node| *node.item()), Some(1));
    /// ```
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn root_link(&self) -> Option<&NodeRef<T>> {
        self.root.as_ref()
    }

    const fn barrier(&self) -> WriteBarrier {
        WriteBarrier::new(self.identity, self.copy_on_write)
    }
}

impl<T: Item> LlrbTree<T> {
    /// Returns the stored item equivalent to `key`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let mut tree = LlrbTree::new();
    /// tree.replace_or_insert(10);
    ///
    /// assert_eq!(tree.get(&10), Some(&10));
    /// assert_eq!(tree.get(&11), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &T) -> Option<&T> {
        let mut current = self.root();
        while let Some(node) = current {
            if key.less_than(&node.item) {
                current = node.left();
            } else if node.item.less_than(key) {
                current = node.right();
            } else {
                return Some(&node.item);
            }
        }
        None
    }

    /// Returns `true` if an item equivalent to `key` is stored.
    #[must_use]
    pub fn has(&self, key: &T) -> bool {
        self.get(key).is_some()
    }

    /// Returns the smallest item.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let tree: LlrbTree<i32> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.min(), Some(&1));
    /// assert_eq!(tree.max(), Some(&3));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        let mut node = self.root()?;
        while let Some(left) = node.left() {
            node = left;
        }
        Some(&node.item)
    }

    /// Returns the largest item.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.root().map(Self::subtree_max)
    }

    fn subtree_max(mut node: &Node<T>) -> &T {
        while let Some(right) = node.right() {
            node = right;
        }
        &node.item
    }

    /// Places the deletion target for `key` relative to `node`.
    ///
    /// The target is the first item equivalent to `key` in ascending order,
    /// so an equivalent node is the target only when its left subtree holds
    /// no other equivalent. Rotations keep the in-order sequence, so the
    /// answer for a node stays the same for the whole deletion.
    fn locate(node: &Node<T>, key: &T) -> Ordering {
        if key.less_than(&node.item) {
            return Ordering::Less;
        }
        if node.item.less_than(key) {
            return Ordering::Greater;
        }
        match node.left() {
            Some(left) if !Self::subtree_max(left).less_than(key) => Ordering::Less,
            _ => Ordering::Equal,
        }
    }
}

impl<T: Item + Clone> LlrbTree<T> {
    /// Inserts `item`, replacing an equivalent item if one is stored.
    ///
    /// Returns the replaced item. The length grows only when nothing was
    /// replaced.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let mut tree = LlrbTree::new();
    /// assert_eq!(tree.replace_or_insert(5), None);
    /// assert_eq!(tree.replace_or_insert(5), Some(5));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn replace_or_insert(&mut self, item: T) -> Option<T> {
        let barrier = self.barrier();
        let (mut root, replaced) = Self::replace_or_insert_into(barrier, self.root.take(), item);
        barrier.blacken_root(Some(&mut root));
        self.root = Some(root);
        if replaced.is_none() {
            self.length += 1;
        }
        replaced
    }

    /// Recursive helper for `replace_or_insert`.
    fn replace_or_insert_into(
        barrier: WriteBarrier,
        node: Option<NodeRef<T>>,
        item: T,
    ) -> (NodeRef<T>, Option<T>) {
        let Some(mut node) = node else {
            return (Self::new_leaf(barrier, item), None);
        };
        let current = barrier.claim(&mut node);
        let replaced = if item.less_than(&current.item) {
            let (left, replaced) =
                Self::replace_or_insert_into(barrier, current.left.take(), item);
            current.left = Some(left);
            replaced
        } else if current.item.less_than(&item) {
            let (right, replaced) =
                Self::replace_or_insert_into(barrier, current.right.take(), item);
            current.right = Some(right);
            replaced
        } else {
            Some(std::mem::replace(&mut current.item, item))
        };
        (barrier.fix_up(node), replaced)
    }

    /// Inserts `item` even if an equivalent item is already stored.
    ///
    /// Equivalent items are kept in insertion order: a new item lands after
    /// every equivalent item already in the tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let mut tree = LlrbTree::new();
    /// tree.insert_no_replace(1);
    /// tree.insert_no_replace(1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert_no_replace(&mut self, item: T) {
        let barrier = self.barrier();
        let mut root = Self::insert_no_replace_into(barrier, self.root.take(), item);
        barrier.blacken_root(Some(&mut root));
        self.root = Some(root);
        self.length += 1;
    }

    /// Recursive helper for `insert_no_replace`.
    fn insert_no_replace_into(
        barrier: WriteBarrier,
        node: Option<NodeRef<T>>,
        item: T,
    ) -> NodeRef<T> {
        let Some(mut node) = node else {
            return Self::new_leaf(barrier, item);
        };
        let current = barrier.claim(&mut node);
        if item.less_than(&current.item) {
            current.left = Some(Self::insert_no_replace_into(barrier, current.left.take(), item));
        } else {
            current.right = Some(Self::insert_no_replace_into(barrier, current.right.take(), item));
        }
        barrier.fix_up(node)
    }

    /// Inserts every item with [`replace_or_insert`](Self::replace_or_insert).
    pub fn replace_or_insert_bulk<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.replace_or_insert(item);
        }
        debug_log!(length = self.length, "bulk replace_or_insert");
    }

    /// Inserts every item with [`insert_no_replace`](Self::insert_no_replace).
    pub fn insert_no_replace_bulk<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.insert_no_replace(item);
        }
        debug_log!(length = self.length, "bulk insert_no_replace");
    }

    fn new_leaf(barrier: WriteBarrier, item: T) -> NodeRef<T> {
        ReferenceCounter::new(Node::new_red(item, barrier.identity()))
    }

    /// Removes an item equivalent to `key` and returns it.
    ///
    /// When several equivalent items are stored, the first one in ascending
    /// order (the oldest, see [`insert_no_replace`](Self::insert_no_replace))
    /// is removed. Deleting an absent key is a no-op that returns `None`.
    ///
    /// # Complexity
    ///
    /// O(log N), or O(log² N) when equivalent items fill the search path
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let mut tree: LlrbTree<i32> = (0..10).collect();
    /// assert_eq!(tree.delete(&4), Some(4));
    /// assert_eq!(tree.delete(&4), None);
    /// assert_eq!(tree.len(), 9);
    /// ```
    pub fn delete(&mut self, key: &T) -> Option<T> {
        // A miss must not copy the search path of a shared tree.
        if self.copy_on_write && !self.has(key) {
            return None;
        }
        let barrier = self.barrier();
        let (mut root, deleted) = Self::delete_from(barrier, self.root.take(), key);
        barrier.blacken_root(root.as_mut());
        self.root = root;
        if deleted.is_some() {
            self.length -= 1;
        }
        deleted
    }

    /// Recursive helper for `delete`.
    fn delete_from(
        barrier: WriteBarrier,
        node: Option<NodeRef<T>>,
        key: &T,
    ) -> (Option<NodeRef<T>>, Option<T>) {
        let Some(mut node) = node else {
            return (None, None);
        };
        let deleted = if Self::locate(&node, key) == Ordering::Less {
            if node.left.is_none() {
                return (Some(node), None);
            }
            if !is_red(node.left.as_ref()) && !is_left_red(node.left.as_ref()) {
                node = barrier.move_red_left(node);
            }
            let current = barrier.claim(&mut node);
            let (left, deleted) = Self::delete_from(barrier, current.left.take(), key);
            current.left = left;
            deleted
        } else {
            if is_red(node.left.as_ref()) {
                node = barrier.rotate_right(node);
            }
            if node.right.is_none() && Self::locate(&node, key) == Ordering::Equal {
                debug_assert!(node.left.is_none(), "black left child without a right sibling");
                return (None, Some(Self::into_item(node)));
            }
            if node.right.is_some()
                && !is_red(node.right.as_ref())
                && !is_left_red(node.right.as_ref())
            {
                node = barrier.move_red_right(node);
            }
            let found = Self::locate(&node, key) == Ordering::Equal;
            let current = barrier.claim(&mut node);
            if found {
                // Pull the in-order successor into this position.
                let (right, successor) = Self::delete_min_from(barrier, current.right.take());
                current.right = right;
                successor.map(|successor| std::mem::replace(&mut current.item, successor))
            } else {
                let (right, deleted) = Self::delete_from(barrier, current.right.take(), key);
                current.right = right;
                deleted
            }
        };
        (Some(barrier.fix_up(node)), deleted)
    }

    /// Removes and returns the smallest item.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb::tree::LlrbTree;
    ///
    /// let mut tree: LlrbTree<i32> = [2, 3, 1].into_iter().collect();
    /// assert_eq!(tree.delete_min(), Some(1));
    /// assert_eq!(tree.delete_max(), Some(3));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn delete_min(&mut self) -> Option<T> {
        let barrier = self.barrier();
        let (mut root, deleted) = Self::delete_min_from(barrier, self.root.take());
        barrier.blacken_root(root.as_mut());
        self.root = root;
        if deleted.is_some() {
            self.length -= 1;
        }
        deleted
    }

    /// Recursive helper for `delete_min`, also used to extract successors.
    fn delete_min_from(
        barrier: WriteBarrier,
        node: Option<NodeRef<T>>,
    ) -> (Option<NodeRef<T>>, Option<T>) {
        let Some(mut node) = node else {
            return (None, None);
        };
        if node.left.is_none() {
            debug_assert!(node.right.is_none(), "right child under a node without left child");
            return (None, Some(Self::into_item(node)));
        }
        if !is_red(node.left.as_ref()) && !is_left_red(node.left.as_ref()) {
            node = barrier.move_red_left(node);
        }
        let current = barrier.claim(&mut node);
        let (left, deleted) = Self::delete_min_from(barrier, current.left.take());
        current.left = left;
        (Some(barrier.fix_up(node)), deleted)
    }

    /// Removes and returns the largest item.
    pub fn delete_max(&mut self) -> Option<T> {
        let barrier = self.barrier();
        let (mut root, deleted) = Self::delete_max_from(barrier, self.root.take());
        barrier.blacken_root(root.as_mut());
        self.root = root;
        if deleted.is_some() {
            self.length -= 1;
        }
        deleted
    }

    /// Recursive helper for `delete_max`.
    fn delete_max_from(
        barrier: WriteBarrier,
        node: Option<NodeRef<T>>,
    ) -> (Option<NodeRef<T>>, Option<T>) {
        let Some(mut node) = node else {
            return (None, None);
        };
        if is_red(node.left.as_ref()) {
            node = barrier.rotate_right(node);
        }
        if node.right.is_none() {
            return (None, Some(Self::into_item(node)));
        }
        if !is_red(node.right.as_ref()) && !is_left_red(node.right.as_ref()) {
            node = barrier.move_red_right(node);
        }
        let current = barrier.claim(&mut node);
        let (right, deleted) = Self::delete_max_from(barrier, current.right.take());
        current.right = right;
        (Some(barrier.fix_up(node)), deleted)
    }

    /// Takes the item out of a detached node, cloning it if the node is
    /// still shared with another handle.
    fn into_item(node: NodeRef<T>) -> T {
        ReferenceCounter::try_unwrap(node)
            .map_or_else(|shared| shared.item.clone(), |node| node.item)
    }
}

impl<T: Clone> LlrbTree<T> {
    /// Copies a subtree node by node, stamping every copy with `owner`.
    fn deep_copy(node: &NodeRef<T>, owner: OwnerId) -> NodeRef<T> {
        ReferenceCounter::new(Node {
            item: node.item.clone(),
            color: node.color,
            left: node.left.as_ref().map(|left| Self::deep_copy(left, owner)),
            right: node.right.as_ref().map(|right| Self::deep_copy(right, owner)),
            owner,
        })
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

/// Produces an independently mutable handle on the same items.
///
/// A copy-on-write tree shares its nodes with the clone and only pays for
/// the nodes a later mutation touches. A tree without copy-on-write is
/// deep-copied, since it mutates its nodes in place.
impl<T: Clone> Clone for LlrbTree<T> {
    fn clone(&self) -> Self {
        let identity = OwnerId::fresh();
        if self.copy_on_write {
            debug_log!(
                source = self.identity.get(),
                snapshot = identity.get(),
                length = self.length,
                "copy-on-write snapshot"
            );
            Self {
                root: self.root.clone(),
                length: self.length,
                copy_on_write: true,
                identity,
            }
        } else {
            debug_log!(length = self.length, "deep copy of exclusively owned tree");
            Self {
                root: self
                    .root
                    .as_ref()
                    .map(|root| Self::deep_copy(root, identity)),
                length: self.length,
                copy_on_write: false,
                identity,
            }
        }
    }
}

impl<T> Default for LlrbTree<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item + Clone> FromIterator<T> for LlrbTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.insert_no_replace_bulk(iter);
        tree
    }
}

impl<T: Item + Clone> Extend<T> for LlrbTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_no_replace_bulk(iter);
    }
}

impl<T: PartialEq> PartialEq for LlrbTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LlrbTree<T> {}

impl<T: fmt::Debug> fmt::Debug for LlrbTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(LlrbTree<i32>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(LlrbTree<i32>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for LlrbTree<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for item in self {
            sequence.serialize_element(item)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct LlrbTreeVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for LlrbTreeVisitor<T>
where
    T: serde::Deserialize<'de> + Item + Clone,
{
    type Value = LlrbTree<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut tree = LlrbTree::new();
        while let Some(item) = access.next_element()? {
            tree.insert_no_replace(item);
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for LlrbTree<T>
where
    T: serde::Deserialize<'de> + Item + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(LlrbTreeVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
