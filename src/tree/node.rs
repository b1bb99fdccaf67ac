//! Tree vertices.

use std::fmt;

use super::{OwnerId, ReferenceCounter};

/// The color of the link from a node's parent to the node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    /// Red link: the node is glued to its parent as part of a 3-node.
    Red,
    /// Black link.
    Black,
}

impl Color {
    #[inline]
    pub(crate) const fn flipped(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }
}

/// A shared link to a child node.
pub(crate) type NodeRef<T> = ReferenceCounter<Node<T>>;

/// A tree vertex.
///
/// Nodes are only handed out by shared reference (see
/// [`LlrbTree::root`](super::LlrbTree::root)); all mutation goes through the
/// tree's write barrier.
#[derive(Clone)]
pub struct Node<T> {
    pub(crate) item: T,
    pub(crate) color: Color,
    pub(crate) left: Option<NodeRef<T>>,
    pub(crate) right: Option<NodeRef<T>>,
    pub(crate) owner: OwnerId,
}

impl<T> Node<T> {
    /// Creates a new red leaf.
    pub(crate) const fn new_red(item: T, owner: OwnerId) -> Self {
        Self {
            item,
            color: Color::Red,
            left: None,
            right: None,
            owner,
        }
    }

    /// Returns the stored item.
    #[inline]
    #[must_use]
    pub const fn item(&self) -> &T {
        &self.item
    }

    /// Returns the left child, if any.
    #[inline]
    #[must_use]
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// Returns the right child, if any.
    #[inline]
    #[must_use]
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// Returns the color of the link to this node.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Returns `true` if the link to this node is red.
    #[inline]
    #[must_use]
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    /// Returns the identity of the tree handle that last copied or created
    /// this node.
    #[inline]
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }
}

/// Helper function to check if an optional link is red. Absent links are black.
#[inline]
pub(crate) fn is_red<T>(node: Option<&NodeRef<T>>) -> bool {
    node.is_some_and(|node| node.is_red())
}

/// Checks whether the left child of an optional link is red.
#[inline]
pub(crate) fn is_left_red<T>(node: Option<&NodeRef<T>>) -> bool {
    node.is_some_and(|node| is_red(node.left.as_ref()))
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Node")
            .field("item", &self.item)
            .field("color", &self.color)
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}
