//! Rotations, color flips and fix-up, applied through the write barrier.
//!
//! Every structural change goes through [`WriteBarrier::claim`], which hands
//! out a mutable node only once it is exclusively owned by the writing tree.

use super::node::{Color, Node, NodeRef, is_left_red, is_red};
use super::{OwnerId, ReferenceCounter};

/// Decides, per visited node, whether a mutation may happen in place.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WriteBarrier {
    identity: OwnerId,
    copy_on_write: bool,
}

impl WriteBarrier {
    pub(crate) const fn new(identity: OwnerId, copy_on_write: bool) -> Self {
        Self {
            identity,
            copy_on_write,
        }
    }

    /// Identity stamped onto nodes created or copied through this barrier.
    pub(crate) const fn identity(self) -> OwnerId {
        self.identity
    }

    /// Returns the node behind `link` ready for in-place mutation.
    ///
    /// In copy-on-write mode a node owned by another handle, or still
    /// referenced from elsewhere, is shallow-copied first and `link` is
    /// redirected to the copy.
    pub(crate) fn claim<T: Clone>(self, link: &mut NodeRef<T>) -> &mut Node<T> {
        if self.copy_on_write
            && (link.owner != self.identity || ReferenceCounter::get_mut(link).is_none())
        {
            trace_log!(
                from = link.owner.get(),
                to = self.identity.get(),
                "copy-on-write node copy"
            );
            let mut copy = (**link).clone();
            copy.owner = self.identity;
            *link = ReferenceCounter::new(copy);
        }
        ReferenceCounter::make_mut(link)
    }

    //              node                      right
    //              /  \                      /   \
    //             a   (r)right    =>     (r)node  c
    //                  / \                  / \
    //                 b   c                a   b
    //
    /// Promotes the red right child above `node`.
    pub(crate) fn rotate_left<T: Clone>(self, mut node: NodeRef<T>) -> NodeRef<T> {
        let parent = self.claim(&mut node);
        let Some(mut right) = parent.right.take() else {
            return node;
        };
        debug_assert!(right.is_red(), "rotate_left on a black link");
        let child = self.claim(&mut right);
        parent.right = child.left.take();
        child.color = parent.color;
        parent.color = Color::Red;
        child.left = Some(node);
        right
    }

    //              node                 left
    //              /  \                 /  \
    //        (r)left   c       =>      a  (r)node
    //           / \                        / \
    //          a   b                      b   c
    //
    /// Promotes the red left child above `node`.
    pub(crate) fn rotate_right<T: Clone>(self, mut node: NodeRef<T>) -> NodeRef<T> {
        let parent = self.claim(&mut node);
        let Some(mut left) = parent.left.take() else {
            return node;
        };
        debug_assert!(left.is_red(), "rotate_right on a black link");
        let child = self.claim(&mut left);
        parent.left = child.right.take();
        child.color = parent.color;
        parent.color = Color::Red;
        child.right = Some(node);
        left
    }

    /// Toggles the color of `node` and of both its children.
    pub(crate) fn color_flip<T: Clone>(self, node: &mut NodeRef<T>) {
        let parent = self.claim(node);
        parent.color = parent.color.flipped();
        if let Some(left) = parent.left.as_mut() {
            let left = self.claim(left);
            left.color = left.color.flipped();
        }
        if let Some(right) = parent.right.as_mut() {
            let right = self.claim(right);
            right.color = right.color.flipped();
        }
    }

    /// Restores the left-leaning invariants at `node` on the way back up.
    pub(crate) fn fix_up<T: Clone>(self, mut node: NodeRef<T>) -> NodeRef<T> {
        if is_red(node.right.as_ref()) && !is_red(node.left.as_ref()) {
            node = self.rotate_left(node);
        }
        if is_red(node.left.as_ref()) && is_left_red(node.left.as_ref()) {
            node = self.rotate_right(node);
        }
        if is_red(node.left.as_ref()) && is_red(node.right.as_ref()) {
            self.color_flip(&mut node);
        }
        node
    }

    /// Makes `node.left` or one of its children red before descending left.
    pub(crate) fn move_red_left<T: Clone>(self, mut node: NodeRef<T>) -> NodeRef<T> {
        self.color_flip(&mut node);
        if is_left_red(node.right.as_ref()) {
            let parent = self.claim(&mut node);
            if let Some(right) = parent.right.take() {
                parent.right = Some(self.rotate_right(right));
            }
            node = self.rotate_left(node);
            self.color_flip(&mut node);
        }
        node
    }

    /// Makes `node.right` or one of its children red before descending right.
    pub(crate) fn move_red_right<T: Clone>(self, mut node: NodeRef<T>) -> NodeRef<T> {
        self.color_flip(&mut node);
        if is_left_red(node.left.as_ref()) {
            node = self.rotate_right(node);
            self.color_flip(&mut node);
        }
        node
    }

    /// Forces the root black, copying it only when it is red.
    pub(crate) fn blacken_root<T: Clone>(self, root: Option<&mut NodeRef<T>>) {
        if let Some(root) = root
            && root.is_red()
        {
            self.claim(root).color = Color::Black;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn leaf(item: i32, color: Color, owner: OwnerId) -> NodeRef<i32> {
        let mut node = Node::new_red(item, owner);
        node.color = color;
        ReferenceCounter::new(node)
    }

    fn join(
        mut parent: NodeRef<i32>,
        left: Option<NodeRef<i32>>,
        right: Option<NodeRef<i32>>,
    ) -> NodeRef<i32> {
        let node = ReferenceCounter::make_mut(&mut parent);
        node.left = left;
        node.right = right;
        parent
    }

    fn in_order(node: Option<&NodeRef<i32>>, out: &mut Vec<i32>) {
        if let Some(node) = node {
            in_order(node.left.as_ref(), out);
            out.push(node.item);
            in_order(node.right.as_ref(), out);
        }
    }

    #[rstest]
    fn test_rotate_left_promotes_red_right_child() {
        let owner = OwnerId::fresh();
        let barrier = WriteBarrier::new(owner, false);
        let root = join(
            leaf(2, Color::Black, owner),
            Some(leaf(1, Color::Black, owner)),
            Some(leaf(3, Color::Red, owner)),
        );

        let rotated = barrier.rotate_left(root);

        assert_eq!(rotated.item, 3);
        assert_eq!(rotated.color, Color::Black);
        let left = rotated.left.as_ref().map(|node| (node.item, node.color));
        assert_eq!(left, Some((2, Color::Red)));
        let mut items = Vec::new();
        in_order(Some(&rotated), &mut items);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_rotate_right_promotes_red_left_child() {
        let owner = OwnerId::fresh();
        let barrier = WriteBarrier::new(owner, false);
        let root = join(
            leaf(2, Color::Black, owner),
            Some(leaf(1, Color::Red, owner)),
            Some(leaf(3, Color::Black, owner)),
        );

        let rotated = barrier.rotate_right(root);

        assert_eq!(rotated.item, 1);
        assert_eq!(rotated.color, Color::Black);
        let right = rotated.right.as_ref().map(|node| (node.item, node.color));
        assert_eq!(right, Some((2, Color::Red)));
        let mut items = Vec::new();
        in_order(Some(&rotated), &mut items);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_color_flip_toggles_node_and_children() {
        let owner = OwnerId::fresh();
        let barrier = WriteBarrier::new(owner, false);
        let mut root = join(
            leaf(2, Color::Black, owner),
            Some(leaf(1, Color::Red, owner)),
            Some(leaf(3, Color::Red, owner)),
        );

        barrier.color_flip(&mut root);

        assert!(root.is_red());
        assert!(!is_red(root.left.as_ref()));
        assert!(!is_red(root.right.as_ref()));
    }

    #[rstest]
    fn test_fix_up_splits_temporary_four_node() {
        let owner = OwnerId::fresh();
        let barrier = WriteBarrier::new(owner, false);
        // 1 <- 2 <- 3, both links red and leaning left
        let middle = join(
            leaf(2, Color::Red, owner),
            Some(leaf(1, Color::Red, owner)),
            None,
        );
        let root = join(leaf(3, Color::Black, owner), Some(middle), None);

        let fixed = barrier.fix_up(root);

        assert_eq!(fixed.item, 2);
        assert!(fixed.is_red());
        assert!(!is_red(fixed.left.as_ref()));
        assert!(!is_red(fixed.right.as_ref()));
    }

    #[rstest]
    fn test_claim_mutates_owned_node_in_place() {
        let owner = OwnerId::fresh();
        let barrier = WriteBarrier::new(owner, true);
        let mut node = leaf(5, Color::Red, owner);
        let before = ReferenceCounter::as_ptr(&node);

        barrier.claim(&mut node).color = Color::Black;

        assert_eq!(ReferenceCounter::as_ptr(&node), before);
        assert_eq!(node.color, Color::Black);
    }

    #[rstest]
    fn test_claim_copies_node_of_other_owner() {
        let other = OwnerId::fresh();
        let barrier = WriteBarrier::new(OwnerId::fresh(), true);
        let mut node = leaf(5, Color::Red, other);
        let before = ReferenceCounter::as_ptr(&node);

        barrier.claim(&mut node).color = Color::Black;

        assert_ne!(ReferenceCounter::as_ptr(&node), before);
        assert_eq!(node.owner, barrier.identity());
    }

    #[rstest]
    fn test_claim_copies_shared_node_and_leaves_original_untouched() {
        let owner = OwnerId::fresh();
        let barrier = WriteBarrier::new(owner, true);
        let mut node = leaf(5, Color::Red, owner);
        let shared = ReferenceCounter::clone(&node);

        barrier.claim(&mut node).color = Color::Black;

        assert!(!ReferenceCounter::ptr_eq(&node, &shared));
        assert_eq!(shared.color, Color::Red);
        assert_eq!(node.color, Color::Black);
    }

    #[rstest]
    fn test_blacken_root_keeps_black_root_untouched() {
        let barrier = WriteBarrier::new(OwnerId::fresh(), true);
        let mut root = leaf(1, Color::Black, OwnerId::fresh());
        let before = ReferenceCounter::as_ptr(&root);

        barrier.blacken_root(Some(&mut root));

        assert_eq!(ReferenceCounter::as_ptr(&root), before);
    }
}
