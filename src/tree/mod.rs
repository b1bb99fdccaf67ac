//! Left-leaning red-black tree with copy-on-write snapshots.
//!
//! - [`LlrbTree`]: the tree handle (insert, delete, lookup, traversal)
//! - [`Node`]: read-only view of a tree vertex, reachable through
//!   [`LlrbTree::root`]
//! - [`Ascend`] / [`Descend`]: lazy ordered iterators
//! - [`HeightStats`] / [`InvariantViolation`]: diagnostics
//!
//! # Structural Sharing
//!
//! Nodes are reference counted. A copy-on-write tree shares every node with
//! its clones until one of them writes; the writer then copies only the
//! nodes on the path it mutates.
//!
//! ```rust
//! use llrb::tree::LlrbTree;
//!
//! let mut tree = LlrbTree::new_cow();
//! for value in [4, 6, 1, 3] {
//!     tree.insert_no_replace(value);
//! }
//!
//! let mut snapshot = tree.clone();
//! tree.insert_no_replace(60);
//! snapshot.insert_no_replace(20);
//!
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 6, 60]);
//! assert_eq!(snapshot.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 6, 20]);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

// =============================================================================
// Owner Identity
// =============================================================================

/// Identity of a tree handle, stamped onto the nodes it may mutate in place.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Draws an identity no other handle in this process has used.
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identity value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

mod balance;
mod diagnostics;
mod iter;
mod llrb;
mod node;

pub use diagnostics::HeightStats;
pub use diagnostics::InvariantViolation;
pub use iter::Ascend;
pub use iter::Descend;
pub use llrb::LlrbTree;
pub use node::Color;
pub use node::Node;
