//! The ordering contract stored items must satisfy.
//!
//! The tree never compares items by identity or equality: every decision is
//! expressed through [`Item::less_than`]. Two items are *equivalent* when
//! neither is less than the other; equivalence decides lookups, replacement
//! and deletion.
//!
//! Every `Ord` type is an [`Item`] already. A type that needs a different
//! order (or cannot be `Ord`) implements the trait directly:
//!
//! ```rust
//! use llrb::ordering::{Item, equivalent};
//!
//! #[derive(Clone, Debug)]
//! struct Job {
//!     priority: u8,
//!     name: &'static str,
//! }
//!
//! impl Item for Job {
//!     fn less_than(&self, other: &Self) -> bool {
//!         self.priority < other.priority
//!     }
//! }
//!
//! let build = Job { priority: 1, name: "build" };
//! let test = Job { priority: 1, name: "test" };
//! assert!(equivalent(&build, &test));
//! ```

/// A value with a strict weak ordering.
///
/// `less_than` must be irreflexive, asymmetric and transitive, and must not
/// change while the item is stored in a tree. Violating this is a caller
/// error: traversal order becomes unspecified, but nothing panics.
pub trait Item {
    /// Returns `true` if `self` orders strictly before `other`.
    fn less_than(&self, other: &Self) -> bool;
}

impl<T: Ord> Item for T {
    #[inline]
    fn less_than(&self, other: &Self) -> bool {
        self < other
    }
}

/// Returns `true` if neither item orders before the other.
///
/// # Examples
///
/// ```rust
/// use llrb::ordering::equivalent;
///
/// assert!(equivalent(&3, &3));
/// assert!(!equivalent(&3, &4));
/// ```
#[inline]
pub fn equivalent<T: Item + ?Sized>(left: &T, right: &T) -> bool {
    !left.less_than(right) && !right.less_than(left)
}
