//! # llrb
//!
//! An in-memory ordered set built on a left-leaning red-black tree, with an
//! optional copy-on-write mode that makes snapshots O(1).
//!
//! ## Overview
//!
//! - **Ordering**: items are ordered by the [`Item`](ordering::Item) contract,
//!   implemented for every `Ord` type out of the box.
//! - **Balanced tree**: [`LlrbTree`](tree::LlrbTree) offers O(log N) insert,
//!   delete, lookup and ordered range traversal.
//! - **Copy-on-write**: a tree created with
//!   [`LlrbTree::new_cow`](tree::LlrbTree::new_cow) can be cloned in O(1).
//!   Each clone is an independently mutable snapshot; a mutation copies only
//!   the nodes on its root-to-change path.
//!
//! ## Feature Flags
//!
//! - `arc`: use `Arc` instead of `Rc` for node links, making trees of
//!   `Send + Sync` items `Send + Sync`
//! - `serde`: `Serialize`/`Deserialize` for trees
//! - `tracing`: emit `tracing` events from the copy-on-write machinery
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use llrb::prelude::*;
//!
//! let mut tree = LlrbTree::new_cow();
//! tree.replace_or_insert(4);
//! tree.replace_or_insert(1);
//!
//! let mut snapshot = tree.clone();
//! snapshot.replace_or_insert(9);
//!
//! assert_eq!(tree.len(), 2);
//! assert_eq!(snapshot.len(), 3);
//! assert!(!tree.has(&9));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

#[macro_use]
mod tracing_helpers;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use llrb::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ordering::*;
    pub use crate::tree::*;
}

pub mod ordering;
pub mod tree;
