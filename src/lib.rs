//! # redblack
//!
//! A left-leaning red-black tree (LLRB) whose balancing algorithm is written
//! against a small node capability instead of a concrete node type.
//!
//! ## Overview
//!
//! - **Balancing Engine**: [`Llrb`] keeps a sorted map of unique keys with
//!   logarithmic search, insert and delete, restoring the LLRB invariants
//!   with rotations and color flips after every structural change.
//! - **Node Capability**: [`NodeStore`] is everything the engine needs from
//!   node storage. Implement it to run the same algorithm over another
//!   storage medium.
//! - **In-memory Storage**: [`ArenaStore`] is the default backend, a slab of
//!   nodes with a free list.
//! - **Validation**: [`Llrb::validate`] checks every invariant and reports
//!   the first violation as an [`InvariantViolation`].
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Llrb`] as a map in key order
//!
//! ## Example
//!
//! ```rust
//! use redblack::prelude::*;
//!
//! let mut tree = Llrb::new();
//! for (key, value) in [(1, "one"), (2, "two"), (3, "three")] {
//!     tree.insert(key, value);
//! }
//!
//! assert_eq!(tree.search(&2), Some(&"two"));
//! assert_eq!(tree.delete(&2), Some("two"));
//! assert_eq!(tree.size(), 2);
//! assert!(tree.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use redblack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{ArenaStore, Color, InvariantViolation, Llrb, NodeStore};
}

mod arena;
mod color;
mod error;
mod node;
mod tree;
mod validate;

pub use arena::ArenaStore;
pub use color::Color;
pub use error::InvariantViolation;
pub use node::{NodeId, NodeStore};
pub use tree::Llrb;
pub use validate::{TreeStats, depth_limit};
