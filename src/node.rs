//! The node capability consumed by the balancing engine.
//!
//! [`NodeStore`] is the seam between the LLRB algorithm in
//! [`Llrb`](crate::Llrb) and the memory that holds the nodes. The engine
//! never touches a node directly: it asks the store for a node's key, value,
//! children and color through an opaque handle, and writes structural
//! changes back through the same handle. Any backend that implements this
//! trait gets a working balanced tree without changes to the algorithm.
//!
//! The "no node" terminal is represented as `None`. It is implicitly black,
//! has no children, and is never written to: [`NodeStore::is_red`] and
//! [`NodeStore::flip_colors`] are safe to call next to a missing child.

use crate::Color;
use std::fmt;

/// Stable handle to a node inside an [`ArenaStore`](crate::ArenaStore).
///
/// Handles stay valid until the node is freed. A freed handle may be
/// reissued for a later node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

static_assertions::assert_impl_all!(NodeId: Copy, Send, Sync);

impl NodeId {
    /// Returns the slot index backing this handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "NodeId({})", self.0)
    }
}

/// Read/write access to tree nodes, addressed by handle.
///
/// Implementors own the nodes. Each node has exactly one parent link (or is
/// the root); the engine relies on this and never creates aliases, so a
/// store must not hand out the same handle for two live nodes.
///
/// Every accessor taking an `id` may assume the handle is live. Passing a
/// freed handle is a programming error and implementations may panic.
///
/// # Examples
///
/// ```rust
/// use redblack::{ArenaStore, Color, NodeStore};
///
/// let mut store = ArenaStore::new();
/// let node = store.new_node(1, "one");
///
/// assert_eq!(store.color(node), Color::Red);
/// assert!(store.is_red(Some(node)));
/// assert!(!store.is_red(store.left(node)));
/// ```
pub trait NodeStore<K, V> {
    /// Handle type addressing a node in this store.
    type Id: Copy + Eq + fmt::Debug;

    /// Allocates a fresh red node with no children.
    fn new_node(&mut self, key: K, value: V) -> Self::Id;

    /// Releases a node, returning its entry.
    ///
    /// The node's children are not released; the caller must have unlinked
    /// or re-parented them first.
    fn free_node(&mut self, id: Self::Id) -> (K, V);

    /// Returns the node's key.
    fn key(&self, id: Self::Id) -> &K;

    /// Returns the node's value.
    fn value(&self, id: Self::Id) -> &V;

    /// Returns the node's value mutably.
    fn value_mut(&mut self, id: Self::Id) -> &mut V;

    /// Overwrites the node's value, returning the previous one.
    fn replace_value(&mut self, id: Self::Id, value: V) -> V;

    /// Overwrites the node's key and value, returning the previous entry.
    fn replace_entry(&mut self, id: Self::Id, key: K, value: V) -> (K, V);

    /// Returns the left child.
    fn left(&self, id: Self::Id) -> Option<Self::Id>;

    /// Replaces the left child link.
    fn set_left(&mut self, id: Self::Id, left: Option<Self::Id>);

    /// Returns the right child.
    fn right(&self, id: Self::Id) -> Option<Self::Id>;

    /// Replaces the right child link.
    fn set_right(&mut self, id: Self::Id, right: Option<Self::Id>);

    /// Returns the color of the link into this node.
    fn color(&self, id: Self::Id) -> Color;

    /// Sets the color of the link into this node.
    fn set_color(&mut self, id: Self::Id, color: Color);

    /// Number of live nodes held by the store.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no live nodes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` iff `link` is a node and that node is red.
    ///
    /// The "no node" terminal is black.
    #[inline]
    fn is_red(&self, link: Option<Self::Id>) -> bool {
        link.is_some_and(|id| self.color(id).is_red())
    }

    /// Returns the color of `link`, treating "no node" as black.
    #[inline]
    fn color_of(&self, link: Option<Self::Id>) -> Color {
        link.map_or(Color::Black, |id| self.color(id))
    }

    /// Toggles the color of a node and of each of its present children.
    ///
    /// Missing children are skipped; the "no node" terminal stays black.
    fn flip_colors(&mut self, id: Self::Id) {
        let flipped = self.color(id).flipped();
        self.set_color(id, flipped);
        for child in [self.left(id), self.right(id)].into_iter().flatten() {
            let flipped = self.color(child).flipped();
            self.set_color(child, flipped);
        }
    }
}
