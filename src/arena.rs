//! In-memory node storage.
//!
//! [`ArenaStore`] keeps every node in one `Vec` and addresses it by index.
//! Excised nodes go on a free list and their slots are reused by later
//! insertions, so a tree that churns keys does not grow its allocation.

use crate::node::{NodeId, NodeStore};
use crate::Color;
use std::mem;

/// A single tree node as stored in the arena.
#[derive(Clone, Debug)]
struct ArenaNode<K, V> {
    key: K,
    value: V,
    color: Color,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

#[derive(Clone, Debug)]
enum Slot<K, V> {
    Occupied(ArenaNode<K, V>),
    Vacant { next_free: Option<usize> },
}

/// Slab of nodes addressed by stable [`NodeId`] indices.
///
/// This is the default backend of [`Llrb`](crate::Llrb).
///
/// # Examples
///
/// ```rust
/// use redblack::{ArenaStore, NodeStore};
///
/// let mut store = ArenaStore::new();
/// let first = store.new_node(1, "one");
/// assert_eq!(store.len(), 1);
///
/// assert_eq!(store.free_node(first), (1, "one"));
/// assert_eq!(store.len(), 0);
///
/// // The freed slot is reused.
/// let second = store.new_node(2, "two");
/// assert_eq!(first, second);
/// assert_eq!(store.capacity(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct ArenaStore<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: Option<usize>,
    live: usize,
}

impl<K, V> ArenaStore<K, V> {
    /// Creates an empty arena.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` nodes.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            live: 0,
        }
    }

    /// Number of slots ever allocated, live or free.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of freed slots waiting to be reused.
    #[inline]
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.slots.len() - self.live
    }

    /// Drops every node and releases the slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
    }

    fn node(&self, id: NodeId) -> &ArenaNode<K, V> {
        match &self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("{id:?} was already freed"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut ArenaNode<K, V> {
        match &mut self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("{id:?} was already freed"),
        }
    }
}

impl<K, V> Default for ArenaStore<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> NodeStore<K, V> for ArenaStore<K, V> {
    type Id = NodeId;

    fn new_node(&mut self, key: K, value: V) -> NodeId {
        let node = Slot::Occupied(ArenaNode {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
        });
        self.live += 1;
        match self.free_head {
            Some(index) => {
                let vacated = mem::replace(&mut self.slots[index], node);
                if let Slot::Vacant { next_free } = vacated {
                    self.free_head = next_free;
                }
                NodeId(index)
            }
            None => {
                self.slots.push(node);
                NodeId(self.slots.len() - 1)
            }
        }
    }

    fn free_node(&mut self, id: NodeId) -> (K, V) {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match mem::replace(&mut self.slots[id.0], vacant) {
            Slot::Occupied(node) => {
                self.free_head = Some(id.0);
                self.live -= 1;
                (node.key, node.value)
            }
            Slot::Vacant { .. } => panic!("{id:?} was already freed"),
        }
    }

    #[inline]
    fn key(&self, id: NodeId) -> &K {
        &self.node(id).key
    }

    #[inline]
    fn value(&self, id: NodeId) -> &V {
        &self.node(id).value
    }

    #[inline]
    fn value_mut(&mut self, id: NodeId) -> &mut V {
        &mut self.node_mut(id).value
    }

    fn replace_value(&mut self, id: NodeId, value: V) -> V {
        mem::replace(&mut self.node_mut(id).value, value)
    }

    fn replace_entry(&mut self, id: NodeId, key: K, value: V) -> (K, V) {
        let node = self.node_mut(id);
        (
            mem::replace(&mut node.key, key),
            mem::replace(&mut node.value, value),
        )
    }

    #[inline]
    fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    #[inline]
    fn set_left(&mut self, id: NodeId, left: Option<NodeId>) {
        self.node_mut(id).left = left;
    }

    #[inline]
    fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    #[inline]
    fn set_right(&mut self, id: NodeId, right: Option<NodeId>) {
        self.node_mut(id).right = right;
    }

    #[inline]
    fn color(&self, id: NodeId) -> Color {
        self.node(id).color
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    #[inline]
    fn len(&self) -> usize {
        self.live
    }
}
