//! Left-leaning red-black tree engine.
//!
//! This module provides [`Llrb`], an ordered map balanced as a left-leaning
//! red-black tree (Sedgewick, 2008). The balancing algorithm is written once
//! against the [`NodeStore`] capability and runs unchanged over any backend
//! that implements it; [`ArenaStore`] is the default.
//!
//! # Overview
//!
//! - O(log N) search
//! - O(log N) insert
//! - O(log N) delete, delete-min and delete-max
//! - O(N) size (there is no running counter)
//!
//! # Examples
//!
//! ```rust
//! use redblack::Llrb;
//!
//! let mut tree = Llrb::new();
//! tree.insert(3, "three");
//! tree.insert(1, "one");
//! tree.insert(2, "two");
//!
//! assert_eq!(tree.search(&2), Some(&"two"));
//! assert_eq!(tree.delete(&2), Some("two"));
//! assert_eq!(tree.search(&2), None);
//! assert_eq!(tree.size(), 2);
//! ```
//!
//! # Internal Structure
//!
//! Every red link leans left, which gives a 1:1 correspondence with 2-3
//! trees. Structural changes walk a path from the root to the affected
//! node and repair it bottom-up with rotations and color flips as the
//! recursion returns:
//! 1. The root is black
//! 2. Red links only appear as left children
//! 3. No node has two red children
//! 4. Every root-to-terminal path crosses the same number of black links
//! 5. Keys are strictly increasing in order
//!
//! These invariants keep the depth within `2 * log2(N)`.

use crate::arena::ArenaStore;
use crate::node::NodeStore;
use crate::Color;
use log::{debug, trace};
use smallvec::SmallVec;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// Inline capacity of the explicit traversal stack. Depth is bounded by
/// `2 * log2(N)`, so this covers any tree that fits in memory.
const TRAVERSAL_STACK: usize = 64;

// =============================================================================
// Llrb Definition
// =============================================================================

/// An ordered map balanced as a left-leaning red-black tree.
///
/// Keys must implement `Ord`. The comparison is resolved at compile time,
/// so a tree can only ever hold mutually comparable keys.
///
/// `S` is the node backend. The tree owns its store and every node in it.
///
/// # Time Complexity
///
/// | Operation     | Complexity |
/// |---------------|------------|
/// | `new`         | O(1)       |
/// | `search`      | O(log N)   |
/// | `insert`      | O(log N)   |
/// | `delete`      | O(log N)   |
/// | `delete_min`  | O(log N)   |
/// | `delete_max`  | O(log N)   |
/// | `min`/`max`   | O(log N)   |
/// | `size`        | O(N)       |
/// | `is_empty`    | O(1)       |
///
/// # Concurrency
///
/// Rotations rewrite several links in place, and the shape is only
/// consistent between public calls. Sharing a tree across threads needs
/// external mutual exclusion held for a whole operation, which `&mut self`
/// on every mutator already enforces.
#[derive(Clone)]
pub struct Llrb<K, V, S = ArenaStore<K, V>>
where
    S: NodeStore<K, V>,
{
    pub(crate) store: S,
    pub(crate) root: Option<S::Id>,
    marker: PhantomData<(K, V)>,
}

static_assertions::assert_impl_all!(Llrb<i32, String>: Send, Sync, Clone, Default);
static_assertions::assert_not_impl_any!(Llrb<std::rc::Rc<i32>, i32>: Send, Sync);

impl<K, V> Llrb<K, V> {
    /// Creates an empty tree backed by an [`ArenaStore`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::Llrb;
    ///
    /// let tree: Llrb<i32, String> = Llrb::new();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.size(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_store(ArenaStore::new())
    }
}

impl<K, V, S> Llrb<K, V, S>
where
    S: NodeStore<K, V>,
{
    /// Creates an empty tree over the given backend.
    ///
    /// The store should not hold any nodes yet: nodes that are not
    /// reachable from the root are reported by
    /// [`validate`](Self::validate) as a size mismatch.
    #[inline]
    #[must_use]
    pub const fn with_store(store: S) -> Self {
        Self {
            store,
            root: None,
            marker: PhantomData,
        }
    }

    /// Returns the backend.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the root handle, or `None` for an empty tree.
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<S::Id> {
        self.root
    }

    /// Returns `true` if the tree holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Counts the entries.
    ///
    /// # Complexity
    ///
    /// O(N). The tree keeps no running counter; every call walks all nodes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::Llrb;
    ///
    /// let tree: Llrb<i32, i32> = (0..10).map(|key| (key, key * 2)).collect();
    /// assert_eq!(tree.size(), 10);
    /// ```
    #[must_use]
    pub fn size(&self) -> usize {
        self.count(self.root)
    }

    fn count(&self, link: Option<S::Id>) -> usize {
        link.map_or(0, |id| {
            1 + self.count(self.store.left(id)) + self.count(self.store.right(id))
        })
    }

    /// Number of nodes on the longest root-to-node path; `0` when empty.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth_of(self.root)
    }

    fn depth_of(&self, link: Option<S::Id>) -> usize {
        link.map_or(0, |id| {
            1 + self
                .depth_of(self.store.left(id))
                .max(self.depth_of(self.store.right(id)))
        })
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::Llrb;
    ///
    /// let tree: Llrb<i32, &str> = [(3, "three"), (1, "one"), (2, "two")].into_iter().collect();
    /// assert_eq!(tree.min(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut current = self.root?;
        while let Some(left) = self.store.left(current) {
            current = left;
        }
        Some((self.store.key(current), self.store.value(current)))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        let mut current = self.root?;
        while let Some(right) = self.store.right(current) {
            current = right;
        }
        Some((self.store.key(current), self.store.value(current)))
    }

    /// Removes every entry, releasing the nodes to the store.
    pub fn clear(&mut self) {
        let root = self.root.take();
        self.free_subtree(root);
    }

    fn free_subtree(&mut self, link: Option<S::Id>) {
        if let Some(id) = link {
            let (left, right) = (self.store.left(id), self.store.right(id));
            self.free_subtree(left);
            self.free_subtree(right);
            self.store.free_node(id);
        }
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::Llrb;
    ///
    /// let mut tree: Llrb<i32, i32> = (1..=3).map(|key| (key, key)).collect();
    /// assert_eq!(tree.delete_min(), Some((1, 1)));
    /// assert_eq!(tree.delete_min(), Some((2, 2)));
    /// assert_eq!(tree.delete_min(), Some((3, 3)));
    /// assert_eq!(tree.delete_min(), None);
    /// ```
    pub fn delete_min(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        let (root, entry) = self.delete_min_at(root);
        self.reroot(root);
        entry
    }

    /// Removes and returns the entry with the largest key.
    pub fn delete_max(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        let (root, entry) = self.delete_max_at(root);
        self.reroot(root);
        entry
    }

    /// Installs a new top node and forces it black.
    fn reroot(&mut self, root: Option<S::Id>) {
        if let Some(id) = root {
            self.store.set_color(id, Color::Black);
        }
        self.root = root;
    }

    fn delete_min_at(&mut self, mut node: S::Id) -> (Option<S::Id>, Option<(K, V)>) {
        if self.store.left(node).is_none() {
            debug_assert!(
                self.store.right(node).is_none(),
                "minimum node {node:?} has a right subtree"
            );
            return (None, Some(self.store.free_node(node)));
        }
        if !self.is_red_left(node) && !self.store.is_red(self.left_left(node)) {
            node = self.move_red_left(node);
        }
        let (left, entry) = match self.store.left(node) {
            Some(left) => self.delete_min_at(left),
            None => (None, None),
        };
        self.store.set_left(node, left);
        (Some(self.fix_up(node)), entry)
    }

    fn delete_max_at(&mut self, mut node: S::Id) -> (Option<S::Id>, Option<(K, V)>) {
        if self.is_red_left(node) {
            node = self.rotate_right(node);
        }
        if self.store.right(node).is_none() {
            debug_assert!(
                self.store.left(node).is_none(),
                "maximum node {node:?} has a left subtree"
            );
            return (None, Some(self.store.free_node(node)));
        }
        if !self.is_red_right(node) && !self.store.is_red(self.right_left(node)) {
            node = self.move_red_right(node);
        }
        let (right, entry) = match self.store.right(node) {
            Some(right) => self.delete_max_at(right),
            None => (None, None),
        };
        self.store.set_right(node, right);
        (Some(self.fix_up(node)), entry)
    }

    /// Visits every entry in ascending key order, stopping at the first error.
    pub(crate) fn try_for_each_in_order<'a, E, F>(&'a self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&'a K, &'a V) -> Result<(), E>,
    {
        let mut stack: SmallVec<[S::Id; TRAVERSAL_STACK]> = SmallVec::new();
        let mut current = self.root;
        loop {
            while let Some(id) = current {
                stack.push(id);
                current = self.store.left(id);
            }
            let Some(id) = stack.pop() else {
                return Ok(());
            };
            visit(self.store.key(id), self.store.value(id))?;
            current = self.store.right(id);
        }
    }

    // =========================================================================
    // Rebalancing Primitives
    // =========================================================================

    #[inline]
    fn is_red_left(&self, node: S::Id) -> bool {
        self.store.is_red(self.store.left(node))
    }

    #[inline]
    fn is_red_right(&self, node: S::Id) -> bool {
        self.store.is_red(self.store.right(node))
    }

    #[inline]
    fn left_left(&self, node: S::Id) -> Option<S::Id> {
        self.store.left(node).and_then(|left| self.store.left(left))
    }

    #[inline]
    fn right_left(&self, node: S::Id) -> Option<S::Id> {
        self.store.right(node).and_then(|right| self.store.left(right))
    }

    /// Turns a right-leaning red link into a left-leaning one.
    ///
    /// The pivot takes over the old root's color and the old root turns red.
    /// Callers make sure the right child is red; without a right child the
    /// node is returned unchanged.
    fn rotate_left(&mut self, node: S::Id) -> S::Id {
        let Some(pivot) = self.store.right(node) else {
            return node;
        };
        trace!("rotate_left {node:?} -> {pivot:?}");
        let inner = self.store.left(pivot);
        self.store.set_right(node, inner);
        self.store.set_left(pivot, Some(node));
        let color = self.store.color(node);
        self.store.set_color(pivot, color);
        self.store.set_color(node, Color::Red);
        pivot
    }

    /// Mirror of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, node: S::Id) -> S::Id {
        let Some(pivot) = self.store.left(node) else {
            return node;
        };
        trace!("rotate_right {node:?} -> {pivot:?}");
        let inner = self.store.right(pivot);
        self.store.set_left(node, inner);
        self.store.set_right(pivot, Some(node));
        let color = self.store.color(node);
        self.store.set_color(pivot, color);
        self.store.set_color(node, Color::Red);
        pivot
    }

    fn flip_colors(&mut self, node: S::Id) {
        trace!("flip_colors {node:?}");
        self.store.flip_colors(node);
    }

    /// Pushes a red link into the left subtree, borrowing from a 3-node
    /// sibling when there is one and merging otherwise.
    fn move_red_left(&mut self, mut node: S::Id) -> S::Id {
        trace!("move_red_left {node:?}");
        self.flip_colors(node);
        if let Some(right) = self.store.right(node)
            && self.is_red_left(right)
        {
            let right = self.rotate_right(right);
            self.store.set_right(node, Some(right));
            node = self.rotate_left(node);
            self.flip_colors(node);
        }
        node
    }

    /// Pushes a red link into the right subtree.
    fn move_red_right(&mut self, mut node: S::Id) -> S::Id {
        trace!("move_red_right {node:?}");
        self.flip_colors(node);
        if self.store.is_red(self.left_left(node)) {
            node = self.rotate_right(node);
            self.flip_colors(node);
        }
        node
    }

    /// Restores the left-leaning shape on the way back up.
    ///
    /// Step order matters: each step relies on the previous one.
    fn fix_up(&mut self, mut node: S::Id) -> S::Id {
        if self.is_red_right(node) {
            node = self.rotate_left(node);
        }
        if self.is_red_left(node) && self.store.is_red(self.left_left(node)) {
            node = self.rotate_right(node);
        }
        if self.is_red_left(node) && self.is_red_right(node) {
            self.flip_colors(node);
        }
        node
    }
}

impl<K: Ord, V, S> Llrb<K, V, S>
where
    S: NodeStore<K, V>,
{
    // =========================================================================
    // Search
    // =========================================================================

    /// Returns a reference to the value stored under `key`.
    ///
    /// The key may be any borrowed form of the tree's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::Llrb;
    ///
    /// let mut tree = Llrb::new();
    /// tree.insert("hello".to_string(), 42);
    ///
    /// assert_eq!(tree.search("hello"), Some(&42));
    /// assert_eq!(tree.search("world"), None);
    /// ```
    #[must_use]
    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| self.store.value(id))
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| self.store.value_mut(id))
    }

    /// Returns `true` if the tree holds `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    fn find<Q>(&self, key: &Q) -> Option<S::Id>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut link = self.root;
        while let Some(id) = link {
            link = match key.cmp(self.store.key(id).borrow()) {
                Ordering::Less => self.store.left(id),
                Ordering::Greater => self.store.right(id),
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Inserts an entry, returning the value it replaced.
    ///
    /// An existing key keeps its node and only the value is overwritten.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::Llrb;
    ///
    /// let mut tree = Llrb::new();
    /// assert_eq!(tree.insert(1, "one"), None);
    /// assert_eq!(tree.insert(1, "ONE"), Some("one"));
    /// assert_eq!(tree.search(&1), Some(&"ONE"));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (root, previous) = self.insert_at(self.root, key, value);
        self.reroot(Some(root));
        previous
    }

    fn insert_at(&mut self, link: Option<S::Id>, key: K, value: V) -> (S::Id, Option<V>) {
        let Some(mut node) = link else {
            return (self.store.new_node(key, value), None);
        };

        // Split a 4-node on the way down.
        if self.is_red_left(node) && self.is_red_right(node) {
            self.flip_colors(node);
        }

        let previous = match key.cmp(self.store.key(node)) {
            Ordering::Equal => Some(self.store.replace_value(node, value)),
            Ordering::Less => {
                let left = self.store.left(node);
                let (left, previous) = self.insert_at(left, key, value);
                self.store.set_left(node, Some(left));
                previous
            }
            Ordering::Greater => {
                let right = self.store.right(node);
                let (right, previous) = self.insert_at(right, key, value);
                self.store.set_right(node, Some(right));
                previous
            }
        };

        if self.is_red_right(node) && !self.is_red_left(node) {
            node = self.rotate_left(node);
        }
        if self.is_red_left(node) && self.store.is_red(self.left_left(node)) {
            node = self.rotate_right(node);
        }
        if self.is_red_left(node) && self.is_red_right(node) {
            self.flip_colors(node);
        }
        (node, previous)
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Removes `key`, returning its value.
    ///
    /// Deleting an absent key leaves the tree untouched and returns `None`.
    /// A node with two children is removed by successor promotion: it takes
    /// the entry of its right subtree's minimum, which is then excised.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::Llrb;
    ///
    /// let mut tree: Llrb<i32, i32> = (1..=6).map(|key| (key, key * 10)).collect();
    ///
    /// assert_eq!(tree.delete(&3), Some(30));
    /// assert_eq!(tree.delete(&3), None);
    /// assert_eq!(tree.size(), 5);
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.find(key).is_none() {
            debug!("delete of an absent key leaves the tree unchanged");
            return None;
        }
        let root = self.root?;
        let (root, removed) = self.delete_at(root, key);
        self.reroot(root);
        removed
    }

    fn delete_at<Q>(&mut self, mut node: S::Id, key: &Q) -> (Option<S::Id>, Option<V>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if key.cmp(self.store.key(node).borrow()) == Ordering::Less {
            let Some(left) = self.store.left(node) else {
                return (Some(node), None);
            };
            if !self.store.is_red(Some(left)) && !self.is_red_left(left) {
                node = self.move_red_left(node);
            }
            let (left, removed) = match self.store.left(node) {
                Some(left) => self.delete_at(left, key),
                None => (None, None),
            };
            self.store.set_left(node, left);
            return (Some(self.fix_up(node)), removed);
        }

        if self.is_red_left(node) {
            node = self.rotate_right(node);
        }
        if self.is_key(node, key) && self.store.right(node).is_none() {
            debug_assert!(
                self.store.left(node).is_none(),
                "leaf {node:?} has a left subtree"
            );
            let (_, value) = self.store.free_node(node);
            return (None, Some(value));
        }
        let Some(right) = self.store.right(node) else {
            return (Some(self.fix_up(node)), None);
        };
        if !self.store.is_red(Some(right)) && !self.is_red_left(right) {
            node = self.move_red_right(node);
        }

        let right = self.store.right(node);
        let removed = if self.is_key(node, key) {
            let (right, successor) = match right {
                Some(right) => self.delete_min_at(right),
                None => (None, None),
            };
            self.store.set_right(node, right);
            successor.map(|(successor_key, successor_value)| {
                self.store
                    .replace_entry(node, successor_key, successor_value)
                    .1
            })
        } else {
            let (right, removed) = match right {
                Some(right) => self.delete_at(right, key),
                None => (None, None),
            };
            self.store.set_right(node, right);
            removed
        };
        (Some(self.fix_up(node)), removed)
    }

    #[inline]
    fn is_key<Q>(&self, node: S::Id, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        key.cmp(self.store.key(node).borrow()) == Ordering::Equal
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, S> Default for Llrb<K, V, S>
where
    S: NodeStore<K, V> + Default,
{
    #[inline]
    fn default() -> Self {
        Self::with_store(S::default())
    }
}

impl<K: Ord, V, S> FromIterator<(K, V)> for Llrb<K, V, S>
where
    S: NodeStore<K, V> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V, S> Extend<(K, V)> for Llrb<K, V, S>
where
    S: NodeStore<K, V>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for Llrb<K, V, S>
where
    S: NodeStore<K, V>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = formatter.debug_map();
        self.try_for_each_in_order(|key, value| {
            map.entry(key, value);
            Ok::<(), fmt::Error>(())
        })?;
        map.finish()
    }
}

/// Dumps the tree structure one node per line in pre-order.
///
/// Nodes are numbered from `#1` at the root in pre-order; `#0` marks an
/// absent child.
///
/// ```text
/// #1: key=2,color=BLACK,left=#2,right=#3,value=two
/// #2: key=1,color=BLACK,left=#0,right=#0,value=one
/// #3: key=3,color=BLACK,left=#0,right=#0,value=three
/// ```
impl<K: fmt::Display, V: fmt::Display, S> fmt::Display for Llrb<K, V, S>
where
    S: NodeStore<K, V>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(formatter, self.root, 1)
    }
}

impl<K: fmt::Display, V: fmt::Display, S> Llrb<K, V, S>
where
    S: NodeStore<K, V>,
{
    fn render(
        &self,
        formatter: &mut fmt::Formatter<'_>,
        link: Option<S::Id>,
        number: usize,
    ) -> fmt::Result {
        let Some(id) = link else {
            return Ok(());
        };
        let (left, right) = (self.store.left(id), self.store.right(id));
        let left_number = if left.is_some() { number + 1 } else { 0 };
        let right_number = if right.is_some() {
            number + 1 + self.count(left)
        } else {
            0
        };
        writeln!(
            formatter,
            "#{number}: key={},color={},left=#{left_number},right=#{right_number},value={}",
            self.store.key(id),
            self.store.color(id),
            self.store.value(id),
        )?;
        self.render(formatter, left, left_number)?;
        self.render(formatter, right, right_number)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, S> serde::Serialize for Llrb<K, V, S>
where
    K: serde::Serialize,
    V: serde::Serialize,
    S: NodeStore<K, V>,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.size()))?;
        self.try_for_each_in_order(|key, value| map.serialize_entry(key, value))?;
        map.end()
    }
}

#[cfg(feature = "serde")]
struct LlrbVisitor<K, V, S> {
    marker: PhantomData<(K, V, S)>,
}

#[cfg(feature = "serde")]
impl<'de, K, V, S> serde::de::Visitor<'de> for LlrbVisitor<K, V, S>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
    S: NodeStore<K, V> + Default,
{
    type Value = Llrb<K, V, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut tree = Llrb::default();
        while let Some((key, value)) = access.next_entry()? {
            tree.insert(key, value);
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, S> serde::Deserialize<'de> for Llrb<K, V, S>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
    S: NodeStore<K, V> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(LlrbVisitor {
            marker: PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn colors(tree: &Llrb<i32, i32>) -> Vec<(i32, Color)> {
        let mut out = Vec::new();
        collect_colors(tree, tree.root(), &mut out);
        out
    }

    fn collect_colors(
        tree: &Llrb<i32, i32>,
        link: Option<crate::NodeId>,
        out: &mut Vec<(i32, Color)>,
    ) {
        if let Some(id) = link {
            collect_colors(tree, tree.store().left(id), out);
            out.push((*tree.store().key(id), tree.store().color(id)));
            collect_colors(tree, tree.store().right(id), out);
        }
    }

    // =========================================================================
    // Rotation Tests
    // =========================================================================

    #[rstest]
    fn test_rotate_left_moves_color_to_pivot() {
        let mut tree: Llrb<i32, i32> = Llrb::new();
        let root = tree.store.new_node(1, 1);
        let right = tree.store.new_node(2, 2);
        tree.store.set_color(root, Color::Black);
        tree.store.set_right(root, Some(right));

        let top = tree.rotate_left(root);

        assert_eq!(top, right);
        assert_eq!(tree.store.color(right), Color::Black);
        assert_eq!(tree.store.color(root), Color::Red);
        assert_eq!(tree.store.left(right), Some(root));
        assert_eq!(tree.store.right(root), None);
    }

    #[rstest]
    fn test_rotate_right_moves_color_to_pivot() {
        let mut tree: Llrb<i32, i32> = Llrb::new();
        let root = tree.store.new_node(2, 2);
        let left = tree.store.new_node(1, 1);
        let inner = tree.store.new_node(3, 3);
        tree.store.set_color(root, Color::Black);
        tree.store.set_left(root, Some(left));
        tree.store.set_right(left, Some(inner));

        let top = tree.rotate_right(root);

        assert_eq!(top, left);
        assert_eq!(tree.store.color(left), Color::Black);
        assert_eq!(tree.store.color(root), Color::Red);
        assert_eq!(tree.store.left(root), Some(inner));
    }

    #[rstest]
    fn test_rotate_without_child_is_identity() {
        let mut tree: Llrb<i32, i32> = Llrb::new();
        let root = tree.store.new_node(1, 1);
        assert_eq!(tree.rotate_left(root), root);
        assert_eq!(tree.rotate_right(root), root);
        assert_eq!(tree.store.color(root), Color::Red);
    }

    #[rstest]
    fn test_fix_up_splits_temporary_four_node() {
        let mut tree: Llrb<i32, i32> = Llrb::new();
        let middle = tree.store.new_node(2, 2);
        let left = tree.store.new_node(1, 1);
        let right = tree.store.new_node(3, 3);
        tree.store.set_color(middle, Color::Black);
        tree.store.set_left(middle, Some(left));
        tree.store.set_right(middle, Some(right));

        let top = tree.fix_up(middle);

        assert_eq!(top, middle);
        assert_eq!(tree.store.color(middle), Color::Red);
        assert_eq!(tree.store.color(left), Color::Black);
        assert_eq!(tree.store.color(right), Color::Black);
    }

    // =========================================================================
    // Shape Tests
    // =========================================================================

    #[rstest]
    fn test_three_ascending_inserts_balance_to_black_triple() {
        let tree: Llrb<i32, i32> = (1..=3).map(|key| (key, key)).collect();

        let root = tree.root().map(|id| *tree.store().key(id));
        assert_eq!(root, Some(2));
        assert_eq!(
            colors(&tree),
            vec![(1, Color::Black), (2, Color::Black), (3, Color::Black)]
        );
    }

    #[rstest]
    fn test_two_inserts_lean_left() {
        let tree: Llrb<i32, i32> = [(1, 1), (2, 2)].into_iter().collect();

        let root = tree.root().map(|id| *tree.store().key(id));
        assert_eq!(root, Some(2));
        assert_eq!(colors(&tree), vec![(1, Color::Red), (2, Color::Black)]);
    }

    #[rstest]
    fn test_delete_only_key_empties_tree() {
        let mut tree = Llrb::new();
        tree.insert(1, 1);
        assert_eq!(tree.delete(&1), Some(1));
        assert!(tree.is_empty());
        assert!(tree.store().is_empty());
    }

    #[rstest]
    fn test_delete_reuses_freed_slots() {
        let mut tree: Llrb<i32, i32> = (0..32).map(|key| (key, key)).collect();
        for key in 0..16 {
            tree.delete(&key);
        }
        for key in 100..116 {
            tree.insert(key, key);
        }
        assert_eq!(tree.store().capacity(), 32);
        assert_eq!(tree.size(), 32);
    }

    #[rstest]
    fn test_clear_releases_nodes() {
        let mut tree: Llrb<i32, i32> = (0..10).map(|key| (key, key)).collect();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.store().len(), 0);
        assert_eq!(tree.store().free_slots(), 10);
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_tree() {
        let tree: Llrb<i32, String> = Llrb::new();
        assert_eq!(format!("{tree}"), "");
    }

    #[rstest]
    fn test_display_numbers_nodes_in_pre_order() {
        let tree: Llrb<i32, &str> = [(1, "one"), (2, "two"), (3, "three")].into_iter().collect();
        assert_eq!(
            format!("{tree}"),
            "#1: key=2,color=BLACK,left=#2,right=#3,value=two\n\
             #2: key=1,color=BLACK,left=#0,right=#0,value=one\n\
             #3: key=3,color=BLACK,left=#0,right=#0,value=three\n"
        );
    }

    #[rstest]
    fn test_debug_lists_entries_in_key_order() {
        let tree: Llrb<i32, &str> = [(3, "three"), (1, "one"), (2, "two")].into_iter().collect();
        assert_eq!(format!("{tree:?}"), r#"{1: "one", 2: "two", 3: "three"}"#);
    }
}
