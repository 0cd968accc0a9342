//! Invariant checking for [`Llrb`].
//!
//! [`Llrb::validate`] walks the whole tree and reports the first broken
//! invariant. It is meant for tests and debug builds: run it after every
//! operation to catch a backend that aliases nodes or an engine bug close
//! to where it happened.

use crate::error::InvariantViolation;
use crate::node::NodeStore;
use crate::Llrb;
use log::debug;

/// Shape statistics of a tree that passed validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of entries.
    pub size: usize,
    /// Number of nodes on the longest root-to-node path.
    pub depth: usize,
    /// Black nodes on every root-to-terminal path.
    pub black_height: usize,
    /// Number of red nodes.
    pub red_links: usize,
}

/// Largest depth a valid tree of `size` entries may reach.
///
/// That is `2 * ceil(log2(size))`, or `1` for trees with at most one entry.
///
/// # Examples
///
/// ```rust
/// use redblack::depth_limit;
///
/// assert_eq!(depth_limit(0), 1);
/// assert_eq!(depth_limit(1), 1);
/// assert_eq!(depth_limit(2), 2);
/// assert_eq!(depth_limit(75), 14);
/// ```
#[must_use]
pub const fn depth_limit(size: usize) -> usize {
    if size <= 1 {
        1
    } else {
        2 * size.next_power_of_two().trailing_zeros() as usize
    }
}

impl<K: Ord, V, S> Llrb<K, V, S>
where
    S: NodeStore<K, V>,
{
    /// Checks every left-leaning red-black invariant.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found. Structural checks run
    /// before the key order, depth and size checks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::Llrb;
    ///
    /// let tree: Llrb<i32, i32> = (0..75).map(|key| (key, key)).collect();
    /// let stats = tree.validate().unwrap();
    ///
    /// assert_eq!(stats.size, 75);
    /// assert!(stats.depth <= 14);
    /// ```
    pub fn validate(&self) -> Result<TreeStats, InvariantViolation> {
        self.check_invariants()
            .inspect_err(|error| debug!("tree failed validation: {error}"))
    }

    fn check_invariants(&self) -> Result<TreeStats, InvariantViolation> {
        if self.store().is_red(self.root()) {
            return Err(InvariantViolation::RedRoot);
        }

        let mut stats = TreeStats::default();
        stats.black_height = self.check_subtree(self.root(), 1, false, &mut stats)?;
        self.check_order()?;

        let limit = depth_limit(stats.size);
        if stats.depth > limit {
            return Err(InvariantViolation::TooDeep {
                depth: stats.depth,
                limit,
            });
        }

        let stored = self.store().len();
        if stored != stats.size {
            return Err(InvariantViolation::SizeMismatch {
                reachable: stats.size,
                stored,
            });
        }
        Ok(stats)
    }

    /// Returns the number of black nodes on every path below `link`.
    fn check_subtree(
        &self,
        link: Option<S::Id>,
        depth: usize,
        parent_red: bool,
        stats: &mut TreeStats,
    ) -> Result<usize, InvariantViolation> {
        let Some(id) = link else {
            return Ok(0);
        };
        let store = self.store();

        stats.size += 1;
        stats.depth = stats.depth.max(depth);
        let red = store.color(id).is_red();
        if red {
            stats.red_links += 1;
            if parent_red {
                return Err(InvariantViolation::ConsecutiveReds { depth });
            }
        }
        if store.is_red(store.right(id)) {
            return Err(InvariantViolation::RightLeaningRed { depth: depth + 1 });
        }

        let left = self.check_subtree(store.left(id), depth + 1, red, stats)?;
        let right = self.check_subtree(store.right(id), depth + 1, red, stats)?;
        if left != right {
            return Err(InvariantViolation::UnbalancedBlacks { left, right });
        }
        Ok(left + usize::from(!red))
    }

    fn check_order(&self) -> Result<(), InvariantViolation> {
        let mut previous: Option<&K> = None;
        let mut position = 0;
        self.try_for_each_in_order(|key, _| {
            if previous.is_some_and(|previous| previous >= key) {
                return Err(InvariantViolation::OutOfOrder { position });
            }
            previous = Some(key);
            position += 1;
            Ok(())
        })
    }
}
