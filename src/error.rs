//! Error types for tree validation.
//!
//! The engine's own operations are infallible. These errors are produced by
//! [`Llrb::validate`](crate::Llrb::validate) when a tree's shape breaks one
//! of the left-leaning red-black invariants, which can only happen through a
//! faulty [`NodeStore`](crate::NodeStore) backend or a bug in the engine.

use std::fmt;

/// A broken left-leaning red-black invariant.
///
/// Depths count nodes from the root, which is at depth `1`.
///
/// # Examples
///
/// ```rust
/// use redblack::InvariantViolation;
///
/// let error = InvariantViolation::UnbalancedBlacks { left: 2, right: 3 };
/// assert_eq!(
///     format!("{error}"),
///     "unbalanced black links: left subtree has 2, right subtree has 3"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root node is red.
    RedRoot,
    /// A red node hangs off a right link.
    RightLeaningRed {
        /// Depth of the red right child.
        depth: usize,
    },
    /// A red node has a red child.
    ConsecutiveReds {
        /// Depth of the red child.
        depth: usize,
    },
    /// Two sibling subtrees cross different numbers of black links.
    UnbalancedBlacks {
        /// Black links on every path through the left subtree.
        left: usize,
        /// Black links on every path through the right subtree.
        right: usize,
    },
    /// The in-order key sequence is not strictly increasing.
    OutOfOrder {
        /// Zero-based in-order position of the first offending key.
        position: usize,
    },
    /// The tree is deeper than `2 * ceil(log2(size))` allows.
    TooDeep {
        /// Observed depth.
        depth: usize,
        /// Largest depth allowed for the tree's size.
        limit: usize,
    },
    /// The store holds nodes that are not reachable from the root.
    SizeMismatch {
        /// Nodes reachable from the root.
        reachable: usize,
        /// Live nodes reported by the store.
        stored: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(formatter, "root is red"),
            Self::RightLeaningRed { depth } => {
                write!(formatter, "red right link at depth {depth}")
            }
            Self::ConsecutiveReds { depth } => {
                write!(formatter, "red node with a red parent at depth {depth}")
            }
            Self::UnbalancedBlacks { left, right } => write!(
                formatter,
                "unbalanced black links: left subtree has {left}, right subtree has {right}"
            ),
            Self::OutOfOrder { position } => {
                write!(formatter, "key at in-order position {position} is out of order")
            }
            Self::TooDeep { depth, limit } => {
                write!(formatter, "depth {depth} exceeds the limit of {limit}")
            }
            Self::SizeMismatch { reachable, stored } => write!(
                formatter,
                "{reachable} nodes reachable from the root but the store holds {stored}"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(InvariantViolation::RedRoot, "root is red")]
    #[case(
        InvariantViolation::RightLeaningRed { depth: 3 },
        "red right link at depth 3"
    )]
    #[case(
        InvariantViolation::ConsecutiveReds { depth: 4 },
        "red node with a red parent at depth 4"
    )]
    #[case(
        InvariantViolation::OutOfOrder { position: 5 },
        "key at in-order position 5 is out of order"
    )]
    #[case(
        InvariantViolation::TooDeep { depth: 9, limit: 8 },
        "depth 9 exceeds the limit of 8"
    )]
    #[case(
        InvariantViolation::SizeMismatch { reachable: 2, stored: 3 },
        "2 nodes reachable from the root but the store holds 3"
    )]
    fn test_display(#[case] error: InvariantViolation, #[case] expected: &str) {
        assert_eq!(format!("{error}"), expected);
    }

    #[rstest]
    fn test_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(InvariantViolation::RedRoot);
        assert_eq!(error.to_string(), "root is red");
    }
}
