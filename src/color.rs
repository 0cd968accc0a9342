//! Link colors of a left-leaning red-black tree.

use std::fmt;

/// The color of the link from a node's parent to the node.
///
/// A red link glues a node to its parent so that the pair behaves like a
/// single 3-node of the equivalent 2-3 tree. The "no node" terminal is
/// always black.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    /// The node is the lower half of a 3-node.
    Red,
    /// The node is an ordinary 2-3 tree node.
    Black,
}

impl Color {
    /// Returns the opposite color.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::Color;
    ///
    /// assert_eq!(Color::Red.flipped(), Color::Black);
    /// assert_eq!(Color::Black.flipped(), Color::Red);
    /// ```
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    /// Returns `true` for [`Color::Red`].
    #[inline]
    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, Self::Red)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(formatter, "RED"),
            Self::Black => write!(formatter, "BLACK"),
        }
    }
}
