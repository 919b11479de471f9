//! Owned binary tree node
//!
//! Each child is exclusively owned by its parent slot (`Option<Box<_>>`).
//! There are no parent pointers; restructuring moves boxes between slots.
//!
//! `height` counts nodes on the longest downward path: a leaf has height 1,
//! an empty link has height 0.

use crate::Value;
use std::cmp::max;
use std::fmt;

/// Owning child slot
pub type Link = Option<Box<TreeNode>>;

/// Node shared by the BST and AVL engines
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct TreeNode {
    /// Stored value
    pub value: Value,

    /// Cached subtree height
    pub height: usize,

    /// Left subtree (values less than `value`)
    pub left: Link,

    /// Right subtree (values greater than `value`)
    pub right: Link,
}

impl TreeNode {
    /// Create a detached leaf
    pub fn leaf(value: Value) -> Self {
        Self {
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    /// Create a boxed leaf, ready to hang in a [`Link`]
    pub fn boxed(value: Value) -> Box<Self> {
        Box::new(Self::leaf(value))
    }

    /// No children
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Number of direct children (0, 1 or 2)
    #[inline]
    pub fn child_count(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }

    /// The single child, when there is exactly one
    pub fn only_child(&self) -> Option<&TreeNode> {
        match (&self.left, &self.right) {
            (Some(child), None) | (None, Some(child)) => Some(&**child),
            _ => None,
        }
    }

    /// Recompute the cached height from the children
    #[inline]
    pub fn update_height(&mut self) {
        self.height = 1 + max(height(&self.left), height(&self.right));
    }

    /// `height(left) − height(right)`
    #[inline]
    pub fn balance_factor(&self) -> i64 {
        height(&self.left) as i64 - height(&self.right) as i64
    }

    /// Leftmost node of this subtree (its minimum)
    pub fn leftmost(&self) -> &TreeNode {
        let mut node = self;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        node
    }
}

/// Cached height of a link (0 when empty)
#[inline]
pub fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(h={})", self.value, self.height)
    }
}
