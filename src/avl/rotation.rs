//! Single rotations and LL/LR/RR/RL classification
//!
//! Rotations re-parent boxed children; no node is ever shared between slots.
//!
//! Right rotation at `y` (left rotation is the mirror):
//!
//! ```text
//!         y            x
//!        / \          / \
//!       x   T3  =>  T1   y
//!      / \              / \
//!    T1   T2          T2   T3
//! ```

use crate::tree::{Link, TreeNode};
use crate::Value;
use std::cmp::Ordering;
use std::fmt;

/// Direction of a single rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Rotation {
    /// Right child moves up
    Left,
    /// Left child moves up
    Right,
}

impl Rotation {
    /// Rotate `subtree`, returning its new root
    pub fn apply(self, subtree: Box<TreeNode>) -> Box<TreeNode> {
        match self {
            Rotation::Left => rotate_left(subtree),
            Rotation::Right => rotate_right(subtree),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Left => f.write_str("left rotation"),
            Rotation::Right => f.write_str("right rotation"),
        }
    }
}

/// Which rotation(s) restore balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum RotationCase {
    /// Left-left: single right rotation
    LL,
    /// Left-right: left rotation on the left child, then right rotation
    LR,
    /// Right-right: single left rotation
    RR,
    /// Right-left: right rotation on the right child, then left rotation
    RL,
}

impl RotationCase {
    /// Short human-readable remedy
    pub fn remedy(self) -> &'static str {
        match self {
            RotationCase::LL => "single right rotation",
            RotationCase::LR => "left rotation on the left child, then right rotation",
            RotationCase::RR => "single left rotation",
            RotationCase::RL => "right rotation on the right child, then left rotation",
        }
    }
}

impl fmt::Display for RotationCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RotationCase::LL => "LL",
            RotationCase::LR => "LR",
            RotationCase::RR => "RR",
            RotationCase::RL => "RL",
        };
        f.write_str(label)
    }
}

/// An unbalanced node together with the classification of its repair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Imbalance {
    /// Unbalanced node
    pub node: Value,
    /// Its child on the heavy side
    pub child: Value,
    /// Balance factor of `node`
    pub balance: i64,
    /// Repair case
    pub case: RotationCase,
}

impl Imbalance {
    /// Classify `node` after inserting `inserted`; `None` when balanced
    ///
    /// The inserted value is compared against the heavy child to tell an
    /// outer (LL/RR) from an inner (LR/RL) imbalance.
    pub fn detect(node: &TreeNode, inserted: Value) -> Option<Self> {
        let balance = node.balance_factor();
        let (child, case) = if balance > 1 {
            let child = node.left.as_deref()?.value;
            let case = if inserted < child {
                RotationCase::LL
            } else {
                RotationCase::LR
            };
            (child, case)
        } else if balance < -1 {
            let child = node.right.as_deref()?.value;
            let case = if inserted > child {
                RotationCase::RR
            } else {
                RotationCase::RL
            };
            (child, case)
        } else {
            return None;
        };
        Some(Self {
            node: node.value,
            child,
            balance,
            case,
        })
    }

    /// Ordered `(pivot, rotation)` pairs that repair the imbalance
    pub fn rotations(&self) -> Vec<(Value, Rotation)> {
        match self.case {
            RotationCase::LL => vec![(self.node, Rotation::Right)],
            RotationCase::RR => vec![(self.node, Rotation::Left)],
            RotationCase::LR => vec![(self.child, Rotation::Left), (self.node, Rotation::Right)],
            RotationCase::RL => vec![(self.child, Rotation::Right), (self.node, Rotation::Left)],
        }
    }
}

/// Right rotation: `y.left` becomes the local root
pub fn rotate_right(mut y: Box<TreeNode>) -> Box<TreeNode> {
    let Some(mut x) = y.left.take() else {
        debug_assert!(false, "right rotation at {} without a left child", y.value);
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Left rotation: `x.right` becomes the local root
pub fn rotate_left(mut x: Box<TreeNode>) -> Box<TreeNode> {
    let Some(mut y) = x.right.take() else {
        debug_assert!(false, "left rotation at {} without a right child", x.value);
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Rotate the subtree rooted at `pivot`, refreshing heights of its ancestors
///
/// Returns the value lifted into the pivot's place, or `None` if `pivot` is
/// not in the tree.
pub(crate) fn rotate_at(link: &mut Link, pivot: Value, rotation: Rotation) -> Option<Value> {
    let node = link.as_deref_mut()?;
    match pivot.cmp(&node.value) {
        Ordering::Less => {
            let lifted = rotate_at(&mut node.left, pivot, rotation);
            node.update_height();
            lifted
        }
        Ordering::Greater => {
            let lifted = rotate_at(&mut node.right, pivot, rotation);
            node.update_height();
            lifted
        }
        Ordering::Equal => {
            let rotated = rotation.apply(link.take()?);
            let lifted = rotated.value;
            *link = Some(rotated);
            Some(lifted)
        }
    }
}
