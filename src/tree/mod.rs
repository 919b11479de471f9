//! Binary tree building blocks for the BST and AVL engines
//!
//! Live trees are strictly owned (`Option<Box<TreeNode>>`). Steps never point
//! into a live tree: they hold a [`TreeSnapshot`], a deep copy taken at the
//! moment the step was recorded.

mod node;
pub mod traversal;
pub mod walk;

pub use node::{height, Link, TreeNode};
pub use traversal::InOrder;
pub use walk::{traverse_traced, TraversalEvent, TraversalOrder};

use crate::Value;
use std::fmt;

/// Deep copy of a whole tree at one instant
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct TreeSnapshot {
    root: Link,
}

impl TreeSnapshot {
    /// Copy the tree hanging from `root`
    pub fn capture(root: &Link) -> Self {
        Self { root: root.clone() }
    }

    /// Root node of the copy
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    /// Value stored at the root
    pub fn root_value(&self) -> Option<Value> {
        self.root.as_ref().map(|node| node.value)
    }

    /// No nodes
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        traversal::size(&self.root)
    }

    /// Height of the copy (0 when empty)
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Values in ascending order
    pub fn in_order(&self) -> Vec<Value> {
        traversal::in_order(&self.root)
    }

    /// Node holding `value`
    pub fn find(&self, value: Value) -> Option<&TreeNode> {
        traversal::find(&self.root, value)
    }
}

/// Plain search-tree insertion, refreshing cached heights on the way back up
///
/// Returns `false` (and leaves the tree untouched) for a duplicate.
pub(crate) fn insert_leaf(link: &mut Link, value: Value) -> bool {
    match link {
        None => {
            *link = Some(TreeNode::boxed(value));
            true
        }
        Some(node) => {
            let inserted = match value.cmp(&node.value) {
                std::cmp::Ordering::Less => insert_leaf(&mut node.left, value),
                std::cmp::Ordering::Greater => insert_leaf(&mut node.right, value),
                std::cmp::Ordering::Equal => false,
            };
            if inserted {
                node.update_height();
            }
            inserted
        }
    }
}

/// Parenthesised rendering: `20(10, 30)`, `_` for a missing child
impl fmt::Display for TreeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn render(link: &Link, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match link.as_deref() {
                None => f.write_str("_"),
                Some(node) if node.is_leaf() => write!(f, "{}", node.value),
                Some(node) => {
                    write!(f, "{}(", node.value)?;
                    render(&node.left, f)?;
                    f.write_str(", ")?;
                    render(&node.right, f)?;
                    f.write_str(")")
                }
            }
        }
        render(&self.root, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> Link {
        let mut root = TreeNode::leaf(20);
        root.left = Some(TreeNode::boxed(10));
        root.update_height();
        Some(Box::new(root))
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut live = small_tree();
        let snapshot = TreeSnapshot::capture(&live);

        if let Some(root) = live.as_mut() {
            root.right = Some(TreeNode::boxed(30));
            root.update_height();
        }

        assert_eq!(snapshot.in_order(), vec![10, 20]);
        assert_eq!(TreeSnapshot::capture(&live).in_order(), vec![10, 20, 30]);
    }

    #[test]
    fn test_snapshot_queries() {
        let snapshot = TreeSnapshot::capture(&small_tree());
        assert_eq!(snapshot.root_value(), Some(20));
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.height(), 2);
        assert!(snapshot.find(10).is_some());
        assert!(TreeSnapshot::default().is_empty());
    }

    #[test]
    fn test_insert_leaf_keeps_heights() {
        let mut root: Link = None;
        for value in [50, 30, 70, 20] {
            assert!(insert_leaf(&mut root, value));
        }
        assert!(!insert_leaf(&mut root, 30));
        assert_eq!(traversal::in_order(&root), vec![20, 30, 50, 70]);
        assert_eq!(height(&root), 3);
        assert!(traversal::heights_consistent(&root));
    }

    #[test]
    fn test_snapshot_display() {
        assert_eq!(TreeSnapshot::capture(&small_tree()).to_string(), "20(10, _)");
        assert_eq!(TreeSnapshot::default().to_string(), "_");
    }
}
