//! Read-only walks over a linked tree
//!
//! In-order iteration keeps an explicit stack of pending ancestors, so depth
//! is bounded by the tree height without relying on recursion.

use super::node::{height, Link, TreeNode};
use crate::Value;
use std::cmp::Ordering;
use std::collections::VecDeque;

/// In-order iterator (ascending for a search tree)
///
/// Stack depth: at most the tree height
#[derive(Debug)]
pub struct InOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> InOrder<'a> {
    /// Start at the leftmost node of `link`
    pub fn new(link: &'a Link) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(link.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a TreeNode>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(node)
    }
}

/// Values in ascending (in-order) order
pub fn in_order(link: &Link) -> Vec<Value> {
    InOrder::new(link).map(|node| node.value).collect()
}

/// Values in pre-order (node, left, right)
pub fn pre_order(link: &Link) -> Vec<Value> {
    let mut values = Vec::new();
    let mut stack: Vec<&TreeNode> = link.as_deref().into_iter().collect();
    while let Some(node) = stack.pop() {
        values.push(node.value);
        if let Some(right) = node.right.as_deref() {
            stack.push(right);
        }
        if let Some(left) = node.left.as_deref() {
            stack.push(left);
        }
    }
    values
}

/// Values in post-order (left, right, node)
pub fn post_order(link: &Link) -> Vec<Value> {
    // Node-right-left pre-order, reversed
    let mut values = Vec::new();
    let mut stack: Vec<&TreeNode> = link.as_deref().into_iter().collect();
    while let Some(node) = stack.pop() {
        values.push(node.value);
        if let Some(left) = node.left.as_deref() {
            stack.push(left);
        }
        if let Some(right) = node.right.as_deref() {
            stack.push(right);
        }
    }
    values.reverse();
    values
}

/// Values level by level, left to right
pub fn level_order(link: &Link) -> Vec<Value> {
    let mut values = Vec::new();
    let mut queue: VecDeque<&TreeNode> = link.as_deref().into_iter().collect();
    while let Some(node) = queue.pop_front() {
        values.push(node.value);
        queue.extend(node.left.as_deref());
        queue.extend(node.right.as_deref());
    }
    values
}

/// Number of nodes
pub fn size(link: &Link) -> usize {
    InOrder::new(link).count()
}

/// Node holding `value`, found by comparison descent
pub fn find(link: &Link, value: Value) -> Option<&TreeNode> {
    let mut node = link.as_deref();
    while let Some(current) = node {
        node = match value.cmp(&current.value) {
            Ordering::Equal => return Some(current),
            Ordering::Less => current.left.as_deref(),
            Ordering::Greater => current.right.as_deref(),
        };
    }
    None
}

/// Values visited while descending towards `value`, root first
///
/// Ends at the node holding `value` when present, else at the last node
/// visited before falling off the tree.
pub fn search_path(link: &Link, value: Value) -> Vec<Value> {
    let mut path = Vec::new();
    let mut node = link.as_deref();
    while let Some(current) = node {
        path.push(current.value);
        node = match value.cmp(&current.value) {
            Ordering::Equal => break,
            Ordering::Less => current.left.as_deref(),
            Ordering::Greater => current.right.as_deref(),
        };
    }
    path
}

/// Strict search-tree ordering over the whole tree
pub fn is_search_tree(link: &Link) -> bool {
    let values = in_order(link);
    values.windows(2).all(|pair| pair[0] < pair[1])
}

/// Cached heights agree with the actual shape
pub fn heights_consistent(link: &Link) -> bool {
    match link.as_deref() {
        None => true,
        Some(node) => {
            heights_consistent(&node.left)
                && heights_consistent(&node.right)
                && node.height == 1 + height(&node.left).max(height(&node.right))
        }
    }
}

/// Every balance factor lies in {-1, 0, 1}
pub fn is_height_balanced(link: &Link) -> bool {
    InOrder::new(link).all(|node| node.balance_factor().abs() <= 1)
}
