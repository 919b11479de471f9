//! Binary search tree engine
//!
//! Deletion is two-phase:
//! 1. [`BinarySearchTree::delete_traced`] narrates what a removal will do.
//!    It takes `&self`, so the preview cannot mutate the tree.
//! 2. [`BinarySearchTree::commit_delete`] performs the removal without a trace.
//!
//! Search and insert follow the usual comparison descent. Duplicates are
//! ignored.

mod events;

pub use events::{
    Comparison, DeleteEvent, NodeShape, PlannedMutation, RemovalStrategy, SearchEvent,
};

use crate::trace::{Trace, TraceRecorder};
use crate::tree::walk::{self, TraversalEvent, TraversalOrder};
use crate::tree::{self, height, traversal, Link, TreeNode, TreeSnapshot};
use crate::Value;
use std::cmp::Ordering;
use tracing::debug;

/// Ordered binary tree without rebalancing
#[derive(Debug, Clone, Default)]
pub struct BinarySearchTree {
    root: Link,
    len: usize,
}

impl BinarySearchTree {
    /// Empty tree
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Insert `value`; `false` when it was already present
    pub fn insert(&mut self, value: Value) -> bool {
        let inserted = tree::insert_leaf(&mut self.root, value);
        if inserted {
            self.len += 1;
        } else {
            debug!(value, "bst duplicate ignored");
        }
        inserted
    }

    /// Whether `value` is stored
    pub fn contains(&self, value: Value) -> bool {
        traversal::find(&self.root, value).is_some()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.len
    }

    /// No nodes
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height (0 when empty)
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Root node
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    /// Values in ascending order
    pub fn in_order(&self) -> Vec<Value> {
        traversal::in_order(&self.root)
    }

    /// Deep copy of the current tree
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::capture(&self.root)
    }

    /// Walk the tree in `order`, one step per descent and per visit
    ///
    /// Ends with `complete`, or `empty` for an empty tree.
    pub fn traverse_traced(&self, order: TraversalOrder) -> Trace<TraversalEvent> {
        walk::traverse_traced(&self.root, order)
    }

    /// Search for `target`, one step per comparison
    ///
    /// Ends with `complete` (found), `not_found`, or `empty` for an empty tree.
    pub fn search_traced(&self, target: Value) -> Trace<SearchEvent> {
        debug!(target, len = self.len, "bst search started");
        let snapshot = self.snapshot();
        let mut recorder = TraceRecorder::new("bst_search");
        recorder.record_with(
            SearchEvent::Begin { target },
            format!("search for {}", target),
            snapshot.clone(),
        );

        if self.root.is_none() {
            recorder.record_with(
                SearchEvent::Empty { target },
                "tree is empty, nothing to search",
                snapshot,
            );
            return recorder.finish();
        }

        let mut node = self.root.as_deref();
        while let Some(current) = node {
            let ordering = Comparison::of(target, current.value);
            recorder.record_with(
                SearchEvent::Compare {
                    node: current.value,
                    ordering,
                },
                ordering.narrate(target, current.value),
                snapshot.clone(),
            );
            node = match ordering {
                Comparison::Less => current.left.as_deref(),
                Comparison::Greater => current.right.as_deref(),
                Comparison::Equal => {
                    recorder.record_with(
                        SearchEvent::Complete {
                            node: current.value,
                        },
                        format!("found node {}", current.value),
                        snapshot,
                    );
                    return finish_search(recorder, target);
                }
            };
        }

        recorder.record_with(
            SearchEvent::NotFound { target },
            format!("no node with value {}", target),
            snapshot,
        );
        finish_search(recorder, target)
    }

    /// Preview the deletion of `target` without touching the tree
    ///
    /// Narrates the search, the node's shape, the successor search for a
    /// two-children node, the chosen strategy and the concrete mutations
    /// [`commit_delete`](Self::commit_delete) will perform.
    pub fn delete_traced(&self, target: Value) -> Trace<DeleteEvent> {
        debug!(target, len = self.len, "bst delete preview started");
        let snapshot = self.snapshot();
        let mut recorder = TraceRecorder::new("bst_delete");
        recorder.record_with(
            DeleteEvent::Begin { target },
            format!("delete {}", target),
            snapshot.clone(),
        );

        if self.root.is_none() {
            recorder.record_with(
                DeleteEvent::Empty { target },
                "tree is empty, nothing to delete",
                snapshot,
            );
            return recorder.finish();
        }

        let mut node = self.root.as_deref();
        let mut located = None;
        while let Some(current) = node {
            let ordering = Comparison::of(target, current.value);
            recorder.record_with(
                DeleteEvent::Compare {
                    node: current.value,
                    ordering,
                },
                ordering.narrate(target, current.value),
                snapshot.clone(),
            );
            node = match ordering {
                Comparison::Less => current.left.as_deref(),
                Comparison::Greater => current.right.as_deref(),
                Comparison::Equal => {
                    located = Some(current);
                    break;
                }
            };
        }

        let Some(doomed) = located else {
            recorder.record_with(
                DeleteEvent::NotFound { target },
                format!("no node with value {}", target),
                snapshot,
            );
            return recorder.finish();
        };

        recorder.record_with(
            DeleteEvent::Located { node: doomed.value },
            format!("found node {} to delete", doomed.value),
            snapshot.clone(),
        );

        let shape = NodeShape::of(doomed);
        let shape_text = match shape {
            NodeShape::Leaf => format!("{} is a leaf", doomed.value),
            NodeShape::OneChild { child } => {
                format!("{} has a single child {}", doomed.value, child)
            }
            NodeShape::TwoChildren => format!("{} has two children", doomed.value),
        };
        recorder.record_with(
            DeleteEvent::Classified {
                node: doomed.value,
                shape,
            },
            shape_text,
            snapshot.clone(),
        );

        let strategy = match (shape, doomed.right.as_deref()) {
            (NodeShape::Leaf, _) => RemovalStrategy::Unlink,
            (NodeShape::OneChild { child }, _) => RemovalStrategy::Splice { child },
            (NodeShape::TwoChildren, Some(right)) => {
                let successor = trace_successor(right, &mut recorder, &snapshot);
                RemovalStrategy::PromoteSuccessor { successor }
            }
            (NodeShape::TwoChildren, None) => {
                unreachable!("two-children node {} without a right child", doomed.value)
            }
        };

        recorder.record_with(
            DeleteEvent::Strategy {
                node: doomed.value,
                strategy,
            },
            format!("strategy: {}", strategy),
            snapshot.clone(),
        );

        for mutation in plan(doomed.value, strategy) {
            let text = match mutation {
                PlannedMutation::ClearParentLink { node } => {
                    format!("clear the parent's link to {}", node)
                }
                PlannedMutation::RelinkParent { node, child } => {
                    format!("point the parent of {} at {}", node, child)
                }
                PlannedMutation::CopySuccessorValue { node, successor } => {
                    format!("overwrite {} with {}", node, successor)
                }
                PlannedMutation::RemoveSuccessor { successor } => {
                    format!("delete the original successor node {}", successor)
                }
            };
            recorder.record_with(DeleteEvent::Plan { mutation }, text, snapshot.clone());
        }

        recorder.record_with(
            DeleteEvent::Complete {
                node: doomed.value,
                strategy,
            },
            "delete preview complete",
            snapshot,
        );

        let trace = recorder.finish();
        debug!(target, steps = trace.len(), "bst delete preview finished");
        trace
    }

    /// Remove `target`; `false` when it was not present
    ///
    /// A two-children node takes its successor's value and the successor is
    /// removed from the right subtree.
    pub fn commit_delete(&mut self, target: Value) -> bool {
        let removed = remove(&mut self.root, target);
        if removed {
            self.len -= 1;
        }
        debug!(target, removed, len = self.len, "bst delete committed");
        debug_assert!(traversal::is_search_tree(&self.root));
        removed
    }
}

impl FromIterator<Value> for BinarySearchTree {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut tree = Self::new();
        for value in iter {
            tree.insert(value);
        }
        tree
    }
}

fn finish_search(recorder: TraceRecorder<SearchEvent>, target: Value) -> Trace<SearchEvent> {
    let trace = recorder.finish();
    debug!(target, steps = trace.len(), outcome = %trace.outcome(), "bst search finished");
    trace
}

/// Walk the left spine of `right`, one step per move, and return the successor
fn trace_successor(
    right: &TreeNode,
    recorder: &mut TraceRecorder<DeleteEvent>,
    snapshot: &TreeSnapshot,
) -> Value {
    let mut node = right;
    recorder.record_with(
        DeleteEvent::SuccessorDescend { node: node.value },
        format!("look for the successor in the right subtree, starting at {}", node.value),
        snapshot.clone(),
    );
    while let Some(left) = node.left.as_deref() {
        recorder.record_with(
            DeleteEvent::SuccessorDescend { node: left.value },
            format!("{} has a left child, move to {}", node.value, left.value),
            snapshot.clone(),
        );
        node = left;
    }
    recorder.record_with(
        DeleteEvent::SuccessorFound {
            successor: node.value,
        },
        format!("successor is {}", node.value),
        snapshot.clone(),
    );
    node.value
}

fn plan(node: Value, strategy: RemovalStrategy) -> Vec<PlannedMutation> {
    match strategy {
        RemovalStrategy::Unlink => vec![PlannedMutation::ClearParentLink { node }],
        RemovalStrategy::Splice { child } => vec![PlannedMutation::RelinkParent { node, child }],
        RemovalStrategy::PromoteSuccessor { successor } => vec![
            PlannedMutation::CopySuccessorValue { node, successor },
            PlannedMutation::RemoveSuccessor { successor },
        ],
    }
}

fn remove(link: &mut Link, target: Value) -> bool {
    let Some(node) = link.as_deref_mut() else {
        return false;
    };
    match target.cmp(&node.value) {
        Ordering::Less => {
            let removed = remove(&mut node.left, target);
            node.update_height();
            removed
        }
        Ordering::Greater => {
            let removed = remove(&mut node.right, target);
            node.update_height();
            removed
        }
        Ordering::Equal => {
            match node.right.as_deref().map(|right| right.leftmost().value) {
                Some(successor) if node.left.is_some() => {
                    node.value = successor;
                    remove(&mut node.right, successor);
                    node.update_height();
                }
                _ => {
                    let child = node.left.take().or_else(|| node.right.take());
                    *link = child;
                }
            }
            true
        }
    }
}
