//! Step payloads for BST search and delete previews

use crate::trace::{StepEvent, Terminal};
use crate::tree::{TreeNode, TreeSnapshot};
use crate::Value;
use std::cmp::Ordering;
use std::fmt;

/// Outcome of comparing the target against a visited node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Comparison {
    /// Target is smaller: continue left
    Less,
    /// Target is larger: continue right
    Greater,
    /// Target found
    Equal,
}

impl Comparison {
    /// Compare `target` against `node`
    pub fn of(target: Value, node: Value) -> Self {
        match target.cmp(&node) {
            Ordering::Less => Comparison::Less,
            Ordering::Greater => Comparison::Greater,
            Ordering::Equal => Comparison::Equal,
        }
    }

    pub(crate) fn narrate(self, target: Value, node: Value) -> String {
        match self {
            Comparison::Less => format!("{} < {}, go left", target, node),
            Comparison::Greater => format!("{} > {}, go right", target, node),
            Comparison::Equal => format!("{} = {}, found", target, node),
        }
    }
}

/// Number of children of the node being deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum NodeShape {
    /// No children
    Leaf,
    /// Exactly one child
    OneChild {
        /// The child that takes the node's place
        child: Value,
    },
    /// Both children present
    TwoChildren,
}

impl NodeShape {
    /// Classify `node`
    pub fn of(node: &TreeNode) -> Self {
        match node.only_child() {
            Some(child) => NodeShape::OneChild { child: child.value },
            None if node.is_leaf() => NodeShape::Leaf,
            None => NodeShape::TwoChildren,
        }
    }
}

/// How the located node will be removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum RemovalStrategy {
    /// Leaf: clear the parent's link
    Unlink,
    /// One child: the child replaces the node
    Splice {
        /// Child moved up
        child: Value,
    },
    /// Two children: copy the successor's value, then delete the successor
    PromoteSuccessor {
        /// Leftmost value of the right subtree
        successor: Value,
    },
}

impl fmt::Display for RemovalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalStrategy::Unlink => f.write_str("remove the node directly"),
            RemovalStrategy::Splice { child } => {
                write!(f, "replace the node with its child {}", child)
            }
            RemovalStrategy::PromoteSuccessor { successor } => write!(
                f,
                "copy successor {} into the node, then delete the successor",
                successor
            ),
        }
    }
}

/// Concrete mutation a commit will perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum PlannedMutation {
    /// Parent's slot for `node` becomes empty
    ClearParentLink {
        /// Node being removed
        node: Value,
    },
    /// Parent's slot for `node` now holds `child`
    RelinkParent {
        /// Node being removed
        node: Value,
        /// Child moved up
        child: Value,
    },
    /// `node` takes the successor's value
    CopySuccessorValue {
        /// Node keeping its place
        node: Value,
        /// Value copied in
        successor: Value,
    },
    /// Original successor node is unlinked from the right subtree
    RemoveSuccessor {
        /// Successor value
        successor: Value,
    },
}

/// Payload of a search step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum SearchEvent {
    /// Search starts
    Begin {
        /// Searched value
        target: Value,
    },
    /// Target compared against one node
    Compare {
        /// Visited node
        node: Value,
        /// Comparison result
        ordering: Comparison,
    },
    /// Search finished at the matching node
    Complete {
        /// Matching node
        node: Value,
    },
    /// Fell off the tree
    NotFound {
        /// Searched value
        target: Value,
    },
    /// Tree has no nodes
    Empty {
        /// Searched value
        target: Value,
    },
}

impl StepEvent for SearchEvent {
    type Snapshot = TreeSnapshot;

    fn tag(&self) -> &'static str {
        match self {
            SearchEvent::Begin { .. } => "begin",
            SearchEvent::Compare { .. } => "compare",
            SearchEvent::Complete { .. } => "complete",
            SearchEvent::NotFound { .. } => "not_found",
            SearchEvent::Empty { .. } => "empty",
        }
    }

    fn terminal(&self) -> Option<Terminal> {
        match self {
            SearchEvent::Complete { .. } => Some(Terminal::Complete),
            SearchEvent::NotFound { .. } => Some(Terminal::NotFound),
            SearchEvent::Empty { .. } => Some(Terminal::Empty),
            _ => None,
        }
    }

    fn snapshot_cells(snapshot: &TreeSnapshot) -> usize {
        snapshot.len()
    }
}

/// Payload of a delete-preview step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum DeleteEvent {
    /// Preview starts
    Begin {
        /// Value to delete
        target: Value,
    },
    /// Target compared against one node
    Compare {
        /// Visited node
        node: Value,
        /// Comparison result
        ordering: Comparison,
    },
    /// Node to delete located
    Located {
        /// Located node
        node: Value,
    },
    /// Children counted
    Classified {
        /// Located node
        node: Value,
        /// Its shape
        shape: NodeShape,
    },
    /// One move down the left spine of the right subtree
    SuccessorDescend {
        /// Node passed through
        node: Value,
    },
    /// Leftmost node of the right subtree reached
    SuccessorFound {
        /// In-order successor
        successor: Value,
    },
    /// Removal strategy chosen
    Strategy {
        /// Located node
        node: Value,
        /// Chosen strategy
        strategy: RemovalStrategy,
    },
    /// One mutation the commit will perform
    Plan {
        /// Planned mutation
        mutation: PlannedMutation,
    },
    /// Preview finished
    Complete {
        /// Node that a commit will remove
        node: Value,
        /// Chosen strategy
        strategy: RemovalStrategy,
    },
    /// Value absent
    NotFound {
        /// Value to delete
        target: Value,
    },
    /// Tree has no nodes
    Empty {
        /// Value to delete
        target: Value,
    },
}

impl StepEvent for DeleteEvent {
    type Snapshot = TreeSnapshot;

    fn tag(&self) -> &'static str {
        match self {
            DeleteEvent::Begin { .. } => "begin",
            DeleteEvent::Compare { .. } => "compare",
            DeleteEvent::Located { .. } => "found",
            DeleteEvent::Classified { .. } => "classify",
            DeleteEvent::SuccessorDescend { .. } => "successor_descend",
            DeleteEvent::SuccessorFound { .. } => "successor_found",
            DeleteEvent::Strategy { .. } => "strategy",
            DeleteEvent::Plan { .. } => "plan",
            DeleteEvent::Complete { .. } => "complete",
            DeleteEvent::NotFound { .. } => "not_found",
            DeleteEvent::Empty { .. } => "empty",
        }
    }

    fn terminal(&self) -> Option<Terminal> {
        match self {
            DeleteEvent::Complete { .. } => Some(Terminal::Complete),
            DeleteEvent::NotFound { .. } => Some(Terminal::NotFound),
            DeleteEvent::Empty { .. } => Some(Terminal::Empty),
            _ => None,
        }
    }

    fn snapshot_cells(snapshot: &TreeSnapshot) -> usize {
        snapshot.len()
    }
}
