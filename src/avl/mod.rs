//! Height-balanced search tree with traced insertion
//!
//! One insertion runs through
//!
//! ```text
//! Descend -> Inserted -> CheckBalance(node)
//!     balanced:   CheckBalance(parent) ... -> Complete
//!     unbalanced: Rotate -> Complete
//! ```
//!
//! The balance walk starts at the freshly inserted node and climbs towards
//! the root. The first unbalanced node is the lowest one, and a single
//! (possibly double) rotation there restores the AVL invariant for the whole
//! tree, so checking stops after it.

mod rotation;

pub use rotation::{rotate_left, rotate_right, Imbalance, Rotation, RotationCase};

use crate::trace::{StepEvent, Terminal, Trace, TraceRecorder};
use crate::tree::walk::{self, TraversalEvent, TraversalOrder};
use crate::tree::{self, height, traversal, Link, TreeNode, TreeSnapshot};
use crate::Value;
use tracing::debug;

/// Payload of an AVL insertion step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum AvlEvent {
    /// Insertion starts (snapshot before descent)
    Begin {
        /// Value being inserted
        value: Value,
    },
    /// Plain search-tree insertion finished, heights refreshed
    Inserted {
        /// Value inserted
        value: Value,
    },
    /// Balance factor evaluated at one node of the ancestor chain
    CheckBalance {
        /// Node examined
        node: Value,
        /// `height(left) − height(right)`
        balance: i64,
        /// `|balance| > 1`
        needs_rotation: bool,
    },
    /// Repair classified, nothing rotated yet
    BeforeRotate {
        /// Unbalanced node
        node: Value,
        /// Its balance factor
        balance: i64,
        /// Repair case
        case: RotationCase,
    },
    /// First half of a double rotation applied
    Rotating {
        /// Pivot of this single rotation
        pivot: Value,
        /// Its direction
        rotation: Rotation,
        /// Value lifted into the pivot's place
        lifted: Value,
    },
    /// Repair finished
    AfterRotate {
        /// Repair case
        case: RotationCase,
        /// New root of the repaired subtree
        new_root: Value,
    },
    /// Insertion finished, tree balanced
    Complete {
        /// Value inserted
        value: Value,
    },
}

impl StepEvent for AvlEvent {
    type Snapshot = TreeSnapshot;

    fn tag(&self) -> &'static str {
        match self {
            AvlEvent::Begin { .. } => "begin",
            AvlEvent::Inserted { .. } => "inserted",
            AvlEvent::CheckBalance { .. } => "check_balance",
            AvlEvent::BeforeRotate { .. } => "before_rotate",
            AvlEvent::Rotating { .. } => "rotating",
            AvlEvent::AfterRotate { .. } => "after_rotate",
            AvlEvent::Complete { .. } => "complete",
        }
    }

    fn terminal(&self) -> Option<Terminal> {
        matches!(self, AvlEvent::Complete { .. }).then_some(Terminal::Complete)
    }

    fn snapshot_cells(snapshot: &TreeSnapshot) -> usize {
        snapshot.len()
    }
}

/// Self-balancing binary search tree
#[derive(Debug, Clone, Default)]
pub struct AvlTree {
    root: Link,
    len: usize,
}

impl AvlTree {
    /// Empty tree
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Insert and rebalance without keeping the trace
    ///
    /// `false` when `value` was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        self.insert_traced(value).is_some()
    }

    /// Insert `value`, recording descent, balance checks and rotations
    ///
    /// Returns `None` for a duplicate: the tree is left untouched and no
    /// trace is produced.
    pub fn insert_traced(&mut self, value: Value) -> Option<Trace<AvlEvent>> {
        if self.contains(value) {
            debug!(value, "avl duplicate ignored");
            return None;
        }
        debug!(value, len = self.len, height = self.height(), "avl insert started");

        let mut recorder = TraceRecorder::new("avl_insert");
        recorder.record_with(
            AvlEvent::Begin { value },
            format!("insert {}", value),
            self.snapshot(),
        );

        let inserted = tree::insert_leaf(&mut self.root, value);
        debug_assert!(inserted, "{} was checked absent", value);
        self.len += 1;
        recorder.record_with(
            AvlEvent::Inserted { value },
            format!("{} placed as a leaf, checking balance upwards", value),
            self.snapshot(),
        );

        // Root first; the inserted node is last
        let chain = traversal::search_path(&self.root, value);
        for &ancestor in chain.iter().rev() {
            let Some(node) = traversal::find(&self.root, ancestor) else {
                break;
            };
            let balance = node.balance_factor();
            let imbalance = Imbalance::detect(node, value);
            recorder.record_with(
                AvlEvent::CheckBalance {
                    node: ancestor,
                    balance,
                    needs_rotation: balance.abs() > 1,
                },
                format!("balance factor of {} is {}", ancestor, balance),
                self.snapshot(),
            );

            if let Some(imbalance) = imbalance {
                self.repair(imbalance, &mut recorder);
                break;
            }
        }

        recorder.record_with(
            AvlEvent::Complete { value },
            format!(
                "insert of {} complete, tree height {}",
                value,
                self.height()
            ),
            self.snapshot(),
        );

        debug_assert!(traversal::is_search_tree(&self.root));
        debug_assert!(traversal::heights_consistent(&self.root));
        debug_assert!(traversal::is_height_balanced(&self.root));

        let trace = recorder.finish();
        debug!(value, steps = trace.len(), height = self.height(), "avl insert finished");
        Some(trace)
    }

    fn repair(&mut self, imbalance: Imbalance, recorder: &mut TraceRecorder<AvlEvent>) {
        let Imbalance {
            node,
            balance,
            case,
            ..
        } = imbalance;
        debug!(node, balance, case = %case, "avl rotation");
        recorder.record_with(
            AvlEvent::BeforeRotate {
                node,
                balance,
                case,
            },
            format!("{} is unbalanced: {} case, {}", node, case, case.remedy()),
            self.snapshot(),
        );

        let rotations = imbalance.rotations();
        let mut new_root = node;
        for (i, &(pivot, rotation)) in rotations.iter().enumerate() {
            let Some(lifted) = rotation::rotate_at(&mut self.root, pivot, rotation) else {
                debug_assert!(false, "pivot {} vanished during repair", pivot);
                return;
            };
            new_root = lifted;
            if i + 1 < rotations.len() {
                recorder.record_with(
                    AvlEvent::Rotating {
                        pivot,
                        rotation,
                        lifted,
                    },
                    format!("{} at {} lifts {}", rotation, pivot, lifted),
                    self.snapshot(),
                );
            }
        }

        recorder.record_with(
            AvlEvent::AfterRotate { case, new_root },
            format!("{} rotation done, new subtree root {}", case, new_root),
            self.snapshot(),
        );
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

    /// Walk the tree in `order`; see [`BinarySearchTree::traverse_traced`](crate::BinarySearchTree::traverse_traced)
    pub fn traverse_traced(&self, order: TraversalOrder) -> Trace<TraversalEvent> {
        walk::traverse_traced(&self.root, order)
    }

    /// Every node's balance factor lies in {-1, 0, 1}
    pub fn is_balanced(&self) -> bool {
        traversal::is_height_balanced(&self.root)
    }
}

impl FromIterator<Value> for AvlTree {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut tree = Self::new();
        for value in iter {
            tree.insert(value);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_checks_only_itself() {
        let mut tree = AvlTree::new();
        let trace = tree.insert_traced(7).expect("empty tree accepts 7");
        assert_eq!(
            trace.tags(),
            vec!["begin", "inserted", "check_balance", "complete"]
        );
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_duplicate_is_silent() {
        let mut tree: AvlTree = [5, 3].into_iter().collect();
        let before = tree.snapshot();
        assert!(tree.insert_traced(3).is_none());
        assert_eq!(tree.snapshot(), before);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_balance_walk_is_bottom_up() {
        let mut tree: AvlTree = [20, 10, 30].into_iter().collect();
        let trace = tree.insert_traced(5).expect("5 is new");

        let checked: Vec<Value> = trace
            .iter()
            .filter_map(|step| match step.event() {
                AvlEvent::CheckBalance { node, .. } => Some(*node),
                _ => None,
            })
            .collect();
        assert_eq!(checked, vec![5, 10, 20]);
        assert_eq!(trace.count("before_rotate"), 0);
    }

    #[test]
    fn test_double_rotation_records_intermediate_state() {
        let mut tree: AvlTree = [30, 10].into_iter().collect();
        let trace = tree.insert_traced(20).expect("20 is new");

        let rotating = trace.position("rotating").expect("LR has an intermediate step");
        let halfway = trace[rotating].snapshot().map(ToString::to_string);
        assert_eq!(halfway.as_deref(), Some("30(20(10, _), _)"));
        assert_eq!(tree.snapshot().to_string(), "20(10, 30)");
    }

    #[test]
    fn test_rotation_below_root_fixes_ancestor_heights() {
        let mut tree: AvlTree = [50, 30, 70, 20].into_iter().collect();
        let trace = tree.insert_traced(10).expect("10 is new");

        assert_eq!(
            trace.last().snapshot().map(ToString::to_string).as_deref(),
            Some("50(20(10, 30), 70)")
        );
        assert_eq!(tree.height(), 3);
        assert!(traversal::heights_consistent(&tree.root));
    }
}
