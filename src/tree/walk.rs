//! Traced depth-first and breadth-first walks
//!
//! Depth-first orders run on an explicit task stack; each node expands into
//! its visit and its child descents in the order's sequence:
//!
//! ```text
//! pre:   visit, go_left, <left>, go_right, <right>
//! in:    go_left, <left>, visit, go_right, <right>
//! post:  go_left, <left>, go_right, <right>, visit
//! ```
//!
//! Level order announces each level before visiting its nodes left to right.
//! Walks never mutate the tree; every step carries the same snapshot.

use super::{Link, TreeNode, TreeSnapshot};
use crate::trace::{StepEvent, Terminal, Trace, TraceRecorder};
use crate::Value;
use std::collections::VecDeque;
use std::fmt;
use tracing::debug;

/// Visiting order of a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum TraversalOrder {
    /// Node, left, right
    PreOrder,
    /// Left, node, right
    InOrder,
    /// Left, right, node
    PostOrder,
    /// Breadth first, left to right
    LevelOrder,
}

impl TraversalOrder {
    /// Every order
    pub const ALL: [TraversalOrder; 4] = [
        TraversalOrder::PreOrder,
        TraversalOrder::InOrder,
        TraversalOrder::PostOrder,
        TraversalOrder::LevelOrder,
    ];

    /// Operation name recorded in the trace
    pub fn operation(self) -> &'static str {
        match self {
            TraversalOrder::PreOrder => "pre_order_traversal",
            TraversalOrder::InOrder => "in_order_traversal",
            TraversalOrder::PostOrder => "post_order_traversal",
            TraversalOrder::LevelOrder => "level_order_traversal",
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TraversalOrder::PreOrder => "pre-order",
            TraversalOrder::InOrder => "in-order",
            TraversalOrder::PostOrder => "post-order",
            TraversalOrder::LevelOrder => "level-order",
        };
        f.write_str(label)
    }
}

/// Payload of a traversal step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum TraversalEvent {
    /// Walk starts
    Begin {
        /// Visiting order
        order: TraversalOrder,
    },
    /// Descent into a left subtree
    GoLeft {
        /// Parent
        from: Value,
        /// Left child
        to: Value,
    },
    /// Descent into a right subtree
    GoRight {
        /// Parent
        from: Value,
        /// Right child
        to: Value,
    },
    /// Level order only: a new level starts
    Level {
        /// Depth, root is 0
        level: usize,
        /// Nodes on this level
        width: usize,
    },
    /// A node is visited
    Visit {
        /// Visited value
        node: Value,
        /// Values visited so far, this one included
        visited: Vec<Value>,
        /// Values from the root down to this node
        path: Vec<Value>,
    },
    /// Every node visited
    Complete {
        /// Visiting order
        order: TraversalOrder,
        /// Full visiting sequence
        visited: Vec<Value>,
    },
    /// Tree had no nodes
    Empty {
        /// Visiting order
        order: TraversalOrder,
    },
}

impl StepEvent for TraversalEvent {
    type Snapshot = TreeSnapshot;

    fn tag(&self) -> &'static str {
        match self {
            TraversalEvent::Begin { .. } => "begin",
            TraversalEvent::GoLeft { .. } => "go_left",
            TraversalEvent::GoRight { .. } => "go_right",
            TraversalEvent::Level { .. } => "level",
            TraversalEvent::Visit { .. } => "visit",
            TraversalEvent::Complete { .. } => "complete",
            TraversalEvent::Empty { .. } => "empty",
        }
    }

    fn terminal(&self) -> Option<Terminal> {
        match self {
            TraversalEvent::Complete { .. } => Some(Terminal::Complete),
            TraversalEvent::Empty { .. } => Some(Terminal::Empty),
            _ => None,
        }
    }

    fn snapshot_cells(snapshot: &TreeSnapshot) -> usize {
        snapshot.len()
    }
}

#[derive(Debug, Clone, Copy)]
enum Task<'a> {
    Expand(&'a TreeNode, usize),
    Visit(&'a TreeNode, usize),
    GoLeft(&'a TreeNode, &'a TreeNode, usize),
    GoRight(&'a TreeNode, &'a TreeNode, usize),
}

/// Walk the tree under `root` in `order`
///
/// An empty tree yields `begin`, `empty`.
pub fn traverse_traced(root: &Link, order: TraversalOrder) -> Trace<TraversalEvent> {
    let mut walk = Walk {
        recorder: TraceRecorder::new(order.operation()),
        snapshot: TreeSnapshot::capture(root),
        visited: Vec::new(),
    };
    debug!(order = %order, nodes = walk.snapshot.len(), "traversal started");
    walk.record(
        TraversalEvent::Begin { order },
        format!("start {} traversal", order),
    );

    match root.as_deref() {
        None => walk.record(
            TraversalEvent::Empty { order },
            "tree is empty, nothing to traverse".to_string(),
        ),
        Some(node) => {
            match order {
                TraversalOrder::LevelOrder => walk.breadth_first(node),
                _ => walk.depth_first(node, order),
            }
            let visited = walk.visited.clone();
            let listing = visited
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            walk.record(
                TraversalEvent::Complete { order, visited },
                format!("{} traversal complete: {}", order, listing),
            );
        }
    }

    let trace = walk.recorder.finish();
    debug!(order = %order, steps = trace.len(), "traversal finished");
    trace
}

struct Walk {
    recorder: TraceRecorder<TraversalEvent>,
    snapshot: TreeSnapshot,
    visited: Vec<Value>,
}

impl Walk {
    fn record(&mut self, event: TraversalEvent, description: String) {
        self.recorder
            .record_with(event, description, self.snapshot.clone());
    }

    fn visit(&mut self, node: &TreeNode, path: Vec<Value>, description: String) {
        self.visited.push(node.value);
        let visited = self.visited.clone();
        self.record(
            TraversalEvent::Visit {
                node: node.value,
                visited,
                path,
            },
            description,
        );
    }

    fn depth_first(&mut self, root: &TreeNode, order: TraversalOrder) {
        // path[..=d] holds root..node for the node expanded at depth d
        let mut path: Vec<Value> = Vec::new();
        let mut stack = vec![Task::Expand(root, 0)];

        while let Some(task) = stack.pop() {
            match task {
                Task::Expand(node, depth) => {
                    path.truncate(depth);
                    path.push(node.value);

                    let left = node.left.as_deref().map(|child| {
                        [Task::GoLeft(node, child, depth), Task::Expand(child, depth + 1)]
                    });
                    let right = node.right.as_deref().map(|child| {
                        [Task::GoRight(node, child, depth), Task::Expand(child, depth + 1)]
                    });
                    let visit = Task::Visit(node, depth);
                    let left = left.into_iter().flatten();
                    let right = right.into_iter().flatten();

                    let plan: Vec<Task<'_>> = match order {
                        TraversalOrder::PreOrder => {
                            std::iter::once(visit).chain(left).chain(right).collect()
                        }
                        TraversalOrder::InOrder => {
                            left.chain(std::iter::once(visit)).chain(right).collect()
                        }
                        _ => left.chain(right).chain(std::iter::once(visit)).collect(),
                    };
                    stack.extend(plan.into_iter().rev());
                }
                Task::Visit(node, depth) => {
                    path.truncate(depth + 1);
                    self.visit(node, path.clone(), format!("visit {}", node.value));
                }
                Task::GoLeft(from, to, depth) => {
                    path.truncate(depth + 1);
                    self.record(
                        TraversalEvent::GoLeft {
                            from: from.value,
                            to: to.value,
                        },
                        format!("go left from {} to {}", from.value, to.value),
                    );
                }
                Task::GoRight(from, to, depth) => {
                    path.truncate(depth + 1);
                    self.record(
                        TraversalEvent::GoRight {
                            from: from.value,
                            to: to.value,
                        },
                        format!("go right from {} to {}", from.value, to.value),
                    );
                }
            }
        }
    }

    fn breadth_first(&mut self, root: &TreeNode) {
        let mut queue: VecDeque<(&TreeNode, Vec<Value>)> = VecDeque::new();
        queue.push_back((root, vec![root.value]));
        let mut level = 0;

        while !queue.is_empty() {
            let width = queue.len();
            self.record(
                TraversalEvent::Level { level, width },
                format!("level {}: {} node(s)", level, width),
            );
            for _ in 0..width {
                let Some((node, path)) = queue.pop_front() else {
                    break;
                };
                for child in [node.left.as_deref(), node.right.as_deref()]
                    .into_iter()
                    .flatten()
                {
                    let mut child_path = path.clone();
                    child_path.push(child.value);
                    queue.push_back((child, child_path));
                }
                self.visit(node, path, format!("visit {} (level {})", node.value, level));
            }
            level += 1;
        }
    }
}
