mod common;

use algotrace::{AvlTree, BinarySearchTree, Terminal, TraversalEvent, TraversalOrder, Value};
use common::{assert_well_formed, BALANCED_SEVEN};
use test_case::test_case;

fn sample() -> BinarySearchTree {
    BALANCED_SEVEN.into_iter().collect()
}

fn visit_order(events: impl Iterator<Item = TraversalEvent>) -> Vec<Value> {
    events
        .filter_map(|event| match event {
            TraversalEvent::Visit { node, .. } => Some(node),
            _ => None,
        })
        .collect()
}

#[test_case(TraversalOrder::PreOrder, &[50, 30, 20, 40, 70, 60, 80] ; "pre order")]
#[test_case(TraversalOrder::InOrder, &[20, 30, 40, 50, 60, 70, 80] ; "in order")]
#[test_case(TraversalOrder::PostOrder, &[20, 40, 30, 60, 80, 70, 50] ; "post order")]
#[test_case(TraversalOrder::LevelOrder, &[50, 30, 70, 20, 40, 60, 80] ; "level order")]
fn visit_order_on_balanced_tree(order: TraversalOrder, expected: &[Value]) {
    let trace = sample().traverse_traced(order);
    assert_well_formed(&trace);
    assert_eq!(trace.outcome(), Terminal::Complete);
    assert_eq!(trace.operation(), order.operation());
    assert_eq!(trace.first().event(), &TraversalEvent::Begin { order });
    assert_eq!(trace.count("visit"), 7);
    assert_eq!(
        visit_order(trace.iter().map(|step| step.event().clone())),
        expected
    );
    assert_eq!(
        trace.last().event(),
        &TraversalEvent::Complete {
            order,
            visited: expected.to_vec(),
        }
    );
}

#[test_case(TraversalOrder::PreOrder, 15 ; "pre order")]
#[test_case(TraversalOrder::InOrder, 15 ; "in order")]
#[test_case(TraversalOrder::PostOrder, 15 ; "post order")]
#[test_case(TraversalOrder::LevelOrder, 12 ; "level order")]
fn step_counts(order: TraversalOrder, steps: usize) {
    let trace = sample().traverse_traced(order);
    assert_eq!(trace.len(), steps);
    if order == TraversalOrder::LevelOrder {
        assert_eq!(trace.count("level"), 3);
        assert_eq!(trace.count("go_left") + trace.count("go_right"), 0);
    } else {
        assert_eq!(trace.count("go_left"), 3);
        assert_eq!(trace.count("go_right"), 3);
    }
}

#[test]
fn empty_tree_yields_begin_then_empty() {
    for order in TraversalOrder::ALL {
        let trace = BinarySearchTree::new().traverse_traced(order);
        assert_well_formed(&trace);
        assert_eq!(trace.tags(), vec!["begin", "empty"]);
        assert_eq!(trace.outcome(), Terminal::Empty);
        assert_eq!(trace.last().event(), &TraversalEvent::Empty { order });
    }
}

#[test]
fn visit_carries_visited_so_far_and_path() {
    let trace = sample().traverse_traced(TraversalOrder::PostOrder);
    let visits: Vec<(Vec<Value>, Vec<Value>)> = trace
        .iter()
        .filter_map(|step| match step.event() {
            TraversalEvent::Visit { visited, path, .. } => Some((visited.clone(), path.clone())),
            _ => None,
        })
        .collect();

    assert_eq!(visits[0], (vec![20], vec![50, 30, 20]));
    assert_eq!(visits[1], (vec![20, 40], vec![50, 30, 40]));
    assert_eq!(visits[2], (vec![20, 40, 30], vec![50, 30]));
    assert_eq!(visits[6].1, vec![50]);
    assert_eq!(visits[6].0.len(), 7);
}

#[test]
fn descents_name_parent_and_child() {
    let trace = sample().traverse_traced(TraversalOrder::InOrder);
    let descents: Vec<(&str, Value, Value)> = trace
        .iter()
        .filter_map(|step| match step.event() {
            TraversalEvent::GoLeft { from, to } => Some(("left", *from, *to)),
            TraversalEvent::GoRight { from, to } => Some(("right", *from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        descents,
        vec![
            ("left", 50, 30),
            ("left", 30, 20),
            ("right", 30, 40),
            ("right", 50, 70),
            ("left", 70, 60),
            ("right", 70, 80),
        ]
    );
}

#[test]
fn level_steps_report_width() {
    let trace = sample().traverse_traced(TraversalOrder::LevelOrder);
    let levels: Vec<(usize, usize)> = trace
        .iter()
        .filter_map(|step| match step.event() {
            TraversalEvent::Level { level, width } => Some((*level, *width)),
            _ => None,
        })
        .collect();
    assert_eq!(levels, vec![(0, 1), (1, 2), (2, 4)]);
    assert_eq!(trace.tags()[..4], ["begin", "level", "visit", "level"]);
}

#[test]
fn walk_leaves_tree_untouched_and_snapshots_whole_tree() {
    let tree = sample();
    let before = tree.snapshot();
    let trace = tree.traverse_traced(TraversalOrder::PreOrder);
    assert_eq!(tree.snapshot(), before);
    assert!(trace.iter().all(|step| step.snapshot() == Some(&before)));
}

#[test]
fn avl_tree_walks_its_rebalanced_shape() {
    let tree: AvlTree = (1..=7).collect();
    let pre = tree.traverse_traced(TraversalOrder::PreOrder);
    assert_well_formed(&pre);
    assert_eq!(
        visit_order(pre.into_steps().into_iter().map(|step| step.event().clone())),
        vec![4, 2, 1, 3, 6, 5, 7]
    );

    let level = tree.traverse_traced(TraversalOrder::LevelOrder);
    assert_eq!(
        visit_order(level.iter().map(|step| step.event().clone())),
        vec![4, 2, 6, 1, 3, 5, 7]
    );
    assert!(AvlTree::new()
        .traverse_traced(TraversalOrder::InOrder)
        .tags()
        .ends_with(&["empty"]));
}
