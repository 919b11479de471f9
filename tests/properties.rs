use algotrace::huffman::count_symbols;
use algotrace::tree::traversal;
use algotrace::{
    AvlTree, BinarySearchTree, DynamicArray, HuffmanCoder, StepEvent, Terminal, Trace,
    TraversalEvent, TraversalOrder,
};
use proptest::prelude::*;

fn ends_in_single_terminal<E: StepEvent>(trace: &Trace<E>) -> bool {
    !trace.is_empty()
        && trace.last().is_terminal()
        && trace.iter().filter(|step| step.is_terminal()).count() == 1
}

proptest! {
    #[test]
    fn bst_in_order_is_sorted_and_deduplicated(
        values in proptest::collection::vec(-500i64..500, 0..64),
    ) {
        let tree: BinarySearchTree = values.iter().copied().collect();
        let mut expected = values.clone();
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(tree.in_order(), expected);
    }

    #[test]
    fn avl_is_balanced_after_every_insert(
        values in proptest::collection::vec(-1000i64..1000, 1..96),
    ) {
        let mut tree = AvlTree::new();
        for value in values {
            if let Some(trace) = tree.insert_traced(value) {
                prop_assert!(ends_in_single_terminal(&trace));
            }
            prop_assert!(tree.is_balanced());
            let link = tree.root().cloned().map(Box::new);
            prop_assert!(traversal::is_search_tree(&link));
            prop_assert!(traversal::heights_consistent(&link));
        }
    }

    #[test]
    fn bst_delete_preview_never_mutates(
        values in proptest::collection::vec(0i64..100, 0..40),
        target in 0i64..100,
    ) {
        let mut tree: BinarySearchTree = values.iter().copied().collect();
        let before = tree.snapshot();
        let trace = tree.delete_traced(target);
        prop_assert!(ends_in_single_terminal(&trace));
        prop_assert_eq!(tree.snapshot(), before);

        let present = tree.contains(target);
        prop_assert_eq!(tree.commit_delete(target), present);
        prop_assert!(!tree.contains(target));
    }

    #[test]
    fn array_shift_count_matches_position(
        values in proptest::collection::vec(any::<i64>(), 0..32),
        seed in any::<usize>(),
        value in any::<i64>(),
    ) {
        let mut array: DynamicArray = values.iter().copied().collect();
        let index = seed % (values.len() + 1);
        let trace = array.insert_traced(index, value).unwrap();

        prop_assert!(ends_in_single_terminal(&trace));
        prop_assert_eq!(trace.count("move"), values.len() - index);

        let mut expected = values.clone();
        expected.insert(index, value);
        prop_assert_eq!(array.to_vec(), expected);
    }

    #[test]
    fn bst_search_ends_with_matching_outcome(
        values in proptest::collection::vec(-200i64..200, 0..48),
        target in -200i64..200,
    ) {
        let tree: BinarySearchTree = values.iter().copied().collect();
        let trace = tree.search_traced(target);
        prop_assert!(ends_in_single_terminal(&trace));

        let expected = if values.is_empty() {
            Terminal::Empty
        } else if values.contains(&target) {
            Terminal::Complete
        } else {
            Terminal::NotFound
        };
        prop_assert_eq!(trace.outcome(), expected);
        prop_assert!(trace.count("compare") <= tree.height());
    }

    #[test]
    fn array_delete_shift_count_matches_position(
        values in proptest::collection::vec(any::<i64>(), 1..32),
        seed in any::<usize>(),
    ) {
        let mut array: DynamicArray = values.iter().copied().collect();
        let index = seed % values.len();
        let trace = array.delete_traced(index).unwrap();

        prop_assert!(ends_in_single_terminal(&trace));
        prop_assert_eq!(trace.count("move"), values.len() - index - 1);

        let mut expected = values.clone();
        expected.remove(index);
        prop_assert_eq!(array.to_vec(), expected);
    }

    #[test]
    fn traced_walks_match_plain_walks(
        values in proptest::collection::vec(-300i64..300, 0..48),
    ) {
        let tree: BinarySearchTree = values.iter().copied().collect();
        let link = tree.root().cloned().map(Box::new);
        for order in TraversalOrder::ALL {
            let trace = tree.traverse_traced(order);
            prop_assert!(ends_in_single_terminal(&trace));

            let expected = match order {
                TraversalOrder::PreOrder => traversal::pre_order(&link),
                TraversalOrder::InOrder => traversal::in_order(&link),
                TraversalOrder::PostOrder => traversal::post_order(&link),
                TraversalOrder::LevelOrder => traversal::level_order(&link),
            };
            let visited: Vec<i64> = trace
                .iter()
                .filter_map(|step| match step.event() {
                    TraversalEvent::Visit { node, .. } => Some(*node),
                    _ => None,
                })
                .collect();
            prop_assert_eq!(visited, expected);
        }
    }

    #[test]
    fn huffman_round_trip_and_prefix_free(text in "[a-f ]{1,80}") {
        let mut coder = HuffmanCoder::new();
        let (trace, codes) = coder.build_traced(&text).unwrap();

        prop_assert!(ends_in_single_terminal(&trace));
        prop_assert!(codes.is_prefix_free());
        prop_assert_eq!(codes.len(), count_symbols(&text).len());

        let bits = coder.encode(&text).unwrap();
        prop_assert_eq!(coder.decode(&bits).unwrap(), text);
    }
}
