use std::collections::HashSet;

use algotrace::{AvlTree, BinarySearchTree, DynamicArray, HuffmanCoder};

#[test]
fn huffman_traces_are_deterministic() {
    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        let mut coder = HuffmanCoder::new();
        let (trace, _) = coder
            .build_traced("she sells sea shells by the sea shore")
            .expect("non-empty text");
        fingerprints.insert(trace.fingerprint());
    }
    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}

#[test]
fn tree_traces_are_deterministic() {
    let values = [41, 20, 65, 11, 29, 50, 91, 32, 72, 99];

    let mut avl = HashSet::new();
    let mut bst = HashSet::new();
    for _ in 0..5 {
        let mut tree: AvlTree = values[..9].iter().copied().collect();
        let trace = tree.insert_traced(values[9]).expect("99 is new");
        avl.insert(trace.fingerprint());

        let tree: BinarySearchTree = values.iter().copied().collect();
        bst.insert(tree.delete_traced(41).fingerprint());
    }
    assert_eq!(avl.len(), 1);
    assert_eq!(bst.len(), 1);
}

#[test]
fn different_inputs_fingerprint_differently() {
    let mut left: DynamicArray = [1, 2, 3].into_iter().collect();
    let mut right: DynamicArray = [1, 2, 3].into_iter().collect();
    let a = left.insert_traced(0, 9).unwrap();
    let b = right.insert_traced(1, 9).unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());
}
