//! Frequency-ordered working set of partial Huffman trees
//!
//! Ordering key: (frequency, insertion sequence). Each pushed tree takes the
//! next sequence number, so equal frequencies leave the forest in the order
//! they entered it and the build is reproducible.

use super::HuffmanNode;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone)]
struct Entry {
    frequency: usize,
    sequence: usize,
    node: HuffmanNode,
}

impl Entry {
    fn key(&self) -> (usize, usize) {
        (self.frequency, self.sequence)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-ordered multiset of trees, local to one build
#[derive(Debug, Clone, Default)]
pub struct Forest {
    heap: BinaryHeap<Reverse<Entry>>,
    next_sequence: usize,
}

impl Forest {
    /// Empty forest
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tree behind every tree of equal frequency
    pub fn push(&mut self, node: HuffmanNode) {
        let entry = Entry {
            frequency: node.frequency(),
            sequence: self.next_sequence,
            node,
        };
        self.next_sequence += 1;
        self.heap.push(Reverse(entry));
    }

    /// Remove the lowest-frequency tree (earliest inserted on ties)
    pub fn pop_min(&mut self) -> Option<HuffmanNode> {
        self.heap.pop().map(|Reverse(entry)| entry.node)
    }

    /// Trees currently in the forest
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// No trees left
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Deep copy of every tree, in extraction order
    pub fn snapshot(&self) -> Vec<HuffmanNode> {
        let mut entries: Vec<&Entry> = self.heap.iter().map(|Reverse(entry)| entry).collect();
        entries.sort();
        entries.into_iter().map(|entry| entry.node.clone()).collect()
    }
}

/// Space-separated roots, e.g. `'c':1 'b':2 'a':3`
pub fn describe(trees: &[HuffmanNode]) -> String {
    if trees.is_empty() {
        return "(empty)".to_string();
    }
    trees
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
