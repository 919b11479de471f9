//! # Replayable traces for classic data-structure algorithms
//!
//! This library performs structural operations on a small family of data
//! structures and, instead of only returning the final result, records every
//! intermediate micro-state as a [`Step`] inside a [`Trace`].
//!
//! ## Engines
//!
//! 1. **Dynamic array**: capacity-doubling insert/delete with one step per shifted element
//! 2. **Binary search tree**: traced search, read-only delete preview, explicit commit
//! 3. **AVL tree**: traced insertion with balance checks and LL/LR/RR/RL rotations
//! 4. **Huffman**: forest-based tree construction plus the derived code table
//!
//! Every step that shows structure carries a deep copy of it, so a presentation
//! layer can render step *i* on its own and seek freely without re-running the
//! algorithm. Memory therefore grows with steps × snapshot size; see
//! [`Trace::retained_snapshot_cells`].
//!
//! ## Usage Example
//!
//! ```
//! use algotrace::avl::AvlTree;
//! use algotrace::trace::Terminal;
//!
//! let mut tree = AvlTree::new();
//! tree.insert(30);
//! tree.insert(20);
//! let trace = tree.insert_traced(10).expect("10 is not a duplicate");
//!
//! assert_eq!(trace.outcome(), Terminal::Complete);
//! assert_eq!(tree.root().map(|node| node.value), Some(20));
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod array;   // Growable array with shift tracing
pub mod tree;    // Owned binary nodes, snapshots and traversals
pub mod bst;     // Binary search tree engine
pub mod avl;     // Self-balancing tree engine
pub mod huffman; // Prefix-code tree builder
pub mod trace;   // Step log shared by every engine

// Re-exports for convenience
pub use array::DynamicArray;
pub use avl::AvlTree;
pub use bst::BinarySearchTree;
pub use huffman::{CodeTable, HuffmanCoder, HuffmanNode};
pub use trace::{PlaybackSchedule, Step, StepEvent, Terminal, Trace, TraceCursor};
pub use tree::{TraversalEvent, TraversalOrder, TreeNode, TreeSnapshot};

use std::time::Duration;
use thiserror::Error;

/// Element stored by the array and tree engines
pub type Value = i64;

/// Default number of slots a fresh [`DynamicArray`] reserves
pub const DEFAULT_ARRAY_CAPACITY: usize = 10;

/// Errors raised when a call is rejected before any work starts
///
/// Outcomes such as "value not found" are not errors: they are reported by the
/// terminal step of a successful trace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Index outside the valid range for the operation
    #[error("index {index} out of range for length {len}")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Length of the structure at the time of the call
        len: usize,
    },

    /// Input rejected by a precondition (e.g. empty Huffman text)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Operation needs content that the structure does not have yet
    #[error("{0} is empty")]
    Empty(&'static str),

    /// Bit stream ended in the middle of a Huffman codeword
    #[error("invalid huffman code at bit position {position}")]
    InvalidCode {
        /// Offset of the first bit of the unfinished codeword
        position: usize,
    },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, EngineError>;

/// Playback domain; each one replays at its own fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Dynamic array insert/delete
    Array,
    /// BST search
    BstSearch,
    /// BST delete preview
    BstDelete,
    /// Pre/in/post/level-order walks
    Traversal,
    /// AVL insertion
    Avl,
    /// Huffman construction
    Huffman,
}

/// Engine-wide configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Slots reserved by a new dynamic array
    pub initial_capacity: usize,

    /// Auto-play interval for array traces
    pub array_interval: Duration,

    /// Auto-play interval for BST search traces
    pub search_interval: Duration,

    /// Auto-play interval for BST delete previews
    pub delete_interval: Duration,

    /// Auto-play interval for traversal traces
    pub traversal_interval: Duration,

    /// Auto-play interval for AVL insertion traces
    pub avl_interval: Duration,

    /// Auto-play interval for Huffman construction traces
    pub huffman_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_ARRAY_CAPACITY,
            array_interval: Duration::from_millis(1000),
            search_interval: Duration::from_millis(1500),
            delete_interval: Duration::from_millis(2000),
            traversal_interval: Duration::from_millis(1500),
            avl_interval: Duration::from_millis(1500),
            huffman_interval: Duration::from_millis(2000),
        }
    }
}

impl EngineConfig {
    /// Override the initial array capacity
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Use one interval for every domain
    pub fn with_uniform_interval(mut self, interval: Duration) -> Self {
        self.array_interval = interval;
        self.search_interval = interval;
        self.delete_interval = interval;
        self.traversal_interval = interval;
        self.avl_interval = interval;
        self.huffman_interval = interval;
        self
    }

    /// Interval between two auto-played steps of `domain`
    pub fn interval_for(&self, domain: Domain) -> Duration {
        match domain {
            Domain::Array => self.array_interval,
            Domain::BstSearch => self.search_interval,
            Domain::BstDelete => self.delete_interval,
            Domain::Traversal => self.traversal_interval,
            Domain::Avl => self.avl_interval,
            Domain::Huffman => self.huffman_interval,
        }
    }

    /// Fixed-interval playback schedule for `domain`
    pub fn schedule(&self, domain: Domain) -> PlaybackSchedule {
        PlaybackSchedule::new(self.interval_for(domain))
    }
}
