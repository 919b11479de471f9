//! Huffman tree construction with a traced forest
//!
//! The build is the textbook greedy merge:
//!
//! ```text
//! frequency -> create_node -> { forest -> combine }* -> build_tree
//!           -> generate_code -> result
//! ```
//!
//! Ties are broken by insertion order (see [`forest`]), so the same text always
//! yields the same tree and the same codes.

pub mod codes;
pub mod forest;

pub use codes::CodeTable;
pub use forest::Forest;

use crate::trace::{StepEvent, Terminal, Trace, TraceRecorder};
use crate::{EngineError, Result};
use bitvec::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Bits per symbol of the uncompressed input
pub const SYMBOL_BITS: usize = 8;

/// Node of a Huffman tree
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum HuffmanNode {
    /// One input symbol
    Leaf {
        /// Symbol
        symbol: char,
        /// Occurrences in the input
        frequency: usize,
    },
    /// Merge of two subtrees
    Internal {
        /// Sum of the children's frequencies
        frequency: usize,
        /// Subtree extracted first (code bit `0`)
        left: Box<HuffmanNode>,
        /// Subtree extracted second (code bit `1`)
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    /// Merge two trees; `left` must be the one extracted first
    pub fn merge(left: HuffmanNode, right: HuffmanNode) -> Self {
        HuffmanNode::Internal {
            frequency: left.frequency() + right.frequency(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Frequency carried by this node
    pub fn frequency(&self) -> usize {
        match self {
            HuffmanNode::Leaf { frequency, .. } | HuffmanNode::Internal { frequency, .. } => {
                *frequency
            }
        }
    }

    /// Symbol of a leaf
    pub fn symbol(&self) -> Option<char> {
        match self {
            HuffmanNode::Leaf { symbol, .. } => Some(*symbol),
            HuffmanNode::Internal { .. } => None,
        }
    }

    /// Whether this is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// Nodes in this subtree
    pub fn node_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Leaves in this subtree
    pub fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

impl fmt::Display for HuffmanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HuffmanNode::Leaf { symbol, frequency } => write!(f, "{:?}:{}", symbol, frequency),
            HuffmanNode::Internal { frequency, .. } => write!(f, "node:{}", frequency),
        }
    }
}

/// Root of a tree, as named in a combine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct NodeLabel {
    /// Symbol when the tree is a single leaf
    pub symbol: Option<char>,
    /// Tree frequency
    pub frequency: usize,
}

impl NodeLabel {
    /// Label the root of `node`
    pub fn of(node: &HuffmanNode) -> Self {
        Self {
            symbol: node.symbol(),
            frequency: node.frequency(),
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol {
            Some(symbol) => write!(f, "{:?}:{}", symbol, self.frequency),
            None => write!(f, "node:{}", self.frequency),
        }
    }
}

/// Size comparison between the raw and the encoded text
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct CompressionStats {
    /// `chars × 8`
    pub original_bits: usize,
    /// Sum of codeword lengths over the text
    pub compressed_bits: usize,
}

impl CompressionStats {
    /// `1 − compressed / original`
    pub fn ratio(&self) -> f64 {
        if self.original_bits == 0 {
            return 0.0;
        }
        1.0 - self.compressed_bits as f64 / self.original_bits as f64
    }
}

/// Payload of a Huffman build step
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum HuffmanEvent {
    /// Symbol counts, ordered by symbol
    Frequencies {
        /// Symbol → occurrences
        table: BTreeMap<char, usize>,
    },
    /// One leaf per distinct symbol placed in the forest
    LeavesCreated {
        /// Leaves created
        count: usize,
    },
    /// Forest before the two lightest trees are extracted
    Forest {
        /// Merge round, starting at 1
        round: usize,
        /// Trees in the forest
        trees: usize,
    },
    /// Two trees merged under a new internal node
    Combine {
        /// Merge round
        round: usize,
        /// Extracted first, becomes the left child
        left: NodeLabel,
        /// Extracted second, becomes the right child
        right: NodeLabel,
        /// Frequency of the new node
        frequency: usize,
    },
    /// One tree left: the Huffman tree
    Built {
        /// Root frequency (text length in symbols)
        frequency: usize,
    },
    /// Codewords read off the tree
    CodesGenerated {
        /// Resulting table
        codes: CodeTable,
    },
    /// Build finished
    Result {
        /// Final code table
        codes: CodeTable,
        /// Size comparison for the input text
        stats: CompressionStats,
    },
}

impl StepEvent for HuffmanEvent {
    type Snapshot = Vec<HuffmanNode>;

    fn tag(&self) -> &'static str {
        match self {
            HuffmanEvent::Frequencies { .. } => "frequency",
            HuffmanEvent::LeavesCreated { .. } => "create_node",
            HuffmanEvent::Forest { .. } => "forest",
            HuffmanEvent::Combine { .. } => "combine",
            HuffmanEvent::Built { .. } => "build_tree",
            HuffmanEvent::CodesGenerated { .. } => "generate_code",
            HuffmanEvent::Result { .. } => "result",
        }
    }

    fn terminal(&self) -> Option<Terminal> {
        matches!(self, HuffmanEvent::Result { .. }).then_some(Terminal::Complete)
    }

    fn snapshot_cells(snapshot: &Vec<HuffmanNode>) -> usize {
        snapshot.iter().map(HuffmanNode::node_count).sum()
    }
}

/// Builds a Huffman tree for a text and encodes/decodes with it
///
/// Keeps the tree and table of the most recent build.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCoder {
    root: Option<HuffmanNode>,
    codes: CodeTable,
}

impl HuffmanCoder {
    /// Coder with no tree yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree for `text`, recording every forest change
    ///
    /// Replaces any previous tree. Empty text is rejected before any step is
    /// recorded.
    pub fn build_traced(&mut self, text: &str) -> Result<(Trace<HuffmanEvent>, CodeTable)> {
        if text.is_empty() {
            return Err(EngineError::InvalidInput(
                "cannot build a huffman tree for empty text".to_string(),
            ));
        }

        let frequencies = count_symbols(text);
        debug!(
            symbols = text.chars().count(),
            distinct = frequencies.len(),
            "huffman build started"
        );

        let mut recorder = TraceRecorder::new("huffman_build");
        let listing = frequencies
            .iter()
            .map(|(symbol, count)| format!("{:?}:{}", symbol, count))
            .collect::<Vec<_>>()
            .join(" ");
        recorder.record(
            HuffmanEvent::Frequencies {
                table: frequencies.clone(),
            },
            format!("symbol frequencies {}", listing),
        );

        let mut forest = Forest::new();
        for (&symbol, &frequency) in &frequencies {
            forest.push(HuffmanNode::Leaf { symbol, frequency });
        }
        let trees = forest.snapshot();
        recorder.record_with(
            HuffmanEvent::LeavesCreated {
                count: forest.len(),
            },
            format!("created {} leaves: {}", forest.len(), forest::describe(&trees)),
            trees,
        );

        let mut round = 0;
        while forest.len() > 1 {
            round += 1;
            let trees = forest.snapshot();
            recorder.record_with(
                HuffmanEvent::Forest {
                    round,
                    trees: trees.len(),
                },
                format!("round {}: forest {}", round, forest::describe(&trees)),
                trees,
            );

            let (Some(left), Some(right)) = (forest.pop_min(), forest.pop_min()) else {
                break;
            };
            let (left_label, right_label) = (NodeLabel::of(&left), NodeLabel::of(&right));
            let merged = HuffmanNode::merge(left, right);
            let frequency = merged.frequency();
            forest.push(merged);
            recorder.record_with(
                HuffmanEvent::Combine {
                    round,
                    left: left_label,
                    right: right_label,
                    frequency,
                },
                format!(
                    "round {}: combine {} and {} into node:{}",
                    round, left_label, right_label, frequency
                ),
                forest.snapshot(),
            );
        }

        let root = forest
            .pop_min()
            .ok_or_else(|| EngineError::InvalidInput("no symbols to encode".to_string()))?;
        recorder.record_with(
            HuffmanEvent::Built {
                frequency: root.frequency(),
            },
            format!(
                "huffman tree built: {} leaves, root frequency {}",
                root.leaf_count(),
                root.frequency()
            ),
            vec![root.clone()],
        );

        let codes = CodeTable::from_tree(&root);
        recorder.record_with(
            HuffmanEvent::CodesGenerated {
                codes: codes.clone(),
            },
            format!("codes {}", codes),
            vec![root.clone()],
        );

        // The table comes from this text's own frequencies, so every symbol has a codeword
        let compressed_bits = codes.encoded_bits(text).ok_or_else(|| {
            EngineError::InvalidInput("code table misses a symbol of the text".to_string())
        })?;
        let stats = CompressionStats {
            original_bits: text.chars().count() * SYMBOL_BITS,
            compressed_bits,
        };
        recorder.record_with(
            HuffmanEvent::Result {
                codes: codes.clone(),
                stats,
            },
            format!(
                "{} bits -> {} bits, compression ratio {:.2}%",
                stats.original_bits,
                stats.compressed_bits,
                stats.ratio() * 100.0
            ),
            vec![root.clone()],
        );

        let trace = recorder.finish();
        debug!(
            rounds = round,
            steps = trace.len(),
            compressed_bits = stats.compressed_bits,
            "huffman build finished"
        );

        self.root = Some(root);
        self.codes = codes.clone();
        Ok((trace, codes))
    }

    /// Tree of the last build
    pub fn root(&self) -> Option<&HuffmanNode> {
        self.root.as_ref()
    }

    /// Code table of the last build (empty before any build)
    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Encode `text` with the current table
    pub fn encode(&self, text: &str) -> Result<BitVec> {
        if self.root.is_none() {
            return Err(EngineError::Empty("huffman tree"));
        }
        let mut bits = BitVec::new();
        for symbol in text.chars() {
            let code = self.codes.get(symbol).ok_or_else(|| {
                EngineError::InvalidInput(format!("symbol {:?} has no codeword", symbol))
            })?;
            bits.extend(code.bytes().map(|bit| bit == b'1'));
        }
        Ok(bits)
    }

    /// Decode `bits` by walking the current tree
    ///
    /// Fails with [`EngineError::InvalidCode`] if the stream stops inside a
    /// codeword or takes an edge the tree does not have.
    pub fn decode(&self, bits: &BitSlice) -> Result<String> {
        let root = self.root.as_ref().ok_or(EngineError::Empty("huffman tree"))?;
        let mut text = String::new();

        if let HuffmanNode::Leaf { symbol, .. } = root {
            // Single-symbol tree: every codeword is "0"
            for (position, bit) in bits.iter().by_vals().enumerate() {
                if bit {
                    return Err(EngineError::InvalidCode { position });
                }
                text.push(*symbol);
            }
            return Ok(text);
        }

        let mut node = root;
        let mut start = 0;
        for (position, bit) in bits.iter().by_vals().enumerate() {
            let HuffmanNode::Internal { left, right, .. } = node else {
                return Err(EngineError::InvalidCode { position: start });
            };
            node = if bit { &**right } else { &**left };
            if let HuffmanNode::Leaf { symbol, .. } = node {
                text.push(*symbol);
                node = root;
                start = position + 1;
            }
        }

        if start != bits.len() {
            return Err(EngineError::InvalidCode { position: start });
        }
        Ok(text)
    }
}

/// Occurrences per symbol, ordered by symbol
pub fn count_symbols(text: &str) -> BTreeMap<char, usize> {
    let mut frequencies = BTreeMap::new();
    for symbol in text.chars() {
        *frequencies.entry(symbol).or_insert(0) += 1;
    }
    frequencies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sequence() {
        let mut coder = HuffmanCoder::new();
        let (trace, codes) = coder.build_traced("aaabbc").unwrap();

        assert_eq!(
            trace.tags(),
            vec![
                "frequency",
                "create_node",
                "forest",
                "combine",
                "forest",
                "combine",
                "build_tree",
                "generate_code",
                "result"
            ]
        );
        assert_eq!(trace.outcome(), Terminal::Complete);
        assert_eq!(codes.get('a'), Some("0"));
        assert_eq!(codes.get('c'), Some("10"));
        assert_eq!(codes.get('b'), Some("11"));
        assert_eq!(coder.root().map(HuffmanNode::frequency), Some(6));
    }

    #[test]
    fn test_first_extracted_goes_left() {
        let mut coder = HuffmanCoder::new();
        let (trace, _) = coder.build_traced("aaabbc").unwrap();
        assert_eq!(
            trace[3].event(),
            &HuffmanEvent::Combine {
                round: 1,
                left: NodeLabel {
                    symbol: Some('c'),
                    frequency: 1
                },
                right: NodeLabel {
                    symbol: Some('b'),
                    frequency: 2
                },
                frequency: 3,
            }
        );
        assert_eq!(trace[3].description(), "round 1: combine 'c':1 and 'b':2 into node:3");
    }

    #[test]
    fn test_compression_stats() {
        let mut coder = HuffmanCoder::new();
        let (trace, _) = coder.build_traced("aaabbc").unwrap();
        let HuffmanEvent::Result { stats, .. } = trace.last().event() else {
            panic!("last step is not the result");
        };
        assert_eq!(stats.original_bits, 48);
        assert_eq!(stats.compressed_bits, 9);
        assert!((stats.ratio() - 0.8125).abs() < 1e-9);
    }

    #[test]
    fn test_compressed_bits_match_encoded_length() {
        for text in ["aaabbc", "zzzz", "abracadabra", "héllo wörld"] {
            let mut coder = HuffmanCoder::new();
            let (trace, _) = coder.build_traced(text).unwrap();
            let HuffmanEvent::Result { stats, .. } = trace.last().event() else {
                panic!("last step is not the result");
            };
            assert_eq!(stats.compressed_bits, coder.encode(text).unwrap().len(), "{:?}", text);
            assert!(stats.compressed_bits > 0);
            assert_eq!(stats.original_bits, text.chars().count() * 8);
        }
    }

    #[test]
    fn test_decode_rejects_dangling_bits() {
        let mut coder = HuffmanCoder::new();
        coder.build_traced("aaabbc").unwrap();

        // "a" then a lone "1": the codeword starting at bit 1 is unfinished
        let bits = bitvec![0, 1];
        assert_eq!(
            coder.decode(&bits),
            Err(EngineError::InvalidCode { position: 1 })
        );
    }

    #[test]
    fn test_use_before_build() {
        let coder = HuffmanCoder::new();
        assert_eq!(coder.decode(&BitVec::new()), Err(EngineError::Empty("huffman tree")));
        assert!(coder.encode("a").is_err());
        assert!(coder.codes().is_empty());
    }
}
