//! Symbol → codeword table derived from a finished tree

use super::HuffmanNode;
use std::collections::BTreeMap;
use std::fmt;

/// Codewords as `'0'`/`'1'` strings, ordered by symbol
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct CodeTable {
    codes: BTreeMap<char, String>,
}

impl CodeTable {
    /// Walk `root`: left edges append `0`, right edges append `1`
    ///
    /// A tree that is a single leaf assigns that symbol the code `"0"`.
    pub fn from_tree(root: &HuffmanNode) -> Self {
        let mut codes = BTreeMap::new();
        assign(root, String::new(), &mut codes);
        Self { codes }
    }

    /// Codeword for `symbol`
    pub fn get(&self, symbol: char) -> Option<&str> {
        self.codes.get(&symbol).map(String::as_str)
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// No symbols
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `(symbol, codeword)` pairs ordered by symbol
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.codes.iter().map(|(&symbol, code)| (symbol, code.as_str()))
    }

    /// No codeword is a prefix of another
    pub fn is_prefix_free(&self) -> bool {
        let mut words: Vec<&str> = self.codes.values().map(String::as_str).collect();
        // After sorting, a prefix sorts directly before some word it prefixes
        words.sort_unstable();
        words.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }

    /// Bits needed to encode `text`; `None` if a symbol has no codeword
    pub fn encoded_bits(&self, text: &str) -> Option<usize> {
        text.chars()
            .map(|symbol| self.get(symbol).map(str::len))
            .sum()
    }
}

fn assign(node: &HuffmanNode, prefix: String, codes: &mut BTreeMap<char, String>) {
    match node {
        HuffmanNode::Leaf { symbol, .. } => {
            let code = if prefix.is_empty() {
                "0".to_string()
            } else {
                prefix
            };
            codes.insert(*symbol, code);
        }
        HuffmanNode::Internal { left, right, .. } => {
            assign(left, format!("{}0", prefix), codes);
            assign(right, format!("{}1", prefix), codes);
        }
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (symbol, code) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{:?}={}", symbol, code)?;
        }
        Ok(())
    }
}
