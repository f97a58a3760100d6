use std::collections::BTreeMap;

use bnfgram::ast::{self, AstNode};

/// Values pulled out of one parse tree, keyed by symbol name (with its
/// `<>` delimiters) or, for construct leaves, by the construct label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extracted {
    pub values: BTreeMap<String, Vec<Vec<u8>>>,
}

impl Extracted {
    pub fn has(&self, symbol: &str) -> bool {
        self.values.contains_key(symbol)
    }

    /// The first recorded value, or an empty slice for an absent symbol.
    pub fn first(&self, symbol: &str) -> &[u8] {
        self.values
            .get(symbol)
            .and_then(|values| values.first())
            .map(Vec::as_slice)
            .unwrap_or(b"")
    }

    pub fn count(&self, symbol: &str) -> usize {
        self.values.get(symbol).map_or(0, Vec::len)
    }

    pub fn all(&self, symbol: &str) -> &[Vec<u8>] {
        self.values.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    fn record(&mut self, symbol: &str, value: Vec<u8>) {
        self.values.entry(symbol.to_string()).or_default().push(value);
    }
}

/// Configurable tree walk collecting matched values.
///
/// By default every symbol node in the tree is recorded, in depth-first
/// order. The configuration narrows or widens that:
///
/// * `set_symbols` restricts recording to the listed symbol names
///   (descent still passes through unlisted symbols).
/// * `include_terminals` additionally records consuming construct
///   leaves under their construct label (`terminal`, `range`, `class`).
/// * `flatten_repetitions` concatenates, per key, everything recorded
///   inside one repetition node into a single value.
#[derive(Clone, Debug, Default)]
pub struct Extractor {
    symbols: Vec<String>,
    include_terminals: bool,
    flatten_repetitions: bool,
}

impl Extractor {
    pub fn new() -> Extractor {
        Extractor::default()
    }

    /// Restricts extraction to the given symbol names. An empty list
    /// means no restriction.
    pub fn set_symbols<I>(&mut self, symbols: I) -> &mut Extractor
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_terminals(&mut self, yes: bool) -> &mut Extractor {
        self.include_terminals = yes;
        self
    }

    pub fn flatten_repetitions(&mut self, yes: bool) -> &mut Extractor {
        self.flatten_repetitions = yes;
        self
    }

    /// Back to the defaults: all symbols, no terminals, no flattening.
    pub fn reset_config(&mut self) {
        *self = Extractor::default();
    }

    pub fn extract(&self, root: &AstNode) -> Extracted {
        let mut out = Extracted::default();
        self.visit(root, &mut out);
        out
    }

    fn wants(&self, symbol: &str) -> bool {
        self.symbols.is_empty() || self.symbols.iter().any(|s| s == symbol)
    }

    fn visit(&self, node: &AstNode, out: &mut Extracted) {
        if node.is_symbol() {
            if self.wants(&node.symbol) {
                out.record(&node.symbol, node.matched.to_vec());
            }
        } else if self.include_terminals
            && node.children.is_empty()
            && !node.matched.is_empty()
        {
            // consuming leaf: terminal, range, or class
            out.record(&node.symbol, node.matched.to_vec());
        }

        if self.flatten_repetitions && node.symbol == ast::REPEAT {
            // collect the subtree apart, then merge each key's values
            // into one concatenated entry
            let mut sub = Extracted::default();
            for child in &node.children {
                self.visit(child, &mut sub);
            }
            for (symbol, values) in sub.values {
                out.record(&symbol, values.concat());
            }
            return;
        }

        for child in &node.children {
            self.visit(child, out);
        }
    }
}
