use std::borrow::Cow;

use bstr::BStr;

/// Labels of nodes produced by non-symbol constructs. Symbol nodes carry
/// the referenced rule's name (including its `<>` delimiters) instead.
pub const TERMINAL: &str = "terminal";
pub const SEQUENCE: &str = "sequence";
pub const OPTIONAL: &str = "optional";
pub const REPEAT: &str = "repeat";
pub const RANGE: &str = "range";
pub const CLASS: &str = "class";

/// One successful match. `matched` is the exact consumed sub-slice of
/// the input; children are owned outright, so dropping a node drops the
/// whole subtree.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AstNode<'i> {
    pub symbol: Cow<'static, str>,
    pub matched: &'i [u8],
    pub children: Vec<AstNode<'i>>,
}

impl<'i> AstNode<'i> {
    pub fn new(symbol: impl Into<Cow<'static, str>>, matched: &'i [u8]) -> AstNode<'i> {
        AstNode {
            symbol: symbol.into(),
            matched,
            children: Vec::new(),
        }
    }

    /// True for nodes produced by symbol expansion, whose label is a
    /// rule name rather than a construct label.
    pub fn is_symbol(&self) -> bool {
        self.symbol.starts_with('<')
    }

    /// The matched bytes as a byte string, printable even when the
    /// input is not UTF-8.
    pub fn matched_bstr(&self) -> &BStr {
        BStr::new(self.matched)
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(AstNode::node_count)
            .sum::<usize>()
    }
}
