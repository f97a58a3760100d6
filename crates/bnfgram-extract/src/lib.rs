//! Post-processing of parse trees: pull named values out of an
//! [`AstNode`](bnfgram::AstNode) tree and render trees for inspection.

mod extract;
mod print;

pub use extract::{Extracted, Extractor};
pub use print::{print_ast, write_ast};
