//! BNF-like grammar notation compiled to an interned expression tree,
//! plus a backtracking matcher producing a parse tree over byte input.
//!
//! The model is single-byte (0–255) throughout; input is `&[u8]` and
//! matched spans are exact sub-slices of it.

pub mod ast;
pub mod error;
pub mod expr;
pub mod grammar;
pub mod matcher;
pub mod span;
pub mod token;

mod compile;

pub use ast::AstNode;
pub use error::CompileError;
pub use expr::{ByteClass, ByteSet, Expr, ExprArena, ExprHandle, RcBytes, RcString};
pub use grammar::{Grammar, Rule};
pub use matcher::{Match, Matcher};
pub use span::Span;
