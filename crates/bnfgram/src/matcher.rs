//! Backtracking matcher over the immutable expression trees.
//!
//! Matching is read-only: the grammar is never touched, every call
//! builds a fresh [`AstNode`] tree, and failure rolls the position back
//! to wherever the failing construct started. Repetition is greedy and
//! never gives back accepted iterations, so a grammar that needs a
//! repeated element to yield bytes to a following sequence element will
//! not match input that a backtracking-repeat engine would accept.

use std::borrow::Cow;

use crate::ast::{self, AstNode};
use crate::expr::{Expr, ExprHandle};
use crate::grammar::Grammar;

/// Symbol resolutions allowed on one recursion path before the
/// sub-match is abandoned. Bounds rules that reference themselves with
/// no intervening consuming construct; such a rule fails with an
/// ordinary no-match instead of overflowing the stack.
pub const DEFAULT_MAX_DEPTH: u32 = 512;

/// A successful top-level match. Trailing unconsumed input is normal:
/// `consumed` may be less than the input length.
#[derive(Clone, Debug)]
pub struct Match<'i> {
    pub node: AstNode<'i>,
    pub consumed: usize,
}

/// Matches named rules of a completed [`Grammar`] against input bytes.
pub struct Matcher<'g> {
    grammar: &'g Grammar,
    max_depth: u32,
}

impl<'g> Matcher<'g> {
    pub fn new(grammar: &'g Grammar) -> Matcher<'g> {
        Matcher {
            grammar,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(grammar: &'g Grammar, max_depth: u32) -> Matcher<'g> {
        Matcher { grammar, max_depth }
    }

    /// Matches `rule_name` at the start of `input`. `None` means no
    /// match (including an unknown rule name), with nothing consumed.
    pub fn parse<'i>(&self, rule_name: &str, input: &'i [u8]) -> Option<Match<'i>> {
        self.parse_at(rule_name, input, 0)
    }

    /// Matches `rule_name` at byte offset `start`. The returned node is
    /// the entry rule's body node; no extra symbol wrapper is added at
    /// the top level.
    pub fn parse_at<'i>(
        &self,
        rule_name: &str,
        input: &'i [u8],
        start: usize,
    ) -> Option<Match<'i>> {
        if start > input.len() {
            return None;
        }
        let rule = self.grammar.get_rule(rule_name)?;
        let (node, end) = self.match_expr(rule.body, input, start, 0)?;
        Some(Match {
            node,
            consumed: end - start,
        })
    }

    fn match_expr<'i>(
        &self,
        handle: ExprHandle,
        input: &'i [u8],
        pos: usize,
        depth: u32,
    ) -> Option<(AstNode<'i>, usize)> {
        match self.grammar.expr(handle) {
            Expr::Terminal(text) => {
                let end = pos + text.len();
                match input.get(pos..end) {
                    Some(slice) if slice == &text[..] => {
                        Some((AstNode::new(ast::TERMINAL, slice), end))
                    }
                    _ => None,
                }
            }
            Expr::ByteRange(start, end) => {
                let byte = *input.get(pos)?;
                if *start <= byte && byte <= *end {
                    Some((AstNode::new(ast::RANGE, &input[pos..pos + 1]), pos + 1))
                } else {
                    None
                }
            }
            Expr::ByteClass(class) => {
                let byte = *input.get(pos)?;
                if class.contains(byte) {
                    Some((AstNode::new(ast::CLASS, &input[pos..pos + 1]), pos + 1))
                } else {
                    None
                }
            }
            Expr::Symbol(name) => {
                if depth >= self.max_depth {
                    return None;
                }
                // resolved at match time; unknown names fail the sub-match
                let rule = self.grammar.get_rule(name)?;
                let (inner, end) = self.match_expr(rule.body, input, pos, depth + 1)?;

                let mut node = AstNode::new(Cow::Owned(name.to_string()), inner.matched);
                node.children.push(inner);
                Some((node, end))
            }
            Expr::Sequence(children) => {
                let mut cursor = pos;
                let mut nodes = Vec::with_capacity(children.len());

                // all or nothing: any failing element discards the
                // partial consumption of the ones before it
                for &child in children {
                    let (node, end) = self.match_expr(child, input, cursor, depth)?;
                    nodes.push(node);
                    cursor = end;
                }

                let mut node = AstNode::new(ast::SEQUENCE, &input[pos..cursor]);
                node.children = nodes;
                Some((node, cursor))
            }
            Expr::Alternative(children) => {
                // longest match, ties broken by declaration order
                let mut best: Option<(AstNode, usize)> = None;

                for &child in children {
                    if let Some((node, end)) = self.match_expr(child, input, pos, depth) {
                        let better = match &best {
                            Some((_, best_end)) => end > *best_end,
                            None => true,
                        };
                        if better {
                            best = Some((node, end));
                        }
                    }
                }

                best
            }
            Expr::Optional(inner) => match self.match_expr(*inner, input, pos, depth) {
                Some((child, end)) => {
                    let mut node = AstNode::new(ast::OPTIONAL, &input[pos..end]);
                    node.children.push(child);
                    Some((node, end))
                }
                None => Some((AstNode::new(ast::OPTIONAL, &input[pos..pos]), pos)),
            },
            Expr::Repeat(inner) => {
                let mut cursor = pos;
                let mut children = Vec::new();

                loop {
                    match self.match_expr(*inner, input, cursor, depth) {
                        None => break,
                        Some((child, end)) => {
                            if end == cursor {
                                // zero-width iteration, would never terminate
                                break;
                            }
                            children.push(child);
                            cursor = end;
                            if cursor >= input.len() {
                                break;
                            }
                        }
                    }
                }

                let mut node = AstNode::new(ast::REPEAT, &input[pos..cursor]);
                node.children = children;
                Some((node, cursor))
            }
        }
    }
}
