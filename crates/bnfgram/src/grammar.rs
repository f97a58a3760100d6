use std::collections::HashMap;

use crate::compile;
use crate::error::CompileError;
use crate::expr::{Expr, ExprArena, ExprHandle, RcString};

/// Named production. The name includes its `<>` delimiters and is the
/// lookup key; the body is a handle into the grammar's arena.
#[derive(Clone, Debug)]
pub struct Rule {
    pub name: RcString,
    pub body: ExprHandle,
}

/// The rule table. Built once through [`add_rule`](Self::add_rule)
/// calls, then used read-only by any number of matching passes.
///
/// Redefining a name replaces the previous entry: last writer wins.
pub struct Grammar {
    arena: ExprArena,
    rules: HashMap<RcString, Rule>,
}

impl Grammar {
    /// A grammar with hash-consing enabled: structurally identical
    /// sub-expressions anywhere in the grammar share one node.
    pub fn new() -> Grammar {
        Grammar {
            arena: ExprArena::new(),
            rules: HashMap::new(),
        }
    }

    /// A grammar that keeps one node per syntactic occurrence. Matching
    /// behaves identically; only sharing is lost.
    pub fn without_interning() -> Grammar {
        Grammar {
            arena: ExprArena::without_interning(),
            rules: HashMap::new(),
        }
    }

    /// Compiles one `<name> ::= body` definition and registers it.
    pub fn add_rule(&mut self, text: &str) -> Result<(), CompileError> {
        let rule = compile::compile_rule(&mut self.arena, text)?;
        self.rules.insert(rule.name.clone(), rule);
        Ok(())
    }

    pub fn get_rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn expr(&self, handle: ExprHandle) -> &Expr {
        self.arena.get(handle)
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Writes every rule with its expression tree, sorted by name for
    /// stable output.
    pub fn display_into(&self, buf: &mut dyn std::fmt::Write) -> std::fmt::Result {
        let mut names: Vec<&RcString> = self.rules.keys().collect();
        names.sort();

        for name in names {
            let rule = &self.rules[name];
            write!(buf, "{} =\n", rule.name)?;
            self.arena.display_into_indent(rule.body, buf, 1)?;
        }
        Ok(())
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}
