use std::borrow::Cow;

use crate::span::Span;

/// A rejected rule definition. Carries the byte span of the offending
/// token within the rule text passed to [`Grammar::add_rule`].
///
/// [`Grammar::add_rule`]: crate::grammar::Grammar::add_rule
#[derive(Clone, Debug)]
pub struct CompileError {
    pub span: Span,
    pub message: Cow<'static, str>,
}

impl CompileError {
    pub fn new(span: Span, message: impl Into<Cow<'static, str>>) -> CompileError {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "grammar error at {}: {}", self.span, self.message)
    }
}

impl std::error::Error for CompileError {}
