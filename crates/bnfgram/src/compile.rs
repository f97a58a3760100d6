//! Recursive descent over the token stream of one rule definition.
//!
//! Expressions are built bottom-up: every child is interned before its
//! parent, so parent keys are computed over canonical handles.
//!
//! Malformed text is rejected with a [`CompileError`] — the compiler
//! never silently accepts a different structure than written, even
//! though the lexer itself is lenient about unterminated tokens.

use std::rc::Rc;

use crate::error::CompileError;
use crate::expr::{ByteClass, Expr, ExprArena, ExprHandle};
use crate::grammar::Rule;
use crate::token::{Lexer, Token, TokenKind};

pub(crate) fn compile_rule(arena: &mut ExprArena, text: &str) -> Result<Rule, CompileError> {
    let mut compiler = Compiler {
        lexer: Lexer::new(text),
        arena,
    };
    compiler.rule()
}

struct Compiler<'s, 'a> {
    lexer: Lexer<'s>,
    arena: &'a mut ExprArena,
}

impl<'s, 'a> Compiler<'s, 'a> {
    fn rule(&mut self) -> Result<Rule, CompileError> {
        let name = self.lexer.next();
        if name.kind != TokenKind::Symbol {
            return Err(CompileError::new(name.span, "expected a <name> to define"));
        }
        let name = symbol_name(name)?;

        let assign = self.lexer.next();
        if assign.kind != TokenKind::Word || assign.text != "::=" {
            return Err(CompileError::new(assign.span, "expected `::=`"));
        }

        let body = self.alternative()?;

        let trailing = self.lexer.next();
        if trailing.kind != TokenKind::End {
            return Err(CompileError::new(
                trailing.span,
                "unexpected input after rule body",
            ));
        }

        Ok(Rule { name, body })
    }

    /// alternative := sequence (`|` sequence)*, singleton collapsed
    fn alternative(&mut self) -> Result<ExprHandle, CompileError> {
        let mut branches = vec![self.sequence()?];

        while self.lexer.peek().kind == TokenKind::Pipe {
            self.lexer.next();
            branches.push(self.sequence()?);
        }

        if branches.len() == 1 {
            return Ok(branches[0]);
        }
        Ok(self.arena.intern(Expr::Alternative(branches)))
    }

    /// sequence := factor+, singleton collapsed
    fn sequence(&mut self) -> Result<ExprHandle, CompileError> {
        let mut factors = vec![self.factor()?];

        while starts_factor(self.lexer.peek().kind) {
            factors.push(self.factor()?);
        }

        if factors.len() == 1 {
            return Ok(factors[0]);
        }
        Ok(self.arena.intern(Expr::Sequence(factors)))
    }

    fn factor(&mut self) -> Result<ExprHandle, CompileError> {
        let token = self.lexer.next();
        match token.kind {
            TokenKind::Terminal => {
                let content = terminal_content(token)?;
                if self.lexer.peek().kind == TokenKind::Ellipsis {
                    self.lexer.next();
                    let start = single_byte(content, token)?;
                    let end = self.range_operand()?;
                    return Ok(self.arena.intern(Expr::ByteRange(start, end)));
                }
                Ok(self
                    .arena
                    .intern(Expr::Terminal(content.as_bytes().into())))
            }
            TokenKind::HexByte => {
                let start = hex_value(token);
                if self.lexer.peek().kind == TokenKind::Ellipsis {
                    self.lexer.next();
                    let end = self.range_operand()?;
                    return Ok(self.arena.intern(Expr::ByteRange(start, end)));
                }
                Ok(self.arena.intern(Expr::Terminal(vec![start].into())))
            }
            TokenKind::Symbol => {
                let name = symbol_name(token)?;
                Ok(self.arena.intern(Expr::Symbol(name)))
            }
            TokenKind::LBracket => {
                let inner = self.alternative()?;
                self.expect_close(TokenKind::RBracket, "expected `]`")?;
                Ok(self.arena.intern(Expr::Optional(inner)))
            }
            TokenKind::LBrace => {
                let inner = self.alternative()?;
                self.expect_close(TokenKind::RBrace, "expected `}`")?;
                Ok(self.arena.intern(Expr::Repeat(inner)))
            }
            TokenKind::LParen => self.byte_class(token),
            _ => Err(CompileError::new(
                token.span,
                "expected a terminal, symbol reference, or group",
            )),
        }
    }

    /// `(` `^`? member+ `)` where member := byte | byte `...` byte
    fn byte_class(&mut self, open: Token) -> Result<ExprHandle, CompileError> {
        let mut exclude = false;
        if self.lexer.peek().kind == TokenKind::Caret {
            self.lexer.next();
            exclude = true;
        }

        let mut ranges = Vec::new();
        let mut chars = Vec::new();

        loop {
            let token = self.lexer.next();
            match token.kind {
                TokenKind::RParen => break,
                TokenKind::End => {
                    return Err(CompileError::new(open.span, "unterminated character class"));
                }
                TokenKind::Terminal | TokenKind::HexByte => {
                    let byte = match token.kind {
                        TokenKind::Terminal => single_byte(terminal_content(token)?, token)?,
                        _ => hex_value(token),
                    };
                    if self.lexer.peek().kind == TokenKind::Ellipsis {
                        self.lexer.next();
                        let end = self.range_operand()?;
                        ranges.push((byte, end));
                    } else {
                        chars.push(byte);
                    }
                }
                _ => {
                    return Err(CompileError::new(
                        token.span,
                        "expected a byte literal in character class",
                    ));
                }
            }
        }

        if ranges.is_empty() && chars.is_empty() {
            return Err(CompileError::new(open.span, "empty character class"));
        }

        let class = ByteClass::new(ranges, chars, exclude);
        Ok(self.arena.intern(Expr::ByteClass(Rc::new(class))))
    }

    /// The operand after `...`: a single-character terminal or hex byte.
    fn range_operand(&mut self) -> Result<u8, CompileError> {
        let token = self.lexer.next();
        match token.kind {
            TokenKind::Terminal => single_byte(terminal_content(token)?, token),
            TokenKind::HexByte => Ok(hex_value(token)),
            _ => Err(CompileError::new(
                token.span,
                "expected a byte literal after `...`",
            )),
        }
    }

    fn expect_close(&mut self, kind: TokenKind, message: &'static str) -> Result<(), CompileError> {
        let token = self.lexer.next();
        if token.kind != kind {
            return Err(CompileError::new(token.span, message));
        }
        Ok(())
    }
}

fn starts_factor(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Terminal
            | TokenKind::HexByte
            | TokenKind::Symbol
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::LParen
    )
}

/// Validates a symbol token against the lexer's leniency: the token
/// must really end with `>` and name at least one character.
fn symbol_name(token: Token) -> Result<Rc<str>, CompileError> {
    if !token.text.ends_with('>') {
        return Err(CompileError::new(token.span, "unterminated symbol"));
    }
    if token.text.len() <= 2 {
        return Err(CompileError::new(token.span, "empty symbol name"));
    }
    Ok(token.text.into())
}

/// Strips the quotes off a terminal token, rejecting an unterminated one.
fn terminal_content(token: Token<'_>) -> Result<&str, CompileError> {
    let text = token.text;
    let quote = text.as_bytes()[0];
    if text.len() < 2 || text.as_bytes()[text.len() - 1] != quote {
        return Err(CompileError::new(token.span, "unterminated terminal"));
    }
    Ok(&text[1..text.len() - 1])
}

fn single_byte(content: &str, token: Token) -> Result<u8, CompileError> {
    match content.as_bytes() {
        &[byte] => Ok(byte),
        _ => Err(CompileError::new(
            token.span,
            "expected a single-byte literal",
        )),
    }
}

fn hex_value(token: Token) -> u8 {
    // the lexer only produces HexByte for exactly two hex digits
    u8::from_str_radix(&token.text[2..], 16).unwrap()
}
