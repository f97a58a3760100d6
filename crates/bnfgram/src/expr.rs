use std::collections::HashMap;
use std::rc::Rc;

use cranelift_entity::{entity_impl, PrimaryMap};

pub type RcBytes = Rc<[u8]>;
pub type RcString = Rc<str>;

/// Stable handle of an [`Expr`] inside an [`ExprArena`].
///
/// For an interning arena, handle equality is equivalent to structural
/// equality of the referenced sub-trees.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ExprHandle(u32);

entity_impl! { ExprHandle }

/// 256-bit byte membership set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct ByteSet([u64; 4]);

impl ByteSet {
    pub fn empty() -> ByteSet {
        ByteSet([0; 4])
    }
    pub fn insert(&mut self, byte: u8) {
        self.0[(byte >> 6) as usize] |= 1 << (byte & 63);
    }
    /// Inserts the inclusive range `start..=end`; inserts nothing when
    /// `start > end`.
    pub fn insert_range(&mut self, start: u8, end: u8) {
        let mut byte = start;
        while byte <= end {
            self.insert(byte);
            if byte == u8::MAX {
                break;
            }
            byte += 1;
        }
    }
    pub fn invert(&mut self) {
        for word in &mut self.0 {
            *word = !*word;
        }
    }
    pub fn contains(&self, byte: u8) -> bool {
        (self.0[(byte >> 6) as usize] >> (byte & 63)) & 1 != 0
    }
    pub fn len(&self) -> u32 {
        self.0.iter().map(|word| word.count_ones()).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.0 == [0; 4]
    }
}

/// Single-byte membership test compiled from a `( ... )` class.
///
/// The surface members are kept for introspection; matching and
/// canonicalization use only the precomputed effective bitmap, with the
/// `^` complement already applied. Two classes spelled differently but
/// covering the same bytes therefore intern to one node.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ByteClass {
    ranges: Vec<(u8, u8)>,
    chars: Vec<u8>,
    exclude: bool,
    set: ByteSet,
}

impl ByteClass {
    pub fn new(ranges: Vec<(u8, u8)>, chars: Vec<u8>, exclude: bool) -> ByteClass {
        let mut set = ByteSet::empty();
        for &(start, end) in &ranges {
            set.insert_range(start, end);
        }
        for &byte in &chars {
            set.insert(byte);
        }
        if exclude {
            set.invert();
        }
        ByteClass {
            ranges,
            chars,
            exclude,
            set,
        }
    }
    pub fn contains(&self, byte: u8) -> bool {
        self.set.contains(byte)
    }
    pub fn ranges(&self) -> &[(u8, u8)] {
        &self.ranges
    }
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }
    pub fn is_exclusion(&self) -> bool {
        self.exclude
    }
    pub fn set(&self) -> &ByteSet {
        &self.set
    }
}

/// One IR node of a rule body. Children are arena handles, so recursive
/// rules never form pointer cycles: a [`Expr::Symbol`] is resolved by
/// name at match time through the rule table.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Expr {
    /// exact bytes to match
    Terminal(RcBytes),
    /// reference to a rule, name includes its `<>` delimiters
    Symbol(RcString),
    /// all children in order
    Sequence(Vec<ExprHandle>),
    /// longest successful branch wins, ties to the earliest declared
    Alternative(Vec<ExprHandle>),
    /// zero or one occurrence
    Optional(ExprHandle),
    /// zero or more occurrences, greedy
    Repeat(ExprHandle),
    /// one byte in the inclusive range
    ByteRange(u8, u8),
    /// one byte satisfying the class
    ByteClass(Rc<ByteClass>),
}

/// Structural key of an [`Expr`]: variant tag plus canonical content.
///
/// Children appear as their (already canonical) handles, which is why
/// interning must proceed bottom-up. A class is keyed by its effective
/// bitmap alone, never by its surface spelling.
#[derive(Clone, PartialEq, Eq, Hash)]
enum ExprKey {
    Terminal(RcBytes),
    Symbol(RcString),
    Sequence(Vec<ExprHandle>),
    Alternative(Vec<ExprHandle>),
    Optional(ExprHandle),
    Repeat(ExprHandle),
    ByteRange(u8, u8),
    ByteClass(ByteSet),
}

impl ExprKey {
    fn of(expr: &Expr) -> ExprKey {
        match expr {
            Expr::Terminal(text) => ExprKey::Terminal(text.clone()),
            Expr::Symbol(name) => ExprKey::Symbol(name.clone()),
            Expr::Sequence(children) => ExprKey::Sequence(children.clone()),
            Expr::Alternative(children) => ExprKey::Alternative(children.clone()),
            Expr::Optional(inner) => ExprKey::Optional(*inner),
            Expr::Repeat(inner) => ExprKey::Repeat(*inner),
            Expr::ByteRange(start, end) => ExprKey::ByteRange(*start, *end),
            Expr::ByteClass(class) => ExprKey::ByteClass(*class.set()),
        }
    }
}

/// Owns every [`Expr`] of a grammar.
///
/// With interning enabled (the default), [`intern`](Self::intern)
/// hash-conses: structurally equal nodes collapse to one handle and the
/// non-canonical candidate is simply never stored. Without it, every
/// syntactic occurrence gets its own node.
pub struct ExprArena {
    exprs: PrimaryMap<ExprHandle, Expr>,
    interner: Option<HashMap<ExprKey, ExprHandle>>,
}

impl ExprArena {
    pub fn new() -> ExprArena {
        ExprArena {
            exprs: PrimaryMap::new(),
            interner: Some(HashMap::new()),
        }
    }

    pub fn without_interning() -> ExprArena {
        ExprArena {
            exprs: PrimaryMap::new(),
            interner: None,
        }
    }

    /// Returns the canonical handle for `expr`, storing it if no equal
    /// node exists yet. Idempotent: interning data equal to an already
    /// canonical node returns the same handle.
    pub fn intern(&mut self, expr: Expr) -> ExprHandle {
        let Some(table) = &mut self.interner else {
            return self.exprs.push(expr);
        };

        let key = ExprKey::of(&expr);
        match table.get(&key) {
            Some(&canonical) => canonical,
            None => {
                let handle = self.exprs.push(expr);
                table.insert(key, handle);
                handle
            }
        }
    }

    pub fn get(&self, handle: ExprHandle) -> &Expr {
        &self.exprs[handle]
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn is_interning(&self) -> bool {
        self.interner.is_some()
    }

    pub fn display_into_indent(
        &self,
        handle: ExprHandle,
        buf: &mut dyn std::fmt::Write,
        indent: u32,
    ) -> std::fmt::Result {
        for _ in 0..indent {
            write!(buf, "  ")?;
        }
        match self.get(handle) {
            Expr::Terminal(text) => {
                write!(buf, "Terminal('{}')\n", text.escape_ascii())
            }
            Expr::Symbol(name) => write!(buf, "Symbol({name})\n"),
            Expr::Sequence(children) => {
                write!(buf, "Sequence\n")?;
                self.display_children(children, buf, indent + 1)
            }
            Expr::Alternative(children) => {
                write!(buf, "Alternative\n")?;
                self.display_children(children, buf, indent + 1)
            }
            Expr::Optional(inner) => {
                write!(buf, "Optional\n")?;
                self.display_into_indent(*inner, buf, indent + 1)
            }
            Expr::Repeat(inner) => {
                write!(buf, "Repeat\n")?;
                self.display_into_indent(*inner, buf, indent + 1)
            }
            Expr::ByteRange(start, end) => {
                let start = std::ascii::escape_default(*start);
                let end = std::ascii::escape_default(*end);
                write!(buf, "Range('{start}'-'{end}')\n")
            }
            Expr::ByteClass(class) => {
                write!(buf, "Class(")?;
                if class.is_exclusion() {
                    write!(buf, "^")?;
                }
                for &(start, end) in class.ranges() {
                    let start = std::ascii::escape_default(start);
                    let end = std::ascii::escape_default(end);
                    write!(buf, " '{start}'-'{end}'")?;
                }
                for &byte in class.chars() {
                    write!(buf, " '{}'", std::ascii::escape_default(byte))?;
                }
                write!(buf, " )\n")
            }
        }
    }

    fn display_children(
        &self,
        children: &[ExprHandle],
        buf: &mut dyn std::fmt::Write,
        indent: u32,
    ) -> std::fmt::Result {
        for &child in children {
            self.display_into_indent(child, buf, indent)?;
        }
        Ok(())
    }
}

impl Default for ExprArena {
    fn default() -> Self {
        Self::new()
    }
}
