use std::fmt::{self, Write};

use bnfgram::AstNode;

/// Writes a parse tree with two-space indentation, one node per line:
/// the label, then `[matched="..."]` unless nothing was consumed.
/// Non-printable bytes are escaped.
pub fn write_ast(node: &AstNode, buf: &mut dyn Write) -> fmt::Result {
    write_node(node, buf, 0)
}

pub fn print_ast(node: &AstNode) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = write_ast(node, &mut out);
    out
}

fn write_node(node: &AstNode, buf: &mut dyn Write, indent: usize) -> fmt::Result {
    for _ in 0..indent {
        buf.write_str("  ")?;
    }
    buf.write_str(&node.symbol)?;
    if !node.matched.is_empty() {
        write!(buf, "  [matched=\"{}\"]", node.matched.escape_ascii())?;
    }
    buf.write_str("\n")?;

    for child in &node.children {
        write_node(child, buf, indent + 1)?;
    }
    Ok(())
}
