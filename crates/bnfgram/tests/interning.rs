//! Hash-consing across whole rules: equal structure means equal handle.

use bnfgram::{Expr, Grammar, Matcher};

#[test]
fn identical_rule_bodies_share_one_tree() {
    let mut g = Grammar::new();
    g.add_rule("<a> ::= 'X' | 'Y'").unwrap();
    g.add_rule("<b> ::= 'X' | 'Y'").unwrap();

    let a = g.get_rule("<a>").unwrap();
    let b = g.get_rule("<b>").unwrap();
    assert_eq!(a.body, b.body);
}

#[test]
fn shared_subtrees_across_different_rules() {
    let mut g = Grammar::new();
    g.add_rule("<a> ::= 'X' | 'Y'").unwrap();
    g.add_rule("<c> ::= 'X' 'Y'").unwrap();

    let a = g.get_rule("<a>").unwrap();
    let c = g.get_rule("<c>").unwrap();
    assert_ne!(a.body, c.body);

    // the leaves under both roots are the same two nodes
    let Expr::Alternative(alt) = g.expr(a.body) else {
        panic!("expected an alternative");
    };
    let Expr::Sequence(seq) = g.expr(c.body) else {
        panic!("expected a sequence");
    };
    assert_eq!(alt, seq);
}

#[test]
fn interning_bounds_arena_growth() {
    let mut interned = Grammar::new();
    let mut plain = Grammar::without_interning();

    for g in [&mut interned, &mut plain] {
        g.add_rule("<a> ::= 'X' 'Y' 'Z'").unwrap();
        g.add_rule("<b> ::= 'X' 'Y' 'Z'").unwrap();
        g.add_rule("<c> ::= { 'X' 'Y' 'Z' }").unwrap();
    }

    // interned: X, Y, Z, the sequence, the repeat
    assert_eq!(interned.arena().len(), 5);
    assert!(plain.arena().len() > interned.arena().len());
}

#[test]
fn interning_is_idempotent() {
    let mut g = Grammar::new();
    g.add_rule("<a> ::= 'X'").unwrap();
    let first = g.get_rule("<a>").unwrap().body;
    g.add_rule("<a> ::= 'X'").unwrap();
    let second = g.get_rule("<a>").unwrap().body;

    assert_eq!(first, second);
    assert_eq!(g.arena().len(), 1);
}

#[test]
fn matching_is_unaffected_by_interning() {
    let rules = [
        "<digit> ::= '0' ... '9'",
        "<num> ::= <digit> { <digit> }",
        "<pair> ::= <num> ',' <num>",
    ];
    let mut interned = Grammar::new();
    let mut plain = Grammar::without_interning();
    for rule in rules {
        interned.add_rule(rule).unwrap();
        plain.add_rule(rule).unwrap();
    }

    for input in [b"12,345" as &[u8], b"0,0", b"12", b",5"] {
        let a = Matcher::new(&interned).parse("<pair>", input);
        let b = Matcher::new(&plain).parse("<pair>", input);
        match (a, b) {
            (Some(a), Some(b)) => {
                assert_eq!(a.consumed, b.consumed);
                assert_eq!(a.node, b.node);
            }
            (None, None) => {}
            _ => panic!("interning changed the outcome for {input:?}"),
        }
    }
}
