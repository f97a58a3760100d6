//! Extraction over real parse trees, message-style grammars.

use bnfgram::{Grammar, Matcher};
use bnfgram_extract::{print_ast, Extractor};

fn grammar(rules: &[&str]) -> Grammar {
    let mut g = Grammar::new();
    for rule in rules {
        g.add_rule(rule).unwrap();
    }
    g
}

fn message_grammar() -> Grammar {
    grammar(&[
        "<letter> ::= ( 'a' ... 'z' 'A' ... 'Z' )",
        "<digit> ::= '0' ... '9'",
        "<word> ::= <letter> { <letter> }",
        "<number> ::= <digit> { <digit> }",
        "<command> ::= <word> | <number>",
        "<paramchar> ::= ( ^ ' ' )",
        "<param> ::= <paramchar> { <paramchar> }",
        "<simple> ::= <command> ' ' <param>",
    ])
}

#[test]
fn default_extraction_records_every_symbol() {
    let g = message_grammar();
    let m = Matcher::new(&g).parse("<simple>", b"JOIN #chan").unwrap();

    let data = Extractor::new().extract(&m.node);

    assert_eq!(data.first("<command>"), b"JOIN");
    assert_eq!(data.first("<word>"), b"JOIN");
    assert_eq!(data.first("<param>"), b"#chan");
    assert_eq!(data.count("<letter>"), 4);
    assert_eq!(data.count("<paramchar>"), 5);
    // the number branch lost, so no number symbols exist in the tree
    assert!(!data.has("<number>"));
    assert!(!data.has("<digit>"));
    assert_eq!(data.values.len(), 5);
}

#[test]
fn symbol_filter_narrows_the_result() {
    let g = message_grammar();
    let m = Matcher::new(&g).parse("<simple>", b"JOIN #chan").unwrap();

    let mut extractor = Extractor::new();
    extractor.set_symbols(["<command>", "<param>"]);
    let data = extractor.extract(&m.node);

    assert_eq!(data.values.len(), 2);
    assert_eq!(data.first("<command>"), b"JOIN");
    assert_eq!(data.first("<param>"), b"#chan");
}

#[test]
fn terminal_inclusion_adds_construct_leaves() {
    let g = message_grammar();
    let m = Matcher::new(&g).parse("<simple>", b"JOIN #chan").unwrap();

    let mut extractor = Extractor::new();
    extractor.include_terminals(true);
    let data = extractor.extract(&m.node);

    // the lone literal is the separating space
    assert_eq!(data.all("terminal"), &[b" ".to_vec()]);
    // one class leaf per consumed letter and parameter byte
    assert_eq!(data.count("class"), 9);
    assert_eq!(data.values.len(), 7);
}

#[test]
fn flattening_merges_repeated_values() {
    let g = message_grammar();
    let m = Matcher::new(&g).parse("<simple>", b"JOIN #chan").unwrap();

    let mut extractor = Extractor::new();
    extractor.flatten_repetitions(true);
    let data = extractor.extract(&m.node);

    // head element stays separate, the repeated tail collapses
    assert_eq!(data.all("<letter>"), &[b"J".to_vec(), b"OIN".to_vec()]);
    assert_eq!(
        data.all("<paramchar>"),
        &[b"#".to_vec(), b"chan".to_vec()]
    );
    assert_eq!(data.first("<command>"), b"JOIN");
}

#[test]
fn flattening_applies_inside_list_tails() {
    let g = grammar(&[
        "<digit> ::= '0' ... '9'",
        "<number> ::= <digit> { <digit> }",
        "<letter> ::= ( 'a' ... 'z' )",
        "<word> ::= <letter> { <letter> }",
        "<mixed> ::= <word> { ',' <number> }",
    ]);
    let m = Matcher::new(&g).parse("<mixed>", b"abc,1,22").unwrap();

    let plain = Extractor::new().extract(&m.node);
    assert_eq!(
        plain.all("<number>"),
        &[b"1".to_vec(), b"22".to_vec()]
    );

    let mut extractor = Extractor::new();
    extractor.flatten_repetitions(true);
    let data = extractor.extract(&m.node);
    assert_eq!(data.all("<number>"), &[b"122".to_vec()]);
}

#[test]
fn reconfigured_extractor_resets_cleanly() {
    let g = message_grammar();
    let m = Matcher::new(&g).parse("<simple>", b"TEST param").unwrap();

    let mut extractor = Extractor::new();
    extractor
        .set_symbols(["<command>"])
        .include_terminals(true)
        .flatten_repetitions(true);
    let configured = extractor.extract(&m.node);
    assert!(configured.has("<command>"));
    assert!(!configured.has("<param>"));

    extractor.reset_config();
    let reset = extractor.extract(&m.node);
    assert!(reset.has("<param>"));
    assert_ne!(configured.values.len(), reset.values.len());
}

#[test]
fn printed_tree_layout() {
    let g = grammar(&["<rep> ::= 'A' { 'B' }"]);
    let m = Matcher::new(&g).parse("<rep>", b"ABB").unwrap();

    insta::assert_snapshot!(print_ast(&m.node), @r###"
    sequence  [matched="ABB"]
      terminal  [matched="A"]
      repeat  [matched="BB"]
        terminal  [matched="B"]
        terminal  [matched="B"]
    "###);
}

#[test]
fn printed_symbol_nodes_keep_their_delimiters() {
    let g = grammar(&["<bit> ::= '0' | '1'", "<pair> ::= <bit> <bit>"]);
    let m = Matcher::new(&g).parse("<pair>", b"10").unwrap();

    insta::assert_snapshot!(print_ast(&m.node), @r###"
    sequence  [matched="10"]
      <bit>  [matched="1"]
        terminal  [matched="1"]
      <bit>  [matched="0"]
        terminal  [matched="0"]
    "###);
}
