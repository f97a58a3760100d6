use std::{
    env::args,
    io::Read,
    path::{Path, PathBuf},
};

use bnfgram::{Grammar, Matcher};
use bnfgram_extract::{print_ast, Extractor};
use bstr::BStr;

trait IoError<T> {
    fn pretty_error(self, path: &Path, message: &str) -> Result<T, ()>;
}

impl<T> IoError<T> for std::io::Result<T> {
    fn pretty_error(self, path: &Path, message: &str) -> Result<T, ()> {
        self.map_err(|e| {
            let path = path.display();
            eprintln!("{message} `{path}`\n  {e}");
        })
    }
}

fn main() {
    if run().is_err() {
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "\
usage: bnfgram-cli [options] <grammar-file> <rule> [input]

Compiles the grammar file (one `<name> ::= body` rule per line, `#`
comments allowed) and matches <rule> against the input. When no input
argument is given it is read from stdin.

options:
  --tree       print the parse tree
  --grammar    print the compiled rules
  --extract    print values extracted per symbol
  --no-intern  disable expression sharing
  --showcase   run a built-in demonstration and exit"
    );
}

fn run() -> Result<(), ()> {
    let args = args().skip(1).collect::<Vec<_>>();

    let mut do_tree = false;
    let mut do_grammar = false;
    let mut do_extract = false;
    let mut no_intern = false;
    let mut do_showcase = false;

    let mut positional = Vec::new();

    for arg in args.iter().map(String::as_str) {
        match arg {
            "--tree" => do_tree = true,
            "--grammar" => do_grammar = true,
            "--extract" => do_extract = true,
            "--no-intern" => no_intern = true,
            "--showcase" => do_showcase = true,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            _ if arg.starts_with('-') => {
                eprintln!("Unknown option `{arg}`");
                return Err(());
            }
            _ => positional.push(arg),
        }
    }

    if do_showcase {
        return showcase();
    }

    if positional.is_empty() || positional.len() > 3 {
        print_usage();
        return Err(());
    }

    let path: PathBuf = positional[0].into();
    let grammar = load_grammar(&path, no_intern)?;

    if do_grammar {
        let mut out = String::new();
        // writing to a String cannot fail
        let _ = grammar.display_into(&mut out);
        print!("{out}");
    }

    let Some(&rule) = positional.get(1) else {
        // grammar dump only
        if !do_grammar {
            print_usage();
            return Err(());
        }
        return Ok(());
    };

    let input = match positional.get(2) {
        Some(text) => text.as_bytes().to_vec(),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .pretty_error(Path::new("<stdin>"), "Failed to read")?;
            buf
        }
    };

    let matcher = Matcher::new(&grammar);
    let Some(m) = matcher.parse(rule, &input) else {
        eprintln!("no match for {rule}");
        return Err(());
    };

    println!("matched {} of {} bytes", m.consumed, input.len());

    if do_tree {
        print!("{}", print_ast(&m.node));
    }

    if do_extract {
        let data = Extractor::new().extract(&m.node);
        for (symbol, values) in &data.values {
            for value in values {
                println!("{symbol} = \"{}\"", BStr::new(value));
            }
        }
    }

    Ok(())
}

/// One rule per line; blank lines and `#` comments are skipped.
fn load_grammar(path: &Path, no_intern: bool) -> Result<Grammar, ()> {
    let src = std::fs::read_to_string(path).pretty_error(path, "Failed to read")?;

    let mut grammar = match no_intern {
        true => Grammar::without_interning(),
        false => Grammar::new(),
    };

    for (index, line) in src.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        grammar.add_rule(line).map_err(|e| {
            let path = path.display();
            eprintln!("{path}:{}: {e}", index + 1);
        })?;
    }

    Ok(grammar)
}

fn showcase() -> Result<(), ()> {
    let rules = [
        "<lower> ::= 'a' ... 'z'",
        "<digit> ::= '0' ... '9'",
        "<vowel> ::= ( 'a' 'e' 'i' 'o' 'u' )",
        "<consonant> ::= ( ^ 'a' 'e' 'i' 'o' 'u' ' ' )",
        "<word> ::= <lower> { <lower> }",
        "<number> ::= <digit> { <digit> }",
        "<token> ::= <word> | <number>",
        "<list> ::= <token> { ',' <token> }",
    ];

    let mut grammar = Grammar::new();
    for rule in rules {
        // the built-in rules are well formed, but keep the error path honest
        grammar.add_rule(rule).map_err(|e| eprintln!("{e}"))?;
    }

    let matcher = Matcher::new(&grammar);

    println!("rules:");
    for rule in rules {
        println!("  {rule}");
    }

    let demos: &[(&str, &[u8])] = &[
        ("<lower>", b"m"),
        ("<vowel>", b"i"),
        ("<consonant>", b"a"),
        ("<word>", b"hello world"),
        ("<list>", b"abc,123,de"),
    ];

    for &(rule, input) in demos {
        println!("\n{rule} on \"{}\":", BStr::new(input));
        match matcher.parse(rule, input) {
            None => println!("  no match"),
            Some(m) => {
                println!("  consumed {} bytes", m.consumed);
                for line in print_ast(&m.node).lines() {
                    println!("  {line}");
                }
            }
        }
    }

    let input = b"abc,123,de";
    if let Some(m) = matcher.parse("<list>", input) {
        println!("\nextracted from \"{}\":", BStr::new(input));
        let data = Extractor::new().extract(&m.node);
        for (symbol, values) in &data.values {
            for value in values {
                println!("  {symbol} = \"{}\"", BStr::new(value));
            }
        }
    }

    Ok(())
}
