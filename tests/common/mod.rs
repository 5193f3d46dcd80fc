#![allow(dead_code)]

use mini0::{Grammar, Ll1Table, grammar};
use mini0::{ParseError, ParseResult, TokenKind, parse, tokenize};

/// Scan `input`, asserting it is lexically clean, then parse it.
pub fn parse_clean(input: &str) -> ParseResult {
    let lexed = tokenize(input);
    assert!(
        lexed.is_clean(),
        "unexpected lex errors for:\n{input}\n{:?}",
        lexed.errors
    );
    parse(&lexed.tokens)
}

/// Assert the whole pipeline accepts `input`.
pub fn assert_accepts(input: &str) {
    let result = parse_clean(input);
    assert!(
        result.accepted,
        "expected acceptance:\n--- input ---\n{input}\n--- diagnostics ---\n{:?}",
        result.diagnostics
    );
}

/// The single diagnostic of a rejected program.
pub fn first_error(input: &str) -> ParseError {
    let result = parse_clean(input);
    assert!(!result.accepted, "expected rejection:\n{input}");
    assert_eq!(result.diagnostics.len(), 1);
    result.diagnostics[0].clone()
}

/// Token kinds of `input`, including the trailing `Eof`.
pub fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).tokens.iter().map(|t| t.kind).collect()
}

/// The Mini-0 grammar and its table.
pub fn mini0_table() -> (Grammar, Ll1Table) {
    let g = grammar::mini0().expect("mini0 grammar builds");
    let table = Ll1Table::from_grammar(&g).expect("mini0 sets stabilize");
    (g, table)
}
