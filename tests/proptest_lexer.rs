//! Property-based tests for the scanner.

use mini0::{TokenKind, tokenize};
use proptest::prelude::*;

// -- Strategies --

/// Something that may sit on a line without producing a token.
fn filler() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", " ", "\t", "\r", "// note", "/* x */", "  /* a */ // b"])
}

/// One or more line breaks, each preceded by filler.
fn blank_run() -> impl Strategy<Value = String> {
    prop::collection::vec(filler(), 1..=8)
        .prop_map(|parts| parts.iter().map(|p| format!("{p}\n")).collect::<String>())
}

/// Lowercase word that may or may not be a keyword.
fn word() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,10}".prop_map(|s| s)
}

// -- Property tests --

proptest! {
    /// Any input scans to a stream ending in exactly one `Eof`.
    #[test]
    fn scan_is_total(input in any::<String>()) {
        let lexed = tokenize(&input);
        prop_assert_eq!(lexed.tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        let eofs = lexed.tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eofs, 1);
    }

    /// Newline tokens never come in pairs.
    #[test]
    fn newlines_never_repeat(input in "[a-z0-9 \n\t/*+\"@]{0,60}") {
        let lexed = tokenize(&input);
        for pair in lexed.tokens.windows(2) {
            prop_assert!(
                !(pair[0].kind == TokenKind::Newline && pair[1].kind == TokenKind::Newline),
                "adjacent newlines in {:?}", input
            );
        }
    }

    /// Blank lines, whitespace, and comments between two words collapse
    /// into one newline token.
    #[test]
    fn blank_runs_collapse(run in blank_run()) {
        let input = format!("a{run}b");
        let kinds: Vec<TokenKind> = tokenize(&input).tokens.iter().map(|t| t.kind).collect();
        prop_assert_eq!(
            kinds,
            vec![TokenKind::Id, TokenKind::Newline, TokenKind::Id, TokenKind::Eof]
        );
    }

    /// A lone word is one identifier or one keyword, text preserved.
    #[test]
    fn word_is_one_token(w in word()) {
        let lexed = tokenize(&w);
        prop_assert!(lexed.is_clean());
        prop_assert_eq!(lexed.tokens.len(), 2);
        let expected = TokenKind::keyword(&w).unwrap_or(TokenKind::Id);
        prop_assert_eq!(lexed.tokens[0].kind, expected);
        prop_assert_eq!(&lexed.tokens[0].text, &w);
    }

    /// Decimal literals keep their digits.
    #[test]
    fn decimal_literal(digits in "[0-9]{1,12}") {
        let lexed = tokenize(&digits);
        prop_assert!(lexed.is_clean());
        prop_assert_eq!(lexed.tokens[0].kind, TokenKind::Number);
        prop_assert_eq!(&lexed.tokens[0].text, &digits);
    }

    /// Printable strings without quotes or backslashes scan cleanly.
    #[test]
    fn plain_string_literal(body in "[a-zA-Z0-9 .,:;!?-]{0,30}") {
        let lexed = tokenize(&format!("\"{body}\""));
        prop_assert!(lexed.is_clean());
        prop_assert_eq!(lexed.tokens[0].kind, TokenKind::Str);
        prop_assert_eq!(&lexed.tokens[0].text, &body);
    }
}
