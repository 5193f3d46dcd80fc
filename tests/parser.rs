//! Parser acceptance and first-error tests.

mod common;

use common::{assert_accepts, first_error};
use mini0::{Expected, ParseErrorKind, ParseOptions, Span, TokenKind, parse, parse_with, tokenize};

fn unexpected(expected: Expected, found: TokenKind) -> ParseErrorKind {
    ParseErrorKind::Unexpected { expected, found }
}

// -----------------------------------------------------------
// Accepted programs.
// -----------------------------------------------------------

#[test]
fn parse_function_without_body() {
    assert_accepts("fun f()\nend\n");
}

#[test]
fn parse_blank_lines_everywhere() {
    assert_accepts("\n\nfun f()\n\n\n  x = 1\n\n\nend\n\n");
}

#[test]
fn parse_array_types_in_signature() {
    assert_accepts("fun f(a: int[], b: string[][]) : bool[]\n  return true\nend\n");
}

#[test]
fn parse_declarations_in_nested_blocks() {
    assert_accepts(
        "fun f()\n  if x\n    y : int\n    y = 1\n  else\n    z : char\n  end\nend\n",
    );
}

#[test]
fn parse_nested_loops_and_conditionals() {
    let src = "fun f(n: int) : int\n\
               \ti : int\n\
               \ti = 0\n\
               \twhile i < n\n\
               \t\tif i = 3\n\
               \t\t\treturn i\n\
               \t\tend\n\
               \t\ti = i + 1\n\
               \tloop\n\
               \treturn 0\n\
               end\n";
    assert_accepts(src);
}

#[test]
fn parse_call_statements() {
    assert_accepts("fun f()\n  print()\n  print(\"a\\n\", 1, g(h(2)))\nend\n");
}

#[test]
fn parse_index_chains() {
    assert_accepts("fun f()\n  a[1][2] = b[c[0]] + d[i - 1]\nend\n");
}

#[test]
fn parse_unary_chains() {
    assert_accepts("fun f()\n  x = - - not y\n  z = not (a > b)\nend\n");
}

#[test]
fn parse_globals_between_functions() {
    assert_accepts("a : int\nfun f()\nend\nb : bool\nfun g()\nend\n");
}

#[test]
fn parse_bare_return() {
    assert_accepts("fun f()\n  return\nend\n");
}

#[test]
fn parse_hex_literals() {
    assert_accepts("fun f()\n  x = 0xFF + 0x10\nend\n");
}

// -----------------------------------------------------------
// Rejected programs.
// -----------------------------------------------------------

#[test]
fn parse_missing_end_reports_end_of_input() {
    let err = first_error("fun f()\n  x = 1\n");
    assert_eq!(
        err.kind,
        unexpected(Expected::Token(TokenKind::End), TokenKind::Eof)
    );
    assert_eq!(err.span, Span::new(3, 1));
}

#[test]
fn parse_unbalanced_parentheses() {
    let err = first_error("fun f()\n  x = (1 + 2\nend\n");
    assert_eq!(
        err.kind,
        unexpected(Expected::Token(TokenKind::RParen), TokenKind::Newline)
    );
    assert_eq!(err.span, Span::new(2, 13));
}

#[test]
fn parse_missing_function_name() {
    let err = first_error("fun ()\nend\n");
    assert_eq!(
        err.kind,
        unexpected(Expected::Token(TokenKind::Id), TokenKind::LParen)
    );
}

#[test]
fn parse_trailing_comma_in_params() {
    let err = first_error("fun f(a: int, )\nend\n");
    assert_eq!(
        err.kind,
        unexpected(Expected::Token(TokenKind::Id), TokenKind::RParen)
    );
}

#[test]
fn parse_call_is_not_assignable() {
    let err = first_error("fun f()\n  g() = 1\nend\n");
    assert_eq!(
        err.kind,
        unexpected(Expected::Token(TokenKind::Newline), TokenKind::Eq)
    );
    assert_eq!(err.span, Span::new(2, 7));
}

#[test]
fn parse_keyword_is_not_an_expression() {
    let err = first_error("fun f()\n  x = end\nend\n");
    assert_eq!(err.kind, unexpected(Expected::Expression, TokenKind::End));
}

#[test]
fn parse_top_level_command_is_rejected() {
    let err = first_error("x: int\ny = 2\n");
    assert_eq!(
        err.kind,
        unexpected(Expected::Token(TokenKind::Colon), TokenKind::Eq)
    );
    assert_eq!(err.span, Span::new(2, 3));
}

#[test]
fn parse_return_needs_line_break() {
    let err = first_error("fun f()\n  return");
    assert_eq!(
        err.kind,
        unexpected(Expected::Token(TokenKind::Newline), TokenKind::Eof)
    );
}

#[test]
fn parse_stops_at_first_error() {
    let err = first_error("fun f()\n  x = \n  y = \nend\n");
    assert_eq!(err.span, Span::new(2, 7));
}

#[test]
fn parse_does_not_require_clean_scan() {
    // The parser only sees the tokens the scanner managed to produce.
    let lexed = tokenize("x : int @\n");
    assert!(!lexed.is_clean());
    assert!(parse(&lexed.tokens).accepted);
}

// -----------------------------------------------------------
// Depth bound.
// -----------------------------------------------------------

#[test]
fn parse_depth_counts_block_and_every_expression() {
    // Function block, the assignment's expression, then one per parenthesis.
    let tokens = tokenize("fun f()\n  x = ((1))\nend\n").tokens;
    assert!(parse_with(&tokens, &ParseOptions { max_depth: 4 }).accepted);

    let result = parse_with(&tokens, &ParseOptions { max_depth: 3 });
    assert_eq!(
        result.diagnostics[0].kind,
        ParseErrorKind::NestingTooDeep { limit: 3 }
    );
}

#[test]
fn parse_default_depth_at_the_boundary() {
    let nested = |n: usize| {
        format!(
            "fun f()\n  x = {}1{}\nend\n",
            "(".repeat(n),
            ")".repeat(n)
        )
    };
    // 256 levels: one block, one outer expression, 254 parentheses.
    assert!(parse(&tokenize(&nested(254)).tokens).accepted);

    let result = parse(&tokenize(&nested(255)).tokens);
    assert_eq!(
        result.diagnostics[0].kind,
        ParseErrorKind::NestingTooDeep { limit: 256 }
    );
}
