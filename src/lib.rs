//! Front-end analysis for Mini-0, a small line-oriented imperative language.
//!
//! The crate has three parts:
//!
//! - a scanner that turns source text into tokens and collects *every*
//!   lexical error in one pass,
//! - a grammar model with FIRST/FOLLOW fixed-point solvers and an LL(1)
//!   table builder that reports multiply-defined cells,
//! - a recursive-descent parser that stops at the *first* syntax error.
//!
//! # Quick start
//!
//! ## Check a program
//!
//! ```
//! use mini0::{parse, tokenize};
//!
//! let lexed = tokenize("fun main ( ) : int\n  x : int\n  x = 10\n  return x\nend\n");
//! assert!(lexed.is_clean());
//! let result = parse(&lexed.tokens);
//! assert!(result.accepted);
//! ```
//!
//! ## Inspect the grammar
//!
//! ```
//! use mini0::{grammar, Ll1Table};
//!
//! let g = grammar::mini0().unwrap();
//! let table = Ll1Table::from_grammar(&g).unwrap();
//! // Four cells need a second token of lookahead.
//! assert_eq!(table.conflicts().len(), 4);
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod batch;
pub mod grammar;
pub mod lexer;
pub mod ll1;
pub mod parser;
pub mod report;
pub mod sets;
pub mod token;

pub use grammar::{Grammar, GrammarBuilder, GrammarError, Production, Symbol, Terminal};
pub use lexer::{LexError, LexErrorKind, Lexed, tokenize};
pub use ll1::{Conflict, Ll1Table};
pub use parser::{
    Expected, ParseError, ParseErrorKind, ParseOptions, ParseResult, parse, parse_with,
};
pub use sets::{FirstSets, FollowSets};
pub use token::{Span, Token, TokenKind};

/// Unified error type covering the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Every lexical error of the input; parsing was not attempted.
    #[error("{} lexical error(s), first: {}", .0.len(), first_of(.0))]
    Lex(Vec<LexError>),
    /// The first syntax error.
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// A grammar failed to build or to stabilize.
    #[error("{0}")]
    Grammar(#[from] GrammarError),
}

fn first_of(errors: &[LexError]) -> String {
    errors.first().map(ToString::to_string).unwrap_or_default()
}

impl From<Vec<LexError>> for Error {
    fn from(errors: Vec<LexError>) -> Self {
        Self::Lex(errors)
    }
}

/// Scan and parse a source string in one step.
///
/// Returns the token stream on acceptance. Lexical errors stop the
/// pipeline before parsing.
pub fn check_str(input: &str) -> Result<Vec<Token>, Error> {
    let tokens = tokenize(input).into_result()?;
    parse(&tokens).into_result()?;
    Ok(tokens)
}
