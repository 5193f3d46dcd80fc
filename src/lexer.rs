use std::fmt;

use crate::token::{Span, Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Character that cannot start any token.
    UnrecognizedCharacter(char),
    /// String literal cut short by a raw newline or end of input.
    UnterminatedString,
    /// Escape sequence other than `\n`, `\t`, `\\`, `\"`.
    InvalidEscape(char),
    /// `/*` without a matching `*/`.
    UnterminatedComment,
    /// `0x` not followed by any hexadecimal digit.
    MalformedHex,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedCharacter(ch) => {
                write!(f, "unrecognized character: {ch:?}")
            }
            Self::UnterminatedString => {
                write!(f, "unterminated string literal")
            }
            Self::InvalidEscape(ch) => {
                write!(f, "invalid escape sequence: \\{ch}")
            }
            Self::UnterminatedComment => {
                write!(f, "unterminated block comment")
            }
            Self::MalformedHex => {
                write!(f, "hexadecimal literal without digits")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lexical error: {kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Output of a scan: the token stream and every lexical diagnostic.
///
/// `tokens` always ends with exactly one [`TokenKind::Eof`] token, no
/// matter how many diagnostics were recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl Lexed {
    /// True when the scan produced no diagnostics.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into the token stream, or every diagnostic if there were any.
    pub fn into_result(self) -> Result<Vec<Token>, Vec<LexError>> {
        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }
}

/// Tokenize Mini-0 source text.
///
/// Never fails: malformed input is reported in [`Lexed::errors`] and
/// scanning resumes at the next character.
#[must_use]
pub fn tokenize(input: &str) -> Lexed {
    Lexer::new(input).tokenize()
}

struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl Lexer {
    fn new(input: &str) -> Self {
        let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
        Self {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn tokenize(mut self) -> Lexed {
        while let Some(ch) = self.peek() {
            let start = self.span();
            match ch {
                ' ' | '\t' | '\r' => self.advance(),
                '\n' => {
                    self.advance();
                    // Consecutive terminators collapse into one token.
                    if !self.last_is_newline() {
                        self.push(TokenKind::Newline, "\n", start);
                    }
                }
                '/' if self.peek_at(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.skip_block_comment(),
                '"' => self.read_string(),
                c if c.is_ascii_digit() => self.read_number(),
                c if c.is_ascii_alphabetic() || c == '_' => self.read_word(),
                _ => self.read_operator(ch, start),
            }
        }

        let end = self.span();
        self.push(TokenKind::Eof, "", end);
        tracing::trace!(
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            "scan finished"
        );

        Lexed {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    const fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.col,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    fn last_is_newline(&self) -> bool {
        self.tokens
            .last()
            .is_some_and(|t| t.kind == TokenKind::Newline)
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, span: Span) {
        let token = Token::new(kind, text, span);
        tracing::trace!(%token, line = span.line, column = span.column, "token");
        self.tokens.push(token);
    }

    fn error(&mut self, kind: LexErrorKind, span: Span) {
        tracing::trace!(%kind, line = span.line, column = span.column, "lexical error");
        self.errors.push(LexError { kind, span });
    }

    fn skip_line_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.span();
        self.advance(); // skip /
        self.advance(); // skip *

        while let Some(ch) = self.peek() {
            if ch == '*' && self.peek_at(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }

        self.error(LexErrorKind::UnterminatedComment, start);
    }

    fn read_string(&mut self) {
        let start = self.span();
        self.advance(); // skip opening quote

        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error(LexErrorKind::UnterminatedString, start);
                    break;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let escape_at = self.span();
                    match self.peek_at(1) {
                        None | Some('\n') => {
                            // The literal ends here; the backslash is dropped.
                            self.advance();
                            self.error(LexErrorKind::UnterminatedString, start);
                            break;
                        }
                        Some(c) => {
                            self.advance();
                            self.advance();
                            match c {
                                'n' => value.push('\n'),
                                't' => value.push('\t'),
                                '\\' => value.push('\\'),
                                '"' => value.push('"'),
                                other => {
                                    self.error(LexErrorKind::InvalidEscape(other), escape_at);
                                }
                            }
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        self.push(TokenKind::Str, value, start);
    }

    fn read_number(&mut self) {
        let start = self.span();
        let begin = self.pos;

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X')) {
            self.advance();
            self.advance();
            if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.error(LexErrorKind::MalformedHex, start);
            }
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
        } else {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text: String = self.input[begin..self.pos].iter().collect();
        self.push(TokenKind::Number, text, start);
    }

    fn read_word(&mut self) {
        let start = self.span();
        let begin = self.pos;

        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text: String = self.input[begin..self.pos].iter().collect();
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Id);
        self.push(kind, text, start);
    }

    fn read_operator(&mut self, ch: char, start: Span) {
        // Two-character operators take priority over their prefixes.
        let double = match (ch, self.peek_at(1)) {
            ('>', Some('=')) => Some((TokenKind::Ge, ">=")),
            ('<', Some('=')) => Some((TokenKind::Le, "<=")),
            ('<', Some('>')) => Some((TokenKind::Ne, "<>")),
            _ => None,
        };
        if let Some((kind, text)) = double {
            self.advance();
            self.advance();
            self.push(kind, text, start);
            return;
        }

        let single = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '>' => TokenKind::Gt,
            '<' => TokenKind::Lt,
            '=' => TokenKind::Eq,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            other => {
                self.advance();
                self.error(LexErrorKind::UnrecognizedCharacter(other), start);
                return;
            }
        };

        self.advance();
        self.push(single, ch.to_string(), start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn declaration_line() {
        let lexed = tokenize("x : int\n");
        assert!(lexed.is_clean());
        assert_eq!(
            kinds("x : int\n"),
            vec![
                TokenKind::Id,
                TokenKind::Colon,
                TokenKind::Int,
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
        assert_eq!(lexed.tokens[0].text, "x");
    }

    #[test]
    fn two_char_operators_win() {
        assert_eq!(
            kinds(">= <= <> > < ="),
            vec![
                TokenKind::Ge,
                TokenKind::Le,
                TokenKind::Ne,
                TokenKind::Gt,
                TokenKind::Lt,
                TokenKind::Eq,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("if iff _x end9 not"),
            vec![
                TokenKind::If,
                TokenKind::Id,
                TokenKind::Id,
                TokenKind::Id,
                TokenKind::Not,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn hex_and_decimal() {
        let lexed = tokenize("0x1F 42 0");
        assert!(lexed.is_clean());
        let texts: Vec<_> = lexed.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["0x1F", "42", "0", ""]);
    }

    #[test]
    fn malformed_hex_still_emits_literal() {
        let lexed = tokenize("0xg");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].kind, LexErrorKind::MalformedHex);
        assert_eq!(lexed.tokens[0].kind, TokenKind::Number);
        assert_eq!(lexed.tokens[0].text, "0x");
        assert_eq!(lexed.tokens[1].text, "g");
    }

    #[test]
    fn string_escapes() {
        let lexed = tokenize(r#""a\tb\n\\\"""#);
        assert!(lexed.is_clean());
        assert_eq!(lexed.tokens[0].kind, TokenKind::Str);
        assert_eq!(lexed.tokens[0].text, "a\tb\n\\\"");
    }

    #[test]
    fn invalid_escape_consumes_both_characters() {
        let lexed = tokenize(r#""a\qb""#);
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].kind, LexErrorKind::InvalidEscape('q'));
        assert_eq!(lexed.errors[0].span, Span::new(1, 3));
        assert_eq!(lexed.tokens[0].text, "ab");
    }

    #[test]
    fn string_cut_at_newline() {
        let lexed = tokenize("\"abc\nx");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedString);
        assert_eq!(lexed.errors[0].span, Span::new(1, 1));
        assert_eq!(lexed.tokens[0].text, "abc");
        assert_eq!(lexed.tokens[1].kind, TokenKind::Newline);
        assert_eq!(lexed.tokens[2].kind, TokenKind::Id);
    }

    #[test]
    fn comments_are_discarded() {
        assert_eq!(
            kinds("a // note\n/* block\n comment */ b"),
            vec![TokenKind::Id, TokenKind::Newline, TokenKind::Id, TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_block_comment() {
        let lexed = tokenize("a /* never closed\nb c");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedComment);
        assert_eq!(lexed.errors[0].span, Span::new(1, 3));
        assert_eq!(
            lexed.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Id, TokenKind::Eof]
        );
    }

    #[test]
    fn newline_runs_collapse() {
        assert_eq!(
            kinds("a\n\n  \n// c\n\t/* d */\nb"),
            vec![TokenKind::Id, TokenKind::Newline, TokenKind::Id, TokenKind::Eof]
        );
    }

    #[test]
    fn unrecognized_character_between_newlines() {
        let lexed = tokenize("a\n@\nb");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(
            lexed.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Id, TokenKind::Newline, TokenKind::Id, TokenKind::Eof]
        );
    }

    #[test]
    fn span_tracking() {
        let lexed = tokenize("ab\n  cd");
        assert_eq!(lexed.tokens[0].span, Span::new(1, 1));
        assert_eq!(lexed.tokens[1].span, Span::new(1, 3));
        assert_eq!(lexed.tokens[2].span, Span::new(2, 3));
        assert_eq!(lexed.tokens[3].span, Span::new(2, 5));
    }

    #[test]
    fn into_result() {
        assert!(tokenize("x").into_result().is_ok());
        let errs = tokenize("$ #").into_result().unwrap_err();
        assert_eq!(errs.len(), 2);
    }
}
