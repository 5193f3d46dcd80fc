use std::fmt;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    // Reserved words.
    If,
    Else,
    End,
    While,
    Loop,
    Fun,
    Return,
    New,
    Int,
    Bool,
    Char,
    String,
    True,
    False,
    And,
    Or,
    Not,

    /// Identifier.
    Id,
    /// Decimal or hexadecimal numeric literal.
    Number,
    /// Double-quoted string literal (text holds the decoded value).
    Str,

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `<>`
    Ne,

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,

    /// Logical line terminator (one or more collapsed newlines).
    Newline,
    /// End of input.
    Eof,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("end", TokenKind::End),
    ("while", TokenKind::While),
    ("loop", TokenKind::Loop),
    ("fun", TokenKind::Fun),
    ("return", TokenKind::Return),
    ("new", TokenKind::New),
    ("int", TokenKind::Int),
    ("bool", TokenKind::Bool),
    ("char", TokenKind::Char),
    ("string", TokenKind::String),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("not", TokenKind::Not),
];

impl TokenKind {
    /// Look up a reserved word.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, kind)| *kind)
    }

    /// The terminal name this kind carries in the grammar.
    #[must_use]
    pub const fn terminal(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Else => "else",
            Self::End => "end",
            Self::While => "while",
            Self::Loop => "loop",
            Self::Fun => "fun",
            Self::Return => "return",
            Self::New => "new",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::String => "string",
            Self::True => "true",
            Self::False => "false",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Id => "ID",
            Self::Number => "LITNUMERAL",
            Self::Str => "LITSTRING",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Newline => "NL",
            Self::Eof => "$",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => write!(f, "identifier"),
            Self::Number => write!(f, "numeric literal"),
            Self::Str => write!(f, "string literal"),
            Self::Newline => write!(f, "newline"),
            Self::Eof => write!(f, "end of input"),
            other => write!(f, "'{}'", other.terminal()),
        }
    }
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline | TokenKind::Eof => write!(f, "<{}>", self.kind.terminal()),
            kind => write!(f, "<{}, {:?}>", kind.terminal(), self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup() {
        assert_eq!(TokenKind::keyword("while"), Some(TokenKind::While));
        assert_eq!(TokenKind::keyword("string"), Some(TokenKind::String));
        assert_eq!(TokenKind::keyword("While"), None);
        assert_eq!(TokenKind::keyword("x"), None);
    }

    #[test]
    fn every_keyword_round_trips_through_terminal_name() {
        for (text, kind) in KEYWORDS {
            assert_eq!(TokenKind::keyword(text), Some(*kind));
            assert_eq!(kind.terminal(), *text);
        }
    }

    #[test]
    fn display_forms() {
        assert_eq!(TokenKind::End.to_string(), "'end'");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
        let tok = Token::new(TokenKind::Id, "x", Span::new(2, 3));
        assert_eq!(tok.to_string(), "<ID, \"x\">");
    }
}
