use std::fmt;

use crate::token::{Span, Token, TokenKind};

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// One specific token kind.
    Token(TokenKind),
    /// A base type: `int`, `bool`, `char` or `string`.
    Type,
    /// The start of an expression.
    Expression,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(kind) => write!(f, "{kind}"),
            Self::Type => write!(f, "a type (int, bool, char, string)"),
            Self::Expression => write!(f, "an expression"),
        }
    }
}

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The current token does not fit the construct being parsed.
    Unexpected { expected: Expected, found: TokenKind },
    /// Expressions or blocks nest deeper than [`ParseOptions::max_depth`].
    NestingTooDeep { limit: usize },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unexpected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::NestingTooDeep { limit } => {
                write!(f, "nesting deeper than {limit} levels")
            }
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error: {kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Parser tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of expressions and blocks.
    ///
    /// Every block counts one level, function bodies included, and so
    /// does every expression, including the outermost one of a command.
    /// `x = (1)` inside a function therefore needs three levels.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

/// Outcome of one parse.
///
/// Parsing stops at the first error, so `diagnostics` holds at most one
/// entry, and it is non-empty exactly when `accepted` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub accepted: bool,
    pub diagnostics: Vec<ParseError>,
}

impl ParseResult {
    /// `Ok` on acceptance, otherwise the diagnostic that aborted the parse.
    pub fn into_result(self) -> Result<(), ParseError> {
        self.diagnostics.into_iter().next().map_or(Ok(()), Err)
    }
}

/// Parse a Mini-0 token stream with default options.
#[must_use]
pub fn parse(tokens: &[Token]) -> ParseResult {
    parse_with(tokens, &ParseOptions::default())
}

/// Parse a Mini-0 token stream.
///
/// A missing trailing `Eof` token is implied.
#[must_use]
pub fn parse_with(tokens: &[Token], options: &ParseOptions) -> ParseResult {
    Parser::new(tokens, options).parse()
}

type Step = Result<(), ParseError>;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    max_depth: usize,
    eof: Token,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], options: &ParseOptions) -> Self {
        let span = tokens.last().map_or_else(Span::default, |t| t.span);
        Self {
            tokens,
            pos: 0,
            depth: 0,
            max_depth: options.max_depth,
            eof: Token::new(TokenKind::Eof, "", span),
        }
    }

    fn parse(mut self) -> ParseResult {
        match self.program() {
            Ok(()) => ParseResult {
                accepted: true,
                diagnostics: Vec::new(),
            },
            Err(err) => {
                tracing::debug!(%err, "parse aborted");
                ParseResult {
                    accepted: false,
                    diagnostics: vec![err],
                }
            }
        }
    }

    // -- cursor --

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Kind of the token `offset` places ahead, without consuming anything.
    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn at(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind())
    }

    fn advance(&mut self) {
        if self.kind() != TokenKind::Eof {
            self.pos += 1;
        }
    }

    fn unexpected(&self, expected: Expected) -> ParseError {
        let token = self.current();
        ParseError {
            kind: ParseErrorKind::Unexpected {
                expected,
                found: token.kind,
            },
            span: token.span,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Step {
        if self.kind() != kind {
            return Err(self.unexpected(Expected::Token(kind)));
        }
        self.advance();
        Ok(())
    }

    /// nl → NL nl_rest
    fn expect_newline(&mut self) -> Step {
        self.expect(TokenKind::Newline)?;
        self.skip_newlines();
        Ok(())
    }

    fn skip_newlines(&mut self) {
        while self.kind() == TokenKind::Newline {
            self.advance();
        }
    }

    fn nested(&mut self, rule: impl FnOnce(&mut Self) -> Step) -> Step {
        if self.depth >= self.max_depth {
            return Err(ParseError {
                kind: ParseErrorKind::NestingTooDeep {
                    limit: self.max_depth,
                },
                span: self.current().span,
            });
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    // -- declarations --

    /// programa → nls decl_list, then trailing blank lines and end of input.
    fn program(&mut self) -> Step {
        self.skip_newlines();
        while self.at(&[TokenKind::Fun, TokenKind::Id]) {
            if self.kind() == TokenKind::Fun {
                self.function()?;
            } else {
                self.global()?;
            }
        }
        self.skip_newlines();
        self.expect(TokenKind::Eof)
    }

    /// global → declvar nl
    fn global(&mut self) -> Step {
        self.var_decl()?;
        self.expect_newline()
    }

    /// funcion → fun ID ( params ) tipo_ret nl bloque end nl
    fn function(&mut self) -> Step {
        self.expect(TokenKind::Fun)?;
        self.expect(TokenKind::Id)?;
        self.expect(TokenKind::LParen)?;
        self.params()?;
        self.expect(TokenKind::RParen)?;
        if self.kind() == TokenKind::Colon {
            self.advance();
            self.ty()?;
        }
        self.expect_newline()?;
        self.block()?;
        self.expect(TokenKind::End)?;
        self.expect_newline()
    }

    /// params → parametro params_rest | ε
    fn params(&mut self) -> Step {
        if self.kind() != TokenKind::Id {
            return Ok(());
        }
        self.var_decl()?;
        while self.kind() == TokenKind::Comma {
            self.advance();
            self.var_decl()?;
        }
        Ok(())
    }

    /// declvar → ID : tipo (also parametro)
    fn var_decl(&mut self) -> Step {
        self.expect(TokenKind::Id)?;
        self.expect(TokenKind::Colon)?;
        self.ty()
    }

    /// tipo → tipobase tipo_array
    fn ty(&mut self) -> Step {
        if !self.at(&[
            TokenKind::Int,
            TokenKind::Bool,
            TokenKind::Char,
            TokenKind::String,
        ]) {
            return Err(self.unexpected(Expected::Type));
        }
        self.advance();
        while self.kind() == TokenKind::LBracket {
            self.advance();
            self.expect(TokenKind::RBracket)?;
        }
        Ok(())
    }

    // -- blocks and commands --

    /// bloque → declvars comandos
    fn block(&mut self) -> Step {
        self.nested(|p| {
            // An identifier followed by `:` opens a declaration; anything
            // else ends the declaration list.
            while p.kind() == TokenKind::Id && p.peek_kind(1) == TokenKind::Colon {
                p.var_decl()?;
                p.expect_newline()?;
            }
            while p.at(&[
                TokenKind::If,
                TokenKind::While,
                TokenKind::Return,
                TokenKind::Id,
            ]) {
                p.command()?;
                p.expect_newline()?;
            }
            Ok(())
        })
    }

    /// comando → cmdif | cmdwhile | cmdatrib | cmdreturn | llamada
    fn command(&mut self) -> Step {
        match self.kind() {
            TokenKind::If => self.if_command(),
            TokenKind::While => self.while_command(),
            TokenKind::Return => self.return_command(),
            _ if self.peek_kind(1) == TokenKind::LParen => self.call(),
            _ => self.assignment(),
        }
    }

    /// cmdif → if exp nl bloque elseif_list else_opt end
    fn if_command(&mut self) -> Step {
        self.expect(TokenKind::If)?;
        self.expression()?;
        self.expect_newline()?;
        self.block()?;

        while self.kind() == TokenKind::Else && self.peek_kind(1) == TokenKind::If {
            self.advance();
            self.advance();
            self.expression()?;
            self.expect_newline()?;
            self.block()?;
        }

        if self.kind() == TokenKind::Else {
            self.advance();
            self.expect_newline()?;
            self.block()?;
        }

        self.expect(TokenKind::End)
    }

    /// cmdwhile → while exp nl bloque loop
    fn while_command(&mut self) -> Step {
        self.expect(TokenKind::While)?;
        self.expression()?;
        self.expect_newline()?;
        self.block()?;
        self.expect(TokenKind::Loop)
    }

    /// cmdatrib → var = exp
    fn assignment(&mut self) -> Step {
        self.var()?;
        self.expect(TokenKind::Eq)?;
        self.expression()
    }

    /// cmdreturn → return exp_opt
    fn return_command(&mut self) -> Step {
        self.expect(TokenKind::Return)?;
        if self.at(&[TokenKind::Newline, TokenKind::Eof]) {
            return Ok(());
        }
        self.expression()
    }

    /// var → ID var_index
    fn var(&mut self) -> Step {
        self.expect(TokenKind::Id)?;
        while self.kind() == TokenKind::LBracket {
            self.advance();
            self.expression()?;
            self.expect(TokenKind::RBracket)?;
        }
        Ok(())
    }

    /// llamada → ID ( listaexp )
    fn call(&mut self) -> Step {
        self.expect(TokenKind::Id)?;
        self.expect(TokenKind::LParen)?;
        if self.kind() != TokenKind::RParen {
            self.expression()?;
            while self.kind() == TokenKind::Comma {
                self.advance();
                self.expression()?;
            }
        }
        self.expect(TokenKind::RParen)
    }

    // -- expressions, lowest precedence first --

    /// exp → exp_or
    fn expression(&mut self) -> Step {
        self.nested(Self::or_expr)
    }

    /// Shared shape of every `exp_x → operand exp_x_prime` level.
    fn binary_level(&mut self, operators: &[TokenKind], operand: fn(&mut Self) -> Step) -> Step {
        operand(self)?;
        while self.at(operators) {
            self.advance();
            operand(self)?;
        }
        Ok(())
    }

    fn or_expr(&mut self) -> Step {
        self.binary_level(&[TokenKind::Or], Self::and_expr)
    }

    fn and_expr(&mut self) -> Step {
        self.binary_level(&[TokenKind::And], Self::eq_expr)
    }

    fn eq_expr(&mut self) -> Step {
        self.binary_level(&[TokenKind::Eq, TokenKind::Ne], Self::rel_expr)
    }

    fn rel_expr(&mut self) -> Step {
        self.binary_level(
            &[TokenKind::Gt, TokenKind::Lt, TokenKind::Ge, TokenKind::Le],
            Self::add_expr,
        )
    }

    fn add_expr(&mut self) -> Step {
        self.binary_level(&[TokenKind::Plus, TokenKind::Minus], Self::mul_expr)
    }

    fn mul_expr(&mut self) -> Step {
        self.binary_level(&[TokenKind::Star, TokenKind::Slash], Self::unary)
    }

    /// exp_unary → not exp_unary | - exp_unary | exp_primary
    fn unary(&mut self) -> Step {
        while self.at(&[TokenKind::Not, TokenKind::Minus]) {
            self.advance();
        }
        self.primary()
    }

    /// exp_primary → LITNUMERAL | LITSTRING | true | false | var
    ///             | new [ exp ] tipo | ( exp ) | llamada
    fn primary(&mut self) -> Step {
        match self.kind() {
            TokenKind::Number | TokenKind::Str | TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(())
            }
            TokenKind::New => {
                self.advance();
                self.expect(TokenKind::LBracket)?;
                self.expression()?;
                self.expect(TokenKind::RBracket)?;
                self.ty()
            }
            TokenKind::LParen => {
                self.advance();
                self.expression()?;
                self.expect(TokenKind::RParen)
            }
            TokenKind::Id if self.peek_kind(1) == TokenKind::LParen => self.call(),
            TokenKind::Id => self.var(),
            _ => Err(self.unexpected(Expected::Expression)),
        }
    }
}
