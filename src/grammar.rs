//! Context-free grammar model.
//!
//! A rule maps a non-terminal to one or more productions (alternatives). A
//! production is a possibly empty ordered sequence of symbols; the empty
//! production is written `ε`. Terminals share their names with
//! [`TokenKind::terminal`](crate::TokenKind::terminal), so grammar
//! terminals and scanner output speak one vocabulary.
//!
//! Grammars are immutable once built. All collections are ordered, so
//! every derived computation (FIRST/FOLLOW, the LL(1) table, rendering)
//! is deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::token::TokenKind;

/// Name of the empty-string marker in rule alternatives.
pub const EPSILON: &str = "ε";
/// Name of the end-of-input marker.
pub const END_MARKER: &str = "$";

/// A terminal of the grammar, or one of the two logical markers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Terminal {
    /// A concrete token, by grammar name (`"if"`, `"ID"`, `">="`, ...).
    Token(String),
    /// The empty-string marker; only ever appears in FIRST sets.
    Epsilon,
    /// The end-marker; only ever appears in FOLLOW sets and table columns.
    End,
}

impl Terminal {
    #[must_use]
    pub fn token(name: impl Into<String>) -> Self {
        Self::Token(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Token(name) => name,
            Self::Epsilon => EPSILON,
            Self::End => END_MARKER,
        }
    }
}

impl From<TokenKind> for Terminal {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Eof => Self::End,
            other => Self::Token(other.terminal().to_string()),
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A grammar symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(Terminal),
    NonTerminal(String),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(t) => t.fmt(f),
            Self::NonTerminal(name) => f.write_str(name),
        }
    }
}

/// One alternative of a rule: `head → body`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Production {
    pub head: String,
    pub body: Vec<Symbol>,
}

impl Production {
    /// True for the empty production `head → ε`.
    #[must_use]
    pub fn is_epsilon(&self) -> bool {
        self.body.is_empty()
    }

    /// The right-hand side rendered with single spaces, `ε` when empty.
    #[must_use]
    pub fn rhs(&self) -> String {
        if self.body.is_empty() {
            return EPSILON.to_string();
        }
        self.body
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.head, self.rhs())
    }
}

/// Which family of sets a fixed-point computation was solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetKind {
    First,
    Follow,
}

impl fmt::Display for SetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "FIRST"),
            Self::Follow => write!(f, "FOLLOW"),
        }
    }
}

/// Error produced while building or analysing a grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// The start symbol heads no rule.
    #[error("start symbol '{0}' is not a declared non-terminal")]
    UnknownStart(String),
    /// A production mentions a name that is neither a rule head nor a
    /// declared terminal.
    #[error("rule '{head}' references undeclared symbol '{symbol}'")]
    UndeclaredSymbol { head: String, symbol: String },
    /// A name is both a declared terminal and a rule head.
    #[error("'{0}' is declared both as a terminal and as a non-terminal")]
    AmbiguousSymbol(String),
    /// A rule was given no alternatives.
    #[error("rule '{0}' has no alternatives")]
    EmptyRule(String),
    /// The sweep ceiling was reached while sets were still growing.
    #[error("{sets} sets did not stabilize within {ceiling} sweeps")]
    FixedPointNotReached { sets: SetKind, ceiling: usize },
}

/// An immutable context-free grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    start: String,
    terminals: BTreeSet<String>,
    rules: BTreeMap<String, Vec<Production>>,
}

impl Grammar {
    /// Start a new grammar with the given start symbol.
    #[must_use]
    pub fn builder(start: &str) -> GrammarBuilder {
        GrammarBuilder::new(start)
    }

    #[must_use]
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Non-terminals in name order.
    pub fn non_terminals(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Declared terminals in name order (markers excluded).
    pub fn terminals(&self) -> impl Iterator<Item = &str> {
        self.terminals.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    #[must_use]
    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminals.contains(name)
    }

    /// Alternatives of `non_terminal`, in declaration order.
    #[must_use]
    pub fn productions_of(&self, non_terminal: &str) -> &[Production] {
        self.rules.get(non_terminal).map_or(&[], Vec::as_slice)
    }

    /// Every production, grouped by head in name order.
    pub fn productions(&self) -> impl Iterator<Item = &Production> {
        self.rules.values().flatten()
    }

    #[must_use]
    pub fn production_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }
}

/// Builder for [`Grammar`].
///
/// Alternatives are given as lists of names; an empty list or the single
/// name [`EPSILON`] denotes the empty production. Names are resolved when
/// [`build`](Self::build) runs, so rules may be declared in any order.
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    start: String,
    terminals: BTreeSet<String>,
    rules: Vec<(String, Vec<Vec<String>>)>,
}

impl GrammarBuilder {
    fn new(start: &str) -> Self {
        Self {
            start: start.to_string(),
            terminals: BTreeSet::new(),
            rules: Vec::new(),
        }
    }

    /// Declare one terminal.
    #[must_use]
    pub fn terminal(mut self, name: &str) -> Self {
        self.terminals.insert(name.to_string());
        self
    }

    /// Declare several terminals.
    #[must_use]
    pub fn terminals<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.terminals.extend(names.into_iter().map(str::to_string));
        self
    }

    /// Add a rule. Repeating a head appends further alternatives.
    #[must_use]
    pub fn rule(mut self, head: &str, alternatives: &[&[&str]]) -> Self {
        let alternatives = alternatives
            .iter()
            .map(|alt| alt.iter().map(|s| (*s).to_string()).collect())
            .collect();
        self.rules.push((head.to_string(), alternatives));
        self
    }

    /// Resolve every name and produce the grammar.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let heads: BTreeSet<&str> = self.rules.iter().map(|(h, _)| h.as_str()).collect();

        if let Some(both) = self.terminals.iter().find(|t| heads.contains(t.as_str())) {
            return Err(GrammarError::AmbiguousSymbol(both.clone()));
        }
        if !heads.contains(self.start.as_str()) {
            return Err(GrammarError::UnknownStart(self.start));
        }

        let mut rules: BTreeMap<String, Vec<Production>> = BTreeMap::new();
        for (head, alternatives) in &self.rules {
            if alternatives.is_empty() {
                return Err(GrammarError::EmptyRule(head.clone()));
            }
            for alt in alternatives {
                let body = alt
                    .iter()
                    .filter(|name| name.as_str() != EPSILON)
                    .map(|name| self.resolve(&heads, head, name))
                    .collect::<Result<Vec<_>, _>>()?;
                rules.entry(head.clone()).or_default().push(Production {
                    head: head.clone(),
                    body,
                });
            }
        }

        Ok(Grammar {
            start: self.start,
            terminals: self.terminals,
            rules,
        })
    }

    fn resolve(&self, heads: &BTreeSet<&str>, head: &str, name: &str) -> Result<Symbol, GrammarError> {
        if heads.contains(name) {
            Ok(Symbol::NonTerminal(name.to_string()))
        } else if self.terminals.contains(name) {
            Ok(Symbol::Terminal(Terminal::token(name)))
        } else if name == END_MARKER {
            Ok(Symbol::Terminal(Terminal::End))
        } else {
            Err(GrammarError::UndeclaredSymbol {
                head: head.to_string(),
                symbol: name.to_string(),
            })
        }
    }
}

/// Every token kind the grammar can mention, i.e. all kinds but `Eof`.
const MINI0_TERMINALS: &[TokenKind] = &[
    TokenKind::If,
    TokenKind::Else,
    TokenKind::End,
    TokenKind::While,
    TokenKind::Loop,
    TokenKind::Fun,
    TokenKind::Return,
    TokenKind::New,
    TokenKind::Int,
    TokenKind::Bool,
    TokenKind::Char,
    TokenKind::String,
    TokenKind::True,
    TokenKind::False,
    TokenKind::And,
    TokenKind::Or,
    TokenKind::Not,
    TokenKind::Id,
    TokenKind::Number,
    TokenKind::Str,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Star,
    TokenKind::Slash,
    TokenKind::Gt,
    TokenKind::Lt,
    TokenKind::Ge,
    TokenKind::Le,
    TokenKind::Eq,
    TokenKind::Ne,
    TokenKind::LParen,
    TokenKind::RParen,
    TokenKind::LBracket,
    TokenKind::RBracket,
    TokenKind::Comma,
    TokenKind::Colon,
    TokenKind::Newline,
];

/// The Mini-0 grammar, transformed for predictive parsing.
///
/// Left recursion is removed and every precedence level gets a `_prime`
/// tail rule. Four cells of its LL(1) table remain multiply defined; the
/// recursive-descent parser settles each with a second token of lookahead.
pub fn mini0() -> Result<Grammar, GrammarError> {
    Grammar::builder("programa")
        .terminals(MINI0_TERMINALS.iter().map(|k| k.terminal()))
        .rule("programa", &[&["nls", "decl_list"]])
        .rule("nls", &[&["NL", "nls"], &[EPSILON]])
        .rule("decl_list", &[&["decl", "decl_list"], &[EPSILON]])
        .rule("decl", &[&["funcion"], &["global"]])
        .rule("global", &[&["declvar", "nl"]])
        .rule(
            "funcion",
            &[&[
                "fun", "ID", "(", "params", ")", "tipo_ret", "nl", "bloque", "end", "nl",
            ]],
        )
        .rule("tipo_ret", &[&[":", "tipo"], &[EPSILON]])
        .rule("bloque", &[&["declvars", "comandos"]])
        .rule("declvars", &[&["declvar", "nl", "declvars"], &[EPSILON]])
        .rule("comandos", &[&["comando", "nl", "comandos"], &[EPSILON]])
        .rule("params", &[&["parametro", "params_rest"], &[EPSILON]])
        .rule("params_rest", &[&[",", "parametro", "params_rest"], &[EPSILON]])
        .rule("parametro", &[&["ID", ":", "tipo"]])
        .rule("tipo", &[&["tipobase", "tipo_array"]])
        .rule("tipo_array", &[&["[", "]", "tipo_array"], &[EPSILON]])
        .rule("tipobase", &[&["int"], &["bool"], &["char"], &["string"]])
        .rule("declvar", &[&["ID", ":", "tipo"]])
        .rule(
            "comando",
            &[
                &["cmdif"],
                &["cmdwhile"],
                &["cmdatrib"],
                &["cmdreturn"],
                &["llamada"],
            ],
        )
        .rule(
            "cmdif",
            &[&["if", "exp", "nl", "bloque", "elseif_list", "else_opt", "end"]],
        )
        .rule(
            "elseif_list",
            &[
                &["else", "if", "exp", "nl", "bloque", "elseif_list"],
                &[EPSILON],
            ],
        )
        .rule("else_opt", &[&["else", "nl", "bloque"], &[EPSILON]])
        .rule("cmdwhile", &[&["while", "exp", "nl", "bloque", "loop"]])
        .rule("cmdatrib", &[&["var", "=", "exp"]])
        .rule("llamada", &[&["ID", "(", "listaexp", ")"]])
        .rule("listaexp", &[&["exp", "listaexp_rest"], &[EPSILON]])
        .rule("listaexp_rest", &[&[",", "exp", "listaexp_rest"], &[EPSILON]])
        .rule("cmdreturn", &[&["return", "exp_opt"]])
        .rule("exp_opt", &[&["exp"], &[EPSILON]])
        .rule("var", &[&["ID", "var_index"]])
        .rule("var_index", &[&["[", "exp", "]", "var_index"], &[EPSILON]])
        .rule("nl", &[&["NL", "nl_rest"]])
        .rule("nl_rest", &[&["NL", "nl_rest"], &[EPSILON]])
        .rule("exp", &[&["exp_or"]])
        .rule("exp_or", &[&["exp_and", "exp_or_prime"]])
        .rule("exp_or_prime", &[&["or", "exp_and", "exp_or_prime"], &[EPSILON]])
        .rule("exp_and", &[&["exp_eq", "exp_and_prime"]])
        .rule("exp_and_prime", &[&["and", "exp_eq", "exp_and_prime"], &[EPSILON]])
        .rule("exp_eq", &[&["exp_rel", "exp_eq_prime"]])
        .rule(
            "exp_eq_prime",
            &[
                &["=", "exp_rel", "exp_eq_prime"],
                &["<>", "exp_rel", "exp_eq_prime"],
                &[EPSILON],
            ],
        )
        .rule("exp_rel", &[&["exp_add", "exp_rel_prime"]])
        .rule(
            "exp_rel_prime",
            &[
                &[">", "exp_add", "exp_rel_prime"],
                &["<", "exp_add", "exp_rel_prime"],
                &[">=", "exp_add", "exp_rel_prime"],
                &["<=", "exp_add", "exp_rel_prime"],
                &[EPSILON],
            ],
        )
        .rule("exp_add", &[&["exp_mul", "exp_add_prime"]])
        .rule(
            "exp_add_prime",
            &[
                &["+", "exp_mul", "exp_add_prime"],
                &["-", "exp_mul", "exp_add_prime"],
                &[EPSILON],
            ],
        )
        .rule("exp_mul", &[&["exp_unary", "exp_mul_prime"]])
        .rule(
            "exp_mul_prime",
            &[
                &["*", "exp_unary", "exp_mul_prime"],
                &["/", "exp_unary", "exp_mul_prime"],
                &[EPSILON],
            ],
        )
        .rule(
            "exp_unary",
            &[&["not", "exp_unary"], &["-", "exp_unary"], &["exp_primary"]],
        )
        .rule(
            "exp_primary",
            &[
                &["LITNUMERAL"],
                &["LITSTRING"],
                &["true"],
                &["false"],
                &["var"],
                &["new", "[", "exp", "]", "tipo"],
                &["(", "exp", ")"],
                &["llamada"],
            ],
        )
        .build()
}
