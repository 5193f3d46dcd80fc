//! FIRST and FOLLOW sets as least fixed points.
//!
//! Both solvers work in full-grammar sweeps: a sweep revisits every
//! production and folds what it learns into the sets in place. Sets only
//! grow, so repeating sweeps until one adds nothing reaches the unique
//! least fixed point. A sweep ceiling guards against a grammar that would
//! never settle; hitting it is reported as
//! [`GrammarError::FixedPointNotReached`].

use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::{Grammar, GrammarError, SetKind, Symbol, Terminal};

/// Sweep ceiling used by [`FirstSets::compute`] and [`FollowSets::compute`].
pub const DEFAULT_CEILING: usize = 100;

/// FIRST set of every non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    sets: BTreeMap<String, BTreeSet<Terminal>>,
    iterations: usize,
}

impl FirstSets {
    /// Empty FIRST set for every non-terminal, before any sweep.
    #[must_use]
    pub fn initial(grammar: &Grammar) -> Self {
        Self {
            sets: grammar
                .non_terminals()
                .map(|nt| (nt.to_string(), BTreeSet::new()))
                .collect(),
            iterations: 0,
        }
    }

    pub fn compute(grammar: &Grammar) -> Result<Self, GrammarError> {
        Self::compute_with_ceiling(grammar, DEFAULT_CEILING)
    }

    pub fn compute_with_ceiling(grammar: &Grammar, ceiling: usize) -> Result<Self, GrammarError> {
        let mut first = Self::initial(grammar);
        loop {
            if first.iterations >= ceiling {
                return Err(GrammarError::FixedPointNotReached {
                    sets: SetKind::First,
                    ceiling,
                });
            }
            if !first.sweep(grammar) {
                tracing::debug!(sweeps = first.iterations, "FIRST sets stabilized");
                return Ok(first);
            }
        }
    }

    /// One pass over every production. Returns whether any set grew.
    pub fn sweep(&mut self, grammar: &Grammar) -> bool {
        let mut changed = false;
        for production in grammar.productions() {
            let first = self.of_sequence(&production.body);
            let set = self.sets.entry(production.head.clone()).or_default();
            let before = set.len();
            set.extend(first);
            changed |= set.len() != before;
        }
        self.iterations += 1;
        changed
    }

    /// Sweeps performed so far, including the final one that changed nothing.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    #[must_use]
    pub fn of_non_terminal(&self, name: &str) -> Option<&BTreeSet<Terminal>> {
        self.sets.get(name)
    }

    /// FIRST of a single symbol.
    #[must_use]
    pub fn of_symbol(&self, symbol: &Symbol) -> BTreeSet<Terminal> {
        match symbol {
            Symbol::Terminal(t) => BTreeSet::from([t.clone()]),
            Symbol::NonTerminal(name) => self.sets.get(name).cloned().unwrap_or_default(),
        }
    }

    /// FIRST of a symbol sequence; `{ε}` for the empty sequence.
    #[must_use]
    pub fn of_sequence(&self, symbols: &[Symbol]) -> BTreeSet<Terminal> {
        let mut result = BTreeSet::new();
        for symbol in symbols {
            let first = self.of_symbol(symbol);
            let nullable = first.contains(&Terminal::Epsilon);
            result.extend(first.into_iter().filter(|t| *t != Terminal::Epsilon));
            if !nullable {
                return result;
            }
        }
        result.insert(Terminal::Epsilon);
        result
    }

    /// Iterate `(non-terminal, FIRST set)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Terminal>)> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// FOLLOW set of every non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    sets: BTreeMap<String, BTreeSet<Terminal>>,
    iterations: usize,
}

impl FollowSets {
    /// Empty FOLLOW sets, except the start symbol which holds the end-marker.
    #[must_use]
    pub fn initial(grammar: &Grammar) -> Self {
        let mut sets: BTreeMap<String, BTreeSet<Terminal>> = grammar
            .non_terminals()
            .map(|nt| (nt.to_string(), BTreeSet::new()))
            .collect();
        sets.entry(grammar.start().to_string())
            .or_default()
            .insert(Terminal::End);
        Self {
            sets,
            iterations: 0,
        }
    }

    pub fn compute(grammar: &Grammar, first: &FirstSets) -> Result<Self, GrammarError> {
        Self::compute_with_ceiling(grammar, first, DEFAULT_CEILING)
    }

    pub fn compute_with_ceiling(
        grammar: &Grammar,
        first: &FirstSets,
        ceiling: usize,
    ) -> Result<Self, GrammarError> {
        let mut follow = Self::initial(grammar);
        loop {
            if follow.iterations >= ceiling {
                return Err(GrammarError::FixedPointNotReached {
                    sets: SetKind::Follow,
                    ceiling,
                });
            }
            if !follow.sweep(grammar, first) {
                tracing::debug!(sweeps = follow.iterations, "FOLLOW sets stabilized");
                return Ok(follow);
            }
        }
    }

    /// One pass over every production. Returns whether any set grew.
    ///
    /// For `A → α X β`: FOLLOW(X) gains FIRST(β) − {ε}, and all of
    /// FOLLOW(A) when β is nullable (or empty).
    pub fn sweep(&mut self, grammar: &Grammar, first: &FirstSets) -> bool {
        let mut changed = false;
        for production in grammar.productions() {
            for (i, symbol) in production.body.iter().enumerate() {
                let Symbol::NonTerminal(target) = symbol else {
                    continue;
                };

                let beta = first.of_sequence(&production.body[i + 1..]);
                let mut gained: BTreeSet<Terminal> = beta
                    .iter()
                    .filter(|t| **t != Terminal::Epsilon)
                    .cloned()
                    .collect();
                if beta.contains(&Terminal::Epsilon) {
                    if let Some(head) = self.sets.get(&production.head) {
                        gained.extend(head.iter().cloned());
                    }
                }

                let set = self.sets.entry(target.clone()).or_default();
                let before = set.len();
                set.extend(gained);
                changed |= set.len() != before;
            }
        }
        self.iterations += 1;
        changed
    }

    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    #[must_use]
    pub fn of(&self, non_terminal: &str) -> Option<&BTreeSet<Terminal>> {
        self.sets.get(non_terminal)
    }

    /// Iterate `(non-terminal, FOLLOW set)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Terminal>)> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v))
    }
}
