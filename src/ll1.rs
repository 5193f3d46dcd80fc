//! LL(1) decision table.
//!
//! For every `A → α`: the cell `(A, t)` gets `α` for each `t` in
//! FIRST(α) − {ε}, and for each `t` in FOLLOW(A) when α is nullable.
//! Registration is first-wins. A collision with a different production is
//! kept as a [`Conflict`] and the cell keeps its original entry.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::grammar::{Grammar, GrammarError, Production, Terminal};
use crate::sets::{FirstSets, FollowSets};

/// A multiply-defined table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub non_terminal: String,
    pub terminal: Terminal,
    /// The production already in the cell (and kept there).
    pub existing: Production,
    /// The production that collided with it.
    pub rejected: Production,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflict at ({}, {}): {} vs {}",
            self.non_terminal, self.terminal, self.existing, self.rejected
        )
    }
}

/// `(non-terminal, terminal) → production` table plus its conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ll1Table {
    cells: BTreeMap<(String, Terminal), Production>,
    conflicts: Vec<Conflict>,
}

impl Ll1Table {
    /// Compute FIRST/FOLLOW for `grammar` and build its table.
    pub fn from_grammar(grammar: &Grammar) -> Result<Self, GrammarError> {
        let first = FirstSets::compute(grammar)?;
        let follow = FollowSets::compute(grammar, &first)?;
        Ok(Self::build(grammar, &first, &follow))
    }

    /// Build the table from precomputed sets.
    #[must_use]
    pub fn build(grammar: &Grammar, first: &FirstSets, follow: &FollowSets) -> Self {
        let mut table = Self {
            cells: BTreeMap::new(),
            conflicts: Vec::new(),
        };

        for non_terminal in grammar.non_terminals() {
            for production in grammar.productions_of(non_terminal) {
                let decision = first.of_sequence(&production.body);
                for terminal in decision.iter().filter(|t| **t != Terminal::Epsilon) {
                    table.register(non_terminal, terminal, production);
                }
                if decision.contains(&Terminal::Epsilon) {
                    for terminal in follow.of(non_terminal).into_iter().flatten() {
                        table.register(non_terminal, terminal, production);
                    }
                }
            }
        }

        tracing::debug!(
            cells = table.cells.len(),
            conflicts = table.conflicts.len(),
            "LL(1) table built"
        );
        table
    }

    fn register(&mut self, non_terminal: &str, terminal: &Terminal, production: &Production) {
        match self.cells.entry((non_terminal.to_string(), terminal.clone())) {
            Entry::Vacant(cell) => {
                cell.insert(production.clone());
            }
            Entry::Occupied(cell) => {
                if cell.get() != production {
                    let conflict = Conflict {
                        non_terminal: non_terminal.to_string(),
                        terminal: terminal.clone(),
                        existing: cell.get().clone(),
                        rejected: production.clone(),
                    };
                    tracing::debug!(%conflict, "LL(1) conflict");
                    self.conflicts.push(conflict);
                }
            }
        }
    }

    /// The production chosen for `(non_terminal, terminal)`, if any.
    #[must_use]
    pub fn get(&self, non_terminal: &str, terminal: &Terminal) -> Option<&Production> {
        self.cells
            .get(&(non_terminal.to_string(), terminal.clone()))
    }

    /// True when no cell was multiply defined.
    #[must_use]
    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }

    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Populated cells in `(non-terminal, terminal)` order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Terminal, &Production)> {
        self.cells
            .iter()
            .map(|((nt, t), production)| (nt.as_str(), t, production))
    }

    /// Terminals that label at least one populated cell.
    #[must_use]
    pub fn terminals(&self) -> BTreeSet<&Terminal> {
        self.cells.keys().map(|(_, t)| t).collect()
    }
}
