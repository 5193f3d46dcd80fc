//! Human-readable renderings of a grammar and its analysis.
//!
//! Plain text for the terminal, markdown for `docs/`-style exports.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::grammar::{Grammar, Terminal};
use crate::ll1::Ll1Table;
use crate::sets::{FirstSets, FollowSets};

/// Terminal columns per text grid section.
const COLUMNS_PER_SECTION: usize = 8;
/// Width of one text grid cell, including padding.
const CELL_WIDTH: usize = 16;
/// Longest right-hand side shown in a markdown cell.
const MARKDOWN_CELL_CHARS: usize = 30;
/// Columns of the markdown export, in this order, when present in the table.
const PRINCIPAL_TERMINALS: &[&str] = &[
    "ID",
    "LITNUMERAL",
    "LITSTRING",
    "if",
    "while",
    "fun",
    "return",
    "int",
    "bool",
    "+",
    "-",
    "(",
    ")",
    "NL",
    "$",
];
const EMPTY_CELL: &str = "—";

/// Every rule, one alternative per line.
#[must_use]
pub fn productions(grammar: &Grammar) -> String {
    let width = name_width(grammar);
    let mut out = String::new();
    for nt in grammar.non_terminals() {
        for (i, production) in grammar.productions_of(nt).iter().enumerate() {
            if i == 0 {
                let _ = writeln!(out, "{nt:<width$} → {}", production.rhs());
            } else {
                let _ = writeln!(out, "{:<width$} | {}", "", production.rhs());
            }
        }
    }
    out
}

/// `FIRST(A) = { ... }` per non-terminal.
#[must_use]
pub fn first_sets(first: &FirstSets) -> String {
    let mut out = String::new();
    let width = first.iter().map(|(nt, _)| nt.len()).max().unwrap_or(0);
    for (nt, set) in first.iter() {
        let _ = writeln!(out, "FIRST({nt:<width$}) = {}", format_set(set));
    }
    out
}

/// `FOLLOW(A) = { ... }` per non-terminal.
#[must_use]
pub fn follow_sets(follow: &FollowSets) -> String {
    let mut out = String::new();
    let width = follow.iter().map(|(nt, _)| nt.len()).max().unwrap_or(0);
    for (nt, set) in follow.iter() {
        let _ = writeln!(out, "FOLLOW({nt:<width$}) = {}", format_set(set));
    }
    out
}

/// The decision table as text grids, a few terminal columns at a time.
#[must_use]
pub fn table(grammar: &Grammar, table: &Ll1Table) -> String {
    let width = name_width(grammar) + 2;
    let columns: Vec<&Terminal> = table.terminals().into_iter().collect();
    let mut out = String::new();

    for (section, chunk) in columns.chunks(COLUMNS_PER_SECTION).enumerate() {
        if section > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:<width$}", "");
        for terminal in chunk {
            let _ = write!(out, "{:<CELL_WIDTH$}", terminal.name());
        }
        out.push('\n');
        out.push_str(&"-".repeat(width + CELL_WIDTH * chunk.len()));
        out.push('\n');

        for nt in grammar.non_terminals() {
            let _ = write!(out, "{nt:<width$}");
            for terminal in chunk {
                let cell = table.get(nt, terminal).map_or_else(
                    || EMPTY_CELL.to_string(),
                    |p| truncate(&p.rhs(), CELL_WIDTH - 2),
                );
                let _ = write!(out, "{cell:<CELL_WIDTH$}");
            }
            out.push('\n');
        }
    }

    out
}

/// Verdict line followed by one line per conflict.
#[must_use]
pub fn conflicts(table: &Ll1Table) -> String {
    let mut out = String::new();
    if table.is_ll1() {
        out.push_str("LL(1): yes, no conflicts\n");
        return out;
    }
    let _ = writeln!(out, "LL(1): no, {} conflict(s)", table.conflicts().len());
    for (i, conflict) in table.conflicts().iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. ({}, {})\n     kept:     {}\n     rejected: {}",
            i + 1,
            conflict.non_terminal,
            conflict.terminal,
            conflict.existing,
            conflict.rejected
        );
    }
    out
}

/// Markdown export of the principal columns of the table.
#[must_use]
pub fn markdown(grammar: &Grammar, table: &Ll1Table) -> String {
    let present = table.terminals();
    let columns: Vec<Terminal> = PRINCIPAL_TERMINALS
        .iter()
        .map(|name| match *name {
            "$" => Terminal::End,
            other => Terminal::token(other),
        })
        .filter(|t| present.contains(t))
        .collect();

    let mut out = String::new();
    out.push_str("# LL(1) parsing table\n\n");
    out.push_str("- **Rows**: non-terminals\n");
    out.push_str("- **Columns**: input terminals\n");
    out.push_str("- **Cells**: the production to expand\n");
    let _ = writeln!(out, "- **{EMPTY_CELL}**: syntax error\n");

    out.push_str("| Non-terminal |");
    for t in &columns {
        let _ = write!(out, " {} |", escape_cell(t.name()));
    }
    out.push_str("\n|---|");
    for _ in &columns {
        out.push_str("---|");
    }
    out.push('\n');

    for nt in grammar.non_terminals() {
        let _ = write!(out, "| **{nt}** |");
        for t in &columns {
            match table.get(nt, t) {
                Some(p) => {
                    let rhs = truncate(&p.rhs(), MARKDOWN_CELL_CHARS);
                    let _ = write!(out, " {nt} → {} |", escape_cell(&rhs));
                }
                None => {
                    let _ = write!(out, " {EMPTY_CELL} |");
                }
            }
        }
        out.push('\n');
    }

    out.push_str("\n## Notes\n\n");
    out.push_str("- **ε** is the empty string\n");
    out.push_str("- **$** is the end of input\n");
    out.push_str("- **NL** is a line terminator\n");
    let verdict = if table.is_ll1() {
        "no conflicts".to_string()
    } else {
        format!("{} conflict(s)", table.conflicts().len())
    };
    let _ = writeln!(out, "- LL(1) verdict: **{verdict}**\n");
    let _ = writeln!(out, "**Table entries:** {}  ", table.len());
    let _ = writeln!(out, "**Non-terminals:** {}  ", grammar.non_terminals().count());
    let _ = writeln!(out, "**Terminals in use:** {}", present.len());

    out
}

fn name_width(grammar: &Grammar) -> usize {
    grammar.non_terminals().map(str::len).max().unwrap_or(0)
}

fn format_set(set: &BTreeSet<Terminal>) -> String {
    let names: Vec<&str> = set.iter().map(Terminal::name).collect();
    format!("{{{}}}", names.join(", "))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
