//! CLI tool to check Mini-0 programs and inspect the Mini-0 grammar.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mini0::{FirstSets, FollowSets, Ll1Table, batch, grammar, parse, report, tokenize};

/// Largest number of tokens printed by `check --tokens`.
const TOKEN_PREVIEW: usize = 20;

/// Mini-0 scanner, grammar analyser, and parser
#[derive(Debug, Parser)]
#[command(name = "mini0", version)]
struct Args {
    /// The subcommand to run
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan and parse a source file
    Check {
        /// Source file to check
        file: PathBuf,

        /// Print the first tokens of the stream
        #[arg(short, long)]
        tokens: bool,
    },

    /// Print the grammar productions
    Grammar {
        /// Also print FIRST sets
        #[arg(long)]
        first: bool,

        /// Also print FOLLOW sets
        #[arg(long)]
        follow: bool,
    },

    /// Print the LL(1) table and its conflicts
    Table {
        /// Also write the table as markdown to this path
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Run every .mini0 fixture in a directory
    Batch {
        /// Directory holding the fixtures
        dir: PathBuf,

        /// Also write the report as markdown to this path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Check { file, tokens } => check(&file, tokens),
        Command::Grammar { first, follow } => print_grammar(first, follow),
        Command::Table { markdown } => print_table(markdown.as_deref()),
        Command::Batch { dir, report } => run_batch(&dir, report.as_deref()),
    }
}

fn check(path: &Path, show_tokens: bool) -> ExitCode {
    let display = path.display();
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{display}: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("checking {display}");
    tracing::info!(bytes = source.len(), "scanning");
    let lexed = tokenize(&source);
    if !lexed.is_clean() {
        for err in &lexed.errors {
            eprintln!("{display}: {err}");
        }
        return ExitCode::FAILURE;
    }
    println!("[1] scan: {} tokens", lexed.tokens.len());

    if show_tokens {
        for (i, token) in lexed.tokens.iter().take(TOKEN_PREVIEW).enumerate() {
            println!("  {:>3}. {token} at {}", i + 1, token.span);
        }
        if lexed.tokens.len() > TOKEN_PREVIEW {
            println!("  ... and {} more", lexed.tokens.len() - TOKEN_PREVIEW);
        }
    }

    let result = parse(&lexed.tokens);
    if result.accepted {
        println!("[2] parse: accepted");
        ExitCode::SUCCESS
    } else {
        for err in &result.diagnostics {
            eprintln!("{display}: {err}");
        }
        ExitCode::FAILURE
    }
}

fn print_grammar(show_first: bool, show_follow: bool) -> ExitCode {
    let g = match grammar::mini0() {
        Ok(g) => g,
        Err(e) => {
            eprintln!("grammar: {e}");
            return ExitCode::FAILURE;
        }
    };
    print!("{}", report::productions(&g));
    if !show_first && !show_follow {
        return ExitCode::SUCCESS;
    }

    let first = match FirstSets::compute(&g) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("grammar: {e}");
            return ExitCode::FAILURE;
        }
    };
    if show_first {
        println!();
        print!("{}", report::first_sets(&first));
    }
    if show_follow {
        match FollowSets::compute(&g, &first) {
            Ok(follow) => {
                println!();
                print!("{}", report::follow_sets(&follow));
            }
            Err(e) => {
                eprintln!("grammar: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn print_table(markdown: Option<&Path>) -> ExitCode {
    let analysed = grammar::mini0().and_then(|g| Ll1Table::from_grammar(&g).map(|t| (g, t)));
    let (g, table) = match analysed {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("grammar: {e}");
            return ExitCode::FAILURE;
        }
    };

    print!("{}", report::table(&g, &table));
    println!();
    print!("{}", report::conflicts(&table));

    if let Some(path) = markdown {
        if let Err(e) = fs::write(path, report::markdown(&g, &table)) {
            eprintln!("{}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        println!("markdown table written to {}", path.display());
    }
    ExitCode::SUCCESS
}

fn run_batch(dir: &Path, markdown: Option<&Path>) -> ExitCode {
    let results = match batch::run_dir(dir) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}: {e}", dir.display());
            return ExitCode::FAILURE;
        }
    };
    print!("{}", results.render());

    if let Some(path) = markdown {
        if let Err(e) = fs::write(path, results.to_markdown()) {
            eprintln!("{}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        println!("report written to {}", path.display());
    }

    if results.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
