//! Fixture harness: run many programs through the pipeline and tabulate
//! expected against actual outcomes.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use crate::Error;

/// Extension of Mini-0 source files.
pub const SOURCE_EXTENSION: &str = "mini0";

/// What a fixture is supposed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Accept,
    Reject,
}

impl Expectation {
    /// Fixtures named `error*` must be rejected; everything else accepted.
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        if name.starts_with("error") {
            Self::Reject
        } else {
            Self::Accept
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Accept => "PASS",
            Self::Reject => "FAIL",
        }
    }
}

/// What the pipeline actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    LexRejected,
    ParseRejected,
}

impl Outcome {
    const fn label(self) -> &'static str {
        match self {
            Self::Accepted => "PASS",
            Self::LexRejected | Self::ParseRejected => "FAIL",
        }
    }
}

/// Result of one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub name: String,
    pub expected: Expectation,
    pub outcome: Outcome,
    /// `"accepted"` or the first diagnostic.
    pub message: String,
}

impl CaseResult {
    /// True when the outcome matches the expectation.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(
            (self.expected, self.outcome),
            (Expectation::Accept, Outcome::Accepted)
                | (
                    Expectation::Reject,
                    Outcome::LexRejected | Outcome::ParseRejected
                )
        )
    }
}

/// All fixture results, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub cases: Vec<CaseResult>,
}

impl BatchReport {
    #[must_use]
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(CaseResult::passed)
    }

    /// Plain-text report: summary then one block per fixture.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "total:  {}", self.cases.len());
        let _ = writeln!(out, "passed: {}", self.passed());
        let _ = writeln!(out, "failed: {}", self.failed());
        let _ = writeln!(out, "success rate: {:.1}%", self.success_rate());

        for (i, case) in self.cases.iter().enumerate() {
            let mark = if case.passed() { "ok" } else { "MISMATCH" };
            let _ = writeln!(
                out,
                "\n{}. [{mark}] {}\n   expected: {} | result: {}\n   {}",
                i + 1,
                case.name,
                case.expected.label(),
                case.outcome.label(),
                case.message
            );
        }
        out
    }

    /// Markdown report with one table row per fixture.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Fixture report\n\n## Summary\n\n");
        let _ = writeln!(out, "- **Total:** {}", self.cases.len());
        let _ = writeln!(out, "- **Passed:** {}", self.passed());
        let _ = writeln!(out, "- **Failed:** {}", self.failed());
        let _ = writeln!(out, "- **Success rate:** {:.1}%\n", self.success_rate());

        out.push_str("| # | File | Expected | Result | Message |\n");
        out.push_str("|---|------|----------|--------|---------|\n");
        for (i, case) in self.cases.iter().enumerate() {
            let _ = writeln!(
                out,
                "| {} | `{}` | {} | {} | {} |",
                i + 1,
                case.name,
                case.expected.label(),
                case.outcome.label(),
                case.message.replace('|', "\\|")
            );
        }
        out
    }

    fn success_rate(&self) -> f64 {
        if self.cases.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.passed() as f64 / self.cases.len() as f64 * 100.0;
        rate
    }
}

/// Run one program through the scanner and parser.
#[must_use]
pub fn run_source(name: &str, source: &str, expected: Expectation) -> CaseResult {
    let (outcome, message) = match crate::check_str(source) {
        Ok(_) => (Outcome::Accepted, "accepted".to_string()),
        Err(Error::Lex(errors)) => (
            Outcome::LexRejected,
            errors.first().map(ToString::to_string).unwrap_or_default(),
        ),
        Err(err) => (Outcome::ParseRejected, err.to_string()),
    };
    tracing::debug!(name, ?expected, ?outcome, "fixture");
    CaseResult {
        name: name.to_string(),
        expected,
        outcome,
        message,
    }
}

/// Run every `*.mini0` file in `dir`, in file-name order.
pub fn run_dir(dir: &Path) -> io::Result<BatchReport> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut report = BatchReport::default();
    for path in paths {
        let source = fs::read_to_string(&path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let expected = Expectation::from_file_name(&name);
        report.cases.push(run_source(&name, &source, expected));
    }
    Ok(report)
}
