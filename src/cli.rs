use std::path::PathBuf;

use clap::Parser;

/// In-memory conjunctive wildcard search over a set of plain-text documents.
#[derive(Parser, Debug)]
#[command(name = "permuterm-search")]
#[command(about = "Index documents and answer conjunctive wildcard queries", long_about = None)]
pub struct Cli {
    /// Plain-text documents to ingest. At least one is required.
    ///
    /// Deliberately left unconstrained by clap (no `required = true`): an
    /// empty list is a domain error with its own exit code, not a usage
    /// error clap should short-circuit on.
    pub documents: Vec<PathBuf>,
}
