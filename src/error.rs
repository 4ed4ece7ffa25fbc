//! Centralized error handling with typed error enums.
//!
//! Errors are designed to:
//! - Provide detailed context via Debug for logging (`{:?}`)
//! - Provide user-friendly messages via Display for the terminal
//! - Enable pattern matching for programmatic error handling
//!
//! # Error hierarchy
//!
//! ```text
//! EngineError (top-level)
//! ├── Ingest(IngestError)  - usage and document I/O failures
//! └── Query(QueryError)    - malformed or degenerate query terms
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for this crate's fallible operations.
pub type Result<T> = anyhow::Result<T>;

/// Top-level error type for the engine's driver.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Document ingestion failed.
    #[error("{0}")]
    Ingest(#[from] IngestError),

    /// A query term could not be evaluated.
    #[error("{0}")]
    Query(#[from] QueryError),
}

impl EngineError {
    /// Get optional help text for this error.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::Ingest(e) => e.help(),
            Self::Query(e) => e.help(),
        }
    }

    /// A user-friendly message with optional help text appended.
    pub fn user_message(&self) -> String {
        match self.help() {
            Some(help) => format!("{}\n\n{}", self, help),
            None => self.to_string(),
        }
    }
}

/// Errors raised while reading the invocation's document list into memory.
///
/// Both variants are fatal to the process (exit code 1 per the invocation
/// contract): there is no partial-ingestion retry.
#[derive(Debug, Error)]
pub enum IngestError {
    /// No documents were passed on the command line.
    #[error("usage: permuterm-search DOC1 DOC2 ... DOCN (no documents provided)")]
    NoDocuments,

    /// A document file could not be opened or read.
    #[error("cannot read document '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl IngestError {
    /// Get help text for this error.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::NoDocuments => Some("Pass at least one plain-text document to index."),
            Self::Unreadable { .. } => {
                Some("Check that the path exists and is readable by this process.")
            }
        }
    }

    /// A user-friendly message with help text appended.
    pub fn user_message(&self) -> String {
        match self.help() {
            Some(help) => format!("{}\n{}", self, help),
            None => self.to_string(),
        }
    }
}

/// Errors raised while rewriting a single query term into permuterm
/// prefix searches (spec'd in the query grammar: a term may carry at most
/// two `*` wildcards).
///
/// Both variants are non-fatal to the REPL: the query line that produced
/// them evaluates to no matches (the rewrite error aborts the rest of
/// that line's terms, per `SearchEvaluator::evaluate`), but the REPL
/// itself moves on to the next prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A term carried more than two wildcards.
    #[error("term '{term}' has more than two wildcards")]
    TooManyWildcards { term: String },

    /// A two-wildcard term's middle segment (`X*Y*Z`'s `Y`) was empty.
    #[error("term '{term}' has two wildcards but an empty middle segment")]
    EmptyMiddle { term: String },
}

impl QueryError {
    /// Get help text for this error.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::TooManyWildcards { .. } => {
                Some("Terms support at most two '*' wildcards, e.g. 'X*Y*Z'.")
            }
            Self::EmptyMiddle { .. } => {
                Some("Two wildcards need a non-empty segment between them, e.g. 'X*mid*Z'.")
            }
        }
    }
}
