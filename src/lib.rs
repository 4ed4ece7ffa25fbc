#![warn(unreachable_pub)]
#![warn(dead_code)]

pub mod cli;
pub mod driver;
pub mod error;
pub mod index;
pub mod tracing;
pub mod types;

pub use error::{EngineError, IngestError, QueryError, Result};
pub use index::{PermutermTree, SearchEvaluator, VocabStore, WordId};
pub use types::DocId;
