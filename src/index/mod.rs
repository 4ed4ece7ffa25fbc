//! In-memory indexing and search: tokenization, the vocabulary store, the
//! permuterm B-tree, and conjunctive query evaluation.

pub mod permuterm;
pub mod query;
pub mod tokenize;
pub mod vocab;

pub use permuterm::PermutermTree;
pub use query::{RewrittenTerm, SearchEvaluator};
pub use tokenize::{IdentityStemmer, PorterStemmer, Tokenizer, WordStemmer};
pub use vocab::{VocabStore, WordEntry, WordId};
