//! End-to-end coverage of the Concrete Scenarios in spec.md §8 (S1-S7),
//! driven through the real CLI pipeline: file ingestion, permuterm
//! construction, and the REPL's query evaluation.

mod common;

use assert2::check;
use common::{Corpus, corpus, search};
use rstest::rstest;

#[rstest]
fn s1_exact_term_matches_both_documents_containing_it(corpus: Corpus) {
    check!(search("hello", &corpus.paths) == vec!["doc1.txt", "doc2.txt"]);
}

#[rstest]
fn s2_two_terms_conjoin_to_their_shared_document(corpus: Corpus) {
    check!(search("hello world", &corpus.paths) == vec!["doc1.txt"]);
}

#[rstest]
fn s3_trailing_wildcard_matches_bar_and_baz(corpus: Corpus) {
    check!(search("b*", &corpus.paths) == vec!["doc2.txt", "doc3.txt"]);
}

#[rstest]
fn s4_leading_wildcard_matches_bar_and_baz(corpus: Corpus) {
    check!(search("*ar", &corpus.paths) == vec!["doc2.txt", "doc3.txt"]);
}

#[rstest]
fn s5_middle_wildcard_matches_hello(corpus: Corpus) {
    check!(search("h*o", &corpus.paths) == vec!["doc1.txt", "doc2.txt"]);
}

#[rstest]
fn s6_two_wildcard_term_intersects_to_doc3_only(corpus: Corpus) {
    check!(search("b*r*z", &corpus.paths) == vec!["doc3.txt"]);
}

#[rstest]
fn s7_empty_line_exits_with_no_output(corpus: Corpus) {
    check!(search("", &corpus.paths).is_empty());
}
