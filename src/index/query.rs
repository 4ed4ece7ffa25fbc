//! Term rewriting (wildcard terms to permuterm prefix searches) and
//! conjunctive query evaluation.

use crate::error::QueryError;
use crate::index::permuterm::PermutermTree;
use crate::index::tokenize::WordStemmer;
use crate::index::vocab::{VocabStore, WordId};
use crate::types::DocId;

/// A term rewritten into exactly the permuterm prefix search(es) needed to
/// resolve it, per the spec's wildcard grammar:
///
/// - no `*`: a bare prefix search on the stemmed bytes, no `$` appended (so
///   it also matches any longer word sharing that prefix, per spec.md §4.4).
/// - one `*`: `pre*suf` rotates to prefix `suf$pre`, degenerating correctly
///   when either half is empty (`pre*` → `$pre`, `*suf` → `suf$`).
/// - two `*`: `pre*mid*suf` is resolved as **two independent** prefix
///   searches, `suf$pre` (anchoring the outer parts) and `mid` (anchoring
///   the middle segment) — each incrementing the generation counter on its
///   own (spec.md §4.4/§9: the source's literal two-conjunct behavior, not
///   the classical enumerate-then-substring-filter reading of permuterm
///   wildcard resolution).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewrittenTerm {
    /// A single prefix search against the permuterm tree.
    Prefix(Vec<u8>),
    /// Two independent prefix searches, each a separate conjunct in the
    /// generation-counter scheme (the two-wildcard case).
    TwoPrefixes(Vec<u8>, Vec<u8>),
}

impl RewrittenTerm {
    /// The prefix search(es) this term expands to, in the order they should
    /// bump the generation counter.
    fn prefixes(&self) -> Vec<&[u8]> {
        match self {
            Self::Prefix(p) => vec![p.as_slice()],
            Self::TwoPrefixes(a, b) => vec![a.as_slice(), b.as_slice()],
        }
    }
}

fn count_wildcards(term: &[u8]) -> usize {
    term.iter().filter(|&&b| b == b'*').count()
}

/// The canonical permuterm rewrite for a one-wildcard `pre*suf` split:
/// prefix `suf$pre`. Degenerates correctly when either half is empty —
/// `pre*` becomes `$pre`, `*suf` becomes `suf$` — since the `$` always
/// rotates to sit exactly between the two halves.
fn rotate_around_wildcard(pre: &[u8], suf: &[u8]) -> Vec<u8> {
    let mut rotation = suf.to_vec();
    rotation.push(b'$');
    rotation.extend_from_slice(pre);
    rotation
}

/// Rewrites a raw query term (already stemmed if it carries no wildcard;
/// stemming is skipped for terms containing `*` since a partial word
/// shouldn't be run through the stemmer) into the prefix search(es) that
/// resolve it.
pub fn rewrite_term(term: &[u8]) -> Result<RewrittenTerm, QueryError> {
    let stars = count_wildcards(term);
    let term_str = || String::from_utf8_lossy(term).into_owned();

    match stars {
        0 => {
            // No `$` appended: a bare prefix matches every rotation
            // starting with those bytes (spec.md §4.4), not just the
            // exact-length word.
            Ok(RewrittenTerm::Prefix(term.to_vec()))
        }
        1 => {
            let star_pos = term.iter().position(|&b| b == b'*').unwrap();
            let (pre, suf) = (&term[..star_pos], &term[star_pos + 1..]);
            Ok(RewrittenTerm::Prefix(rotate_around_wildcard(pre, suf)))
        }
        2 => {
            let stars: Vec<usize> = term
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'*')
                .map(|(i, _)| i)
                .collect();
            let (first, second) = (stars[0], stars[1]);
            let pre = &term[..first];
            let mid = &term[first + 1..second];
            let suf = &term[second + 1..];

            if mid.is_empty() {
                return Err(QueryError::EmptyMiddle { term: term_str() });
            }

            // First search anchors the outer parts, ignoring mid entirely
            // (same rotation rule as the one-wildcard case); second search
            // anchors the middle segment on its own.
            let anchor = rotate_around_wildcard(pre, suf);
            Ok(RewrittenTerm::TwoPrefixes(anchor, mid.to_vec()))
        }
        _ => Err(QueryError::TooManyWildcards { term: term_str() }),
    }
}

/// Resolves a single prefix search against the permuterm tree, returning
/// the matching `WordId`s with duplicates removed (distinct rotations of
/// the same word can both match, per spec.md §4.3).
fn resolve_prefix(prefix: &[u8], tree: &PermutermTree) -> Vec<WordId> {
    let mut out = Vec::new();
    tree.search_prefix(prefix, &mut out);
    out.sort_unstable_by_key(|w| w.0);
    out.dedup();
    out
}

/// Evaluates whitespace-separated conjunctive queries against an ingested
/// vocabulary and permuterm tree.
///
/// Uses the spec's generation-counter scheme to compute a conjunction
/// without materializing an intermediate `HashSet` per term: each document
/// carries a `seen` counter; a document "survives" term *k* if its counter
/// equals *k* after being bumped, meaning it matched every term from 1..=k.
pub struct SearchEvaluator<'s> {
    stemmer: &'s dyn WordStemmer,
}

impl<'s> SearchEvaluator<'s> {
    pub fn new(stemmer: &'s dyn WordStemmer) -> Self {
        Self { stemmer }
    }

    /// Evaluates a query line (whitespace-separated terms, ANDed together)
    /// and returns the matching document ids in ascending order.
    ///
    /// A term that fails to rewrite (too many wildcards, empty middle) is
    /// reported via `on_error` and treated as contributing no matches,
    /// which collapses the whole conjunction to empty (matching "a failed
    /// term makes the query unsatisfiable").
    pub fn evaluate(
        &self,
        query: &[u8],
        vocab: &VocabStore,
        tree: &PermutermTree,
        doc_count: usize,
        mut on_error: impl FnMut(QueryError),
    ) -> Vec<DocId> {
        let terms: Vec<&[u8]> = query
            .split(|&b| b.is_ascii_whitespace())
            .filter(|t| !t.is_empty())
            .collect();

        if terms.is_empty() {
            return Vec::new();
        }

        let mut generation = vec![0u32; doc_count];
        let mut sid = 0u32;

        for raw_term in &terms {
            let stemmed = self.stem_if_plain(raw_term);
            let rewritten = match rewrite_term(&stemmed) {
                Ok(r) => r,
                Err(e) => {
                    on_error(e);
                    return Vec::new();
                }
            };

            // A two-wildcard term contributes two independent searches, each
            // its own conjunct: `sid` bumps once per search, not once per
            // term (spec.md §4.4).
            for prefix in rewritten.prefixes() {
                sid += 1;
                let word_ids = resolve_prefix(prefix, tree);

                let mut docs_for_search: Vec<DocId> = Vec::new();
                for id in &word_ids {
                    docs_for_search.extend_from_slice(vocab.entry(*id).postings());
                }
                docs_for_search.sort_unstable_by_key(|d| d.0);
                docs_for_search.dedup();

                for doc in docs_for_search {
                    let slot = &mut generation[doc.index()];
                    if *slot == sid - 1 {
                        *slot = sid;
                    }
                }
            }
        }

        generation
            .iter()
            .enumerate()
            .filter(|&(_, &gen)| gen == sid)
            .map(|(i, _)| DocId(i as u32))
            .collect()
    }

    /// Stems a term if it carries no wildcard (a partial word shouldn't be
    /// run through the stemmer; wildcarded terms are matched on raw bytes).
    fn stem_if_plain(&self, term: &[u8]) -> Vec<u8> {
        if term.contains(&b'*') {
            return term.to_vec();
        }

        let mut buf = term.to_vec();
        if buf.is_empty() {
            return buf;
        }
        let hi = buf.len() - 1;
        match self.stemmer.stem(&mut buf, 0, hi) {
            Some(last) => {
                buf.truncate(last + 1);
                buf
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tokenize::IdentityStemmer;
    use assert2::check;

    #[test]
    fn no_wildcard_term_rewrites_to_bare_prefix() {
        // Deliberately no trailing `$` (spec.md §4.4): a plain term matches
        // every rotation starting with its bytes, not just the exact word.
        let r = rewrite_term(b"hello").unwrap();
        check!(r == RewrittenTerm::Prefix(b"hello".to_vec()));
    }

    #[test]
    fn trailing_wildcard_rewrites_to_dollar_anchored_prefix() {
        let r = rewrite_term(b"hel*").unwrap();
        check!(r == RewrittenTerm::Prefix(b"$hel".to_vec()));
    }

    #[test]
    fn leading_wildcard_rewrites_to_rotated_suffix() {
        let r = rewrite_term(b"*llo").unwrap();
        check!(r == RewrittenTerm::Prefix(b"llo$".to_vec()));
    }

    #[test]
    fn middle_wildcard_rewrites_to_rotated_combo() {
        let r = rewrite_term(b"he*lo").unwrap();
        check!(r == RewrittenTerm::Prefix(b"lo$he".to_vec()));
    }

    #[test]
    fn three_wildcards_is_an_error() {
        let err = rewrite_term(b"a*b*c*d").unwrap_err();
        check!(matches!(err, QueryError::TooManyWildcards { .. }));
    }

    #[test]
    fn two_wildcards_with_empty_middle_is_an_error() {
        let err = rewrite_term(b"a**b").unwrap_err();
        check!(matches!(err, QueryError::EmptyMiddle { .. }));
    }

    #[test]
    fn two_wildcards_resolves_as_two_independent_prefixes() {
        let r = rewrite_term(b"a*mid*b").unwrap();
        check!(matches!(r, RewrittenTerm::TwoPrefixes(_, _)));
    }

    #[test]
    fn evaluate_conjoins_across_terms() {
        let identity = IdentityStemmer;
        let evaluator = SearchEvaluator::new(&identity);

        let mut vocab = VocabStore::new();
        let mut tree = PermutermTree::new();

        // D0: "hello world", D1: "hello", D2: "world"
        let hello = vocab.insert(b"hello", DocId(0));
        vocab.insert(b"hello", DocId(1));
        let world = vocab.insert(b"world", DocId(0));
        vocab.insert(b"world", DocId(2));

        tree.insert_word(b"hello", hello);
        tree.insert_word(b"world", world);

        let mut errors = Vec::new();
        let matches = evaluator.evaluate(b"hello world", &vocab, &tree, 3, |e| errors.push(e));

        check!(errors.is_empty());
        check!(matches == vec![DocId(0)]);
    }

    #[test]
    fn evaluate_two_wildcard_term_intersects_independent_searches() {
        // S6 from spec.md §8: D1 = "hello bar", D2 = "hello bar" (bar also
        // present), D3 = "world bar baz" — query "b*r*z" rewrites to two
        // searches ("z$b" and "r"); only a document containing both a word
        // matching "z$b" (baz) and a word matching "r" (bar or world)
        // survives both generations.
        let identity = IdentityStemmer;
        let evaluator = SearchEvaluator::new(&identity);

        let mut vocab = VocabStore::new();
        let mut tree = PermutermTree::new();

        // D0: "hello world foo", D1: "hello bar", D2: "world bar baz"
        let hello = vocab.insert(b"hello", DocId(0));
        vocab.insert(b"hello", DocId(1));
        let world = vocab.insert(b"world", DocId(0));
        vocab.insert(b"world", DocId(2));
        vocab.insert(b"foo", DocId(0));
        let bar = vocab.insert(b"bar", DocId(1));
        vocab.insert(b"bar", DocId(2));
        let baz = vocab.insert(b"baz", DocId(2));

        tree.insert_word(b"hello", hello);
        tree.insert_word(b"world", world);
        tree.insert_word(b"foo", vocab.find(b"foo").unwrap());
        tree.insert_word(b"bar", bar);
        tree.insert_word(b"baz", baz);

        let mut errors = Vec::new();
        let matches = evaluator.evaluate(b"b*r*z", &vocab, &tree, 3, |e| errors.push(e));

        check!(errors.is_empty());
        check!(matches == vec![DocId(2)]);
    }

    #[test]
    fn evaluate_empty_query_yields_no_documents() {
        let identity = IdentityStemmer;
        let evaluator = SearchEvaluator::new(&identity);
        let vocab = VocabStore::new();
        let tree = PermutermTree::new();

        let mut errors = Vec::new();
        let matches = evaluator.evaluate(b"   ", &vocab, &tree, 0, |e| errors.push(e));
        check!(matches.is_empty());
    }
}
