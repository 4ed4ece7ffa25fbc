//! The vocabulary store: a hash-bucketed word table plus a global
//! insertion-order chain, the structure the permuterm tree's leaves point
//! into.

use ahash::AHashMap;

use crate::types::DocId;

/// Stable handle to a word's [`WordEntry`], used everywhere a word needs to
/// be referenced without re-hashing or re-comparing its bytes (permuterm
/// leaves, posting lists, the global chain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordId(pub u32);

impl WordId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One distinct word in the vocabulary: its bytes and the set of documents
/// it occurs in.
#[derive(Debug)]
pub struct WordEntry {
    pub word: Vec<u8>,
    postings: Vec<DocId>,
}

impl WordEntry {
    /// Documents this word occurs in, in ascending `DocId` order with no
    /// duplicates (insertion dedups against the last entry).
    pub fn postings(&self) -> &[DocId] {
        &self.postings
    }
}

/// Computes the SDBM hash over a word's bytes, the bucketing function the
/// spec mandates for vocabulary lookup.
///
/// `h = 0; for each byte b: h = b + (h << 6) + (h << 16) - h`, all
/// arithmetic wrapping at `u32`.
pub fn sdbm_hash(word: &[u8]) -> u32 {
    let mut h: u32 = 0;
    for &b in word {
        h = (b as u32)
            .wrapping_add(h.wrapping_shl(6))
            .wrapping_add(h.wrapping_shl(16))
            .wrapping_sub(h);
    }
    h
}

/// Lexicographic byte comparison, the ordering used to keep a bucket's
/// chain and [`sort_all`](VocabStore::sort_all)'s output sorted.
pub fn word_cmp(a: &[u8], b: &[u8]) -> std::cmp::Ordering {
    a.cmp(b)
}

/// Owns every distinct word seen during ingestion.
///
/// Words are bucketed by [`sdbm_hash`] into `buckets`, a hash map from hash
/// value to the `WordId`s sharing it (handling collisions by chaining,
/// the way the original hash table did, but backed by `ahash::AHashMap`
/// instead of a hand-rolled bucket array). `entries` is the arena owning the
/// actual `WordEntry` data; `chain` records insertion order for
/// [`sort_all`](Self::sort_all) and whole-vocabulary iteration.
#[derive(Debug, Default)]
pub struct VocabStore {
    buckets: AHashMap<u32, Vec<WordId>>,
    entries: Vec<WordEntry>,
    chain: Vec<WordId>,
}

impl VocabStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: WordId) -> &WordEntry {
        &self.entries[id.index()]
    }

    /// Inserts an occurrence of `word` in `doc`, creating a new vocabulary
    /// entry if the word hasn't been seen before, or adding `doc` to an
    /// existing entry's postings (deduped against the last posting, since
    /// a document's own tokens are fed in order).
    ///
    /// Returns the word's `WordId` either way.
    pub fn insert(&mut self, word: &[u8], doc: DocId) -> WordId {
        let hash = sdbm_hash(word);
        let bucket = self.buckets.entry(hash).or_default();

        for &id in bucket.iter() {
            if self.entries[id.index()].word == word {
                let postings = &mut self.entries[id.index()].postings;
                if postings.last() != Some(&doc) {
                    postings.push(doc);
                }
                return id;
            }
        }

        let id = WordId(self.entries.len() as u32);
        self.entries.push(WordEntry {
            word: word.to_vec(),
            postings: vec![doc],
        });
        bucket.push(id);
        self.chain.push(id);
        id
    }

    /// Looks up an existing word without inserting it.
    pub fn find(&self, word: &[u8]) -> Option<WordId> {
        let hash = sdbm_hash(word);
        let bucket = self.buckets.get(&hash)?;
        bucket
            .iter()
            .copied()
            .find(|id| self.entries[id.index()].word == word)
    }

    /// Iterates every distinct word in insertion order.
    pub fn iter_all(&self) -> impl Iterator<Item = (WordId, &WordEntry)> {
        self.chain.iter().map(|&id| (id, &self.entries[id.index()]))
    }

    /// Sorts the global chain into lexicographic word order in place.
    ///
    /// Disjoint field borrows (`chain` against `entries`) let this run
    /// without an intermediate copy of the entries themselves.
    pub fn sort_all(&mut self) {
        let entries = &self.entries;
        self.chain
            .sort_by(|a, b| word_cmp(&entries[a.index()].word, &entries[b.index()].word));
    }
}
