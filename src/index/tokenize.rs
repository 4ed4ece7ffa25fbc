//! Streaming tokenizer and the Porter-style stemmer adapter.
//!
//! The tokenizer treats stemming as an external black-box transform:
//! `stem(buf, lo, hi) -> Option<last_index>`, operating in place on
//! `buf[lo..=hi]`. `None` signals the stemmed word is empty, matching the
//! contract that tokens of length 0 after stemming are not emitted.

use rust_stemmers::{Algorithm, Stemmer};

/// Bytes treated as inter-token noise: silently discarded wherever they
/// appear, whether between tokens or inside one.
#[inline]
fn is_noise(b: u8) -> bool {
    b == b'\'' || b == b'-' || b == b'$'
}

/// A pluggable stemming strategy, matching `stem(buf, lo, hi) -> new_len`
/// from the spec (`None` standing in for a stemmed length of zero).
///
/// Kept as a trait rather than a bare function pointer so tests can swap in
/// [`IdentityStemmer`] for the identity-stemmer scenarios without touching
/// the tokenizer or query rewriting logic.
pub trait WordStemmer {
    fn stem(&self, buf: &mut [u8], lo: usize, hi: usize) -> Option<usize>;
}

/// Stems with the Porter algorithm via `rust_stemmers`, the "Porter-style
/// stemmer" the spec names and treats as an external collaborator.
///
/// No case-folding is applied (the source tokenizer this was distilled
/// from does not fold case either).
pub struct PorterStemmer(Stemmer);

impl PorterStemmer {
    pub fn new() -> Self {
        Self(Stemmer::create(Algorithm::English))
    }
}

impl Default for PorterStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl WordStemmer for PorterStemmer {
    fn stem(&self, buf: &mut [u8], lo: usize, hi: usize) -> Option<usize> {
        if hi < lo || hi >= buf.len() {
            return None;
        }

        let word = std::str::from_utf8(&buf[lo..=hi]).unwrap_or_default();
        let stemmed = self.0.stem(word);
        let stemmed_bytes = stemmed.as_bytes();

        if stemmed_bytes.is_empty() {
            return None;
        }

        let capacity = hi - lo + 1;
        let n = stemmed_bytes.len().min(capacity);
        buf[lo..lo + n].copy_from_slice(&stemmed_bytes[..n]);
        Some(lo + n - 1)
    }
}

/// Leaves the run untouched. Used by the Concrete Scenarios in spec.md §8,
/// which stub the stemmer to isolate tokenizer/index/query behavior.
pub struct IdentityStemmer;

impl WordStemmer for IdentityStemmer {
    fn stem(&self, _buf: &mut [u8], lo: usize, hi: usize) -> Option<usize> {
        if hi < lo { None } else { Some(hi) }
    }
}

/// Consumes a byte stream and emits stemmed word tokens for one document.
///
/// Reuses a single internal buffer across tokens (the spec's "does not
/// allocate beyond a single reusable per-token buffer"); each `next()` call
/// still returns an owned `Vec<u8>` copy since callers (the vocabulary
/// store) need to retain the bytes past the tokenizer's lifetime.
pub struct Tokenizer<'a, 's> {
    bytes: &'a [u8],
    pos: usize,
    stemmer: &'s dyn WordStemmer,
    buf: Vec<u8>,
}

impl<'a, 's> Tokenizer<'a, 's> {
    pub fn new(bytes: &'a [u8], stemmer: &'s dyn WordStemmer) -> Self {
        Self {
            bytes,
            pos: 0,
            stemmer,
            buf: Vec::with_capacity(32),
        }
    }

    /// Step 1: skip a run of whitespace and the noise characters `'`, `-`, `$`.
    fn skip_separators(&mut self) {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b.is_ascii_whitespace() || is_noise(b) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Step 2: read a contiguous alphanumeric run into `self.buf`, dropping
    /// noise bytes silently and terminating on whitespace, EOF, or any other
    /// non-alphanumeric byte. Returns `false` if nothing was read (EOF
    /// reached immediately).
    fn read_run(&mut self) -> bool {
        self.buf.clear();

        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];

            if is_noise(b) {
                self.pos += 1;
                continue;
            }

            if b.is_ascii_whitespace() {
                break;
            }

            if !b.is_ascii_alphanumeric() {
                self.pos += 1; // consume the terminator so it can't stall the next read
                break;
            }

            self.buf.push(b);
            self.pos += 1;
        }

        !self.buf.is_empty()
    }
}

impl Iterator for Tokenizer<'_, '_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        loop {
            self.skip_separators();
            if self.pos >= self.bytes.len() {
                return None;
            }

            if !self.read_run() {
                continue;
            }

            let hi = self.buf.len() - 1;
            match self.stemmer.stem(&mut self.buf, 0, hi) {
                Some(last) => {
                    self.buf.truncate(last + 1);
                    return Some(self.buf.clone());
                }
                None => continue, // stemmed to nothing; not emitted
            }
        }
    }
}
