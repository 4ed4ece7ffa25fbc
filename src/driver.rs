//! Wires the CLI, ingestion, and REPL together.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{EngineError, IngestError, QueryError};
use crate::index::{PermutermTree, PorterStemmer, SearchEvaluator, Tokenizer, VocabStore};
use crate::types::DocId;

/// Maximum bytes read for one REPL query line, including the terminator.
const MAX_LINE_BYTES: usize = 512;

/// Reads and indexes every document, in the order given, assigning each a
/// `DocId` equal to its position.
///
/// Returns the populated vocabulary, the permuterm tree built over the
/// final vocabulary (built in one pass after ingestion, since the tree is
/// only meaningful once the vocabulary is stable), and the documents'
/// display names (file name only, not full path).
pub fn ingest(
    paths: &[PathBuf],
) -> Result<(VocabStore, PermutermTree, Vec<String>), EngineError> {
    if paths.is_empty() {
        return Err(IngestError::NoDocuments.into());
    }

    let stemmer = PorterStemmer::new();
    let mut vocab = VocabStore::new();
    let mut names = Vec::with_capacity(paths.len());

    for (i, path) in paths.iter().enumerate() {
        let bytes = std::fs::read(path).map_err(|source| IngestError::Unreadable {
            path: path.clone(),
            source,
        })?;

        let doc = DocId(i as u32);
        for word in Tokenizer::new(&bytes, &stemmer) {
            vocab.insert(&word, doc);
        }

        names.push(display_name(path));
        tracing::debug!(path = %path.display(), doc_id = i, "ingested document");
    }

    vocab.sort_all();

    let mut tree = PermutermTree::new();
    for (id, entry) in vocab.iter_all() {
        tree.insert_word(&entry.word, id);
    }

    tracing::info!(documents = names.len(), words = vocab.len(), "ingestion complete");

    Ok((vocab, tree, names))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Runs the "Search string: " prompt loop until an empty line is entered
/// or the input stream is exhausted.
pub fn repl<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    vocab: &VocabStore,
    tree: &PermutermTree,
    names: &[String],
) -> std::io::Result<()> {
    let stemmer = PorterStemmer::new();
    let evaluator = SearchEvaluator::new(&stemmer);

    loop {
        write!(output, "Search string: ")?;
        output.flush()?;

        let line = match read_query_line(&mut input)? {
            Some(line) => line,
            None => break, // EOF
        };

        if line.is_empty() {
            break;
        }

        let matches = evaluator.evaluate(line.as_bytes(), vocab, tree, names.len(), |e| {
            report_query_error(&e);
        });

        for doc in matches {
            writeln!(output, "{}", names[doc.index()])?;
        }
    }

    Ok(())
}

fn report_query_error(err: &QueryError) {
    tracing::warn!(error = %err, "skipping malformed query term");
    eprintln!("{}", err);
}

/// Reads one line, capped at `MAX_LINE_BYTES` (including the terminator).
/// Returns `Ok(None)` on EOF with nothing read.
fn read_query_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut buf = Vec::with_capacity(64);
    let mut byte = [0u8; 1];

    loop {
        if buf.len() >= MAX_LINE_BYTES {
            break;
        }
        let n = input.read(&mut byte)?;
        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            break;
        }
        if byte[0] == b'\n' {
            break;
        }
        buf.push(byte[0]);
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use std::io::Cursor;

    #[test]
    fn read_query_line_stops_at_newline() {
        let mut cursor = Cursor::new(b"hello world\nsecond line\n".to_vec());
        let first = read_query_line(&mut cursor).unwrap().unwrap();
        check!(first == "hello world");
        let second = read_query_line(&mut cursor).unwrap().unwrap();
        check!(second == "second line");
    }

    #[test]
    fn read_query_line_caps_at_max_bytes() {
        let long_line = vec![b'a'; 1000];
        let mut cursor = Cursor::new(long_line);
        let line = read_query_line(&mut cursor).unwrap().unwrap();
        check!(line.len() == MAX_LINE_BYTES);
    }

    #[test]
    fn read_query_line_returns_none_on_empty_eof() {
        let mut cursor = Cursor::new(Vec::new());
        check!(read_query_line(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn repl_exits_on_empty_line() {
        let vocab = VocabStore::new();
        let tree = PermutermTree::new();
        let names: Vec<String> = Vec::new();

        let input = Cursor::new(b"\n".to_vec());
        let mut output = Vec::new();
        let result = repl(input, &mut output, &vocab, &tree, &names);
        check!(result.is_ok());
    }

    #[test]
    fn repl_treats_whitespace_only_line_as_a_zero_term_query_not_exit() {
        // spec.md §6: the exit condition is an empty line (immediate
        // newline), not any whitespace-only line. "   " should evaluate as
        // zero terms (no matches) and the REPL should keep prompting.
        let mut vocab = VocabStore::new();
        let mut tree = PermutermTree::new();
        let id = vocab.insert(b"hello", DocId(0));
        tree.insert_word(b"hello", id);
        let names = vec!["doc0.txt".to_string()];

        let input = Cursor::new(b"   \nhello\n\n".to_vec());
        let mut output = Vec::new();
        repl(input, &mut output, &vocab, &tree, &names).unwrap();

        let text = String::from_utf8(output).unwrap();
        check!(text.matches("Search string: ").count() == 3);
        check!(text.contains("doc0.txt"));
    }

    #[test]
    fn repl_prints_matching_document_names() {
        let mut vocab = VocabStore::new();
        let mut tree = PermutermTree::new();
        let id = vocab.insert(b"hello", DocId(0));
        tree.insert_word(b"hello", id);
        let names = vec!["doc0.txt".to_string()];

        let input = Cursor::new(b"hello\n\n".to_vec());
        let mut output = Vec::new();
        repl(input, &mut output, &vocab, &tree, &names).unwrap();

        let text = String::from_utf8(output).unwrap();
        check!(text.contains("doc0.txt"));
    }
}
