//! Shared fixtures for integration tests: the three-document corpus from
//! the Concrete Scenarios in spec.md §8, written to a temp directory and
//! driven through the real `ingest`/`repl` pipeline.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use permuterm_search::driver;
use rstest::fixture;
use tempfile::TempDir;

/// D1 = "hello world foo", D2 = "hello bar", D3 = "world bar baz", the
/// spec's stand-in corpus. Every word here is already a Porter stem of
/// itself, so running the real `PorterStemmer` through ingestion doesn't
/// diverge from the identity-stemmer scenarios the spec describes.
pub struct Corpus {
    _dir: TempDir,
    pub paths: Vec<PathBuf>,
}

#[fixture]
pub fn corpus() -> Corpus {
    let dir = TempDir::new().expect("create temp corpus dir");
    let docs = [
        ("doc1.txt", "hello world foo"),
        ("doc2.txt", "hello bar"),
        ("doc3.txt", "world bar baz"),
    ];

    let mut paths = Vec::with_capacity(docs.len());
    for (name, content) in docs {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("write fixture document");
        paths.push(path);
    }

    Corpus { _dir: dir, paths }
}

/// Feeds `query` through the REPL against an already-ingested corpus and
/// returns the matching document names, in the order printed.
pub fn search(query: &str, paths: &[PathBuf]) -> Vec<String> {
    let (vocab, tree, names) = driver::ingest(paths).expect("ingest fixture corpus");

    let input = Cursor::new(format!("{query}\n\n").into_bytes());
    let mut output = Vec::new();
    driver::repl(input, &mut output, &vocab, &tree, &names).expect("repl over fixture corpus");

    // The REPL prompt ("Search string: ") carries no trailing newline, so
    // it runs into the first result line; strip every occurrence before
    // splitting, rather than special-casing the first line.
    String::from_utf8(output)
        .expect("repl output is utf8")
        .replace("Search string: ", "")
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
