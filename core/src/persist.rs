use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::{InvertedIndex, PostingsList, Result};

/// File holding the total document count.
pub const DOC_COUNT_FILE: &str = "_0.dc";

/// Layout of an index directory: one file per term plus the document count.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn term(&self, term: &str) -> PathBuf { self.root.join(term) }
    pub fn doc_count(&self) -> PathBuf { self.root.join(DOC_COUNT_FILE) }
}

/// Serializes a built index, one JSON postings file per term.
pub struct IndexWriter {
    paths: IndexPaths,
}

impl IndexWriter {
    pub fn new<P: AsRef<Path>>(index_dir: P) -> Self {
        Self { paths: IndexPaths::new(index_dir) }
    }

    /// Writes every term's postings, then the document count.
    ///
    /// A term that fails to write is logged and skipped. Failing to write the
    /// document count fails the whole flush.
    pub fn flush(&self, index: &InvertedIndex) -> Result<()> {
        fs::create_dir_all(&self.paths.root)?;
        let mut failed = 0usize;
        for (term, list) in index.sorted_terms() {
            if let Err(err) = self.save_postings(term, list) {
                failed += 1;
                tracing::warn!(term, error = %err, "failed to save postings list");
            }
        }
        fs::write(self.paths.doc_count(), index.total_docs_count.to_string())?;
        tracing::info!(
            root = %self.paths.root.display(),
            terms = index.dictionary.len(),
            failed,
            num_docs = index.total_docs_count,
            "index flushed"
        );
        Ok(())
    }

    fn save_postings(&self, term: &str, list: &PostingsList) -> Result<()> {
        let mut w = BufWriter::new(File::create(self.paths.term(term))?);
        serde_json::to_writer(&mut w, list)?;
        w.flush()?;
        Ok(())
    }
}

/// Lazily loads postings and the document count, caching both.
///
/// The caches are behind a lock so a reader may be shared, but the intended
/// lifetime is a single query.
pub struct IndexReader {
    paths: IndexPaths,
    postings_cache: Mutex<HashMap<String, Arc<PostingsList>>>,
    /// Negative until loaded.
    doc_count_cache: AtomicI64,
}

impl IndexReader {
    pub fn new<P: AsRef<Path>>(index_dir: P) -> Self {
        Self {
            paths: IndexPaths::new(index_dir),
            postings_cache: Mutex::new(HashMap::new()),
            doc_count_cache: AtomicI64::new(-1),
        }
    }

    /// Postings for `term`, or `None` when it was never indexed.
    pub fn postings(&self, term: &str) -> Option<Arc<PostingsList>> {
        if let Some(list) = self.postings_cache.lock().get(term) {
            return Some(Arc::clone(list));
        }
        let list = Arc::new(self.load_postings(term)?);
        // Another caller may have raced us here; either copy is identical.
        let mut cache = self.postings_cache.lock();
        Some(Arc::clone(cache.entry(term.to_string()).or_insert(list)))
    }

    /// Postings for each term that has any, in the order given.
    pub fn postings_lists<S: AsRef<str>>(&self, terms: &[S]) -> Vec<Arc<PostingsList>> {
        terms.iter().filter_map(|t| self.postings(t.as_ref())).collect()
    }

    /// Number of indexed documents; 0 when `_0.dc` is missing or unreadable.
    pub fn total_document_count(&self) -> u64 {
        let cached = self.doc_count_cache.load(Ordering::Acquire);
        if cached > 0 {
            return cached as u64;
        }
        let count = match fs::read_to_string(self.paths.doc_count()) {
            Ok(text) => text.trim().parse::<i64>().unwrap_or_else(|err| {
                tracing::debug!(error = %err, "unparsable document count");
                0
            }),
            Err(err) => {
                tracing::debug!(error = %err, "document count unavailable");
                0
            }
        };
        if count <= 0 {
            return 0;
        }
        self.doc_count_cache.store(count, Ordering::Release);
        count as u64
    }

    fn load_postings(&self, term: &str) -> Option<PostingsList> {
        let bytes = match fs::read(self.paths.term(term)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::debug!(term, error = %err, "failed to read postings");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(list) => Some(list),
            Err(err) => {
                tracing::warn!(term, error = %err, "corrupt postings file");
                None
            }
        }
    }
}
