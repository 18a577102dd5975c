use std::fmt;
use std::path::Path;

use crate::scoring::{Scorer, TfIdf};
use crate::{Cursor, DocumentId, IndexReader, Result};

/// A matching document and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDoc {
    pub doc_id: DocumentId,
    pub score: f64,
}

impl fmt::Display for ScoreDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "docID: {}, Score: {}", self.doc_id, self.score)
    }
}

/// Top-k matches plus the number of matches before truncation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopDocs {
    pub total_hits: usize,
    pub score_docs: Vec<ScoreDoc>,
}

impl fmt::Display for TopDocs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total hits: {}", self.total_hits)?;
        for doc in &self.score_docs {
            writeln!(f, "  {doc}")?;
        }
        Ok(())
    }
}

/// Conjunctive (AND) search over an on-disk index.
pub struct Searcher<'a> {
    reader: IndexReader,
    scorer: Box<dyn Scorer + 'a>,
}

impl<'a> Searcher<'a> {
    /// Searcher with TF-IDF ranking and a fresh reader over `index_dir`.
    pub fn new<P: AsRef<Path>>(index_dir: P) -> Self {
        Self::with_scorer(IndexReader::new(index_dir), Box::new(TfIdf))
    }

    pub fn with_scorer(reader: IndexReader, scorer: Box<dyn Scorer + 'a>) -> Self {
        Self { reader, scorer }
    }

    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    /// Documents containing every query term, best `k` by descending score.
    ///
    /// Terms with no postings are dropped before the merge. Equal scores keep
    /// ascending document order.
    pub fn search_top_k<S: AsRef<str>>(&self, terms: &[S], k: usize) -> Result<TopDocs> {
        let mut matches = self.search(terms)?;
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        let total_hits = matches.len();
        matches.truncate(k);
        Ok(TopDocs { total_hits, score_docs: matches })
    }

    fn search<S: AsRef<str>>(&self, terms: &[S]) -> Result<Vec<ScoreDoc>> {
        let mut lists = self.reader.postings_lists(terms);
        if lists.is_empty() {
            return Ok(Vec::new());
        }
        // Shortest list drives the merge.
        lists.sort_by_key(|l| l.len());
        let mut cursors: Vec<Cursor<'_>> = lists.iter().map(|l| l.cursor()).collect();

        let mut docs = Vec::new();
        while let Some(pivot) = cursors[0].doc_id() {
            let mut miss = None;
            for cursor in &mut cursors[1..] {
                cursor.next_doc(pivot);
                match cursor.doc_id() {
                    None => return Ok(docs),
                    Some(doc_id) if doc_id != pivot => {
                        miss = Some(doc_id);
                        break;
                    }
                    Some(_) => {}
                }
            }

            match miss {
                Some(target) => cursors[0].next_doc(target),
                None => {
                    let score = self.scorer.score(&self.reader, &cursors)?;
                    docs.push(ScoreDoc { doc_id: pivot, score });
                    cursors[0].advance();
                }
            }
        }
        Ok(docs)
    }
}
