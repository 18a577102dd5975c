//! Ranking strategies invoked once per matching document.
//!
//! A scorer only sees the cursors (all positioned on the matching document)
//! and corpus statistics, so the merge in [`crate::search`] never changes
//! when a new strategy is added.

use crate::{Cursor, DocumentStore, IndexReader, Result};

pub const BM25_K1: f64 = 1.2;
pub const BM25_B: f64 = 0.75;

pub trait Scorer {
    fn score(&self, reader: &IndexReader, cursors: &[Cursor<'_>]) -> Result<f64>;
}

/// Additive TF-IDF across query terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdf;

impl Scorer for TfIdf {
    fn score(&self, reader: &IndexReader, cursors: &[Cursor<'_>]) -> Result<f64> {
        let total_docs = reader.total_document_count();
        let score: f64 = cursors
            .iter()
            .filter_map(|c| {
                let posting = c.posting()?;
                Some(tf(posting.term_frequency) * idf(total_docs, c.postings_list().len() as u64))
            })
            .sum();
        Ok(score)
    }
}

/// `log2(freq) + 1`, or 0 for no occurrences.
pub fn tf(freq: usize) -> f64 {
    if freq == 0 {
        return 0.0;
    }
    (freq as f64).log2() + 1.0
}

/// `log2(N / df)` with no smoothing; a term present in every document scores 0.
/// An unknown corpus size (`N == 0`) also contributes 0.
pub fn idf(total_docs: u64, df: u64) -> f64 {
    if total_docs == 0 || df == 0 {
        return 0.0;
    }
    (total_docs as f64 / df as f64).log2()
}

/// Okapi BM25 with document lengths from the catalog.
pub struct Bm25<'c> {
    catalog: &'c DocumentStore,
    k1: f64,
    b: f64,
}

impl<'c> Bm25<'c> {
    pub fn new(catalog: &'c DocumentStore, k1: f64, b: f64) -> Self {
        Self { catalog, k1, b }
    }
}

impl Scorer for Bm25<'_> {
    fn score(&self, reader: &IndexReader, cursors: &[Cursor<'_>]) -> Result<f64> {
        let Some(doc_id) = cursors.first().and_then(|c| c.doc_id()) else {
            return Ok(0.0);
        };
        let n = reader.total_document_count() as f64;
        if n == 0.0 {
            return Ok(0.0);
        }
        let avgdl = self.catalog.average_term_count()?;
        // Without an average length, fall back to unnormalized saturation.
        let norm = if avgdl > 0.0 {
            let dl = self.catalog.fetch_term_count(doc_id)? as f64;
            1.0 - self.b + self.b * dl / avgdl
        } else {
            1.0
        };

        let mut score = 0.0;
        for cursor in cursors {
            let Some(posting) = cursor.posting() else { continue };
            let tf = posting.term_frequency as f64;
            let df = cursor.postings_list().len() as f64;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            score += idf * (tf * (self.k1 + 1.0)) / (tf + self.k1 * norm);
        }
        Ok(score)
    }
}

/// Selects how matches are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RankingStrategy {
    #[default]
    TfIdf,
    Bm25 { k1: f64, b: f64 },
}

impl RankingStrategy {
    pub fn bm25() -> Self {
        Self::Bm25 { k1: BM25_K1, b: BM25_B }
    }

    pub fn scorer<'c>(self, catalog: &'c DocumentStore) -> Box<dyn Scorer + 'c> {
        match self {
            Self::TfIdf => Box::new(TfIdf),
            Self::Bm25 { k1, b } => Box::new(Bm25::new(catalog, k1, b)),
        }
    }
}
