use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::cursor::Cursor;

/// Identifier handed out by the document catalog. Ordered by insertion only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occurrences of one term within one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    #[serde(rename = "DocID")]
    pub doc_id: DocumentId,
    /// Token offsets, ascending.
    #[serde(rename = "Positions")]
    pub positions: Vec<usize>,
    #[serde(rename = "TermFrequency")]
    pub term_frequency: usize,
}

impl Posting {
    pub fn new(doc_id: DocumentId, positions: Vec<usize>) -> Self {
        let term_frequency = positions.len();
        Self { doc_id, positions, term_frequency }
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {:?}, {})", self.doc_id, self.positions, self.term_frequency)
    }
}

/// Postings of one term, strictly ascending by document id.
///
/// Serialized as a plain JSON array of postings. Deserializing goes through
/// [`PostingsList::add`], so adjacent entries for the same document merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Posting>")]
pub struct PostingsList(Vec<Posting>);

impl PostingsList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `posting`, merging it into the last entry when both belong to
    /// the same document. A document's postings must arrive contiguously.
    pub fn add(&mut self, posting: Posting) {
        match self.0.last_mut() {
            Some(last) if last.doc_id == posting.doc_id => {
                last.positions.extend(posting.positions);
                last.term_frequency += posting.term_frequency;
            }
            _ => self.0.push(posting),
        }
    }

    /// Document frequency of the term.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn postings(&self) -> &[Posting] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.0.iter()
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self)
    }
}

impl From<Vec<Posting>> for PostingsList {
    fn from(postings: Vec<Posting>) -> Self {
        postings.into_iter().collect()
    }
}

impl FromIterator<Posting> for PostingsList {
    fn from_iter<I: IntoIterator<Item = Posting>>(iter: I) -> Self {
        let mut list = PostingsList::new();
        for posting in iter {
            list.add(posting);
        }
        list
    }
}

impl fmt::Display for PostingsList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, posting) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("=>")?;
            }
            write!(f, "{posting}")?;
        }
        Ok(())
    }
}

/// Term -> postings. Iteration order is unspecified; use
/// [`InvertedIndex::sorted_terms`] where order matters.
pub type Dictionary = HashMap<String, PostingsList>;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    pub dictionary: Dictionary,
    pub total_docs_count: u64,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn postings(&self, term: &str) -> Option<&PostingsList> {
        self.dictionary.get(term)
    }

    /// Dictionary entries in lexicographic term order.
    pub fn sorted_terms(&self) -> Vec<(&str, &PostingsList)> {
        let mut terms: Vec<_> = self.dictionary.iter().map(|(t, l)| (t.as_str(), l)).collect();
        terms.sort_unstable_by(|a, b| a.0.cmp(b.0));
        terms
    }
}

impl fmt::Display for InvertedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms = self.sorted_terms();
        let width = terms.iter().map(|(t, _)| t.chars().count()).max().unwrap_or(0);
        writeln!(f, "total documents : {}", self.total_docs_count)?;
        writeln!(f, "dictionary:")?;
        for (term, list) in terms {
            writeln!(f, "  [{term:<width$}] -> {list}")?;
        }
        Ok(())
    }
}
