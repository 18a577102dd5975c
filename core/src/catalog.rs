use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{DocumentId, Error, Result};

const DOCUMENTS_TREE: &str = "documents";
const NEXT_ID_KEY: &[u8] = b"next_doc_id";
const TOTAL_TERMS_KEY: &[u8] = b"total_terms";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentRecord {
    title: String,
    term_count: u64,
}

/// Document catalog: assigns ids and keeps titles and per-document term counts.
///
/// Backed by sled; cloning shares the same database.
#[derive(Clone)]
pub struct DocumentStore {
    db: sled::Db,
    documents: sled::Tree,
}

impl DocumentStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_db(sled::open(path)?)
    }

    /// Throwaway catalog, removed when dropped.
    pub fn temporary() -> Result<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let documents = db.open_tree(DOCUMENTS_TREE)?;
        Ok(Self { db, documents })
    }

    /// Stores a new document and returns its id. Ids start at 1 and are never reused.
    pub fn save(&self, title: &str, term_count: u64) -> Result<DocumentId> {
        let id = self
            .db
            .update_and_fetch(NEXT_ID_KEY, |old| Some(add_u64(old, 1).to_be_bytes().to_vec()))?
            .map(|v| decode_u64(&v))
            .unwrap_or_default();
        let record = DocumentRecord { title: title.to_string(), term_count };
        self.documents.insert(id.to_be_bytes(), bincode::serialize(&record)?)?;
        self.db
            .update_and_fetch(TOTAL_TERMS_KEY, |old| Some(add_u64(old, term_count).to_be_bytes().to_vec()))?;
        tracing::debug!(doc_id = id, title, term_count, "saved document");
        Ok(DocumentId(id))
    }

    pub fn fetch_title(&self, doc_id: DocumentId) -> Result<String> {
        Ok(self.fetch(doc_id)?.title)
    }

    pub fn fetch_term_count(&self, doc_id: DocumentId) -> Result<u64> {
        Ok(self.fetch(doc_id)?.term_count)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Mean terms per document, 0.0 for an empty catalog.
    pub fn average_term_count(&self) -> Result<f64> {
        let docs = self.document_count();
        if docs == 0 {
            return Ok(0.0);
        }
        let total = self.db.get(TOTAL_TERMS_KEY)?.map(|v| decode_u64(&v)).unwrap_or(0);
        Ok(total as f64 / docs as f64)
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    fn fetch(&self, doc_id: DocumentId) -> Result<DocumentRecord> {
        let bytes = self.documents.get(doc_id.0.to_be_bytes())?.ok_or(Error::DocumentNotFound(doc_id))?;
        Ok(bincode::deserialize(&bytes)?)
    }
}

fn decode_u64(bytes: &[u8]) -> u64 {
    bytes.try_into().map(u64::from_be_bytes).unwrap_or(0)
}

fn add_u64(old: Option<&[u8]>, delta: u64) -> u64 {
    old.map(decode_u64).unwrap_or(0) + delta
}
