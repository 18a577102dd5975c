use thiserror::Error;

use crate::DocumentId;

/// Errors surfaced by the search core.
///
/// A term without postings, a query without matches and a missing document
/// count are not errors; they come back as `None`, an empty result or zero.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] sled::Error),

    #[error("Catalog record error: {0}")]
    Record(#[from] bincode::Error),

    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),
}

pub type Result<T> = std::result::Result<T, Error>;
