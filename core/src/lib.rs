pub mod catalog;
pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod index;
pub mod indexer;
pub mod persist;
pub mod scoring;
pub mod search;
pub mod tokenizer;

pub use catalog::DocumentStore;
pub use config::EngineConfig;
pub use cursor::Cursor;
pub use engine::{Engine, SearchResult, SearchResults};
pub use error::{Error, Result};
pub use index::{Dictionary, DocumentId, InvertedIndex, Posting, PostingsList};
pub use indexer::Indexer;
pub use persist::{IndexPaths, IndexReader, IndexWriter, DOC_COUNT_FILE};
pub use scoring::{RankingStrategy, Scorer};
pub use search::{ScoreDoc, Searcher, TopDocs};
