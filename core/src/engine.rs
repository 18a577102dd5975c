use std::io::{BufReader, Read, Seek, SeekFrom};

use crate::scoring::RankingStrategy;
use crate::tokenizer::{query_terms, TokenStream};
use crate::{DocumentId, DocumentStore, EngineConfig, IndexReader, IndexWriter, Indexer, InvertedIndex, Result, Searcher};

/// One ranked hit, resolved to its title.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub doc_id: DocumentId,
    pub score: f64,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub total_hits: usize,
    pub results: Vec<SearchResult>,
}

/// Ties the indexer, the catalog and the on-disk index together.
pub struct Engine {
    config: EngineConfig,
    indexer: Indexer,
    catalog: DocumentStore,
}

impl Engine {
    /// Opens (or creates) the catalog named by `config`.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let catalog = DocumentStore::open(&config.catalog_path)?;
        Ok(Self::with_catalog(config, catalog))
    }

    pub fn with_catalog(config: EngineConfig, catalog: DocumentStore) -> Self {
        Self { config, indexer: Indexer::new(), catalog }
    }

    /// Registers the document with the catalog and indexes its content.
    ///
    /// The content is read twice: once to count terms for the catalog, then
    /// again for the postings.
    pub fn add_document<R: Read + Seek>(&mut self, title: &str, mut content: R) -> Result<DocumentId> {
        let term_count = count_terms(&mut content)?;
        let doc_id = self.catalog.save(title, term_count)?;
        content.seek(SeekFrom::Start(0))?;
        self.indexer.update(doc_id, content)?;
        tracing::debug!(%doc_id, title, term_count, "indexed document");
        Ok(doc_id)
    }

    /// Writes the index to disk and persists the catalog.
    pub fn flush(&self) -> Result<()> {
        IndexWriter::new(&self.config.index_dir).flush(self.indexer.index())?;
        self.catalog.flush()
    }

    /// Tokenizes `query` and returns the top `k` documents containing every term.
    pub fn search(&self, query: &str, k: usize, strategy: RankingStrategy) -> Result<SearchResults> {
        let terms = query_terms(query);
        let searcher = Searcher::with_scorer(IndexReader::new(&self.config.index_dir), strategy.scorer(&self.catalog));
        let top = searcher.search_top_k(&terms, k)?;

        let mut results = Vec::with_capacity(top.score_docs.len());
        for doc in top.score_docs {
            let title = self.catalog.fetch_title(doc.doc_id)?;
            results.push(SearchResult { doc_id: doc.doc_id, score: doc.score, title });
        }
        Ok(SearchResults { total_hits: top.total_hits, results })
    }

    pub fn index(&self) -> &InvertedIndex {
        self.indexer.index()
    }

    pub fn catalog(&self) -> &DocumentStore {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn count_terms<R: Read>(content: R) -> std::io::Result<u64> {
    let mut count = 0;
    for token in TokenStream::new(BufReader::new(content)) {
        token?;
        count += 1;
    }
    Ok(count)
}
