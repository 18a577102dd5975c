use std::io::{self, BufReader, Read};

use crate::tokenizer::TokenStream;
use crate::{DocumentId, InvertedIndex, Posting};

/// Builds the in-memory index one document at a time.
#[derive(Debug, Default)]
pub struct Indexer {
    index: InvertedIndex,
}

impl Indexer {
    pub fn new() -> Self { Self::default() }

    /// Tokenize `content` and merge each term occurrence into its postings.
    ///
    /// Must be called at most once per document, and one document's stream is
    /// consumed fully before the next starts. On a read failure the postings
    /// merged so far stay in the index and the document is still counted, so
    /// no term's document frequency exceeds the document count.
    pub fn update<R: Read>(&mut self, doc_id: DocumentId, content: R) -> io::Result<()> {
        let res = self.merge_terms(doc_id, content);
        self.index.total_docs_count += 1;
        res
    }

    fn merge_terms<R: Read>(&mut self, doc_id: DocumentId, content: R) -> io::Result<()> {
        for token in TokenStream::new(BufReader::new(content)) {
            let (term, pos) = token?;
            self.index
                .dictionary
                .entry(term)
                .or_default()
                .add(Posting::new(doc_id, vec![pos]));
        }
        Ok(())
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn into_index(self) -> InvertedIndex {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_term_yields_single_posting() {
        let mut indexer = Indexer::new();
        indexer.update(DocumentId(3), "Quarrel sir! no, sir!".as_bytes()).unwrap();
        let sir = indexer.index().postings("sir").unwrap();
        assert_eq!(sir.len(), 1);
        assert_eq!(sir.postings()[0], Posting { doc_id: DocumentId(3), positions: vec![1, 3], term_frequency: 2 });
        assert_eq!(indexer.index().total_docs_count, 1);
    }

    #[test]
    fn documents_append_in_order() {
        let mut indexer = Indexer::new();
        indexer.update(DocumentId(1), "Do you quarrel, sir?".as_bytes()).unwrap();
        indexer.update(DocumentId(2), "No better.".as_bytes()).unwrap();
        indexer.update(DocumentId(3), "Quarrel sir! no, sir!".as_bytes()).unwrap();

        let index = indexer.into_index();
        assert_eq!(index.total_docs_count, 3);
        let no: Vec<_> = index.postings("no").unwrap().iter().map(|p| (p.doc_id.0, p.positions.clone())).collect();
        assert_eq!(no, vec![(2, vec![0]), (3, vec![2])]);
        assert!(index.postings("?").is_none());
    }

    struct FailsAfterFirstLine {
        sent: bool,
    }

    impl Read for FailsAfterFirstLine {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::Other, "connection reset"));
            }
            self.sent = true;
            let line = b"sir\n";
            buf[..line.len()].copy_from_slice(line);
            Ok(line.len())
        }
    }

    #[test]
    fn partial_document_is_counted() {
        let mut indexer = Indexer::new();
        assert!(indexer.update(DocumentId(1), FailsAfterFirstLine { sent: false }).is_err());
        indexer.update(DocumentId(2), "sir".as_bytes()).unwrap();

        let index = indexer.index();
        let sir = index.postings("sir").unwrap();
        assert_eq!(sir.len(), 2);
        assert_eq!(index.total_docs_count, 2);
        assert!(sir.len() as u64 <= index.total_docs_count);
    }

    #[test]
    fn empty_document_still_counts() {
        let mut indexer = Indexer::new();
        indexer.update(DocumentId(1), " ,.! ".as_bytes()).unwrap();
        assert!(indexer.index().dictionary.is_empty());
        assert_eq!(indexer.index().total_docs_count, 1);
    }
}
