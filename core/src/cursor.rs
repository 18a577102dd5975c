use crate::{DocumentId, Posting, PostingsList};

/// Read-only traversal position over a [`PostingsList`].
///
/// Starts on the first posting and becomes empty once advanced past the last.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    list: &'a PostingsList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(list: &'a PostingsList) -> Self {
        Self { list, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.list.len()
    }

    /// Posting under the cursor, `None` once empty.
    pub fn posting(&self) -> Option<&'a Posting> {
        self.list.postings().get(self.pos)
    }

    pub fn doc_id(&self) -> Option<DocumentId> {
        self.posting().map(|p| p.doc_id)
    }

    pub fn postings_list(&self) -> &'a PostingsList {
        self.list
    }

    /// Moves to the next posting.
    pub fn advance(&mut self) {
        if !self.is_empty() {
            self.pos += 1;
        }
    }

    /// Skips forward to the first posting with `doc_id >= target`. Never moves backwards.
    pub fn next_doc(&mut self, target: DocumentId) {
        let rest = &self.list.postings()[self.pos.min(self.list.len())..];
        self.pos += rest.partition_point(|p| p.doc_id < target);
    }
}
