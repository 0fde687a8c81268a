//! Per-term posting lists over the whole collection (spec §3 "Inverted
//! Index"; grounded on `original_source/feature-gen/include/inverted_index.hpp`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::{DocId, TermId};

/// A single term's posting list: the term string, its collection-wide
/// occurrence count, and a sorted doc-id -> within-doc-frequency map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingList {
    pub term: String,
    pub total_count: u64,
    pub list: BTreeMap<DocId, u32>,
}

impl PostingList {
    pub fn new(term: impl Into<String>, total_count: u64) -> Self {
        Self { term: term.into(), total_count, list: BTreeMap::new() }
    }

    /// Frequency of this term in `doc`, or 0 if the term never occurs there.
    pub fn freq(&self, doc: DocId) -> u32 {
        *self.list.get(&doc).unwrap_or(&0)
    }

    /// Number of documents this term occurs in.
    pub fn document_count(&self) -> u64 {
        self.list.len() as u64
    }
}

/// The built inverted index: one posting list per [`TermId`], dense and
/// 1-based like the lexicon (index 0 unused).
pub type InvertedIndex = Vec<PostingList>;

/// Lookup helper mirroring [`PostingList::freq`] across the whole index,
/// returning 0 for an out-of-range or sentinel term id.
pub fn freq(index: &InvertedIndex, term: TermId, doc: DocId) -> u32 {
    index.get(term as usize).map_or(0, |pl| pl.freq(doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freq_defaults_to_zero_for_absent_doc() {
        let mut pl = PostingList::new("foo", 3);
        pl.list.insert(1, 2);
        assert_eq!(pl.freq(1), 2);
        assert_eq!(pl.freq(2), 0);
    }

    #[test]
    fn index_level_freq_handles_sentinel() {
        let index: InvertedIndex = vec![PostingList::new("", 0)];
        assert_eq!(freq(&index, 0, 1), 0);
        assert_eq!(freq(&index, 99, 1), 0);
    }
}
