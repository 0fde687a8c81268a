//! Vocabulary plus collection-level and per-field term statistics
//! (spec §3 "Lexicon"; grounded on `original_source/feature-gen/include/lexicon.hpp`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ids::{FieldId, TermId};

/// Document/term occurrence counts, scoped either to the whole collection
/// or to a single field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub document_count: u64,
    pub term_count: u64,
}

/// Per-term lexicon entry: the term string, its collection-wide counts,
/// and its counts restricted to each indexed field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Term {
    pub term: String,
    pub counts: Counts,
    pub field_counts: HashMap<FieldId, Counts>,
}

impl Term {
    pub fn document_count(&self) -> u64 {
        self.counts.document_count
    }

    pub fn term_count(&self) -> u64 {
        self.counts.term_count
    }

    /// Returns 0 for a field the term never occurs in (spec §3 invariant:
    /// "lookups for unknown FieldId must return 0").
    pub fn field_document_count(&self, field: FieldId) -> u64 {
        self.field_counts.get(&field).map_or(0, |c| c.document_count)
    }

    pub fn field_term_count(&self, field: FieldId) -> u64 {
        self.field_counts.get(&field).map_or(0, |c| c.term_count)
    }
}

/// Dense per-term vocabulary over the whole collection, indexed by
/// [`TermId`]. Entry 0 is a placeholder for the "unknown term" sentinel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    pub num_docs: u64,
    pub num_terms: u64,
    terms: Vec<Term>,
    by_term: HashMap<String, TermId>,
}

impl Lexicon {
    /// New lexicon with the reserved placeholder entry at index 0 already
    /// in place.
    pub fn new(num_docs: u64, num_terms: u64) -> Self {
        Self { num_docs, num_terms, terms: vec![Term::default()], by_term: HashMap::new() }
    }

    pub fn push(&mut self, term: Term) {
        let tid = self.terms.len() as TermId;
        self.by_term.insert(term.term.clone(), tid);
        self.terms.push(term);
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Look up a term by id. Returns `None` for the sentinel id `0` and for
    /// ids beyond the vocabulary (callers guard `t == 0` before scoring;
    /// out-of-range ids are a malformed-artifact condition upstream).
    pub fn get(&self, tid: TermId) -> Option<&Term> {
        self.terms.get(tid as usize)
    }

    /// Resolve a stemmed surface form to its dense id. Returns the
    /// `UNKNOWN_TERM` sentinel (0) for an out-of-vocabulary term, matching
    /// the reference indexer's behavior (an OOV query term still gets a
    /// `tid` of `0`, which every scorer loop skips).
    pub fn term_id(&self, term: &str) -> TermId {
        *self.by_term.get(term).unwrap_or(&crate::ids::UNKNOWN_TERM)
    }
}

impl std::ops::Index<TermId> for Lexicon {
    type Output = Term;

    fn index(&self, tid: TermId) -> &Term {
        &self.terms[tid as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_returns_zero() {
        let term = Term {
            term: "foo".into(),
            counts: Counts { document_count: 5, term_count: 10 },
            field_counts: HashMap::new(),
        };
        assert_eq!(term.field_document_count(1), 0);
        assert_eq!(term.field_term_count(1), 0);
    }

    #[test]
    fn placeholder_entry_at_zero() {
        let lex = Lexicon::new(100, 1000);
        assert_eq!(lex.len(), 1);
        assert_eq!(lex[0].document_count(), 0);
    }

    #[test]
    fn term_id_resolves_pushed_terms_and_defaults_to_sentinel() {
        let mut lex = Lexicon::new(10, 10);
        lex.push(Term {
            term: "run".into(),
            counts: Counts { document_count: 3, term_count: 9 },
            field_counts: HashMap::new(),
        });
        assert_eq!(lex.term_id("run"), 1);
        assert_eq!(lex.term_id("nonexistent"), crate::ids::UNKNOWN_TERM);
    }
}
