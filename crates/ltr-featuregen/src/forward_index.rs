//! Per-document term postings and structural statistics (spec §3 "Forward
//! Index"; grounded on `original_source/feature-gen/include/freqs_entry.hpp`
//! and `original_source/feature-gen/src/forward_index.cpp`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ids::{FieldId, TermId};

/// URL-derived counts computed once per document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlStats {
    pub url_slash_count: u32,
    pub url_length: u32,
}

/// Raw document-structure tag occurrence counts (five scored fields plus
/// the count-only applet/object/embed tags), keyed by tag name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldsStats {
    pub tags_count: HashMap<String, u64>,
}

/// Everything extracted from a single document at index-build time: its
/// term postings (collection-wide and per-field), and the raw structural
/// statistics the document-feature and stream-feature scorers consume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreqsEntry {
    /// Query-term frequencies, filled in at scoring time per candidate
    /// query (not persisted as part of the built index; left empty here).
    pub q_ft: HashMap<TermId, u64>,
    pub url_stats: UrlStats,
    pub fields_stats: FieldsStats,
    /// Distinct term ids occurring anywhere in the document.
    pub term_list: Vec<TermId>,
    /// Term id -> sorted list of token positions within the document.
    pub positions: HashMap<TermId, Vec<u64>>,
    /// Document-wide term frequency: term id -> occurrence count.
    pub d_ft: HashMap<TermId, u64>,
    pub doc_length: u64,
    pub pagerank: f64,
    /// (field, term) -> occurrence count of that term within that field's
    /// spans.
    pub f_ft: HashMap<(FieldId, TermId), u32>,
    /// Cumulative field span length, keyed by field id. Updated as a
    /// running total across every span of that field encountered while
    /// scanning the document (see `accumulate_field_span` below).
    pub field_len: HashMap<FieldId, u64>,
    pub field_min_len: HashMap<FieldId, u64>,
    pub field_max_len: HashMap<FieldId, u64>,
    /// Sum of squares of the *running cumulative* `field_len` value taken
    /// at each span step, not of individual span lengths. This mirrors a
    /// quirk in the original indexer (flagged there as a possible bug)
    /// rather than a sum of per-span squares; preserved here unchanged.
    pub field_len_sum_sqrs: HashMap<FieldId, u64>,
}

impl FreqsEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document-wide frequency of `term`, or 0 if absent.
    pub fn term_freq(&self, term: TermId) -> u64 {
        *self.d_ft.get(&term).unwrap_or(&0)
    }

    /// Frequency of `term` within `field`, or 0 if the field was never
    /// populated for this term.
    pub fn field_term_freq(&self, field: FieldId, term: TermId) -> u32 {
        *self.f_ft.get(&(field, term)).unwrap_or(&0)
    }

    pub fn field_length(&self, field: FieldId) -> u64 {
        *self.field_len.get(&field).unwrap_or(&0)
    }

    /// Record one occurrence of `term` at `pos` within `field`'s span.
    /// `span_len` is the length, in tokens, of the field span this
    /// occurrence belongs to; the running totals for min/max/sum-of-squares
    /// are updated against the field's *cumulative* length after adding
    /// `span_len`, matching the reference indexer's accumulation order.
    pub fn record_occurrence(&mut self, term: TermId, pos: u64, field: Option<(FieldId, u64)>) {
        if !self.d_ft.contains_key(&term) {
            self.term_list.push(term);
        }
        *self.d_ft.entry(term).or_insert(0) += 1;
        self.positions.entry(term).or_default().push(pos);

        if let Some((field_id, span_len)) = field {
            *self.f_ft.entry((field_id, term)).or_insert(0) += 1;
            self.accumulate_field_span(field_id, span_len);
        }
    }

    /// Bump `field`'s cumulative length by `span_len` and fold the new
    /// cumulative total into min/max/sum-of-squares. Called once per span
    /// a field occupies in the document, not once per term occurrence.
    pub fn accumulate_field_span(&mut self, field: FieldId, span_len: u64) {
        let cum = self.field_len.entry(field).or_insert(0);
        *cum += span_len;
        let cum = *cum;

        self.field_min_len
            .entry(field)
            .and_modify(|m| *m = (*m).min(cum))
            .or_insert(cum);
        self.field_max_len
            .entry(field)
            .and_modify(|m| *m = (*m).max(cum))
            .or_insert(cum);
        *self.field_len_sum_sqrs.entry(field).or_insert(0) += cum * cum;
    }
}

/// The built forward index: one entry per document, dense by [`crate::ids::DocId`].
/// Index 0 is an unused placeholder (document ids are 1-based).
pub type ForwardIndex = Vec<FreqsEntry>;

/// Number of real documents in `index`, excluding the index-0 placeholder
/// (`original_source`'s `build_doclen` does `--ndocs;` for the same reason).
pub fn doc_count(index: &ForwardIndex) -> u64 {
    index.len().saturating_sub(1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup_defaults_to_zero() {
        let entry = FreqsEntry::new();
        assert_eq!(entry.term_freq(7), 0);
        assert_eq!(entry.field_term_freq(1, 7), 0);
        assert_eq!(entry.field_length(1), 0);
    }

    #[test]
    fn cumulative_span_accumulation() {
        let mut entry = FreqsEntry::new();
        entry.accumulate_field_span(1, 3);
        entry.accumulate_field_span(1, 5);
        assert_eq!(entry.field_length(1), 8);
        assert_eq!(entry.field_min_len[&1], 3);
        assert_eq!(entry.field_max_len[&1], 8);
        assert_eq!(entry.field_len_sum_sqrs[&1], 3 * 3 + 8 * 8);
    }

    #[test]
    fn record_occurrence_builds_postings() {
        let mut entry = FreqsEntry::new();
        entry.record_occurrence(42, 0, Some((1, 10)));
        entry.record_occurrence(42, 5, Some((1, 10)));
        assert_eq!(entry.term_freq(42), 2);
        assert_eq!(entry.field_term_freq(1, 42), 2);
        assert_eq!(entry.positions[&42], vec![0, 5]);
        assert_eq!(entry.term_list, vec![42]);
    }

    #[test]
    fn doc_count_excludes_placeholder() {
        let index: ForwardIndex = vec![FreqsEntry::new(), FreqsEntry::new(), FreqsEntry::new()];
        assert_eq!(doc_count(&index), 2);
    }
}
