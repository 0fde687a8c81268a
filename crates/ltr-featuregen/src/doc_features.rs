//! Per-document, per-query feature extraction (spec §4.2; grounded on
//! `original_source/feature-gen/include/features/doc_feature.hpp` and its
//! per-scorer subclasses, `doc_stream_feature.hpp`,
//! `docmeta_url_feature.hpp`, and `doc_tpscore_feature.hpp`).

use std::collections::{HashMap, HashSet};

use crate::bm25::Bm25Params;
use crate::forward_index::{doc_count, ForwardIndex, FreqsEntry};
use crate::ids::{Field, FieldId, TermId};
use crate::lexicon::Lexicon;
use crate::lmdir::Mu;
use crate::query::QueryTrain;
use crate::scorer::{Inputs, Scorer};
use crate::window_scanner;

/// Resolves the well-known [`Field`] variants to the dense [`FieldId`]s a
/// built index actually assigned them (field ids are collection-specific,
/// decided at index-build time).
#[derive(Debug, Clone, Default)]
pub struct FieldIdMap {
    fields: HashMap<Field, FieldId>,
    /// The `<mainbody>` tag's field id. Distinct from [`Field::Body`]: the
    /// collection tracks a scored "body" field alongside a separate
    /// "mainbody" tag used only for the tag-query-count column, and the
    /// reference indexer never reconciles the two.
    mainbody: Option<FieldId>,
}

impl FieldIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, id: FieldId) {
        self.fields.insert(field, id);
    }

    pub fn get(&self, field: Field) -> Option<FieldId> {
        self.fields.get(&field).copied()
    }

    pub fn set_mainbody(&mut self, id: FieldId) {
        self.mainbody = Some(id);
    }

    pub fn mainbody(&self) -> Option<FieldId> {
        self.mainbody
    }
}

/// Collection-wide constants every scorer needs (spec §4.1 `ndocs`,
/// `avg_dlen`, `W_c`).
#[derive(Debug, Clone, Copy)]
pub struct CollectionStats {
    pub ndocs: f64,
    pub avg_dlen: f64,
    pub coll_len: f64,
}

impl CollectionStats {
    /// Derive the collection-wide constants from a built forward index:
    /// `ndocs` excludes the index-0 placeholder, `coll_len` is the sum of
    /// every document's length, `avg_dlen` their mean.
    pub fn from_forward_index(index: &ForwardIndex) -> Self {
        let ndocs = doc_count(index);
        let coll_len: u64 = index.iter().skip(1).map(|e| e.doc_length).sum();
        let avg_dlen = if ndocs > 0 { coll_len as f64 / ndocs as f64 } else { 0.0 };
        CollectionStats { ndocs: ndocs as f64, avg_dlen, coll_len: coll_len as f64 }
    }
}

/// A scorer's six output columns: the whole-document score plus one score
/// per field in [`Field::SCORED`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldScores {
    pub doc: f64,
    pub body: f64,
    pub title: f64,
    pub heading: f64,
    pub inlink: f64,
    pub a: f64,
}

impl FieldScores {
    fn accumulate(&mut self, field: Field, val: f64) {
        match field {
            Field::Body => self.body += val,
            Field::Title => self.title += val,
            Field::Heading => self.heading += val,
            Field::Inlink => self.inlink += val,
            Field::A => self.a += val,
        }
    }
}

/// Five-column stream-length summary (sum/min/max/mean/variance, all
/// query-term-frequency-normalized) for one field or the whole document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StreamStats {
    pub stream_len: f64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub variance: f64,
}

/// Raw document-structure tag presence counts (spec §4.2; the six tags
/// the reference feature set actually names — title, heading, inlink,
/// applet, object, embed — distinct from the five *scored* fields).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TagCounts {
    pub title: i64,
    pub heading: i64,
    pub inlink: i64,
    pub applet: i64,
    pub object: i64,
    pub embed: i64,
}

/// Query-term occurrence counts within four tag spans: `<title>`,
/// heading (h1-h4), `<mainbody>`, and inlink anchor text (spec §4.2 "tag
/// query counts"; grounded on `bench::document_features::compute`).
/// `mainbody` is tracked under its own field id, distinct from the
/// scored [`Field::Body`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TagQueryCounts {
    pub title: f64,
    pub heading: f64,
    pub mainbody: f64,
    pub inlink: f64,
}

/// The full feature row for one (query, document) candidate, in the
/// column order the writer emits (spec §4.5).
#[derive(Debug, Clone, Default)]
pub struct DocEntry {
    pub pagerank: f64,
    pub stage0_score: f64,

    pub bm25_atire: FieldScores,
    pub bm25_trec3: FieldScores,
    pub bm25_trec3_kmax: FieldScores,
    pub bm25_bigram_u8: f64,
    pub bm25_tp_dist_w100: f64,
    pub tpscore: f64,

    pub lm_dir_2500: FieldScores,
    pub lm_dir_1500: FieldScores,
    pub lm_dir_1000: FieldScores,
    pub tfidf: FieldScores,
    pub prob: FieldScores,
    pub be: FieldScores,
    pub dph: FieldScores,
    pub dfr: FieldScores,

    pub stream_len: StreamStats,
    pub stream_len_body: StreamStats,
    pub stream_len_title: StreamStats,
    pub stream_len_heading: StreamStats,
    pub stream_len_inlink: StreamStats,
    pub stream_len_a: StreamStats,

    pub tag_query_counts: TagQueryCounts,
    pub tag_counts: TagCounts,

    pub url_slash_count: u32,
    pub url_length: u32,
}

/// Run every named scorer over `query`/`freqs` and fill in the
/// corresponding columns of `entry`. Scorers that need a preset constant
/// (BM25's `(k1,b)`, LM-Dir's `µ`) are invoked once per preset.
pub fn extract(
    entry: &mut DocEntry,
    query: &QueryTrain,
    freqs: &FreqsEntry,
    lexicon: &Lexicon,
    field_ids: &FieldIdMap,
    stats: CollectionStats,
) {
    entry.pagerank = freqs.pagerank;

    entry.bm25_atire = score_field_block(Scorer::Bm25(Bm25Params::atire()), query, freqs, lexicon, field_ids, stats);
    entry.bm25_trec3 = score_field_block(Scorer::Bm25(Bm25Params::trec3()), query, freqs, lexicon, field_ids, stats);
    entry.bm25_trec3_kmax =
        score_field_block(Scorer::Bm25(Bm25Params::trec3_kmax()), query, freqs, lexicon, field_ids, stats);

    entry.lm_dir_2500 = score_field_block(Scorer::LmDir(Mu::Mu2500), query, freqs, lexicon, field_ids, stats);
    entry.lm_dir_1500 = score_field_block(Scorer::LmDir(Mu::Mu1500), query, freqs, lexicon, field_ids, stats);
    entry.lm_dir_1000 = score_field_block(Scorer::LmDir(Mu::Mu1000), query, freqs, lexicon, field_ids, stats);

    entry.tfidf = score_field_block(Scorer::Tfidf, query, freqs, lexicon, field_ids, stats);
    entry.prob = score_field_block(Scorer::Prob, query, freqs, lexicon, field_ids, stats);
    entry.be = score_field_block(Scorer::Be, query, freqs, lexicon, field_ids, stats);
    entry.dph = score_field_block(Scorer::Dph, query, freqs, lexicon, field_ids, stats);
    entry.dfr = score_field_block(Scorer::Dfr, query, freqs, lexicon, field_ids, stats);

    let (bigram_u8, tp_dist_w100) = extract_bigram_windows(query, freqs);
    entry.bm25_bigram_u8 = bigram_u8 as f64;
    entry.bm25_tp_dist_w100 = tp_dist_w100 as f64;
    entry.tpscore = entry.bm25_atire.doc + bctp_score(query, freqs, stats);

    extract_stream_stats(entry, query, freqs, field_ids);
    extract_tag_counts(entry, freqs);
}

/// Per-scorer, per-document-and-field extraction loop (spec §4.2 steps
/// 1-2: zero the accumulators, then for every in-vocabulary, in-document
/// query term, add the whole-document contribution and, where the
/// field's own statistics are nonzero, the per-field contribution).
fn score_field_block(
    scorer: Scorer,
    query: &QueryTrain,
    freqs: &FreqsEntry,
    lexicon: &Lexicon,
    field_ids: &FieldIdMap,
    stats: CollectionStats,
) -> FieldScores {
    let mut scores = FieldScores::default();

    for (&t, &f_qt) in &query.q_ft {
        if t == 0 {
            continue;
        }
        let f_dt = match freqs.d_ft.get(&t) {
            Some(&f) => f,
            None => continue,
        };
        let term = &lexicon[t];

        scores.doc += scorer.score(Inputs {
            f_qt: f_qt as f64,
            f_dt: f_dt as f64,
            f_t: term.document_count() as f64,
            c_f: term.term_count() as f64,
            doc_len: freqs.doc_length as f64,
            ndocs: stats.ndocs,
            avg_dlen: stats.avg_dlen,
            coll_len: stats.coll_len,
        });

        for field in Field::SCORED {
            let field_id = match field_ids.get(field) {
                Some(id) => id,
                None => continue,
            };
            let field_len = freqs.field_length(field_id);
            if field_len == 0 {
                continue;
            }
            let f_ft = freqs.field_term_freq(field_id, t);
            if f_ft == 0 {
                continue;
            }
            let field_doc_cnt = term.field_document_count(field_id);
            let field_term_cnt = term.field_term_count(field_id);
            if field_doc_cnt == 0 || field_term_cnt == 0 {
                continue;
            }

            let val = scorer.score(Inputs {
                f_qt: f_qt as f64,
                f_dt: f_ft as f64,
                f_t: field_doc_cnt as f64,
                c_f: field_term_cnt as f64,
                doc_len: field_len as f64,
                ndocs: stats.ndocs,
                avg_dlen: stats.avg_dlen,
                coll_len: stats.coll_len,
            });
            scores.accumulate(field, val);
        }
    }

    scores
}

/// Unordered-overlap window counts over every unique pair of distinct
/// query terms, at window sizes 8 and 100 (spec §4.4 bigram variants).
fn extract_bigram_windows(query: &QueryTrain, freqs: &FreqsEntry) -> (u64, u64) {
    let distinct_terms: Vec<TermId> = {
        let mut seen = HashSet::new();
        query.tids.iter().copied().filter(|&t| t != 0 && seen.insert(t)).collect()
    };

    let mut w8_total = 0u64;
    let mut w100_total = 0u64;

    for i in 0..distinct_terms.len() {
        for j in (i + 1)..distinct_terms.len() {
            let empty = Vec::new();
            let positions_a = freqs.positions.get(&distinct_terms[i]).unwrap_or(&empty);
            let positions_b = freqs.positions.get(&distinct_terms[j]).unwrap_or(&empty);
            let cdf = window_scanner::build_cdf(&[positions_a.clone(), positions_b.clone()]);
            w8_total += window_scanner::count_windows(&cdf, 2, 8, false, true);
            w100_total += window_scanner::count_windows(&cdf, 2, 100, false, true);
        }
    }

    (w8_total, w100_total)
}

/// Bigram co-occurrence term-proximity score (spec §4.2 "Proximity /
/// TP-Score"; grounded on `bctp_scorer::score`/`score_terms`).
fn bctp_score(query: &QueryTrain, freqs: &FreqsEntry, stats: CollectionStats) -> f64 {
    const K1: f64 = 0.9;
    const B: f64 = 0.4;

    let distinct_terms: Vec<TermId> = {
        let mut seen = HashSet::new();
        query.tids.iter().copied().filter(|&t| t != 0 && seen.insert(t)).collect()
    };

    if distinct_terms.len() < 3 || (freqs.doc_length as usize) < distinct_terms.len() {
        return 0.0;
    }

    let mut weight: HashMap<TermId, f64> = HashMap::new();
    let mut accumulator: HashMap<TermId, f64> = HashMap::new();
    for &t in &distinct_terms {
        let doc_count = freqs.term_freq(t);
        let w = if doc_count == 0 { 0.0 } else { (stats.ndocs / doc_count as f64).ln() };
        weight.insert(t, w);
        accumulator.insert(t, 0.0);
    }

    let query_term_set: HashSet<TermId> = distinct_terms.iter().copied().collect();
    let mut timeline: Vec<(u64, TermId)> = Vec::new();
    for &t in &distinct_terms {
        if let Some(positions) = freqs.positions.get(&t) {
            timeline.extend(positions.iter().map(|&p| (p, t)));
        }
    }
    timeline.sort_by_key(|&(pos, _)| pos);

    let mut prev: Option<(u64, TermId)> = None;
    for &(pos, term_id) in &timeline {
        if !query_term_set.contains(&term_id) {
            continue;
        }
        if let Some((prev_pos, prev_term)) = prev {
            if prev_term != term_id {
                let dist = distance(pos, prev_pos);
                *accumulator.get_mut(&term_id).unwrap() += weight[&prev_term] * dist;
                *accumulator.get_mut(&prev_term).unwrap() += weight[&term_id] * dist;
            }
        }
        prev = Some((pos, term_id));
    }

    let k = K1 * ((1.0 - B) + B * freqs.doc_length as f64 / stats.avg_dlen);
    distinct_terms
        .iter()
        .map(|t| {
            let w = weight[t].min(1.0);
            let acc = accumulator[t];
            let x = acc * (1.0 + K1);
            let y = acc + k;
            w * (x / y)
        })
        .sum()
}

fn distance(pos_i: u64, pos_j: u64) -> f64 {
    let d = pos_j.abs_diff(pos_i) as f64;
    d.powi(-2)
}

fn extract_stream_stats(entry: &mut DocEntry, query: &QueryTrain, freqs: &FreqsEntry, field_ids: &FieldIdMap) {
    let doc_tf: f64 = query.q_ft.keys().map(|t| freqs.term_freq(*t) as f64).sum();

    entry.stream_len.stream_len = freqs.doc_length as f64;
    if doc_tf > 0.0 {
        let len = freqs.doc_length as f64;
        entry.stream_len.sum = len / doc_tf;
        entry.stream_len.min = entry.stream_len.sum;
        entry.stream_len.max = entry.stream_len.sum;
        entry.stream_len.mean = entry.stream_len.sum;
        entry.stream_len.variance = (len - len * len) / doc_tf;
    }

    for field in Field::SCORED {
        let field_id = field_ids.get(field);
        let field_tf: f64 = match field_id {
            Some(id) => query.q_ft.keys().map(|t| freqs.field_term_freq(id, *t) as f64).sum(),
            None => 0.0,
        };

        let stream = field_stream_stats(freqs, field, field_id, field_tf);
        match field {
            Field::Body => entry.stream_len_body = stream,
            Field::Title => {
                entry.stream_len_title = stream;
                entry.tag_query_counts.title = field_tf;
            }
            Field::Heading => {
                entry.stream_len_heading = stream;
                entry.tag_query_counts.heading = field_tf;
            }
            Field::Inlink => {
                entry.stream_len_inlink = stream;
                entry.tag_query_counts.inlink = field_tf;
            }
            Field::A => entry.stream_len_a = stream,
        }
    }

    entry.tag_query_counts.mainbody = match field_ids.mainbody() {
        Some(id) => query.q_ft.keys().map(|t| freqs.field_term_freq(id, *t) as f64).sum(),
        None => 0.0,
    };
}

fn field_stream_stats(
    freqs: &FreqsEntry,
    field: Field,
    field_id: Option<FieldId>,
    field_tf: f64,
) -> StreamStats {
    let mut stats = StreamStats::default();
    let field_id = match field_id {
        Some(id) => id,
        None => return stats,
    };

    let field_len = freqs.field_length(field_id) as f64;
    stats.stream_len = field_len;
    if field == Field::Title && *freqs.fields_stats.tags_count.get("title").unwrap_or(&0) > 1 {
        stats.stream_len = -stats.stream_len;
    }

    if field_tf == 0.0 {
        return stats;
    }

    let min_len = *freqs.field_min_len.get(&field_id).unwrap_or(&0) as f64;
    let max_len = *freqs.field_max_len.get(&field_id).unwrap_or(&0) as f64;
    let sum_sqrs = *freqs.field_len_sum_sqrs.get(&field_id).unwrap_or(&0) as f64;
    let tags_count = *freqs.fields_stats.tags_count.get(field.name()).unwrap_or(&0) as f64;

    stats.sum = field_len / field_tf;
    stats.min = min_len / field_tf;
    stats.max = max_len / field_tf;
    let mean_len = if tags_count > 0.0 { field_len / tags_count } else { 0.0 };
    stats.mean = mean_len / field_tf;
    stats.variance = if field_len > 0.0 {
        (sum_sqrs / field_len - mean_len * mean_len) / field_tf
    } else {
        0.0
    };

    stats
}

fn extract_tag_counts(entry: &mut DocEntry, freqs: &FreqsEntry) {
    let count = |name: &str| *freqs.fields_stats.tags_count.get(name).unwrap_or(&0) as i64;

    entry.tag_counts.title = count("title");
    if entry.tag_counts.title > 1 {
        entry.tag_counts.title = -entry.tag_counts.title;
    }
    entry.tag_counts.heading = count("heading");
    entry.tag_counts.inlink = count("inlink");
    entry.tag_counts.applet = count("applet");
    entry.tag_counts.object = count("object");
    entry.tag_counts.embed = count("embed");

    entry.url_slash_count = freqs.url_stats.url_slash_count;
    entry.url_length = freqs.url_stats.url_length;
}

/// Count the `/` characters after the scheme (`://`) and before any `?`
/// query-string delimiter (spec §4.2 "URL features"; grounded on
/// `docmeta_url_feature.hpp::url_slash_count`).
pub fn url_slash_count(url: &str) -> u32 {
    let scheme_pos = url.find("://");
    let query_pos = url.find('?');

    let start = match (scheme_pos, query_pos) {
        (Some(scheme), Some(query)) if query < scheme => 0,
        (Some(scheme), _) => scheme + "://".len(),
        (None, _) => 0,
    };
    let end = query_pos.unwrap_or(url.len()).max(start);

    url.as_bytes()[start..end].iter().filter(|&&b| b == b'/').count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_slash_count_matches_worked_example() {
        assert_eq!(url_slash_count("http://a/b/c?d/e/f"), 2);
    }

    #[test]
    fn url_length_is_full_string_length() {
        let url = "http://a/b/c?d/e/f";
        assert_eq!(url.len() as u32, 18);
    }

    #[test]
    fn title_tag_count_negated_when_duplicated() {
        let mut freqs = FreqsEntry::new();
        freqs.fields_stats.tags_count.insert("title".into(), 2);
        let mut entry = DocEntry::default();
        extract_tag_counts(&mut entry, &freqs);
        assert_eq!(entry.tag_counts.title, -2);
    }

    #[test]
    fn single_title_tag_not_negated() {
        let mut freqs = FreqsEntry::new();
        freqs.fields_stats.tags_count.insert("title".into(), 1);
        let mut entry = DocEntry::default();
        extract_tag_counts(&mut entry, &freqs);
        assert_eq!(entry.tag_counts.title, 1);
    }

    #[test]
    fn collection_stats_excludes_placeholder_doc() {
        let mut a = FreqsEntry::new();
        a.doc_length = 10;
        let mut b = FreqsEntry::new();
        b.doc_length = 20;
        let index: ForwardIndex = vec![FreqsEntry::new(), a, b];
        let stats = CollectionStats::from_forward_index(&index);
        assert_eq!(stats.ndocs, 2.0);
        assert_eq!(stats.coll_len, 30.0);
        assert_eq!(stats.avg_dlen, 15.0);
    }

    #[test]
    fn bctp_is_zero_below_minimum_query_length() {
        let mut query = QueryTrain::default();
        query.tids = vec![1, 2];
        query.q_ft.insert(1, 1);
        query.q_ft.insert(2, 1);
        let mut freqs = FreqsEntry::new();
        freqs.doc_length = 10;
        let stats = CollectionStats { ndocs: 100.0, avg_dlen: 50.0, coll_len: 1000.0 };
        assert_eq!(bctp_score(&query, &freqs, stats), 0.0);
    }
}
