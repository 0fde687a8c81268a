//! Fixed-column-order feature row formatting (spec §4.5; grounded on
//! `original_source/feature-gen/src/fat.hpp::fat_cache_entry::present` and
//! `original_source/feature-gen/src/fgtrain.cpp`'s `label,qid,docno` prefix).

use std::io::Write;

use crate::doc_features::{DocEntry, FieldScores, StreamStats};
use crate::error::{check_finite, Result};
use crate::ids::DocId;

/// Write one candidate's feature row: `label,qid,docno,<features>`, every
/// numeric column fixed at 5 fractional digits, comma-separated.
pub fn write_row<W: Write>(
    out: &mut W,
    qid: i64,
    docid: DocId,
    docno: &str,
    label: i64,
    entry: &DocEntry,
) -> Result<()> {
    write!(out, "{label},{qid},{docno}")?;

    for (name, value) in columns(entry) {
        let checked = check_finite(value, qid, docid, name)?;
        write!(out, ",{checked:.5}")?;
    }
    writeln!(out)?;
    Ok(())
}

fn field_cols(name: &'static str, s: FieldScores) -> [(&'static str, f64); 6] {
    [
        (name, s.doc),
        (name, s.body),
        (name, s.title),
        (name, s.heading),
        (name, s.inlink),
        (name, s.a),
    ]
}

/// The full, fixed column order. Stream-length columns are transposed
/// from per-field storage (one [`StreamStats`] per field) into
/// per-statistic-then-field emission order (`stream_len` for every
/// field, then `sum_stream_len` for every field, and so on), matching
/// the reference writer's column layout exactly.
fn columns(e: &DocEntry) -> Vec<(&'static str, f64)> {
    let mut cols = Vec::with_capacity(96);

    cols.push(("pagerank", e.pagerank));
    cols.push(("stage0_score", e.stage0_score));

    cols.extend(field_cols("bm25_atire", e.bm25_atire));
    cols.extend(field_cols("bm25_trec3", e.bm25_trec3));
    cols.extend(field_cols("bm25_trec3_kmax", e.bm25_trec3_kmax));

    cols.push(("bm25_bigram_u8", e.bm25_bigram_u8));
    cols.push(("bm25_tp_dist_w100", e.bm25_tp_dist_w100));
    cols.push(("tpscore", e.tpscore));

    cols.extend(field_cols("lm_dir_2500", e.lm_dir_2500));
    cols.extend(field_cols("lm_dir_1500", e.lm_dir_1500));
    cols.extend(field_cols("lm_dir_1000", e.lm_dir_1000));
    cols.extend(field_cols("tfidf", e.tfidf));
    cols.extend(field_cols("prob", e.prob));
    cols.extend(field_cols("be", e.be));
    cols.extend(field_cols("dph", e.dph));
    cols.extend(field_cols("dfr", e.dfr));

    let stream_blocks: [StreamStats; 6] = [
        e.stream_len,
        e.stream_len_body,
        e.stream_len_title,
        e.stream_len_heading,
        e.stream_len_inlink,
        e.stream_len_a,
    ];
    for s in &stream_blocks {
        cols.push(("stream_len", s.stream_len));
    }
    for s in &stream_blocks {
        cols.push(("sum_stream_len", s.sum));
    }
    for s in &stream_blocks {
        cols.push(("min_stream_len", s.min));
    }
    for s in &stream_blocks {
        cols.push(("max_stream_len", s.max));
    }
    for s in &stream_blocks {
        cols.push(("mean_stream_len", s.mean));
    }
    for s in &stream_blocks {
        cols.push(("variance_stream_len", s.variance));
    }

    cols.push(("tag_title_qry_count", e.tag_query_counts.title));
    cols.push(("tag_heading_qry_count", e.tag_query_counts.heading));
    cols.push(("tag_mainbody_qry_count", e.tag_query_counts.mainbody));
    cols.push(("tag_inlink_qry_count", e.tag_query_counts.inlink));

    cols.push(("tag_title_count", e.tag_counts.title as f64));
    cols.push(("tag_heading_count", e.tag_counts.heading as f64));
    cols.push(("tag_inlink_count", e.tag_counts.inlink as f64));
    cols.push(("tag_applet_count", e.tag_counts.applet as f64));
    cols.push(("tag_object_count", e.tag_counts.object as f64));
    cols.push(("tag_embed_count", e.tag_counts.embed as f64));

    cols.push(("url_slash_count", e.url_slash_count as f64));
    cols.push(("url_length", e.url_length as f64));

    cols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_starts_with_label_qid_docno_and_is_fixed_precision() {
        let mut entry = DocEntry::default();
        entry.pagerank = 0.123456;
        entry.tpscore = 1.0 / 3.0;

        let mut out = Vec::new();
        write_row(&mut out, 7, 3, "DOC-1", 1, &entry).unwrap();
        let line = String::from_utf8(out).unwrap();

        assert!(line.starts_with("1,7,DOC-1,0.12346,0.00000"));
        assert!(line.contains(",0.33333,"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn column_count_matches_fixed_layout() {
        let entry = DocEntry::default();
        assert_eq!(columns(&entry).len(), 2 + 11 * 6 + 3 + 6 * 6 + 4 + 6 + 2);
    }

    #[test]
    fn nonfinite_value_is_a_fatal_error() {
        let mut entry = DocEntry::default();
        entry.pagerank = f64::NAN;
        let mut out = Vec::new();
        assert!(write_row(&mut out, 1, 1, "x", 0, &entry).is_err());
    }
}
