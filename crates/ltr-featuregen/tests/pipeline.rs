//! End-to-end coverage of the offline-collection → index-artifacts →
//! per-candidate feature row pipeline, exercising the same sequence the
//! `create_*`/`fgtrain` binaries run.

use ltr_featuregen::doc_features::{CollectionStats, DocEntry};
use ltr_featuregen::ids::TermId;
use ltr_featuregen::query;
use ltr_featuregen::repo;
use ltr_featuregen::term_stats;
use ltr_featuregen::window_scanner;
use ltr_featuregen::writer;
use ltr_featuregen::{archive, doc_features};

const REPO: &str = "\
DOC-1\thttp://example.com/a/b?x\t0.8\tbody:rust lang systems rust\ttitle:rust lang\ttags:title=1\n\
DOC-2\thttp://example.com/c\t0.3\tbody:rust lang tutorial\ttitle:lang\ttags:title=1\n\
DOC-3\thttp://example.com/d/e/f\t0.1\tbody:systems rust overview\ttags:applet=1\n\
DOC-4\thttp://example.com/g\t0.5\tbody:rust systems lang systems\ttitle:systems\ttags:title=1\n";

#[test]
fn full_pipeline_produces_a_finite_feature_row() {
    let docs = repo::parse_all(REPO).unwrap();
    let term_ids = repo::build_term_ids(&docs);
    let lexicon = repo::build_lexicon(&docs, &term_ids);
    let forward = repo::build_forward_index(&docs, &term_ids);
    let field_ids = repo::build_field_id_map();

    let query = query::parse_line("1;rust systems", &lexicon).unwrap();
    let stats = CollectionStats::from_forward_index(&forward);

    let mut entry = DocEntry::default();
    doc_features::extract(&mut entry, &query, &forward[1], &lexicon, &field_ids, stats);
    entry.stage0_score = 1.5;

    let mut out = Vec::new();
    writer::write_row(&mut out, query.id, 1, &docs[0].docno, 1, &entry).unwrap();
    let line = String::from_utf8(out).unwrap();

    assert!(line.starts_with("1,1,DOC-1,"));
    assert!(line.ends_with('\n'));
    // 2 commas in the "label,qid,docno" prefix plus one per feature column.
    let feature_columns = 2 + 11 * 6 + 3 + 6 * 6 + 4 + 6 + 2;
    assert_eq!(line.trim_end().matches(',').count(), 2 + feature_columns);
}

#[test]
fn artifacts_round_trip_through_archive() {
    let docs = repo::parse_all(REPO).unwrap();
    let term_ids = repo::build_term_ids(&docs);

    let lexicon = repo::build_lexicon(&docs, &term_ids);
    let mut buf = Vec::new();
    archive::save(&mut buf, &lexicon).unwrap();
    let loaded: ltr_featuregen::lexicon::Lexicon = archive::load(&mut buf.as_slice()).unwrap();
    assert_eq!(loaded.len(), lexicon.len());

    let forward = repo::build_forward_index(&docs, &term_ids);
    let mut buf = Vec::new();
    archive::save(&mut buf, &forward).unwrap();
    let loaded: ltr_featuregen::forward_index::ForwardIndex = archive::load(&mut buf.as_slice()).unwrap();
    assert_eq!(loaded.len(), forward.len());

    let inverted = repo::build_inverted_index(&docs, &term_ids);
    let mut buf = Vec::new();
    archive::save(&mut buf, &inverted).unwrap();
    let loaded: ltr_featuregen::inverted_index::InvertedIndex = archive::load(&mut buf.as_slice()).unwrap();
    assert_eq!(loaded.len(), inverted.len());
}

#[test]
fn term_stats_over_a_lexicon_aligned_forward_index() {
    let docs = repo::parse_all(REPO).unwrap();
    let term_ids = repo::build_term_ids(&docs);
    let lexicon = repo::build_lexicon(&docs, &term_ids);
    let forward = repo::build_forward_index_with_lexicon(&docs, &lexicon);
    let inverted = repo::build_inverted_index(&docs, &term_ids);
    let stats = CollectionStats::from_forward_index(&forward);

    let rust_id = lexicon.term_id("rust");
    let posting = &inverted[rust_id as usize];
    let postings: Vec<(u32, u32)> = posting.list.iter().map(|(&d, &f)| (d, f)).collect();

    let summary = term_stats::compute_term_stats(&posting.term, posting.total_count, &postings, |d| {
        forward.get(d as usize).map_or(0.0, |e| e.doc_length as f64)
    }, stats);

    let summary = summary.expect("rust occurs in every one of the 4 documents");
    assert_eq!(summary.cdf, 4);
    assert!(summary.bm25.avg.is_finite());
    assert!(summary.lm.avg.is_finite());
}

#[test]
fn bigram_window_scan_matches_manual_count() {
    let docs = repo::parse_all(REPO).unwrap();
    let term_ids = repo::build_term_ids(&docs);
    let forward = repo::build_forward_index(&docs, &term_ids);

    let rust: TermId = term_ids["rust"];
    let systems: TermId = term_ids["systems"];

    let empty = Vec::new();
    let doc4 = &forward[4];
    let pos_rust = doc4.positions.get(&rust).unwrap_or(&empty);
    let pos_systems = doc4.positions.get(&systems).unwrap_or(&empty);
    let cdf = window_scanner::build_cdf(&[pos_rust.clone(), pos_systems.clone()]);
    let count = window_scanner::count_windows(&cdf, 2, 3, false, true);

    assert!(count > 0, "rust and systems co-occur within a window of 3 in doc 4");
}
