//! `fgtrain <queries> <trec-run> <repo> <forward-index> <lexicon> <out-csv>`:
//! re-score every (query, document) candidate in a TREC run against a
//! pre-built index, emitting one fixed-width CSV row per candidate (spec
//! §6; grounded on `original_source/feature-gen/src/fgtrain.cpp`'s driver
//! loop: per query, per candidate, resolve docno to docid, extract every
//! feature, write the row with the run's own score as `stage0_score`).
//!
//! Queries are embarrassingly parallel (spec §5): candidates share only
//! read-only index state, so the query list is sharded across worker
//! threads that each score their own share into an in-memory buffer; the
//! buffers are then written out in original query order on the main
//! thread, keeping the output serialized without a mutex around every row.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ltr_featuregen::archive;
use ltr_featuregen::doc_features::{self, CollectionStats, DocEntry};
use ltr_featuregen::forward_index::ForwardIndex;
use ltr_featuregen::lexicon::Lexicon;
use ltr_featuregen::query::{self, QueryTrain};
use ltr_featuregen::repo;
use ltr_featuregen::trec_run::{self, TrecRunRow};
use ltr_featuregen::writer;

#[derive(Parser)]
struct Args {
    queries: PathBuf,
    trec_run: PathBuf,
    repo: PathBuf,
    forward_index: PathBuf,
    lexicon: PathBuf,
    out_csv: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let lexicon: Lexicon = archive::load(&mut fs::File::open(&args.lexicon)?)
        .with_context(|| format!("loading lexicon {}", args.lexicon.display()))?;
    let forward_index: ForwardIndex = archive::load(&mut fs::File::open(&args.forward_index)?)
        .with_context(|| format!("loading forward index {}", args.forward_index.display()))?;

    let repo_contents = fs::read_to_string(&args.repo)
        .with_context(|| format!("reading repo file {}", args.repo.display()))?;
    let docs = repo::parse_all(&repo_contents).with_context(|| "parsing repo file")?;
    let docno_index = repo::build_docno_index(&docs);
    let field_ids = repo::build_field_id_map();

    let queries_contents = fs::read_to_string(&args.queries)
        .with_context(|| format!("reading query file {}", args.queries.display()))?;
    let queries = query::parse_all(&queries_contents, &lexicon).with_context(|| "parsing query file")?;

    let run_contents = fs::read_to_string(&args.trec_run)
        .with_context(|| format!("reading trec run {}", args.trec_run.display()))?;
    let runs = trec_run::parse_all(&run_contents).with_context(|| "parsing trec run")?;

    let stats = CollectionStats::from_forward_index(&forward_index);

    let workers = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1).min(queries.len().max(1));
    let chunk_size = queries.len().div_ceil(workers).max(1);

    // Re-borrow as plain references so the `move` closures below capture
    // cheap Copy handles instead of trying to move the owned collections.
    let runs_ref = &runs;
    let docno_ref = &docno_index;
    let forward_ref = &forward_index;
    let lexicon_ref = &lexicon;
    let field_ids_ref = &field_ids;

    let chunk_buffers: Vec<(Vec<u8>, u64)> = std::thread::scope(|scope| {
        let handles: Vec<_> = queries
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    score_chunk(chunk, runs_ref, docno_ref, forward_ref, lexicon_ref, field_ids_ref, stats)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("scoring worker panicked")).collect()
    });

    let mut out = fs::File::create(&args.out_csv)
        .with_context(|| format!("creating output file {}", args.out_csv.display()))?;
    let mut written = 0u64;
    for (buf, count) in chunk_buffers {
        out.write_all(&buf)?;
        written += count;
    }

    eprintln!("wrote {written} rows over {} queries", queries.len());
    Ok(())
}

/// Score every candidate of every query in `chunk`, returning the
/// rendered CSV bytes and the number of rows written. A non-finite
/// feature value from `writer::write_row` is a fatal numeric fault
/// (spec §7): it is reported with its qid/docno and the whole process
/// exits immediately, matching the single-threaded driver's behavior.
fn score_chunk(
    chunk: &[QueryTrain],
    runs: &std::collections::BTreeMap<i64, Vec<TrecRunRow>>,
    docno_index: &std::collections::HashMap<String, u32>,
    forward_index: &ForwardIndex,
    lexicon: &Lexicon,
    field_ids: &ltr_featuregen::doc_features::FieldIdMap,
    stats: CollectionStats,
) -> (Vec<u8>, u64) {
    let mut buf = Vec::new();
    let mut written = 0u64;

    for q in chunk {
        let Some(candidates) = runs.get(&q.id) else { continue };
        for row in candidates {
            let Some(&docid) = docno_index.get(&row.docno) else {
                eprintln!("warning: qid={} docno={} not found in repo, skipping", q.id, row.docno);
                continue;
            };
            let Some(freqs) = forward_index.get(docid as usize) else {
                eprintln!("warning: qid={} docno={} docid {docid} out of range, skipping", q.id, row.docno);
                continue;
            };

            let mut entry = DocEntry::default();
            doc_features::extract(&mut entry, q, freqs, lexicon, field_ids, stats);
            entry.stage0_score = row.stage0_score;

            if let Err(e) = writer::write_row(&mut buf, q.id, docid, &row.docno, row.label, &entry) {
                eprintln!("error: qid={} docno={}: {e:#}", q.id, row.docno);
                std::process::exit(1);
            }
            written += 1;
        }
    }

    (buf, written)
}
