//! `fgen_term -i <inv-idx> -f <fwd-idx> -o <out>`: summarize every
//! scorer's value distribution across each term's whole posting list
//! (spec §4.3; grounded on
//! `original_source/feature-gen/src/fgen_term.cpp`).

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ltr_featuregen::archive;
use ltr_featuregen::doc_features::CollectionStats;
use ltr_featuregen::forward_index::ForwardIndex;
use ltr_featuregen::inverted_index::InvertedIndex;
use ltr_featuregen::term_stats;

#[derive(Parser)]
struct Args {
    #[arg(short = 'i', long = "inverted-index")]
    inverted_index: PathBuf,
    #[arg(short = 'f', long = "forward-index")]
    forward_index: PathBuf,
    #[arg(short = 'o', long = "out-file")]
    out_file: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let inverted: InvertedIndex = archive::load(&mut fs::File::open(&args.inverted_index)?)
        .with_context(|| format!("loading inverted index {}", args.inverted_index.display()))?;
    let forward: ForwardIndex = archive::load(&mut fs::File::open(&args.forward_index)?)
        .with_context(|| format!("loading forward index {}", args.forward_index.display()))?;
    let stats = CollectionStats::from_forward_index(&forward);

    let mut out = fs::File::create(&args.out_file)
        .with_context(|| format!("creating output file {}", args.out_file.display()))?;

    let mut written = 0u64;
    for posting in inverted.iter().skip(1) {
        let postings: Vec<(u32, u32)> = posting.list.iter().map(|(&d, &f)| (d, f)).collect();
        let Some(stats_row) = term_stats::compute_term_stats(&posting.term, posting.total_count, &postings, |d| {
            forward.get(d as usize).map_or(0.0, |e| e.doc_length as f64)
        }, stats) else {
            continue;
        };
        term_stats::write_term_stats_line(&mut out, &stats_row)?;
        written += 1;
    }

    eprintln!("wrote {written} term-stat rows (skipped terms with fewer than {} postings)", term_stats::MIN_LIST_LEN);
    Ok(())
}
