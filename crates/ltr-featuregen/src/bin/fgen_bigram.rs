//! `fgen_bigram -w <window-file> -f <fwd-idx> -o <out>`: summarize every
//! scorer's value distribution over a `dump_bigram` window file's term
//! pairs (spec §4.4; grounded on
//! `original_source/feature-gen/src/fgen_bigram.cpp`).

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ltr_featuregen::archive;
use ltr_featuregen::doc_features::CollectionStats;
use ltr_featuregen::forward_index::ForwardIndex;
use ltr_featuregen::term_stats;

#[derive(Parser)]
struct Args {
    #[arg(short = 'w', long = "window-file")]
    window_file: PathBuf,
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

    let forward: ForwardIndex = archive::load(&mut fs::File::open(&args.forward_index)?)
        .with_context(|| format!("loading forward index {}", args.forward_index.display()))?;
    let stats = CollectionStats::from_forward_index(&forward);

    let contents = fs::read_to_string(&args.window_file)
        .with_context(|| format!("reading window file {}", args.window_file.display()))?;

    let mut out = fs::File::create(&args.out_file)
        .with_context(|| format!("creating output file {}", args.out_file.display()))?;

    let mut written = 0u64;
    for line in contents.lines().filter(|l| !l.trim().is_empty()) {
        let (term_a, term_b, cf, postings) =
            term_stats::parse_window_line(line).with_context(|| "parsing window file")?;

        let Some(bigram_stats) = term_stats::compute_bigram_stats(&term_a, &term_b, cf, &postings, |d| {
            forward.get(d as usize).map_or(0.0, |e| e.doc_length as f64)
        }, stats) else {
            continue;
        };
        term_stats::write_bigram_stats_line(&mut out, &bigram_stats)?;
        written += 1;
    }

    eprintln!("wrote {written} bigram-stat rows (skipped pairs with fewer than {} postings)", term_stats::MIN_LIST_LEN);
    Ok(())
}
