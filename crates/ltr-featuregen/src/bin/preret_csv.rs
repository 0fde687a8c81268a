//! `preret_csv <queries> <unigram-feats> <bigram-feats> <lexicon>`: merge
//! per-term and per-term-pair statistical summaries into one pre-retrieval
//! feature row per query (spec §4.3/§4.4; grounded on
//! `original_source/feature-gen/src/preret_csv.cpp`).
//!
//! The reference tool's actual per-query merge (`fgen_term_qry_main`,
//! `fgen_bigram_qry_main`) lives in headers not present in this project's
//! source material, so the merge here is a deliberate, documented
//! simplification: each numeric column is averaged across the query's
//! terms (or term pairs) that have a summary row, rather than reproducing
//! whatever weighting the original used.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ltr_featuregen::ids::TermId;
use ltr_featuregen::lexicon::Lexicon;
use ltr_featuregen::query;
use ltr_featuregen::term_stats;

#[derive(Parser)]
struct Args {
    queries: PathBuf,
    unigram_feats: PathBuf,
    bigram_feats: PathBuf,
    lexicon: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let lexicon: Lexicon = ltr_featuregen::archive::load(&mut fs::File::open(&args.lexicon)?)
        .with_context(|| format!("loading lexicon {}", args.lexicon.display()))?;

    let queries_contents = fs::read_to_string(&args.queries)
        .with_context(|| format!("reading query file {}", args.queries.display()))?;
    let queries = query::parse_all(&queries_contents, &lexicon).with_context(|| "parsing query file")?;

    let unigram_contents = fs::read_to_string(&args.unigram_feats)
        .with_context(|| format!("reading unigram features {}", args.unigram_feats.display()))?;
    let mut unigram_by_term: HashMap<String, Vec<f64>> = HashMap::new();
    for line in unigram_contents.lines().filter(|l| !l.trim().is_empty()) {
        let row = term_stats::parse_term_stats_line(line).with_context(|| "parsing unigram features")?;
        unigram_by_term.insert(row.term.clone(), term_stats::term_stats_columns(&row));
    }

    let bigram_contents = fs::read_to_string(&args.bigram_feats)
        .with_context(|| format!("reading bigram features {}", args.bigram_feats.display()))?;
    let mut bigram_by_pair: HashMap<(String, String), Vec<f64>> = HashMap::new();
    for line in bigram_contents.lines().filter(|l| !l.trim().is_empty()) {
        let row = term_stats::parse_bigram_stats_line(line).with_context(|| "parsing bigram features")?;
        let key = if row.term_a <= row.term_b {
            (row.term_a.clone(), row.term_b.clone())
        } else {
            (row.term_b.clone(), row.term_a.clone())
        };
        bigram_by_pair.insert(key, term_stats::bigram_stats_columns(&row));
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for q in &queries {
        let mut distinct: Vec<TermId> = Vec::new();
        let mut dedup = std::collections::HashSet::new();
        for &t in &q.tids {
            if t != 0 && dedup.insert(t) {
                distinct.push(t);
            }
        }

        let unigram_rows: Vec<Vec<f64>> = distinct
            .iter()
            .filter_map(|&t| unigram_by_term.get(&lexicon[t].term).cloned())
            .collect();

        let mut bigram_rows: Vec<Vec<f64>> = Vec::new();
        for i in 0..distinct.len() {
            for j in (i + 1)..distinct.len() {
                let (ta, tb) = (&lexicon[distinct[i]].term, &lexicon[distinct[j]].term);
                let key = if ta <= tb { (ta.clone(), tb.clone()) } else { (tb.clone(), ta.clone()) };
                if let Some(cols) = bigram_by_pair.get(&key) {
                    bigram_rows.push(cols.clone());
                }
            }
        }

        let unigram_avg = term_stats::average_columns(&unigram_rows);
        let bigram_avg = term_stats::average_columns(&bigram_rows);

        write!(out, "{}", q.id)?;
        for v in &unigram_avg {
            write!(out, ",{v:.5}")?;
        }
        for v in &bigram_avg {
            write!(out, ",{v:.5}")?;
        }
        writeln!(out)?;
    }

    Ok(())
}
