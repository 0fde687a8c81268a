//! `dump_bigram -i <repo> -q <queries> -l <lexicon> -w <W> -o <out>`: for
//! every unique unordered pair of distinct terms across all queries, scan
//! the whole collection for window co-occurrences and dump one summary
//! line per pair (spec §4.4; grounded on
//! `original_source/feature-gen/src/dump_bigram.cpp`). Pairs already
//! emitted for an earlier query are not repeated, matching the reference
//! tool's collection-wide `bigram_seen` set.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ltr_featuregen::archive;
use ltr_featuregen::ids::TermId;
use ltr_featuregen::lexicon::Lexicon;
use ltr_featuregen::query;
use ltr_featuregen::repo;
use ltr_featuregen::window_scanner;

#[derive(Parser)]
struct Args {
    #[arg(short = 'i')]
    repo: PathBuf,
    #[arg(short = 'q')]
    queries: PathBuf,
    #[arg(short = 'l')]
    lexicon: PathBuf,
    #[arg(short = 'w')]
    w_size: u32,
    #[arg(short = 'o')]
    out: PathBuf,
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

    let repo_contents = fs::read_to_string(&args.repo)
        .with_context(|| format!("reading repo file {}", args.repo.display()))?;
    let docs = repo::parse_all(&repo_contents).with_context(|| "parsing repo file")?;
    let forward_index = repo::build_forward_index_with_lexicon(&docs, &lexicon);

    let queries_contents = fs::read_to_string(&args.queries)
        .with_context(|| format!("reading query file {}", args.queries.display()))?;
    let queries = query::parse_all(&queries_contents, &lexicon).with_context(|| "parsing query file")?;

    let mut out = fs::File::create(&args.out)
        .with_context(|| format!("creating output file {}", args.out.display()))?;

    let mut seen: HashSet<(TermId, TermId)> = HashSet::new();
    let mut written = 0u64;

    for q in &queries {
        let mut distinct: Vec<TermId> = Vec::new();
        let mut dedup = HashSet::new();
        for &t in &q.tids {
            if t != 0 && dedup.insert(t) {
                distinct.push(t);
            }
        }
        if distinct.len() < 2 {
            eprintln!("omitting one-term query qid={}", q.id);
            continue;
        }

        for i in 0..distinct.len() {
            for j in (i + 1)..distinct.len() {
                let (a, b) = (distinct[i].min(distinct[j]), distinct[i].max(distinct[j]));
                if !seen.insert((a, b)) {
                    continue;
                }

                let mut coll_cnt = 0u64;
                let mut per_doc: Vec<(u32, u64)> = Vec::new();
                for (docid, entry) in forward_index.iter().enumerate().skip(1) {
                    let empty = Vec::new();
                    let pos_a = entry.positions.get(&a).unwrap_or(&empty);
                    let pos_b = entry.positions.get(&b).unwrap_or(&empty);
                    if pos_a.is_empty() || pos_b.is_empty() {
                        continue;
                    }
                    let cdf = window_scanner::build_cdf(&[pos_a.clone(), pos_b.clone()]);
                    let cnt = window_scanner::count_windows(&cdf, 2, args.w_size, false, true);
                    if cnt > 0 {
                        coll_cnt += cnt;
                        per_doc.push((docid as u32, cnt));
                    }
                }

                write!(out, "{} {} {} {}", lexicon[a].term, lexicon[b].term, coll_cnt, per_doc.len())?;
                for (docid, cnt) in &per_doc {
                    write!(out, " {docid}:{cnt}")?;
                }
                writeln!(out)?;
                written += 1;
            }
        }
    }

    eprintln!("wrote {written} bigram rows");
    Ok(())
}
