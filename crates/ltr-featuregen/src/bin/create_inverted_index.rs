//! `create_inverted_index <repo> <out>`: assemble the per-term posting
//! lists over the whole collection and write them as a binary artifact.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ltr_featuregen::archive;
use ltr_featuregen::repo;

#[derive(Parser)]
struct Args {
    repo: PathBuf,
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

    let contents = fs::read_to_string(&args.repo)
        .with_context(|| format!("reading repo file {}", args.repo.display()))?;
    let docs = repo::parse_all(&contents).with_context(|| "parsing repo file")?;
    let term_ids = repo::build_term_ids(&docs);
    let index = repo::build_inverted_index(&docs, &term_ids);

    let mut out = fs::File::create(&args.out)
        .with_context(|| format!("creating output file {}", args.out.display()))?;
    archive::save(&mut out, &index).with_context(|| "writing inverted index")?;

    eprintln!("wrote {} terms", index.len().saturating_sub(1));
    Ok(())
}
