//! Per-term statistical summaries over a scorer's value distribution across
//! an entire posting list (spec §4.3; grounded on
//! `original_source/feature-gen/include/term_feature.hpp` and
//! `original_source/feature-gen/src/fgen_term.cpp`).

use std::io::Write;

use crate::bm25::Bm25Params;
use crate::doc_features::CollectionStats;
use crate::error::{FeatureGenError, Result};
use crate::ids::DocId;
use crate::inverted_index::PostingList;
use crate::lmdir::Mu;
use crate::scorer::{Inputs, Scorer};

const ZETA: f64 = 1.960;

/// Minimum posting-list size a term must have before it gets a summary;
/// shorter lists are skipped entirely (spec §4.3).
pub const MIN_LIST_LEN: usize = 4;

/// Order statistics over one scorer's values for a single term.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    pub median: f64,
    pub first: f64,
    pub third: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub confidence: f64,
    pub hmean: f64,
}

/// Summary for a single term across all seven scorers, plus the
/// `geo_mean` over raw posting frequencies and the collection counts.
#[derive(Debug, Clone, Default)]
pub struct TermStats {
    pub term: String,
    pub cf: u64,
    pub cdf: u64,
    pub geo_mean: f64,
    pub bm25: Stats,
    pub tfidf: Stats,
    pub lm: Stats,
    pub dfr: Stats,
    pub dph: Stats,
    pub be: Stats,
    pub pr: Stats,
}

/// `(sum of raw posting frequencies) ^ (1/|list|)`. Not a true geometric
/// mean (which would take the product): this reproduces the reference
/// summarizer's formula as-is.
pub fn geo_mean(posting: &PostingList) -> f64 {
    let sum: f64 = posting.list.values().map(|&f| f as f64).sum();
    sum.powf(1.0 / posting.list.len() as f64)
}

/// Compute order statistics over `values`. `values` is sorted in place,
/// descending, matching the reference summarizer's layout so that index
/// `0` is the max and the last index is the min.
pub fn compute_stats(values: &mut [f64]) -> Stats {
    values.sort_by(|a, b| b.partial_cmp(a).unwrap());
    let size = values.len();
    let mid = size / 2;
    let lq = size / 4;
    let uq = 3 * size / 4;

    let at_pair = |k: usize| {
        if size % 2 == 0 {
            (values[k] + values[k - 1]) / 2.0
        } else {
            values[k]
        }
    };

    let sum: f64 = values.iter().sum();
    let sum_sqrs: f64 = values.iter().map(|v| v * v).sum();
    let hmsum: f64 = values.iter().map(|v| 1.0 / v).sum();

    let avg = sum / size as f64;
    let variance = sum_sqrs / size as f64 - avg * avg;

    Stats {
        median: at_pair(mid),
        first: at_pair(lq),
        third: at_pair(uq),
        max: values[0],
        min: values[size - 1],
        avg,
        variance,
        std_dev: variance.sqrt(),
        confidence: ZETA * (variance.sqrt() / (size as f64).sqrt()),
        hmean: size as f64 / hmsum,
    }
}

/// Run every scorer over one posting list's `(doc, freq)` pairs and
/// summarize each scorer's value distribution (spec §4.3; grounded on
/// `fgen_term.cpp`'s `compute_*_stats` calls). `doc_len` resolves a doc id
/// to its document length (or field length, for a field-scoped list);
/// lists shorter than [`MIN_LIST_LEN`] are skipped entirely, matching the
/// reference tool's "IQR computation goes boom below 4" comment. Query
/// term frequency is fixed at 1, as in the reference's
/// `calculate_docscore(1, ...)` calls — term-level stats summarize a
/// single term's own distribution, not a multi-term query.
pub fn compute_term_stats(
    term: &str,
    cf: u64,
    postings: &[(DocId, u32)],
    doc_len: impl Fn(DocId) -> f64,
    stats: CollectionStats,
) -> Option<TermStats> {
    if postings.len() < MIN_LIST_LEN {
        return None;
    }

    let cdf = postings.len() as u64;
    let f_t = cdf as f64;
    let sum_freq: f64 = postings.iter().map(|&(_, f)| f as f64).sum();
    let geo_mean = sum_freq.powf(1.0 / postings.len() as f64);

    let mut bm25_vals = Vec::with_capacity(postings.len());
    let mut tfidf_vals = Vec::with_capacity(postings.len());
    let mut lm_vals = Vec::with_capacity(postings.len());
    let mut dfr_vals = Vec::with_capacity(postings.len());
    let mut dph_vals = Vec::with_capacity(postings.len());
    let mut be_vals = Vec::with_capacity(postings.len());
    let mut pr_vals = Vec::with_capacity(postings.len());

    for &(doc, freq) in postings {
        let inputs = Inputs {
            f_qt: 1.0,
            f_dt: freq as f64,
            f_t,
            c_f: cf as f64,
            doc_len: doc_len(doc),
            ndocs: stats.ndocs,
            avg_dlen: stats.avg_dlen,
            coll_len: stats.coll_len,
        };
        bm25_vals.push(Scorer::Bm25(Bm25Params::atire()).score(inputs));
        tfidf_vals.push(Scorer::Tfidf.score(inputs));
        lm_vals.push(Scorer::LmDir(Mu::Mu2500).score(inputs));
        dfr_vals.push(Scorer::Dfr.score(inputs));
        dph_vals.push(Scorer::Dph.score(inputs));
        be_vals.push(Scorer::Be.score(inputs));
        pr_vals.push(Scorer::Prob.score(inputs));
    }

    Some(TermStats {
        term: term.to_string(),
        cf,
        cdf,
        geo_mean,
        bm25: compute_stats(&mut bm25_vals),
        tfidf: compute_stats(&mut tfidf_vals),
        lm: compute_stats(&mut lm_vals),
        dfr: compute_stats(&mut dfr_vals),
        dph: compute_stats(&mut dph_vals),
        be: compute_stats(&mut be_vals),
        pr: compute_stats(&mut pr_vals),
    })
}

fn write_stats<W: Write>(out: &mut W, s: &Stats) -> Result<()> {
    write!(
        out,
        " {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
        s.median, s.first, s.third, s.max, s.min, s.avg, s.variance, s.std_dev, s.confidence, s.hmean
    )?;
    Ok(())
}

fn parse_stats(fields: &mut impl Iterator<Item = String>) -> Result<Stats> {
    let mut next = || -> Result<f64> {
        let raw = fields.next().ok_or_else(|| FeatureGenError::InputFormat {
            file: "term-stats".into(),
            detail: "unexpected end of line".into(),
        })?;
        raw.parse().map_err(|_| FeatureGenError::InputFormat {
            file: "term-stats".into(),
            detail: format!("invalid numeric field: {:?}", raw),
        })
    };
    Ok(Stats {
        median: next()?,
        first: next()?,
        third: next()?,
        max: next()?,
        min: next()?,
        avg: next()?,
        variance: next()?,
        std_dev: next()?,
        confidence: next()?,
        hmean: next()?,
    })
}

/// Write one term's summary line: `term cf cdf geo_mean <bm25 x10> <tfidf
/// x10> <lm x10> <pr x10> <be x10> <dph x10> <dfr x10>`, space-separated,
/// 6 fractional digits (spec §4.3; grounded on
/// `term_feature.hpp::operator<<`, which fixes precision at 6 rather than
/// the feature writer's 5).
pub fn write_term_stats_line<W: Write>(out: &mut W, s: &TermStats) -> Result<()> {
    write!(out, "{} {} {} {:.6}", s.term, s.cf, s.cdf, s.geo_mean)?;
    write_stats(out, &s.bm25)?;
    write_stats(out, &s.tfidf)?;
    write_stats(out, &s.lm)?;
    write_stats(out, &s.pr)?;
    write_stats(out, &s.be)?;
    write_stats(out, &s.dph)?;
    write_stats(out, &s.dfr)?;
    writeln!(out)?;
    Ok(())
}

/// Summary for a term pair, as produced from a window file's bigram
/// postings (spec §4.4; grounded on
/// `original_source/feature-gen/src/fgen_bigram.cpp`). Same seven
/// scorer-stat blocks as [`TermStats`], keyed by two term strings instead
/// of one.
#[derive(Debug, Clone, Default)]
pub struct BigramStats {
    pub term_a: String,
    pub term_b: String,
    pub cf: u64,
    pub cdf: u64,
    pub geo_mean: f64,
    pub bm25: Stats,
    pub tfidf: Stats,
    pub lm: Stats,
    pub dfr: Stats,
    pub dph: Stats,
    pub be: Stats,
    pub pr: Stats,
}

/// Run [`compute_term_stats`] over a bigram's window-count postings,
/// attaching both term strings to the result.
pub fn compute_bigram_stats(
    term_a: &str,
    term_b: &str,
    cf: u64,
    postings: &[(DocId, u32)],
    doc_len: impl Fn(DocId) -> f64,
    stats: CollectionStats,
) -> Option<BigramStats> {
    let combined = format!("{term_a}\u{1}{term_b}");
    let s = compute_term_stats(&combined, cf, postings, doc_len, stats)?;
    Some(BigramStats {
        term_a: term_a.to_string(),
        term_b: term_b.to_string(),
        cf: s.cf,
        cdf: s.cdf,
        geo_mean: s.geo_mean,
        bm25: s.bm25,
        tfidf: s.tfidf,
        lm: s.lm,
        dfr: s.dfr,
        dph: s.dph,
        be: s.be,
        pr: s.pr,
    })
}

/// Write one bigram's summary line: `term_a term_b cf cdf geo_mean <bm25
/// x10> <tfidf x10> <lm x10> <pr x10> <be x10> <dph x10> <dfr x10>`.
pub fn write_bigram_stats_line<W: Write>(out: &mut W, s: &BigramStats) -> Result<()> {
    write!(out, "{} {} {} {} {:.6}", s.term_a, s.term_b, s.cf, s.cdf, s.geo_mean)?;
    write_stats(out, &s.bm25)?;
    write_stats(out, &s.tfidf)?;
    write_stats(out, &s.lm)?;
    write_stats(out, &s.pr)?;
    write_stats(out, &s.be)?;
    write_stats(out, &s.dph)?;
    write_stats(out, &s.dfr)?;
    writeln!(out)?;
    Ok(())
}

/// Parse a line written by [`write_bigram_stats_line`].
pub fn parse_bigram_stats_line(line: &str) -> Result<BigramStats> {
    let mut fields = line.split_whitespace().map(str::to_string);
    let bad = || FeatureGenError::InputFormat {
        file: "bigram-stats".into(),
        detail: format!("malformed bigram-stats line: {:?}", line),
    };
    let term_a = fields.next().ok_or_else(bad)?;
    let term_b = fields.next().ok_or_else(bad)?;
    let cf: u64 = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let cdf: u64 = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let geo_mean: f64 = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;

    Ok(BigramStats {
        term_a,
        term_b,
        cf,
        cdf,
        geo_mean,
        bm25: parse_stats(&mut fields)?,
        tfidf: parse_stats(&mut fields)?,
        lm: parse_stats(&mut fields)?,
        pr: parse_stats(&mut fields)?,
        be: parse_stats(&mut fields)?,
        dph: parse_stats(&mut fields)?,
        dfr: parse_stats(&mut fields)?,
    })
}

/// Parse a window file line written by `dump_bigram`: `term_a term_b cf
/// cdf docid:freq ...` (`cdf` entries). Returns the two term strings, the
/// collection-wide count, and the per-document postings.
pub fn parse_window_line(line: &str) -> Result<(String, String, u64, Vec<(DocId, u32)>)> {
    let bad = || FeatureGenError::InputFormat {
        file: "window-file".into(),
        detail: format!("malformed window-file line: {:?}", line),
    };
    let mut fields = line.split_whitespace();
    let term_a = fields.next().ok_or_else(bad)?.to_string();
    let term_b = fields.next().ok_or_else(bad)?.to_string();
    let cf: u64 = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let cdf: u64 = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;

    let mut postings = Vec::with_capacity(cdf as usize);
    for entry in fields {
        let (docid, freq) = entry.split_once(':').ok_or_else(bad)?;
        let docid: DocId = docid.parse().map_err(|_| bad())?;
        let freq: u32 = freq.parse().map_err(|_| bad())?;
        postings.push((docid, freq));
    }
    if postings.len() as u64 != cdf {
        return Err(FeatureGenError::InputFormat {
            file: "window-file".into(),
            detail: format!("declared cdf {cdf} does not match {} postings", postings.len()),
        });
    }

    Ok((term_a, term_b, cf, postings))
}

/// Parse a line written by [`write_term_stats_line`].
pub fn parse_term_stats_line(line: &str) -> Result<TermStats> {
    let mut fields = line.split_whitespace().map(str::to_string);
    let bad = || FeatureGenError::InputFormat {
        file: "term-stats".into(),
        detail: format!("malformed term-stats line: {:?}", line),
    };
    let term = fields.next().ok_or_else(bad)?;
    let cf: u64 = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let cdf: u64 = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let geo_mean: f64 = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;

    Ok(TermStats {
        term,
        cf,
        cdf,
        geo_mean,
        bm25: parse_stats(&mut fields)?,
        tfidf: parse_stats(&mut fields)?,
        lm: parse_stats(&mut fields)?,
        pr: parse_stats(&mut fields)?,
        be: parse_stats(&mut fields)?,
        dph: parse_stats(&mut fields)?,
        dfr: parse_stats(&mut fields)?,
    })
}

fn stats_columns(s: &Stats) -> [f64; 10] {
    [s.median, s.first, s.third, s.max, s.min, s.avg, s.variance, s.std_dev, s.confidence, s.hmean]
}

/// Flatten every numeric column of a [`TermStats`] row (excluding the term
/// string itself) into the fixed order `cf cdf geo_mean <bm25 tfidf lm pr
/// be dph dfr>`, for column-wise averaging across a query's present terms.
pub fn term_stats_columns(s: &TermStats) -> Vec<f64> {
    let mut cols = vec![s.cf as f64, s.cdf as f64, s.geo_mean];
    for block in [&s.bm25, &s.tfidf, &s.lm, &s.pr, &s.be, &s.dph, &s.dfr] {
        cols.extend(stats_columns(block));
    }
    cols
}

/// Flatten a [`BigramStats`] row the same way as [`term_stats_columns`].
pub fn bigram_stats_columns(s: &BigramStats) -> Vec<f64> {
    let mut cols = vec![s.cf as f64, s.cdf as f64, s.geo_mean];
    for block in [&s.bm25, &s.tfidf, &s.lm, &s.pr, &s.be, &s.dph, &s.dfr] {
        cols.extend(stats_columns(block));
    }
    cols
}

/// Number of numeric columns [`term_stats_columns`]/[`bigram_stats_columns`]
/// produce: `cf cdf geo_mean` plus 7 ten-column scorer-stat blocks.
pub const STATS_COLUMN_COUNT: usize = 3 + 7 * 10;

/// Elementwise mean of a set of equal-length column vectors, or all-zero
/// if `rows` is empty.
pub fn average_columns(rows: &[Vec<f64>]) -> Vec<f64> {
    if rows.is_empty() {
        return vec![0.0; STATS_COLUMN_COUNT];
    }
    let mut sums = vec![0.0; rows[0].len()];
    for row in rows {
        for (sum, &v) in sums.iter_mut().zip(row) {
            *sum += v;
        }
    }
    let n = rows.len() as f64;
    sums.into_iter().map(|s| s / n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_probability_worked_example() {
        // posting freqs [10,20,30,40] over doclen=[100,100,100,100]:
        // probability scores = [0.1, 0.2, 0.3, 0.4].
        let mut values = vec![0.1, 0.2, 0.3, 0.4];
        let stats = compute_stats(&mut values);
        assert!((stats.max - 0.4).abs() < 1e-9);
        assert!((stats.min - 0.1).abs() < 1e-9);
        assert!((stats.median - 0.25).abs() < 1e-9);
        assert!((stats.first - 0.35).abs() < 1e-9);
        assert!((stats.third - 0.15).abs() < 1e-9);
        assert!((stats.avg - 0.25).abs() < 1e-9);
        assert!((stats.variance - 0.0125).abs() < 1e-9);
        assert!((stats.hmean - 0.19200).abs() < 1e-3);
    }

    #[test]
    fn std_dev_is_sqrt_of_the_actually_computed_variance() {
        let mut values = vec![1.0, 2.0, 3.0, 4.0];
        let stats = compute_stats(&mut values);
        assert!((stats.std_dev - stats.variance.sqrt()).abs() < 1e-12);
        assert!(stats.std_dev > 0.0);
    }

    #[test]
    fn geo_mean_uses_sum_not_product() {
        let mut pl = PostingList::new("t", 100);
        pl.list.insert(1, 10);
        pl.list.insert(2, 20);
        pl.list.insert(3, 30);
        pl.list.insert(4, 40);
        let g = geo_mean(&pl);
        let expected = (10.0_f64 + 20.0 + 30.0 + 40.0).powf(0.25);
        assert!((g - expected).abs() < 1e-9);
    }

    #[test]
    fn ordering_invariant_holds() {
        let mut values = vec![5.0, 1.0, 9.0, 3.0, 7.0, 2.0, 8.0];
        let stats = compute_stats(&mut values);
        // Values are sorted descending, so `first` is the upper quartile
        // and `third` the lower one.
        assert!(stats.min <= stats.third);
        assert!(stats.third <= stats.median);
        assert!(stats.median <= stats.first);
        assert!(stats.first <= stats.max);
        assert!(stats.avg >= stats.min && stats.avg <= stats.max);
        assert!(stats.hmean <= stats.avg);
    }

    fn sample_collection_stats() -> CollectionStats {
        CollectionStats { ndocs: 1000.0, avg_dlen: 100.0, coll_len: 100_000.0 }
    }

    #[test]
    fn compute_term_stats_skips_short_lists() {
        let postings = vec![(1, 2), (2, 3)];
        let result = compute_term_stats("rust", 50, &postings, |_| 100.0, sample_collection_stats());
        assert!(result.is_none());
    }

    #[test]
    fn compute_term_stats_fills_every_block() {
        let postings = vec![(1, 2), (2, 3), (3, 1), (4, 5)];
        let result =
            compute_term_stats("rust", 50, &postings, |_| 100.0, sample_collection_stats()).unwrap();
        assert_eq!(result.term, "rust");
        assert_eq!(result.cdf, 4);
        assert!(result.bm25.max >= result.bm25.min);
        assert!(result.lm.avg.is_finite());
    }

    #[test]
    fn round_trips_through_write_and_parse() {
        let postings = vec![(1, 2), (2, 3), (3, 1), (4, 5)];
        let original =
            compute_term_stats("rust", 50, &postings, |_| 100.0, sample_collection_stats()).unwrap();

        let mut buf = Vec::new();
        write_term_stats_line(&mut buf, &original).unwrap();
        let line = String::from_utf8(buf).unwrap();
        let parsed = parse_term_stats_line(line.trim_end()).unwrap();

        assert_eq!(parsed.term, original.term);
        assert_eq!(parsed.cf, original.cf);
        assert_eq!(parsed.cdf, original.cdf);
        assert!((parsed.geo_mean - original.geo_mean).abs() < 1e-5);
        assert!((parsed.bm25.avg - original.bm25.avg).abs() < 1e-5);
    }

    #[test]
    fn window_line_round_trips_into_bigram_stats() {
        let line = "rust lang 12 4 1:2 2:1 3:3 4:1";
        let (term_a, term_b, cf, postings) = parse_window_line(line).unwrap();
        assert_eq!((term_a.as_str(), term_b.as_str(), cf), ("rust", "lang", 12));
        assert_eq!(postings, vec![(1, 2), (2, 1), (3, 3), (4, 1)]);

        let stats =
            compute_bigram_stats(&term_a, &term_b, cf, &postings, |_| 100.0, sample_collection_stats())
                .unwrap();

        let mut buf = Vec::new();
        write_bigram_stats_line(&mut buf, &stats).unwrap();
        let written = String::from_utf8(buf).unwrap();
        let parsed = parse_bigram_stats_line(written.trim_end()).unwrap();
        assert_eq!(parsed.term_a, "rust");
        assert_eq!(parsed.term_b, "lang");
        assert_eq!(parsed.cdf, 4);
    }

    #[test]
    fn window_line_rejects_cdf_mismatch() {
        let line = "rust lang 12 5 1:2 2:1";
        assert!(parse_window_line(line).is_err());
    }

    #[test]
    fn average_columns_is_zero_for_no_rows() {
        let avg = average_columns(&[]);
        assert_eq!(avg.len(), STATS_COLUMN_COUNT);
        assert!(avg.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn average_columns_averages_elementwise() {
        let avg = average_columns(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(avg, vec![2.0, 3.0]);
    }
}
