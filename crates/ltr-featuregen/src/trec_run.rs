//! TREC-run file parsing: the ranked candidate list per query, with its
//! first-stage score and relevance label (spec §3 "TrecRunRow", §6 input
//! format: `qid iter docno rank score runid label`).

use std::collections::BTreeMap;

use crate::error::{FeatureGenError, Result};

/// One candidate (query, document) pair as read from a TREC-run line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrecRunRow {
    pub qid: i64,
    pub docno: String,
    pub rank: i64,
    pub stage0_score: f64,
    pub runid: String,
    pub label: i64,
}

/// Parse one whitespace-separated `qid iter docno rank score runid label`
/// line.
pub fn parse_line(line: &str) -> Result<TrecRunRow> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 7 {
        return Err(FeatureGenError::InputFormat {
            file: "trec-run".into(),
            detail: format!("expected 7 whitespace-separated fields, got {}", fields.len()),
        });
    }

    let bad = |name: &'static str| FeatureGenError::InputFormat {
        file: "trec-run".into(),
        detail: format!("invalid {name} field: {:?}", line),
    };

    let qid: i64 = fields[0].parse().map_err(|_| bad("qid"))?;
    let docno = fields[2].to_string();
    let rank: i64 = fields[3].parse().map_err(|_| bad("rank"))?;
    let stage0_score: f64 = fields[4].parse().map_err(|_| bad("score"))?;
    let runid = fields[5].to_string();
    let label: i64 = fields[6].parse().map_err(|_| bad("label"))?;

    Ok(TrecRunRow { qid, docno, rank, stage0_score, runid, label })
}

/// Parse a whole run file and group its rows by query id, in file order.
pub fn parse_all(contents: &str) -> Result<BTreeMap<i64, Vec<TrecRunRow>>> {
    let mut grouped: BTreeMap<i64, Vec<TrecRunRow>> = BTreeMap::new();
    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let row = parse_line(line)?;
        grouped.entry(row.qid).or_default().push(row);
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_line() {
        let row = parse_line("12 Q0 DOC-001 3 7.25 myrun 1").unwrap();
        assert_eq!(row.qid, 12);
        assert_eq!(row.docno, "DOC-001");
        assert_eq!(row.rank, 3);
        assert_eq!(row.stage0_score, 7.25);
        assert_eq!(row.runid, "myrun");
        assert_eq!(row.label, 1);
    }

    #[test]
    fn wrong_field_count_is_an_error() {
        assert!(parse_line("12 Q0 DOC-001 3 7.25 myrun").is_err());
    }

    #[test]
    fn groups_by_qid_preserving_order() {
        let contents = "1 Q0 a 1 1.0 r 0\n1 Q0 b 2 0.5 r 1\n2 Q0 c 1 2.0 r 0\n";
        let grouped = parse_all(contents).unwrap();
        assert_eq!(grouped[&1].iter().map(|r| r.docno.clone()).collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(grouped[&2].len(), 1);
    }
}
