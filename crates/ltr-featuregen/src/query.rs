//! Query-train file parsing (spec §3 "Query"; grounded on
//! `original_source/feature-gen/include/query_train_file.hpp`). Stemming
//! happens upstream of this crate: the tokens in a query file's second
//! `;`-delimited field are already stemmed surface forms.

use std::collections::HashMap;

use crate::error::{FeatureGenError, Result};
use crate::ids::TermId;
use crate::lexicon::Lexicon;

/// One parsed query: its id, stemmed term tokens in order, their resolved
/// term ids, and the query-term-frequency map scorers read from.
#[derive(Debug, Clone, Default)]
pub struct QueryTrain {
    pub id: i64,
    pub stems: Vec<String>,
    pub tids: Vec<TermId>,
    pub q_ft: HashMap<TermId, u64>,
}

/// Parse one `<qid>;<space separated stemmed terms>` line. Any line not
/// splitting into exactly two `;`-delimited fields is a fatal input error
/// (mirrors the reference parser's `throw std::logic_error`).
pub fn parse_line(line: &str, lexicon: &Lexicon) -> Result<QueryTrain> {
    let parts: Vec<&str> = line.split(';').collect();
    if parts.len() != 2 {
        return Err(FeatureGenError::InputFormat {
            file: "query-train".into(),
            detail: format!("expected 2 fields separated by ';', got {}", parts.len()),
        });
    }

    let id: i64 = parts[0].trim().parse().map_err(|_| FeatureGenError::InputFormat {
        file: "query-train".into(),
        detail: format!("invalid query id: {:?}", parts[0]),
    })?;

    let mut query = QueryTrain { id, ..Default::default() };
    for token in parts[1].split_whitespace() {
        let tid = lexicon.term_id(token);
        query.stems.push(token.to_string());
        query.tids.push(tid);
        *query.q_ft.entry(tid).or_insert(0) += 1;
    }

    Ok(query)
}

/// Parse every line of a query-train file, skipping blank lines.
pub fn parse_all(contents: &str, lexicon: &Lexicon) -> Result<Vec<QueryTrain>> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_line(line, lexicon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{Counts, Term};

    fn sample_lexicon() -> Lexicon {
        let mut lex = Lexicon::new(100, 10);
        lex.push(Term {
            term: "rust".into(),
            counts: Counts { document_count: 10, term_count: 40 },
            field_counts: HashMap::new(),
        });
        lex.push(Term {
            term: "lang".into(),
            counts: Counts { document_count: 5, term_count: 12 },
            field_counts: HashMap::new(),
        });
        lex
    }

    #[test]
    fn parses_qid_and_terms() {
        let lex = sample_lexicon();
        let q = parse_line("7;rust lang rust", &lex).unwrap();
        assert_eq!(q.id, 7);
        assert_eq!(q.stems, vec!["rust", "lang", "rust"]);
        assert_eq!(q.tids, vec![1, 2, 1]);
        assert_eq!(q.q_ft[&1], 2);
        assert_eq!(q.q_ft[&2], 1);
    }

    #[test]
    fn oov_term_resolves_to_sentinel() {
        let lex = sample_lexicon();
        let q = parse_line("1;rust unknownword", &lex).unwrap();
        assert_eq!(q.tids, vec![1, 0]);
    }

    #[test]
    fn malformed_line_is_an_error() {
        let lex = sample_lexicon();
        assert!(parse_line("no-semicolon-here", &lex).is_err());
        assert!(parse_line("1;two;three", &lex).is_err());
    }
}
