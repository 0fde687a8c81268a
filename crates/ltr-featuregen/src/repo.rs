//! Plain-text stand-in for the already-tokenized, field-annotated document
//! collection the `create_*` binaries assemble into on-disk index
//! artifacts. Producing this collection (tokenizing, stemming, field
//! annotation) is the external indexer's job and stays out of scope here;
//! this module only reads its line-oriented text rendering and performs
//! the compact offline layout assembly — vocabulary/posting aggregation —
//! that §6 still asks these binaries to do.
//!
//! One line per document, tab-separated: `docno`, `url`, `pagerank`, then
//! any number of `name:tokens` field blocks (`body`, `title`, `heading`,
//! `inlink`, `a`, `mainbody` — already-stemmed tokens, whitespace
//! separated, in document order), then an optional `tags:name=count,...`
//! block for structural tag presence counts, including the count-only
//! `applet`/`object`/`embed` tags.
//!
//! Term ids and field ids are assigned deterministically from the input
//! (terms in sorted order, fields in the reference indexer's fixed order:
//! `body, title, heading, mainbody, inlink, a`), so that `create_lexicon`,
//! `create_forward_index`, and `create_inverted_index`, run independently
//! against the same repo file, agree on the same ids without sharing state.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::doc_features::{url_slash_count, FieldIdMap};
use crate::error::{FeatureGenError, Result};
use crate::forward_index::{ForwardIndex, FreqsEntry, UrlStats};
use crate::ids::{DocId, Field, FieldId, TermId};
use crate::inverted_index::{InvertedIndex, PostingList};
use crate::lexicon::{Counts, Lexicon, Term};

/// Field names in the reference indexer's own fixed order (grounded on
/// `original_source/feature-gen/src/create_lexicon.cpp`'s `_fields`
/// vector); field ids are 1-based positions in this list.
pub const FIELD_ORDER: [&str; 6] = ["body", "title", "heading", "mainbody", "inlink", "a"];

/// One parsed document: its external id, URL, pagerank prior, field
/// blocks in document order, and structural tag counts.
#[derive(Debug, Clone, Default)]
pub struct ParsedDoc {
    pub docno: String,
    pub url: String,
    pub pagerank: f64,
    pub fields: Vec<(String, Vec<String>)>,
    pub tags: HashMap<String, u64>,
}

/// Resolve a field name to its 1-based [`FieldId`], or `None` for an
/// unrecognized block name (tolerated, not an error: an indexer producing
/// richer field sets than this one knows about should not break parsing).
pub fn field_id(name: &str) -> Option<FieldId> {
    FIELD_ORDER.iter().position(|&f| f == name).map(|i| (i + 1) as FieldId)
}

/// Build the [`FieldIdMap`] the scoring layer resolves [`Field`] variants
/// through, consistent with [`FIELD_ORDER`].
pub fn build_field_id_map() -> FieldIdMap {
    let mut map = FieldIdMap::new();
    map.insert(Field::Body, field_id("body").unwrap());
    map.insert(Field::Title, field_id("title").unwrap());
    map.insert(Field::Heading, field_id("heading").unwrap());
    map.insert(Field::Inlink, field_id("inlink").unwrap());
    map.insert(Field::A, field_id("a").unwrap());
    map.set_mainbody(field_id("mainbody").unwrap());
    map
}

/// Parse one tab-separated document line.
pub fn parse_line(line: &str) -> Result<ParsedDoc> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < 3 {
        return Err(FeatureGenError::InputFormat {
            file: "repo".into(),
            detail: format!("expected at least 3 tab-separated fields, got {}", parts.len()),
        });
    }

    let pagerank: f64 = parts[2].parse().map_err(|_| FeatureGenError::InputFormat {
        file: "repo".into(),
        detail: format!("invalid pagerank: {:?}", parts[2]),
    })?;

    let mut doc =
        ParsedDoc { docno: parts[0].to_string(), url: parts[1].to_string(), pagerank, ..Default::default() };

    for block in &parts[3..] {
        if block.is_empty() {
            continue;
        }
        let (name, rest) = block.split_once(':').ok_or_else(|| FeatureGenError::InputFormat {
            file: "repo".into(),
            detail: format!("malformed field block: {:?}", block),
        })?;

        if name == "tags" {
            for entry in rest.split(',').filter(|s| !s.is_empty()) {
                let (tag, count) = entry.split_once('=').ok_or_else(|| FeatureGenError::InputFormat {
                    file: "repo".into(),
                    detail: format!("malformed tag entry: {:?}", entry),
                })?;
                let count: u64 = count.parse().map_err(|_| FeatureGenError::InputFormat {
                    file: "repo".into(),
                    detail: format!("invalid tag count: {:?}", count),
                })?;
                doc.tags.insert(tag.to_string(), count);
            }
        } else {
            let tokens = rest.split_whitespace().map(|s| s.to_string()).collect();
            doc.fields.push((name.to_string(), tokens));
        }
    }

    Ok(doc)
}

/// Parse a whole repo file, skipping blank lines.
pub fn parse_all(contents: &str) -> Result<Vec<ParsedDoc>> {
    contents.lines().filter(|l| !l.trim().is_empty()).map(parse_line).collect()
}

/// Every distinct token across every document's field blocks, assigned a
/// dense 1-based [`TermId`] in sorted order (tag names do not participate).
pub fn build_term_ids(docs: &[ParsedDoc]) -> HashMap<String, TermId> {
    let mut set: BTreeSet<&str> = BTreeSet::new();
    for doc in docs {
        for (_, tokens) in &doc.fields {
            set.extend(tokens.iter().map(String::as_str));
        }
    }
    set.into_iter().enumerate().map(|(i, t)| (t.to_string(), (i + 1) as TermId)).collect()
}

/// `docno -> DocId` lookup, `DocId`s assigned 1-based in file order
/// (matching the order [`build_forward_index`]/[`build_inverted_index`]
/// assign documents, so a `<repo>` file used consistently across the
/// `create_*` binaries yields the same ids everywhere).
pub fn build_docno_index(docs: &[ParsedDoc]) -> HashMap<String, DocId> {
    docs.iter().enumerate().map(|(i, d)| (d.docno.clone(), (i + 1) as DocId)).collect()
}

/// Assemble the per-term, per-field vocabulary (spec §3 "Lexicon").
pub fn build_lexicon(docs: &[ParsedDoc], term_ids: &HashMap<String, TermId>) -> Lexicon {
    let mut terms: Vec<Term> = (0..term_ids.len()).map(|_| Term::default()).collect();
    for (term, &tid) in term_ids {
        terms[(tid - 1) as usize].term = term.clone();
    }

    for doc in docs {
        let mut doc_terms: HashSet<TermId> = HashSet::new();
        for (field_name, tokens) in &doc.fields {
            let fid = field_id(field_name);
            let mut field_doc_terms: HashSet<TermId> = HashSet::new();
            for tok in tokens {
                let tid = term_ids[tok.as_str()];
                doc_terms.insert(tid);
                terms[(tid - 1) as usize].counts.term_count += 1;

                if let Some(fid) = fid {
                    let c = terms[(tid - 1) as usize].field_counts.entry(fid).or_insert_with(Counts::default);
                    c.term_count += 1;
                    if field_doc_terms.insert(tid) {
                        c.document_count += 1;
                    }
                }
            }
        }
        for tid in doc_terms {
            terms[(tid - 1) as usize].counts.document_count += 1;
        }
    }

    let mut lexicon = Lexicon::new(docs.len() as u64, term_ids.len() as u64);
    for term in terms {
        lexicon.push(term);
    }
    lexicon
}

/// Assemble the per-document forward index against a fixed vocabulary
/// (spec §3 "Forward Index"). `accumulate_field_span` is called once per
/// field block (one span), not once per token in it, matching
/// [`FreqsEntry::accumulate_field_span`]'s running-cumulative-total
/// contract.
pub fn build_forward_index(docs: &[ParsedDoc], term_ids: &HashMap<String, TermId>) -> ForwardIndex {
    build_forward_index_with(docs, |tok| *term_ids.get(tok).unwrap_or(&0))
}

/// Same assembly as [`build_forward_index`], but resolving tokens through
/// a previously-built [`Lexicon`] instead of a fresh per-repo vocabulary.
/// Used by binaries that take an already-built lexicon as an input rather
/// than deriving term ids from the repo file themselves, so that the
/// resulting forward index's term ids line up with the lexicon's.
pub fn build_forward_index_with_lexicon(docs: &[ParsedDoc], lexicon: &Lexicon) -> ForwardIndex {
    build_forward_index_with(docs, |tok| lexicon.term_id(tok))
}

fn build_forward_index_with(docs: &[ParsedDoc], resolve: impl Fn(&str) -> TermId) -> ForwardIndex {
    let mut index: ForwardIndex = vec![FreqsEntry::new()];

    for doc in docs {
        let mut entry = FreqsEntry::new();
        entry.pagerank = doc.pagerank;
        entry.url_stats =
            UrlStats { url_slash_count: url_slash_count(&doc.url), url_length: doc.url.len() as u32 };
        entry.fields_stats.tags_count = doc.tags.clone();

        let mut pos: u64 = 0;
        for (field_name, tokens) in &doc.fields {
            let fid = field_id(field_name);
            for tok in tokens {
                let tid = resolve(tok.as_str());
                entry.record_occurrence(tid, pos, None);
                if let Some(fid) = fid {
                    *entry.f_ft.entry((fid, tid)).or_insert(0) += 1;
                }
                pos += 1;
            }
            if let Some(fid) = fid {
                entry.accumulate_field_span(fid, tokens.len() as u64);
            }
        }
        entry.doc_length = pos;

        index.push(entry);
    }

    index
}

/// Assemble the per-term posting lists over the whole collection (spec
/// §3 "Inverted Index").
pub fn build_inverted_index(docs: &[ParsedDoc], term_ids: &HashMap<String, TermId>) -> InvertedIndex {
    let mut lists: InvertedIndex = (0..=term_ids.len()).map(|_| PostingList::new("", 0)).collect();
    for (term, &tid) in term_ids {
        lists[tid as usize].term = term.clone();
    }

    for (doc_idx, doc) in docs.iter().enumerate() {
        let docid = (doc_idx + 1) as DocId;
        let mut doc_counts: HashMap<TermId, u32> = HashMap::new();
        for (_, tokens) in &doc.fields {
            for tok in tokens {
                if let Some(&tid) = term_ids.get(tok.as_str()) {
                    *doc_counts.entry(tid).or_insert(0) += 1;
                }
            }
        }
        for (tid, cnt) in doc_counts {
            let pl = &mut lists[tid as usize];
            pl.list.insert(docid, cnt);
            pl.total_count += cnt as u64;
        }
    }

    lists
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ParsedDoc> {
        parse_all(
            "DOC-1\thttp://a/b?q\t0.5\tbody:rust lang rust\ttitle:rust\ttags:title=1\n\
             DOC-2\thttp://c/d/e\t0.25\tbody:lang only\ttags:applet=1\n",
        )
        .unwrap()
    }

    #[test]
    fn parses_fields_and_tags() {
        let docs = sample();
        assert_eq!(docs[0].docno, "DOC-1");
        assert_eq!(docs[0].pagerank, 0.5);
        assert_eq!(docs[0].fields[0], ("body".to_string(), vec!["rust".into(), "lang".into(), "rust".into()]));
        assert_eq!(docs[0].tags["title"], 1);
    }

    #[test]
    fn term_ids_are_sorted_and_dense() {
        let docs = sample();
        let ids = build_term_ids(&docs);
        assert_eq!(ids.len(), 3); // rust, lang, only
        let mut sorted: Vec<&TermId> = ids.values().collect();
        sorted.sort();
        assert_eq!(sorted, vec![&1, &2, &3]);
    }

    #[test]
    fn lexicon_counts_documents_and_terms() {
        let docs = sample();
        let ids = build_term_ids(&docs);
        let lexicon = build_lexicon(&docs, &ids);
        let rust_id = ids["rust"];
        assert_eq!(lexicon[rust_id].document_count(), 1);
        assert_eq!(lexicon[rust_id].term_count(), 2);
        let lang_id = ids["lang"];
        assert_eq!(lexicon[lang_id].document_count(), 2);
        assert_eq!(lexicon[lang_id].term_count(), 2);
    }

    #[test]
    fn forward_index_accumulates_span_once_per_block() {
        let docs = sample();
        let ids = build_term_ids(&docs);
        let fwd = build_forward_index(&docs, &ids);
        let body_id = field_id("body").unwrap();
        assert_eq!(fwd[1].field_length(body_id), 3);
        assert_eq!(fwd[1].doc_length, 4);
        assert_eq!(fwd[1].term_freq(ids["rust"]), 2);
    }

    #[test]
    fn inverted_index_collects_postings() {
        let docs = sample();
        let ids = build_term_ids(&docs);
        let inv = build_inverted_index(&docs, &ids);
        let lang_id = ids["lang"];
        assert_eq!(inv[lang_id as usize].document_count(), 2);
        assert_eq!(inv[lang_id as usize].freq(2), 1);
    }

    #[test]
    fn forward_index_with_lexicon_matches_lexicons_own_ids() {
        let docs = sample();
        let ids = build_term_ids(&docs);
        let lexicon = build_lexicon(&docs, &ids);
        let fwd = build_forward_index_with_lexicon(&docs, &lexicon);
        assert_eq!(fwd[1].term_freq(lexicon.term_id("rust")), 2);
    }

    #[test]
    fn docno_index_matches_file_order() {
        let docs = sample();
        let idx = build_docno_index(&docs);
        assert_eq!(idx["DOC-1"], 1);
        assert_eq!(idx["DOC-2"], 2);
    }
}
