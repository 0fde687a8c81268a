//! Batch feature generation for learning-to-rank training and inference.
//!
//! This crate re-scores TREC-run candidate lists against a prebuilt set of
//! index artifacts (lexicon, forward index, inverted index), producing one
//! fixed-width CSV row per (query, document) candidate.
//!
//! # Pipeline Stage
//!
//! ```text
//! query file + TREC run → [featuregen] → CSV feature rows → [rank-learn]
//! ```
//!
//! # Features
//!
//! - **Scoring kernels**: BM25 (atire/trec3/trec3_kmax), LM-Dirichlet
//!   (µ=1000/1500/2500), TF·IDF, raw probability, Bose-Einstein, DPH, DFR.
//! - **Proximity**: bigram window counts and a BM25+BCTP term-proximity
//!   score.
//! - **Term statistics**: order statistics of a scorer's value distribution
//!   across a whole posting list.
//!
//! # Design
//!
//! This crate focuses on **feature extraction** from already-built indexes.
//! Building those indexes from a raw document collection, and training a
//! ranking model from the emitted rows, are out of scope here.
//!
//! **Boundaries:**
//! - document feature extraction, scoring kernels, window scanning
//! - index artifact types (serialized elsewhere, by the `create_*` binaries)
//! - training a model from the CSV output

/// Dense integer identifiers (`DocId`, `TermId`, `FieldId`) and the
/// well-known document fields.
pub mod ids;

/// Error types for feature generation.
pub mod error;

/// Framed binary serialization for the index artifacts.
pub mod archive;

/// Collection vocabulary and per-term, per-field statistics.
pub mod lexicon;

/// Per-document term postings and structural statistics.
pub mod forward_index;

/// Per-term posting lists over the whole collection.
pub mod inverted_index;

/// BM25 scoring kernel.
pub mod bm25;

/// Dirichlet-smoothed language-model scoring kernel.
pub mod lmdir;

/// TF·IDF scoring kernel.
pub mod tfidf;

/// Raw within-document term-frequency scoring kernel.
pub mod probability;

/// Bose-Einstein (DFR) scoring kernel.
pub mod bose_einstein;

/// DPH (DFR) scoring kernel.
pub mod dph;

/// DFR/BB2 scoring kernel.
pub mod dfr;

/// Tagged-variant dispatch over the scoring kernels.
pub mod scorer;

/// Sliding-window proximity and co-occurrence counting.
pub mod window_scanner;

/// Per-term statistical summaries over a scorer's posting-list values.
pub mod term_stats;

/// Query-train file parsing.
pub mod query;

/// TREC-run file parsing.
pub mod trec_run;

/// Plain-text collection format and index-assembly helpers for the
/// `create_*` binaries.
pub mod repo;

/// Per-document, per-query feature extraction.
pub mod doc_features;

/// Fixed-column-order feature row formatting.
pub mod writer;

pub use error::{FeatureGenError, Result};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::doc_features::{CollectionStats, DocEntry, FieldIdMap};
    pub use crate::forward_index::{FreqsEntry, ForwardIndex};
    pub use crate::ids::{DocId, Field, FieldId, TermId};
    pub use crate::inverted_index::{InvertedIndex, PostingList};
    pub use crate::lexicon::Lexicon;
    pub use crate::query::QueryTrain;
    pub use crate::scorer::Scorer;
    pub use crate::trec_run::TrecRunRow;
    pub use crate::FeatureGenError;
}
