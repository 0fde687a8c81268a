//! BM25 scoring kernel (spec §4.1; grounded on
//! `original_source/feature-gen/include/features/bm25/doc_bm25_feature.hpp`
//! and the `rank_bm25` preset structure from
//! `doc_bm25_trec3_feature.hpp`/`doc_bm25_trec3_kmax_feature.hpp`).

/// Clamp floor for the query weight, preventing a negative or zero IDF
/// term from cancelling a document's score outright.
pub const EPSILON: f64 = 1e-6;

/// `(k1, b)` tuning pair, stored as hundredths of a unit the way the
/// reference scorer's `set_k1`/`set_b` accept them (e.g. `90` -> `0.90`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Bm25Params {
    pub fn from_hundredths(k1_hundredths: u32, b_hundredths: u32) -> Self {
        Self { k1: k1_hundredths as f64 / 100.0, b: b_hundredths as f64 / 100.0 }
    }

    pub const fn atire() -> Self {
        Self { k1: 0.9, b: 0.4 }
    }

    pub const fn trec3() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }

    pub const fn trec3_kmax() -> Self {
        Self { k1: 2.0, b: 0.75 }
    }
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self::atire()
    }
}

/// Named presets recognized by the CLI tools and column writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bm25Preset {
    Atire,
    Trec3,
    Trec3Kmax,
}

impl Bm25Preset {
    pub fn params(self) -> Bm25Params {
        match self {
            Bm25Preset::Atire => Bm25Params::atire(),
            Bm25Preset::Trec3 => Bm25Params::trec3(),
            Bm25Preset::Trec3Kmax => Bm25Params::trec3_kmax(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Bm25Preset::Atire => "atire",
            Bm25Preset::Trec3 => "trec3",
            Bm25Preset::Trec3Kmax => "trec3_kmax",
        }
    }
}

/// `K_d = k1 * ((1 - b) + b * W_d / avg_dlen)`.
fn k_d(params: Bm25Params, doc_len: f64, avg_dlen: f64) -> f64 {
    params.k1 * ((1.0 - params.b) + params.b * doc_len / avg_dlen)
}

/// BM25 score for a single term: query weight clamped to `EPSILON`,
/// multiplied by the document-frequency weight.
pub fn score(
    params: Bm25Params,
    f_qt: f64,
    f_dt: f64,
    f_t: f64,
    ndocs: f64,
    doc_len: f64,
    avg_dlen: f64,
) -> f64 {
    let w_qt = (((ndocs - f_t + 0.5) / (f_t + 0.5)).ln() * f_qt).max(EPSILON);
    let kd = k_d(params, doc_len, avg_dlen);
    let w_dt = (params.k1 + 1.0) * f_dt / (kd + f_dt);
    w_dt * w_qt
}
