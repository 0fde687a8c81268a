//! Classic TF-IDF scoring kernel (spec §4.1; grounded on
//! `original_source/feature-gen/include/features/tfidf/doc_tfidf_feature.hpp`).

/// `score = (1/W_d) * (1 + log f_dt) * log(1 + ndocs/f_t)`.
pub fn score(f_dt: f64, f_t: f64, doc_len: f64, ndocs: f64) -> f64 {
    (1.0 / doc_len) * (1.0 + f_dt.ln()) * (1.0 + ndocs / f_t).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_hand_computation() {
        let s = score(5.0, 50.0, 120.0, 1000.0);
        let expected = (1.0 / 120.0) * (1.0 + 5.0_f64.ln()) * (1.0 + 1000.0 / 50.0).ln();
        assert!((s - expected).abs() < 1e-12);
        assert!(s.is_finite());
    }

    #[test]
    fn longer_documents_score_lower_for_same_frequency() {
        let short = score(5.0, 50.0, 60.0, 1000.0);
        let long = score(5.0, 50.0, 600.0, 1000.0);
        assert!(long < short);
    }
}
