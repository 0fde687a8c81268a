//! Raw maximum-likelihood term probability kernel (spec §4.1; grounded on
//! `original_source/feature-gen/include/features/probability/doc_prob_feature.hpp`).

/// `score = f_dt / W_d`.
pub fn score(f_dt: f64, doc_len: f64) -> f64 {
    f_dt / doc_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_worked_example() {
        assert_eq!(score(4.0, 50.0), 0.08);
    }

    #[test]
    fn full_length_single_term_query_is_one() {
        assert_eq!(score(50.0, 50.0), 1.0);
    }
}
