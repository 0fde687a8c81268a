//! DFR/BB2 scoring kernel (spec §4.1; grounded on
//! `original_source/feature-gen/include/features/dfr/doc_dfr_feature.hpp`).

/// `ne = ndocs*(1 - ((ndocs-1)/ndocs)^c_f)`,
/// `ir = log2((ndocs+1)/(ne+0.5))`,
/// `p = f_dt*log2(1+avg_dlen/W_d)`,
/// `score = p*ir*((c_f+1)/(c_idf*(p+1)))` where `c_idf = f_t`.
pub fn score(f_dt: f64, c_f: f64, c_idf: f64, ndocs: f64, avg_dlen: f64, doc_len: f64) -> f64 {
    let ne = ndocs * (1.0 - ((ndocs - 1.0) / ndocs).powf(c_f));
    let ir = ((ndocs + 1.0) / (ne + 0.5)).log2();
    let p = f_dt * (1.0 + avg_dlen / doc_len).log2();
    p * ir * ((c_f + 1.0) / (c_idf * (p + 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_for_in_domain_inputs() {
        let s = score(5.0, 10000.0, 50.0, 1000.0, 100.0, 120.0);
        assert!(s.is_finite());
    }

    #[test]
    fn matches_hand_computation() {
        let f_dt = 3.0;
        let c_f = 800.0;
        let c_idf = 40.0;
        let ndocs = 3000.0;
        let avg_dlen = 110.0;
        let doc_len = 95.0;
        let ne = ndocs * (1.0 - ((ndocs - 1.0) / ndocs).powf(c_f));
        let ir = ((ndocs + 1.0) / (ne + 0.5)).log2();
        let p = f_dt * (1.0 + avg_dlen / doc_len).log2();
        let expected = p * ir * ((c_f + 1.0) / (c_idf * (p + 1.0)));
        assert!((score(f_dt, c_f, c_idf, ndocs, avg_dlen, doc_len) - expected).abs() < 1e-9);
    }
}
