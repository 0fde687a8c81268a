//! DPH (hypergeometric DFR instance, parameter-free) scoring kernel
//! (spec §4.1; grounded on
//! `original_source/feature-gen/include/features/dph/doc_dph_feature.hpp`).

/// `f = f_dt/W_d`, `norm = (1-f)^2/(f_dt+1)`,
/// `score = norm * (f_dt*log2(f_dt*avg_dlen/W_d * ndocs/c_f)
///                  + 0.5*log2(2*pi*f_dt*(1-f)))`.
pub fn score(f_dt: f64, c_f: f64, ndocs: f64, avg_dlen: f64, doc_len: f64) -> f64 {
    let f = f_dt / doc_len;
    let norm = (1.0 - f).powi(2) / (f_dt + 1.0);
    let term1 = f_dt * (f_dt * avg_dlen / doc_len * ndocs / c_f).log2();
    let term2 = 0.5 * (2.0 * std::f64::consts::PI * f_dt * (1.0 - f)).log2();
    norm * (term1 + term2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_for_in_domain_inputs() {
        let s = score(5.0, 10000.0, 1000.0, 100.0, 120.0);
        assert!(s.is_finite());
    }

    #[test]
    fn matches_hand_computation() {
        let f_dt = 4.0;
        let c_f = 2000.0;
        let ndocs = 5000.0;
        let avg_dlen = 90.0;
        let doc_len = 70.0;
        let f = f_dt / doc_len;
        let norm = (1.0 - f).powi(2) / (f_dt + 1.0);
        let term1 = f_dt * (f_dt * avg_dlen / doc_len * ndocs / c_f).log2();
        let term2 = 0.5 * (2.0 * std::f64::consts::PI * f_dt * (1.0 - f)).log2();
        let expected = norm * (term1 + term2);
        assert!((score(f_dt, c_f, ndocs, avg_dlen, doc_len) - expected).abs() < 1e-12);
    }
}
