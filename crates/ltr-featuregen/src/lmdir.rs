//! Dirichlet-smoothed language-model scoring kernel (spec §4.1; grounded on
//! `original_source/feature-gen/src/doc_lm_dir_1000_feature.hpp` and its
//! 1500/2500 siblings).

/// Smoothing parameter µ, one of the three presets the feature writer
/// emits columns for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mu {
    Mu1000,
    Mu1500,
    Mu2500,
}

impl Mu {
    pub fn value(self) -> f64 {
        match self {
            Mu::Mu1000 => 1000.0,
            Mu::Mu1500 => 1500.0,
            Mu::Mu2500 => 2500.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mu::Mu1000 => "lm_dir_1000",
            Mu::Mu1500 => "lm_dir_1500",
            Mu::Mu2500 => "lm_dir_2500",
        }
    }
}

/// `score = log((f_dt + mu*c_f/W_c) / (W_d + mu))`.
pub fn score(mu: f64, f_dt: f64, c_f: f64, doc_len: f64, coll_len: f64) -> f64 {
    let numerator = f_dt + mu * c_f / coll_len;
    let denominator = doc_len + mu;
    (numerator / denominator).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mu_2500_matches_worked_example() {
        // f_dt=3, c_f=10000, W_d=200, W_c=1e9, mu=2500.
        let s = score(2500.0, 3.0, 10000.0, 200.0, 1e9);
        assert!((s - (-6.79410)).abs() < 1e-4, "got {s}");
    }

    #[test]
    fn increasing_mu_shrinks_dependence_on_f_dt() {
        // The score gap between a high- and low-frequency document term
        // should shrink as mu grows, since the background term dominates
        // the numerator more.
        let gap = |mu: f64| {
            score(mu, 5.0, 500.0, 100.0, 1e6) - score(mu, 1.0, 500.0, 100.0, 1e6)
        };
        assert!(gap(2500.0) < gap(1000.0));
    }
}
