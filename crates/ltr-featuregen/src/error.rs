//! Error types for feature generation.

use std::fmt;

/// Errors that can occur while building or scoring features.
#[derive(Debug)]
pub enum FeatureGenError {
    /// A text input file (query file, TREC run) had a malformed line.
    InputFormat {
        file: String,
        detail: String,
    },
    /// A binary index artifact failed to load (bad magic, checksum, or
    /// truncated data).
    Format {
        file: String,
        detail: String,
    },
    /// A scorer produced a non-finite result. Fatal by design (spec §7):
    /// the process must report the offending query/document/scorer and exit.
    NumericFault {
        qid: i64,
        docid: u32,
        scorer: &'static str,
        value: f64,
    },
    /// I/O error opening or reading/writing a file.
    Io(std::io::Error),
    /// Invalid parameter value (e.g. unknown BM25 preset).
    InvalidParameter(String),
}

impl fmt::Display for FeatureGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureGenError::InputFormat { file, detail } => {
                write!(f, "malformed input in {}: {}", file, detail)
            }
            FeatureGenError::Format { file, detail } => {
                write!(f, "malformed index artifact {}: {}", file, detail)
            }
            FeatureGenError::NumericFault { qid, docid, scorer, value } => {
                write!(
                    f,
                    "scorer `{}` produced a non-finite value ({}) for qid={} docid={}",
                    scorer, value, qid, docid
                )
            }
            FeatureGenError::Io(e) => write!(f, "I/O error: {}", e),
            FeatureGenError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for FeatureGenError {}

impl From<std::io::Error> for FeatureGenError {
    fn from(e: std::io::Error) -> Self {
        FeatureGenError::Io(e)
    }
}

/// Check a scorer's output for NaN/Inf and turn it into the fatal numeric
/// fault the spec requires (§7: "a NaN/Inf emerging from any scorer is
/// fatal").
pub fn check_finite(
    value: f64,
    qid: i64,
    docid: u32,
    scorer: &'static str,
) -> Result<f64, FeatureGenError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FeatureGenError::NumericFault { qid, docid, scorer, value })
    }
}

pub type Result<T> = std::result::Result<T, FeatureGenError>;
