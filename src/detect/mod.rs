//! Z-score anomaly detection over a sliding window.

pub mod detector;
pub mod scorer;
pub mod shared;

pub use detector::Detector;
pub use scorer::classify;
pub use shared::SharedDetector;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("non-finite sample rejected: {value}")]
    NonFiniteSample { value: f64 },
}

/// Detector lifecycle. `Warming` until the window first fills, `Active`
/// from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Warming,
    Active,
}

/// Classification of a single sample.
///
/// `score` is `None` while the window is warming up.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Verdict {
    pub value: f64,
    pub score: Option<f64>,
    pub is_anomaly: bool,
}

impl Verdict {
    pub fn warming(value: f64) -> Self {
        Self {
            value,
            score: None,
            is_anomaly: false,
        }
    }
}
