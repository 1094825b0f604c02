use serde::Serialize;

use crate::detect::Verdict;

/// Consumer-side bookkeeping for a run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Tally {
    pub samples: u64,
    pub warming: u64,
    pub scored: u64,
    pub anomalies: u64,
    pub rejected: u64,
    /// Stream positions of flagged samples.
    pub anomaly_indices: Vec<u64>,
}

impl Tally {
    pub fn record(&mut self, index: u64, verdict: &Verdict) {
        self.samples += 1;
        if verdict.score.is_none() {
            self.warming += 1;
        } else {
            self.scored += 1;
        }
        if verdict.is_anomaly {
            self.anomalies += 1;
            self.anomaly_indices.push(index);
        }
    }

    pub fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    /// Fraction of scored samples that were flagged.
    pub fn anomaly_ratio(&self) -> f64 {
        if self.scored == 0 {
            return 0.0;
        }
        self.anomalies as f64 / self.scored as f64
    }
}

impl std::fmt::Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Samples:   {}", self.samples)?;
        writeln!(f, "Warm-up:   {}", self.warming)?;
        writeln!(f, "Scored:    {}", self.scored)?;
        writeln!(
            f,
            "Anomalies: {} ({:.2}%)",
            self.anomalies,
            self.anomaly_ratio() * 100.0
        )?;
        write!(f, "Rejected:  {}", self.rejected)
    }
}
