//! zwatch -- real-time outlier detection for numeric streams.
//!
//! Each incoming sample is scored against the mean and standard deviation
//! of the previous `W` samples and flagged when its Z-score exceeds a
//! threshold. Nothing is scored until a full window has been observed.

pub mod config;
pub mod detect;
pub mod report;
pub mod source;
pub mod window;

use std::io::Write;

use anyhow::Result;

use crate::detect::{DetectError, Detector};
use crate::report::{OutputFormat, Record, Tally};

/// How a pipeline run renders its verdicts.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub format: OutputFormat,
    /// Only write flagged samples.
    pub anomalies_only: bool,
}

/// Drive `samples` through `detector`, writing one record per verdict.
///
/// Non-finite samples are counted and skipped; a source error stops the run.
/// The stream index counts every input, rejected ones included, so output
/// positions line up with the source.
pub fn run_pipeline<I, W>(
    detector: &mut Detector,
    samples: I,
    out: &mut W,
    opts: RunOptions,
) -> Result<Tally>
where
    I: IntoIterator<Item = Result<f64>>,
    W: Write,
{
    let mut tally = Tally::default();
    report::write_header(out, opts.format)?;

    for (index, sample) in samples.into_iter().enumerate() {
        let index = index as u64;
        let sample = sample?;
        match detector.process(sample) {
            Ok(verdict) => {
                tally.record(index, &verdict);
                if verdict.is_anomaly || !opts.anomalies_only {
                    report::write_record(out, &Record::new(index, &verdict), opts.format)?;
                }
            }
            Err(DetectError::NonFiniteSample { .. }) => tally.record_rejected(),
            Err(e) => return Err(e.into()),
        }
    }

    out.flush()?;
    tracing::info!(
        samples = tally.samples,
        anomalies = tally.anomalies,
        rejected = tally.rejected,
        "stream finished"
    );
    Ok(tally)
}
