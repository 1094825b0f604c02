use tracing::{debug, trace, warn};

use crate::config::DetectorConfig;
use crate::detect::{classify, DetectError, Phase, Verdict};
use crate::window::WindowBuffer;

/// Sliding-window Z-score detector.
///
/// Each sample is scored against the window as it stood *before* the
/// sample arrived, then admitted.
#[derive(Debug, Clone)]
pub struct Detector {
    config: DetectorConfig,
    window: WindowBuffer,
    samples_seen: u64,
}

impl Detector {
    pub fn new(config: DetectorConfig) -> Result<Self, DetectError> {
        config.validate()?;
        debug!(
            window_size = config.window_size,
            threshold = config.threshold,
            statistics = ?config.statistics,
            "detector created"
        );
        Ok(Self {
            window: WindowBuffer::with_mode(config.window_size, config.statistics),
            config,
            samples_seen: 0,
        })
    }

    /// Window of 50, threshold 3.
    pub fn with_defaults() -> Self {
        Self {
            window: WindowBuffer::new(DetectorConfig::DEFAULT_WINDOW_SIZE),
            config: DetectorConfig::default(),
            samples_seen: 0,
        }
    }

    /// Classify `sample` and admit it into the window.
    ///
    /// Non-finite samples are rejected without touching the window.
    pub fn process(&mut self, sample: f64) -> Result<Verdict, DetectError> {
        if !sample.is_finite() {
            warn!(value = %sample, index = self.samples_seen, "rejecting non-finite sample");
            return Err(DetectError::NonFiniteSample { value: sample });
        }

        let verdict = classify(sample, &self.window, self.config.threshold);

        let was_warming = !self.window.is_full();
        self.window.admit(sample);
        self.samples_seen += 1;
        if was_warming && self.window.is_full() {
            debug!(
                samples = self.samples_seen,
                window_size = self.config.window_size,
                "window full, detector active"
            );
        }

        trace!(
            index = self.samples_seen - 1,
            value = verdict.value,
            score = ?verdict.score,
            anomaly = verdict.is_anomaly,
            "sample classified"
        );
        Ok(verdict)
    }

    /// Lazily process a sequence, yielding one result per input in order.
    pub fn process_all<'a, I>(
        &'a mut self,
        samples: I,
    ) -> impl Iterator<Item = Result<Verdict, DetectError>> + 'a
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: 'a,
    {
        samples.into_iter().map(move |s| self.process(s))
    }

    pub fn phase(&self) -> Phase {
        if self.window.is_full() {
            Phase::Active
        } else {
            Phase::Warming
        }
    }

    pub fn window(&self) -> &WindowBuffer {
        &self.window
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Samples accepted so far; rejected samples are not counted.
    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::with_defaults()
    }
}
