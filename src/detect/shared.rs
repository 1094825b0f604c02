use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::DetectorConfig;
use crate::detect::{DetectError, Detector, Phase, Verdict};

/// A [`Detector`] that can be fed from several threads.
///
/// The lock is held across classification and admission so that two
/// producers never interleave between scoring a sample and admitting it.
#[derive(Debug, Clone)]
pub struct SharedDetector {
    inner: Arc<Mutex<Detector>>,
}

impl SharedDetector {
    pub fn new(config: DetectorConfig) -> Result<Self, DetectError> {
        Ok(Self::from(Detector::new(config)?))
    }

    pub fn process(&self, sample: f64) -> Result<Verdict, DetectError> {
        self.lock().process(sample)
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase()
    }

    pub fn samples_seen(&self) -> u64 {
        self.lock().samples_seen()
    }

    /// Copy of the current window contents, oldest first.
    pub fn snapshot(&self) -> Vec<f64> {
        self.lock().window().to_vec()
    }

    // A panic elsewhere cannot leave the window half-updated, so a poisoned
    // lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Detector> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl From<Detector> for SharedDetector {
    fn from(detector: Detector) -> Self {
        Self {
            inner: Arc::new(Mutex::new(detector)),
        }
    }
}
