//! Bounded FIFO history of recent samples and the statistics derived from it.

mod running;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use running::RunningMoments;

/// Mean and unbiased standard deviation of a full window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStatistics {
    pub mean: f64,
    pub std_dev: f64,
}

/// How [`WindowBuffer::statistics`] derives its answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsMode {
    /// Two-pass mean/variance over the current contents on every query.
    #[default]
    Recompute,
    /// Running sums updated on insert and eviction, resynchronised from
    /// the contents once per window's worth of admissions.
    Running,
}

/// The last `capacity` admitted samples, oldest first.
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    values: VecDeque<f64>,
    capacity: usize,
    /// Length of the run of identical values ending at the newest sample.
    trailing_run: usize,
    running: Option<RunningMoments>,
}

impl WindowBuffer {
    pub fn new(capacity: usize) -> Self {
        Self::with_mode(capacity, StatisticsMode::Recompute)
    }

    pub fn with_mode(capacity: usize, mode: StatisticsMode) -> Self {
        let running = match mode {
            StatisticsMode::Recompute => None,
            StatisticsMode::Running => Some(RunningMoments::default()),
        };
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
            trailing_run: 0,
            running,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn current_size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    pub fn mode(&self) -> StatisticsMode {
        if self.running.is_some() {
            StatisticsMode::Running
        } else {
            StatisticsMode::Recompute
        }
    }

    /// Append `sample` as the newest value, evicting the oldest first when
    /// the window is already at capacity.
    ///
    /// Finiteness is the caller's concern; a NaN admitted here poisons the
    /// statistics until it is evicted.
    pub fn admit(&mut self, sample: f64) {
        if self.capacity == 0 {
            return;
        }
        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        let repeats = self.values.back().is_some_and(|&last| last == sample);
        self.trailing_run = if repeats { self.trailing_run + 1 } else { 1 };
        self.values.push_back(sample);

        if let Some(running) = self.running.as_mut() {
            running.insert(sample, evicted);
            if running.updates_since_resync() >= self.capacity {
                running.resync(self.values.iter().copied());
            }
        }
    }

    /// Statistics over the current contents, or `None` while the window is
    /// still warming up (fewer than `capacity` samples, or fewer than two).
    ///
    /// A window holding a single repeated value reports exactly that value
    /// and a standard deviation of exactly zero in either mode.
    pub fn statistics(&self) -> Option<WindowStatistics> {
        let n = self.values.len();
        if n < self.capacity || n < 2 {
            return None;
        }
        if self.is_constant() {
            let value = self.values.back().copied().unwrap_or_default();
            return Some(WindowStatistics {
                mean: value,
                std_dev: 0.0,
            });
        }
        match &self.running {
            Some(running) => Some(running.statistics()),
            None => Some(self.recompute()),
        }
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    fn is_constant(&self) -> bool {
        !self.values.is_empty() && self.trailing_run >= self.values.len()
    }

    /// Two-pass mean and sample variance, taken about the oldest value so
    /// that a window far from zero keeps its precision.
    fn recompute(&self) -> WindowStatistics {
        let shift = self.values.front().copied().unwrap_or_default();
        let n = self.values.len() as f64;
        let offset = self.values.iter().map(|&x| x - shift).sum::<f64>() / n;
        let sum_sq_diff: f64 = self
            .values
            .iter()
            .map(|&x| (x - shift - offset).powi(2))
            .sum();
        WindowStatistics {
            mean: shift + offset,
            std_dev: (sum_sq_diff / (n - 1.0)).sqrt(),
        }
    }
}
