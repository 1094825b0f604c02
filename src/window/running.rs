use super::WindowStatistics;

/// Shifted running sums for O(1) mean/variance over a sliding window.
///
/// Sums are kept about `shift` (a value from the window) so that the
/// sum-of-squares subtraction does not cancel catastrophically when the
/// stream sits far from zero.
#[derive(Debug, Clone, Default)]
pub(super) struct RunningMoments {
    shift: Option<f64>,
    count: usize,
    sum: f64,
    sum_of_squares: f64,
    updates_since_resync: usize,
}

impl RunningMoments {
    pub(super) fn insert(&mut self, sample: f64, evicted: Option<f64>) {
        let shift = *self.shift.get_or_insert(sample);

        let d = sample - shift;
        self.sum += d;
        self.sum_of_squares += d * d;

        match evicted {
            Some(old) => {
                let d_old = old - shift;
                self.sum -= d_old;
                self.sum_of_squares -= d_old * d_old;
            }
            None => self.count += 1,
        }
        self.updates_since_resync += 1;
    }

    pub(super) fn updates_since_resync(&self) -> usize {
        self.updates_since_resync
    }

    /// Rebuild the sums from the window contents, discarding accumulated
    /// rounding error.
    pub(super) fn resync(&mut self, values: impl Iterator<Item = f64>) {
        let mut values = values.peekable();
        let shift = values.peek().copied();
        let mut count = 0;
        let mut sum = 0.0;
        let mut sum_of_squares = 0.0;
        if let Some(k) = shift {
            for v in values {
                let d = v - k;
                sum += d;
                sum_of_squares += d * d;
                count += 1;
            }
        }
        *self = Self {
            shift,
            count,
            sum,
            sum_of_squares,
            updates_since_resync: 0,
        };
    }

    /// Callers guarantee `count >= 2`.
    pub(super) fn statistics(&self) -> WindowStatistics {
        let n = self.count as f64;
        let shift = self.shift.unwrap_or(0.0);
        let mean_offset = self.sum / n;
        let variance = ((self.sum_of_squares - self.sum * mean_offset) / (n - 1.0)).max(0.0);
        WindowStatistics {
            mean: shift + mean_offset,
            std_dev: variance.sqrt(),
        }
    }
}
