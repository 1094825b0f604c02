use crate::detect::Verdict;
use crate::window::WindowBuffer;

/// Score `sample` against the current contents of `window`.
///
/// Pure: the window is not touched. The caller admits the sample afterwards
/// so it is never part of its own reference population.
///
/// - window not yet full: no score, never anomalous
/// - zero variance: score 0, never anomalous
/// - otherwise anomalous when `|z| > threshold` (strict)
pub fn classify(sample: f64, window: &WindowBuffer, threshold: f64) -> Verdict {
    let Some(stats) = window.statistics() else {
        return Verdict::warming(sample);
    };

    if stats.std_dev == 0.0 {
        return Verdict {
            value: sample,
            score: Some(0.0),
            is_anomaly: false,
        };
    }

    let z = (sample - stats.mean) / stats.std_dev;
    Verdict {
        value: sample,
        score: Some(z),
        is_anomaly: z.abs() > threshold,
    }
}
