//! Upstream sample producers.
//!
//! Sources yield raw `f64` values and know nothing about detection.

pub mod simulated;

pub use simulated::SimulatedStream;

use std::io::BufRead;

use anyhow::{Context, Result};

/// Lazily parses one sample per line from a reader.
///
/// Blank lines and lines starting with `#` are skipped. `nan` and `inf`
/// parse successfully; rejecting them is the detector's job.
pub struct LineSamples<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> LineSamples<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for LineSamples<R> {
    type Item = Result<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            let line = match line.with_context(|| format!("failed to read line {}", self.line_no)) {
                Ok(l) => l,
                Err(e) => return Some(Err(e)),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let line_no = self.line_no;
            return Some(
                trimmed
                    .parse::<f64>()
                    .with_context(|| format!("line {}: not a number: {:?}", line_no, trimmed)),
            );
        }
    }
}

/// Collect every sample from `reader`, failing on the first bad line.
pub fn read_samples<R: BufRead>(reader: R) -> Result<Vec<f64>> {
    LineSamples::new(reader).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_numbers_and_skips_noise() {
        let input = "1.5\n\n# comment\n  -2\n3e2\n";
        let samples = read_samples(input.as_bytes()).unwrap();
        assert_eq!(samples, vec![1.5, -2.0, 300.0]);
    }

    #[test]
    fn test_non_finite_tokens_parse() {
        let samples = read_samples("nan\ninf\n-inf\n".as_bytes()).unwrap();
        assert!(samples[0].is_nan());
        assert_eq!(samples[1], f64::INFINITY);
        assert_eq!(samples[2], f64::NEG_INFINITY);
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let err = read_samples("1\n2\nabc\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn test_is_lazy() {
        let mut it = LineSamples::new("1\nabc\n".as_bytes());
        assert_eq!(it.next().unwrap().unwrap(), 1.0);
        assert!(it.next().unwrap().is_err());
        assert!(it.next().is_none());
    }
}
