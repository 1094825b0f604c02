//! Downstream rendering of verdicts.

pub mod tally;

pub use tally::Tally;

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::detect::Verdict;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for humans.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// A verdict tagged with its position in the input stream.
#[derive(Debug, Serialize)]
pub struct Record {
    pub index: u64,
    pub value: f64,
    pub score: Option<f64>,
    pub is_anomaly: bool,
}

impl Record {
    pub fn new(index: u64, verdict: &Verdict) -> Self {
        Self {
            index,
            value: verdict.value,
            score: verdict.score,
            is_anomaly: verdict.is_anomaly,
        }
    }
}

pub fn write_header<W: Write>(out: &mut W, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Text {
        writeln!(out, "{:>8} | {:>14} | {:>10} | Flag", "Index", "Value", "Z-Score")?;
        writeln!(out, "{:-<8}-|-{:-<14}-|-{:-<10}-|-{:-<7}", "", "", "", "")?;
    }
    Ok(())
}

pub fn write_record<W: Write>(out: &mut W, record: &Record, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let score = match record.score {
                Some(z) => format!("{:.3}", z),
                None => "-".to_string(),
            };
            let flag = if record.is_anomaly { "ANOMALY" } else { "" };
            writeln!(
                out,
                "{:>8} | {:>14.4} | {:>10} | {}",
                record.index, record.value, score, flag
            )?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
