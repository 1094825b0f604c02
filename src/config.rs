//! TOML configuration for zwatch.
//!
//! Every section has compiled-in defaults, so an empty file (or no file at
//! all) yields a working detector: window of 50, threshold of 3.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::detect::DetectError;
use crate::window::StatisticsMode;

/// Environment variable naming a config file to load.
pub const CONFIG_ENV: &str = "ZWATCH_CONFIG";

/// Config file picked up from the working directory when present.
pub const LOCAL_CONFIG: &str = "zwatch.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Try, in order:
    /// 1. the file named by `ZWATCH_CONFIG`,
    /// 2. `./zwatch.toml`,
    /// 3. compiled-in defaults.
    pub fn load_or_default() -> Self {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let path = Path::new(&env_path);
            match Self::load(path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "ZWATCH_CONFIG set but file could not be loaded, trying fallback"
                    );
                }
            }
        }

        let local = Path::new(LOCAL_CONFIG);
        if local.exists() {
            match Self::load(local) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %local.display(),
                        error = %e,
                        "local config file exists but could not be loaded, using defaults"
                    );
                }
            }
        }

        debug!("no config file found, using compiled-in defaults");
        Self::default()
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// Detection parameters, fixed for the lifetime of a detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Number of trailing samples that define "normal". At least 2.
    pub window_size: usize,
    /// Standard deviations beyond which a sample is flagged. Positive.
    pub threshold: f64,
    /// How window statistics are derived.
    pub statistics: StatisticsMode,
}

impl DetectorConfig {
    pub const DEFAULT_WINDOW_SIZE: usize = 50;
    pub const DEFAULT_THRESHOLD: f64 = 3.0;

    pub fn validate(&self) -> Result<(), DetectError> {
        if self.window_size < 2 {
            return Err(DetectError::InvalidConfiguration {
                reason: format!("window size must be at least 2, got {}", self.window_size),
            });
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(DetectError::InvalidConfiguration {
                reason: format!(
                    "threshold must be a positive finite number, got {}",
                    self.threshold
                ),
            });
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: Self::DEFAULT_WINDOW_SIZE,
            threshold: Self::DEFAULT_THRESHOLD,
            statistics: StatisticsMode::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Parameters of the synthetic sine-plus-noise stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Probability that a sample is *not* a spike.
    pub anomaly_rate: f64,
    /// Multiplier applied to the seasonal pattern on a spike.
    pub spike_factor: f64,
    /// Half-width of the uniform noise band.
    pub noise: f64,
    /// Advance of the seasonal phase per sample.
    pub step: f64,
    /// Fixed RNG seed for reproducible runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Wall-clock delay between samples; 0 emits as fast as possible.
    pub interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            anomaly_rate: 0.95,
            spike_factor: 5.0,
            noise: 0.1,
            step: 0.1,
            seed: None,
            interval_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum tracing level (`trace`, `debug`, `info`, `warn`, `error`),
    /// used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit logs as JSON lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.detector.window_size, 50);
        assert_eq!(cfg.detector.threshold, 3.0);
        assert_eq!(cfg.detector.statistics, StatisticsMode::Recompute);
        assert!(cfg.detector.validate().is_ok());

        assert_eq!(cfg.simulation.anomaly_rate, 0.95);
        assert_eq!(cfg.simulation.spike_factor, 5.0);
        assert_eq!(cfg.simulation.seed, None);

        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.logging.json);
    }

    #[test]
    fn test_parse_example_toml() {
        let toml_str = r#"
[detector]
window_size = 20
threshold = 2.5
statistics = "running"

[simulation]
anomaly_rate = 0.9
seed = 7

[logging]
level = "debug"
json = true
"#;
        let cfg: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.detector.window_size, 20);
        assert_eq!(cfg.detector.threshold, 2.5);
        assert_eq!(cfg.detector.statistics, StatisticsMode::Running);
        assert_eq!(cfg.simulation.anomaly_rate, 0.9);
        assert_eq!(cfg.simulation.seed, Some(7));
        // Unspecified fields fall back to defaults.
        assert_eq!(cfg.simulation.spike_factor, 5.0);
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.logging.json);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let cfg = AppConfig::default();
        let text = cfg.to_toml().unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let small = DetectorConfig {
            window_size: 1,
            ..Default::default()
        };
        assert!(small.validate().is_err());

        let zero = DetectorConfig {
            threshold: 0.0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let inf = DetectorConfig {
            threshold: f64::INFINITY,
            ..Default::default()
        };
        assert!(inf.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zwatch.toml");
        std::fs::write(&path, "[detector]\nwindow_size = 5\n").unwrap();
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.detector.window_size, 5);
        assert_eq!(cfg.detector.threshold, 3.0);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[detector\nwindow_size = ").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }
}
