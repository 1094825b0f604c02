use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use zwatch::config::AppConfig;
use zwatch::detect::Detector;
use zwatch::report::OutputFormat;
use zwatch::source::{LineSamples, SimulatedStream};
use zwatch::RunOptions;

#[derive(Parser)]
#[command(
    name = "zwatch",
    about = "Sliding-window Z-score anomaly detection for numeric streams",
    version,
    long_about = None
)]
struct Cli {
    /// Path to a TOML config file (defaults: $ZWATCH_CONFIG, ./zwatch.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of trailing samples used as the baseline
    #[arg(long, global = true)]
    window: Option<usize>,

    /// Z-score beyond which a sample is flagged
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Output format for verdicts
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Only print flagged samples
    #[arg(long, global = true)]
    anomalies_only: bool,

    /// Print a summary to stderr when the stream ends
    #[arg(long, global = true)]
    summary: bool,

    /// JSON log output
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect anomalies in newline-separated samples from a file or stdin
    Run {
        /// Input file, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },

    /// Detect anomalies in a simulated sine-plus-noise stream
    Simulate {
        /// Number of samples to generate
        #[arg(long, default_value = "500")]
        count: usize,

        /// RNG seed for a reproducible stream
        #[arg(long)]
        seed: Option<u64>,

        /// Delay between samples in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn build_subscriber(level: &str, json: bool) -> tracing::Dispatch {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        tracing::Dispatch::new(builder.json().finish())
    } else {
        tracing::Dispatch::new(builder.finish())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The configured log level is not known until the file is read, so
    // config loading logs through a scoped `info` subscriber.
    let bootstrap = build_subscriber("info", cli.log_json);
    let mut config = tracing::dispatcher::with_default(&bootstrap, || match &cli.config {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::load_or_default()),
    })?;
    if let Some(w) = cli.window {
        config.detector.window_size = w;
    }
    if let Some(t) = cli.threshold {
        config.detector.threshold = t;
    }

    tracing::dispatcher::set_global_default(build_subscriber(
        &config.logging.level,
        cli.log_json || config.logging.json,
    ))
    .context("failed to install tracing subscriber")?;

    let opts = RunOptions {
        format: cli.format,
        anomalies_only: cli.anomalies_only,
    };

    let tally = match cli.command {
        Commands::Config => {
            config
                .detector
                .validate()
                .context("configuration rejected")?;
            print!("{}", config.to_toml()?);
            return Ok(());
        }
        Commands::Run { input } => {
            let mut detector = Detector::new(config.detector.clone())?;
            tracing::info!(
                %input,
                window_size = config.detector.window_size,
                threshold = config.detector.threshold,
                "Running detection"
            );
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if input == "-" {
                let samples = LineSamples::new(io::stdin().lock());
                zwatch::run_pipeline(&mut detector, samples, &mut out, opts)?
            } else {
                let file = std::fs::File::open(&input)
                    .with_context(|| format!("failed to open input: {}", input))?;
                let samples = LineSamples::new(BufReader::new(file));
                zwatch::run_pipeline(&mut detector, samples, &mut out, opts)?
            }
        }
        Commands::Simulate {
            count,
            seed,
            interval_ms,
        } => {
            if seed.is_some() {
                config.simulation.seed = seed;
            }
            if let Some(ms) = interval_ms {
                config.simulation.interval_ms = ms;
            }
            let mut detector = Detector::new(config.detector.clone())?;
            tracing::info!(
                %count,
                seed = ?config.simulation.seed,
                window_size = config.detector.window_size,
                threshold = config.detector.threshold,
                "Running simulated stream"
            );
            let samples = SimulatedStream::new(config.simulation.clone())
                .take(count)
                .map(Ok);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            zwatch::run_pipeline(&mut detector, samples, &mut out, opts)?
        }
    };

    if cli.summary {
        eprintln!("\n=== zwatch summary ===");
        eprintln!("{}", tally);
        eprintln!("======================");
    }

    Ok(())
}
