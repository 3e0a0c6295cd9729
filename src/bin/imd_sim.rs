//! `imd-sim`: generate an IMD MHS/OKHS trace and write it to disk or stdout
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use imd_sim::config::constants::export::DEFAULT_OUTPUT_FILE;
use imd_sim::export::{export_to_path, write_csv, write_json, ExportFormat};
use imd_sim::utils::time::SystemTimeProvider;
use imd_sim::{
    ConfigLoader, ModeScheduler, RngSource, SessionTrace, SimulationConfig, TimeProvider,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => ExportFormat::Json,
            OutputFormat::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Generate synthetic Insulation Monitoring Device output traces",
    long_about = None
)]
struct Cli {
    /// TOML configuration file (IMD_SIM__* environment variables override it)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file path. Use '-' for stdout.
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Explicit output format when the extension is ambiguous
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Total session duration in seconds
    #[arg(long)]
    duration_s: Option<f64>,

    /// Sampling rate in Hz (must divide 1000)
    #[arg(long)]
    sample_rate_hz: Option<u32>,

    /// Seed for a reproducible session
    #[arg(long, env = "IMD_SIM_SEED")]
    seed: Option<u64>,

    /// Timestamp of the first sample in ms since the Unix epoch
    #[arg(long)]
    start_ms: Option<u64>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = effective_config(&cli)?;
    if cli.print_config {
        print!("{}", ConfigLoader::to_toml_string(&config)?);
        return Ok(());
    }

    let format = determine_format(&cli.output, cli.format);
    let start_ms = cli
        .start_ms
        .unwrap_or_else(|| SystemTimeProvider.now_millis());

    let rng = match cli.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let trace = ModeScheduler::new(config, rng)?
        .run(start_ms)
        .context("session generation failed")?;

    if cli.output.as_os_str() == "-" {
        write_stdout(&trace, format)?;
    } else {
        export_to_path(&trace.records, &cli.output, format)
            .with_context(|| format!("failed to export trace to {}", cli.output.display()))?;
    }

    eprintln!(
        "generated {} samples in {} segments ({:.3} s) -> {}",
        trace.sample_count(),
        trace.segments.len(),
        trace.total_duration_s(),
        cli.output.display()
    );

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // RUST_LOG wins over -v when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let _ = Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn effective_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.add_path(path);
    }

    let mut config = loader
        .load_unvalidated()
        .context("failed to load configuration")?;

    if let Some(duration_s) = cli.duration_s {
        config.session.total_duration_s = duration_s;
    }
    if let Some(rate) = cli.sample_rate_hz {
        config.signal.sample_rate_hz = rate;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn determine_format(path: &Path, override_format: Option<OutputFormat>) -> ExportFormat {
    if let Some(format) = override_format {
        return format.into();
    }
    if path.as_os_str() == "-" {
        return ExportFormat::Json;
    }
    ExportFormat::from_path(path).unwrap_or(ExportFormat::Json)
}

fn write_stdout(trace: &SessionTrace, format: ExportFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    match format {
        ExportFormat::Json => write_json(&trace.records, &mut writer)?,
        ExportFormat::Csv => write_csv(&trace.records, &mut writer)?,
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
