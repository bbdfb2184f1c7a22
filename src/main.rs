//! lanework CLI
//!
//! Times scalar, SIMD and multi-threaded variants of array add, scaled copy
//! and min/max reduction on seeded random input.

use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use lanework::output::{self, OutputFormat};
use lanework::suite::{self, Experiment, Report};
use lanework::{Backend, BenchConfig};

#[derive(Parser)]
#[command(name = "lanework")]
#[command(author, version, about = "Scalar vs SIMD vs multi-threaded array kernels")]
#[command(long_about = "
Runs each variant of an array kernel over the same seeded input and prints
the fastest wall-clock time per variant. Every variant is checked against
the scalar reference.

Defaults can be overridden with LANEWORK_LEN, LANEWORK_SEED,
LANEWORK_THREADS and LANEWORK_REPEATS. Logging is controlled by RUST_LOG.
")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Array length
    #[arg(short = 'n', long, global = true)]
    len: Option<usize>,

    /// Seed for input generation
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Worker threads (default: rayon pool, honours RAYON_NUM_THREADS)
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Timed calls per variant, fastest is reported
    #[arg(short, long, global = true)]
    repeats: Option<usize>,

    /// Lane backend (auto, scalar, sse2, neon, wasm-simd)
    #[arg(short, long, global = true, default_value = "auto")]
    backend: Backend,

    /// Also run the unsynchronized min/max fixture
    #[arg(long, global = true)]
    include_racy: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Element-wise addition c = a + b
    Add,

    /// Scaled copy b = a * factor
    Scale {
        /// Constant multiplier
        #[arg(short, long, default_value_t = 2.0)]
        factor: f32,
    },

    /// Min/max reduction
    MinMax,

    /// Run every experiment
    All,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lanework=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            error!("one or more variants did not match the scalar reference");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn config_from(common: &CommonArgs) -> lanework::Result<BenchConfig> {
    let mut config = BenchConfig::from_env()?.with_backend(common.backend);
    if let Some(len) = common.len {
        config = config.with_len(len);
    }
    if let Some(seed) = common.seed {
        config = config.with_seed(seed);
    }
    if let Some(threads) = common.threads {
        config = config.with_threads(threads);
    }
    if let Some(repeats) = common.repeats {
        config = config.with_repeats(repeats);
    }
    Ok(config.with_racy(common.include_racy).build())
}

fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = config_from(&cli.common)?;

    let reports: Vec<Report> = match cli.command {
        Commands::Add => vec![suite::run(Experiment::Add, &config)?],
        Commands::Scale { factor } => {
            config = config.with_scale_factor(factor);
            vec![suite::run(Experiment::Scale, &config)?]
        }
        Commands::MinMax => vec![suite::run(Experiment::MinMax, &config)?],
        Commands::All => suite::run_all(&config)?,
    };

    let format = if cli.common.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    output::write_report(&reports, format)?;

    Ok(reports.iter().all(Report::all_verified))
}
