//! Headless siege runner.
//!
//! Runs the simulation without graphics, controlled via JSON on stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! # Deterministic mode - time advances only on tick/elapse requests
//! cargo run -p siege_headless -- step
//!
//! # Real-time mode - 60 Hz frames, wall-clock resource accrual
//! cargo run -p siege_headless -- run --tick-hz 60
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON requests, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use siege_core::config::{SimConfig, TICK_RATE};
use siege_core::simulation::Simulation;
use siege_headless::{realtime, EngineHandle, HeadlessError, SteppedRunner};

#[derive(Parser)]
#[command(name = "siege_headless")]
#[command(about = "Headless siege runner driven by JSON lines")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// RON file with simulation tunables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Deterministic session: time moves only on tick/elapse requests
    Step,

    /// Real-time session with engine-driven frames and accrual
    Run {
        /// Simulation frames per second
        #[arg(long, default_value_t = TICK_RATE)]
        tick_hz: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Headless runner failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), HeadlessError> {
    let config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let sim = Simulation::with_config(config);

    match cli.command.unwrap_or(Commands::Step) {
        Commands::Step => cmd_step(sim),
        Commands::Run { tick_hz } => cmd_run(sim, tick_hz),
    }
}

fn cmd_step(sim: Simulation) -> Result<(), HeadlessError> {
    tracing::info!("Starting stepped session");
    let mut runner = SteppedRunner::new(sim);
    runner.run(io::stdin().lock(), io::stdout().lock())?;
    tracing::info!(
        tick = runner.simulation().get_tick(),
        hash = runner.simulation().state_hash(),
        "Final state"
    );
    Ok(())
}

fn cmd_run(sim: Simulation, tick_hz: u32) -> Result<(), HeadlessError> {
    tracing::info!(tick_hz, "Starting real-time session");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let sim = runtime.block_on(async move {
        let engine = EngineHandle::spawn(sim, tick_hz);
        let input = tokio::io::BufReader::new(tokio::io::stdin());
        realtime::run_session(engine, input, tokio::io::stdout()).await
    })?;

    tracing::info!(
        tick = sim.get_tick(),
        hash = sim.state_hash(),
        "Final state"
    );
    Ok(())
}
