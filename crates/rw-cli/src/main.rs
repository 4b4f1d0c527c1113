//! CLI frontend for the Rotorwerk behavior engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rw",
    about = "Rotorwerk: per-tick scripted actor engine",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new scenario directory with generated actors
    Init {
        /// Name of the scenario directory to create
        name: String,

        /// Number of actors to generate
        #[arg(short, long, default_value = "4")]
        entities: usize,

        /// RNG seed for the generated actors
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Parse and validate a scenario without running it
    Check {
        /// Scenario file
        #[arg(short, long, default_value = "scenario.json")]
        scenario: PathBuf,
    },

    /// Run a scenario for a number of ticks
    Run {
        /// Scenario file
        #[arg(short, long, default_value = "scenario.json")]
        scenario: PathBuf,

        /// Number of ticks to run
        #[arg(short, long, default_value = "16")]
        ticks: u64,

        /// Show all events (not just faults and failed loads)
        #[arg(short, long)]
        verbose: bool,

        /// Print the final records as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            name,
            entities,
            seed,
        } => commands::init::run(&name, entities, seed),
        Commands::Check { scenario } => commands::check::run(&scenario),
        Commands::Run {
            scenario,
            ticks,
            verbose,
            json,
        } => commands::run::run(&scenario, ticks, verbose, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
