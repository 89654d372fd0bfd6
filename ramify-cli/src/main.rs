use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ramify_core::{read_mps_file, solve, ObjectiveSense, Settings, SolveStatus};

#[derive(Parser)]
#[command(name = "ramify")]
#[command(about = "Branch-and-bound solver for mixed-integer linear programs", long_about = None)]
struct Cli {
    /// Path to an MPS file (a .gz suffix is decompressed transparently)
    path: PathBuf,

    /// Maximize the objective (MPS does not encode a sense; the default is minimize)
    #[arg(long)]
    maximize: bool,

    /// Maximum number of branch-and-bound nodes
    #[arg(long, default_value_t = 1_000_000)]
    max_nodes: u64,

    /// Wall-clock limit in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Print search progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut problem = read_mps_file(&cli.path)
        .with_context(|| format!("failed to load MPS file {}", cli.path.display()))?;
    if cli.maximize {
        problem.set_sense(ObjectiveSense::Maximize);
    }

    println!("{problem}");
    println!();

    let mut settings = Settings::default().with_max_nodes(cli.max_nodes);
    if let Some(seconds) = cli.time_limit {
        settings = settings.with_time_limit(seconds);
    }
    settings.verbose = cli.verbose;

    let solution = solve(&problem, &settings);
    println!("{solution}");

    if solution.status() == SolveStatus::Unknown {
        bail!("solver finished without a usable outcome");
    }
    Ok(())
}
