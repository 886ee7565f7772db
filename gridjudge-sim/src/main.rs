use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gridjudge_sim::{Predictions, SimParams, read_trials, simulate_trials};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gridjudge-sim")]
#[command(about = "Replay grid-world trials and estimate model success rates on the other path")]
struct Cli {
    /// Trial list: `num`, `path` and `door_changes` per trial.
    #[arg(long, default_value = "experiment.json")]
    trials: PathBuf,

    /// Directory holding `<num>.txt` grid files.
    #[arg(long, default_value = "grids")]
    grids: PathBuf,

    /// Only simulate this trial; 0 simulates all of them.
    #[arg(long, default_value_t = 0)]
    trial: u32,

    /// Run the counterfactual model.
    #[arg(long)]
    cf: bool,

    /// Run the hypothetical model.
    #[arg(long)]
    hyp: bool,

    #[arg(long, default_value_t = 1000)]
    n_simulations: u32,

    /// Probability of the agent stalling on any timestep.
    #[arg(long, default_value_t = 0.12)]
    prob_stall: f64,

    /// Probability of a door switching on any timestep.
    #[arg(long, default_value_t = 0.19)]
    prob_door: f64,

    #[arg(long, default_value_t = 10)]
    time_limit: u32,

    /// Write records here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let params = SimParams {
        prob_stall: cli.prob_stall,
        prob_door: cli.prob_door,
        time_limit: cli.time_limit,
        n_simulations: cli.n_simulations,
    };
    let predictions = Predictions {
        counterfactual: cli.cf,
        hypothetical: cli.hyp,
    };

    let file = File::open(&cli.trials)
        .with_context(|| format!("open trial list {}", cli.trials.display()))?;
    let specs = read_trials(BufReader::new(file))?;
    let only = (cli.trial > 0).then_some(cli.trial);
    let records = simulate_trials(&specs, &cli.grids, &params, predictions, only)?;

    match &cli.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            serde_json::to_writer_pretty(file, &records)?;
        }
        None => {
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &records)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
