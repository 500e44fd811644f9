use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};
use taxi_policy_core::{Action, Agent, Observation, TaxiAgent};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Observation file, one 16-field tuple per line (defaults to stdin)
    #[arg(short, long, value_name = "OBS_FILE")]
    input: Option<PathBuf>,

    /// Seed for the tie-breaking random source when the taxi is boxed in
    #[arg(short, long)]
    seed: Option<u64>,

    /// Emit one JSON record per step instead of bare action codes
    #[arg(long)]
    json: bool,
}

/// One line of `--json` output.
#[derive(Debug, Serialize)]
struct StepRecord {
    episode: usize,
    step: usize,
    code: u8,
    action: String,
}

/// Counters reported once the input is exhausted.
#[derive(Debug, Default, PartialEq, Eq)]
struct RunSummary {
    steps: usize,
    episodes: usize,
    pickups: usize,
    dropoffs: usize,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("taxi_policy_core=info,taxi_policy_cli=info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a global tracing subscriber was already installed");
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    init_logging();

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "Starting taxi policy");
    let mut agent = TaxiAgent::new(seed);

    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());

    let summary = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open observation file {}", path.display()))?;
            run(&mut agent, BufReader::new(file), output, args.json)?
        }
        None => run(&mut agent, io::stdin().lock(), output, args.json)?,
    };

    info!(
        steps = summary.steps,
        episodes = summary.episodes,
        pickups = summary.pickups,
        dropoffs = summary.dropoffs,
        "Input exhausted"
    );
    Ok(())
}

/// Feeds every observation line to `agent` and writes one action per step.
///
/// Blank lines and `reset` mark episode boundaries; `#` starts a comment line.
fn run<A, R, W>(agent: &mut A, input: R, mut output: W, json: bool) -> Result<RunSummary>
where
    A: Agent,
    R: BufRead,
    W: Write,
{
    let mut summary = RunSummary::default();
    let mut step_in_episode = 0;

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_number))?;
        let trimmed = line.trim();

        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("reset") {
            if step_in_episode > 0 {
                debug!(line_number, "Episode boundary, resetting agent");
                agent.reset();
                summary.episodes += 1;
                step_in_episode = 0;
            }
            continue;
        }

        let observation: Observation = trimmed
            .parse()
            .with_context(|| format!("Invalid observation on line {}", line_number))?;
        let action = agent.get_action(&observation);

        match action {
            Action::Pickup => summary.pickups += 1,
            Action::Dropoff => summary.dropoffs += 1,
            Action::Move(_) => {}
        }

        if json {
            let record = StepRecord {
                episode: summary.episodes,
                step: step_in_episode,
                code: action.code(),
                action: action.to_string(),
            };
            serde_json::to_writer(&mut output, &record)?;
            writeln!(output)?;
        } else {
            writeln!(output, "{}", action.code())?;
        }

        summary.steps += 1;
        step_in_episode += 1;
    }

    if step_in_episode > 0 {
        summary.episodes += 1;
    }
    output.flush()?;
    Ok(summary)
}
