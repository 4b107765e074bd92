//! Voidclash battle runner.
//!
//! Fights two fleets (the built-in demo engagement or a JSON fleet file) and
//! prints the narration followed by the final report. With `--json` the
//! narration and report are emitted as a single JSON document instead.
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to adjust
//! (default `voidclash=info`, with narration itself printed to stdout).

mod fleets;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use voidclash_core::{Battle, BattleConfig, BattleEvent, BattleReport, EventLog, SeededDice};

/// Run a turn-based fleet battle simulation
#[derive(Parser, Debug)]
#[command(name = "voidclash")]
#[command(about = "Run a turn-based fleet battle simulation")]
struct Args {
    /// Number of rounds to simulate [default: 3]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    rounds: Option<u32>,

    /// Random seed for a reproducible battle
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with `fleet_a` and `fleet_b` (defaults to the demo fleets)
    #[arg(long)]
    fleets: Option<PathBuf>,

    /// JSON battle configuration; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print narration and report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Merges the config file (if any) with command-line overrides.
    fn battle_config(&self) -> Result<BattleConfig> {
        let mut config = match &self.config {
            Some(path) => BattleConfig::from_json_file(path)?,
            None => BattleConfig::default(),
        };
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

/// JSON output document.
#[derive(Serialize)]
struct JsonOutput<'a> {
    seed: u64,
    narration: Vec<String>,
    events: &'a [BattleEvent],
    report: &'a BattleReport,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("voidclash=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let config = args.battle_config()?;
    let (fleet_a, fleet_b) = match &args.fleets {
        Some(path) => fleets::load_fleets(path)?,
        None => fleets::demo_fleets(),
    };

    let dice = config.seed.map_or_else(SeededDice::from_entropy, SeededDice::new);
    let seed = dice.seed();
    tracing::info!(seed, rounds = config.rounds, "starting battle");

    let builder = Battle::builder(fleet_a, fleet_b).config(config).dice(dice);

    if args.json {
        let mut battle = builder
            .narrator(EventLog::new())
            .build()
            .context("failed to assemble battle")?;
        let report = battle.run();
        let log = battle.narrator();
        let output = JsonOutput {
            seed,
            narration: log.lines(),
            events: log.events(),
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let mut battle = builder
            .narrator(|event: &BattleEvent| {
                // The closing banner is printed with the report.
                if !matches!(event, BattleEvent::BattleEnded { .. }) {
                    println!("{event}");
                }
            })
            .build()
            .context("failed to assemble battle")?;
        let report = battle.run();
        println!("{report}");
    }
    Ok(())
}
