//! CLI interface for itinera.
//!
//! Each subcommand is non-interactive: arguments in, text out.
//!
//! - `itinera plan ...` — generate, inspect, and edit itineraries.
//! - `itinera sim ...` — move the simulated traveler around and read the inbox.
//! - `itinera landmarks` — the named places `sim move --to` understands.
//!
//! Plans and the simulation session persist under `~/.itinera/` (or `--data-dir`).

mod format;
mod plan;
mod sim;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::landmarks::SEOUL_LANDMARKS;
use crate::storage::Storage;

pub use plan::PlanCommand;
pub use sim::SimCommand;

/// itinera — plan a trip, then walk through it.
#[derive(Debug, Parser)]
#[command(name = "itinera", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Where plans and the session live. Defaults to `~/.itinera/`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: a day in Seoul
  1. itinera plan generate "One day in Seoul: palace in the morning, Myeongdong for lunch"
  2. itinera plan show
  3. itinera sim next          # walk to the first activity, check triggers
  4. itinera sim inbox
  5. itinera sim weather Rainy # weather triggers fire on the next check
  6. itinera sim next

Manual control:
  itinera sim move --to "N Seoul Tower" --walk
  itinera sim time --set 18:30
  itinera sim check"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage travel plans.
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },

    /// Drive the simulated traveler.
    Sim {
        #[command(subcommand)]
        command: SimCommand,
    },

    /// List the known landmarks.
    Landmarks,
}

/// Run the CLI, returning an error message on failure.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();

    let root = match cli.data_dir {
        Some(dir) => dir,
        None => Storage::default_root().ok_or("could not determine home directory")?,
    };
    let storage =
        Storage::new(root).map_err(|e| format!("failed to initialize storage: {e}"))?;

    match cli.command {
        Command::Plan { command } => plan::run(&storage, command),
        Command::Sim { command } => sim::run(&storage, command),
        Command::Landmarks => {
            cmd_landmarks();
            Ok(())
        }
    }
}

fn cmd_landmarks() {
    for l in SEOUL_LANDMARKS {
        println!(
            "{:<28} {:>9.4}, {:>9.4}",
            l.name, l.coordinate.latitude, l.coordinate.longitude
        );
    }
}
