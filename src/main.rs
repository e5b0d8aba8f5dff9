mod cli;
mod config;
mod geo;
mod landmarks;
mod model;
mod planner;
mod simulator;
mod storage;
mod trigger;

use std::process;

use tracing_subscriber::EnvFilter;

fn main() {
    // A missing .env is fine; keys may already be in the environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
