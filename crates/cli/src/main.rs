#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use settlement_cli::Cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    logging_init();

    settlement_cli::run(Cli::parse())
}

fn logging_init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
