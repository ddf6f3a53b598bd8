#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod commands;
pub mod modules;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::amount::Amount;
use crate::commands::approximate::ApproximateArgs;
use crate::commands::fuel::Fuel;
use crate::commands::quote::QuoteArgs;
use crate::modules::settings::Settings;

/// Command-line entrypoint for the settlement helper CLI.
#[derive(Parser, Debug)]
#[command(
    name = "settlement-cli",
    version,
    about = "Token amount conversion and offer fuel selection"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Fee rate in sats per kB, overrides `SETTLEMENT__FEE_PER_KB`
    #[arg(long = "fee-per-kb", global = true)]
    pub fee_per_kb: Option<u64>,
    /// Hex script receiving tokens and leftover sats, overrides `SETTLEMENT__RECIPIENT_SCRIPT_HEX`
    #[arg(long = "recipient-script-hex", global = true)]
    pub recipient_script_hex: Option<String>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Amount(Amount),
    /// Fuel input selection utilities
    Fuel {
        #[command(subcommand)]
        fuel: Box<Fuel>,
    },
    /// Price an offer without selecting inputs
    Quote(QuoteArgs),
    /// Fit offer terms into partial offer parameters
    Approximate(ApproximateArgs),
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Amount(amount) => amount.handle(),
        Commands::Quote(args) => args.handle(),
        Commands::Approximate(args) => args.handle(),
        Commands::Fuel { fuel } => {
            let mut settings = Settings::load()?;
            if let Some(fee_per_kb) = cli.fee_per_kb {
                settings.fee_per_kb = fee_per_kb;
            }
            if let Some(script_hex) = cli.recipient_script_hex {
                settings.recipient_script_hex = script_hex;
            }
            settings.validate()?;
            tracing::debug!(
                fee_per_kb = settings.fee_per_kb,
                recipient_script_hex = %settings.recipient_script_hex,
                "resolved settings"
            );
            fuel.handle(&settings)
        }
    }
}
