use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use settlement_core::{
    AcceptFeeParams, AgoraOffer, CancelFeeParams, DummyInput, FuelParams, TradeOfferCostModel,
    Utxo, atoms_from_str, get_cancel_fuel_inputs, get_oneshot_accept_fuel_inputs,
    get_partial_accept_fuel_inputs,
};

use crate::modules::files::{load_offer, load_utxos};
use crate::modules::settings::Settings;

/// Fuel input selection for settling offers.
#[derive(Subcommand, Debug)]
pub enum Fuel {
    /// Select inputs paying the price and fee to accept part of a partial offer
    AcceptPartial {
        #[command(flatten)]
        files: FuelFiles,
        /// Atoms to accept, scientific notation accepted
        #[arg(long = "accepted-atoms")]
        accepted_atoms: String,
    },
    /// Select inputs paying the price and fee to accept a oneshot offer
    AcceptOneshot {
        #[command(flatten)]
        files: FuelFiles,
    },
    /// Select inputs paying the fee to cancel an offer
    Cancel {
        #[command(flatten)]
        files: FuelFiles,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FuelFiles {
    /// JSON file describing the offer
    #[arg(long = "offer")]
    pub offer: PathBuf,
    /// JSON array of candidate utxos, consumed in file order
    #[arg(long = "utxos")]
    pub utxos: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FuelSelectionReport<'a> {
    action: &'static str,
    variant: &'static str,
    fee_per_kb: u64,
    input_count: usize,
    input_sats: u64,
    fee_sats: u64,
    asked_sats: u64,
    required_sats: u64,
    inputs: &'a [Utxo],
}

impl Fuel {
    pub fn handle(self, settings: &Settings) -> Result<()> {
        let recipient_script = settings.recipient_script()?;
        let params = FuelParams {
            fee_per_kb: settings.fee_per_kb,
            recipient_script: &recipient_script,
        };

        match self {
            Self::AcceptPartial {
                files,
                accepted_atoms,
            } => {
                let accepted_atoms = atoms_from_str(&accepted_atoms)
                    .with_context(|| format!("invalid accepted atoms '{accepted_atoms}'"))?;
                let offer = load_offer(&files.offer)?;
                let utxos = load_utxos(&files.utxos)?;
                let selected =
                    get_partial_accept_fuel_inputs(&offer, &utxos, accepted_atoms, &params)?;
                let (fee_sats, asked_sats) =
                    accept_costs(&offer, selected.len(), Some(accepted_atoms), &params)?;
                print_report("accept", &offer, &params, selected, fee_sats, asked_sats)
            }
            Self::AcceptOneshot { files } => {
                let offer = load_offer(&files.offer)?;
                let utxos = load_utxos(&files.utxos)?;
                let selected = get_oneshot_accept_fuel_inputs(&offer, &utxos, &params)?;
                let (fee_sats, asked_sats) = accept_costs(&offer, selected.len(), None, &params)?;
                print_report("accept", &offer, &params, selected, fee_sats, asked_sats)
            }
            Self::Cancel { files } => {
                let offer = load_offer(&files.offer)?;
                let utxos = load_utxos(&files.utxos)?;
                let selected = get_cancel_fuel_inputs(&offer, &utxos, &params)?;
                let extra_inputs = vec![DummyInput::p2pkh(); selected.len()];
                let fee_sats = offer.cancel_fee_sats(&CancelFeeParams {
                    recipient_script: params.recipient_script,
                    extra_inputs: &extra_inputs,
                    fee_per_kb: params.fee_per_kb,
                })?;
                print_report("cancel", &offer, &params, selected, fee_sats, 0)
            }
        }
    }
}

fn accept_costs(
    offer: &AgoraOffer,
    input_count: usize,
    accepted_atoms: Option<u64>,
    params: &FuelParams<'_>,
) -> Result<(u64, u64)> {
    let extra_inputs = vec![DummyInput::p2pkh(); input_count];
    let fee_sats = offer.accept_fee_sats(&AcceptFeeParams {
        recipient_script: params.recipient_script,
        extra_inputs: &extra_inputs,
        accepted_atoms,
        fee_per_kb: params.fee_per_kb,
    })?;
    let asked_sats = offer.asked_sats(accepted_atoms)?;
    Ok((fee_sats, asked_sats))
}

fn print_report(
    action: &'static str,
    offer: &AgoraOffer,
    params: &FuelParams<'_>,
    selected: &[Utxo],
    fee_sats: u64,
    asked_sats: u64,
) -> Result<()> {
    // Selection already summed these without overflow.
    let input_sats = selected.iter().map(|utxo| utxo.sats).sum();
    let report = FuelSelectionReport {
        action,
        variant: offer.variant_name(),
        fee_per_kb: params.fee_per_kb,
        input_count: selected.len(),
        input_sats,
        fee_sats,
        asked_sats,
        required_sats: fee_sats.saturating_add(asked_sats),
        inputs: selected,
    };

    tracing::info!(
        action,
        input_count = report.input_count,
        input_sats = report.input_sats,
        required_sats = report.required_sats,
        "selected fuel inputs"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
