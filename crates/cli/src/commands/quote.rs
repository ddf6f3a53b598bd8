use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use settlement_core::{OfferVariant, TradeOfferCostModel, atoms_from_str};

use crate::modules::files::load_offer;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// JSON file describing the offer
    #[arg(long = "offer")]
    pub offer: PathBuf,
    /// Atoms to price for partial offers, defaults to the whole offer
    #[arg(long = "accepted-atoms")]
    pub accepted_atoms: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Quote {
    variant: &'static str,
    asked_sats: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    accepted_atoms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offered_atoms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_accepted_atoms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price_nanosats_per_atom: Option<u64>,
}

impl QuoteArgs {
    pub fn handle(self) -> Result<()> {
        let offer = load_offer(&self.offer)?;
        let accepted_atoms = self
            .accepted_atoms
            .as_deref()
            .map(atoms_from_str)
            .transpose()
            .context("invalid accepted atoms")?;

        let quote = match &offer.variant {
            OfferVariant::Partial(partial) => {
                let requested = match accepted_atoms {
                    Some(atoms) => atoms,
                    None => partial.offered_atoms()?,
                };
                let prepared = partial.prepare_accepted_atoms(requested);
                Quote {
                    variant: offer.variant_name(),
                    asked_sats: offer.asked_sats(Some(prepared))?,
                    accepted_atoms: Some(prepared),
                    offered_atoms: Some(partial.offered_atoms()?),
                    min_accepted_atoms: Some(partial.min_accepted_atoms()?),
                    price_nanosats_per_atom: Some(partial.price_nanosats_per_atom(Some(prepared))?),
                }
            }
            OfferVariant::Oneshot(_) => Quote {
                variant: offer.variant_name(),
                asked_sats: offer.asked_sats(None)?,
                accepted_atoms: None,
                offered_atoms: None,
                min_accepted_atoms: None,
                price_nanosats_per_atom: None,
            },
        };

        println!("{}", serde_json::to_string_pretty(&quote)?);
        Ok(())
    }
}
