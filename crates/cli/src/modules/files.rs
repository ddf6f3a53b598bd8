use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use settlement_core::{AgoraOffer, Utxo};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse '{}'", path.display()))
}

/// Load and validate an offer description.
pub fn load_offer(path: &Path) -> Result<AgoraOffer> {
    let offer: AgoraOffer = read_json(path)?;
    offer
        .validate()
        .with_context(|| format!("invalid offer in '{}'", path.display()))?;
    tracing::debug!(
        variant = offer.variant_name(),
        txid = %offer.outpoint.txid,
        out_idx = offer.outpoint.out_idx,
        "loaded offer"
    );
    Ok(offer)
}

/// Load candidate utxos, keeping the order of the file.
pub fn load_utxos(path: &Path) -> Result<Vec<Utxo>> {
    let utxos: Vec<Utxo> = read_json(path)?;
    tracing::debug!(count = utxos.len(), "loaded candidate utxos");
    Ok(utxos)
}
