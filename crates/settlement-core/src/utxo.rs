use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reference to a transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutPoint {
    /// Big-endian transaction id hex.
    pub txid: String,
    pub out_idx: u32,
}

/// Spendable output of the wallet as reported by the indexer.
///
/// Only `sats` matters for fuel selection; every other field is carried
/// through untouched so the caller can build the transaction afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    pub outpoint: OutPoint,
    pub sats: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<i32>,
    #[serde(default)]
    pub is_coinbase: bool,
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, Value>,
}

impl Utxo {
    #[must_use]
    pub fn new(outpoint: OutPoint, sats: u64) -> Self {
        Self {
            outpoint,
            sats,
            block_height: None,
            is_coinbase: false,
            extra: BTreeMap::new(),
        }
    }
}

/// Anything that can fuel a transaction with a known satoshi value.
pub trait FuelUtxo {
    fn sats(&self) -> u64;
}

impl FuelUtxo for Utxo {
    fn sats(&self) -> u64 {
        self.sats
    }
}
