use serde::{Deserialize, Serialize};

use crate::error::OfferError;

/// Output the covenant forces the accept transaction to contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnforcedOutput {
    pub sats: u64,
    pub script_hex: String,
}

impl EnforcedOutput {
    pub fn script(&self) -> Result<Vec<u8>, OfferError> {
        Ok(hex::decode(&self.script_hex)?)
    }
}

/// All-or-nothing offer: the taker pays every enforced output in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgoraOneshot {
    pub enforced_outputs: Vec<EnforcedOutput>,
}

impl AgoraOneshot {
    pub fn asked_sats(&self) -> Result<u64, OfferError> {
        self.enforced_outputs
            .iter()
            .try_fold(0u64, |sum, output| sum.checked_add(output.sats))
            .ok_or_else(|| OfferError::Overflow("sum of enforced outputs".to_string()))
    }
}
