//! Cost model of trade offers.
//!
//! Fuel selection only needs three numbers from an offer: what the maker asks
//! for, and what the accept or cancel transaction costs in fees once it carries
//! a given set of extra inputs. [`TradeOfferCostModel`] is that seam;
//! [`AgoraOffer`] implements it for partial and oneshot offers.

pub mod oneshot;
pub mod partial;

use serde::{Deserialize, Serialize};

use crate::error::OfferError;
use crate::tx_size::{DummyInput, P2SH_OUTPUT_SIZE, estimated_tx_size, fee_for_size};
use crate::utxo::OutPoint;

pub use oneshot::{AgoraOneshot, EnforcedOutput};
pub use partial::{AgoraPartial, DEFAULT_SCRIPT_INTEGER_BITS, PartialOfferTerms, TokenProtocol};

/// Inputs to the accept fee estimate.
#[derive(Debug, Clone, Copy)]
pub struct AcceptFeeParams<'a> {
    /// Script receiving the tokens and any leftover sats.
    pub recipient_script: &'a [u8],
    pub extra_inputs: &'a [DummyInput],
    /// Required for partial offers, ignored by oneshot offers.
    pub accepted_atoms: Option<u64>,
    pub fee_per_kb: u64,
}

/// Inputs to the cancel fee estimate.
#[derive(Debug, Clone, Copy)]
pub struct CancelFeeParams<'a> {
    /// Script receiving the returned tokens and any leftover sats.
    pub recipient_script: &'a [u8],
    pub extra_inputs: &'a [DummyInput],
    pub fee_per_kb: u64,
}

pub trait TradeOfferCostModel {
    /// Sats the maker asks for, excluding fees.
    fn asked_sats(&self, accepted_atoms: Option<u64>) -> Result<u64, OfferError>;

    /// Network fee of the accept transaction, excluding the asked sats.
    fn accept_fee_sats(&self, params: &AcceptFeeParams<'_>) -> Result<u64, OfferError>;

    /// Network fee of the cancel transaction.
    fn cancel_fee_sats(&self, params: &CancelFeeParams<'_>) -> Result<u64, OfferError>;
}

/// Covenant the offer is locked with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferVariant {
    Partial(AgoraPartial),
    Oneshot(AgoraOneshot),
}

/// Serialized sizes of the settlement transactions before fuel is added.
///
/// Each size covers the transaction spending only the offer input and
/// without the recipient output, as measured by the transaction builder.
/// For partial offers the accept size also excludes the output returning
/// unsold tokens to a new offer; it is added whenever an accept leaves some.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferTxSizes {
    pub accept_base_size: u64,
    pub cancel_base_size: u64,
}

/// One offer UTXO on the order book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgoraOffer {
    pub outpoint: OutPoint,
    pub variant: OfferVariant,
    pub tx_sizes: OfferTxSizes,
}

impl AgoraOffer {
    pub fn validate(&self) -> Result<(), OfferError> {
        match &self.variant {
            OfferVariant::Partial(partial) => partial.validate(),
            OfferVariant::Oneshot(oneshot) => {
                for output in &oneshot.enforced_outputs {
                    output.script()?;
                }
                oneshot.asked_sats().map(|_| ())
            }
        }
    }

    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self.variant {
            OfferVariant::Partial(_) => "PARTIAL",
            OfferVariant::Oneshot(_) => "ONESHOT",
        }
    }
}

impl TradeOfferCostModel for AgoraOffer {
    fn asked_sats(&self, accepted_atoms: Option<u64>) -> Result<u64, OfferError> {
        match &self.variant {
            OfferVariant::Partial(partial) => {
                partial.asked_sats(accepted_atoms.ok_or(OfferError::MissingAcceptedAtoms)?)
            }
            OfferVariant::Oneshot(oneshot) => oneshot.asked_sats(),
        }
    }

    fn accept_fee_sats(&self, params: &AcceptFeeParams<'_>) -> Result<u64, OfferError> {
        let base_size = match &self.variant {
            OfferVariant::Partial(partial) => {
                let accepted_atoms = params
                    .accepted_atoms
                    .ok_or(OfferError::MissingAcceptedAtoms)?;
                partial.check_accepted_atoms(accepted_atoms)?;
                if partial.leaves_remainder(accepted_atoms)? {
                    self.tx_sizes
                        .accept_base_size
                        .checked_add(P2SH_OUTPUT_SIZE)
                        .ok_or_else(|| OfferError::Overflow("transaction size".to_string()))?
                } else {
                    self.tx_sizes.accept_base_size
                }
            }
            OfferVariant::Oneshot(_) => self.tx_sizes.accept_base_size,
        };
        let size = estimated_tx_size(base_size, params.recipient_script, params.extra_inputs)?;
        fee_for_size(size, params.fee_per_kb)
    }

    fn cancel_fee_sats(&self, params: &CancelFeeParams<'_>) -> Result<u64, OfferError> {
        let size = estimated_tx_size(
            self.tx_sizes.cancel_base_size,
            params.recipient_script,
            params.extra_inputs,
        )?;
        fee_for_size(size, params.fee_per_kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx_size::DUMMY_P2PKH_SCRIPT;

    fn oneshot_offer() -> AgoraOffer {
        serde_json::from_value(serde_json::json!({
            "outpoint": {
                "txid": "d30e55d27ec479d5b683be75321fa6fca2a3b10e8527d6828d30e0ddf67b4b40",
                "outIdx": 1
            },
            "variant": {
                "type": "ONESHOT",
                "params": {
                    "enforcedOutputs": [
                        { "sats": 0, "scriptHex": "6a04534c5000" },
                        { "sats": 5000000000u64, "scriptHex": "76a91495e79f51d4260bc0dc3ba7fb77c7be92d0fbdd1d88ac" }
                    ]
                }
            },
            "txSizes": { "acceptBaseSize": 565, "cancelBaseSize": 360 }
        }))
        .expect("oneshot offer deserializes")
    }

    #[test]
    fn oneshot_ignores_accepted_atoms() {
        let offer = oneshot_offer();
        assert_eq!(offer.variant_name(), "ONESHOT");
        assert_eq!(offer.asked_sats(None).expect("asked"), 5_000_000_000);
        assert_eq!(offer.asked_sats(Some(1)).expect("asked"), 5_000_000_000);
        offer.validate().expect("valid offer");
    }

    #[test]
    fn fees_follow_extra_inputs() {
        let offer = oneshot_offer();
        let inputs = [DummyInput::p2pkh(); 3];
        for (count, accept, cancel) in [(1, 740, 535), (2, 881, 676), (3, 1022, 817)] {
            let accept_params = AcceptFeeParams {
                recipient_script: &DUMMY_P2PKH_SCRIPT,
                extra_inputs: &inputs[..count],
                accepted_atoms: None,
                fee_per_kb: 1000,
            };
            let cancel_params = CancelFeeParams {
                recipient_script: &DUMMY_P2PKH_SCRIPT,
                extra_inputs: &inputs[..count],
                fee_per_kb: 1000,
            };
            assert_eq!(offer.accept_fee_sats(&accept_params).expect("fee"), accept);
            assert_eq!(offer.cancel_fee_sats(&cancel_params).expect("fee"), cancel);
        }
    }

    fn partial_offer() -> AgoraOffer {
        AgoraOffer {
            variant: OfferVariant::Partial(AgoraPartial {
                trunc_atoms: 10_000,
                num_atoms_trunc_bytes: 0,
                atoms_scale_factor: 214_747,
                scaled_trunc_atoms_per_trunc_sat: 5_497,
                num_sats_trunc_bytes: 1,
                min_accepted_scaled_trunc_atoms: 2_147_470,
                dust_sats: 546,
                token_id: "aa".repeat(32),
            }),
            tx_sizes: OfferTxSizes {
                accept_base_size: 975,
                cancel_base_size: 544,
            },
            ..oneshot_offer()
        }
    }

    fn partial_accept_fee(offer: &AgoraOffer, accepted_atoms: u64) -> Result<u64, OfferError> {
        let inputs = [DummyInput::p2pkh()];
        offer.accept_fee_sats(&AcceptFeeParams {
            recipient_script: &DUMMY_P2PKH_SCRIPT,
            extra_inputs: &inputs,
            accepted_atoms: Some(accepted_atoms),
            fee_per_kb: 1000,
        })
    }

    #[test]
    fn full_fill_skips_remainder_output() {
        let offer = partial_offer();
        assert_eq!(partial_accept_fee(&offer, 546).expect("partial fill"), 1182);
        assert_eq!(partial_accept_fee(&offer, 9_999).expect("partial fill"), 1182);
        assert_eq!(partial_accept_fee(&offer, 10_000).expect("full fill"), 1150);
    }

    #[test]
    fn accept_fee_rejects_unacceptable_amounts() {
        let offer = partial_offer();
        assert!(matches!(
            partial_accept_fee(&offer, 0),
            Err(OfferError::ZeroAcceptedAtoms)
        ));
        assert!(matches!(
            partial_accept_fee(&offer, 1),
            Err(OfferError::AcceptedAtomsBelowMinimum { .. })
        ));
        assert!(matches!(
            partial_accept_fee(&offer, 20_000),
            Err(OfferError::AcceptedAtomsExceedOffered { .. })
        ));
    }

    #[test]
    fn partial_requires_accepted_atoms() {
        let offer = partial_offer();

        let err = offer.asked_sats(None).expect_err("partial needs atoms");
        assert!(matches!(err, OfferError::MissingAcceptedAtoms));
        assert_eq!(
            err.to_string(),
            "Must provide accepted atoms for PARTIAL offers"
        );

        let params = AcceptFeeParams {
            recipient_script: &DUMMY_P2PKH_SCRIPT,
            extra_inputs: &[],
            accepted_atoms: None,
            fee_per_kb: 1000,
        };
        assert!(matches!(
            offer.accept_fee_sats(&params),
            Err(OfferError::MissingAcceptedAtoms)
        ));
    }

    #[test]
    fn invalid_enforced_script_fails_validation() {
        let mut offer = oneshot_offer();
        if let OfferVariant::Oneshot(oneshot) = &mut offer.variant {
            oneshot.enforced_outputs[0].script_hex = "0g".to_string();
        }
        assert!(matches!(
            offer.validate(),
            Err(OfferError::InvalidScriptHex(_))
        ));
    }
}
