//! Fuel input selection for offer settlement.
//!
//! Accepting or cancelling an offer needs wallet UTXOs to pay the asked price
//! and the network fee, but the fee depends on how many inputs the
//! transaction ends up with. Selection therefore grows the input set one UTXO
//! at a time and re-prices the transaction at every step, sized with one dummy
//! input per selected UTXO, until the running total covers the threshold for
//! that exact input count.
//!
//! # Ordering
//!
//! UTXOs are consumed strictly in the order given and the shortest sufficient
//! prefix is returned. No sorting happens here; callers wanting oldest-first or
//! largest-first selection order the slice before calling.
//!
//! # Failure modes
//!
//! - No prefix covers its threshold, including an empty slice: `InsufficientFunds`.
//! - Cost model errors are propagated as `Offer`.
//! - Running totals use checked arithmetic and fail with `Overflow`.

use crate::error::{FuelAction, FuelError, OfferError};
use crate::offer::{AcceptFeeParams, CancelFeeParams, TradeOfferCostModel};
use crate::tx_size::{DEFAULT_FEE_PER_KB, DUMMY_P2PKH_SCRIPT, DummyInput};
use crate::utxo::FuelUtxo;

/// Fee rate and recipient used to price settlement transactions.
#[derive(Debug, Clone, Copy)]
pub struct FuelParams<'a> {
    pub fee_per_kb: u64,
    pub recipient_script: &'a [u8],
}

impl Default for FuelParams<'_> {
    fn default() -> Self {
        Self {
            fee_per_kb: DEFAULT_FEE_PER_KB,
            recipient_script: &DUMMY_P2PKH_SCRIPT,
        }
    }
}

/// Select the shortest prefix of `utxos` whose value covers `required_sats`.
///
/// `required_sats` receives the number of selected inputs and as many dummy
/// inputs, and returns the threshold for that input count.
pub fn select_fuel_inputs<'a, U, F>(
    utxos: &'a [U],
    action: FuelAction,
    mut required_sats: F,
) -> Result<&'a [U], FuelError>
where
    U: FuelUtxo,
    F: FnMut(usize, &[DummyInput]) -> Result<u64, OfferError>,
{
    let mut dummy_inputs = Vec::with_capacity(utxos.len());
    let mut cumulative_sats = 0u64;
    let mut last_required_sats = 0u64;

    for (index, utxo) in utxos.iter().enumerate() {
        let input_count = index + 1;
        dummy_inputs.push(DummyInput::p2pkh());
        cumulative_sats = cumulative_sats.checked_add(utxo.sats()).ok_or_else(|| {
            FuelError::Overflow(format!("sum of the first {input_count} fuel inputs"))
        })?;

        last_required_sats = required_sats(input_count, &dummy_inputs)?;
        tracing::debug!(
            %action,
            input_count,
            cumulative_sats,
            required_sats = last_required_sats,
            "fuel selection step"
        );

        if cumulative_sats >= last_required_sats {
            return Ok(&utxos[..input_count]);
        }
    }

    Err(FuelError::InsufficientFunds {
        action,
        available_sats: cumulative_sats,
        required_sats: last_required_sats,
        inputs: utxos.len(),
    })
}

/// Fuel inputs to accept `accepted_atoms` of a partial offer.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(accepted_atoms = accepted_atoms),
    err(level = "debug")
)]
pub fn get_partial_accept_fuel_inputs<'a, O, U>(
    offer: &O,
    utxos: &'a [U],
    accepted_atoms: u64,
    params: &FuelParams<'_>,
) -> Result<&'a [U], FuelError>
where
    O: TradeOfferCostModel + ?Sized,
    U: FuelUtxo,
{
    select_fuel_inputs(utxos, FuelAction::Accept, |_, extra_inputs| {
        let fee = offer.accept_fee_sats(&AcceptFeeParams {
            recipient_script: params.recipient_script,
            extra_inputs,
            accepted_atoms: Some(accepted_atoms),
            fee_per_kb: params.fee_per_kb,
        })?;
        let asked = offer.asked_sats(Some(accepted_atoms))?;
        checked_threshold(fee, asked)
    })
}

/// Fuel inputs to accept an all-or-nothing offer.
#[tracing::instrument(level = "debug", skip_all, err(level = "debug"))]
pub fn get_oneshot_accept_fuel_inputs<'a, O, U>(
    offer: &O,
    utxos: &'a [U],
    params: &FuelParams<'_>,
) -> Result<&'a [U], FuelError>
where
    O: TradeOfferCostModel + ?Sized,
    U: FuelUtxo,
{
    select_fuel_inputs(utxos, FuelAction::Accept, |_, extra_inputs| {
        let fee = offer.accept_fee_sats(&AcceptFeeParams {
            recipient_script: params.recipient_script,
            extra_inputs,
            accepted_atoms: None,
            fee_per_kb: params.fee_per_kb,
        })?;
        let asked = offer.asked_sats(None)?;
        checked_threshold(fee, asked)
    })
}

/// Fuel inputs to cancel an offer; only the fee has to be covered.
#[tracing::instrument(level = "debug", skip_all, err(level = "debug"))]
pub fn get_cancel_fuel_inputs<'a, O, U>(
    offer: &O,
    utxos: &'a [U],
    params: &FuelParams<'_>,
) -> Result<&'a [U], FuelError>
where
    O: TradeOfferCostModel + ?Sized,
    U: FuelUtxo,
{
    select_fuel_inputs(utxos, FuelAction::Cancel, |_, extra_inputs| {
        offer.cancel_fee_sats(&CancelFeeParams {
            recipient_script: params.recipient_script,
            extra_inputs,
            fee_per_kb: params.fee_per_kb,
        })
    })
}

fn checked_threshold(fee_sats: u64, asked_sats: u64) -> Result<u64, OfferError> {
    fee_sats
        .checked_add(asked_sats)
        .ok_or_else(|| OfferError::Overflow("asked sats plus fee".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Sats(u64);

    impl FuelUtxo for Sats {
        fn sats(&self) -> u64 {
            self.0
        }
    }

    /// Cost model with a fee table indexed by extra input count.
    struct TableCostModel {
        fees: Vec<u64>,
        asked: u64,
    }

    impl TableCostModel {
        fn fee(&self, extra_inputs: &[DummyInput]) -> u64 {
            let last = self.fees.len() - 1;
            self.fees[(extra_inputs.len() - 1).min(last)]
        }
    }

    impl TradeOfferCostModel for TableCostModel {
        fn asked_sats(&self, _accepted_atoms: Option<u64>) -> Result<u64, OfferError> {
            Ok(self.asked)
        }

        fn accept_fee_sats(&self, params: &AcceptFeeParams<'_>) -> Result<u64, OfferError> {
            Ok(self.fee(params.extra_inputs))
        }

        fn cancel_fee_sats(&self, params: &CancelFeeParams<'_>) -> Result<u64, OfferError> {
            Ok(self.fee(params.extra_inputs))
        }
    }

    fn values(selected: &[Sats]) -> Vec<u64> {
        selected.iter().map(|utxo| utxo.0).collect()
    }

    #[test]
    fn accept_recomputes_threshold_per_input() {
        let model = TableCostModel {
            fees: vec![200, 300, 400],
            asked: 1_500,
        };
        let utxos = [Sats(1_000), Sats(2_000), Sats(5_000)];

        let selected = get_partial_accept_fuel_inputs(&model, &utxos, 1, &FuelParams::default())
            .expect("two inputs cover 1800");
        assert_eq!(values(selected), vec![1_000, 2_000]);

        let selected = get_oneshot_accept_fuel_inputs(&model, &utxos, &FuelParams::default())
            .expect("two inputs cover 1800");
        assert_eq!(values(selected), vec![1_000, 2_000]);
    }

    #[test]
    fn cancel_pays_only_the_fee() {
        let model = TableCostModel {
            fees: vec![200, 300],
            asked: 1_500,
        };
        let utxos = [Sats(1_000), Sats(2_000), Sats(5_000)];

        let selected =
            get_cancel_fuel_inputs(&model, &utxos, &FuelParams::default()).expect("first covers");
        assert_eq!(values(selected), vec![1_000]);
    }

    #[test]
    fn selection_keeps_caller_order() {
        let model = TableCostModel {
            fees: vec![100],
            asked: 0,
        };
        // A later, larger utxo would cover the fee alone, but order wins.
        let utxos = [Sats(60), Sats(60), Sats(10_000)];

        let selected =
            get_cancel_fuel_inputs(&model, &utxos, &FuelParams::default()).expect("covered");
        assert_eq!(values(selected), vec![60, 60]);
    }

    #[test]
    fn exhausted_utxos_are_insufficient() {
        let model = TableCostModel {
            fees: vec![1_000],
            asked: 0,
        };
        let utxos = [Sats(100)];

        let err = get_cancel_fuel_inputs(&model, &utxos, &FuelParams::default())
            .expect_err("100 < 1000");
        assert_eq!(err.to_string(), "Insufficient utxos to cancel this offer");
        assert!(matches!(
            err,
            FuelError::InsufficientFunds {
                action: FuelAction::Cancel,
                available_sats: 100,
                required_sats: 1_000,
                inputs: 1,
            }
        ));
    }

    #[test]
    fn empty_utxos_are_insufficient() {
        let model = TableCostModel {
            fees: vec![0],
            asked: 0,
        };
        let utxos: [Sats; 0] = [];

        let err = get_oneshot_accept_fuel_inputs(&model, &utxos, &FuelParams::default())
            .expect_err("nothing to select");
        assert_eq!(err.to_string(), "Insufficient utxos to accept this offer");
    }

    #[test]
    fn threshold_sees_matching_dummy_count() {
        let utxos = [Sats(1), Sats(1), Sats(1), Sats(1)];
        let mut seen = Vec::new();

        let selected = select_fuel_inputs(&utxos, FuelAction::Accept, |count, dummies| {
            seen.push((count, dummies.len()));
            Ok(3)
        })
        .expect("three inputs cover 3");

        assert_eq!(selected.len(), 3);
        assert_eq!(seen, vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn cost_model_errors_are_propagated() {
        let utxos = [Sats(1_000)];
        let err = select_fuel_inputs(&utxos, FuelAction::Accept, |_, _| {
            Err(OfferError::MissingAcceptedAtoms)
        })
        .expect_err("cost model fails");
        assert!(matches!(err, FuelError::Offer(OfferError::MissingAcceptedAtoms)));
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let utxos = [Sats(u64::MAX - 1), Sats(2)];
        let err = select_fuel_inputs(&utxos, FuelAction::Accept, |_, _| Ok(u64::MAX))
            .expect_err("second input overflows");
        assert!(matches!(err, FuelError::Overflow(_)));

        let model = TableCostModel {
            fees: vec![1],
            asked: u64::MAX,
        };
        let err = get_oneshot_accept_fuel_inputs(&model, &utxos, &FuelParams::default())
            .expect_err("threshold overflows");
        assert!(matches!(err, FuelError::Offer(OfferError::Overflow(_))));
    }
}
