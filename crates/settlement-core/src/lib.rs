#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![cfg_attr(test, allow(clippy::too_many_lines))]

pub mod amount;
pub mod error;
pub mod fuel;
pub mod offer;
pub mod tx_size;
pub mod utxo;

pub use amount::{
    MAX_TOKEN_DECIMALS, atoms_from_str, decimalize, is_scientific, normalize_scientific,
    strip_leading_zeros, undecimalize,
};
pub use error::{AmountError, FuelAction, FuelError, OfferError};
pub use fuel::{
    FuelParams, get_cancel_fuel_inputs, get_oneshot_accept_fuel_inputs,
    get_partial_accept_fuel_inputs, select_fuel_inputs,
};
pub use offer::{
    AcceptFeeParams, AgoraOffer, AgoraOneshot, AgoraPartial, CancelFeeParams,
    DEFAULT_SCRIPT_INTEGER_BITS, EnforcedOutput, OfferTxSizes, OfferVariant, PartialOfferTerms,
    TokenProtocol, TradeOfferCostModel,
};
pub use tx_size::{
    DEFAULT_FEE_PER_KB, DUMMY_INPUT_SATS, DUMMY_P2PKH_SCRIPT, DummyInput, P2SH_OUTPUT_SIZE,
};
pub use utxo::{FuelUtxo, OutPoint, Utxo};
