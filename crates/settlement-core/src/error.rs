use thiserror::Error;

/// Errors raised while converting between decimalized amounts and atoms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("decimalized amount specified at greater precision than supported token decimals ({decimals})")]
    PrecisionExceeded { decimals: u8 },

    #[error("negative exponents are not supported for integer conversion: {0}")]
    NegativeExponent(String),

    #[error("scientific notation does not describe an integer: {0}")]
    NonIntegerResult(String),

    #[error("invalid scientific notation format: {0}")]
    InvalidScientific(String),

    #[error("amount must be a stringified integer, got '{0}'")]
    InvalidAtoms(String),

    #[error(
        "decimalized amount must be a non-empty string containing only decimal numbers and optionally one decimal point, got '{0}'"
    )]
    InvalidDecimalized(String),

    #[error("token decimals must be in 0..=9, got {0}")]
    InvalidDecimals(u8),

    #[error("amount overflow: {0}")]
    Overflow(String),
}

/// Errors raised by the offer cost model.
#[derive(Debug, Error)]
pub enum OfferError {
    #[error("Must provide accepted atoms for PARTIAL offers")]
    MissingAcceptedAtoms,

    #[error(
        "accepted atoms must have the last {bits} bits set to zero, use prepare_accepted_atoms to get a valid amount"
    )]
    UnpreparedAcceptedAtoms { bits: u32 },

    #[error("accepted atoms must be greater than zero after truncation")]
    ZeroAcceptedAtoms,

    #[error("accepted atoms {accepted} are below the offer minimum of {min}")]
    AcceptedAtomsBelowMinimum { accepted: u64, min: u64 },

    #[error("accepted atoms {accepted} exceed the {offered} atoms offered")]
    AcceptedAtomsExceedOffered { accepted: u64, offered: u64 },

    #[error("invalid offer parameters: {0}")]
    InvalidParams(String),

    #[error("invalid script hex: {0}")]
    InvalidScriptHex(#[from] hex::FromHexError),

    #[error("offer arithmetic overflow: {0}")]
    Overflow(String),
}

/// Settlement action a fuel selection is funding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelAction {
    Accept,
    Cancel,
}

impl std::fmt::Display for FuelAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accept => f.write_str("accept"),
            Self::Cancel => f.write_str("cancel"),
        }
    }
}

/// Errors raised while selecting fuel inputs.
#[derive(Debug, Error)]
pub enum FuelError {
    #[error("Insufficient utxos to {action} this offer")]
    InsufficientFunds {
        action: FuelAction,
        /// Sum of every candidate utxo.
        available_sats: u64,
        /// Threshold computed for the full candidate set, 0 when there were no candidates.
        required_sats: u64,
        inputs: usize,
    },

    #[error("Offer cost model error: {0}")]
    Offer(#[from] OfferError),

    #[error("fuel amount overflow: {0}")]
    Overflow(String),
}
