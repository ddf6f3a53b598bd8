//! Lossless conversion between decimalized token amounts and atoms.
//!
//! Token amounts travel through the wallet as strings so that no float ever
//! touches them. A token with `decimals = d` stores `amount * 10^d` atoms
//! on-chain; converting in either direction is pure string manipulation.
//! Converting a decimalized amount that carries more fractional digits than
//! the token supports is an error, never a truncation.

pub mod decimals;
pub mod scientific;

pub use decimals::{MAX_TOKEN_DECIMALS, decimalize, strip_leading_zeros, undecimalize};
pub use scientific::{atoms_from_str, is_scientific, normalize_scientific};
