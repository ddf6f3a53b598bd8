use serde::{Deserialize, Serialize};

use crate::error::OfferError;

/// Pricing parameters of a partially acceptable offer.
///
/// The covenant works on truncated integers so amounts fit into Script's
/// 31-bit arithmetic: the lowest `num_atoms_trunc_bytes` bytes of token amounts
/// and the lowest `num_sats_trunc_bytes` bytes of sat amounts are dropped, and
/// token amounts are scaled by `atoms_scale_factor` to keep precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgoraPartial {
    /// Offered amount with the truncated bytes removed.
    pub trunc_atoms: u64,
    pub num_atoms_trunc_bytes: u8,
    pub atoms_scale_factor: u64,
    /// Price in scaled truncated atoms per truncated sat.
    pub scaled_trunc_atoms_per_trunc_sat: u64,
    pub num_sats_trunc_bytes: u8,
    pub min_accepted_scaled_trunc_atoms: u64,
    #[serde(default = "default_dust_sats")]
    pub dust_sats: u64,
    /// Token id, big-endian hex.
    pub token_id: String,
}

const fn default_dust_sats() -> u64 {
    546
}

/// Integer width of Script arithmetic on the network.
pub const DEFAULT_SCRIPT_INTEGER_BITS: u32 = 32;

const NANOSATS_PER_SAT: u128 = 1_000_000_000;

/// Token protocol the offered token lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenProtocol {
    Slp,
    Alp,
}

impl TokenProtocol {
    /// Largest amount a single send output can carry.
    #[must_use]
    pub const fn max_atoms(self) -> u64 {
        match self {
            Self::Slp => u64::MAX,
            Self::Alp => 0xffff_ffff_ffff,
        }
    }
}

/// Terms a maker wants to offer, before they are fitted to Script integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialOfferTerms {
    pub offered_atoms: u64,
    pub price_nanosats_per_atom: u64,
    pub min_accepted_atoms: u64,
    pub token_id: String,
    pub token_protocol: TokenProtocol,
    #[serde(default = "default_dust_sats")]
    pub dust_sats: u64,
    /// Lower bound on `atoms_scale_factor` when picking the atoms truncation. Default 1000.
    #[serde(default)]
    pub min_atoms_scale_factor: Option<u64>,
    /// Sats are truncated further while the price integer stays below this. Default 1000.
    #[serde(default)]
    pub min_price_integer: Option<u64>,
    /// Minimum ratio of `atoms_scale_factor` to the price integer. Default 1000.
    #[serde(default)]
    pub min_scale_ratio: Option<u64>,
}

impl AgoraPartial {
    /// Fit `terms` into covenant parameters for Script integers of `script_integer_bits` bits.
    ///
    /// The result approximates the requested price; use [`Self::offered_atoms`],
    /// [`Self::min_accepted_atoms`] and [`Self::price_nanosats_per_atom`] for the
    /// values the covenant actually enforces.
    #[allow(clippy::too_many_lines)]
    pub fn approximate(
        terms: &PartialOfferTerms,
        script_integer_bits: u32,
    ) -> Result<Self, OfferError> {
        let invalid = |message: &str| OfferError::InvalidParams(message.to_string());
        let overflow = || OfferError::Overflow("partial offer parameters".to_string());

        if terms.offered_atoms < 1 {
            return Err(invalid("offeredAtoms must be at least 1"));
        }
        if terms.price_nanosats_per_atom < 1 {
            return Err(invalid("priceNanosatsPerAtom must be at least 1"));
        }
        if terms.min_accepted_atoms < 1 {
            return Err(invalid("minAcceptedAtoms must be at least 1"));
        }
        if terms.offered_atoms > terms.token_protocol.max_atoms() {
            return Err(OfferError::InvalidParams(format!(
                "offeredAtoms can be at most {} for {:?}",
                terms.token_protocol.max_atoms(),
                terms.token_protocol
            )));
        }
        if !(2..=64).contains(&script_integer_bits) {
            return Err(invalid("script integers must have between 2 and 64 bits"));
        }

        // One bit is the sign.
        let max_script_int = (1u128 << (script_integer_bits - 1)) - 1;
        let offered_atoms = u128::from(terms.offered_atoms);
        let price = u128::from(terms.price_nanosats_per_atom);

        let min_scale_factor = if NANOSATS_PER_SAT % price == 0 {
            1
        } else {
            u128::from(terms.min_atoms_scale_factor.unwrap_or(1_000))
        };

        let mut trunc_atoms = offered_atoms;
        let mut atoms_trunc_bytes = 0u32;
        while trunc_atoms
            .checked_mul(min_scale_factor)
            .is_none_or(|scaled| scaled > max_script_int)
        {
            trunc_atoms >>= 8;
            atoms_trunc_bytes += 1;
        }
        if trunc_atoms == 0 {
            return Err(invalid("offeredAtoms cannot be represented in Script"));
        }

        let mut required_trunc_sats = offered_atoms * price / NANOSATS_PER_SAT;
        let mut sats_trunc_bytes = 0u32;
        while required_trunc_sats > max_script_int {
            required_trunc_sats >>= 8;
            sats_trunc_bytes += 1;
        }

        let mut scale_factor = max_script_int / trunc_atoms;
        let price_integer = |sats_trunc_bytes: u32, scale_factor: u128| {
            let numerator = 1u128
                .checked_shl(8 * sats_trunc_bytes)
                .and_then(|v| v.checked_mul(scale_factor))
                .and_then(|v| v.checked_mul(NANOSATS_PER_SAT))
                .ok_or_else(overflow)?;
            let denominator = (1u128 << (8 * atoms_trunc_bytes))
                .checked_mul(price)
                .ok_or_else(overflow)?;
            Ok::<_, OfferError>(numerator / denominator)
        };

        let min_price_integer = u128::from(terms.min_price_integer.unwrap_or(1_000));
        let min_scale_ratio = u128::from(terms.min_scale_ratio.unwrap_or(1_000));
        let mut per_trunc_sat = price_integer(sats_trunc_bytes, scale_factor)?;
        while per_trunc_sat < min_price_integer
            && per_trunc_sat
                .checked_mul(min_scale_ratio)
                .is_some_and(|ratio| ratio < scale_factor)
        {
            sats_trunc_bytes += 1;
            per_trunc_sat = price_integer(sats_trunc_bytes, scale_factor)?;
        }

        // Rounding the asked sats up must not leave the Script integer range.
        let scaled_atoms = trunc_atoms * scale_factor;
        if scaled_atoms.saturating_add(per_trunc_sat).saturating_sub(1) > max_script_int {
            if scaled_atoms <= per_trunc_sat {
                scale_factor /= 2;
                per_trunc_sat = price_integer(sats_trunc_bytes, scale_factor)?;
            }
            let max_trunc_atoms = (max_script_int + 1)
                .checked_sub(per_trunc_sat)
                .ok_or_else(|| invalid("parameters cannot be represented in Script"))?;
            if trunc_atoms > max_trunc_atoms {
                scale_factor = 1;
                trunc_atoms = max_trunc_atoms;
            } else {
                scale_factor = max_trunc_atoms / trunc_atoms;
            }
            per_trunc_sat = price_integer(sats_trunc_bytes, scale_factor)?;
        }

        let min_accepted_scaled_trunc_atoms =
            (u128::from(terms.min_accepted_atoms) * scale_factor) >> (8 * atoms_trunc_bytes);

        let to_u64 = |value: u128| u64::try_from(value).map_err(|_| overflow());
        let to_u8 = |value: u32| u8::try_from(value).map_err(|_| overflow());
        let partial = Self {
            trunc_atoms: to_u64(trunc_atoms)?,
            num_atoms_trunc_bytes: to_u8(atoms_trunc_bytes)?,
            atoms_scale_factor: to_u64(scale_factor)?,
            scaled_trunc_atoms_per_trunc_sat: to_u64(per_trunc_sat)?,
            num_sats_trunc_bytes: to_u8(sats_trunc_bytes)?,
            min_accepted_scaled_trunc_atoms: to_u64(min_accepted_scaled_trunc_atoms)?,
            dust_sats: terms.dust_sats,
            token_id: terms.token_id.clone(),
        };
        if partial.min_accepted_atoms()? < 1 {
            return Err(invalid("minAcceptedAtoms too small, got truncated to 0"));
        }
        Ok(partial)
    }

    /// Reject parameters no covenant could have been built from.
    pub fn validate(&self) -> Result<(), OfferError> {
        if self.atoms_scale_factor == 0 {
            return Err(OfferError::InvalidParams(
                "atomsScaleFactor must be greater than zero".to_string(),
            ));
        }
        if self.scaled_trunc_atoms_per_trunc_sat == 0 {
            return Err(OfferError::InvalidParams(
                "scaledTruncAtomsPerTruncSat must be greater than zero".to_string(),
            ));
        }
        if self.num_atoms_trunc_bytes > 7 || self.num_sats_trunc_bytes > 7 {
            return Err(OfferError::InvalidParams(
                "truncation must leave at least one byte".to_string(),
            ));
        }
        Ok(())
    }

    fn atoms_trunc_bits(&self) -> u32 {
        8 * u32::from(self.num_atoms_trunc_bytes)
    }

    fn sats_trunc_bits(&self) -> u32 {
        8 * u32::from(self.num_sats_trunc_bytes)
    }

    /// Atoms actually offered by the covenant.
    pub fn offered_atoms(&self) -> Result<u64, OfferError> {
        shifted_to_u64(self.trunc_atoms, self.atoms_trunc_bits(), "offered atoms")
    }

    /// Smallest amount of atoms the covenant lets a taker accept.
    pub fn min_accepted_atoms(&self) -> Result<u64, OfferError> {
        self.validate()?;
        let scaled = u128::from(self.min_accepted_scaled_trunc_atoms) << self.atoms_trunc_bits();
        u64::try_from(scaled / u128::from(self.atoms_scale_factor))
            .map_err(|_| OfferError::Overflow("min accepted atoms".to_string()))
    }

    /// Check that the covenant lets a taker accept `accepted_atoms`.
    pub fn check_accepted_atoms(&self, accepted_atoms: u64) -> Result<(), OfferError> {
        if accepted_atoms == 0 {
            return Err(OfferError::ZeroAcceptedAtoms);
        }
        let min = self.min_accepted_atoms()?;
        if accepted_atoms < min {
            return Err(OfferError::AcceptedAtomsBelowMinimum {
                accepted: accepted_atoms,
                min,
            });
        }
        let offered = self.offered_atoms()?;
        if accepted_atoms > offered {
            return Err(OfferError::AcceptedAtomsExceedOffered {
                accepted: accepted_atoms,
                offered,
            });
        }
        Ok(())
    }

    /// Whether accepting `accepted_atoms` sends unsold tokens back to a new offer.
    pub fn leaves_remainder(&self, accepted_atoms: u64) -> Result<bool, OfferError> {
        Ok(accepted_atoms < self.offered_atoms()?)
    }

    /// Clear the truncated low bytes of `accepted_atoms` so the covenant accepts it.
    #[must_use]
    pub fn prepare_accepted_atoms(&self, accepted_atoms: u64) -> u64 {
        let bits = self.atoms_trunc_bits();
        (accepted_atoms >> bits) << bits
    }

    /// Exact sats the maker asks for `accepted_atoms`.
    ///
    /// `accepted_atoms` must already be prepared, see [`Self::prepare_accepted_atoms`],
    /// and pass [`Self::check_accepted_atoms`].
    pub fn asked_sats(&self, accepted_atoms: u64) -> Result<u64, OfferError> {
        self.validate()?;
        let atoms_bits = self.atoms_trunc_bits();
        let accepted_trunc_atoms = accepted_atoms >> atoms_bits;
        if accepted_trunc_atoms << atoms_bits != accepted_atoms {
            return Err(OfferError::UnpreparedAcceptedAtoms { bits: atoms_bits });
        }
        self.check_accepted_atoms(accepted_atoms)?;

        let asked_trunc_sats = (u128::from(accepted_trunc_atoms)
            * u128::from(self.atoms_scale_factor))
        .div_ceil(u128::from(self.scaled_trunc_atoms_per_trunc_sat));

        u64::try_from(asked_trunc_sats << self.sats_trunc_bits())
            .map_err(|_| OfferError::Overflow(format!("asked sats for {accepted_atoms} atoms")))
    }

    /// Effective price in nanosats per atom, rounding included.
    ///
    /// Defaults to accepting the whole offer.
    pub fn price_nanosats_per_atom(&self, accepted_atoms: Option<u64>) -> Result<u64, OfferError> {
        let accepted_atoms = match accepted_atoms {
            Some(atoms) => atoms,
            None => self.offered_atoms()?,
        };
        let prepared = self.prepare_accepted_atoms(accepted_atoms);
        if prepared == 0 {
            return Err(OfferError::ZeroAcceptedAtoms);
        }
        let sats = self.asked_sats(prepared)?;
        u64::try_from(u128::from(sats) * 1_000_000_000 / u128::from(prepared))
            .map_err(|_| OfferError::Overflow("price per atom".to_string()))
    }
}

fn shifted_to_u64(value: u64, bits: u32, what: &str) -> Result<u64, OfferError> {
    u64::try_from(u128::from(value) << bits).map_err(|_| OfferError::Overflow(what.to_string()))
}
