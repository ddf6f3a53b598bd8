use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use settlement_core::{
    AgoraPartial, DEFAULT_SCRIPT_INTEGER_BITS, PartialOfferTerms, TokenProtocol, atoms_from_str,
};

#[derive(Args, Debug)]
pub struct ApproximateArgs {
    /// Atoms to offer
    #[arg(long = "offered-atoms")]
    pub offered_atoms: String,
    /// Asked price in nanosats per atom
    #[arg(long = "price-nanosats-per-atom")]
    pub price_nanosats_per_atom: u64,
    /// Smallest amount a taker may accept
    #[arg(long = "min-accepted-atoms")]
    pub min_accepted_atoms: String,
    /// Token id, big-endian hex
    #[arg(long = "token-id")]
    pub token_id: String,
    #[arg(long = "token-protocol", value_enum, default_value = "slp")]
    pub token_protocol: TokenProtocolArg,
    #[arg(long = "dust-sats", default_value_t = 546_u64)]
    pub dust_sats: u64,
    /// Integer width of Script arithmetic
    #[arg(long = "script-integer-bits", default_value_t = DEFAULT_SCRIPT_INTEGER_BITS)]
    pub script_integer_bits: u32,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum TokenProtocolArg {
    #[value(name = "slp")]
    Slp,
    #[value(name = "alp")]
    Alp,
}

impl From<TokenProtocolArg> for TokenProtocol {
    fn from(value: TokenProtocolArg) -> Self {
        match value {
            TokenProtocolArg::Slp => Self::Slp,
            TokenProtocolArg::Alp => Self::Alp,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Approximation {
    params: AgoraPartial,
    offered_atoms: u64,
    min_accepted_atoms: u64,
    price_nanosats_per_atom: u64,
}

impl ApproximateArgs {
    pub fn handle(self) -> Result<()> {
        let terms = PartialOfferTerms {
            offered_atoms: atoms_from_str(&self.offered_atoms)
                .context("invalid offered atoms")?,
            price_nanosats_per_atom: self.price_nanosats_per_atom,
            min_accepted_atoms: atoms_from_str(&self.min_accepted_atoms)
                .context("invalid min accepted atoms")?,
            token_id: self.token_id,
            token_protocol: self.token_protocol.into(),
            dust_sats: self.dust_sats,
            min_atoms_scale_factor: None,
            min_price_integer: None,
            min_scale_ratio: None,
        };

        let params = AgoraPartial::approximate(&terms, self.script_integer_bits)
            .context("terms cannot be represented as a partial offer")?;
        tracing::debug!(?params, "approximated partial offer");

        let approximation = Approximation {
            offered_atoms: params.offered_atoms()?,
            min_accepted_atoms: params.min_accepted_atoms()?,
            price_nanosats_per_atom: params.price_nanosats_per_atom(None)?,
            params,
        };
        println!("{}", serde_json::to_string_pretty(&approximation)?);
        Ok(())
    }
}
