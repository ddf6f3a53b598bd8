use anyhow::{Context, Result};
use clap::Subcommand;
use settlement_core::{decimalize, normalize_scientific, undecimalize};

/// Conversions between decimalized token amounts and atoms.
#[derive(Subcommand, Debug)]
pub enum Amount {
    /// Turn atoms into a decimalized amount, e.g. `10012345` at 5 decimals is `100.12345`
    Decimalize {
        /// Atoms as an integer string, scientific notation accepted
        #[arg(long = "atoms")]
        atoms: String,
        /// Decimal places of the token (0-9)
        #[arg(long = "decimals")]
        decimals: u8,
    },
    /// Turn a decimalized amount into atoms, failing instead of truncating
    Undecimalize {
        /// Decimalized amount, e.g. `100.12345`
        #[arg(long = "amount")]
        amount: String,
        /// Decimal places of the token (0-9)
        #[arg(long = "decimals")]
        decimals: u8,
    },
    /// Expand scientific notation such as `1.5e3` into an integer string
    Normalize {
        /// Number in scientific notation
        value: String,
    },
}

impl Amount {
    pub fn handle(self) -> Result<()> {
        let converted = match self {
            Self::Decimalize { atoms, decimals } => decimalize(&atoms, decimals)
                .with_context(|| format!("cannot decimalize '{atoms}' at {decimals} decimals"))?,
            Self::Undecimalize { amount, decimals } => undecimalize(&amount, decimals)
                .with_context(|| {
                    format!("cannot undecimalize '{amount}' at {decimals} decimals")
                })?,
            Self::Normalize { value } => normalize_scientific(&value)
                .with_context(|| format!("cannot normalize '{value}'"))?,
        };

        println!("{converted}");
        Ok(())
    }
}
