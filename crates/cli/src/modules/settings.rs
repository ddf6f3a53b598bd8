use anyhow::{Context, Result, bail};
use config::{Config, Environment};
use serde::Deserialize;
use settlement_core::{DEFAULT_FEE_PER_KB, DUMMY_P2PKH_SCRIPT};

const ENV_PREFIX: &str = "SETTLEMENT";

/// Defaults for fee pricing, overridable through `SETTLEMENT__*` variables or `.env`.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub fee_per_kb: u64,
    pub recipient_script_hex: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let cfg = Config::builder()
            .set_default("fee_per_kb", DEFAULT_FEE_PER_KB)?
            .set_default("recipient_script_hex", hex::encode(DUMMY_P2PKH_SCRIPT))?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        cfg.try_deserialize()
            .context("SETTLEMENT__* environment holds invalid settings")
    }

    pub fn validate(&self) -> Result<()> {
        if self.fee_per_kb == 0 {
            bail!("SETTLEMENT__FEE_PER_KB must be > 0");
        }
        self.recipient_script()
            .context("SETTLEMENT__RECIPIENT_SCRIPT_HEX must be valid hex")?;
        Ok(())
    }

    pub fn recipient_script(&self) -> Result<Vec<u8>> {
        Ok(hex::decode(&self.recipient_script_hex)?)
    }
}
