//! Serialized-size model used to price settlement transactions.
//!
//! Fees are charged per kilobyte of the serialized transaction, rounding up:
//! `fee = ceil(size * fee_per_kb / 1000)`.

use crate::error::OfferError;

/// Minimum relay fee rate of the network, in sats per kB.
pub const DEFAULT_FEE_PER_KB: u64 = 1_000;

/// Placeholder value carried by every dummy fuel input.
pub const DUMMY_INPUT_SATS: u64 = 100_000_000_000;

/// `OP_DUP OP_HASH160 <20 zero bytes> OP_EQUALVERIFY OP_CHECKSIG`
pub const DUMMY_P2PKH_SCRIPT: [u8; 25] = [
    0x76, 0xa9, 0x14, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x88, 0xac,
];

/// Push of a 64-byte Schnorr signature plus sighash byte, then a compressed pubkey.
const P2PKH_SCHNORR_SCRIPT_SIG_SIZE: u64 = 1 + 65 + 1 + 33;

/// `OP_HASH160 <20 bytes> OP_EQUAL`
const P2SH_SCRIPT_SIZE: u64 = 23;

/// Output carrying the remainder of a partially accepted offer back to its covenant.
pub const P2SH_OUTPUT_SIZE: u64 = OUTPUT_VALUE_SIZE + 1 + P2SH_SCRIPT_SIZE;

/// txid + vout
const OUTPOINT_SIZE: u64 = 32 + 4;
const SEQUENCE_SIZE: u64 = 4;
const OUTPUT_VALUE_SIZE: u64 = 8;

/// Stand-in for a signed fuel input.
///
/// Dummy inputs are never broadcast: they only make the transaction the
/// cost model measures as large as the real one will be once signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DummyInput {
    pub sats: u64,
    pub script_sig_size: u64,
}

impl DummyInput {
    /// A P2PKH input signed with a Schnorr signature.
    #[must_use]
    pub const fn p2pkh() -> Self {
        Self {
            sats: DUMMY_INPUT_SATS,
            script_sig_size: P2PKH_SCHNORR_SCRIPT_SIG_SIZE,
        }
    }

    #[must_use]
    pub const fn serialized_size(&self) -> u64 {
        OUTPOINT_SIZE + compact_size_len(self.script_sig_size) + self.script_sig_size + SEQUENCE_SIZE
    }
}

impl Default for DummyInput {
    fn default() -> Self {
        Self::p2pkh()
    }
}

/// Byte length of the `CompactSize` encoding of `n`.
#[must_use]
pub const fn compact_size_len(n: u64) -> u64 {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Serialized size of an output paying to `script`.
#[must_use]
pub fn output_size(script: &[u8]) -> u64 {
    let len = script.len() as u64;
    OUTPUT_VALUE_SIZE + compact_size_len(len) + len
}

/// Size of a settlement transaction built on a measured base.
///
/// `base_size` is the transaction with only the offer input and without the
/// recipient output. The recipient output and every extra input are added,
/// and the input count prefix grows if the extra inputs push it past a
/// `CompactSize` boundary.
pub fn estimated_tx_size(
    base_size: u64,
    recipient_script: &[u8],
    extra_inputs: &[DummyInput],
) -> Result<u64, OfferError> {
    let overflow = || OfferError::Overflow("transaction size".to_string());

    let inputs_size = extra_inputs
        .iter()
        .try_fold(0u64, |sum, input| sum.checked_add(input.serialized_size()))
        .ok_or_else(overflow)?;

    let input_count = 1 + extra_inputs.len() as u64;
    let count_prefix_growth = compact_size_len(input_count) - compact_size_len(1);

    base_size
        .checked_add(output_size(recipient_script))
        .and_then(|size| size.checked_add(inputs_size))
        .and_then(|size| size.checked_add(count_prefix_growth))
        .ok_or_else(overflow)
}

/// Fee for a transaction of `size` bytes at `fee_per_kb`, rounded up.
pub fn fee_for_size(size: u64, fee_per_kb: u64) -> Result<u64, OfferError> {
    let fee = (u128::from(size) * u128::from(fee_per_kb)).div_ceil(1_000);
    u64::try_from(fee).map_err(|_| OfferError::Overflow(format!("fee for {size} bytes")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p2pkh_dummy_input_is_141_bytes() {
        assert_eq!(DummyInput::p2pkh().serialized_size(), 141);
        assert_eq!(DummyInput::default(), DummyInput::p2pkh());
    }

    #[test]
    fn p2pkh_output_is_34_bytes() {
        assert_eq!(output_size(&DUMMY_P2PKH_SCRIPT), 34);
        assert_eq!(output_size(&[]), 9);
    }

    #[test]
    fn p2sh_output_is_32_bytes() {
        let p2sh = [0xa9, 0x14, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x87];
        assert_eq!(output_size(&p2sh), P2SH_OUTPUT_SIZE);
        assert_eq!(P2SH_OUTPUT_SIZE, 32);
    }

    #[test]
    fn compact_size_boundaries() {
        assert_eq!(compact_size_len(0xfc), 1);
        assert_eq!(compact_size_len(0xfd), 3);
        assert_eq!(compact_size_len(0xffff), 3);
        assert_eq!(compact_size_len(0x1_0000), 5);
        assert_eq!(compact_size_len(u64::MAX), 9);
    }

    #[test]
    fn fee_rounds_up() {
        assert_eq!(fee_for_size(1182, 1000).expect("fee"), 1182);
        assert_eq!(fee_for_size(1182, 2010).expect("fee"), 2376);
        assert_eq!(fee_for_size(1, 1).expect("fee"), 1);
        assert_eq!(fee_for_size(0, 5000).expect("fee"), 0);
    }

    #[test]
    fn fee_overflow_is_reported() {
        let err = fee_for_size(u64::MAX, u64::MAX).expect_err("must overflow");
        assert!(matches!(err, OfferError::Overflow(_)));
    }

    #[test]
    fn estimated_size_adds_recipient_and_inputs() {
        let inputs = vec![DummyInput::p2pkh(); 2];
        let size = estimated_tx_size(975, &DUMMY_P2PKH_SCRIPT, &inputs).expect("size");
        assert_eq!(size, 975 + 34 + 2 * 141);
    }

    #[test]
    fn estimated_size_grows_input_count_prefix() {
        let below = vec![DummyInput::p2pkh(); 251];
        let above = vec![DummyInput::p2pkh(); 252];
        let small = estimated_tx_size(100, &[], &below).expect("size");
        let large = estimated_tx_size(100, &[], &above).expect("size");
        assert_eq!(large - small, 141 + 2);
    }
}
