use std::sync::LazyLock;

use regex::Regex;

use crate::amount::scientific::{is_scientific, normalize_scientific};
use crate::error::AmountError;

/// Highest decimal count a token can be created with.
pub const MAX_TOKEN_DECIMALS: u8 = 9;

static DECIMALIZED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<whole>[0-9]*)(?:\.(?<fraction>[0-9]*))?$")
        .unwrap_or_else(|e| unreachable!("decimalized amount pattern is valid: {e}"))
});

fn check_decimals(decimals: u8) -> Result<usize, AmountError> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(AmountError::InvalidDecimals(decimals));
    }
    Ok(usize::from(decimals))
}

/// Remove leading `'0'` characters, always leaving at least one character.
///
/// `"000"` becomes `"0"`, `"0012"` becomes `"12"` and `"0.5"` becomes `".5"`.
#[must_use]
pub fn strip_leading_zeros(value: &str) -> &str {
    let Some(last) = value.len().checked_sub(1) else {
        return value;
    };
    let leading = value.as_bytes()[..last]
        .iter()
        .take_while(|b| **b == b'0')
        .count();
    &value[leading..]
}

/// Convert an atoms string into a decimalized amount, e.g. `10012345` at 5 decimals is `100.12345`.
///
/// Scientific notation input is expanded first. This direction never loses precision.
pub fn decimalize(atoms: &str, decimals: u8) -> Result<String, AmountError> {
    let scale = check_decimals(decimals)?;

    let atoms = if is_scientific(atoms) {
        normalize_scientific(atoms)?
    } else {
        atoms.to_string()
    };
    if atoms.is_empty() || !atoms.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidAtoms(atoms));
    }

    if scale == 0 {
        return Ok(atoms);
    }

    // Keep one digit ahead of the point so sub-unity amounts read `0.005`, not `.005`.
    let padded = if atoms.len() <= scale {
        format!("{atoms:0>width$}", width = scale + 1)
    } else {
        atoms
    };

    let (whole, fraction) = padded.split_at(padded.len() - scale);
    Ok(format!("{whole}.{fraction}"))
}

/// Convert a decimalized amount into atoms, e.g. `100.12345` at 5 decimals is `10012345`.
///
/// Fails with [`AmountError::PrecisionExceeded`] when `amount` carries more
/// fractional digits than `decimals`; the amount is never truncated.
///
/// `amount` must hold at least one digit: `""` and a lone `"."` are rejected
/// with [`AmountError::InvalidDecimalized`] instead of being read as zero.
pub fn undecimalize(amount: &str, decimals: u8) -> Result<String, AmountError> {
    let scale = check_decimals(decimals)?;

    let captures = DECIMALIZED_RE
        .captures(amount)
        .ok_or_else(|| AmountError::InvalidDecimalized(amount.to_string()))?;
    let whole = captures.name("whole").map_or("", |m| m.as_str());
    let fraction = captures.name("fraction").map(|m| m.as_str());
    if whole.is_empty() && fraction.is_none_or(str::is_empty) {
        return Err(AmountError::InvalidDecimalized(amount.to_string()));
    }

    let accounted_decimals = fraction.map_or(0, str::len);

    if scale == 0 {
        return match fraction {
            None => Ok(amount.to_string()),
            Some("") => Ok(whole.to_string()),
            Some(_) => Err(AmountError::PrecisionExceeded { decimals: 0 }),
        };
    }

    if accounted_decimals > scale {
        return Err(AmountError::PrecisionExceeded { decimals });
    }

    let joined = format!("{whole}{}", fraction.unwrap_or_default());
    let mut atoms = strip_leading_zeros(&joined).to_string();
    atoms.push_str(&"0".repeat(scale - accounted_decimals));
    Ok(atoms)
}
