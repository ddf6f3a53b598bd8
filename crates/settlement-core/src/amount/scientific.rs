use std::sync::LazyLock;

use regex::Regex;

use crate::amount::decimals::strip_leading_zeros;
use crate::error::AmountError;

/// Upper bound on the zero padding produced from an exponent.
///
/// Atoms never exceed a few dozen digits; anything larger is a malformed input
/// rather than an amount.
const MAX_SCIENTIFIC_EXPONENT: i64 = 1_024;

static SCIENTIFIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?<mantissa>[0-9]*\.?[0-9]+)e(?<exponent>[+-]?[0-9]+)$")
        .unwrap_or_else(|e| unreachable!("scientific notation pattern is valid: {e}"))
});

struct ScientificParts<'a> {
    mantissa: &'a str,
    exponent: &'a str,
}

fn split_scientific(input: &str) -> Option<ScientificParts<'_>> {
    let captures = SCIENTIFIC_RE.captures(input)?;
    Some(ScientificParts {
        mantissa: captures.name("mantissa")?.as_str(),
        exponent: captures.name("exponent")?.as_str(),
    })
}

/// Whether `input` is a non-negative number written in scientific notation.
#[must_use]
pub fn is_scientific(input: &str) -> bool {
    split_scientific(input).is_some()
}

/// Expand a scientific notation string like `1.5e3` into the integer string `1500`.
///
/// Only integer-valued results are supported: a negative exponent fails with
/// [`AmountError::NegativeExponent`] and a mantissa with more fractional digits
/// than the exponent absorbs fails with [`AmountError::NonIntegerResult`].
///
/// The result is a canonical integer: leading zeros are stripped, so `0.05e2`
/// yields `5` rather than `05`, and an all-zero mantissa yields `0`.
pub fn normalize_scientific(input: &str) -> Result<String, AmountError> {
    let parts =
        split_scientific(input).ok_or_else(|| AmountError::InvalidScientific(input.to_string()))?;

    let mantissa = strip_leading_zeros(parts.mantissa);
    let mantissa_decimal_places = mantissa
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len());
    let mantissa_digits = mantissa.replace('.', "");

    let exponent: i64 = parts
        .exponent
        .parse()
        .map_err(|_| AmountError::Overflow(format!("exponent out of range in '{input}'")))?;
    if exponent < 0 {
        return Err(AmountError::NegativeExponent(input.to_string()));
    }

    let effective_exponent = exponent
        - i64::try_from(mantissa_decimal_places)
            .map_err(|_| AmountError::Overflow(format!("mantissa too long in '{input}'")))?;
    if effective_exponent < 0 {
        return Err(AmountError::NonIntegerResult(input.to_string()));
    }

    if mantissa_digits.bytes().all(|b| b == b'0') {
        return Ok("0".to_string());
    }

    if effective_exponent > MAX_SCIENTIFIC_EXPONENT {
        return Err(AmountError::Overflow(format!(
            "exponent of '{input}' exceeds {MAX_SCIENTIFIC_EXPONENT}"
        )));
    }
    let padding = usize::try_from(effective_exponent)
        .map_err(|_| AmountError::Overflow(format!("exponent out of range in '{input}'")))?;

    let mut normalized = strip_leading_zeros(&mantissa_digits).to_string();
    normalized.push_str(&"0".repeat(padding));
    Ok(normalized)
}

/// Parse an atoms string, accepting scientific notation, into an integer.
pub fn atoms_from_str(input: &str) -> Result<u64, AmountError> {
    let normalized = if is_scientific(input) {
        normalize_scientific(input)?
    } else {
        input.to_string()
    };

    if normalized.is_empty() || !normalized.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidAtoms(input.to_string()));
    }

    normalized
        .parse::<u64>()
        .map_err(|_| AmountError::Overflow(format!("'{input}' does not fit into 64 bits")))
}
