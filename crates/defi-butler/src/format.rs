//! Amount Formatting
//!
//! Two display paths exist for on-chain integers and they round differently:
//!
//! - [`format_token_amount`] truncates at the token's decimals and trims zeros
//! - [`to_units`] + [`fixed`] produce the fixed 6-place figures of the balance report
//!
//! Both are kept as-is; the balance report rounds, the token formatter never does.

use alloy_primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ButlerError, Result};

/// Formatted strings longer than this switch to exponential notation
const MAX_PLAIN_LEN: usize = 10;

/// Format a raw token amount with `decimals` places, truncating (never rounding).
///
/// ```
/// use alloy_primitives::U256;
/// use defi_butler::format::format_token_amount;
///
/// assert_eq!(format_token_amount(U256::from(8_000_000u64), 6), "8");
/// assert_eq!(format_token_amount(U256::from(1_500_000u64), 6), "1.5");
/// ```
pub fn format_token_amount(raw: U256, decimals: u8) -> String {
    let divisor = U256::from(10u8).pow(U256::from(decimals));
    let (integer, fraction) = raw.div_rem(divisor);

    let mut formatted = integer.to_string();
    if !fraction.is_zero() {
        let padded = format!("{:0>width$}", fraction.to_string(), width = usize::from(decimals));
        let trimmed = padded.trim_end_matches('0');
        if !trimmed.is_empty() {
            formatted.push('.');
            formatted.push_str(trimmed);
        }
    }

    if formatted.len() > MAX_PLAIN_LEN {
        return to_exponential(&formatted);
    }
    formatted
}

/// Exponential form with 6 fractional digits and an explicit exponent sign, e.g. `1.234568e+10`
fn to_exponential(plain: &str) -> String {
    // Display-only fallback; precision loss past f64 is acceptable here
    let value = plain.parse::<f64>().unwrap_or(f64::INFINITY);
    let rendered = format!("{value:.6e}");
    match rendered.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => rendered,
    }
}

/// Convert a raw on-chain integer into a decimal amount of whole units
pub fn to_units(raw: U256, decimals: u8) -> Result<Decimal> {
    let mantissa = u128::try_from(raw)
        .ok()
        .and_then(|v| i128::try_from(v).ok())
        .ok_or_else(|| ButlerError::AmountOutOfRange(raw.to_string()))?;

    Decimal::try_from_i128_with_scale(mantissa, u32::from(decimals))
        .map(|d| d.normalize())
        .map_err(|e| ButlerError::AmountOutOfRange(format!("{raw} / 10^{decimals}: {e}")))
}

/// Convert whole units (e.g. ETH) into the raw integer (e.g. wei)
pub fn from_units(amount: Decimal, decimals: u8) -> Result<U256> {
    let scaled = amount
        .checked_mul(Decimal::from(10u64.pow(u32::from(decimals.min(19)))))
        .ok_or_else(|| ButlerError::AmountOutOfRange(amount.to_string()))?;
    let extra = decimals.saturating_sub(19);

    let raw = scaled
        .trunc()
        .to_u128()
        .ok_or_else(|| ButlerError::AmountOutOfRange(amount.to_string()))?;

    Ok(U256::from(raw) * U256::from(10u8).pow(U256::from(extra)))
}

/// Fixed-point rendering with half-away-from-zero rounding, e.g. `fixed(dec!(0.5), 6) == "0.500000"`
pub fn fixed(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.prec$}", prec = places as usize)
}
