//! Fixed-point amounts
//!
//! Ledger amounts are signed 64-bit integers of stroops, with 1 unit of an
//! asset equal to 10^7 stroops. Decimal strings are accepted only if they
//! convert exactly; digits `rust_decimal` would have to round away are an
//! error.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

pub const STROOPS_PER_UNIT: i64 = 10_000_000;
const MAX_DECIMALS: u32 = 7;

/// Parse a positive decimal amount into stroops
///
/// # Returns
/// * `Ok(stroops)` for amounts like `"100.5"` or `"0.0000001"`
/// * `Err(reason)` if the amount is malformed, not positive, has more than
///   7 fractional digits or does not fit in an `i64`
pub fn parse_amount(amount: &str) -> Result<i64, String> {
    let well_formed = !amount.is_empty()
        && amount.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-')
        && amount.chars().any(|c| c.is_ascii_digit());
    if !well_formed {
        return Err("not a decimal number".to_string());
    }

    let value = Decimal::from_str_exact(amount).map_err(|e| e.to_string())?;
    if value <= Decimal::ZERO {
        return Err("amount must be positive".to_string());
    }

    let value = value.normalize();
    if value.scale() > MAX_DECIMALS {
        return Err(format!("more than {} decimal places", MAX_DECIMALS));
    }

    value
        .checked_mul(Decimal::from(STROOPS_PER_UNIT))
        .and_then(|stroops| stroops.to_i64())
        .ok_or_else(|| "amount too large".to_string())
}
