//! Utility functions for the intents core
//!
//! Amount normalization between raw chain integers and decimals, plus small
//! string helpers shared by the catalog and the aggregator.

use rust_decimal::Decimal;

use crate::shared::constants::{MAX_TOKEN_DECIMALS, POOL_ASSET_PREFIX};
use crate::shared::error::IntentsError;
use crate::shared::types::RawAmount;

/// Largest mantissa a `Decimal` can hold (2^96 - 1)
const MAX_DECIMAL_MANTISSA: u128 = 79_228_162_514_264_337_593_543_950_335;

/// Generate a unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Convert a raw integer chain amount to a decimal: `raw / 10^decimals`.
///
/// Exact whenever the raw value fits in 96 bits. Larger values lose their
/// least significant fractional digits, never integer digits.
pub fn normalize_raw(raw: RawAmount, decimals: u32) -> Result<Decimal, IntentsError> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(IntentsError::validation(format!(
            "Token decimals {} exceed the supported maximum of {}",
            decimals, MAX_TOKEN_DECIMALS
        )));
    }

    let mut mantissa = raw;
    let mut scale = decimals;
    while mantissa > MAX_DECIMAL_MANTISSA {
        if scale == 0 {
            return Err(IntentsError::validation(format!(
                "Raw amount {} is out of range",
                raw
            )));
        }
        mantissa /= 10;
        scale -= 1;
    }

    Decimal::try_from_i128_with_scale(mantissa as i128, scale).map_err(IntentsError::from)
}

/// Convert a decimal amount back to raw chain units, truncating sub-unit digits
pub fn denormalize(amount: Decimal, decimals: u32) -> Result<RawAmount, IntentsError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(IntentsError::validation("Amount cannot be negative"));
    }

    let mantissa = amount.mantissa();
    let scale = amount.scale();
    let raw = if scale <= decimals {
        10i128
            .checked_pow(decimals - scale)
            .and_then(|factor| mantissa.checked_mul(factor))
            .ok_or_else(|| IntentsError::validation(format!("Amount {} overflows raw units", amount)))?
    } else {
        mantissa / 10i128.pow(scale - decimals)
    };

    u128::try_from(raw).map_err(|_| IntentsError::validation("Amount cannot be negative"))
}

/// Divide an already-decimal value by `10^decimals`
pub fn shift_decimals(value: Decimal, decimals: u32) -> Result<Decimal, IntentsError> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(IntentsError::validation(format!(
            "Token decimals {} exceed the supported maximum of {}",
            decimals, MAX_TOKEN_DECIMALS
        )));
    }

    let mut shifted = value;
    if shifted.scale() + decimals <= MAX_TOKEN_DECIMALS {
        shifted.set_scale(shifted.scale() + decimals)?;
        return Ok(shifted);
    }

    let divisor = Decimal::try_from_i128_with_scale(10i128.pow(decimals), 0)?;
    value
        .checked_div(divisor)
        .ok_or_else(|| IntentsError::validation(format!("Cannot scale {} by 10^{}", value, decimals)))
}

/// Clamp a computed amount to zero
pub fn clamp_non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Strip the pool namespace prefix from an asset id for display
pub fn display_asset_id(asset_id: &str) -> &str {
    asset_id.strip_prefix(POOL_ASSET_PREFIX).unwrap_or(asset_id)
}

/// Parse a raw integer amount as returned by indexers and RPC views
pub fn parse_raw_amount(raw: &str) -> Result<RawAmount, IntentsError> {
    raw.trim()
        .parse::<u128>()
        .map_err(|_| IntentsError::validation(format!("Invalid raw amount: {}", raw)))
}
