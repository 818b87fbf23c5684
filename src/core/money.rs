//! Fixed-point money helpers.
//!
//! Every amount in the ledger is an `i64` count of minor units (cents). Floating
//! point never enters the engine: user input is parsed straight into minor units
//! and only turned back into text at the display boundary.

use crate::errors::{Error, Result};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::str::FromStr;

/// Number of minor units in one major unit.
pub const MINOR_PER_MAJOR: i64 = 100;

/// Parses a decimal amount such as `"12"`, `"12.5"` or `"1,200.00"` into minor units.
///
/// Thousands separators are ignored. More than two fractional digits, a negative
/// sign, or anything that is not a plain decimal is rejected rather than rounded.
pub fn parse_amount(input: &str) -> Result<i64> {
    let cleaned = input.trim().replace(',', "");
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(Error::validation(
            "amount",
            format!("'{input}' is not a decimal amount"),
        ));
    }
    let cleaned = if cleaned.starts_with('.') {
        format!("0{cleaned}")
    } else {
        cleaned
    };

    let value = Decimal::from_str(&cleaned).map_err(|_| {
        Error::validation("amount", format!("'{input}' is not a decimal amount"))
    })?;
    if value.is_sign_negative() {
        return Err(Error::validation(
            "amount",
            format!("'{input}' cannot be negative"),
        ));
    }
    if value.scale() > 2 {
        return Err(Error::validation(
            "amount",
            format!("'{input}' has more than two decimal places"),
        ));
    }

    value
        .checked_mul(Decimal::from(MINOR_PER_MAJOR))
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| Error::validation("amount", format!("'{input}' is too large")))
}

/// Formats minor units as a plain decimal string, e.g. `-1234` becomes `"-12.34"`.
#[must_use]
pub fn format_amount(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let per = MINOR_PER_MAJOR.unsigned_abs();
    format!("{sign}{}.{:02}", abs / per, abs % per)
}

/// Multiplies a unit price by a quantity, failing on overflow.
pub fn line_total(unit_price: i64, quantity: i64) -> Result<i64> {
    unit_price
        .checked_mul(quantity)
        .ok_or_else(|| Error::validation("line_items", "line total overflows"))
}
