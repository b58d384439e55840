use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;
use crate::TaxEngineResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as percentages (12.5 = 12.5%). Applied as `amount * rate / 100`.
pub type Percent = Decimal;

/// Useful lives and other period counts that may be fractional
pub type Years = Decimal;

/// Decimal places used when rounding for display.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// `amount * rate / 100`, unrounded and without trailing zeros.
/// A product too large for a `Decimal` is reported against `field`.
pub fn percent_of(field: &str, amount: Money, rate: Percent) -> TaxEngineResult<Money> {
    amount
        .checked_mul(rate)
        .and_then(|scaled| scaled.checked_div(dec!(100)))
        .map(|value| value.normalize())
        .ok_or_else(|| too_large(field))
}

/// Exact sum of `parts`, failing against `field` on overflow.
pub(crate) fn checked_sum(field: &str, parts: &[Money]) -> TaxEngineResult<Money> {
    parts
        .iter()
        .try_fold(Decimal::ZERO, |acc, part| acc.checked_add(*part))
        .map(|value| value.normalize())
        .ok_or_else(|| too_large(field))
}

pub(crate) fn too_large(field: &str) -> TaxEngineError {
    TaxEngineError::invalid(field, "value is too large to calculate exactly")
}

/// Round a figure for presentation. The engine never calls this on its own
/// intermediate values.
pub fn round_money(value: Money, dp: u32) -> Money {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn require_non_negative(field: &str, value: Decimal) -> TaxEngineResult<()> {
    if value < Decimal::ZERO {
        return Err(TaxEngineError::invalid(field, "must not be negative"));
    }
    Ok(())
}

/// Standard computation output envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation. Carries no timing or timestamps:
/// identical inputs serialise to identical envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
    pub jurisdiction: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    jurisdiction: &str,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
            jurisdiction: jurisdiction.to_string(),
        },
    }
}
