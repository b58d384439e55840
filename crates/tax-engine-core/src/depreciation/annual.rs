use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::TaxEngine;
use crate::error::TaxEngineError;
use crate::types::*;
use crate::TaxEngineResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepreciationMethod {
    #[serde(rename = "straight-line", alias = "straight_line")]
    StraightLine,
    #[serde(rename = "reducing-balance", alias = "reducing_balance")]
    ReducingBalance,
}

impl DepreciationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepreciationMethod::StraightLine => "straight-line",
            DepreciationMethod::ReducingBalance => "reducing-balance",
        }
    }
}

impl fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepreciationMethod {
    type Err = TaxEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "straight-line" => Ok(DepreciationMethod::StraightLine),
            "reducing-balance" => Ok(DepreciationMethod::ReducingBalance),
            other => Err(TaxEngineError::invalid(
                "method",
                format!("unknown depreciation method '{other}' (expected straight-line or reducing-balance)"),
            )),
        }
    }
}

/// One asset's depreciation terms. For reducing balance, pass the current
/// book value as `asset_cost` to get the charge for the next period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationPolicy {
    pub asset_cost: Money,
    #[serde(default)]
    pub salvage_value: Money,
    pub useful_life: Years,
    pub method: DepreciationMethod,
    /// Reducing-balance rate in percent; ignored for straight line.
    #[serde(default)]
    pub rate: Percent,
}

impl DepreciationPolicy {
    pub fn depreciable_base(&self) -> Money {
        self.asset_cost - self.salvage_value
    }

    pub fn validate(&self) -> TaxEngineResult<()> {
        require_non_negative("asset_cost", self.asset_cost)?;
        require_non_negative("salvage_value", self.salvage_value)?;
        if self.salvage_value > self.asset_cost {
            return Err(TaxEngineError::invalid(
                "salvage_value",
                "salvage value must not exceed asset cost",
            ));
        }
        match self.method {
            DepreciationMethod::StraightLine => {
                if self.useful_life <= Decimal::ZERO {
                    return Err(TaxEngineError::invalid(
                        "useful_life",
                        "useful life must be greater than zero",
                    ));
                }
            }
            DepreciationMethod::ReducingBalance => {
                if self.rate < Decimal::ZERO || self.rate > dec!(100) {
                    return Err(TaxEngineError::invalid(
                        "rate",
                        "reducing-balance rate must be between 0 and 100",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Charge for a single period.
    pub fn annual_charge(&self) -> TaxEngineResult<Money> {
        self.validate()?;
        match self.method {
            DepreciationMethod::StraightLine => self
                .depreciable_base()
                .checked_div(self.useful_life)
                .map(|charge| charge.normalize())
                .ok_or_else(|| too_large("useful_life")),
            DepreciationMethod::ReducingBalance => {
                percent_of("asset_cost", self.depreciable_base(), self.rate)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualDepreciation {
    pub method: DepreciationMethod,
    pub depreciable_base: Money,
    pub annual_charge: Money,
}

// ---------------------------------------------------------------------------
// Core calculation
// ---------------------------------------------------------------------------

/// One period's depreciation charge. Does not track accumulated
/// depreciation; see [`crate::depreciation::schedule`] for multi-period runs.
pub fn calculate_annual_depreciation(
    asset_cost: Money,
    salvage_value: Money,
    useful_life: Years,
    method: DepreciationMethod,
    rate: Percent,
) -> TaxEngineResult<Money> {
    DepreciationPolicy {
        asset_cost,
        salvage_value,
        useful_life,
        method,
        rate,
    }
    .annual_charge()
}

pub fn compute_depreciation(
    engine: &TaxEngine,
    input: &DepreciationPolicy,
) -> TaxEngineResult<ComputationOutput<AnnualDepreciation>> {
    let annual_charge = input.annual_charge()?;

    let mut warnings = Vec::new();
    if input.depreciable_base().is_zero() {
        warnings.push("Salvage value equals asset cost; nothing to depreciate.".to_string());
    }
    if input.method == DepreciationMethod::ReducingBalance {
        if input.rate.is_zero() {
            warnings.push("Reducing-balance rate is zero; no depreciation is charged.".to_string());
        }
        warnings.push(
            "Reducing-balance charge covers one period only; pass the current book value as \
             asset_cost for later periods."
                .to_string(),
        );
    }

    let assumptions = serde_json::json!({
        "asset_cost": input.asset_cost.to_string(),
        "salvage_value": input.salvage_value.to_string(),
        "useful_life": input.useful_life.to_string(),
        "method": input.method,
        "rate": input.rate.to_string(),
    });

    let methodology = match input.method {
        DepreciationMethod::StraightLine => "Straight line: (cost - salvage) / useful life",
        DepreciationMethod::ReducingBalance => "Reducing balance: (cost - salvage) x rate / 100",
    };

    Ok(with_metadata(
        methodology,
        &assumptions,
        warnings,
        engine.jurisdiction(),
        AnnualDepreciation {
            method: input.method,
            depreciable_base: input.depreciable_base(),
            annual_charge,
        },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line_exact() {
        let charge = calculate_annual_depreciation(
            dec!(10000),
            dec!(1000),
            dec!(9),
            DepreciationMethod::StraightLine,
            dec!(0),
        )
        .unwrap();
        assert_eq!(charge, dec!(1000));
    }

    #[test]
    fn test_straight_line_zero_life_rejected() {
        for life in [dec!(0), dec!(-3)] {
            match calculate_annual_depreciation(
                dec!(10000),
                dec!(1000),
                life,
                DepreciationMethod::StraightLine,
                dec!(0),
            ) {
                Err(TaxEngineError::InvalidInput { field, .. }) => assert_eq!(field, "useful_life"),
                other => panic!("Expected InvalidInput, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_charge_beyond_decimal_range_is_an_error() {
        match calculate_annual_depreciation(
            Decimal::MAX,
            dec!(0),
            dec!(0.001),
            DepreciationMethod::StraightLine,
            dec!(0),
        ) {
            Err(TaxEngineError::InvalidInput { field, .. }) => assert_eq!(field, "useful_life"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_reducing_balance_uses_supplied_rate() {
        let charge = calculate_annual_depreciation(
            dec!(10000),
            dec!(1000),
            dec!(5),
            DepreciationMethod::ReducingBalance,
            dec!(20),
        )
        .unwrap();
        assert_eq!(charge, dec!(1800));
    }

    #[test]
    fn test_reducing_balance_shrinks_with_book_value() {
        let first = calculate_annual_depreciation(
            dec!(10000),
            dec!(1000),
            dec!(5),
            DepreciationMethod::ReducingBalance,
            dec!(20),
        )
        .unwrap();
        let second = calculate_annual_depreciation(
            dec!(10000) - first,
            dec!(1000),
            dec!(5),
            DepreciationMethod::ReducingBalance,
            dec!(20),
        )
        .unwrap();
        assert_eq!(second, dec!(1440));
        assert!(second < first);
    }

    #[test]
    fn test_reducing_balance_ignores_useful_life() {
        assert!(calculate_annual_depreciation(
            dec!(5000),
            dec!(0),
            dec!(0),
            DepreciationMethod::ReducingBalance,
            dec!(25),
        )
        .is_ok());
    }

    #[test]
    fn test_invalid_policies_rejected() {
        let base = DepreciationPolicy {
            asset_cost: dec!(10000),
            salvage_value: dec!(1000),
            useful_life: dec!(5),
            method: DepreciationMethod::ReducingBalance,
            rate: dec!(20),
        };
        let cases = [
            DepreciationPolicy { asset_cost: dec!(-1), ..base.clone() },
            DepreciationPolicy { salvage_value: dec!(-1), ..base.clone() },
            DepreciationPolicy { salvage_value: dec!(20000), ..base.clone() },
            DepreciationPolicy { rate: dec!(-5), ..base.clone() },
            DepreciationPolicy { rate: dec!(150), ..base.clone() },
        ];
        for policy in cases {
            assert!(policy.annual_charge().is_err(), "expected rejection: {:?}", policy);
        }
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            "straight-line".parse::<DepreciationMethod>().unwrap(),
            DepreciationMethod::StraightLine
        );
        assert_eq!(
            "Reducing_Balance".parse::<DepreciationMethod>().unwrap(),
            DepreciationMethod::ReducingBalance
        );
        match "sum-of-years".parse::<DepreciationMethod>() {
            Err(TaxEngineError::InvalidInput { field, .. }) => assert_eq!(field, "method"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_method_serde_names() {
        let policy: DepreciationPolicy = serde_json::from_str(
            r#"{ "asset_cost": "10000", "useful_life": "9", "method": "straight_line" }"#,
        )
        .unwrap();
        assert_eq!(policy.method, DepreciationMethod::StraightLine);
        assert_eq!(policy.salvage_value, dec!(0));
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["method"], "straight-line");
        assert!(serde_json::from_str::<DepreciationPolicy>(
            r#"{ "asset_cost": "1", "useful_life": "1", "method": "double-declining" }"#
        )
        .is_err());
    }

    #[test]
    fn test_envelope_reducing_balance_warnings() {
        let policy = DepreciationPolicy {
            asset_cost: dec!(8000),
            salvage_value: dec!(0),
            useful_life: dec!(4),
            method: DepreciationMethod::ReducingBalance,
            rate: dec!(0),
        };
        let output = compute_depreciation(&TaxEngine::default(), &policy).unwrap();
        assert_eq!(output.result.annual_charge, dec!(0));
        assert!(output.warnings.iter().any(|w| w.contains("rate is zero")));
        assert!(output.warnings.iter().any(|w| w.contains("one period")));
    }
}
