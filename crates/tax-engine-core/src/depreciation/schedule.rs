use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::depreciation::annual::{DepreciationMethod, DepreciationPolicy};
use crate::engine::TaxEngine;
use crate::error::TaxEngineError;
use crate::types::*;
use crate::TaxEngineResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    pub opening_book_value: Money,
    pub charge: Money,
    pub accumulated_depreciation: Money,
    pub closing_book_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub method: DepreciationMethod,
    pub rows: Vec<ScheduleRow>,
    pub total_depreciation: Money,
    pub final_book_value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationScheduleInput {
    #[serde(flatten)]
    pub policy: DepreciationPolicy,
    /// Defaults to the useful life rounded up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<u32>,
}

/// Number of periods implied by the useful life, rounded up.
pub fn default_periods(policy: &DepreciationPolicy) -> TaxEngineResult<u32> {
    if policy.useful_life <= Decimal::ZERO {
        return Err(TaxEngineError::invalid(
            "periods",
            "periods must be given when useful life is not positive",
        ));
    }
    policy.useful_life.ceil().to_u32().ok_or_else(|| {
        TaxEngineError::invalid("useful_life", "useful life is too large for a schedule")
    })
}

/// Thread the closing book value of each period into the next period's
/// single-period charge. Book value never falls below salvage.
///
/// Straight line keeps the original base, so the charge is constant and the
/// period that reaches the end of the useful life takes up any residue from
/// inexact division. Reducing balance re-bases on the current book value.
pub fn build_depreciation_schedule(
    policy: &DepreciationPolicy,
    periods: u32,
) -> TaxEngineResult<DepreciationSchedule> {
    if periods == 0 {
        return Err(TaxEngineError::invalid("periods", "periods must be at least 1"));
    }
    let straight_line_charge = policy.annual_charge()?;

    let mut rows = Vec::with_capacity(periods as usize);
    let mut book_value = policy.asset_cost;
    let mut accumulated = Decimal::ZERO;

    for period in 1..=periods {
        let headroom = book_value - policy.salvage_value;
        let charge = match policy.method {
            DepreciationMethod::StraightLine => {
                if Decimal::from(period) == policy.useful_life {
                    headroom
                } else {
                    straight_line_charge.min(headroom)
                }
            }
            DepreciationMethod::ReducingBalance => DepreciationPolicy {
                asset_cost: book_value,
                ..policy.clone()
            }
            .annual_charge()?
            .min(headroom),
        };

        let opening_book_value = book_value;
        book_value -= charge;
        accumulated += charge;
        rows.push(ScheduleRow {
            period,
            opening_book_value,
            charge,
            accumulated_depreciation: accumulated,
            closing_book_value: book_value,
        });
    }

    Ok(DepreciationSchedule {
        method: policy.method,
        rows,
        total_depreciation: accumulated,
        final_book_value: book_value,
    })
}

pub fn compute_depreciation_schedule(
    engine: &TaxEngine,
    input: &DepreciationScheduleInput,
) -> TaxEngineResult<ComputationOutput<DepreciationSchedule>> {
    let periods = match input.periods {
        Some(p) => p,
        None => default_periods(&input.policy)?,
    };
    let result = build_depreciation_schedule(&input.policy, periods)?;

    let mut warnings = Vec::new();
    if input.policy.method == DepreciationMethod::ReducingBalance
        && result.final_book_value > input.policy.salvage_value
    {
        warnings.push(format!(
            "Book value {} remains above salvage after {} periods.",
            result.final_book_value, periods
        ));
    }
    if result.rows.iter().any(|r| r.charge.is_zero()) {
        warnings.push("Some periods carry no charge; the asset is fully depreciated.".to_string());
    }

    let assumptions = serde_json::json!({
        "asset_cost": input.policy.asset_cost.to_string(),
        "salvage_value": input.policy.salvage_value.to_string(),
        "useful_life": input.policy.useful_life.to_string(),
        "method": input.policy.method,
        "rate": input.policy.rate.to_string(),
        "periods": periods,
    });

    Ok(with_metadata(
        "Multi-period schedule from repeated single-period charges on the running book value",
        &assumptions,
        warnings,
        engine.jurisdiction(),
        result,
    ))
}
