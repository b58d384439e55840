use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{BracketWidth, PayrollConfig};
use crate::engine::TaxEngine;
use crate::types::*;
use crate::TaxEngineResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Tax charged inside one bracket of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTax {
    /// 1-based position in the schedule
    pub bracket: usize,
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub width: BracketWidth,
    pub rate: Percent,
    pub taxed_amount: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollTaxResult {
    pub gross_salary: Money,
    pub employee_ssnit: Money,
    pub employer_ssnit: Money,
    pub taxable_income: Money,
    pub paye_tax: Money,
    pub net_salary: Money,
    pub bracket_breakdown: Vec<BracketTax>,
}

impl PayrollTaxResult {
    /// Gross salary plus the employer's social security share.
    pub fn employer_cost(&self) -> Money {
        self.gross_salary + self.employer_ssnit
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollInput {
    pub gross_salary: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,
}

// ---------------------------------------------------------------------------
// Core calculation
// ---------------------------------------------------------------------------

/// Walk the graduated schedule in declared order, taxing at most each
/// bracket's width before spilling the rest into the next bracket.
pub fn graduated_tax(
    config: &PayrollConfig,
    taxable_income: Money,
) -> TaxEngineResult<(Money, Vec<BracketTax>)> {
    let mut remaining = taxable_income;
    let mut total = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for (i, bracket) in config.brackets.iter().enumerate() {
        if remaining <= Decimal::ZERO {
            break;
        }
        let taxed_amount = bracket.width.take(remaining);
        let tax = percent_of("gross_salary", taxed_amount, bracket.rate)?;
        total = checked_sum("gross_salary", &[total, tax])?;
        remaining -= taxed_amount;
        breakdown.push(BracketTax {
            bracket: i + 1,
            width: bracket.width,
            rate: bracket.rate,
            taxed_amount,
            tax,
        });
    }

    Ok((total, breakdown))
}

/// SSNIT split, PAYE on income net of the employee's share, and net pay.
pub fn calculate_payroll_taxes(
    config: &PayrollConfig,
    gross_salary: Money,
) -> TaxEngineResult<PayrollTaxResult> {
    require_non_negative("gross_salary", gross_salary)?;

    let employee_ssnit = percent_of("gross_salary", gross_salary, config.employee_ssnit_rate)?;
    let employer_ssnit = percent_of("gross_salary", gross_salary, config.employer_ssnit_rate)?;
    // Keeps employer_cost() in range.
    checked_sum("gross_salary", &[gross_salary, employer_ssnit])?;
    let taxable_income = gross_salary - employee_ssnit;
    let (paye_tax, bracket_breakdown) = graduated_tax(config, taxable_income)?;

    Ok(PayrollTaxResult {
        gross_salary,
        employee_ssnit,
        employer_ssnit,
        taxable_income,
        paye_tax,
        net_salary: gross_salary - employee_ssnit - paye_tax,
        bracket_breakdown,
    })
}

pub fn compute_payroll(
    engine: &TaxEngine,
    input: &PayrollInput,
) -> TaxEngineResult<ComputationOutput<PayrollTaxResult>> {
    let config = &engine.config().payroll;
    let result = calculate_payroll_taxes(config, input.gross_salary)?;

    let mut warnings = Vec::new();
    if !input.gross_salary.is_zero() && result.taxable_income <= config.tax_free_threshold() {
        warnings.push(format!(
            "Taxable income {} falls entirely inside the tax-free band of {}; no PAYE due.",
            result.taxable_income,
            config.tax_free_threshold()
        ));
    }

    let assumptions = serde_json::json!({
        "employee": input.employee,
        "gross_salary": input.gross_salary.to_string(),
        "employee_ssnit_rate": config.employee_ssnit_rate.to_string(),
        "employer_ssnit_rate": config.employer_ssnit_rate.to_string(),
        "bracket_count": config.brackets.len(),
    });

    Ok(with_metadata(
        "Graduated PAYE on gross less employee SSNIT; brackets consumed in declared order",
        &assumptions,
        warnings,
        engine.jurisdiction(),
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
