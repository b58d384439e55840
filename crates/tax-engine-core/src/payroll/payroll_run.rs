use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollConfig;
use crate::engine::TaxEngine;
use crate::error::TaxEngineError;
use crate::payroll::paye::{calculate_payroll_taxes, PayrollTaxResult};
use crate::types::*;
use crate::TaxEngineResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollEntry {
    pub employee: String,
    pub gross_salary: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    pub entries: Vec<PayrollEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipLine {
    pub employee: String,
    #[serde(flatten)]
    pub payroll: PayrollTaxResult,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollTotals {
    pub headcount: usize,
    pub gross_salary: Money,
    pub employee_ssnit: Money,
    pub employer_ssnit: Money,
    pub paye_tax: Money,
    pub net_salary: Money,
    pub total_employer_cost: Money,
}

impl PayrollTotals {
    fn add(&mut self, payroll: &PayrollTaxResult) -> TaxEngineResult<()> {
        let sum = |total: Money, part: Money| checked_sum("entries", &[total, part]);
        self.gross_salary = sum(self.gross_salary, payroll.gross_salary)?;
        self.employee_ssnit = sum(self.employee_ssnit, payroll.employee_ssnit)?;
        self.employer_ssnit = sum(self.employer_ssnit, payroll.employer_ssnit)?;
        self.paye_tax = sum(self.paye_tax, payroll.paye_tax)?;
        self.net_salary = sum(self.net_salary, payroll.net_salary)?;
        self.total_employer_cost = sum(self.total_employer_cost, payroll.employer_cost())?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRunResult {
    pub payslips: Vec<PayslipLine>,
    pub totals: PayrollTotals,
}

/// Run every employee through the payroll calculation and total the
/// remittances. Any invalid entry fails the whole run.
pub fn calculate_payroll_run(
    config: &PayrollConfig,
    entries: &[PayrollEntry],
) -> TaxEngineResult<PayrollRunResult> {
    if entries.is_empty() {
        return Err(TaxEngineError::InsufficientData(
            "Payroll run must contain at least one employee".to_string(),
        ));
    }

    let mut payslips = Vec::with_capacity(entries.len());
    let mut totals = PayrollTotals {
        headcount: entries.len(),
        ..PayrollTotals::default()
    };

    for entry in entries {
        let payroll = calculate_payroll_taxes(config, entry.gross_salary).map_err(|e| match e {
            TaxEngineError::InvalidInput { field, reason } => TaxEngineError::InvalidInput {
                field,
                reason: format!("{} ({})", reason, entry.employee),
            },
            other => other,
        })?;

        totals.add(&payroll)?;

        payslips.push(PayslipLine {
            employee: entry.employee.clone(),
            payroll,
        });
    }

    Ok(PayrollRunResult { payslips, totals })
}

pub fn compute_payroll_run(
    engine: &TaxEngine,
    input: &PayrollRunInput,
) -> TaxEngineResult<ComputationOutput<PayrollRunResult>> {
    let result = calculate_payroll_run(&engine.config().payroll, &input.entries)?;

    let mut warnings = Vec::new();
    let mut seen = std::collections::BTreeSet::new();
    for entry in &input.entries {
        if !seen.insert(entry.employee.as_str()) {
            warnings.push(format!("Employee '{}' appears more than once.", entry.employee));
        }
    }
    if result.totals.paye_tax == Decimal::ZERO {
        warnings.push("No PAYE is due for any employee in this run.".to_string());
    }

    let assumptions = serde_json::json!({
        "period": input.period,
        "headcount": input.entries.len(),
        "employee_ssnit_rate": engine.config().payroll.employee_ssnit_rate.to_string(),
        "employer_ssnit_rate": engine.config().payroll.employer_ssnit_rate.to_string(),
    });

    Ok(with_metadata(
        "Per-employee PAYE and SSNIT, summed into period remittance totals",
        &assumptions,
        warnings,
        engine.jurisdiction(),
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(name: &str, gross: Money) -> PayrollEntry {
        PayrollEntry {
            employee: name.to_string(),
            gross_salary: gross,
        }
    }

    #[test]
    fn test_totals_match_payslips() {
        let entries = vec![entry("Ama", dec!(300)), entry("Kofi", dec!(5000)), entry("Esi", dec!(100000))];
        let run = calculate_payroll_run(&PayrollConfig::ghana(), &entries).unwrap();

        assert_eq!(run.totals.headcount, 3);
        assert_eq!(run.totals.gross_salary, dec!(105300));
        assert_eq!(run.totals.paye_tax, dec!(0) + dec!(814.25) + dec!(29206.15));
        let net: Money = run.payslips.iter().map(|p| p.payroll.net_salary).sum();
        assert_eq!(run.totals.net_salary, net);
        assert_eq!(
            run.totals.total_employer_cost,
            run.totals.gross_salary + run.totals.employer_ssnit
        );
    }

    #[test]
    fn test_empty_run_rejected() {
        assert!(matches!(
            calculate_payroll_run(&PayrollConfig::ghana(), &[]),
            Err(TaxEngineError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_invalid_entry_names_employee() {
        let entries = vec![entry("Ama", dec!(300)), entry("Yaw", dec!(-1))];
        match calculate_payroll_run(&PayrollConfig::ghana(), &entries) {
            Err(TaxEngineError::InvalidInput { field, reason }) => {
                assert_eq!(field, "gross_salary");
                assert!(reason.contains("Yaw"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_run_totals_overflow_is_an_error() {
        let gross = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let entries: Vec<PayrollEntry> = (0..80).map(|i| entry(&format!("E{i}"), gross)).collect();
        match calculate_payroll_run(&PayrollConfig::ghana(), &entries) {
            Err(TaxEngineError::InvalidInput { field, .. }) => assert_eq!(field, "entries"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_employee_warning() {
        let input = PayrollRunInput {
            period: Some("2024-03".to_string()),
            entries: vec![entry("Ama", dec!(300)), entry("Ama", dec!(350))],
        };
        let output = compute_payroll_run(&TaxEngine::default(), &input).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("more than once")));
        assert!(output.warnings.iter().any(|w| w.contains("No PAYE")));
    }
}
