use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{TaxRateTable, WithholdingCategory};
use crate::engine::TaxEngine;
use crate::error::TaxEngineError;
use crate::types::*;
use crate::TaxEngineResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Itemised consumption-tax breakdown for one taxable amount. Figures are
/// unrounded; use [`TaxBreakdown::rounded`] for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub subtotal: Money,
    pub vat: Money,
    pub nhil: Money,
    pub getfl: Money,
    pub covid: Money,
    pub total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withholding_category: Option<WithholdingCategory>,
    /// Withheld by the payer. Informational only, never subtracted from `total`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withholding_tax: Option<Money>,
}

impl TaxBreakdown {
    pub fn total_levies(&self) -> Money {
        self.vat + self.nhil + self.getfl + self.covid
    }

    /// Levies as a percentage of the subtotal; zero for a zero subtotal.
    pub fn effective_rate(&self) -> Percent {
        if self.subtotal.is_zero() {
            return Decimal::ZERO;
        }
        self.total_levies() / self.subtotal * dec!(100)
    }

    /// Presentation copy with every figure rounded to `dp` places.
    pub fn rounded(&self, dp: u32) -> TaxBreakdown {
        TaxBreakdown {
            subtotal: round_money(self.subtotal, dp),
            vat: round_money(self.vat, dp),
            nhil: round_money(self.nhil, dp),
            getfl: round_money(self.getfl, dp),
            covid: round_money(self.covid, dp),
            total: round_money(self.total, dp),
            withholding_category: self.withholding_category,
            withholding_tax: self.withholding_tax.map(|w| round_money(w, dp)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxInput {
    pub amount: Money,
    #[serde(default)]
    pub include_withholding: bool,
    #[serde(default)]
    pub withholding_category: WithholdingCategory,
}

/// Input for backing the levies out of a tax-inclusive figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractInput {
    pub gross_total: Money,
    #[serde(default)]
    pub include_withholding: bool,
    #[serde(default)]
    pub withholding_category: WithholdingCategory,
}

// ---------------------------------------------------------------------------
// Core calculations
// ---------------------------------------------------------------------------

/// Layer VAT, NHIL, GETFL and COVID on a taxable subtotal.
pub fn calculate_taxes(
    rates: &TaxRateTable,
    amount: Money,
    include_withholding: bool,
    category: WithholdingCategory,
) -> TaxEngineResult<TaxBreakdown> {
    require_non_negative("amount", amount)?;

    // Resolve before computing anything so a bad category fails atomically.
    let withholding_rate = if include_withholding {
        Some(rates.withholding_rate(category)?)
    } else {
        None
    };

    let vat = percent_of("amount", amount, rates.vat)?;
    let nhil = percent_of("amount", amount, rates.nhil)?;
    let getfl = percent_of("amount", amount, rates.getfl)?;
    let covid = percent_of("amount", amount, rates.covid)?;
    let total = checked_sum("amount", &[amount, vat, nhil, getfl, covid])?;
    let withholding_tax = withholding_rate
        .map(|rate| percent_of("amount", amount, rate))
        .transpose()?;

    Ok(TaxBreakdown {
        subtotal: amount,
        vat,
        nhil,
        getfl,
        covid,
        total,
        withholding_category: withholding_rate.map(|_| category),
        withholding_tax,
    })
}

/// Reverse of [`calculate_taxes`]: split a tax-inclusive total into its
/// subtotal and levies. `total` is recomputed from the derived subtotal.
pub fn extract_taxes(
    rates: &TaxRateTable,
    gross_total: Money,
    include_withholding: bool,
    category: WithholdingCategory,
) -> TaxEngineResult<TaxBreakdown> {
    require_non_negative("gross_total", gross_total)?;

    let divisor = checked_sum("rates.combined_rate", &[dec!(100), rates.levy_sum()?])?;
    if divisor.is_zero() {
        return Err(TaxEngineError::DivisionByZero {
            context: "tax-inclusive extraction (combined rate of -100%)".into(),
        });
    }
    let subtotal = gross_total
        .checked_mul(dec!(100))
        .and_then(|scaled| scaled.checked_div(divisor))
        .map(|value| value.normalize())
        .ok_or_else(|| too_large("gross_total"))?;
    calculate_taxes(rates, subtotal, include_withholding, category)
}

// ---------------------------------------------------------------------------
// Envelope wrappers
// ---------------------------------------------------------------------------

pub fn compute_taxes(
    engine: &TaxEngine,
    input: &TaxInput,
) -> TaxEngineResult<ComputationOutput<TaxBreakdown>> {
    let rates = &engine.config().rates;
    let result = calculate_taxes(
        rates,
        input.amount,
        input.include_withholding,
        input.withholding_category,
    )?;

    let mut warnings = Vec::new();
    if input.amount.is_zero() {
        warnings.push("Taxable amount is zero; all levies are zero.".to_string());
    }

    let assumptions = serde_json::json!({
        "amount": input.amount.to_string(),
        "vat_rate": rates.vat.to_string(),
        "nhil_rate": rates.nhil.to_string(),
        "getfl_rate": rates.getfl.to_string(),
        "covid_rate": rates.covid.to_string(),
        "combined_rate": rates.combined_rate.to_string(),
        "include_withholding": input.include_withholding,
        "withholding_category": input.withholding_category,
    });

    Ok(with_metadata(
        "Additive levy composition: each levy = subtotal x rate / 100, total = subtotal + levies",
        &assumptions,
        warnings,
        engine.jurisdiction(),
        result,
    ))
}

pub fn compute_extracted_taxes(
    engine: &TaxEngine,
    input: &ExtractInput,
) -> TaxEngineResult<ComputationOutput<TaxBreakdown>> {
    let rates = &engine.config().rates;
    let result = extract_taxes(
        rates,
        input.gross_total,
        input.include_withholding,
        input.withholding_category,
    )?;

    let mut warnings = Vec::new();
    if result.total != input.gross_total {
        warnings.push(format!(
            "Recomputed total {} differs from the supplied gross {} at full precision.",
            result.total, input.gross_total
        ));
    }

    let assumptions = serde_json::json!({
        "gross_total": input.gross_total.to_string(),
        "combined_rate": rates.combined_rate.to_string(),
        "include_withholding": input.include_withholding,
        "withholding_category": input.withholding_category,
    });

    Ok(with_metadata(
        "Tax-inclusive extraction: subtotal = gross x 100 / (100 + combined rate)",
        &assumptions,
        warnings,
        engine.jurisdiction(),
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ghana() -> TaxRateTable {
        TaxRateTable::ghana()
    }

    #[test]
    fn test_reference_breakdown_for_1000() {
        let b = calculate_taxes(&ghana(), dec!(1000), false, WithholdingCategory::Standard)
            .unwrap();
        assert_eq!(b.vat, dec!(125));
        assert_eq!(b.nhil, dec!(25));
        assert_eq!(b.getfl, dec!(25));
        assert_eq!(b.covid, dec!(10));
        assert_eq!(b.total, dec!(1185));
        assert_eq!(b.withholding_tax, None);
        assert_eq!(b.withholding_category, None);
    }

    #[test]
    fn test_total_is_exact_sum() {
        for amount in [dec!(0), dec!(0.01), dec!(333.33), dec!(1234567.891), dec!(7)] {
            let b = calculate_taxes(&ghana(), amount, false, WithholdingCategory::Standard)
                .unwrap();
            assert_eq!(b.total, amount + b.vat + b.nhil + b.getfl + b.covid);
            assert!(b.total >= b.subtotal);
        }
    }

    #[test]
    fn test_no_hidden_rounding() {
        let b = calculate_taxes(&ghana(), dec!(333.33), false, WithholdingCategory::Standard)
            .unwrap();
        assert_eq!(b.vat, dec!(41.66625));
        assert_eq!(b.covid, dec!(3.3333));
    }

    #[test]
    fn test_withholding_is_informational() {
        let b = calculate_taxes(&ghana(), dec!(1000), true, WithholdingCategory::Rent).unwrap();
        assert_eq!(b.withholding_tax, Some(dec!(80)));
        assert_eq!(b.withholding_category, Some(WithholdingCategory::Rent));
        assert_eq!(b.total, dec!(1185));
    }

    #[test]
    fn test_default_withholding_category() {
        let b = calculate_taxes(&ghana(), dec!(1000), true, WithholdingCategory::default())
            .unwrap();
        assert_eq!(b.withholding_tax, Some(dec!(50)));
    }

    #[test]
    fn test_negative_amount_rejected() {
        match calculate_taxes(&ghana(), dec!(-1), false, WithholdingCategory::Standard) {
            Err(TaxEngineError::InvalidInput { field, .. }) => assert_eq!(field, "amount"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_amount_too_large_is_an_error() {
        match calculate_taxes(&ghana(), Decimal::MAX, false, WithholdingCategory::Standard) {
            Err(TaxEngineError::InvalidInput { field, .. }) => assert_eq!(field, "amount"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        assert!(extract_taxes(&ghana(), Decimal::MAX, false, WithholdingCategory::Standard)
            .is_err());
    }

    #[test]
    fn test_figures_have_no_trailing_zeros() {
        let b = calculate_taxes(&ghana(), dec!(1000), true, WithholdingCategory::Standard)
            .unwrap();
        assert_eq!(b.vat.to_string(), "125");
        assert_eq!(b.total.to_string(), "1185");
        assert_eq!(b.withholding_tax.map(|w| w.to_string()), Some("50".to_string()));
    }

    #[test]
    fn test_unconfigured_category_rejected() {
        let mut rates = ghana();
        rates.withholding.remove(&WithholdingCategory::Goods);
        assert!(calculate_taxes(&rates, dec!(1000), true, WithholdingCategory::Goods).is_err());
        // Not requested, so the gap in the table does not matter.
        assert!(calculate_taxes(&rates, dec!(1000), false, WithholdingCategory::Goods).is_ok());
    }

    #[test]
    fn test_effective_rate_and_rounding() {
        let b = calculate_taxes(&ghana(), dec!(333.33), false, WithholdingCategory::Standard)
            .unwrap();
        assert_eq!(b.effective_rate(), dec!(18.5));
        let shown = b.rounded(DISPLAY_DECIMAL_PLACES);
        assert_eq!(shown.vat, dec!(41.67));
        assert_eq!(shown.total, dec!(395.00));
        let zero = calculate_taxes(&ghana(), dec!(0), false, WithholdingCategory::Standard)
            .unwrap();
        assert_eq!(zero.effective_rate(), dec!(0));
    }

    #[test]
    fn test_extract_inverts_forward_calculation() {
        let b = extract_taxes(&ghana(), dec!(1185), false, WithholdingCategory::Standard)
            .unwrap();
        assert_eq!(b.subtotal, dec!(1000));
        assert_eq!(b.vat, dec!(125));
        assert_eq!(b.total, dec!(1185));
    }

    #[test]
    fn test_extract_rejects_negative() {
        assert!(extract_taxes(&ghana(), dec!(-5), false, WithholdingCategory::Standard).is_err());
    }

    #[test]
    fn test_envelope_warns_on_zero() {
        let engine = TaxEngine::default();
        let input = TaxInput {
            amount: dec!(0),
            include_withholding: false,
            withholding_category: WithholdingCategory::Standard,
        };
        let output = compute_taxes(&engine, &input).unwrap();
        assert_eq!(output.result.total, dec!(0));
        assert!(output.warnings.iter().any(|w| w.contains("zero")));
        assert_eq!(output.metadata.jurisdiction, "GH");
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_envelope_is_idempotent() {
        let engine = TaxEngine::default();
        let input = TaxInput {
            amount: dec!(2500.75),
            include_withholding: true,
            withholding_category: WithholdingCategory::ProfessionalServices,
        };
        let first = compute_taxes(&engine, &input).unwrap();
        let second = compute_taxes(&engine, &input).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_input_deserialises_with_defaults() {
        let input: TaxInput = serde_json::from_str(r#"{ "amount": "1000" }"#).unwrap();
        assert!(!input.include_withholding);
        assert_eq!(input.withholding_category, WithholdingCategory::Standard);
    }
}
