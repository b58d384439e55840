use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{TaxRateTable, WithholdingCategory};
use crate::engine::TaxEngine;
use crate::error::TaxEngineError;
use crate::levies::consumption::{calculate_taxes, TaxBreakdown};
use crate::types::*;
use crate::TaxEngineResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceInput {
    pub lines: Vec<InvoiceLine>,
    #[serde(default)]
    pub include_withholding: bool,
    #[serde(default)]
    pub withholding_category: WithholdingCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineTotal {
    pub description: String,
    pub gross_amount: Money,
    pub discount: Money,
    pub net_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub lines: Vec<InvoiceLineTotal>,
    pub total_discount: Money,
    pub taxes: TaxBreakdown,
}

/// Price each line, sum to a taxable subtotal and layer the levies on top.
pub fn calculate_invoice(rates: &TaxRateTable, input: &InvoiceInput) -> TaxEngineResult<InvoiceTotals> {
    if input.lines.is_empty() {
        return Err(TaxEngineError::InsufficientData(
            "Invoice must contain at least one line".to_string(),
        ));
    }

    let mut lines = Vec::with_capacity(input.lines.len());
    let mut subtotal = Decimal::ZERO;
    let mut total_discount = Decimal::ZERO;

    for (i, line) in input.lines.iter().enumerate() {
        if line.quantity < Decimal::ZERO {
            return Err(TaxEngineError::invalid(
                "quantity",
                format!("line {} has a negative quantity", i + 1),
            ));
        }
        if line.unit_price < Decimal::ZERO {
            return Err(TaxEngineError::invalid(
                "unit_price",
                format!("line {} has a negative unit price", i + 1),
            ));
        }
        let discount_rate = line.discount_percent.unwrap_or(Decimal::ZERO);
        if discount_rate < Decimal::ZERO || discount_rate > dec!(100) {
            return Err(TaxEngineError::invalid(
                "discount_percent",
                format!("line {} discount must be between 0 and 100", i + 1),
            ));
        }

        let gross_amount = line
            .quantity
            .checked_mul(line.unit_price)
            .map(|value| value.normalize())
            .ok_or_else(|| too_large("unit_price"))?;
        let discount = percent_of("unit_price", gross_amount, discount_rate)?;
        let net_amount = gross_amount - discount;

        subtotal = checked_sum("lines", &[subtotal, net_amount])?;
        total_discount = checked_sum("lines", &[total_discount, discount])?;
        lines.push(InvoiceLineTotal {
            description: line.description.clone(),
            gross_amount,
            discount,
            net_amount,
        });
    }

    let taxes = calculate_taxes(
        rates,
        subtotal,
        input.include_withholding,
        input.withholding_category,
    )?;

    Ok(InvoiceTotals {
        lines,
        total_discount,
        taxes,
    })
}

pub fn compute_invoice(
    engine: &TaxEngine,
    input: &InvoiceInput,
) -> TaxEngineResult<ComputationOutput<InvoiceTotals>> {
    let result = calculate_invoice(&engine.config().rates, input)?;

    let mut warnings = Vec::new();
    for (i, line) in result.lines.iter().enumerate() {
        if line.net_amount.is_zero() {
            warnings.push(format!("Line {} ({}) has a zero amount.", i + 1, line.description));
        }
    }

    let assumptions = serde_json::json!({
        "line_count": input.lines.len(),
        "combined_rate": engine.config().rates.combined_rate.to_string(),
        "include_withholding": input.include_withholding,
        "withholding_category": input.withholding_category,
    });

    Ok(with_metadata(
        "Invoice pricing: line = quantity x unit price less discount; levies on the summed subtotal",
        &assumptions,
        warnings,
        engine.jurisdiction(),
        result,
    ))
}
