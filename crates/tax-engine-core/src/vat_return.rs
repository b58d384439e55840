use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::TaxEngine;
use crate::types::*;
use crate::TaxEngineResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetPosition {
    Payable,
    Credit,
}

/// Period VAT netted to either an amount due or a credit to carry forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatReturnPosition {
    pub sales_vat: Money,
    pub purchases_vat: Money,
    pub previous_credit: Money,
    pub net_vat: Money,
    pub vat_payable: Money,
    pub vat_credit: Money,
    pub position: NetPosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VatReturnInput {
    pub sales_vat: Money,
    pub purchases_vat: Money,
    #[serde(default)]
    pub previous_credit: Money,
}

/// `net = sales - purchases - previous credit`; a positive net is payable,
/// anything else becomes a credit of `|net|`.
///
/// All three figures are magnitudes: a negative one is rejected with
/// `InvalidInput` naming the field, so corrections must be folded into the
/// sales or purchases totals before netting.
pub fn calculate_vat_return(
    sales_vat: Money,
    purchases_vat: Money,
    previous_credit: Money,
) -> TaxEngineResult<VatReturnPosition> {
    require_non_negative("sales_vat", sales_vat)?;
    require_non_negative("purchases_vat", purchases_vat)?;
    require_non_negative("previous_credit", previous_credit)?;

    let net_vat = sales_vat
        .checked_sub(purchases_vat)
        .and_then(|net| net.checked_sub(previous_credit))
        .map(|net| net.normalize())
        .ok_or_else(|| too_large("previous_credit"))?;
    let (vat_payable, vat_credit, position) = if net_vat > Decimal::ZERO {
        (net_vat, Decimal::ZERO, NetPosition::Payable)
    } else {
        (Decimal::ZERO, net_vat.abs(), NetPosition::Credit)
    };

    Ok(VatReturnPosition {
        sales_vat,
        purchases_vat,
        previous_credit,
        net_vat,
        vat_payable,
        vat_credit,
        position,
    })
}

pub fn compute_vat_return(
    engine: &TaxEngine,
    input: &VatReturnInput,
) -> TaxEngineResult<ComputationOutput<VatReturnPosition>> {
    let result = calculate_vat_return(input.sales_vat, input.purchases_vat, input.previous_credit)?;

    let mut warnings = Vec::new();
    if result.net_vat.is_zero() {
        warnings.push("Output and input VAT net to exactly zero; nothing payable or carried.".to_string());
    } else if result.position == NetPosition::Credit {
        warnings.push(format!(
            "Credit of {} carries forward to the next period.",
            result.vat_credit
        ));
    }

    let assumptions = serde_json::json!({
        "sales_vat": input.sales_vat.to_string(),
        "purchases_vat": input.purchases_vat.to_string(),
        "previous_credit": input.previous_credit.to_string(),
    });

    Ok(with_metadata(
        "VAT return netting: sales VAT less purchases VAT less brought-forward credit",
        &assumptions,
        warnings,
        engine.jurisdiction(),
        result,
    ))
}
