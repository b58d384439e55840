use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use tax_engine_core::vat_return::{self, VatReturnInput};
use tax_engine_core::TaxEngine;

use crate::input;

/// Arguments for netting a VAT return
#[derive(Args)]
pub struct VatReturnArgs {
    /// Output VAT collected on sales
    #[arg(long)]
    pub sales_vat: Option<Decimal>,

    /// Input VAT paid on purchases
    #[arg(long)]
    pub purchases_vat: Option<Decimal>,

    /// Credit brought forward from the previous period
    #[arg(long)]
    pub previous_credit: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_vat_return(
    args: VatReturnArgs,
    engine: &TaxEngine,
) -> Result<Value, Box<dyn std::error::Error>> {
    let vat_input: VatReturnInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => VatReturnInput {
            sales_vat: args
                .sales_vat
                .ok_or("--sales-vat is required (or provide --input)")?,
            purchases_vat: args
                .purchases_vat
                .ok_or("--purchases-vat is required (or provide --input)")?,
            previous_credit: args.previous_credit.unwrap_or(dec!(0)),
        },
    };
    let output = vat_return::compute_vat_return(engine, &vat_input)?;
    Ok(serde_json::to_value(output)?)
}
