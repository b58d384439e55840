use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use tax_engine_core::config::WithholdingCategory;
use tax_engine_core::levies::consumption::{self, ExtractInput, TaxInput};
use tax_engine_core::levies::invoice::{self, InvoiceInput};
use tax_engine_core::TaxEngine;

use crate::input;

/// Arguments for the levy breakdown on a taxable amount
#[derive(Args)]
pub struct TaxesArgs {
    /// Taxable subtotal (before levies)
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Also compute the informational withholding figure
    #[arg(long)]
    pub withholding: bool,

    /// Withholding category: standard, rent, professional_services, goods
    #[arg(long, default_value = "standard")]
    pub category: WithholdingCategory,

    /// Round figures to two decimals for display
    #[arg(long)]
    pub round: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for splitting a tax-inclusive total
#[derive(Args)]
pub struct ExtractArgs {
    /// Tax-inclusive total
    #[arg(long)]
    pub gross: Option<Decimal>,

    /// Also compute the informational withholding figure
    #[arg(long)]
    pub withholding: bool,

    /// Withholding category: standard, rent, professional_services, goods
    #[arg(long, default_value = "standard")]
    pub category: WithholdingCategory,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for invoice totals
#[derive(Args)]
pub struct InvoiceArgs {
    /// Path to JSON input file with invoice lines
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_taxes(args: TaxesArgs, engine: &TaxEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let tax_input: TaxInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => TaxInput {
            amount: args.amount.ok_or("--amount is required (or provide --input)")?,
            include_withholding: args.withholding,
            withholding_category: args.category,
        },
    };
    let mut output = consumption::compute_taxes(engine, &tax_input)?;
    if args.round {
        output.result = output.result.rounded(tax_engine_core::DISPLAY_DECIMAL_PLACES);
    }
    Ok(serde_json::to_value(output)?)
}

pub fn run_extract(args: ExtractArgs, engine: &TaxEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let extract_input: ExtractInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => ExtractInput {
            gross_total: args.gross.ok_or("--gross is required (or provide --input)")?,
            include_withholding: args.withholding,
            withholding_category: args.category,
        },
    };
    let output = consumption::compute_extracted_taxes(engine, &extract_input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_invoice(args: InvoiceArgs, engine: &TaxEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let invoice_input: InvoiceInput = input::read_input(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for invoice totals")?;
    let output = invoice::compute_invoice(engine, &invoice_input)?;
    Ok(serde_json::to_value(output)?)
}
