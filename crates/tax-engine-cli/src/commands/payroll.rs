use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use tax_engine_core::payroll::paye::{self, PayrollInput};
use tax_engine_core::payroll::payroll_run::{self, PayrollRunInput};
use tax_engine_core::TaxEngine;

use crate::input;

/// Arguments for a single employee's payroll taxes
#[derive(Args)]
pub struct PayrollArgs {
    /// Gross monthly salary
    #[arg(long)]
    pub gross: Option<Decimal>,

    /// Employee name, echoed in the assumptions
    #[arg(long)]
    pub employee: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a whole payroll run
#[derive(Args)]
pub struct PayrollRunArgs {
    /// Path to JSON input file with `entries`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_payroll(args: PayrollArgs, engine: &TaxEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let payroll_input: PayrollInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => PayrollInput {
            gross_salary: args.gross.ok_or("--gross is required (or provide --input)")?,
            employee: args.employee,
        },
    };
    let output = paye::compute_payroll(engine, &payroll_input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_payroll_run(
    args: PayrollRunArgs,
    engine: &TaxEngine,
) -> Result<Value, Box<dyn std::error::Error>> {
    let run_input: PayrollRunInput = input::read_input(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for a payroll run")?;
    tracing::info!(headcount = run_input.entries.len(), "running payroll");
    let output = payroll_run::compute_payroll_run(engine, &run_input)?;
    Ok(serde_json::to_value(output)?)
}
