use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use tax_engine_core::depreciation::annual::{self, DepreciationMethod, DepreciationPolicy};
use tax_engine_core::depreciation::schedule::{self, DepreciationScheduleInput};
use tax_engine_core::TaxEngine;

use crate::input;

/// Asset terms shared by the single-period and schedule commands
#[derive(Args)]
pub struct PolicyArgs {
    /// Asset cost (or current book value for reducing balance)
    #[arg(long)]
    pub cost: Option<Decimal>,

    /// Residual value at the end of the useful life
    #[arg(long)]
    pub salvage: Option<Decimal>,

    /// Useful life in years
    #[arg(long)]
    pub life: Option<Decimal>,

    /// straight-line or reducing-balance
    #[arg(long, default_value = "straight-line")]
    pub method: DepreciationMethod,

    /// Reducing-balance rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,
}

impl PolicyArgs {
    fn into_policy(self) -> Result<DepreciationPolicy, Box<dyn std::error::Error>> {
        Ok(DepreciationPolicy {
            asset_cost: self.cost.ok_or("--cost is required (or provide --input)")?,
            salvage_value: self.salvage.unwrap_or(dec!(0)),
            useful_life: self.life.ok_or("--life is required (or provide --input)")?,
            method: self.method,
            rate: self.rate.unwrap_or(dec!(0)),
        })
    }
}

/// Arguments for one period's depreciation charge
#[derive(Args)]
pub struct DepreciationArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a multi-period depreciation schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Number of periods (defaults to the useful life rounded up)
    #[arg(long)]
    pub periods: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_depreciation(
    args: DepreciationArgs,
    engine: &TaxEngine,
) -> Result<Value, Box<dyn std::error::Error>> {
    let policy: DepreciationPolicy = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => args.policy.into_policy()?,
    };
    let output = annual::compute_depreciation(engine, &policy)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_schedule(args: ScheduleArgs, engine: &TaxEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: DepreciationScheduleInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => DepreciationScheduleInput {
            policy: args.policy.into_policy()?,
            periods: args.periods,
        },
    };
    let output = schedule::compute_depreciation_schedule(engine, &schedule_input)?;
    Ok(serde_json::to_value(output)?)
}
