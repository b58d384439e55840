use clap::Args;
use serde_json::Value;

use tax_engine_core::TaxEngine;

/// Arguments for printing the active rate table
#[derive(Args)]
pub struct RatesArgs {
    /// Print as YAML (a starting point for a custom --config file)
    #[arg(long)]
    pub yaml: bool,
}

/// The active configuration as a value; `None` when already printed as YAML.
pub fn run_rates(args: RatesArgs, engine: &TaxEngine) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if args.yaml {
        print!("{}", rates_yaml(engine)?);
        return Ok(None);
    }
    Ok(Some(serde_json::to_value(engine.config())?))
}

/// YAML form of the active table, loadable again with `--config file.yaml`.
pub fn rates_yaml(engine: &TaxEngine) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(engine.config())
}
