mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::depreciation::{DepreciationArgs, ScheduleArgs};
use commands::levies::{ExtractArgs, InvoiceArgs, TaxesArgs};
use commands::payroll::{PayrollArgs, PayrollRunArgs};
use commands::rates::RatesArgs;
use commands::vat_return::VatReturnArgs;
use tax_engine_core::{TaxConfig, TaxEngine};

/// Consumption tax, payroll, VAT return and depreciation calculations
#[derive(Parser)]
#[command(
    name = "taxcalc",
    version,
    about = "Consumption tax, payroll, VAT return and depreciation calculations",
    long_about = "A CLI over the tax engine with decimal precision. Computes VAT/NHIL/GETFL/COVID \
                  levy breakdowns, invoice totals, PAYE and SSNIT, VAT return positions and \
                  depreciation charges against a built-in or --config rate table."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Rate table to use instead of the built-in one (.json, .yaml or .yml)
    #[arg(long, global = true, env = "TAXCALC_CONFIG")]
    config: Option<String>,

    /// Verbose diagnostics on stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Levy breakdown for a taxable amount
    Taxes(TaxesArgs),
    /// Split a tax-inclusive total into subtotal and levies
    Extract(ExtractArgs),
    /// Invoice totals from priced lines
    Invoice(InvoiceArgs),
    /// PAYE, SSNIT and net pay for one salary
    Payroll(PayrollArgs),
    /// Payroll for many employees with remittance totals
    PayrollRun(PayrollRunArgs),
    /// Net a period's VAT into payable or credit
    VatReturn(VatReturnArgs),
    /// One period's depreciation charge
    Depreciation(DepreciationArgs),
    /// Multi-period depreciation schedule
    DepreciationSchedule(ScheduleArgs),
    /// Show the active rate table
    Rates(RatesArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "taxcalc=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_engine(path: Option<&str>) -> Result<TaxEngine, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => {
            let resolved = input::file::resolve_path(path)?;
            let config = TaxConfig::from_path(&resolved)?;
            tracing::info!(
                path = %resolved.display(),
                jurisdiction = %config.jurisdiction,
                "loaded rate table"
            );
            config
        }
        None => {
            tracing::debug!("using built-in rate table");
            TaxConfig::default()
        }
    };
    Ok(TaxEngine::new(config)?)
}

fn dispatch(
    command: Commands,
    engine: &TaxEngine,
) -> Result<Option<serde_json::Value>, Box<dyn std::error::Error>> {
    let value = match command {
        Commands::Taxes(args) => commands::levies::run_taxes(args, engine)?,
        Commands::Extract(args) => commands::levies::run_extract(args, engine)?,
        Commands::Invoice(args) => commands::levies::run_invoice(args, engine)?,
        Commands::Payroll(args) => commands::payroll::run_payroll(args, engine)?,
        Commands::PayrollRun(args) => commands::payroll::run_payroll_run(args, engine)?,
        Commands::VatReturn(args) => commands::vat_return::run_vat_return(args, engine)?,
        Commands::Depreciation(args) => commands::depreciation::run_depreciation(args, engine)?,
        Commands::DepreciationSchedule(args) => {
            commands::depreciation::run_schedule(args, engine)?
        }
        Commands::Rates(args) => return commands::rates::run_rates(args, engine),
        Commands::Version => return Ok(None),
    };
    Ok(Some(value))
}

fn run(cli: Cli) -> Result<Option<serde_json::Value>, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Version => {
            println!("taxcalc {}", env!("CARGO_PKG_VERSION"));
            Ok(None)
        }
        command => {
            let engine = load_engine(cli.config.as_deref())?;
            tracing::debug!(jurisdiction = engine.jurisdiction(), "dispatching command");
            dispatch(command, &engine)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = cli.output.clone();
    match run(cli) {
        Ok(Some(value)) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Ok(None) => process::exit(0),
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
