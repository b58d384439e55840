use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use tax_engine_core::{TaxConfig, TaxEngine, TaxEngineResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Build an engine from an optional JSON rate table; the built-in table
/// when none is given.
fn engine_from(config_json: Option<String>) -> NapiResult<TaxEngine> {
    match config_json {
        Some(json) => {
            let config = TaxConfig::from_json_str(&json).map_err(to_napi_error)?;
            TaxEngine::new(config).map_err(to_napi_error)
        }
        None => Ok(TaxEngine::default()),
    }
}

/// Parse the request, run it against the engine and serialise the envelope.
fn invoke<I, O>(
    input_json: &str,
    config_json: Option<String>,
    f: impl FnOnce(&TaxEngine, &I) -> TaxEngineResult<O>,
) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let engine = engine_from(config_json)?;
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = f(&engine, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Levies and invoices
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_taxes(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    invoke(&input_json, config_json, tax_engine_core::levies::consumption::compute_taxes)
}

#[napi]
pub fn extract_taxes(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    invoke(
        &input_json,
        config_json,
        tax_engine_core::levies::consumption::compute_extracted_taxes,
    )
}

#[napi]
pub fn calculate_invoice(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    invoke(&input_json, config_json, tax_engine_core::levies::invoice::compute_invoice)
}

// ---------------------------------------------------------------------------
// Payroll
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_payroll_taxes(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    invoke(&input_json, config_json, tax_engine_core::payroll::paye::compute_payroll)
}

#[napi]
pub fn calculate_payroll_run(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    invoke(
        &input_json,
        config_json,
        tax_engine_core::payroll::payroll_run::compute_payroll_run,
    )
}

// ---------------------------------------------------------------------------
// VAT return
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_vat_return(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    invoke(&input_json, config_json, tax_engine_core::vat_return::compute_vat_return)
}

// ---------------------------------------------------------------------------
// Depreciation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_annual_depreciation(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    invoke(
        &input_json,
        config_json,
        tax_engine_core::depreciation::annual::compute_depreciation,
    )
}

#[napi]
pub fn build_depreciation_schedule(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    invoke(
        &input_json,
        config_json,
        tax_engine_core::depreciation::schedule::compute_depreciation_schedule,
    )
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// The reference rate table, as a starting point for a custom one.
#[napi]
pub fn default_tax_config() -> NapiResult<String> {
    serde_json::to_string(&TaxConfig::default()).map_err(to_napi_error)
}

/// Validate a JSON rate table without running a calculation.
#[napi]
pub fn validate_tax_config(config_json: String) -> NapiResult<String> {
    let config = TaxConfig::from_json_str(&config_json).map_err(to_napi_error)?;
    serde_json::to_string(&config).map_err(to_napi_error)
}
