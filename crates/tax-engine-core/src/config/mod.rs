pub mod brackets;
pub mod rates;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::TaxEngineError;
use crate::TaxEngineResult;

pub use brackets::{BracketWidth, PayrollConfig, PayrollTaxBracket};
pub use rates::{TaxRateTable, WithholdingCategory};

/// Everything a jurisdiction (or tax year) changes: levy rates, withholding
/// table and the payroll schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    pub jurisdiction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<NaiveDate>,
    pub rates: TaxRateTable,
    pub payroll: PayrollConfig,
}

impl TaxConfig {
    pub fn ghana() -> Self {
        TaxConfig {
            jurisdiction: "GH".to_string(),
            effective_from: None,
            rates: TaxRateTable::ghana(),
            payroll: PayrollConfig::ghana(),
        }
    }

    pub fn validate(&self) -> TaxEngineResult<()> {
        if self.jurisdiction.trim().is_empty() {
            return Err(TaxEngineError::invalid(
                "jurisdiction",
                "jurisdiction label must not be empty",
            ));
        }
        self.rates.validate()?;
        self.payroll.validate()
    }

    pub fn from_json_str(s: &str) -> TaxEngineResult<Self> {
        let config: TaxConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(s: &str) -> TaxEngineResult<Self> {
        let config: TaxConfig = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a rate table from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> TaxEngineResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            TaxEngineError::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Self::from_json_str(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Err(TaxEngineError::Config(format!(
                "unsupported config format for '{}' (expected .json, .yaml or .yml)",
                path.display()
            ))),
        }
    }
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self::ghana()
    }
}
