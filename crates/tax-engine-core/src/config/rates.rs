use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::TaxEngineError;
use crate::types::{checked_sum, Percent};
use crate::TaxEngineResult;

// ---------------------------------------------------------------------------
// Withholding categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithholdingCategory {
    #[default]
    Standard,
    Rent,
    ProfessionalServices,
    Goods,
}

impl WithholdingCategory {
    pub const ALL: [WithholdingCategory; 4] = [
        WithholdingCategory::Standard,
        WithholdingCategory::Rent,
        WithholdingCategory::ProfessionalServices,
        WithholdingCategory::Goods,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WithholdingCategory::Standard => "standard",
            WithholdingCategory::Rent => "rent",
            WithholdingCategory::ProfessionalServices => "professional_services",
            WithholdingCategory::Goods => "goods",
        }
    }
}

impl fmt::Display for WithholdingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WithholdingCategory {
    type Err = TaxEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(WithholdingCategory::Standard),
            "rent" => Ok(WithholdingCategory::Rent),
            "professional_services" | "professional" | "services" => {
                Ok(WithholdingCategory::ProfessionalServices)
            }
            "goods" => Ok(WithholdingCategory::Goods),
            other => Err(TaxEngineError::invalid(
                "withholding_category",
                format!(
                    "unknown category '{other}' (expected standard, rent, professional_services or goods)"
                ),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Rate table
// ---------------------------------------------------------------------------

/// Flat consumption levies and withholding rates, all in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRateTable {
    pub vat: Percent,
    pub nhil: Percent,
    pub getfl: Percent,
    pub covid: Percent,
    /// Published headline rate; must equal the sum of the four levies.
    pub combined_rate: Percent,
    pub withholding: BTreeMap<WithholdingCategory, Percent>,
}

impl TaxRateTable {
    /// Ghana VAT regime with the NHIL, GETFund and COVID-19 levies.
    pub fn ghana() -> Self {
        let withholding = BTreeMap::from([
            (WithholdingCategory::Standard, dec!(5)),
            (WithholdingCategory::Rent, dec!(8)),
            (WithholdingCategory::ProfessionalServices, dec!(7.5)),
            (WithholdingCategory::Goods, dec!(3)),
        ]);
        TaxRateTable {
            vat: dec!(12.5),
            nhil: dec!(2.5),
            getfl: dec!(2.5),
            covid: dec!(1),
            combined_rate: dec!(18.5),
            withholding,
        }
    }

    /// Sum of the four levy rates.
    pub fn levy_sum(&self) -> TaxEngineResult<Percent> {
        checked_sum(
            "rates.combined_rate",
            &[self.vat, self.nhil, self.getfl, self.covid],
        )
    }

    pub fn withholding_rate(&self, category: WithholdingCategory) -> TaxEngineResult<Percent> {
        self.withholding.get(&category).copied().ok_or_else(|| {
            TaxEngineError::invalid(
                "withholding_category",
                format!("no withholding rate configured for '{category}'"),
            )
        })
    }

    pub fn validate(&self) -> TaxEngineResult<()> {
        let levies = [
            ("rates.vat", self.vat),
            ("rates.nhil", self.nhil),
            ("rates.getfl", self.getfl),
            ("rates.covid", self.covid),
            ("rates.combined_rate", self.combined_rate),
        ];
        for (field, rate) in levies {
            if rate < Decimal::ZERO {
                return Err(TaxEngineError::invalid(field, "rate must not be negative"));
            }
        }
        for (category, rate) in &self.withholding {
            if *rate < Decimal::ZERO {
                return Err(TaxEngineError::invalid(
                    "rates.withholding",
                    format!("rate for '{category}' must not be negative"),
                ));
            }
        }
        let levy_sum = self.levy_sum()?;
        if levy_sum != self.combined_rate {
            return Err(TaxEngineError::invalid(
                "rates.combined_rate",
                format!(
                    "combined rate {}% does not equal VAT+NHIL+GETFL+COVID ({}%)",
                    self.combined_rate, levy_sum
                ),
            ));
        }
        Ok(())
    }
}

impl Default for TaxRateTable {
    fn default() -> Self {
        Self::ghana()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghana_table_is_consistent() {
        let table = TaxRateTable::ghana();
        assert_eq!(table.levy_sum().unwrap(), dec!(18.5));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_combined_rate_mismatch_rejected() {
        let table = TaxRateTable {
            combined_rate: dec!(19),
            ..TaxRateTable::ghana()
        };
        match table.validate() {
            Err(TaxEngineError::InvalidInput { field, .. }) => {
                assert_eq!(field, "rates.combined_rate")
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_rates_rejected() {
        let table = TaxRateTable {
            vat: Decimal::MAX,
            ..TaxRateTable::ghana()
        };
        assert!(matches!(
            table.validate(),
            Err(TaxEngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_negative_withholding_rejected() {
        let mut table = TaxRateTable::ghana();
        table.withholding.insert(WithholdingCategory::Rent, dec!(-1));
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_missing_withholding_category() {
        let mut table = TaxRateTable::ghana();
        table.withholding.remove(&WithholdingCategory::Goods);
        assert!(table.withholding_rate(WithholdingCategory::Goods).is_err());
        assert_eq!(
            table.withholding_rate(WithholdingCategory::Rent).unwrap(),
            dec!(8)
        );
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            "professional-services".parse::<WithholdingCategory>().unwrap(),
            WithholdingCategory::ProfessionalServices
        );
        assert_eq!(
            " Goods ".parse::<WithholdingCategory>().unwrap(),
            WithholdingCategory::Goods
        );
        assert!("royalties".parse::<WithholdingCategory>().is_err());
        for category in WithholdingCategory::ALL {
            assert_eq!(category.as_str().parse::<WithholdingCategory>().unwrap(), category);
        }
    }
}
