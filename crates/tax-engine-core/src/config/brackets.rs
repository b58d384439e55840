use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;
use crate::types::{Money, Percent};
use crate::TaxEngineResult;

/// How much income a bracket absorbs before spilling into the next one.
/// The width is a slice of income, not a cumulative upper bound.
///
/// In rate tables this reads `{ limited: "402" }` or `unbounded`, in YAML as
/// well as JSON (fields holding it go through `singleton_map`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketWidth {
    Limited(Money),
    /// Absorbs whatever income remains. Only valid on the last bracket.
    Unbounded,
}

impl BracketWidth {
    /// Portion of `remaining` taxed inside this bracket.
    pub fn take(&self, remaining: Money) -> Money {
        match self {
            BracketWidth::Limited(width) => remaining.min(*width),
            BracketWidth::Unbounded => remaining,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, BracketWidth::Unbounded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollTaxBracket {
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub width: BracketWidth,
    pub rate: Percent,
}

impl PayrollTaxBracket {
    pub fn limited(width: Money, rate: Percent) -> Self {
        PayrollTaxBracket {
            width: BracketWidth::Limited(width),
            rate,
        }
    }

    pub fn unbounded(rate: Percent) -> Self {
        PayrollTaxBracket {
            width: BracketWidth::Unbounded,
            rate,
        }
    }
}

/// Social security split and the graduated PAYE schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    pub employee_ssnit_rate: Percent,
    pub employer_ssnit_rate: Percent,
    pub brackets: Vec<PayrollTaxBracket>,
}

impl PayrollConfig {
    /// Monthly PAYE schedule with the 5.5% / 13.5% SSNIT split.
    pub fn ghana() -> Self {
        PayrollConfig {
            employee_ssnit_rate: dec!(5.5),
            employer_ssnit_rate: dec!(13.5),
            brackets: vec![
                PayrollTaxBracket::limited(dec!(402), dec!(0)),
                PayrollTaxBracket::limited(dec!(110), dec!(5)),
                PayrollTaxBracket::limited(dec!(130), dec!(10)),
                PayrollTaxBracket::limited(dec!(3000), dec!(17.5)),
                PayrollTaxBracket::limited(dec!(16395), dec!(25)),
                PayrollTaxBracket::limited(dec!(29963), dec!(30)),
                PayrollTaxBracket::unbounded(dec!(35)),
            ],
        }
    }

    /// Width of the leading tax-free band, or zero when there is none.
    pub fn tax_free_threshold(&self) -> Money {
        match self.brackets.first() {
            Some(PayrollTaxBracket {
                width: BracketWidth::Limited(width),
                rate,
            }) if rate.is_zero() => *width,
            _ => Decimal::ZERO,
        }
    }

    pub fn validate(&self) -> TaxEngineResult<()> {
        for (field, rate) in [
            ("payroll.employee_ssnit_rate", self.employee_ssnit_rate),
            ("payroll.employer_ssnit_rate", self.employer_ssnit_rate),
        ] {
            if rate < Decimal::ZERO || rate > dec!(100) {
                return Err(TaxEngineError::invalid(field, "rate must be between 0 and 100"));
            }
        }

        let Some(first) = self.brackets.first() else {
            return Err(TaxEngineError::invalid(
                "payroll.brackets",
                "at least one bracket is required",
            ));
        };
        if !first.rate.is_zero() {
            return Err(TaxEngineError::invalid(
                "payroll.brackets",
                "first bracket must be the tax-free threshold (rate 0)",
            ));
        }

        let last = self.brackets.len() - 1;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO {
                return Err(TaxEngineError::invalid(
                    "payroll.brackets",
                    format!("bracket {} has a negative rate", i + 1),
                ));
            }
            match bracket.width {
                BracketWidth::Limited(width) if width <= Decimal::ZERO => {
                    return Err(TaxEngineError::invalid(
                        "payroll.brackets",
                        format!("bracket {} must have a positive width", i + 1),
                    ));
                }
                BracketWidth::Limited(_) if i == last => {
                    return Err(TaxEngineError::invalid(
                        "payroll.brackets",
                        "final bracket must be unbounded",
                    ));
                }
                BracketWidth::Unbounded if i != last => {
                    return Err(TaxEngineError::invalid(
                        "payroll.brackets",
                        format!("only the final bracket may be unbounded (bracket {})", i + 1),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self::ghana()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_take() {
        assert_eq!(BracketWidth::Limited(dec!(402)).take(dec!(283.5)), dec!(283.5));
        assert_eq!(BracketWidth::Limited(dec!(402)).take(dec!(1000)), dec!(402));
        assert_eq!(BracketWidth::Unbounded.take(dec!(1_000_000)), dec!(1_000_000));
    }

    #[test]
    fn test_ghana_schedule_valid() {
        let cfg = PayrollConfig::ghana();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.tax_free_threshold(), dec!(402));
    }

    #[test]
    fn test_bounded_final_bracket_rejected() {
        let mut cfg = PayrollConfig::ghana();
        cfg.brackets.pop();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_unbounded_middle_bracket_rejected() {
        let mut cfg = PayrollConfig::ghana();
        cfg.brackets[2] = PayrollTaxBracket::unbounded(dec!(10));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_taxed_first_bracket_rejected() {
        let mut cfg = PayrollConfig::ghana();
        cfg.brackets[0].rate = dec!(1);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let cfg = PayrollConfig {
            brackets: Vec::new(),
            ..PayrollConfig::ghana()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_ssnit_rate_out_of_range() {
        let cfg = PayrollConfig {
            employer_ssnit_rate: dec!(101),
            ..PayrollConfig::ghana()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_width_json_shape() {
        let limited = serde_json::to_value(PayrollTaxBracket::limited(dec!(402), dec!(0))).unwrap();
        assert_eq!(limited["width"], serde_json::json!({ "limited": "402" }));
        let open = serde_json::to_value(PayrollTaxBracket::unbounded(dec!(35))).unwrap();
        assert_eq!(open["width"], serde_json::json!("unbounded"));

        let parsed: PayrollTaxBracket =
            serde_json::from_str(r#"{ "width": { "limited": "110" }, "rate": "5" }"#).unwrap();
        assert_eq!(parsed, PayrollTaxBracket::limited(dec!(110), dec!(5)));
    }

    #[test]
    fn test_width_yaml_map_form() {
        let yaml = serde_yaml::to_string(&PayrollConfig::ghana()).unwrap();
        assert!(yaml.contains("limited: '402'"), "{yaml}");
        assert!(!yaml.contains('!'), "{yaml}");

        let parsed: PayrollConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, PayrollConfig::ghana());
    }

    #[test]
    fn test_single_unbounded_zero_bracket_is_valid() {
        let cfg = PayrollConfig {
            brackets: vec![PayrollTaxBracket::unbounded(dec!(0))],
            ..PayrollConfig::ghana()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.tax_free_threshold(), dec!(0));
    }
}
