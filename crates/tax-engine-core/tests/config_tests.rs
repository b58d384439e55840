use rust_decimal_macros::dec;
use std::fs;
use tax_engine_core::config::{BracketWidth, WithholdingCategory};
use tax_engine_core::{TaxConfig, TaxEngine, TaxEngineError};

fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_yaml_table_and_calculate() {
    let path = write_temp(
        "rates-2025.yaml",
        r#"
jurisdiction: GH-2025
effective_from: 2025-01-01
rates:
  vat: "15"
  nhil: "2.5"
  getfl: "2.5"
  covid: "0"
  combined_rate: "20"
  withholding:
    standard: "5"
    goods: "3"
payroll:
  employee_ssnit_rate: "5.5"
  employer_ssnit_rate: "13"
  brackets:
    - { width: { limited: "490" }, rate: "0" }
    - { width: { limited: "110" }, rate: "5" }
    - { width: unbounded, rate: "10" }
"#,
    );
    let config = TaxConfig::from_path(&path).unwrap();
    let _ = fs::remove_file(&path);

    let engine = TaxEngine::new(config).unwrap();
    assert_eq!(engine.jurisdiction(), "GH-2025");
    assert!(engine.config().payroll.brackets[2].width == BracketWidth::Unbounded);

    let b = engine
        .calculate_taxes(dec!(1000), true, WithholdingCategory::Goods)
        .unwrap();
    assert_eq!(b.total, dec!(1200));
    assert_eq!(b.withholding_tax, Some(dec!(30)));

    // Rent is not in this table.
    assert!(engine
        .calculate_taxes(dec!(1000), true, WithholdingCategory::Rent)
        .is_err());

    // taxable = 1000 - 55 = 945: 490 free, 110 @ 5% = 5.5, 345 @ 10% = 34.5
    let p = engine.calculate_payroll_taxes(dec!(1000)).unwrap();
    assert_eq!(p.paye_tax, dec!(40));
    assert_eq!(p.employer_ssnit, dec!(130));
}

#[test]
fn test_load_json_table() {
    let json = serde_json::to_string_pretty(&TaxConfig::ghana()).unwrap();
    let path = write_temp("rates.json", &json);
    let config = TaxConfig::from_path(&path).unwrap();
    let _ = fs::remove_file(&path);
    assert_eq!(config, TaxConfig::ghana());
}

#[test]
fn test_inconsistent_combined_rate_in_file() {
    let path = write_temp(
        "bad-rates.yml",
        "rates:\n  vat: \"12.5\"\n  combined_rate: \"30\"\n",
    );
    let result = TaxConfig::from_path(&path);
    let _ = fs::remove_file(&path);
    match result {
        Err(TaxEngineError::InvalidInput { field, .. }) => assert_eq!(field, "rates.combined_rate"),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_malformed_yaml_is_serialization_error() {
    let path = write_temp("broken.yaml", "rates: [unterminated");
    let result = TaxConfig::from_path(&path);
    let _ = fs::remove_file(&path);
    assert!(matches!(result, Err(TaxEngineError::SerializationError(_))));
}
