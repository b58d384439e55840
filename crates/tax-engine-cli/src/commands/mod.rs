pub mod depreciation;
pub mod levies;
pub mod payroll;
pub mod rates;
pub mod vat_return;
