pub mod config;
pub mod engine;
pub mod error;
pub mod types;

#[cfg(feature = "levies")]
pub mod levies;

#[cfg(feature = "payroll")]
pub mod payroll;

#[cfg(feature = "vat_return")]
pub mod vat_return;

#[cfg(feature = "depreciation")]
pub mod depreciation;

pub use config::TaxConfig;
pub use engine::TaxEngine;
pub use error::TaxEngineError;
pub use types::*;

/// Standard result type for all tax-engine operations
pub type TaxEngineResult<T> = Result<T, TaxEngineError>;
