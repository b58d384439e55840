use crate::config::TaxConfig;
#[cfg(any(feature = "levies", feature = "invoice"))]
use crate::config::WithholdingCategory;
use crate::types::*;
use crate::TaxEngineResult;

#[cfg(feature = "depreciation")]
use crate::depreciation::{
    annual::{self, DepreciationMethod, DepreciationPolicy},
    schedule::{self, DepreciationSchedule},
};
#[cfg(feature = "invoice")]
use crate::levies::invoice::{self, InvoiceInput, InvoiceTotals};
#[cfg(feature = "levies")]
use crate::levies::consumption::{self, TaxBreakdown};
#[cfg(feature = "payroll")]
use crate::payroll::{
    paye::{self, PayrollTaxResult},
    payroll_run::{self, PayrollEntry, PayrollRunResult},
};
#[cfg(feature = "vat_return")]
use crate::vat_return::{self, VatReturnPosition};

/// Stateless calculator bound to one validated rate configuration.
///
/// Every method is a pure function of its arguments and the configuration,
/// so an engine can be shared freely across threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxEngine {
    config: TaxConfig,
}

impl TaxEngine {
    pub fn new(config: TaxConfig) -> TaxEngineResult<Self> {
        config.validate()?;
        Ok(TaxEngine { config })
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    pub fn jurisdiction(&self) -> &str {
        &self.config.jurisdiction
    }

    #[cfg(feature = "levies")]
    pub fn calculate_taxes(
        &self,
        amount: Money,
        include_withholding: bool,
        category: WithholdingCategory,
    ) -> TaxEngineResult<TaxBreakdown> {
        consumption::calculate_taxes(&self.config.rates, amount, include_withholding, category)
    }

    #[cfg(feature = "levies")]
    pub fn extract_taxes(
        &self,
        gross_total: Money,
        include_withholding: bool,
        category: WithholdingCategory,
    ) -> TaxEngineResult<TaxBreakdown> {
        consumption::extract_taxes(&self.config.rates, gross_total, include_withholding, category)
    }

    #[cfg(feature = "invoice")]
    pub fn calculate_invoice(&self, input: &InvoiceInput) -> TaxEngineResult<InvoiceTotals> {
        invoice::calculate_invoice(&self.config.rates, input)
    }

    #[cfg(feature = "payroll")]
    pub fn calculate_payroll_taxes(&self, gross_salary: Money) -> TaxEngineResult<PayrollTaxResult> {
        paye::calculate_payroll_taxes(&self.config.payroll, gross_salary)
    }

    #[cfg(feature = "payroll")]
    pub fn calculate_payroll_run(&self, entries: &[PayrollEntry]) -> TaxEngineResult<PayrollRunResult> {
        payroll_run::calculate_payroll_run(&self.config.payroll, entries)
    }

    #[cfg(feature = "vat_return")]
    pub fn calculate_vat_return(
        &self,
        sales_vat: Money,
        purchases_vat: Money,
        previous_credit: Money,
    ) -> TaxEngineResult<VatReturnPosition> {
        vat_return::calculate_vat_return(sales_vat, purchases_vat, previous_credit)
    }

    #[cfg(feature = "depreciation")]
    pub fn calculate_annual_depreciation(
        &self,
        asset_cost: Money,
        salvage_value: Money,
        useful_life: Years,
        method: DepreciationMethod,
        rate: Percent,
    ) -> TaxEngineResult<Money> {
        annual::calculate_annual_depreciation(asset_cost, salvage_value, useful_life, method, rate)
    }

    #[cfg(feature = "depreciation")]
    pub fn build_depreciation_schedule(
        &self,
        policy: &DepreciationPolicy,
        periods: u32,
    ) -> TaxEngineResult<DepreciationSchedule> {
        schedule::build_depreciation_schedule(policy, periods)
    }
}
