pub mod paye;
pub mod payroll_run;
