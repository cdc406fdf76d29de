//! Calculation logic for the payroll engine.
//!
//! This module contains the forward payroll model, built from the gratuity,
//! contribution and income tax rules, and the reverse solver that searches
//! for the base salary producing a target net pay.

mod breakdown;
mod contributions;
mod forward;
mod gratuity;
mod income_tax;
mod solver;

pub use breakdown::{assemble_breakdown, evaluation_warnings, explain_evaluation};
pub use contributions::{
    ContributionBases, EmployerContributions, HealthDeduction, capped_bases,
    employer_contributions, health_deduction, pension_deduction, unemployment_employee_share,
};
pub use forward::{PayrollEvaluation, evaluate};
pub use gratuity::{GratuityResult, calculate_gratuity};
pub use income_tax::{IncomeTaxResult, calculate_income_tax, tax_base};
pub use solver::{DEFAULT_MAX_ITERATIONS, PayrollSolver, SolverConfig, solve};
