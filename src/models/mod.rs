//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod breakdown;
mod request;
pub(crate) mod rule_set;

pub use breakdown::{AuditStep, AuditTrace, AuditWarning, PayrollBreakdown, SolverReport};
pub use request::{ContractType, HealthScheme, PayrollRequest};
pub use rule_set::{
    ContributionCaps, EmployerUnemploymentRates, IndexValues, MAX_AMOUNT, MAX_BASE_SALARY,
    MAX_UNITS, PensionPlan, PensionRateTable, RuleDefinition, RuleSet, StatutoryRates, TaxBracket,
    TaxBracketTable,
};
