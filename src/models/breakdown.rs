//! Payroll breakdown models.
//!
//! This module contains the [`PayrollBreakdown`] produced by the solver, the
//! audit structures explaining how it was reached, and the [`SolverReport`]
//! envelope returned to reporting layers.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every line item of a solved payroll.
///
/// All amounts are whole currency units, truncated toward zero at each
/// deduction line.
///
/// The employee-side identities hold exactly:
/// `taxable_compensation = base_salary + gratuity`,
/// `net_pay = taxable_compensation - total_deductions`,
/// `take_home_pay = net_pay + non_taxable_allowances` and
/// `total_employer_cost = gross_compensation + total_employer_contributions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Legal gratuity, after the cap.
    pub gratuity: Decimal,
    /// The gratuity cap that was applied.
    pub gratuity_cap: Decimal,
    /// Base salary plus gratuity.
    pub taxable_compensation: Decimal,
    /// Transport and meal allowances.
    pub non_taxable_allowances: Decimal,
    /// Taxable compensation plus allowances.
    pub gross_compensation: Decimal,
    /// Pension base after the legal cap.
    pub pension_base: Decimal,
    /// Unemployment-insurance base after the legal cap.
    pub unemployment_base: Decimal,
    /// Pension contribution including provider commission.
    pub pension_deduction: Decimal,
    /// Health contribution actually withheld.
    pub health_deduction: Decimal,
    /// Employee share of unemployment insurance.
    pub unemployment_insurance: Decimal,
    /// Base used to select the tax bracket.
    pub tax_base: Decimal,
    /// Monthly income tax.
    pub income_tax: Decimal,
    /// Sum of all employee deductions.
    pub total_deductions: Decimal,
    /// Net produced by the taxable compensation alone.
    pub net_pay: Decimal,
    /// Net pay plus allowances.
    pub take_home_pay: Decimal,
    /// Employer disability and survivorship insurance.
    pub disability_insurance: Decimal,
    /// Employer share of unemployment insurance.
    pub employer_unemployment: Decimal,
    /// Employer occupational-accident insurance.
    pub accident_insurance: Decimal,
    /// Sum of employer contributions.
    pub total_employer_contributions: Decimal,
    /// Gross compensation plus employer contributions.
    pub total_employer_cost: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent a result but may
/// deserve a second look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use net_to_gross::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The breakdown together with the provenance of the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverReport {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// Jurisdiction code of the rule set used.
    pub rule_set_code: String,
    /// Effective date of the rule set used.
    pub effective_date: NaiveDate,
    /// Bisection iterations needed to converge.
    pub iterations: u32,
    /// The solved breakdown.
    pub breakdown: PayrollBreakdown,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
