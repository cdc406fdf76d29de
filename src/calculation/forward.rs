//! Forward payroll model.
//!
//! Given a trial base salary, computes every deduction, the resulting net and
//! the employer contributions. The solver inverts this function.

use rust_decimal::Decimal;

use crate::models::{MAX_BASE_SALARY, PayrollRequest, PensionPlan, RuleSet};

use super::contributions::{
    ContributionBases, EmployerContributions, HealthDeduction, capped_bases,
    employer_contributions, health_deduction, pension_deduction, unemployment_employee_share,
};
use super::gratuity::{GratuityResult, calculate_gratuity};
use super::income_tax::{IncomeTaxResult, calculate_income_tax, tax_base};

/// Every intermediate value of one forward evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayrollEvaluation {
    /// The base salary evaluated, truncated to whole units.
    pub base_salary: Decimal,
    /// Gratuity after the cap.
    pub gratuity: GratuityResult,
    /// Base salary plus gratuity.
    pub taxable_compensation: Decimal,
    /// Capped contribution bases.
    pub bases: ContributionBases,
    /// Pension contribution.
    pub pension: Decimal,
    /// Employee unemployment-insurance share.
    pub unemployment: Decimal,
    /// Health contribution.
    pub health: HealthDeduction,
    /// Base for the income tax.
    pub tax_base: Decimal,
    /// Income tax.
    pub income_tax: IncomeTaxResult,
    /// Taxable compensation less all employee deductions.
    pub net_pay: Decimal,
    /// Employer-side contributions.
    pub employer: EmployerContributions,
}

impl PayrollEvaluation {
    /// Sum of all employee deductions.
    pub fn total_deductions(&self) -> Decimal {
        self.pension + self.health.amount + self.unemployment + self.income_tax.amount
    }
}

/// Runs the forward payroll computation for a trial base salary.
///
/// The base is clamped to `[0, MAX_BASE_SALARY]` and truncated to whole
/// currency units first, so the result only depends on the integer part of
/// `base_salary`. Net pay is a step function of the base. The per-line
/// truncation can make it dip by a couple of units between nearby bases;
/// over steps of 100 or more it never decreases.
///
/// `plan` is the request's pension provider already resolved against the
/// rule set's table.
pub fn evaluate(
    base_salary: Decimal,
    rule_set: &RuleSet,
    request: &PayrollRequest,
    plan: PensionPlan,
) -> PayrollEvaluation {
    let rates = rule_set.rates();
    let contract = request.contract_type;

    let base_salary = base_salary.max(Decimal::ZERO).min(MAX_BASE_SALARY).trunc();
    let gratuity = calculate_gratuity(base_salary, rule_set);
    let taxable_compensation = base_salary + gratuity.amount;

    let bases = capped_bases(taxable_compensation, rule_set);
    let pension = pension_deduction(bases.pension, contract, plan, rates);
    let unemployment = unemployment_employee_share(bases.unemployment, contract, rates);
    let health = health_deduction(bases.pension, request.health_scheme, rule_set);

    let tax_base = tax_base(
        taxable_compensation,
        pension,
        health.legal_minimum,
        unemployment,
    );
    let income_tax = calculate_income_tax(tax_base, rule_set);

    let net_pay =
        taxable_compensation - pension - health.amount - unemployment - income_tax.amount;
    let employer = employer_contributions(bases, contract, rates);

    PayrollEvaluation {
        base_salary,
        gratuity,
        taxable_compensation,
        bases,
        pension,
        unemployment,
        health,
        tax_base,
        income_tax,
        net_pay,
        employer,
    }
}
