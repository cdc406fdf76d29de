//! Progressive income tax.
//!
//! The whole tax base is taxed at the marginal rate of its bracket, and the
//! bracket's fixed rebate is subtracted. Rebates are chosen by the tax
//! authority so the schedule is continuous at every bound.

use rust_decimal::Decimal;

use crate::models::RuleSet;

/// The income tax owed on a tax base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeTaxResult {
    /// Tax owed, in whole currency units.
    pub amount: Decimal,
    /// Index of the matched bracket.
    pub bracket_index: usize,
    /// Marginal rate of the matched bracket.
    pub marginal_rate: Decimal,
    /// Rebate of the matched bracket, in currency.
    pub rebate: Decimal,
}

/// Taxable compensation less the deductible contributions, floored at zero.
///
/// Only the statutory health minimum is deductible; a private plan's excess is not.
pub fn tax_base(
    taxable_compensation: Decimal,
    pension: Decimal,
    health_legal_minimum: Decimal,
    unemployment: Decimal,
) -> Decimal {
    (taxable_compensation - pension - health_legal_minimum - unemployment).max(Decimal::ZERO)
}

/// Computes `trunc(max(0, base x rate - rebate x tax_unit))` for the matching bracket.
pub fn calculate_income_tax(tax_base: Decimal, rule_set: &RuleSet) -> IncomeTaxResult {
    let tax_unit_value = rule_set.indices().tax_unit_value;
    let (bracket_index, bracket) = rule_set.tax_brackets().bracket_for(tax_base, tax_unit_value);
    let rebate = bracket.rebate_units * tax_unit_value;
    let amount = (tax_base * bracket.marginal_rate - rebate)
        .max(Decimal::ZERO)
        .trunc();

    IncomeTaxResult {
        amount,
        bracket_index,
        marginal_rate: bracket.marginal_rate,
        rebate,
    }
}
