//! Legal gratuity calculation.
//!
//! The gratuity is a fixed fraction of the base salary, limited to a cap
//! derived from the minimum wage.

use rust_decimal::Decimal;

use crate::models::RuleSet;

/// The gratuity paid on a base salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GratuityResult {
    /// The gratuity amount, in whole currency units.
    pub amount: Decimal,
    /// The cap in force.
    pub cap: Decimal,
    /// True if the cap limited the amount.
    pub capped: bool,
}

/// Computes `min(base x fraction, cap)`, truncated to whole units.
///
/// # Examples
///
/// ```no_run
/// use net_to_gross::calculation::calculate_gratuity;
/// use net_to_gross::config::ConfigLoader;
/// use net_to_gross::models::IndexValues;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/cl")?;
/// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let rules = loader.rule_set(date, IndexValues::new(Decimal::new(38000, 0), Decimal::new(67000, 0)))?;
///
/// let gratuity = calculate_gratuity(Decimal::new(400_000, 0), &rules);
/// assert_eq!(gratuity.amount, Decimal::new(100_000, 0));
/// # Ok::<(), net_to_gross::error::EngineError>(())
/// ```
pub fn calculate_gratuity(base_salary: Decimal, rule_set: &RuleSet) -> GratuityResult {
    let cap = rule_set.gratuity_cap();
    let uncapped = (base_salary * rule_set.rates().gratuity_fraction).trunc();

    if uncapped > cap {
        GratuityResult {
            amount: cap,
            cap,
            capped: true,
        }
    } else {
        GratuityResult {
            amount: uncapped,
            cap,
            capped: false,
        }
    }
}
