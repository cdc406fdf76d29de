//! Rule set model: the jurisdiction's payroll parameters for one period.
//!
//! A [`RuleSet`] is built once per period from a [`RuleDefinition`] (usually
//! loaded from YAML by [`crate::config::ConfigLoader`]) and the index values
//! supplied by the caller. It is validated on construction and never mutated
//! afterwards, so it can be shared freely between concurrent calculations.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest currency amount accepted as an input: targets, allowances,
/// minimum wage and index values (10^15).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Largest quantity accepted when expressed in indexed or tax units (10^6).
pub const MAX_UNITS: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Largest base salary the forward model evaluates (10^21).
///
/// Inputs held under [`MAX_AMOUNT`] and [`MAX_UNITS`] keep every product in
/// the forward model well inside `Decimal`'s range up to this base.
pub const MAX_BASE_SALARY: Decimal = Decimal::from_parts(0xDEA0_0000, 0x35C9_ADC5, 0x36, false, 0);

/// Index values in force for one calculation.
///
/// Both values come from an external provider (live lookup or published
/// fallback). The engine only requires that they are positive.
///
/// # Example
///
/// ```
/// use net_to_gross::models::IndexValues;
/// use rust_decimal::Decimal;
///
/// let indices = IndexValues::new(Decimal::new(38000, 0), Decimal::new(67000, 0));
/// assert!(indices.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexValues {
    /// Currency value of one indexed unit of account (caps are expressed in it).
    pub indexed_unit_value: Decimal,
    /// Currency value of one tax unit (tax brackets are expressed in it).
    pub tax_unit_value: Decimal,
}

impl IndexValues {
    /// Creates a new pair of index values.
    pub fn new(indexed_unit_value: Decimal, tax_unit_value: Decimal) -> Self {
        Self {
            indexed_unit_value,
            tax_unit_value,
        }
    }

    /// Checks that both values are strictly positive and at most [`MAX_AMOUNT`].
    pub fn validate(&self) -> EngineResult<()> {
        for (name, value) in [
            ("indexed unit value", self.indexed_unit_value),
            ("tax unit value", self.tax_unit_value),
        ] {
            if value <= Decimal::ZERO || value > MAX_AMOUNT {
                return Err(invalid(format!(
                    "{} must be in (0, {}], got {}",
                    name, MAX_AMOUNT, value
                )));
            }
        }
        Ok(())
    }
}

/// A single income tax bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound in tax units. `None` marks the open-ended top bracket.
    pub upper_bound_units: Option<Decimal>,
    /// Marginal rate applied to the whole taxable base (e.g., 0.04 for 4%).
    pub marginal_rate: Decimal,
    /// Fixed rebate in tax units subtracted from the gross tax.
    pub rebate_units: Decimal,
}

impl TaxBracket {
    /// Returns the upper bound converted to currency, or `None` for the top bracket.
    pub fn upper_bound(&self, tax_unit_value: Decimal) -> Option<Decimal> {
        self.upper_bound_units.map(|units| units * tax_unit_value)
    }

    /// Returns true if `base` does not exceed this bracket's upper bound.
    pub fn covers(&self, base: Decimal, tax_unit_value: Decimal) -> bool {
        match self.upper_bound(tax_unit_value) {
            Some(bound) => base <= bound,
            None => true,
        }
    }
}

/// An ordered, validated table of progressive tax brackets.
///
/// Upper bounds are strictly increasing and the last bracket is open-ended,
/// so every non-negative base matches exactly one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaxBracketTable {
    brackets: Vec<TaxBracket>,
}

impl TaxBracketTable {
    /// Validates and wraps a list of brackets.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRuleSet`] if the table is empty, bounds
    /// are not strictly increasing, an open-ended bracket is not last, the
    /// last bracket is bounded, or a rate or rebate is out of range.
    pub fn new(brackets: Vec<TaxBracket>) -> EngineResult<Self> {
        let Some(last) = brackets.last() else {
            return Err(invalid("tax bracket table is empty"));
        };
        if last.upper_bound_units.is_some() {
            return Err(invalid("last tax bracket must be open-ended"));
        }

        let mut previous: Option<Decimal> = None;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.marginal_rate < Decimal::ZERO || bracket.marginal_rate >= Decimal::ONE {
                return Err(invalid(format!(
                    "tax bracket {} has marginal rate {} outside [0, 1)",
                    index, bracket.marginal_rate
                )));
            }
            if bracket.rebate_units < Decimal::ZERO || bracket.rebate_units > MAX_UNITS {
                return Err(invalid(format!(
                    "tax bracket {} has rebate {} outside [0, {}]",
                    index, bracket.rebate_units, MAX_UNITS
                )));
            }

            let is_last = index + 1 == brackets.len();
            match bracket.upper_bound_units {
                None if !is_last => {
                    return Err(invalid(format!(
                        "tax bracket {} is open-ended but not last",
                        index
                    )));
                }
                None => {}
                Some(bound) => {
                    if bound <= Decimal::ZERO || bound > MAX_UNITS {
                        return Err(invalid(format!(
                            "tax bracket {} has upper bound {} outside (0, {}]",
                            index, bound, MAX_UNITS
                        )));
                    }
                    if let Some(prev) = previous.filter(|&prev| bound <= prev) {
                        return Err(invalid(format!(
                            "tax bracket upper bounds must be strictly increasing ({} after {})",
                            bound, prev
                        )));
                    }
                    previous = Some(bound);
                }
            }
        }

        Ok(Self { brackets })
    }

    /// Returns the brackets in ascending order.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Finds the first bracket whose upper bound is not exceeded by `base`.
    ///
    /// Upper bounds are closed: a base exactly at a bound uses that bracket.
    /// Returns the bracket's index along with the bracket.
    pub fn bracket_for(&self, base: Decimal, tax_unit_value: Decimal) -> (usize, &TaxBracket) {
        let top = self.brackets.len() - 1;
        let index = self
            .brackets
            .iter()
            .position(|b| b.covers(base, tax_unit_value))
            .unwrap_or(top);
        (index, &self.brackets[index])
    }

    /// Returns the highest marginal rate in the table.
    pub fn max_marginal_rate(&self) -> Decimal {
        self.brackets
            .iter()
            .map(|b| b.marginal_rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

/// How a resolved pension provider contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PensionPlan {
    /// The sentinel "no pension" provider: nothing is withheld.
    NotAffiliated,
    /// Affiliated to a provider charging this commission percentage.
    Affiliated {
        /// Commission as a percentage of the pension base (e.g., 1.44).
        commission_percent: Decimal,
    },
}

/// Pension commission percentages keyed by provider name.
///
/// Provider names are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionRateTable {
    /// Provider name meaning "no pension contribution".
    pub no_pension_provider: String,
    /// Commission percentage by provider name.
    pub commissions: BTreeMap<String, Decimal>,
}

impl PensionRateTable {
    fn normalized(self) -> EngineResult<Self> {
        let no_pension_provider = self.no_pension_provider.trim().to_lowercase();
        if no_pension_provider.is_empty() {
            return Err(invalid("no-pension provider name must not be empty"));
        }

        let mut commissions = BTreeMap::new();
        for (name, percent) in self.commissions {
            if percent < Decimal::ZERO {
                return Err(invalid(format!(
                    "pension provider '{}' has negative commission {}",
                    name, percent
                )));
            }
            let key = name.trim().to_lowercase();
            if key == no_pension_provider {
                return Err(invalid(format!(
                    "pension provider '{}' collides with the no-pension provider",
                    name
                )));
            }
            if commissions.insert(key, percent).is_some() {
                return Err(invalid(format!("duplicate pension provider '{}'", name)));
            }
        }

        Ok(Self {
            no_pension_provider,
            commissions,
        })
    }

    /// Resolves a provider name to its pension plan.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownPensionProvider`] if the name matches
    /// neither a provider nor the no-pension sentinel.
    pub fn resolve(&self, provider: &str) -> EngineResult<PensionPlan> {
        let key = provider.trim().to_lowercase();
        if key == self.no_pension_provider {
            return Ok(PensionPlan::NotAffiliated);
        }
        self.commissions
            .get(&key)
            .map(|&commission_percent| PensionPlan::Affiliated { commission_percent })
            .ok_or_else(|| EngineError::UnknownPensionProvider {
                provider: provider.to_string(),
            })
    }

    /// Returns all provider names, the no-pension sentinel last.
    pub fn provider_names(&self) -> Vec<&str> {
        self.commissions
            .keys()
            .map(String::as_str)
            .chain(std::iter::once(self.no_pension_provider.as_str()))
            .collect()
    }
}

/// Legal caps on contribution bases, in indexed units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionCaps {
    /// Cap on the pension and health base.
    pub pension_units: Decimal,
    /// Cap on the unemployment-insurance base.
    pub unemployment_units: Decimal,
}

/// Employer unemployment-insurance rates by contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerUnemploymentRates {
    /// Rate for indefinite-term contracts.
    pub indefinite: Decimal,
    /// Rate for fixed-term contracts.
    pub fixed_term: Decimal,
    /// Flat rate for proprietor/owner contracts.
    pub proprietor_owner: Decimal,
}

/// Fixed statutory percentages and formula constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryRates {
    /// Share of the base paid as gratuity before the cap (0.25).
    pub gratuity_fraction: Decimal,
    /// Minimum-wage multiple in the gratuity cap numerator (4.75).
    pub gratuity_cap_multiplier: Decimal,
    /// Divisor of the gratuity cap (12 months).
    pub gratuity_cap_divisor: Decimal,
    /// Mandatory pension rate before the provider commission (0.10).
    pub pension_rate: Decimal,
    /// Statutory health rate (0.07).
    pub health_rate: Decimal,
    /// Employee unemployment-insurance rate (0.006).
    pub unemployment_employee_rate: Decimal,
    /// Employer unemployment-insurance rates.
    pub unemployment_employer_rates: EmployerUnemploymentRates,
    /// Employer disability and survivorship insurance rate (0.0149).
    pub disability_insurance_rate: Decimal,
    /// Employer occupational-accident insurance rate (0.0093).
    pub accident_insurance_rate: Decimal,
    /// Fraction of the minimum wage below which a taxable net is rejected (0.4).
    pub minimum_net_fraction: Decimal,
}

impl StatutoryRates {
    fn validate(&self) -> EngineResult<()> {
        let unit_rates = [
            ("gratuity_fraction", self.gratuity_fraction),
            ("pension_rate", self.pension_rate),
            ("health_rate", self.health_rate),
            ("unemployment_employee_rate", self.unemployment_employee_rate),
            ("unemployment_employer_rates.indefinite", self.unemployment_employer_rates.indefinite),
            ("unemployment_employer_rates.fixed_term", self.unemployment_employer_rates.fixed_term),
            (
                "unemployment_employer_rates.proprietor_owner",
                self.unemployment_employer_rates.proprietor_owner,
            ),
            ("disability_insurance_rate", self.disability_insurance_rate),
            ("accident_insurance_rate", self.accident_insurance_rate),
        ];
        for (name, rate) in unit_rates {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                return Err(invalid(format!("{} must be in [0, 1), got {}", name, rate)));
            }
        }
        if self.gratuity_cap_multiplier < Decimal::ZERO || self.gratuity_cap_multiplier > MAX_UNITS
        {
            return Err(invalid(format!(
                "gratuity_cap_multiplier must be in [0, {}], got {}",
                MAX_UNITS, self.gratuity_cap_multiplier
            )));
        }
        if self.gratuity_cap_divisor <= Decimal::ZERO {
            return Err(invalid("gratuity_cap_divisor must be positive"));
        }
        if self.minimum_net_fraction <= Decimal::ZERO || self.minimum_net_fraction > Decimal::ONE {
            return Err(invalid(format!(
                "minimum_net_fraction must be in (0, 1], got {}",
                self.minimum_net_fraction
            )));
        }
        Ok(())
    }
}

/// The serialized form of one period's payroll rules.
///
/// This is what a rule file under `config/<jurisdiction>/rules/` contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// First date on which these rules apply.
    pub effective_date: NaiveDate,
    /// Legal monthly minimum wage.
    pub minimum_wage: Decimal,
    /// Contribution caps in indexed units.
    pub caps: ContributionCaps,
    /// Statutory percentages.
    pub rates: StatutoryRates,
    /// Pension commission table.
    pub pension: PensionRateTable,
    /// Progressive tax brackets in ascending order.
    pub tax_brackets: Vec<TaxBracket>,
}

/// An immutable, validated snapshot of one jurisdiction's payroll rules.
///
/// # Example
///
/// ```no_run
/// use net_to_gross::config::ConfigLoader;
/// use net_to_gross::models::IndexValues;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/cl")?;
/// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let indices = IndexValues::new(Decimal::new(38000, 0), Decimal::new(67000, 0));
/// let rule_set = loader.rule_set(date, indices)?;
/// println!("Gratuity cap: {}", rule_set.gratuity_cap());
/// # Ok::<(), net_to_gross::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    code: String,
    effective_date: NaiveDate,
    indices: IndexValues,
    minimum_wage: Decimal,
    caps: ContributionCaps,
    rates: StatutoryRates,
    pension: PensionRateTable,
    tax_brackets: TaxBracketTable,
    gratuity_cap: Decimal,
    pension_cap: Decimal,
    unemployment_cap: Decimal,
}

impl RuleSet {
    /// Builds a rule set from a definition and the current index values.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRuleSet`] if any parameter is out of its
    /// legal range or the bracket table is malformed.
    pub fn new(
        code: impl Into<String>,
        definition: RuleDefinition,
        indices: IndexValues,
    ) -> EngineResult<Self> {
        indices.validate()?;
        if definition.minimum_wage <= Decimal::ZERO || definition.minimum_wage > MAX_AMOUNT {
            return Err(invalid(format!(
                "minimum wage must be in (0, {}], got {}",
                MAX_AMOUNT, definition.minimum_wage
            )));
        }
        let caps = definition.caps;
        for units in [caps.pension_units, caps.unemployment_units] {
            if units <= Decimal::ZERO || units > MAX_UNITS {
                return Err(invalid(format!(
                    "contribution caps must be in (0, {}] units, got {}",
                    MAX_UNITS, units
                )));
            }
        }
        let rates = definition.rates;
        rates.validate()?;

        let gratuity_cap = rates
            .gratuity_cap_multiplier
            .checked_mul(definition.minimum_wage)
            .and_then(|numerator| numerator.checked_div(rates.gratuity_cap_divisor))
            .map(|cap| cap.trunc())
            .filter(|cap| *cap <= MAX_BASE_SALARY)
            .ok_or_else(|| invalid("gratuity cap is out of range"))?;
        let pension_cap = (caps.pension_units * indices.indexed_unit_value).trunc();
        let unemployment_cap = (caps.unemployment_units * indices.indexed_unit_value).trunc();

        Ok(Self {
            code: code.into(),
            effective_date: definition.effective_date,
            indices,
            minimum_wage: definition.minimum_wage,
            caps,
            rates,
            pension: definition.pension.normalized()?,
            tax_brackets: TaxBracketTable::new(definition.tax_brackets)?,
            gratuity_cap,
            pension_cap,
            unemployment_cap,
        })
    }

    /// Returns the jurisdiction code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the date these rules took effect.
    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    /// Returns the index values in force.
    pub fn indices(&self) -> IndexValues {
        self.indices
    }

    /// Returns the legal minimum wage.
    pub fn minimum_wage(&self) -> Decimal {
        self.minimum_wage
    }

    /// Returns the statutory rates.
    pub fn rates(&self) -> &StatutoryRates {
        &self.rates
    }

    /// Returns the pension commission table.
    pub fn pension_rates(&self) -> &PensionRateTable {
        &self.pension
    }

    /// Returns the tax bracket table.
    pub fn tax_brackets(&self) -> &TaxBracketTable {
        &self.tax_brackets
    }

    /// Gratuity cap in whole currency units: `multiplier x minimum_wage / divisor`.
    pub fn gratuity_cap(&self) -> Decimal {
        self.gratuity_cap
    }

    /// Pension and health base cap in whole currency units.
    pub fn pension_cap(&self) -> Decimal {
        self.pension_cap
    }

    /// Unemployment-insurance base cap in whole currency units.
    pub fn unemployment_cap(&self) -> Decimal {
        self.unemployment_cap
    }

    /// Smallest taxable net the solver accepts as a target.
    pub fn minimum_taxable_net(&self) -> Decimal {
        self.minimum_wage * self.rates.minimum_net_fraction
    }
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::InvalidRuleSet {
        message: message.into(),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn expect_invalid(result: EngineResult<TaxBracketTable>, fragment: &str) {
        match result {
            Err(EngineError::InvalidRuleSet { message }) => {
                assert!(
                    message.contains(fragment),
                    "expected '{}' in '{}'",
                    fragment,
                    message
                );
            }
            other => panic!("Expected InvalidRuleSet, got {:?}", other),
        }
    }

    #[test]
    fn test_standard_rule_set_is_valid() {
        let rule_set = standard_rule_set();
        assert_eq!(rule_set.code(), "CL");
        assert_eq!(rule_set.tax_brackets().brackets().len(), 8);
        assert_eq!(rule_set.tax_brackets().max_marginal_rate(), dec("0.4"));
    }

    #[test]
    fn test_gratuity_cap_is_truncated() {
        // 4.75 x 529000 / 12 = 209395.8333...
        assert_eq!(standard_rule_set().gratuity_cap(), dec("209395"));
    }

    #[test]
    fn test_caps_convert_indexed_units_to_currency() {
        let rule_set = standard_rule_set();
        assert_eq!(rule_set.pension_cap(), dec("3336400"));
        assert_eq!(rule_set.unemployment_cap(), dec("5012200"));
    }

    #[test]
    fn test_minimum_taxable_net() {
        assert_eq!(standard_rule_set().minimum_taxable_net(), dec("211600"));
    }

    #[test]
    fn test_bracket_boundary_uses_lower_bracket() {
        let table = TaxBracketTable::new(standard_brackets()).unwrap();
        let utm = dec("67000");

        // 13.5 UTM exactly stays in the exempt bracket.
        let (index, bracket) = table.bracket_for(dec("904500"), utm);
        assert_eq!(index, 0);
        assert_eq!(bracket.marginal_rate, Decimal::ZERO);

        let (index, _) = table.bracket_for(dec("904501"), utm);
        assert_eq!(index, 1);

        // 310 UTM exactly stays below the top bracket.
        let (index, _) = table.bracket_for(dec("20770000"), utm);
        assert_eq!(index, 6);
        let (index, bracket) = table.bracket_for(dec("20770001"), utm);
        assert_eq!(index, 7);
        assert!(bracket.upper_bound_units.is_none());
    }

    #[test]
    fn test_zero_base_matches_first_bracket() {
        let table = TaxBracketTable::new(standard_brackets()).unwrap();
        assert_eq!(table.bracket_for(Decimal::ZERO, dec("67000")).0, 0);
    }

    #[test]
    fn test_empty_bracket_table_rejected() {
        expect_invalid(TaxBracketTable::new(vec![]), "empty");
    }

    #[test]
    fn test_bounded_top_bracket_rejected() {
        let brackets = vec![bracket(Some("10"), "0", "0"), bracket(Some("20"), "0.1", "1")];
        expect_invalid(TaxBracketTable::new(brackets), "open-ended");
    }

    #[test]
    fn test_open_ended_bracket_in_middle_rejected() {
        let brackets = vec![
            bracket(Some("10"), "0", "0"),
            bracket(None, "0.1", "1"),
            bracket(None, "0.2", "3"),
        ];
        expect_invalid(TaxBracketTable::new(brackets), "not last");
    }

    #[test]
    fn test_non_monotonic_bounds_rejected() {
        let brackets = vec![
            bracket(Some("30"), "0", "0"),
            bracket(Some("30"), "0.04", "0.54"),
            bracket(None, "0.08", "1.74"),
        ];
        expect_invalid(TaxBracketTable::new(brackets), "strictly increasing");
    }

    #[test]
    fn test_rate_out_of_range_rejected() {
        let brackets = vec![bracket(Some("10"), "0", "0"), bracket(None, "1.2", "0")];
        expect_invalid(TaxBracketTable::new(brackets), "marginal rate");
    }

    #[test]
    fn test_non_positive_index_values_rejected() {
        let indices = IndexValues::new(Decimal::ZERO, dec("67000"));
        let result = RuleSet::new("CL", standard_definition(), indices);
        assert!(matches!(result, Err(EngineError::InvalidRuleSet { .. })));
    }

    #[test]
    fn test_invalid_statutory_rate_rejected() {
        let mut definition = standard_definition();
        definition.rates.health_rate = dec("1.5");
        let result = RuleSet::new("CL", definition, standard_indices());
        match result {
            Err(EngineError::InvalidRuleSet { message }) => {
                assert!(message.contains("health_rate"));
            }
            other => panic!("Expected InvalidRuleSet, got {:?}", other),
        }
    }

    #[test]
    fn test_limits_match_their_documented_values() {
        assert_eq!(MAX_AMOUNT, dec("1000000000000000"));
        assert_eq!(MAX_UNITS, dec("1000000"));
        assert_eq!(MAX_BASE_SALARY, dec("1000000000000000000000"));
    }

    #[test]
    fn test_index_values_above_ceiling_rejected() {
        let indices = IndexValues::new(dec("1000000000000000000000000000"), dec("67000"));
        match RuleSet::new("CL", standard_definition(), indices) {
            Err(EngineError::InvalidRuleSet { message }) => {
                assert!(message.contains("indexed unit value"));
            }
            other => panic!("Expected InvalidRuleSet, got {:?}", other),
        }

        let indices = IndexValues::new(dec("38000"), MAX_AMOUNT + Decimal::ONE);
        assert!(indices.validate().is_err());
        assert!(IndexValues::new(MAX_AMOUNT, MAX_AMOUNT).validate().is_ok());
    }

    #[test]
    fn test_caps_at_largest_indices_do_not_overflow() {
        let mut definition = standard_definition();
        definition.caps.pension_units = MAX_UNITS;
        let rule_set =
            RuleSet::new("CL", definition, IndexValues::new(MAX_AMOUNT, MAX_AMOUNT)).unwrap();
        assert_eq!(rule_set.pension_cap(), MAX_BASE_SALARY);
    }

    #[test]
    fn test_contribution_caps_above_ceiling_rejected() {
        let mut definition = standard_definition();
        definition.caps.unemployment_units = dec("10000000000000000000000");
        let result = RuleSet::new("CL", definition, standard_indices());
        assert!(matches!(result, Err(EngineError::InvalidRuleSet { .. })));
    }

    #[test]
    fn test_minimum_wage_above_ceiling_rejected() {
        let mut definition = standard_definition();
        definition.minimum_wage = dec("10000000000000000000000000000");
        let result = RuleSet::new("CL", definition, standard_indices());
        assert!(matches!(result, Err(EngineError::InvalidRuleSet { .. })));
    }

    #[test]
    fn test_overflowing_gratuity_cap_rejected() {
        let mut definition = standard_definition();
        definition.rates.gratuity_cap_divisor = dec("0.0000000000000000000000000001");
        match RuleSet::new("CL", definition, standard_indices()) {
            Err(EngineError::InvalidRuleSet { message }) => {
                assert!(message.contains("gratuity cap"));
            }
            other => panic!("Expected InvalidRuleSet, got {:?}", other),
        }
    }

    #[test]
    fn test_bracket_units_above_ceiling_rejected() {
        let brackets = vec![
            bracket(Some("100000000000000000000"), "0", "0"),
            bracket(None, "0.1", "1"),
        ];
        expect_invalid(TaxBracketTable::new(brackets), "upper bound");

        let brackets = vec![
            bracket(Some("10"), "0", "0"),
            bracket(None, "0.1", "100000000000000000000"),
        ];
        expect_invalid(TaxBracketTable::new(brackets), "rebate");
    }

    #[test]
    fn test_pension_provider_lookup_is_case_insensitive() {
        let rule_set = standard_rule_set();
        let plan = rule_set.pension_rates().resolve("Capital").unwrap();
        assert_eq!(
            plan,
            PensionPlan::Affiliated {
                commission_percent: dec("1.44")
            }
        );
    }

    #[test]
    fn test_no_pension_sentinel_resolves() {
        let rule_set = standard_rule_set();
        assert_eq!(
            rule_set.pension_rates().resolve("NONE").unwrap(),
            PensionPlan::NotAffiliated
        );
    }

    #[test]
    fn test_unknown_provider_returns_error() {
        let rule_set = standard_rule_set();
        match rule_set.pension_rates().resolve("acme") {
            Err(EngineError::UnknownPensionProvider { provider }) => {
                assert_eq!(provider, "acme");
            }
            other => panic!("Expected UnknownPensionProvider, got {:?}", other),
        }
    }

    #[test]
    fn test_provider_colliding_with_sentinel_rejected() {
        let mut definition = standard_definition();
        definition
            .pension
            .commissions
            .insert("None".to_string(), dec("1"));
        let result = RuleSet::new("CL", definition, standard_indices());
        assert!(matches!(result, Err(EngineError::InvalidRuleSet { .. })));
    }

    #[test]
    fn test_provider_names_list_sentinel_last() {
        let rule_set = standard_rule_set();
        let names = rule_set.pension_rates().provider_names();
        assert_eq!(names.last(), Some(&"none"));
        assert!(names.contains(&"capital"));
    }
}
