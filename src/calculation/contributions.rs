//! Social-security contribution calculations.
//!
//! Pension, health and unemployment insurance for the employee, and the
//! employer-side levies. Every line is truncated toward zero to whole
//! currency units.

use rust_decimal::Decimal;

use crate::models::{ContractType, HealthScheme, PensionPlan, RuleSet, StatutoryRates};

/// Contribution bases after the legal caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionBases {
    /// Base for pension, health and employer insurance.
    pub pension: Decimal,
    /// Base for unemployment insurance.
    pub unemployment: Decimal,
}

/// Caps the taxable compensation at the pension and unemployment ceilings.
pub fn capped_bases(taxable_compensation: Decimal, rule_set: &RuleSet) -> ContributionBases {
    ContributionBases {
        pension: taxable_compensation.min(rule_set.pension_cap()),
        unemployment: taxable_compensation.min(rule_set.unemployment_cap()),
    }
}

/// Pension contribution: mandatory rate plus the provider commission.
///
/// Zero for proprietor/owner contracts and for the no-pension provider.
pub fn pension_deduction(
    pension_base: Decimal,
    contract_type: ContractType,
    plan: PensionPlan,
    rates: &StatutoryRates,
) -> Decimal {
    if !contract_type.contributes_to_pension() {
        return Decimal::ZERO;
    }
    match plan {
        PensionPlan::NotAffiliated => Decimal::ZERO,
        PensionPlan::Affiliated { commission_percent } => {
            let rate = rates.pension_rate + commission_percent / Decimal::ONE_HUNDRED;
            (pension_base * rate).trunc()
        }
    }
}

/// Employee unemployment-insurance share, charged on indefinite contracts only.
pub fn unemployment_employee_share(
    unemployment_base: Decimal,
    contract_type: ContractType,
    rates: &StatutoryRates,
) -> Decimal {
    if contract_type.pays_unemployment_share() {
        (unemployment_base * rates.unemployment_employee_rate).trunc()
    } else {
        Decimal::ZERO
    }
}

/// The health contribution and its tax-deductible portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthDeduction {
    /// Statutory minimum; the only part deductible from the tax base.
    pub legal_minimum: Decimal,
    /// Amount actually withheld.
    pub amount: Decimal,
}

impl HealthDeduction {
    /// Portion of a private plan above the statutory minimum.
    pub fn excess(&self) -> Decimal {
        self.amount - self.legal_minimum
    }
}

/// Computes the health contribution for the requested scheme.
///
/// A private plan never withholds less than the statutory minimum.
pub fn health_deduction(
    pension_base: Decimal,
    scheme: HealthScheme,
    rule_set: &RuleSet,
) -> HealthDeduction {
    let legal_minimum = (pension_base * rule_set.rates().health_rate).trunc();
    let amount = match scheme {
        HealthScheme::Statutory => legal_minimum,
        HealthScheme::PrivatePlan { plan_value_units } => {
            let plan_cost = (plan_value_units * rule_set.indices().indexed_unit_value).trunc();
            plan_cost.max(legal_minimum)
        }
    };
    HealthDeduction {
        legal_minimum,
        amount,
    }
}

/// Employer-side contributions, informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployerContributions {
    /// Disability and survivorship insurance.
    pub disability_insurance: Decimal,
    /// Employer unemployment-insurance share.
    pub unemployment: Decimal,
    /// Occupational-accident insurance.
    pub accident_insurance: Decimal,
}

impl EmployerContributions {
    /// Sum of all employer lines.
    pub fn total(&self) -> Decimal {
        self.disability_insurance + self.unemployment + self.accident_insurance
    }
}

/// Computes the employer contributions on the capped bases.
pub fn employer_contributions(
    bases: ContributionBases,
    contract_type: ContractType,
    rates: &StatutoryRates,
) -> EmployerContributions {
    EmployerContributions {
        disability_insurance: (bases.pension * rates.disability_insurance_rate).trunc(),
        unemployment: (bases.unemployment * contract_type.employer_unemployment_rate(rates))
            .trunc(),
        accident_insurance: (bases.pension * rates.accident_insurance_rate).trunc(),
    }
}
