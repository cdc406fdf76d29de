//! Payroll request model and related types.
//!
//! This module defines the [`PayrollRequest`] value object along with the
//! closed [`ContractType`] and [`HealthScheme`] enums.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{MAX_AMOUNT, MAX_UNITS, StatutoryRates};

/// The employment contract under which the salary is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Indefinite-term contract.
    Indefinite,
    /// Fixed-term contract.
    FixedTerm,
    /// Proprietor or owner drawing a salary from their own company.
    ProprietorOwner,
}

impl ContractType {
    /// Returns true if the contract withholds a pension contribution.
    pub fn contributes_to_pension(self) -> bool {
        !matches!(self, ContractType::ProprietorOwner)
    }

    /// Returns true if the employee pays a share of unemployment insurance.
    pub fn pays_unemployment_share(self) -> bool {
        matches!(self, ContractType::Indefinite)
    }

    /// Selects the employer unemployment-insurance rate for this contract.
    pub fn employer_unemployment_rate(self, rates: &StatutoryRates) -> Decimal {
        let employer = &rates.unemployment_employer_rates;
        match self {
            ContractType::Indefinite => employer.indefinite,
            ContractType::FixedTerm => employer.fixed_term,
            ContractType::ProprietorOwner => employer.proprietor_owner,
        }
    }

    /// Returns the wire name of the contract type.
    pub fn as_str(self) -> &'static str {
        match self {
            ContractType::Indefinite => "indefinite",
            ContractType::FixedTerm => "fixed_term",
            ContractType::ProprietorOwner => "proprietor_owner",
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The health coverage the employee contributes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum HealthScheme {
    /// The statutory minimum percentage of the pension base.
    #[default]
    Statutory,
    /// A private plan priced in indexed units.
    PrivatePlan {
        /// Monthly plan price in indexed units.
        plan_value_units: Decimal,
    },
}

/// A request to find the gross structure behind a target net pay.
///
/// # Example
///
/// ```
/// use net_to_gross::models::{ContractType, HealthScheme, PayrollRequest};
/// use rust_decimal::Decimal;
///
/// let request = PayrollRequest {
///     target_net_pay: Decimal::new(1_000_000, 0),
///     non_taxable_allowances: Decimal::new(100_000, 0),
///     contract_type: ContractType::Indefinite,
///     pension_provider: "capital".to_string(),
///     health_scheme: HealthScheme::Statutory,
/// };
/// assert!(request.validate().is_ok());
/// assert_eq!(request.target_taxable_net(), Decimal::new(900_000, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// Desired take-home pay, allowances included.
    pub target_net_pay: Decimal,
    /// Transport and meal allowances, outside the tax and contribution bases.
    #[serde(default)]
    pub non_taxable_allowances: Decimal,
    /// The employment contract type.
    pub contract_type: ContractType,
    /// Pension provider name, or the rule set's no-pension sentinel.
    pub pension_provider: String,
    /// Health coverage scheme.
    #[serde(default)]
    pub health_scheme: HealthScheme,
}

impl PayrollRequest {
    /// Checks field-level constraints.
    ///
    /// Amounts are limited to [`MAX_AMOUNT`] and plan prices to
    /// [`MAX_UNITS`]. The allowances-below-target invariant is not checked
    /// here; the solver reports it as an infeasible target.
    pub fn validate(&self) -> EngineResult<()> {
        if self.target_net_pay <= Decimal::ZERO {
            return Err(invalid_field("target_net_pay", "must be positive"));
        }
        if self.target_net_pay > MAX_AMOUNT {
            return Err(invalid_field(
                "target_net_pay",
                format!("must not exceed {}", MAX_AMOUNT),
            ));
        }
        if self.non_taxable_allowances < Decimal::ZERO {
            return Err(invalid_field(
                "non_taxable_allowances",
                "must not be negative",
            ));
        }
        if self.non_taxable_allowances > MAX_AMOUNT {
            return Err(invalid_field(
                "non_taxable_allowances",
                format!("must not exceed {}", MAX_AMOUNT),
            ));
        }
        if self.pension_provider.trim().is_empty() {
            return Err(invalid_field("pension_provider", "must not be empty"));
        }
        match self.health_scheme {
            HealthScheme::PrivatePlan { plan_value_units }
                if plan_value_units < Decimal::ZERO || plan_value_units > MAX_UNITS =>
            {
                Err(invalid_field(
                    "health_scheme.plan_value_units",
                    format!("must be in [0, {}]", MAX_UNITS),
                ))
            }
            _ => Ok(()),
        }
    }

    /// The net the taxable compensation alone must produce.
    pub fn target_taxable_net(&self) -> Decimal {
        self.target_net_pay - self.non_taxable_allowances
    }
}

fn invalid_field(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidRequest {
        field: field.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rule_set::fixtures::{dec, standard_rates};

    fn create_test_request() -> PayrollRequest {
        PayrollRequest {
            target_net_pay: dec("1000000"),
            non_taxable_allowances: dec("100000"),
            contract_type: ContractType::Indefinite,
            pension_provider: "capital".to_string(),
            health_scheme: HealthScheme::Statutory,
        }
    }

    #[test]
    fn test_deserialize_statutory_request() {
        let json = r#"{
            "target_net_pay": "1000000",
            "non_taxable_allowances": "100000",
            "contract_type": "indefinite",
            "pension_provider": "capital"
        }"#;

        let request: PayrollRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.target_net_pay, dec("1000000"));
        assert_eq!(request.contract_type, ContractType::Indefinite);
        assert_eq!(request.health_scheme, HealthScheme::Statutory);
    }

    #[test]
    fn test_deserialize_private_plan_request() {
        let json = r#"{
            "target_net_pay": "2500000",
            "contract_type": "fixed_term",
            "pension_provider": "habitat",
            "health_scheme": { "scheme": "private_plan", "plan_value_units": "4.2" }
        }"#;

        let request: PayrollRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.non_taxable_allowances, Decimal::ZERO);
        assert_eq!(request.contract_type, ContractType::FixedTerm);
        assert_eq!(
            request.health_scheme,
            HealthScheme::PrivatePlan {
                plan_value_units: dec("4.2")
            }
        );
    }

    #[test]
    fn test_unknown_contract_type_fails_to_parse() {
        let json = r#"{
            "target_net_pay": "1000000",
            "contract_type": "temporary",
            "pension_provider": "capital"
        }"#;
        assert!(serde_json::from_str::<PayrollRequest>(json).is_err());
    }

    #[test]
    fn test_contract_behaviour() {
        assert!(ContractType::Indefinite.contributes_to_pension());
        assert!(ContractType::FixedTerm.contributes_to_pension());
        assert!(!ContractType::ProprietorOwner.contributes_to_pension());

        assert!(ContractType::Indefinite.pays_unemployment_share());
        assert!(!ContractType::FixedTerm.pays_unemployment_share());
        assert!(!ContractType::ProprietorOwner.pays_unemployment_share());
    }

    #[test]
    fn test_employer_unemployment_rate_by_contract() {
        let rates = standard_rates();
        assert_eq!(
            ContractType::Indefinite.employer_unemployment_rate(&rates),
            dec("0.024")
        );
        assert_eq!(
            ContractType::FixedTerm.employer_unemployment_rate(&rates),
            dec("0.03")
        );
        assert_eq!(
            ContractType::ProprietorOwner.employer_unemployment_rate(&rates),
            dec("0.024")
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_target() {
        let mut request = create_test_request();
        request.target_net_pay = Decimal::ZERO;
        match request.validate() {
            Err(EngineError::InvalidRequest { field, .. }) => {
                assert_eq!(field, "target_net_pay");
            }
            other => panic!("Expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_negative_allowances() {
        let mut request = create_test_request();
        request.non_taxable_allowances = dec("-1");
        assert!(matches!(
            request.validate(),
            Err(EngineError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_plan_value() {
        let mut request = create_test_request();
        request.health_scheme = HealthScheme::PrivatePlan {
            plan_value_units: dec("-0.5"),
        };
        assert!(matches!(
            request.validate(),
            Err(EngineError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_amounts_above_ceiling() {
        let mut request = create_test_request();
        request.target_net_pay = dec("40000000000000000000000000000");
        match request.validate() {
            Err(EngineError::InvalidRequest { field, .. }) => {
                assert_eq!(field, "target_net_pay");
            }
            other => panic!("Expected InvalidRequest, got {:?}", other),
        }

        let mut request = create_test_request();
        request.non_taxable_allowances = MAX_AMOUNT + Decimal::ONE;
        assert!(matches!(
            request.validate(),
            Err(EngineError::InvalidRequest { .. })
        ));

        let mut request = create_test_request();
        request.target_net_pay = MAX_AMOUNT;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_plan_value_above_ceiling() {
        let mut request = create_test_request();
        request.health_scheme = HealthScheme::PrivatePlan {
            plan_value_units: dec("1000000000000000000000000000"),
        };
        match request.validate() {
            Err(EngineError::InvalidRequest { field, .. }) => {
                assert_eq!(field, "health_scheme.plan_value_units");
            }
            other => panic!("Expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_allowances_above_target_pass_field_validation() {
        let mut request = create_test_request();
        request.non_taxable_allowances = dec("2000000");
        assert!(request.validate().is_ok());
        assert!(request.target_taxable_net() < Decimal::ZERO);
    }
}
