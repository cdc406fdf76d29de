//! Breakdown assembly and audit explanation.
//!
//! Turns a forward evaluation into the public [`PayrollBreakdown`] and
//! records one audit step per payroll rule.

use rust_decimal::Decimal;

use crate::models::{AuditStep, AuditWarning, PayrollBreakdown, PayrollRequest, RuleSet};

use super::forward::PayrollEvaluation;

/// Builds the breakdown for an evaluation plus the non-taxable allowances.
pub fn assemble_breakdown(
    evaluation: &PayrollEvaluation,
    non_taxable_allowances: Decimal,
) -> PayrollBreakdown {
    let gross_compensation = evaluation.taxable_compensation + non_taxable_allowances;
    let total_employer_contributions = evaluation.employer.total();

    PayrollBreakdown {
        base_salary: evaluation.base_salary,
        gratuity: evaluation.gratuity.amount,
        gratuity_cap: evaluation.gratuity.cap,
        taxable_compensation: evaluation.taxable_compensation,
        non_taxable_allowances,
        gross_compensation,
        pension_base: evaluation.bases.pension,
        unemployment_base: evaluation.bases.unemployment,
        pension_deduction: evaluation.pension,
        health_deduction: evaluation.health.amount,
        unemployment_insurance: evaluation.unemployment,
        tax_base: evaluation.tax_base,
        income_tax: evaluation.income_tax.amount,
        total_deductions: evaluation.total_deductions(),
        net_pay: evaluation.net_pay,
        take_home_pay: evaluation.net_pay + non_taxable_allowances,
        disability_insurance: evaluation.employer.disability_insurance,
        employer_unemployment: evaluation.employer.unemployment,
        accident_insurance: evaluation.employer.accident_insurance,
        total_employer_contributions,
        total_employer_cost: gross_compensation + total_employer_contributions,
    }
}

/// Records the rule applications behind an evaluation, numbered from `first_step`.
pub fn explain_evaluation(
    evaluation: &PayrollEvaluation,
    rule_set: &RuleSet,
    request: &PayrollRequest,
    first_step: u32,
) -> Vec<AuditStep> {
    let rates = rule_set.rates();
    let contract = request.contract_type;
    let e = evaluation;

    let steps = vec![
        (
            "gratuity",
            "Legal Gratuity",
            serde_json::json!({
                "base_salary": e.base_salary.to_string(),
                "fraction": rates.gratuity_fraction.normalize().to_string(),
                "cap": e.gratuity.cap.to_string()
            }),
            serde_json::json!({
                "gratuity": e.gratuity.amount.to_string(),
                "capped": e.gratuity.capped
            }),
            if e.gratuity.capped {
                format!("Gratuity limited to the cap of ${}", e.gratuity.cap)
            } else {
                format!(
                    "${} x {} = ${}",
                    e.base_salary,
                    rates.gratuity_fraction.normalize(),
                    e.gratuity.amount
                )
            },
        ),
        (
            "contribution_bases",
            "Contribution Base Caps",
            serde_json::json!({
                "taxable_compensation": e.taxable_compensation.to_string(),
                "pension_cap": rule_set.pension_cap().to_string(),
                "unemployment_cap": rule_set.unemployment_cap().to_string()
            }),
            serde_json::json!({
                "pension_base": e.bases.pension.to_string(),
                "unemployment_base": e.bases.unemployment.to_string()
            }),
            format!(
                "Pension base ${}, unemployment base ${}",
                e.bases.pension, e.bases.unemployment
            ),
        ),
        (
            "pension",
            "Pension Contribution",
            serde_json::json!({
                "pension_base": e.bases.pension.to_string(),
                "contract_type": contract.as_str(),
                "provider": request.pension_provider
            }),
            serde_json::json!({ "pension": e.pension.to_string() }),
            if e.pension.is_zero() {
                format!(
                    "No pension withheld for {} contract with provider '{}'",
                    contract, request.pension_provider
                )
            } else {
                format!(
                    "Pension withheld on ${}: ${}",
                    e.bases.pension, e.pension
                )
            },
        ),
        (
            "unemployment_insurance",
            "Unemployment Insurance (Employee)",
            serde_json::json!({
                "unemployment_base": e.bases.unemployment.to_string(),
                "contract_type": contract.as_str()
            }),
            serde_json::json!({ "unemployment_insurance": e.unemployment.to_string() }),
            if contract.pays_unemployment_share() {
                format!(
                    "${} x {} = ${}",
                    e.bases.unemployment,
                    rates.unemployment_employee_rate.normalize(),
                    e.unemployment
                )
            } else {
                format!("No employee share for {} contract", contract)
            },
        ),
        (
            "health",
            "Health Contribution",
            serde_json::json!({
                "pension_base": e.bases.pension.to_string(),
                "scheme": request.health_scheme
            }),
            serde_json::json!({
                "health": e.health.amount.to_string(),
                "tax_deductible": e.health.legal_minimum.to_string()
            }),
            format!(
                "Withheld ${}, of which ${} is tax deductible",
                e.health.amount, e.health.legal_minimum
            ),
        ),
        (
            "income_tax",
            "Income Tax",
            serde_json::json!({
                "tax_base": e.tax_base.to_string(),
                "tax_unit_value": rule_set.indices().tax_unit_value.to_string()
            }),
            serde_json::json!({
                "income_tax": e.income_tax.amount.to_string(),
                "bracket_index": e.income_tax.bracket_index,
                "marginal_rate": e.income_tax.marginal_rate.normalize().to_string()
            }),
            format!(
                "${} x {} - ${} = ${}",
                e.tax_base,
                e.income_tax.marginal_rate.normalize(),
                e.income_tax.rebate.normalize(),
                e.income_tax.amount
            ),
        ),
        (
            "employer_contributions",
            "Employer Contributions",
            serde_json::json!({
                "pension_base": e.bases.pension.to_string(),
                "unemployment_base": e.bases.unemployment.to_string(),
                "contract_type": contract.as_str()
            }),
            serde_json::json!({
                "disability_insurance": e.employer.disability_insurance.to_string(),
                "unemployment": e.employer.unemployment.to_string(),
                "accident_insurance": e.employer.accident_insurance.to_string()
            }),
            format!("Employer contributions total ${}", e.employer.total()),
        ),
    ];

    steps
        .into_iter()
        .zip(first_step..)
        .map(
            |((rule_id, rule_name, input, output, reasoning), step_number)| AuditStep {
                step_number,
                rule_id: rule_id.to_string(),
                rule_name: rule_name.to_string(),
                input,
                output,
                reasoning,
            },
        )
        .collect()
}

/// Flags conditions in an evaluation worth surfacing to the reader.
pub fn evaluation_warnings(evaluation: &PayrollEvaluation) -> Vec<AuditWarning> {
    let mut warnings = Vec::new();

    if evaluation.gratuity.capped {
        warnings.push(AuditWarning {
            code: "GRATUITY_CAPPED".to_string(),
            message: format!(
                "Gratuity limited to the legal cap of {}",
                evaluation.gratuity.cap
            ),
            severity: "low".to_string(),
        });
    }

    if evaluation.health.excess() > Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "HEALTH_EXCESS_NOT_DEDUCTIBLE".to_string(),
            message: format!(
                "Private health plan exceeds the statutory minimum by {}, which is not tax deductible",
                evaluation.health.excess()
            ),
            severity: "low".to_string(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::forward::evaluate;
    use crate::models::rule_set::fixtures::{dec, standard_rule_set};
    use crate::models::{ContractType, HealthScheme, PensionPlan};

    fn create_request(health_scheme: HealthScheme) -> PayrollRequest {
        PayrollRequest {
            target_net_pay: dec("1000000"),
            non_taxable_allowances: dec("100000"),
            contract_type: ContractType::Indefinite,
            pension_provider: "capital".to_string(),
            health_scheme,
        }
    }

    fn capital() -> PensionPlan {
        PensionPlan::Affiliated {
            commission_percent: dec("1.44"),
        }
    }

    #[test]
    fn test_breakdown_adds_allowances_and_employer_cost() {
        let rule_set = standard_rule_set();
        let request = create_request(HealthScheme::Statutory);
        let eval = evaluate(dec("902265"), &rule_set, &request, capital());

        let breakdown = assemble_breakdown(&eval, dec("100000"));

        assert_eq!(breakdown.base_salary, dec("902265"));
        assert_eq!(breakdown.gross_compensation, dec("1211660"));
        assert_eq!(breakdown.net_pay, dec("900002"));
        assert_eq!(breakdown.take_home_pay, dec("1000002"));
        assert_eq!(breakdown.total_deductions, dec("211658"));
        assert_eq!(breakdown.total_employer_cost, dec("1265240"));
    }

    #[test]
    fn test_explanation_has_one_step_per_rule() {
        let rule_set = standard_rule_set();
        let request = create_request(HealthScheme::Statutory);
        let eval = evaluate(dec("902265"), &rule_set, &request, capital());

        let steps = explain_evaluation(&eval, &rule_set, &request, 2);

        assert_eq!(steps.len(), 7);
        assert_eq!(steps[0].step_number, 2);
        assert_eq!(steps[0].rule_id, "gratuity");
        assert_eq!(steps[6].step_number, 8);
        assert_eq!(steps[6].rule_id, "employer_contributions");
        assert_eq!(steps[5].output["income_tax"].as_str().unwrap(), "0");
        assert!(steps[0].reasoning.contains("209395"));
    }

    #[test]
    fn test_capped_gratuity_raises_warning() {
        let rule_set = standard_rule_set();
        let request = create_request(HealthScheme::Statutory);
        let eval = evaluate(dec("902265"), &rule_set, &request, capital());

        let warnings = evaluation_warnings(&eval);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "GRATUITY_CAPPED");
    }

    #[test]
    fn test_private_plan_excess_raises_warning() {
        let rule_set = standard_rule_set();
        let request = create_request(HealthScheme::PrivatePlan {
            plan_value_units: dec("5"),
        });
        let eval = evaluate(dec("500000"), &rule_set, &request, capital());

        let warnings = evaluation_warnings(&eval);
        assert!(warnings
            .iter()
            .any(|w| w.code == "HEALTH_EXCESS_NOT_DEDUCTIBLE"));
        assert!(!warnings.iter().any(|w| w.code == "GRATUITY_CAPPED"));
    }
}
