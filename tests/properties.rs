//! Property tests for the forward model and the reverse solver.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use net_to_gross::calculation::{evaluate, solve};
use net_to_gross::config::ConfigLoader;
use net_to_gross::models::{
    ContractType, HealthScheme, IndexValues, PayrollRequest, RuleDefinition, RuleSet,
};

const PROVIDERS: [&str; 8] = [
    "capital",
    "cuprum",
    "habitat",
    "modelo",
    "planvital",
    "provida",
    "uno",
    "none",
];

fn current_definition() -> RuleDefinition {
    let loader = ConfigLoader::load("./config/cl").expect("Failed to load config");
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    loader.rule_definition(date).unwrap().clone()
}

fn current_rule_set() -> RuleSet {
    let indices = IndexValues::new(Decimal::new(38_000, 0), Decimal::new(67_000, 0));
    RuleSet::new("CL", current_definition(), indices).unwrap()
}

fn request(
    target: i64,
    allowances: i64,
    contract_type: ContractType,
    provider: &str,
) -> PayrollRequest {
    PayrollRequest {
        target_net_pay: Decimal::from(target),
        non_taxable_allowances: Decimal::from(allowances),
        contract_type,
        pension_provider: provider.to_string(),
        health_scheme: HealthScheme::Statutory,
    }
}

fn contract_type() -> impl Strategy<Value = ContractType> {
    prop_oneof![
        Just(ContractType::Indefinite),
        Just(ContractType::FixedTerm),
        Just(ContractType::ProprietorOwner),
    ]
}

fn provider() -> impl Strategy<Value = &'static str> {
    prop::sample::select(PROVIDERS.to_vec())
}

/// Rate in basis points, e.g. `bp(500, 900)` spans 5% to 9%.
fn bp(low: i64, high: i64) -> impl Strategy<Value = Decimal> {
    (low..high).prop_map(|points| Decimal::new(points, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn net_pay_is_non_decreasing_in_base(
        base in 100_000i64..20_000_000,
        gap in 100i64..2_000_000,
        contract in contract_type(),
        provider in provider(),
    ) {
        let rule_set = current_rule_set();
        let req = request(1_000_000, 0, contract, provider);
        let plan = rule_set.pension_rates().resolve(provider).unwrap();

        let lower = evaluate(Decimal::from(base), &rule_set, &req, plan);
        let upper = evaluate(Decimal::from(base + gap), &rule_set, &req, plan);

        prop_assert!(lower.net_pay <= upper.net_pay);
    }

    #[test]
    fn truncation_dip_between_nearby_bases_is_at_most_two(
        base in 100_000i64..20_000_000,
        gap in 1i64..100,
        contract in contract_type(),
        provider in provider(),
    ) {
        let rule_set = current_rule_set();
        let req = request(1_000_000, 0, contract, provider);
        let plan = rule_set.pension_rates().resolve(provider).unwrap();

        let lower = evaluate(Decimal::from(base), &rule_set, &req, plan);
        let upper = evaluate(Decimal::from(base + gap), &rule_set, &req, plan);

        // Below the tolerance of 5, which bisection relies on.
        prop_assert!(
            upper.net_pay >= lower.net_pay - Decimal::TWO,
            "net({}) = {} but net({}) = {}",
            base + gap,
            upper.net_pay,
            base,
            lower.net_pay
        );
    }

    #[test]
    fn solver_converges_within_tolerance(
        target in 400_000i64..10_000_000,
        contract in contract_type(),
        provider in provider(),
    ) {
        let rule_set = current_rule_set();
        let breakdown = solve(&rule_set, &request(target, 0, contract, provider)).unwrap();

        let gap = (breakdown.take_home_pay - Decimal::from(target)).abs();
        prop_assert!(gap < Decimal::from(5), "gap {} for target {}", gap, target);
    }

    #[test]
    fn solved_base_replays_to_same_breakdown(
        target in 600_000i64..6_000_000,
        allowances in 0i64..300_000,
        contract in contract_type(),
        provider in provider(),
    ) {
        let rule_set = current_rule_set();
        let req = request(target, allowances, contract, provider);
        let plan = rule_set.pension_rates().resolve(provider).unwrap();

        let breakdown = solve(&rule_set, &req).unwrap();
        let replay = evaluate(breakdown.base_salary, &rule_set, &req, plan);

        prop_assert_eq!(replay.net_pay, breakdown.net_pay);
        prop_assert_eq!(replay.income_tax.amount, breakdown.income_tax);
        prop_assert_eq!(replay.total_deductions(), breakdown.total_deductions);
    }

    #[test]
    fn caps_bind_exactly_when_exceeded(
        target in 400_000i64..12_000_000,
        contract in contract_type(),
    ) {
        let rule_set = current_rule_set();
        let breakdown = solve(&rule_set, &request(target, 0, contract, "capital")).unwrap();

        let quarter = (breakdown.base_salary * rule_set.rates().gratuity_fraction).trunc();
        if quarter > rule_set.gratuity_cap() {
            prop_assert_eq!(breakdown.gratuity, rule_set.gratuity_cap());
        } else {
            prop_assert_eq!(breakdown.gratuity, quarter);
        }
        prop_assert_eq!(
            breakdown.pension_base,
            breakdown.taxable_compensation.min(rule_set.pension_cap())
        );
        prop_assert_eq!(
            breakdown.unemployment_base,
            breakdown.taxable_compensation.min(rule_set.unemployment_cap())
        );
        prop_assert!(breakdown.health_deduction >= Decimal::ZERO);
    }

    #[test]
    fn solver_converges_under_varied_rule_parameters(
        minimum_wage in 400_000i64..700_000,
        indexed_unit in 30_000i64..45_000,
        tax_unit in 55_000i64..80_000,
        pension_rate in bp(800, 1_200),
        health_rate in bp(500, 900),
        unemployment_rate in bp(0, 100),
        target in 1_000_000i64..5_000_000,
        provider in provider(),
    ) {
        let mut definition = current_definition();
        definition.minimum_wage = Decimal::from(minimum_wage);
        definition.rates.pension_rate = pension_rate;
        definition.rates.health_rate = health_rate;
        definition.rates.unemployment_employee_rate = unemployment_rate;
        let indices = IndexValues::new(Decimal::from(indexed_unit), Decimal::from(tax_unit));
        let rule_set = RuleSet::new("CL", definition, indices).unwrap();

        let req = request(target, 0, ContractType::Indefinite, provider);
        let breakdown = solve(&rule_set, &req).unwrap();

        let gap = (breakdown.take_home_pay - Decimal::from(target)).abs();
        prop_assert!(gap < Decimal::from(5));
        prop_assert_eq!(
            breakdown.net_pay + breakdown.total_deductions,
            breakdown.taxable_compensation
        );
    }
}
