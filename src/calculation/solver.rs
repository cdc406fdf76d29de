//! Reverse payroll solver.
//!
//! Finds the base salary whose forward evaluation produces a target net pay,
//! by bisection over the base. Truncation makes net pay dip by at most a
//! couple of units between nearby bases, and each unit step moves it by at
//! most a few units, so bisection always lands inside the tolerance window
//! once the root is bracketed. Bounds never exceed [`MAX_BASE_SALARY`].

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, MAX_BASE_SALARY, PayrollBreakdown, PayrollRequest,
    PensionPlan, RuleSet, SolverReport,
};

use super::breakdown::{assemble_breakdown, evaluation_warnings, explain_evaluation};
use super::forward::{PayrollEvaluation, evaluate};

/// Default iteration cap for the bisection loop.
pub const DEFAULT_MAX_ITERATIONS: u32 = 150;

/// Search parameters for [`PayrollSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum bisection iterations.
    pub max_iterations: u32,
    /// Accept a base once `|net - target| < tolerance`.
    pub tolerance: Decimal,
    /// Lower end of the initial search interval.
    pub lower_bound: Decimal,
    /// Upper end of the initial interval, as a multiple of the target taxable net.
    pub upper_multiplier: Decimal,
    /// How many times the upper bound may double when it fails to bracket the root.
    pub max_bound_expansions: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: Decimal::new(5, 0),
            lower_bound: Decimal::new(100_000, 0),
            upper_multiplier: Decimal::new(25, 1),
            max_bound_expansions: 16,
        }
    }
}

/// Terminal states of a search.
#[derive(Debug, Clone, Copy)]
enum SearchOutcome {
    Converged {
        evaluation: PayrollEvaluation,
        iterations: u32,
        bound_expansions: u32,
    },
    Exhausted {
        iterations: u32,
        last_net: Decimal,
    },
    RejectedInfeasible,
}

/// A converged search, before it is turned into a breakdown.
#[derive(Debug, Clone, Copy)]
struct Solution {
    evaluation: PayrollEvaluation,
    iterations: u32,
    bound_expansions: u32,
}

/// Inverts the forward payroll model for one rule set.
///
/// # Example
///
/// ```no_run
/// use net_to_gross::calculation::PayrollSolver;
/// use net_to_gross::config::ConfigLoader;
/// use net_to_gross::models::{ContractType, HealthScheme, IndexValues, PayrollRequest};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/cl")?;
/// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let indices = IndexValues::new(Decimal::new(38000, 0), Decimal::new(67000, 0));
/// let rule_set = loader.rule_set(date, indices)?;
///
/// let request = PayrollRequest {
///     target_net_pay: Decimal::new(1_000_000, 0),
///     non_taxable_allowances: Decimal::new(100_000, 0),
///     contract_type: ContractType::Indefinite,
///     pension_provider: "capital".to_string(),
///     health_scheme: HealthScheme::Statutory,
/// };
///
/// let breakdown = PayrollSolver::new(&rule_set).solve(&request)?;
/// println!("Base salary: {}", breakdown.base_salary);
/// # Ok::<(), net_to_gross::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PayrollSolver<'a> {
    rule_set: &'a RuleSet,
    config: SolverConfig,
}

impl<'a> PayrollSolver<'a> {
    /// Creates a solver with the default search parameters.
    pub fn new(rule_set: &'a RuleSet) -> Self {
        Self {
            rule_set,
            config: SolverConfig::default(),
        }
    }

    /// Replaces the search parameters.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the search parameters in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves for the breakdown producing `request.target_net_pay`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidRequest`] for malformed request fields
    /// - [`EngineError::UnknownPensionProvider`] for a provider not in the rule set
    /// - [`EngineError::InfeasibleTarget`] when the taxable net falls below the floor
    /// - [`EngineError::SearchExhausted`] when the search cannot converge
    pub fn solve(&self, request: &PayrollRequest) -> EngineResult<PayrollBreakdown> {
        let (solution, _) = self.run(request)?;
        Ok(assemble_breakdown(
            &solution.evaluation,
            request.non_taxable_allowances,
        ))
    }

    /// Solves and returns the breakdown with its audit trace and provenance.
    ///
    /// # Errors
    ///
    /// Same as [`PayrollSolver::solve`].
    pub fn solve_with_report(&self, request: &PayrollRequest) -> EngineResult<SolverReport> {
        let start_time = Instant::now();
        let (solution, plan) = self.run(request)?;
        let evaluation = solution.evaluation;

        let mut steps = vec![self.search_step(request, plan, &solution)];
        steps.extend(explain_evaluation(&evaluation, self.rule_set, request, 2));

        let mut warnings = evaluation_warnings(&evaluation);
        if solution.bound_expansions > 0 {
            warnings.push(AuditWarning {
                code: "SEARCH_BOUND_EXPANDED".to_string(),
                message: format!(
                    "Upper search bound doubled {} time(s) to bracket the target",
                    solution.bound_expansions
                ),
                severity: "medium".to_string(),
            });
        }

        let breakdown = assemble_breakdown(&evaluation, request.non_taxable_allowances);
        let duration_us = u64::try_from(start_time.elapsed().as_micros()).unwrap_or(u64::MAX);

        Ok(SolverReport {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            rule_set_code: self.rule_set.code().to_string(),
            effective_date: self.rule_set.effective_date(),
            iterations: solution.iterations,
            breakdown,
            audit_trace: AuditTrace {
                steps,
                warnings,
                duration_us,
            },
        })
    }

    /// Validates the request, runs the search and maps its outcome to a result.
    fn run(&self, request: &PayrollRequest) -> EngineResult<(Solution, PensionPlan)> {
        request.validate()?;
        let plan = self
            .rule_set
            .pension_rates()
            .resolve(&request.pension_provider)?;

        match self.search(request, plan) {
            SearchOutcome::Converged {
                evaluation,
                iterations,
                bound_expansions,
            } => {
                info!(
                    target_net_pay = %request.target_net_pay,
                    base_salary = %evaluation.base_salary,
                    net_pay = %evaluation.net_pay,
                    iterations,
                    "Reverse payroll search converged"
                );
                Ok((
                    Solution {
                        evaluation,
                        iterations,
                        bound_expansions,
                    },
                    plan,
                ))
            }
            SearchOutcome::Exhausted {
                iterations,
                last_net,
            } => {
                warn!(
                    target_net_pay = %request.target_net_pay,
                    iterations,
                    last_net = %last_net,
                    "Reverse payroll search exhausted"
                );
                Err(EngineError::SearchExhausted {
                    iterations,
                    target_taxable_net: request.target_taxable_net(),
                    last_net,
                })
            }
            SearchOutcome::RejectedInfeasible => {
                warn!(
                    target_net_pay = %request.target_net_pay,
                    non_taxable_allowances = %request.non_taxable_allowances,
                    "Target net pay rejected as infeasible"
                );
                Err(EngineError::InfeasibleTarget {
                    target_net_pay: request.target_net_pay,
                    non_taxable_allowances: request.non_taxable_allowances,
                    minimum_taxable_net: self.rule_set.minimum_taxable_net(),
                })
            }
        }
    }

    fn search(&self, request: &PayrollRequest, plan: PensionPlan) -> SearchOutcome {
        let target = request.target_taxable_net();
        if target < self.rule_set.minimum_taxable_net() {
            return SearchOutcome::RejectedInfeasible;
        }

        let tolerance = self.config.tolerance;
        let within_tolerance =
            |evaluation: &PayrollEvaluation| (evaluation.net_pay - target).abs() < tolerance;
        let net_at = |base: Decimal| evaluate(base, self.rule_set, request, plan);

        let mut lower = self
            .config
            .lower_bound
            .max(Decimal::ZERO)
            .min(MAX_BASE_SALARY);
        let mut upper = target
            .checked_mul(self.config.upper_multiplier)
            .map_or(MAX_BASE_SALARY, |bound| bound.min(MAX_BASE_SALARY));

        let lower_eval = net_at(lower);
        if within_tolerance(&lower_eval) {
            return SearchOutcome::Converged {
                evaluation: lower_eval,
                iterations: 0,
                bound_expansions: 0,
            };
        }
        if lower_eval.net_pay > target {
            debug!(lower = %lower, "Lower bound overshoots target, restarting from zero");
            lower = Decimal::ZERO;
        }

        // The multiplier is a heuristic; widen until the root is bracketed.
        let mut bound_expansions = 0;
        loop {
            let upper_eval = net_at(upper);
            if within_tolerance(&upper_eval) {
                return SearchOutcome::Converged {
                    evaluation: upper_eval,
                    iterations: 0,
                    bound_expansions,
                };
            }
            if upper_eval.net_pay > target {
                break;
            }
            if bound_expansions == self.config.max_bound_expansions || upper >= MAX_BASE_SALARY {
                return SearchOutcome::Exhausted {
                    iterations: 0,
                    last_net: upper_eval.net_pay,
                };
            }
            lower = lower.max(upper);
            upper = (upper * Decimal::TWO).max(Decimal::ONE).min(MAX_BASE_SALARY);
            bound_expansions += 1;
            debug!(
                upper = %upper,
                net_at_previous_upper = %upper_eval.net_pay,
                "Upper bound does not bracket target, doubling"
            );
        }

        let mut last_net = Decimal::ZERO;
        for iteration in 1..=self.config.max_iterations {
            let mid = (lower + upper) / Decimal::TWO;
            let evaluation = net_at(mid);
            debug!(
                iteration,
                lower = %lower,
                upper = %upper,
                base = %evaluation.base_salary,
                net = %evaluation.net_pay,
                "Bisection step"
            );

            if within_tolerance(&evaluation) {
                return SearchOutcome::Converged {
                    evaluation,
                    iterations: iteration,
                    bound_expansions,
                };
            }
            if evaluation.net_pay < target {
                lower = mid;
            } else {
                upper = mid;
            }
            last_net = evaluation.net_pay;
        }

        SearchOutcome::Exhausted {
            iterations: self.config.max_iterations,
            last_net,
        }
    }

    fn search_step(
        &self,
        request: &PayrollRequest,
        plan: PensionPlan,
        solution: &Solution,
    ) -> AuditStep {
        let commission = match plan {
            PensionPlan::NotAffiliated => None,
            PensionPlan::Affiliated { commission_percent } => {
                Some(commission_percent.normalize().to_string())
            }
        };
        AuditStep {
            step_number: 1,
            rule_id: "reverse_search".to_string(),
            rule_name: "Reverse Payroll Search".to_string(),
            input: serde_json::json!({
                "target_net_pay": request.target_net_pay.to_string(),
                "non_taxable_allowances": request.non_taxable_allowances.to_string(),
                "target_taxable_net": request.target_taxable_net().to_string(),
                "pension_commission_percent": commission,
                "tolerance": self.config.tolerance.to_string(),
                "max_iterations": self.config.max_iterations
            }),
            output: serde_json::json!({
                "base_salary": solution.evaluation.base_salary.to_string(),
                "net_pay": solution.evaluation.net_pay.to_string(),
                "iterations": solution.iterations,
                "bound_expansions": solution.bound_expansions
            }),
            reasoning: format!(
                "Base salary ${} yields taxable net ${} against a target of ${} after {} iteration(s)",
                solution.evaluation.base_salary,
                solution.evaluation.net_pay,
                request.target_taxable_net(),
                solution.iterations
            ),
        }
    }
}

/// Solves `request` against `rule_set` with the default search parameters.
///
/// This is the engine's single entry point for callers that only need the
/// breakdown.
pub fn solve(rule_set: &RuleSet, request: &PayrollRequest) -> EngineResult<PayrollBreakdown> {
    PayrollSolver::new(rule_set).solve(request)
}
