//! Error types for the net-to-gross payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading rule sets and
//! solving for a gross structure.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type. Solver failures are
/// values, never panics. The two search failures ([`EngineError::InfeasibleTarget`]
/// and [`EngineError::SearchExhausted`]) are distinct variants.
///
/// # Example
///
/// ```
/// use net_to_gross::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No rule file is effective on the requested date.
    #[error("No rule set effective on {date}")]
    RuleSetNotFound {
        /// The date for which a rule set was requested.
        date: NaiveDate,
    },

    /// The rule set is malformed and cannot be used for a calculation.
    #[error("Invalid rule set: {message}")]
    InvalidRuleSet {
        /// A description of the defect.
        message: String,
    },

    /// The requested pension provider is not in the rule set's rate table.
    #[error("Unknown pension provider: {provider}")]
    UnknownPensionProvider {
        /// The provider name that was not found.
        provider: String,
    },

    /// A payroll request field was invalid.
    #[error("Invalid request field '{field}': {message}")]
    InvalidRequest {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The target net pay cannot be reached under the statutory floor.
    #[error(
        "Infeasible target: net pay {target_net_pay} with allowances {non_taxable_allowances} \
         leaves less than the minimum taxable net of {minimum_taxable_net}"
    )]
    InfeasibleTarget {
        /// The requested take-home pay.
        target_net_pay: Decimal,
        /// The non-taxable allowances included in the target.
        non_taxable_allowances: Decimal,
        /// The lowest taxable net the rule set accepts.
        minimum_taxable_net: Decimal,
    },

    /// The bisection search ran out of iterations or could not bracket the root.
    #[error(
        "Search exhausted after {iterations} iterations: target taxable net {target_taxable_net}, \
         last evaluated net {last_net}"
    )]
    SearchExhausted {
        /// The number of iterations performed.
        iterations: u32,
        /// The taxable net the search was aiming for.
        target_taxable_net: Decimal,
        /// The net produced by the last evaluated base.
        last_net: Decimal,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
