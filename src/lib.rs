//! Net-to-gross payroll engine.
//!
//! This crate finds the gross monthly compensation structure (base salary,
//! gratuity, statutory deductions and employer contributions) that produces
//! a target net take-home pay under a versioned jurisdiction rule set.
//!
//! The entry point is [`calculation::solve`]; [`calculation::PayrollSolver`]
//! exposes the search parameters and an audited report.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
