//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structure for the `/solve` endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{IndexValues, PayrollRequest};

/// Request body for the `/solve` endpoint.
///
/// The caller supplies the index values it obtained (live or fallback); the
/// engine never looks them up itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Date selecting which rule file applies.
    pub effective_date: NaiveDate,
    /// Index values in force for this calculation.
    pub index_values: IndexValues,
    /// The payroll request to solve.
    pub request: PayrollRequest,
}
