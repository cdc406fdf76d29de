//! HTTP API module for the payroll engine.
//!
//! A thin input surface over the solver: it selects the rule set for the
//! requested date, runs the solver and returns the report as JSON.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::SolveRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
