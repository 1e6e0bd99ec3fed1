//! HTTP API module for the Payroll Calculation Engine.
//!
//! This module provides the REST API endpoints for calculating payroll for a
//! single employee or a batch of employees.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BulkCalculationRequest, CalculationRequest, EmployeeInput};
pub use response::{ApiError, BulkCalculationResponse, EmployeeOutcomeResponse};
pub use state::AppState;
