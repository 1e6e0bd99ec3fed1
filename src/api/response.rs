//! Response types for the Payroll Calculation Engine API.
//!
//! This module defines the error response structures, the mapping from
//! [`EngineError`] to HTTP status codes, and the bulk response body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::engine::{BulkPayrollResult, EmployeePayrollOutcome};
use crate::error::EngineError;
use crate::models::PayrollCalculationResult;

/// API error response structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<&EngineError> for ApiErrorResponse {
    fn from(error: &EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::DataSource { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("DATA_SOURCE_ERROR", message),
            ),
            EngineError::PolicyNotFound { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "POLICY_NOT_FOUND",
                    message,
                    "No payroll policy covers the requested start date",
                ),
            ),
            EngineError::SalaryStructureNotFound { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "SALARY_STRUCTURE_NOT_FOUND",
                    message,
                    "No salary assignment is active for the employee on the start date",
                ),
            ),
            EngineError::InvalidStructure { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_STRUCTURE", message),
            ),
            EngineError::InvalidWorkingDays { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_WORKING_DAYS", message),
            ),
            EngineError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PERIOD", message),
            ),
            EngineError::InvalidAttendance { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_ATTENDANCE", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        (&error).into()
    }
}

/// One employee's entry in a bulk response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmployeeOutcomeResponse {
    /// The calculation succeeded.
    Ok {
        /// The employee the result is for.
        employee_id: String,
        /// The calculated result.
        result: Box<PayrollCalculationResult>,
    },
    /// The calculation failed.
    Error {
        /// The employee that failed.
        employee_id: String,
        /// Why it failed.
        error: ApiError,
    },
}

impl From<EmployeePayrollOutcome> for EmployeeOutcomeResponse {
    fn from(outcome: EmployeePayrollOutcome) -> Self {
        match outcome.result {
            Ok(result) => EmployeeOutcomeResponse::Ok {
                employee_id: outcome.employee_id,
                result: Box::new(result),
            },
            Err(err) => EmployeeOutcomeResponse::Error {
                employee_id: outcome.employee_id,
                error: ApiErrorResponse::from(err).error,
            },
        }
    }
}

/// Response body for the `/payroll/bulk` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkCalculationResponse {
    /// The payroll period.
    pub period: String,
    /// Working days derived from the period, when the period was valid.
    pub working_days: Option<u32>,
    /// Number of employees calculated successfully.
    pub succeeded: usize,
    /// Number of employees that failed.
    pub failed: usize,
    /// One entry per requested employee, in request order.
    pub results: Vec<EmployeeOutcomeResponse>,
}

impl From<BulkPayrollResult> for BulkCalculationResponse {
    fn from(bulk: BulkPayrollResult) -> Self {
        let succeeded = bulk.success_count();
        let failed = bulk.failure_count();
        BulkCalculationResponse {
            period: bulk.period,
            working_days: bulk.working_days,
            succeeded,
            failed,
            results: bulk.outcomes.into_iter().map(Into::into).collect(),
        }
    }
}
