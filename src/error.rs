//! Error types for the Payroll Calculation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every hard failure that can occur while calculating payroll. Soft
//! numeric issues (zero salaries, degenerate hourly rates) are not errors;
//! they surface as [`AuditWarning`](crate::models::AuditWarning)s instead.

use chrono::NaiveDate;
use thiserror::Error;

/// Broad classification of an [`EngineError`].
///
/// Both kinds are fatal for the employee being calculated and neither is
/// retried by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or inconsistent configuration (salary structures, policies).
    Configuration,
    /// Malformed or out-of-range input data (attendance, working days).
    Validation,
}

/// The main error type for the Payroll Calculation Engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::{EngineError, ErrorKind};
///
/// let error = EngineError::InvalidWorkingDays { working_days: 0 };
/// assert_eq!(error.to_string(), "Working days must be between 1 and 31, got 0");
/// assert_eq!(error.kind(), ErrorKind::Validation);
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
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

    /// No payroll policy is effective on the given date.
    #[error("No payroll policy effective on {date}")]
    PolicyNotFound {
        /// The date for which a policy was requested.
        date: NaiveDate,
    },

    /// No salary assignment is active for the employee on the given date.
    #[error("No active salary structure for employee '{employee_id}' on {date}")]
    SalaryStructureNotFound {
        /// The employee whose assignment was requested.
        employee_id: String,
        /// The reference date used for resolution.
        date: NaiveDate,
    },

    /// A salary structure or assignment is configured inconsistently.
    #[error("Invalid salary structure '{structure_id}': {message}")]
    InvalidStructure {
        /// The offending structure.
        structure_id: String,
        /// A description of what made the structure invalid.
        message: String,
    },

    /// The data-access layer failed to supply records.
    #[error("Data source error: {message}")]
    DataSource {
        /// A description of the failure.
        message: String,
    },

    /// Working days outside the accepted range.
    #[error("Working days must be between 1 and 31, got {working_days}")]
    InvalidWorkingDays {
        /// The rejected value.
        working_days: u32,
    },

    /// A payroll period string was not in `YYYY-MM` form.
    #[error("Invalid payroll period '{period}': expected YYYY-MM")]
    InvalidPeriod {
        /// The rejected period string.
        period: String,
    },

    /// Attendance records were malformed.
    #[error("Invalid attendance for employee '{employee_id}': {message}")]
    InvalidAttendance {
        /// The employee whose attendance was rejected.
        employee_id: String,
        /// A description of what made the attendance invalid.
        message: String,
    },
}

impl EngineError {
    /// Returns the broad kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::PolicyNotFound { .. }
            | EngineError::SalaryStructureNotFound { .. }
            | EngineError::InvalidStructure { .. }
            | EngineError::DataSource { .. } => ErrorKind::Configuration,
            EngineError::InvalidWorkingDays { .. }
            | EngineError::InvalidPeriod { .. }
            | EngineError::InvalidAttendance { .. } => ErrorKind::Validation,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/policies".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/policies"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/policies/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/policies/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_salary_structure_not_found_displays_employee_and_date() {
        let error = EngineError::SalaryStructureNotFound {
            employee_id: "emp_002".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "No active salary structure for employee 'emp_002' on 2025-03-01"
        );
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_invalid_attendance_is_validation_error() {
        let error = EngineError::InvalidAttendance {
            employee_id: "emp_001".to_string(),
            message: "duplicate record for 2025-03-03".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid attendance for employee 'emp_001': duplicate record for 2025-03-03"
        );
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_invalid_period_displays_period() {
        let error = EngineError::InvalidPeriod {
            period: "2025/03".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid payroll period '2025/03': expected YYYY-MM"
        );
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_structure_errors_are_configuration_errors() {
        let error = EngineError::InvalidStructure {
            structure_id: "std".to_string(),
            message: "FIXED component 'TA' has no value".to_string(),
        };
        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert_eq!(
            EngineError::PolicyNotFound {
                date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
            }
            .kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_working_days() -> EngineResult<()> {
            Err(EngineError::InvalidWorkingDays { working_days: 40 })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_working_days()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
