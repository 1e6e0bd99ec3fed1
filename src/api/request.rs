//! Request types for the Payroll Calculation Engine API.
//!
//! This module defines the JSON request structures for the
//! `/payroll/calculate` and `/payroll/bulk` endpoints. Requests carry the
//! salary assignments and attendance records the calculation needs, since the
//! engine itself holds no data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data_source::InMemoryDataSource;
use crate::models::{AttendanceRecord, EmployeeSalaryAssignment};

/// Request body for the `/payroll/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee to calculate.
    pub employee_id: String,
    /// The payroll period (`YYYY-MM`).
    pub period: String,
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Working days in the period.
    pub working_days: u32,
    /// The employee's salary assignments.
    pub salary_assignments: Vec<EmployeeSalaryAssignment>,
    /// The employee's attendance records.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

/// Request body for the `/payroll/bulk` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCalculationRequest {
    /// The payroll period (`YYYY-MM`); working days are derived from it.
    pub period: String,
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// The employees to calculate, in the order results should be returned.
    pub employees: Vec<EmployeeInput>,
}

/// One employee's records in a bulk request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeInput {
    /// The employee to calculate.
    pub employee_id: String,
    /// The employee's salary assignments.
    #[serde(default)]
    pub salary_assignments: Vec<EmployeeSalaryAssignment>,
    /// The employee's attendance records.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

impl CalculationRequest {
    /// Moves the request's records into a data source.
    ///
    /// Attendance is filed under the requested employee as sent, so a record
    /// naming someone else fails the calculation instead of vanishing.
    pub fn data_source(&mut self) -> InMemoryDataSource {
        let mut source = InMemoryDataSource::new();
        source.add_assignments(std::mem::take(&mut self.salary_assignments));
        source.add_attendance_for(&self.employee_id, std::mem::take(&mut self.attendance));
        source
    }
}

impl BulkCalculationRequest {
    /// Returns the employee ids in request order.
    pub fn employee_ids(&self) -> Vec<String> {
        self.employees.iter().map(|e| e.employee_id.clone()).collect()
    }

    /// Moves every employee's records into a data source.
    pub fn data_source(&mut self) -> InMemoryDataSource {
        let mut source = InMemoryDataSource::new();
        for employee in &mut self.employees {
            source.add_assignments(std::mem::take(&mut employee.salary_assignments));
            source.add_attendance_for(&employee.employee_id, std::mem::take(&mut employee.attendance));
        }
        source
    }
}
