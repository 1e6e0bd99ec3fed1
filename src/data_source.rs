//! Data access for payroll inputs.
//!
//! The engine never stores anything. Salary assignments and attendance are
//! fetched through a [`PayrollDataSource`] before the pure calculation starts.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::{AttendanceRecord, EmployeeSalaryAssignment};

/// Supplies the records a payroll calculation needs.
///
/// Implementations report their own failures as
/// [`EngineError::DataSource`](crate::error::EngineError::DataSource).
pub trait PayrollDataSource: Send + Sync {
    /// Returns every salary assignment recorded for the employee, in the order
    /// they were recorded.
    fn salary_assignments(&self, employee_id: &str) -> EngineResult<Vec<EmployeeSalaryAssignment>>;

    /// Returns the employee's attendance records dated within `[start, end]`.
    fn attendance(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;
}

/// A [`PayrollDataSource`] backed by in-memory maps.
///
/// # Example
///
/// ```
/// use payroll_engine::data_source::{InMemoryDataSource, PayrollDataSource};
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::NaiveDate;
///
/// let mut source = InMemoryDataSource::new();
/// source.add_attendance(vec![AttendanceRecord {
///     employee_id: "emp_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
///     status: AttendanceStatus::Present,
///     overtime: None,
/// }]);
///
/// let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
/// assert_eq!(source.attendance("emp_001", start, end).unwrap().len(), 1);
/// assert!(source.salary_assignments("emp_001").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    assignments: HashMap<String, Vec<EmployeeSalaryAssignment>>,
    attendance: HashMap<String, Vec<AttendanceRecord>>,
}

impl InMemoryDataSource {
    /// Creates an empty data source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records salary assignments, keyed by their employee.
    pub fn add_assignments(&mut self, assignments: impl IntoIterator<Item = EmployeeSalaryAssignment>) {
        for assignment in assignments {
            self.assignments
                .entry(assignment.employee_id.clone())
                .or_default()
                .push(assignment);
        }
    }

    /// Records attendance, keyed by each record's employee.
    pub fn add_attendance(&mut self, records: impl IntoIterator<Item = AttendanceRecord>) {
        for record in records {
            self.attendance
                .entry(record.employee_id.clone())
                .or_default()
                .push(record);
        }
    }

    /// Records attendance under `employee_id` whatever each record claims.
    ///
    /// Records naming another employee are kept so that aggregation can
    /// reject them as malformed input.
    pub fn add_attendance_for(
        &mut self,
        employee_id: &str,
        records: impl IntoIterator<Item = AttendanceRecord>,
    ) {
        self.attendance
            .entry(employee_id.to_string())
            .or_default()
            .extend(records);
    }
}

impl PayrollDataSource for InMemoryDataSource {
    fn salary_assignments(&self, employee_id: &str) -> EngineResult<Vec<EmployeeSalaryAssignment>> {
        Ok(self.assignments.get(employee_id).cloned().unwrap_or_default())
    }

    fn attendance(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self
            .attendance
            .get(employee_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.date >= start && r.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
