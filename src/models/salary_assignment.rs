//! Employee salary assignment model.
//!
//! An [`EmployeeSalaryAssignment`] ties an employee to a salary structure and CTC
//! for an effective date window. Assignments are superseded, never mutated.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SalaryStructure;

/// A per-employee fixed value that replaces a component's calculation entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentOverride {
    /// The overridden pay component's id.
    pub component_id: String,
    /// The value used verbatim for the component.
    pub value: Decimal,
}

/// An employee's salary structure assignment for an effective date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSalaryAssignment {
    /// Unique identifier for the assignment.
    pub id: String,
    /// The employee this assignment belongs to.
    pub employee_id: String,
    /// The assigned salary structure.
    pub structure: SalaryStructure,
    /// Cost to company for the pay period.
    pub ctc: Decimal,
    /// First day the assignment applies (inclusive).
    pub effective_from: NaiveDate,
    /// Last day the assignment applies (inclusive), open-ended when absent.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// Per-employee component overrides.
    #[serde(default)]
    pub overrides: Vec<ComponentOverride>,
}

impl EmployeeSalaryAssignment {
    /// Checks whether the assignment's effective window contains `date`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{EmployeeSalaryAssignment, SalaryStructure};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let assignment = EmployeeSalaryAssignment {
    ///     id: "asg_001".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     structure: SalaryStructure { id: "std".to_string(), name: "Standard".to_string(), components: vec![] },
    ///     ctc: Decimal::from(60000),
    ///     effective_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    ///     effective_to: Some(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()),
    ///     overrides: vec![],
    /// };
    ///
    /// assert!(assignment.is_effective_on(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()));
    /// assert!(!assignment.is_effective_on(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
    /// ```
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| to >= date)
    }
}
