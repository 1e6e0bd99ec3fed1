//! Payroll orchestration.
//!
//! [`PayrollEngine`] fetches an employee's inputs through a
//! [`PayrollDataSource`], runs the calculation pipeline and records the audit
//! trail. Bulk runs fan the same pipeline out across employees, capturing each
//! employee's outcome separately so one bad record never aborts the batch.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{
    ComponentEvaluator, PayrollAssemblyInput, ZeroEvaluator, aggregate_attendance,
    apply_statutory_deductions, assemble_payroll_result, calculate_components,
    calculate_statutory_deductions, resolve_salary_structure, validate_working_days,
};
use crate::config::ConfigLoader;
use crate::data_source::PayrollDataSource;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, PayrollCalculationResult};

/// Counts the working days in a `YYYY-MM` period.
///
/// Every calendar day of the month counts unless its weekday is in `weekend`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPeriod`] if `period` is not a valid `YYYY-MM`
/// month.
///
/// # Example
///
/// ```
/// use payroll_engine::engine::working_days_in_period;
/// use chrono::Weekday;
///
/// let days = working_days_in_period("2025-04", &[Weekday::Sat, Weekday::Sun]).unwrap();
/// assert_eq!(days, 22);
/// ```
pub fn working_days_in_period(period: &str, weekend: &[Weekday]) -> EngineResult<u32> {
    let first = parse_period(period)?;
    let days = first
        .iter_days()
        .take_while(|day| day.month() == first.month())
        .filter(|day| !weekend.contains(&day.weekday()))
        .count();
    Ok(days as u32)
}

/// Parses a `YYYY-MM` period into the first day of that month.
fn parse_period(period: &str) -> EngineResult<NaiveDate> {
    let invalid = || EngineError::InvalidPeriod {
        period: period.to_string(),
    };

    let (year, month) = period.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4
        || month.len() != 2
        || !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// The outcome of one employee's calculation in a bulk run.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeePayrollOutcome {
    /// The employee the outcome is for.
    pub employee_id: String,
    /// The calculated result or the reason the calculation failed.
    pub result: EngineResult<PayrollCalculationResult>,
}

impl EmployeePayrollOutcome {
    /// Returns true if the calculation succeeded.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// The per-employee outcomes of a bulk run, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkPayrollResult {
    /// The payroll period (`YYYY-MM`).
    pub period: String,
    /// Working days derived from the period, if the period and policy were valid.
    pub working_days: Option<u32>,
    /// One outcome per requested employee.
    pub outcomes: Vec<EmployeePayrollOutcome>,
}

impl BulkPayrollResult {
    /// Iterates over the successfully calculated results.
    pub fn successful(&self) -> impl Iterator<Item = &PayrollCalculationResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Iterates over the failed employees and their errors.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &EngineError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.employee_id.as_str(), e)))
    }

    /// Number of successful calculations.
    pub fn success_count(&self) -> usize {
        self.successful().count()
    }

    /// Number of failed calculations.
    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// Consumes the batch, keeping only the successful results.
    pub fn into_results(self) -> Vec<PayrollCalculationResult> {
        self.outcomes
            .into_iter()
            .filter_map(|o| o.result.ok())
            .collect()
    }
}

/// Calculates payroll for single employees and batches.
///
/// # Example
///
/// ```
/// use payroll_engine::config::{ConfigLoader, PayrollPolicy};
/// use payroll_engine::data_source::InMemoryDataSource;
/// use payroll_engine::engine::PayrollEngine;
/// use payroll_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let engine = PayrollEngine::new(
///     InMemoryDataSource::new(),
///     ConfigLoader::from_policies(vec![PayrollPolicy::default()]),
/// );
///
/// let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
/// let result = engine.calculate_employee_payroll("emp_001", "2025-04", start, end, 22);
/// assert!(matches!(result, Err(EngineError::SalaryStructureNotFound { .. })));
/// ```
pub struct PayrollEngine<D> {
    data_source: D,
    policies: Arc<ConfigLoader>,
    evaluator: Arc<dyn ComponentEvaluator>,
}

impl<D: PayrollDataSource> PayrollEngine<D> {
    /// Creates an engine that values FORMULA and ATTENDANCE_BASED components
    /// with the [`ZeroEvaluator`].
    pub fn new(data_source: D, policies: impl Into<Arc<ConfigLoader>>) -> Self {
        Self {
            data_source,
            policies: policies.into(),
            evaluator: Arc::new(ZeroEvaluator),
        }
    }

    /// Replaces the evaluator for FORMULA and ATTENDANCE_BASED components.
    pub fn with_evaluator(mut self, evaluator: impl ComponentEvaluator + 'static) -> Self {
        self.evaluator = Arc::new(evaluator);
        self
    }

    /// Returns the data source.
    pub fn data_source(&self) -> &D {
        &self.data_source
    }

    /// Returns the loaded policies.
    pub fn policies(&self) -> &ConfigLoader {
        &self.policies
    }

    /// Calculates one employee's payroll for a period.
    ///
    /// The salary structure and the policy are both resolved as of
    /// `start_date`. Attendance is fetched for `[start_date, end_date]`.
    ///
    /// # Errors
    ///
    /// Any configuration or validation failure aborts the calculation; no
    /// partial result is returned.
    pub fn calculate_employee_payroll(
        &self,
        employee_id: &str,
        period: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        working_days: u32,
    ) -> EngineResult<PayrollCalculationResult> {
        validate_working_days(working_days)?;
        let policy = self.policies.policy_for(start_date)?;
        let mut trace = AuditTrace::default();

        let records = self
            .data_source
            .attendance(employee_id, start_date, end_date)?;
        let attendance = aggregate_attendance(employee_id, &records, working_days, policy, 1)?;
        trace.steps.push(attendance.audit_step);
        trace.warnings.extend(attendance.warnings);
        let metrics = attendance.metrics;

        let assignments = self.data_source.salary_assignments(employee_id)?;
        let resolution = resolve_salary_structure(employee_id, start_date, &assignments, 2)?;
        trace.steps.push(resolution.audit_step);
        let structure = resolution.structure;

        let calculation = calculate_components(&structure, &metrics, self.evaluator.as_ref(), 3);
        trace.steps.extend(calculation.audit_steps);
        trace.warnings.extend(calculation.warnings);
        let mut components = calculation.components;
        let basic_salary = calculation.basic_salary;

        let gross_salary: Decimal = components
            .iter()
            .filter(|c| c.is_earning())
            .map(|c| c.calculated_value)
            .sum();

        let statutory =
            calculate_statutory_deductions(basic_salary, gross_salary, &structure, policy, 5);
        trace.steps.push(statutory.audit_step);
        trace.warnings.extend(statutory.warnings);
        let applied = apply_statutory_deductions(&mut components, &statutory.computed);

        let result = assemble_payroll_result(
            PayrollAssemblyInput {
                employee_id,
                period,
                policy,
                metrics: &metrics,
                basic_salary,
                components,
                statutory: applied,
                audit_trace: trace,
            },
            6,
        );

        debug!(
            employee_id = %employee_id,
            period = %period,
            policy_version = %result.policy_version,
            net_salary = %result.net_salary,
            warnings = result.audit_trace.warnings.len(),
            "Employee payroll calculated"
        );

        Ok(result)
    }

    /// Calculates payroll for a batch of employees.
    ///
    /// Working days are derived once from `period` using the weekend of the
    /// policy in force on `start_date`. Each employee is calculated in turn and
    /// its outcome recorded in input order; failures are logged and captured,
    /// never propagated.
    pub fn calculate_bulk_payroll<S: AsRef<str>>(
        &self,
        employee_ids: &[S],
        period: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> BulkPayrollResult {
        let working_days = self
            .policies
            .policy_for(start_date)
            .and_then(|policy| working_days_in_period(period, &policy.work_week.weekend));

        let outcomes: Vec<EmployeePayrollOutcome> = employee_ids
            .iter()
            .map(|employee_id| {
                let employee_id = employee_id.as_ref();
                let result = working_days.clone().and_then(|days| {
                    self.calculate_employee_payroll(employee_id, period, start_date, end_date, days)
                });

                if let Err(err) = &result {
                    warn!(
                        employee_id = %employee_id,
                        period = %period,
                        error = %err,
                        "Employee payroll failed, continuing batch"
                    );
                }

                EmployeePayrollOutcome {
                    employee_id: employee_id.to_string(),
                    result,
                }
            })
            .collect();

        let bulk = BulkPayrollResult {
            period: period.to_string(),
            working_days: working_days.ok(),
            outcomes,
        };

        info!(
            period = %period,
            employees = employee_ids.len(),
            succeeded = bulk.success_count(),
            failed = bulk.failure_count(),
            "Bulk payroll completed"
        );

        bulk
    }
}
