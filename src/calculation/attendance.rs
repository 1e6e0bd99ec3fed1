//! Attendance aggregation functionality.
//!
//! This module reduces a period's raw attendance records into the validated
//! [`AttendanceMetrics`] used for proration, loss of pay, and overtime.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::warn;

use crate::config::{PayrollPolicy, UnknownStatusPolicy};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceMetrics, AttendanceRecord, AttendanceStatus, AuditStep, AuditWarning};

use super::round_amount;

/// Highest accepted number of working days in a period.
pub const MAX_WORKING_DAYS: u32 = 31;

/// Warning code recorded when an unrecognized status is counted as absent.
pub const UNKNOWN_STATUS_WARNING: &str = "UNKNOWN_ATTENDANCE_STATUS";

/// The result of aggregating attendance, including metrics, warnings and audit step.
#[derive(Debug, Clone)]
pub struct AttendanceAggregation {
    /// The derived metrics.
    pub metrics: AttendanceMetrics,
    /// Non-fatal issues found in the records.
    pub warnings: Vec<AuditWarning>,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
}

/// Validates that `working_days` lies in `[1, 31]`.
pub fn validate_working_days(working_days: u32) -> EngineResult<()> {
    if working_days == 0 || working_days > MAX_WORKING_DAYS {
        return Err(EngineError::InvalidWorkingDays { working_days });
    }
    Ok(())
}

/// Reduces attendance records into payroll metrics.
///
/// Each record contributes by status:
/// - `PRESENT`, `ON_LEAVE`, `WORK_FROM_HOME`: one present day
/// - `HALF_DAY`: half a present day and one half-day
/// - `ABSENT`: one absent day
/// - anything else: handled by the policy's [`UnknownStatusPolicy`]
///
/// A record's overtime counts only when it is a finite number in
/// `(0, max_hours_per_record]`; anything else is dropped without failing.
/// Present days are capped at `working_days` and loss-of-pay days are
/// `max(0, working_days - present_days)`.
///
/// # Errors
///
/// - [`EngineError::InvalidWorkingDays`] when `working_days` is outside `[1, 31]`
/// - [`EngineError::InvalidAttendance`] when a record belongs to another employee,
///   two records share a date, an unknown status is rejected by policy, or a
///   derived metric is negative
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::aggregate_attendance;
/// use payroll_engine::config::PayrollPolicy;
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let records = vec![
///     AttendanceRecord {
///         employee_id: "emp_001".to_string(),
///         date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
///         status: AttendanceStatus::Present,
///         overtime: Some(2.0),
///     },
///     AttendanceRecord {
///         employee_id: "emp_001".to_string(),
///         date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
///         status: AttendanceStatus::HalfDay,
///         overtime: None,
///     },
/// ];
///
/// let result = aggregate_attendance("emp_001", &records, 2, &PayrollPolicy::default(), 1).unwrap();
/// assert_eq!(result.metrics.present_days, Decimal::new(15, 1));
/// assert_eq!(result.metrics.lop_days, Decimal::new(5, 1));
/// assert_eq!(result.metrics.overtime_hours, Decimal::from(2));
/// ```
pub fn aggregate_attendance(
    employee_id: &str,
    records: &[AttendanceRecord],
    working_days: u32,
    policy: &PayrollPolicy,
    step_number: u32,
) -> EngineResult<AttendanceAggregation> {
    validate_working_days(working_days)?;

    let invalid = |message: String| EngineError::InvalidAttendance {
        employee_id: employee_id.to_string(),
        message,
    };

    let half = Decimal::new(5, 1);
    let mut present_days = Decimal::ZERO;
    let mut absent_days = Decimal::ZERO;
    let mut half_days = Decimal::ZERO;
    let mut overtime_hours = Decimal::ZERO;
    let mut dropped_overtime = 0u32;
    let mut warnings = Vec::new();
    let mut seen_dates = HashSet::new();

    for record in records {
        if record.employee_id != employee_id {
            return Err(invalid(format!(
                "record for {} belongs to employee '{}'",
                record.date, record.employee_id
            )));
        }
        if !seen_dates.insert(record.date) {
            return Err(invalid(format!("duplicate record for {}", record.date)));
        }

        match &record.status {
            AttendanceStatus::Present
            | AttendanceStatus::OnLeave
            | AttendanceStatus::WorkFromHome => present_days += Decimal::ONE,
            AttendanceStatus::HalfDay => {
                present_days += half;
                half_days += Decimal::ONE;
            }
            AttendanceStatus::Absent => absent_days += Decimal::ONE,
            AttendanceStatus::Other(raw) => match policy.attendance.unknown_status {
                UnknownStatusPolicy::TreatAsAbsent => {
                    warn!(
                        employee_id = %employee_id,
                        date = %record.date,
                        status = %raw,
                        "Unknown attendance status treated as absent"
                    );
                    warnings.push(AuditWarning::new(
                        UNKNOWN_STATUS_WARNING,
                        format!(
                            "Unknown attendance status '{}' on {} treated as absent",
                            raw, record.date
                        ),
                        "medium",
                    ));
                    absent_days += Decimal::ONE;
                }
                UnknownStatusPolicy::Reject => {
                    return Err(invalid(format!(
                        "unknown attendance status '{}' on {}",
                        raw, record.date
                    )));
                }
            },
        }

        match accepted_overtime(record.overtime, policy.overtime.max_hours_per_record) {
            Some(hours) => overtime_hours += hours,
            None if record.overtime.is_some() => dropped_overtime += 1,
            None => {}
        }
    }

    let working = Decimal::from(working_days);
    let present_days = round_amount(present_days.min(working));
    let lop_days = round_amount((working - present_days).max(Decimal::ZERO));

    let metrics = AttendanceMetrics {
        working_days,
        present_days,
        absent_days: round_amount(absent_days),
        half_days: round_amount(half_days),
        lop_days,
        overtime_hours: round_amount(overtime_hours),
    };

    let negative = [
        ("present_days", metrics.present_days),
        ("absent_days", metrics.absent_days),
        ("half_days", metrics.half_days),
        ("lop_days", metrics.lop_days),
        ("overtime_hours", metrics.overtime_hours),
    ]
    .into_iter()
    .find(|(_, value)| value.is_sign_negative() && !value.is_zero());
    if let Some((name, value)) = negative {
        return Err(invalid(format!("derived {} is negative ({})", name, value)));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_aggregation".to_string(),
        rule_name: "Attendance Aggregation".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "records": records.len(),
            "working_days": working_days
        }),
        output: serde_json::json!({
            "present_days": metrics.present_days.to_string(),
            "absent_days": metrics.absent_days.to_string(),
            "half_days": metrics.half_days.to_string(),
            "lop_days": metrics.lop_days.to_string(),
            "overtime_hours": metrics.overtime_hours.to_string(),
            "dropped_overtime_entries": dropped_overtime
        }),
        reasoning: format!(
            "{} present of {} working days, {} LOP days, {} overtime hours",
            metrics.present_days.normalize(),
            working_days,
            metrics.lop_days.normalize(),
            metrics.overtime_hours.normalize()
        ),
    };

    Ok(AttendanceAggregation {
        metrics,
        warnings,
        audit_step,
    })
}

/// Returns the overtime hours to count for one record, if any.
fn accepted_overtime(raw: Option<f64>, max_hours: Decimal) -> Option<Decimal> {
    raw.filter(|hours| hours.is_finite() && *hours > 0.0)
        .and_then(Decimal::from_f64)
        .filter(|hours| *hours <= max_hours)
}
