//! Attendance models.
//!
//! This module defines the raw [`AttendanceRecord`] produced by the attendance
//! subsystem and the derived [`AttendanceMetrics`] consumed by payroll.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// The attendance status recorded for a day.
///
/// Unrecognized statuses are kept verbatim in [`AttendanceStatus::Other`] so
/// the aggregator can apply the configured unknown-status policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttendanceStatus {
    /// Worked the full day.
    Present,
    /// Did not work.
    Absent,
    /// Worked half the day.
    HalfDay,
    /// On approved leave (paid presence).
    OnLeave,
    /// Worked remotely (paid presence).
    WorkFromHome,
    /// Any status the engine does not recognize.
    Other(String),
}

impl From<String> for AttendanceStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "PRESENT" => AttendanceStatus::Present,
            "ABSENT" => AttendanceStatus::Absent,
            "HALF_DAY" => AttendanceStatus::HalfDay,
            "ON_LEAVE" => AttendanceStatus::OnLeave,
            "WORK_FROM_HOME" => AttendanceStatus::WorkFromHome,
            _ => AttendanceStatus::Other(value),
        }
    }
}

impl From<AttendanceStatus> for String {
    fn from(status: AttendanceStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "PRESENT"),
            AttendanceStatus::Absent => write!(f, "ABSENT"),
            AttendanceStatus::HalfDay => write!(f, "HALF_DAY"),
            AttendanceStatus::OnLeave => write!(f, "ON_LEAVE"),
            AttendanceStatus::WorkFromHome => write!(f, "WORK_FROM_HOME"),
            AttendanceStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// One attendance entry per employee and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The attendance date.
    pub date: NaiveDate,
    /// The recorded status.
    pub status: AttendanceStatus,
    /// Overtime hours worked, if any.
    ///
    /// Upstream systems occasionally send strings or garbage here; anything that
    /// is not a number (or a numeric string) deserializes to `None`.
    #[serde(default, deserialize_with = "deserialize_lenient_hours")]
    pub overtime: Option<f64>,
}

fn deserialize_lenient_hours<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Attendance metrics derived from a period's records.
///
/// All values are non-negative and rounded to 2 decimal places, and
/// `present_days` never exceeds `working_days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceMetrics {
    /// Working days in the period.
    pub working_days: u32,
    /// Paid days of presence (half days count 0.5).
    pub present_days: Decimal,
    /// Days recorded as absent.
    pub absent_days: Decimal,
    /// Number of half-day records.
    pub half_days: Decimal,
    /// Loss-of-pay days: `max(0, working_days - present_days)`.
    pub lop_days: Decimal,
    /// Total accepted overtime hours.
    pub overtime_hours: Decimal,
}

impl AttendanceMetrics {
    /// Returns `present_days / working_days`, the fraction of the period worked.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::AttendanceMetrics;
    /// use rust_decimal::Decimal;
    ///
    /// let metrics = AttendanceMetrics {
    ///     working_days: 20,
    ///     present_days: Decimal::from(15),
    ///     absent_days: Decimal::from(5),
    ///     half_days: Decimal::ZERO,
    ///     lop_days: Decimal::from(5),
    ///     overtime_hours: Decimal::ZERO,
    /// };
    /// assert_eq!(metrics.attendance_ratio(), Decimal::new(75, 2));
    /// ```
    pub fn attendance_ratio(&self) -> Decimal {
        if self.working_days == 0 {
            return Decimal::ZERO;
        }
        (self.present_days / Decimal::from(self.working_days)).min(Decimal::ONE)
    }
}
