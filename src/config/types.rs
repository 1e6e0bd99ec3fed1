//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed policy structures that are
//! deserialized from YAML configuration files. Every statutory rate, ceiling,
//! and threshold lives here rather than in calculation code, so a policy
//! change is a new file and historical payroll stays reproducible.

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What to do with an attendance status the engine does not recognize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownStatusPolicy {
    /// Count the day as absent and record a warning.
    #[default]
    TreatAsAbsent,
    /// Fail the employee's calculation with a validation error.
    Reject,
}

/// Provident Fund parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidentFundPolicy {
    /// Fraction of basic salary (e.g. 0.12).
    pub rate: Decimal,
    /// Hard ceiling on the monthly contribution.
    pub ceiling: Decimal,
}

/// Employee State Insurance parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateInsurancePolicy {
    /// Fraction of gross salary (e.g. 0.0075).
    pub rate: Decimal,
    /// ESI applies only while gross is at or below this amount.
    pub gross_threshold: Decimal,
}

/// Professional Tax parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalTaxPolicy {
    /// Flat monthly amount.
    pub flat_amount: Decimal,
}

/// Simplified Tax Deducted at Source parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxPolicy {
    /// Annualized gross below which no tax is withheld.
    pub annual_exemption: Decimal,
    /// Flat rate applied to annualized gross above the exemption.
    pub rate: Decimal,
}

/// Overtime parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePolicy {
    /// Multiplier applied to the hourly rate (e.g. 1.5).
    pub multiplier: Decimal,
    /// Standard hours in a working day.
    pub standard_hours_per_day: Decimal,
    /// Overtime values above this per-record limit are discarded.
    pub max_hours_per_record: Decimal,
}

/// Attendance handling parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePolicy {
    /// Handling of unrecognized attendance statuses.
    #[serde(default)]
    pub unknown_status: UnknownStatusPolicy,
}

/// Work week definition used to count working days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWeekPolicy {
    /// Days of the week that are not working days.
    pub weekend: Vec<Weekday>,
}

impl Default for WorkWeekPolicy {
    fn default() -> Self {
        Self {
            weekend: vec![Weekday::Sat, Weekday::Sun],
        }
    }
}

/// A versioned set of payroll policy constants.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PayrollPolicy;
/// use rust_decimal::Decimal;
///
/// let policy = PayrollPolicy::default();
/// assert_eq!(policy.provident_fund.ceiling, Decimal::from(1800));
/// assert_eq!(policy.overtime.standard_hours_per_day, Decimal::from(8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPolicy {
    /// Version label recorded on every result.
    pub version: String,
    /// The date from which this policy applies.
    pub effective_date: NaiveDate,
    /// Provident Fund parameters.
    pub provident_fund: ProvidentFundPolicy,
    /// Employee State Insurance parameters.
    pub state_insurance: StateInsurancePolicy,
    /// Professional Tax parameters.
    pub professional_tax: ProfessionalTaxPolicy,
    /// Simplified TDS parameters.
    pub income_tax: IncomeTaxPolicy,
    /// Overtime parameters.
    pub overtime: OvertimePolicy,
    /// Attendance handling.
    #[serde(default)]
    pub attendance: AttendancePolicy,
    /// Work week definition.
    #[serde(default)]
    pub work_week: WorkWeekPolicy,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            version: "default".to_string(),
            effective_date: NaiveDate::MIN,
            provident_fund: ProvidentFundPolicy {
                rate: Decimal::new(12, 2),
                ceiling: Decimal::from(1800),
            },
            state_insurance: StateInsurancePolicy {
                rate: Decimal::new(75, 4),
                gross_threshold: Decimal::from(25000),
            },
            professional_tax: ProfessionalTaxPolicy {
                flat_amount: Decimal::from(200),
            },
            income_tax: IncomeTaxPolicy {
                annual_exemption: Decimal::from(250000),
                rate: Decimal::new(5, 2),
            },
            overtime: OvertimePolicy {
                multiplier: Decimal::new(15, 1),
                standard_hours_per_day: Decimal::from(8),
                max_hours_per_record: Decimal::from(12),
            },
            attendance: AttendancePolicy::default(),
            work_week: WorkWeekPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_constants() {
        let policy = PayrollPolicy::default();
        assert_eq!(policy.provident_fund.rate, Decimal::new(12, 2));
        assert_eq!(policy.state_insurance.rate, Decimal::new(75, 4));
        assert_eq!(policy.state_insurance.gross_threshold, Decimal::from(25000));
        assert_eq!(policy.professional_tax.flat_amount, Decimal::from(200));
        assert_eq!(policy.income_tax.annual_exemption, Decimal::from(250000));
        assert_eq!(policy.overtime.multiplier, Decimal::new(15, 1));
        assert_eq!(
            policy.attendance.unknown_status,
            UnknownStatusPolicy::TreatAsAbsent
        );
        assert_eq!(policy.work_week.weekend, vec![Weekday::Sat, Weekday::Sun]);
    }

    #[test]
    fn test_deserialize_policy_with_defaults() {
        let yaml = r#"
version: "test"
effective_date: 2025-04-01
provident_fund: { rate: "0.12", ceiling: "1800" }
state_insurance: { rate: "0.0075", gross_threshold: "25000" }
professional_tax: { flat_amount: "200" }
income_tax: { annual_exemption: "250000", rate: "0.05" }
overtime: { multiplier: "1.5", standard_hours_per_day: "8", max_hours_per_record: "12" }
"#;
        let policy: PayrollPolicy = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.version, "test");
        assert_eq!(policy.attendance, AttendancePolicy::default());
        assert_eq!(policy.work_week, WorkWeekPolicy::default());
    }

    #[test]
    fn test_unknown_status_policy_serialization() {
        assert_eq!(
            serde_json::to_string(&UnknownStatusPolicy::TreatAsAbsent).unwrap(),
            "\"treat_as_absent\""
        );
        let policy: UnknownStatusPolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(policy, UnknownStatusPolicy::Reject);
    }
}
