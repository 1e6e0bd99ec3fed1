//! Payroll result assembly functionality.
//!
//! This module computes the loss-of-pay and overtime figures, totals the
//! component results and builds the final [`PayrollCalculationResult`].

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::PayrollPolicy;
use crate::models::{
    AttendanceMetrics, AuditStep, AuditTrace, AuditWarning, ComponentCalculationResult,
    PayrollCalculationResult, StatutoryBreakdown,
};

use super::round_amount;

/// Warning code recorded when the overtime hourly rate cannot be computed or is not positive.
pub const NON_FINITE_HOURLY_RATE_WARNING: &str = "NON_FINITE_HOURLY_RATE";

/// Everything the assembler needs for one employee.
#[derive(Debug, Clone)]
pub struct PayrollAssemblyInput<'a> {
    /// The employee the calculation is for.
    pub employee_id: &'a str,
    /// The payroll period (`YYYY-MM`).
    pub period: &'a str,
    /// The policy applied.
    pub policy: &'a PayrollPolicy,
    /// Aggregated attendance.
    pub metrics: &'a AttendanceMetrics,
    /// The finalized basic salary.
    pub basic_salary: Decimal,
    /// Component results with statutory amounts applied.
    pub components: Vec<ComponentCalculationResult>,
    /// Statutory amounts applied.
    pub statutory: StatutoryBreakdown,
    /// Audit steps and warnings from earlier stages.
    pub audit_trace: AuditTrace,
}

/// `basic / working_days × lop_days`, rounded to 2 decimal places.
///
/// Returns 0 when `working_days` is 0.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_lop_amount;
/// use rust_decimal::Decimal;
///
/// let lop = calculate_lop_amount(Decimal::from(27000), 22, Decimal::from(2));
/// assert_eq!(lop, Decimal::new(245455, 2));
/// ```
pub fn calculate_lop_amount(basic_salary: Decimal, working_days: u32, lop_days: Decimal) -> Decimal {
    if working_days == 0 {
        return Decimal::ZERO;
    }
    round_amount(basic_salary / Decimal::from(working_days) * lop_days)
}

/// `basic / (working_days × standard_hours_per_day) × multiplier × overtime_hours`.
///
/// The hourly rate is kept at full precision and only the final amount is
/// rounded. When there are overtime hours but the hourly rate cannot be
/// computed or is not positive, the amount is 0 and a
/// [`NON_FINITE_HOURLY_RATE_WARNING`] is pushed onto `warnings`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_overtime_amount;
/// use payroll_engine::config::PayrollPolicy;
/// use rust_decimal::Decimal;
///
/// let mut warnings = Vec::new();
/// let amount = calculate_overtime_amount(
///     Decimal::from(27000),
///     22,
///     Decimal::from(5),
///     &PayrollPolicy::default(),
///     &mut warnings,
/// );
/// assert_eq!(amount, Decimal::new(115057, 2));
/// assert!(warnings.is_empty());
/// ```
pub fn calculate_overtime_amount(
    basic_salary: Decimal,
    working_days: u32,
    overtime_hours: Decimal,
    policy: &PayrollPolicy,
    warnings: &mut Vec<AuditWarning>,
) -> Decimal {
    if overtime_hours <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let standard_hours = Decimal::from(working_days) * policy.overtime.standard_hours_per_day;
    let hourly_rate = if standard_hours > Decimal::ZERO {
        basic_salary.checked_div(standard_hours)
    } else {
        None
    };

    match hourly_rate {
        Some(rate) if rate > Decimal::ZERO => {
            round_amount(rate * policy.overtime.multiplier * overtime_hours)
        }
        _ => {
            warn!(
                basic_salary = %basic_salary,
                working_days,
                overtime_hours = %overtime_hours,
                "Overtime hourly rate is not a positive number, overtime amount is zero"
            );
            warnings.push(AuditWarning::new(
                NON_FINITE_HOURLY_RATE_WARNING,
                format!(
                    "Hourly rate from basic {} over {} working days is not positive; {} overtime hours paid at 0",
                    basic_salary, working_days, overtime_hours
                ),
                "medium",
            ));
            Decimal::ZERO
        }
    }
}

/// Builds the final result for one employee.
///
/// Totals are exact sums of the already-rounded component values, so
/// `total_earnings - total_deductions == net_salary` holds exactly. The LOP and
/// overtime amounts are reported alongside the totals and are not added to them.
pub fn assemble_payroll_result(
    input: PayrollAssemblyInput<'_>,
    step_number: u32,
) -> PayrollCalculationResult {
    let PayrollAssemblyInput {
        employee_id,
        period,
        policy,
        metrics,
        basic_salary,
        components,
        statutory,
        mut audit_trace,
    } = input;

    let (total_earnings, total_deductions) =
        components
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(earnings, deductions), c| {
                if c.is_earning() {
                    (earnings + c.calculated_value, deductions)
                } else {
                    (earnings, deductions + c.calculated_value)
                }
            });
    let net_salary = total_earnings - total_deductions;

    let lop_amount = calculate_lop_amount(basic_salary, metrics.working_days, metrics.lop_days);
    let overtime_amount = calculate_overtime_amount(
        basic_salary,
        metrics.working_days,
        metrics.overtime_hours,
        policy,
        &mut audit_trace.warnings,
    );

    audit_trace.steps.push(AuditStep {
        step_number,
        rule_id: "payroll_assembly".to_string(),
        rule_name: "Payroll Result Assembly".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.to_string(),
            "working_days": metrics.working_days,
            "lop_days": metrics.lop_days.to_string(),
            "overtime_hours": metrics.overtime_hours.to_string(),
            "overtime_multiplier": policy.overtime.multiplier.to_string(),
            "standard_hours_per_day": policy.overtime.standard_hours_per_day.to_string()
        }),
        output: serde_json::json!({
            "total_earnings": total_earnings.to_string(),
            "total_deductions": total_deductions.to_string(),
            "net_salary": net_salary.to_string(),
            "lop_amount": lop_amount.to_string(),
            "overtime_amount": overtime_amount.to_string()
        }),
        reasoning: format!(
            "Earnings {} less deductions {} gives net {}",
            total_earnings, total_deductions, net_salary
        ),
    });

    debug!(
        employee_id = %employee_id,
        period = %period,
        net_salary = %net_salary,
        "Payroll result assembled"
    );

    PayrollCalculationResult {
        employee_id: employee_id.to_string(),
        period: period.to_string(),
        policy_version: policy.version.clone(),
        basic_salary,
        gross_salary: total_earnings,
        total_earnings,
        total_deductions,
        net_salary,
        working_days: metrics.working_days,
        present_days: metrics.present_days,
        absent_days: metrics.absent_days,
        lop_days: metrics.lop_days,
        lop_amount,
        overtime_hours: metrics.overtime_hours,
        overtime_amount,
        components,
        statutory,
        audit_trace,
    }
}
