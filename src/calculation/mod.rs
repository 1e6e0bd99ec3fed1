//! Calculation logic for the Payroll Calculation Engine.
//!
//! This module contains the staged single-employee pipeline: attendance
//! aggregation, salary structure resolution, the two-pass component
//! calculation, statutory deductions, and final result assembly.
//!
//! Every stage is a pure function of its inputs and the supplied
//! [`PayrollPolicy`](crate::config::PayrollPolicy); data fetching happens
//! before the pipeline starts.

mod assembler;
mod attendance;
mod components;
mod statutory;
mod structure_resolver;

use rust_decimal::{Decimal, RoundingStrategy};

pub use assembler::{
    NON_FINITE_HOURLY_RATE_WARNING, PayrollAssemblyInput, assemble_payroll_result,
    calculate_lop_amount, calculate_overtime_amount,
};
pub use attendance::{
    AttendanceAggregation, MAX_WORKING_DAYS, UNKNOWN_STATUS_WARNING, aggregate_attendance,
    validate_working_days,
};
pub use components::{
    ComponentCalculation, ComponentEvaluator, MISSING_BASIC_WARNING, PLACEHOLDER_EVALUATOR_WARNING,
    ZeroEvaluator, calculate_components,
};
pub use statutory::{
    NON_POSITIVE_BASIC_WARNING, NON_POSITIVE_GROSS_WARNING, StatutoryCalculation, StatutoryCode,
    apply_statutory_deductions, calculate_statutory_deductions,
};
pub use structure_resolver::{
    MAX_AMOUNT, MAX_PERCENTAGE, ResolvedSalaryStructure, StructureResolution,
    resolve_salary_structure, validate_assignment,
};

/// Rounds a monetary or day quantity to 2 decimal places, midpoint away from zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_amount(Decimal::new(1150568, 3)), Decimal::new(115057, 2));
/// assert_eq!(round_amount(Decimal::new(1005, 3)), Decimal::new(101, 2));
/// ```
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
