//! Calculation result models for the Payroll Calculation Engine.
//!
//! This module contains the [`PayrollCalculationResult`] type and its associated
//! structures that capture all outputs from a payroll calculation, including
//! component values, statutory deductions, totals, and audit traces.
//!
//! Results deliberately carry no timestamps or random identifiers: calculating
//! twice with identical inputs serializes to identical bytes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CalculationType, ComponentCategory, ComponentType};

/// The calculated value of a single structure component.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{
///     CalculationType, ComponentCalculationResult, ComponentCategory, ComponentType,
/// };
/// use rust_decimal::Decimal;
///
/// let transport = ComponentCalculationResult {
///     component_id: "comp_ta".to_string(),
///     code: "TA".to_string(),
///     name: "Transport Allowance".to_string(),
///     component_type: ComponentType::Earning,
///     category: ComponentCategory::Allowance,
///     calculation_type: CalculationType::Fixed,
///     base_value: Decimal::from(2000),
///     calculated_value: Decimal::from(2000),
///     is_prorated: false,
///     is_overridden: false,
///     is_statutory: false,
///     is_taxable: true,
/// };
/// assert_eq!(transport.calculated_value, transport.base_value);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCalculationResult {
    /// The pay component's id.
    pub component_id: String,
    /// The pay component's code.
    pub code: String,
    /// The pay component's name.
    pub name: String,
    /// Earning or deduction.
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Accounting category.
    pub category: ComponentCategory,
    /// How the value was derived.
    pub calculation_type: CalculationType,
    /// The value before proration.
    pub base_value: Decimal,
    /// The final value, rounded to 2 decimal places.
    pub calculated_value: Decimal,
    /// Whether the value was scaled by the attendance ratio.
    pub is_prorated: bool,
    /// Whether an employee-level override supplied the value.
    pub is_overridden: bool,
    /// Whether this is a statutory deduction.
    pub is_statutory: bool,
    /// Whether this component is taxable.
    pub is_taxable: bool,
}

impl ComponentCalculationResult {
    /// Returns true if the component is an earning.
    pub fn is_earning(&self) -> bool {
        self.component_type == ComponentType::Earning
    }
}

/// Statutory deduction amounts applied to the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryBreakdown {
    /// Provident Fund.
    pub pf: Decimal,
    /// Employee State Insurance.
    pub esi: Decimal,
    /// Tax Deducted at Source.
    pub tds: Decimal,
    /// Professional Tax.
    pub pt: Decimal,
}

impl StatutoryBreakdown {
    /// Returns the sum of all statutory deductions.
    pub fn total(&self) -> Decimal {
        self.pf + self.esi + self.tds + self.pt
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a new warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a payroll calculation for one employee and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCalculationResult {
    /// The employee the calculation is for.
    pub employee_id: String,
    /// The payroll period (`YYYY-MM`).
    pub period: String,
    /// The version of the payroll policy applied.
    pub policy_version: String,
    /// The finalized basic salary.
    pub basic_salary: Decimal,
    /// Sum of all earnings (equal to `total_earnings`).
    pub gross_salary: Decimal,
    /// Sum of all EARNING component values.
    pub total_earnings: Decimal,
    /// Sum of all DEDUCTION component values.
    pub total_deductions: Decimal,
    /// `total_earnings - total_deductions`.
    pub net_salary: Decimal,
    /// Working days in the period.
    pub working_days: u32,
    /// Paid days of presence.
    pub present_days: Decimal,
    /// Days recorded as absent.
    pub absent_days: Decimal,
    /// Loss-of-pay days.
    pub lop_days: Decimal,
    /// Loss-of-pay amount.
    pub lop_amount: Decimal,
    /// Accepted overtime hours.
    pub overtime_hours: Decimal,
    /// Overtime amount.
    pub overtime_amount: Decimal,
    /// Per-component results, in structure order.
    pub components: Vec<ComponentCalculationResult>,
    /// Statutory deductions applied.
    pub statutory: StatutoryBreakdown,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
