//! Component calculation functionality.
//!
//! Components are valued in two explicit passes so the evaluation order is
//! auditable:
//!
//! 1. Overrides, FIXED, PERCENTAGE-of-CTC and evaluator-backed components.
//!    PERCENTAGE-of-BASIC components get a provisional zero.
//! 2. Basic salary is taken from the first BASIC-category component, then every
//!    deferred PERCENTAGE-of-BASIC component is valued against it.
//!
//! Earnings other than Basic are prorated by the attendance ratio. Overrides
//! are never prorated or recomputed.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{
    AttendanceMetrics, AuditStep, AuditWarning, CalculationType,
    ComponentCalculationResult, ComponentCategory, SalaryStructureComponent,
};

use super::round_amount;
use super::structure_resolver::ResolvedSalaryStructure;

/// Warning code recorded when the structure has no BASIC-category component.
pub const MISSING_BASIC_WARNING: &str = "MISSING_BASIC_COMPONENT";

/// Warning code recorded when a FORMULA or ATTENDANCE_BASED component is valued
/// by the placeholder evaluator.
pub const PLACEHOLDER_EVALUATOR_WARNING: &str = "PLACEHOLDER_EVALUATOR";

/// Values FORMULA and ATTENDANCE_BASED components.
///
/// The returned value is treated like any other pass-one value: it is rounded
/// and, for non-Basic earnings, prorated by the attendance ratio.
pub trait ComponentEvaluator: Send + Sync {
    /// Returns the unprorated value of `entry`, pushing any soft issues onto `warnings`.
    fn evaluate(
        &self,
        entry: &SalaryStructureComponent,
        structure: &ResolvedSalaryStructure,
        metrics: &AttendanceMetrics,
        warnings: &mut Vec<AuditWarning>,
    ) -> Decimal;
}

/// The default evaluator. Values every component at zero and says so.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroEvaluator;

impl ComponentEvaluator for ZeroEvaluator {
    fn evaluate(
        &self,
        entry: &SalaryStructureComponent,
        structure: &ResolvedSalaryStructure,
        _metrics: &AttendanceMetrics,
        warnings: &mut Vec<AuditWarning>,
    ) -> Decimal {
        warn!(
            employee_id = %structure.employee_id,
            component = %entry.component.code,
            calculation_type = ?entry.component.calculation_type,
            "No evaluator configured, component valued at zero"
        );
        warnings.push(AuditWarning::new(
            PLACEHOLDER_EVALUATOR_WARNING,
            format!(
                "{:?} component '{}' has no evaluator and was valued at 0",
                entry.component.calculation_type, entry.component.code
            ),
            "medium",
        ));
        Decimal::ZERO
    }
}

/// The result of the two-pass component calculation.
#[derive(Debug, Clone)]
pub struct ComponentCalculation {
    /// One result per structure component, in structure order.
    pub components: Vec<ComponentCalculationResult>,
    /// The finalized basic salary.
    pub basic_salary: Decimal,
    /// Non-fatal issues found while valuing components.
    pub warnings: Vec<AuditWarning>,
    /// One audit step per pass.
    pub audit_steps: Vec<AuditStep>,
}

/// Values every component of a resolved structure.
///
/// Pass one uses `step_number` and pass two `step_number + 1`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{ResolvedSalaryStructure, ZeroEvaluator, calculate_components};
/// use payroll_engine::models::*;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let basic = SalaryStructureComponent {
///     component: PayComponent {
///         id: "comp_basic".to_string(),
///         code: "BASIC".to_string(),
///         name: "Basic Salary".to_string(),
///         component_type: ComponentType::Earning,
///         category: ComponentCategory::Basic,
///         calculation_type: CalculationType::Percentage,
///         is_statutory: false,
///         is_taxable: true,
///     },
///     order: 1,
///     value: None,
///     percentage: Some(Decimal::from(45)),
///     base_component: Some(BaseComponent::Ctc),
///     min_value: None,
///     max_value: None,
/// };
/// let structure = ResolvedSalaryStructure {
///     employee_id: "emp_001".to_string(),
///     assignment_id: "asg_001".to_string(),
///     structure_id: "std".to_string(),
///     ctc: Decimal::from(60000),
///     components: vec![basic],
///     overrides: BTreeMap::new(),
/// };
/// let metrics = AttendanceMetrics {
///     working_days: 22,
///     present_days: Decimal::from(22),
///     absent_days: Decimal::ZERO,
///     half_days: Decimal::ZERO,
///     lop_days: Decimal::ZERO,
///     overtime_hours: Decimal::ZERO,
/// };
///
/// let result = calculate_components(&structure, &metrics, &ZeroEvaluator, 2);
/// assert_eq!(result.basic_salary, Decimal::from(27000));
/// ```
pub fn calculate_components(
    structure: &ResolvedSalaryStructure,
    metrics: &AttendanceMetrics,
    evaluator: &dyn ComponentEvaluator,
    step_number: u32,
) -> ComponentCalculation {
    let ratio = metrics.attendance_ratio();
    let mut warnings = Vec::new();
    let mut results = Vec::with_capacity(structure.components.len());
    let mut deferred = Vec::new();

    // Pass 1
    for (index, entry) in structure.components.iter().enumerate() {
        if let Some(value) = structure.override_for(&entry.component.id) {
            results.push(build_result(entry, value, value, false, true));
            continue;
        }

        let raw = match entry.component.calculation_type {
            CalculationType::Fixed => entry.value.unwrap_or(Decimal::ZERO),
            CalculationType::Percentage if entry.depends_on_basic() => {
                deferred.push(index);
                Decimal::ZERO
            }
            CalculationType::Percentage => percentage_of(entry, structure.ctc),
            CalculationType::Formula | CalculationType::AttendanceBased => {
                evaluator.evaluate(entry, structure, metrics, &mut warnings)
            }
        };
        results.push(value_component(entry, raw, ratio));
    }

    let pass_one_step = AuditStep {
        step_number,
        rule_id: "component_pass_1".to_string(),
        rule_name: "Component Calculation (Pass 1)".to_string(),
        input: serde_json::json!({
            "ctc": structure.ctc.to_string(),
            "attendance_ratio": ratio.round_dp(6).to_string(),
            "components": structure.components.len(),
            "overrides": structure.overrides.len()
        }),
        output: serde_json::json!({
            "values": component_values(&results),
            "deferred": deferred
                .iter()
                .map(|&i| structure.components[i].component.code.clone())
                .collect::<Vec<_>>()
        }),
        reasoning: format!(
            "Valued {} of {} components; {} deferred until Basic is final",
            results.len() - deferred.len(),
            results.len(),
            deferred.len()
        ),
    };

    // Pass 2
    let basic_salary = match results
        .iter()
        .find(|r| r.category == ComponentCategory::Basic)
    {
        Some(basic) => basic.calculated_value,
        None => {
            warn!(
                employee_id = %structure.employee_id,
                structure_id = %structure.structure_id,
                "Salary structure has no BASIC component, basic salary is zero"
            );
            warnings.push(AuditWarning::new(
                MISSING_BASIC_WARNING,
                format!(
                    "Structure '{}' has no BASIC component; basic salary taken as 0",
                    structure.structure_id
                ),
                "high",
            ));
            Decimal::ZERO
        }
    };

    for &index in &deferred {
        let entry = &structure.components[index];
        results[index] = value_component(entry, percentage_of(entry, basic_salary), ratio);
    }

    let pass_two_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "component_pass_2".to_string(),
        rule_name: "Component Calculation (Pass 2)".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.to_string(),
            "deferred": deferred.len()
        }),
        output: serde_json::json!({
            "values": deferred
                .iter()
                .map(|&i| component_value(&results[i]))
                .collect::<Vec<_>>()
        }),
        reasoning: format!(
            "Valued {} Basic-dependent components against basic salary {}",
            deferred.len(),
            basic_salary
        ),
    };

    debug!(
        employee_id = %structure.employee_id,
        basic_salary = %basic_salary,
        components = results.len(),
        "Component calculation complete"
    );

    ComponentCalculation {
        components: results,
        basic_salary,
        warnings,
        audit_steps: vec![pass_one_step, pass_two_step],
    }
}

/// `base × percentage / 100`, clamped to the component's bounds.
fn percentage_of(entry: &SalaryStructureComponent, base: Decimal) -> Decimal {
    let percentage = entry.percentage.unwrap_or(Decimal::ZERO);
    entry.clamp(base * percentage / Decimal::ONE_HUNDRED)
}

/// Rounds a raw value and prorates it when the component is a non-Basic earning.
fn value_component(
    entry: &SalaryStructureComponent,
    raw: Decimal,
    ratio: Decimal,
) -> ComponentCalculationResult {
    let component = &entry.component;
    let prorate = component.is_earning() && !component.is_basic() && ratio < Decimal::ONE;
    let calculated = if prorate { raw * ratio } else { raw };
    build_result(entry, round_amount(raw), round_amount(calculated), prorate, false)
}

fn build_result(
    entry: &SalaryStructureComponent,
    base_value: Decimal,
    calculated_value: Decimal,
    is_prorated: bool,
    is_overridden: bool,
) -> ComponentCalculationResult {
    let component = &entry.component;
    ComponentCalculationResult {
        component_id: component.id.clone(),
        code: component.code.clone(),
        name: component.name.clone(),
        component_type: component.component_type,
        category: component.category,
        calculation_type: component.calculation_type,
        base_value,
        calculated_value,
        is_prorated,
        is_overridden,
        is_statutory: component.is_statutory,
        is_taxable: component.is_taxable,
    }
}

fn component_value(result: &ComponentCalculationResult) -> serde_json::Value {
    serde_json::json!({
        "code": result.code,
        "value": result.calculated_value.to_string(),
        "prorated": result.is_prorated,
        "overridden": result.is_overridden
    })
}

fn component_values(results: &[ComponentCalculationResult]) -> Vec<serde_json::Value> {
    results.iter().map(component_value).collect()
}
