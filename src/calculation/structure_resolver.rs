//! Salary structure resolution functionality.
//!
//! This module selects the single salary assignment active for an employee on a
//! reference date and validates the structure it points to.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, BaseComponent, CalculationType, EmployeeSalaryAssignment, SalaryStructureComponent,
};

/// Largest accepted CTC, component value, bound or override.
///
/// Keeps every product and sum in the pipeline well inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Largest accepted component percentage.
pub const MAX_PERCENTAGE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// An employee's salary structure as of a reference date.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSalaryStructure {
    /// The employee the structure was resolved for.
    pub employee_id: String,
    /// The selected assignment's id.
    pub assignment_id: String,
    /// The assigned structure's id.
    pub structure_id: String,
    /// Cost to company for the period.
    pub ctc: Decimal,
    /// Structure components sorted ascending by `order`.
    pub components: Vec<SalaryStructureComponent>,
    /// Per-employee overrides keyed by component id.
    pub overrides: BTreeMap<String, Decimal>,
}

impl ResolvedSalaryStructure {
    /// Returns the override value for a component, if the employee has one.
    pub fn override_for(&self, component_id: &str) -> Option<Decimal> {
        self.overrides.get(component_id).copied()
    }

    /// Returns true if the structure contains a component with the given code.
    pub fn has_component_code(&self, code: &str) -> bool {
        self.components.iter().any(|c| c.component.code == code)
    }
}

/// The result of resolving a salary structure, including the audit step.
#[derive(Debug, Clone)]
pub struct StructureResolution {
    /// The resolved structure.
    pub structure: ResolvedSalaryStructure,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Selects the salary assignment active for an employee on `date`.
///
/// An assignment qualifies when `effective_from <= date` and `effective_to` is
/// either absent or `>= date`. When several qualify, the most recent
/// `effective_from` wins; among equal start dates the one supplied last wins.
/// Overlapping assignments are never merged.
///
/// # Errors
///
/// - [`EngineError::SalaryStructureNotFound`] when no assignment qualifies
/// - [`EngineError::InvalidStructure`] when the selected structure is inconsistent
///   (see [`validate_assignment`])
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::resolve_salary_structure;
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
///     effective_to: None,
///     overrides: vec![],
/// };
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let resolved = resolve_salary_structure("emp_001", date, &[assignment], 1).unwrap();
/// assert_eq!(resolved.structure.assignment_id, "asg_001");
/// ```
pub fn resolve_salary_structure(
    employee_id: &str,
    date: NaiveDate,
    assignments: &[EmployeeSalaryAssignment],
    step_number: u32,
) -> EngineResult<StructureResolution> {
    let candidates = assignments
        .iter()
        .filter(|a| a.employee_id == employee_id && a.is_effective_on(date));
    let qualifying = candidates.clone().count();

    let assignment = candidates
        .max_by_key(|a| a.effective_from)
        .ok_or_else(|| EngineError::SalaryStructureNotFound {
            employee_id: employee_id.to_string(),
            date,
        })?;

    validate_assignment(assignment)?;

    let mut components = assignment.structure.components.clone();
    components.sort_by_key(|c| c.order);

    let overrides: BTreeMap<String, Decimal> = assignment
        .overrides
        .iter()
        .map(|o| (o.component_id.clone(), o.value))
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "salary_structure_resolution".to_string(),
        rule_name: "Salary Structure Resolution".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "reference_date": date.to_string(),
            "candidate_assignments": assignments.len()
        }),
        output: serde_json::json!({
            "assignment_id": assignment.id,
            "structure_id": assignment.structure.id,
            "ctc": assignment.ctc.to_string(),
            "effective_from": assignment.effective_from.to_string(),
            "components": components.len(),
            "overrides": overrides.len()
        }),
        reasoning: format!(
            "Selected assignment '{}' effective from {} ({} of {} assignments active on {})",
            assignment.id,
            assignment.effective_from,
            qualifying,
            assignments.len(),
            date
        ),
    };

    Ok(StructureResolution {
        structure: ResolvedSalaryStructure {
            employee_id: employee_id.to_string(),
            assignment_id: assignment.id.clone(),
            structure_id: assignment.structure.id.clone(),
            ctc: assignment.ctc,
            components,
            overrides,
        },
        audit_step,
    })
}

/// Checks an assignment and its structure for configuration errors.
///
/// Rejected configurations:
/// - negative CTC or negative override values
/// - CTC, values, bounds or overrides above [`MAX_AMOUNT`]
/// - percentages above [`MAX_PERCENTAGE`]
/// - duplicate component ids within the structure
/// - FIXED components without a value
/// - PERCENTAGE components without a percentage or base, or with a negative percentage
/// - `min_value` greater than `max_value`
/// - a BASIC-category component defined as a percentage of BASIC
pub fn validate_assignment(assignment: &EmployeeSalaryAssignment) -> EngineResult<()> {
    let structure_id = &assignment.structure.id;
    let invalid = |message: String| EngineError::InvalidStructure {
        structure_id: structure_id.clone(),
        message,
    };

    if assignment.ctc.is_sign_negative() && !assignment.ctc.is_zero() {
        return Err(invalid(format!("CTC is negative ({})", assignment.ctc)));
    }
    if assignment.ctc > MAX_AMOUNT {
        return Err(invalid(format!(
            "CTC {} exceeds the maximum of {}",
            assignment.ctc, MAX_AMOUNT
        )));
    }

    let mut seen_ids = HashSet::new();
    for entry in &assignment.structure.components {
        let component = &entry.component;
        if !seen_ids.insert(component.id.as_str()) {
            return Err(invalid(format!("duplicate component id '{}'", component.id)));
        }

        match component.calculation_type {
            CalculationType::Fixed if entry.value.is_none() => {
                return Err(invalid(format!(
                    "FIXED component '{}' has no value",
                    component.code
                )));
            }
            CalculationType::Percentage => {
                match entry.percentage {
                    None => {
                        return Err(invalid(format!(
                            "PERCENTAGE component '{}' has no percentage",
                            component.code
                        )));
                    }
                    Some(pct) if pct < Decimal::ZERO => {
                        return Err(invalid(format!(
                            "PERCENTAGE component '{}' has negative percentage {}",
                            component.code, pct
                        )));
                    }
                    Some(pct) if pct > MAX_PERCENTAGE => {
                        return Err(invalid(format!(
                            "PERCENTAGE component '{}' has percentage {} above {}",
                            component.code, pct, MAX_PERCENTAGE
                        )));
                    }
                    Some(_) => {}
                }
                match entry.base_component {
                    None => {
                        return Err(invalid(format!(
                            "PERCENTAGE component '{}' has no base component",
                            component.code
                        )));
                    }
                    Some(BaseComponent::Basic) if component.is_basic() => {
                        return Err(invalid(format!(
                            "BASIC component '{}' cannot be a percentage of BASIC",
                            component.code
                        )));
                    }
                    Some(_) => {}
                }
            }
            _ => {}
        }

        let oversized = [
            ("value", entry.value),
            ("min_value", entry.min_value),
            ("max_value", entry.max_value),
        ]
        .into_iter()
        .find_map(|(field, amount)| {
            amount
                .filter(|a| a.abs() > MAX_AMOUNT)
                .map(|a| (field, a))
        });
        if let Some((field, amount)) = oversized {
            return Err(invalid(format!(
                "component '{}' has {} {} beyond the maximum of {}",
                component.code, field, amount, MAX_AMOUNT
            )));
        }

        if let (Some(min), Some(max)) = (entry.min_value, entry.max_value)
            && min > max
        {
            return Err(invalid(format!(
                "component '{}' has min_value {} above max_value {}",
                component.code, min, max
            )));
        }
    }

    if let Some(negative) = assignment
        .overrides
        .iter()
        .find(|o| o.value < Decimal::ZERO)
    {
        return Err(invalid(format!(
            "override for component '{}' is negative ({})",
            negative.component_id, negative.value
        )));
    }
    if let Some(oversized) = assignment.overrides.iter().find(|o| o.value > MAX_AMOUNT) {
        return Err(invalid(format!(
            "override for component '{}' exceeds the maximum of {} ({})",
            oversized.component_id, MAX_AMOUNT, oversized.value
        )));
    }

    Ok(())
}
