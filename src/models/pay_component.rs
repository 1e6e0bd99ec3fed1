//! Pay component and salary structure models.
//!
//! A [`SalaryStructure`] is an ordered collection of [`SalaryStructureComponent`]s,
//! each binding an immutable [`PayComponent`] to the rule that values it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a component adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
    /// Adds to gross pay.
    Earning,
    /// Subtracted from gross pay.
    Deduction,
}

/// The accounting category of a pay component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentCategory {
    /// Basic salary. Never prorated; other components may derive from it.
    Basic,
    /// Allowances such as HRA or transport.
    Allowance,
    /// Bonus payments.
    Bonus,
    /// Overtime payments.
    Overtime,
    /// Statutory deductions (PF, ESI, PT, TDS).
    StatutoryDeduction,
    /// Any other deduction.
    OtherDeduction,
}

/// How a component's value is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationType {
    /// A configured fixed amount.
    Fixed,
    /// A percentage of CTC or of Basic.
    Percentage,
    /// Evaluated by a pluggable formula evaluator.
    Formula,
    /// Evaluated by a pluggable attendance-based evaluator.
    AttendanceBased,
}

/// The value a percentage component is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaseComponent {
    /// Cost to company.
    Ctc,
    /// The finalized basic salary.
    Basic,
}

/// A single named line item that can appear in a salary structure.
///
/// Pay components are immutable reference data.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{CalculationType, ComponentCategory, ComponentType, PayComponent};
///
/// let hra = PayComponent {
///     id: "comp_hra".to_string(),
///     code: "HRA".to_string(),
///     name: "House Rent Allowance".to_string(),
///     component_type: ComponentType::Earning,
///     category: ComponentCategory::Allowance,
///     calculation_type: CalculationType::Percentage,
///     is_statutory: false,
///     is_taxable: true,
/// };
/// assert!(hra.is_earning());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayComponent {
    /// Unique identifier for the component.
    pub id: String,
    /// Short code (e.g., "BASIC", "HRA", "PF").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Earning or deduction.
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Accounting category.
    pub category: ComponentCategory,
    /// How the value is derived.
    pub calculation_type: CalculationType,
    /// Whether this is a statutory deduction.
    #[serde(default)]
    pub is_statutory: bool,
    /// Whether this component is taxable.
    #[serde(default)]
    pub is_taxable: bool,
}

impl PayComponent {
    /// Returns true if the component is an earning.
    pub fn is_earning(&self) -> bool {
        self.component_type == ComponentType::Earning
    }

    /// Returns true if the component belongs to the BASIC category.
    pub fn is_basic(&self) -> bool {
        self.category == ComponentCategory::Basic
    }
}

/// A pay component bound into a salary structure with its valuation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructureComponent {
    /// The bound pay component.
    pub component: PayComponent,
    /// Evaluation order within a pass (ascending).
    pub order: u32,
    /// The fixed amount, for FIXED components.
    #[serde(default)]
    pub value: Option<Decimal>,
    /// The percentage (e.g. 40 for 40%), for PERCENTAGE components.
    #[serde(default)]
    pub percentage: Option<Decimal>,
    /// The value the percentage applies to, for PERCENTAGE components.
    #[serde(default)]
    pub base_component: Option<BaseComponent>,
    /// Lower clamp for PERCENTAGE components.
    #[serde(default)]
    pub min_value: Option<Decimal>,
    /// Upper clamp for PERCENTAGE components.
    #[serde(default)]
    pub max_value: Option<Decimal>,
}

impl SalaryStructureComponent {
    /// Returns true if this component is a percentage of Basic and so can only
    /// be valued once Basic is final.
    pub fn depends_on_basic(&self) -> bool {
        self.component.calculation_type == CalculationType::Percentage
            && self.base_component == Some(BaseComponent::Basic)
    }

    /// Clamps a computed value to the configured `[min_value, max_value]` range.
    ///
    /// # Example
    ///
    /// ```
    /// # use payroll_engine::models::*;
    /// # use rust_decimal::Decimal;
    /// # let component = PayComponent {
    /// #     id: "comp_pf".to_string(), code: "PF".to_string(), name: "Provident Fund".to_string(),
    /// #     component_type: ComponentType::Deduction, category: ComponentCategory::StatutoryDeduction,
    /// #     calculation_type: CalculationType::Percentage, is_statutory: true, is_taxable: false,
    /// # };
    /// let pf = SalaryStructureComponent {
    ///     component,
    ///     order: 5,
    ///     value: None,
    ///     percentage: Some(Decimal::from(12)),
    ///     base_component: Some(BaseComponent::Basic),
    ///     min_value: None,
    ///     max_value: Some(Decimal::from(1800)),
    /// };
    /// assert_eq!(pf.clamp(Decimal::from(3240)), Decimal::from(1800));
    /// assert_eq!(pf.clamp(Decimal::from(900)), Decimal::from(900));
    /// ```
    pub fn clamp(&self, value: Decimal) -> Decimal {
        let mut clamped = value;
        if let Some(min) = self.min_value {
            clamped = clamped.max(min);
        }
        if let Some(max) = self.max_value {
            clamped = clamped.min(max);
        }
        clamped
    }
}

/// An ordered collection of pay components defining how CTC decomposes into paid amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// Unique identifier for the structure.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// The structure's components, in any order.
    pub components: Vec<SalaryStructureComponent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn percentage_component(min: Option<Decimal>, max: Option<Decimal>) -> SalaryStructureComponent {
        SalaryStructureComponent {
            component: PayComponent {
                id: "comp_special".to_string(),
                code: "SPECIAL".to_string(),
                name: "Special Allowance".to_string(),
                component_type: ComponentType::Earning,
                category: ComponentCategory::Allowance,
                calculation_type: CalculationType::Percentage,
                is_statutory: false,
                is_taxable: true,
            },
            order: 4,
            value: None,
            percentage: Some(dec("25")),
            base_component: Some(BaseComponent::Ctc),
            min_value: min,
            max_value: max,
        }
    }

    #[test]
    fn test_deserialize_structure_component() {
        let json = r#"{
            "component": {
                "id": "comp_hra",
                "code": "HRA",
                "name": "House Rent Allowance",
                "type": "EARNING",
                "category": "ALLOWANCE",
                "calculation_type": "PERCENTAGE",
                "is_taxable": true
            },
            "order": 2,
            "percentage": "40",
            "base_component": "BASIC"
        }"#;

        let component: SalaryStructureComponent = serde_json::from_str(json).unwrap();
        assert_eq!(component.component.component_type, ComponentType::Earning);
        assert_eq!(component.component.category, ComponentCategory::Allowance);
        assert!(!component.component.is_statutory);
        assert_eq!(component.percentage, Some(dec("40")));
        assert!(component.depends_on_basic());
        assert_eq!(component.value, None);
        assert_eq!(component.max_value, None);
    }

    #[test]
    fn test_enum_serialization_is_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&ComponentCategory::StatutoryDeduction).unwrap(),
            "\"STATUTORY_DEDUCTION\""
        );
        assert_eq!(
            serde_json::to_string(&CalculationType::AttendanceBased).unwrap(),
            "\"ATTENDANCE_BASED\""
        );
        assert_eq!(serde_json::to_string(&BaseComponent::Ctc).unwrap(), "\"CTC\"");
    }

    #[test]
    fn test_clamp_without_bounds_is_identity() {
        let component = percentage_component(None, None);
        assert_eq!(component.clamp(dec("15000")), dec("15000"));
    }

    #[test]
    fn test_clamp_applies_floor() {
        let component = percentage_component(Some(dec("5000")), None);
        assert_eq!(component.clamp(dec("1200")), dec("5000"));
    }

    #[test]
    fn test_clamp_applies_ceiling() {
        let component = percentage_component(Some(dec("5000")), Some(dec("10000")));
        assert_eq!(component.clamp(dec("15000")), dec("10000"));
    }

    #[test]
    fn test_ctc_percentage_does_not_depend_on_basic() {
        let component = percentage_component(None, None);
        assert!(!component.depends_on_basic());
    }
}
