//! Statutory deduction functionality.
//!
//! PF, ESI, PT and TDS are computed from the finalized basic salary and the
//! gross of all earnings, using the rates and thresholds of the supplied
//! [`PayrollPolicy`]. The computed amounts then replace the values of the
//! matching statutory components in the result list.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::PayrollPolicy;
use crate::models::{
    AuditStep, AuditWarning, ComponentCalculationResult, ComponentCategory, StatutoryBreakdown,
};

use super::round_amount;
use super::structure_resolver::ResolvedSalaryStructure;

/// Warning code recorded when basic salary is zero or negative.
pub const NON_POSITIVE_BASIC_WARNING: &str = "NON_POSITIVE_BASIC";

/// Warning code recorded when gross salary is zero or negative.
pub const NON_POSITIVE_GROSS_WARNING: &str = "NON_POSITIVE_GROSS";

/// The component codes statutory amounts are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatutoryCode {
    /// Provident Fund.
    Pf,
    /// Employee State Insurance.
    Esi,
    /// Professional Tax.
    Pt,
    /// Tax Deducted at Source.
    Tds,
}

impl StatutoryCode {
    /// All statutory codes.
    pub const ALL: [StatutoryCode; 4] = [
        StatutoryCode::Pf,
        StatutoryCode::Esi,
        StatutoryCode::Pt,
        StatutoryCode::Tds,
    ];

    /// The component code this deduction is applied to.
    pub fn code(&self) -> &'static str {
        match self {
            StatutoryCode::Pf => "PF",
            StatutoryCode::Esi => "ESI",
            StatutoryCode::Pt => "PT",
            StatutoryCode::Tds => "TDS",
        }
    }

    /// Looks up a statutory code from a component code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    fn amount(&self, breakdown: &StatutoryBreakdown) -> Decimal {
        match self {
            StatutoryCode::Pf => breakdown.pf,
            StatutoryCode::Esi => breakdown.esi,
            StatutoryCode::Pt => breakdown.pt,
            StatutoryCode::Tds => breakdown.tds,
        }
    }

    fn amount_mut<'a>(&self, breakdown: &'a mut StatutoryBreakdown) -> &'a mut Decimal {
        match self {
            StatutoryCode::Pf => &mut breakdown.pf,
            StatutoryCode::Esi => &mut breakdown.esi,
            StatutoryCode::Pt => &mut breakdown.pt,
            StatutoryCode::Tds => &mut breakdown.tds,
        }
    }
}

/// The computed statutory deductions, before they are applied to components.
#[derive(Debug, Clone)]
pub struct StatutoryCalculation {
    /// The amount each deduction evaluates to under the policy.
    pub computed: StatutoryBreakdown,
    /// Non-fatal issues found while computing.
    pub warnings: Vec<AuditWarning>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes PF, ESI, PT and TDS.
///
/// - PF: `min(basic × rate, ceiling)`
/// - ESI: `gross × rate` while `gross <= gross_threshold`, otherwise 0
/// - PT: the flat amount, only if the structure has a `PT` component
/// - TDS: `max(0, (gross × 12 − annual_exemption) × rate / 12)` once annualized
///   gross exceeds the exemption, otherwise 0
///
/// Non-positive basic forces PF to 0 and non-positive gross forces ESI and TDS
/// to 0. Both are recorded as warnings rather than errors. Every amount is
/// rounded to 2 decimal places.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{ResolvedSalaryStructure, calculate_statutory_deductions};
/// use payroll_engine::config::PayrollPolicy;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let structure = ResolvedSalaryStructure {
///     employee_id: "emp_001".to_string(),
///     assignment_id: "asg_001".to_string(),
///     structure_id: "std".to_string(),
///     ctc: Decimal::from(60000),
///     components: vec![],
///     overrides: BTreeMap::new(),
/// };
///
/// let result = calculate_statutory_deductions(
///     Decimal::from(27000),
///     Decimal::from(54800),
///     &structure,
///     &PayrollPolicy::default(),
///     5,
/// );
/// assert_eq!(result.computed.pf, Decimal::from(1800));
/// assert_eq!(result.computed.esi, Decimal::ZERO);
/// ```
pub fn calculate_statutory_deductions(
    basic_salary: Decimal,
    gross_salary: Decimal,
    structure: &ResolvedSalaryStructure,
    policy: &PayrollPolicy,
    step_number: u32,
) -> StatutoryCalculation {
    let mut warnings = Vec::new();

    let pf = if basic_salary > Decimal::ZERO {
        (basic_salary * policy.provident_fund.rate).min(policy.provident_fund.ceiling)
    } else {
        warn!(
            employee_id = %structure.employee_id,
            basic_salary = %basic_salary,
            "Non-positive basic salary, PF is zero"
        );
        warnings.push(AuditWarning::new(
            NON_POSITIVE_BASIC_WARNING,
            format!("Basic salary {} is not positive; PF set to 0", basic_salary),
            "medium",
        ));
        Decimal::ZERO
    };

    let twelve = Decimal::from(12);
    let (esi, tds) = if gross_salary > Decimal::ZERO {
        let esi = if gross_salary <= policy.state_insurance.gross_threshold {
            gross_salary * policy.state_insurance.rate
        } else {
            Decimal::ZERO
        };

        let annual_gross = gross_salary * twelve;
        let tds = if annual_gross > policy.income_tax.annual_exemption {
            ((annual_gross - policy.income_tax.annual_exemption) * policy.income_tax.rate / twelve)
                .max(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };
        (esi, tds)
    } else {
        warn!(
            employee_id = %structure.employee_id,
            gross_salary = %gross_salary,
            "Non-positive gross salary, ESI and TDS are zero"
        );
        warnings.push(AuditWarning::new(
            NON_POSITIVE_GROSS_WARNING,
            format!(
                "Gross salary {} is not positive; ESI and TDS set to 0",
                gross_salary
            ),
            "medium",
        ));
        (Decimal::ZERO, Decimal::ZERO)
    };

    let pt = if structure.has_component_code(StatutoryCode::Pt.code()) {
        policy.professional_tax.flat_amount
    } else {
        Decimal::ZERO
    };

    let computed = StatutoryBreakdown {
        pf: round_amount(pf),
        esi: round_amount(esi),
        tds: round_amount(tds),
        pt: round_amount(pt),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "statutory_deductions".to_string(),
        rule_name: "Statutory Deductions".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.to_string(),
            "gross_salary": gross_salary.to_string(),
            "policy_version": policy.version,
            "pf_rate": policy.provident_fund.rate.to_string(),
            "pf_ceiling": policy.provident_fund.ceiling.to_string(),
            "esi_rate": policy.state_insurance.rate.to_string(),
            "esi_gross_threshold": policy.state_insurance.gross_threshold.to_string(),
            "tds_annual_exemption": policy.income_tax.annual_exemption.to_string()
        }),
        output: serde_json::json!({
            "pf": computed.pf.to_string(),
            "esi": computed.esi.to_string(),
            "pt": computed.pt.to_string(),
            "tds": computed.tds.to_string()
        }),
        reasoning: format!(
            "PF {} (ceiling {}), ESI {} (gross {} vs threshold {}), PT {}, TDS {}",
            computed.pf,
            policy.provident_fund.ceiling,
            computed.esi,
            gross_salary,
            policy.state_insurance.gross_threshold,
            computed.pt,
            computed.tds
        ),
    };

    StatutoryCalculation {
        computed,
        warnings,
        audit_step,
    }
}

/// Writes computed statutory amounts into the matching deduction components.
///
/// A component matches when it is a statutory deduction whose code is `PF`,
/// `ESI`, `PT` or `TDS`. Overridden components keep their override value.
/// Returns the amounts actually deducted per code; a code with no matching
/// component reports 0.
pub fn apply_statutory_deductions(
    components: &mut [ComponentCalculationResult],
    computed: &StatutoryBreakdown,
) -> StatutoryBreakdown {
    let mut applied = StatutoryBreakdown::default();

    for result in components.iter_mut() {
        let is_statutory_deduction = !result.is_earning()
            && (result.is_statutory || result.category == ComponentCategory::StatutoryDeduction);
        if !is_statutory_deduction {
            continue;
        }
        let Some(code) = StatutoryCode::from_code(&result.code) else {
            continue;
        };

        if !result.is_overridden {
            let amount = code.amount(computed);
            result.base_value = amount;
            result.calculated_value = amount;
        }
        *code.amount_mut(&mut applied) += result.calculated_value;
    }

    debug!(
        pf = %applied.pf,
        esi = %applied.esi,
        pt = %applied.pt,
        tds = %applied.tds,
        "Statutory deductions applied"
    );

    applied
}
